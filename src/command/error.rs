//! Error types for command parsing and serialisation.

use std::fmt;
use thiserror::Error;

/// A single invalid element found while validating a command batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchViolation {
    /// Position of the offending command within the batch.
    pub index: usize,
    /// Why the command was rejected.
    pub reason: String,
}

impl BatchViolation {
    /// Creates a violation for the command at `index`.
    #[must_use]
    pub fn new(index: usize, reason: impl Into<String>) -> Self {
        Self {
            index,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for BatchViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "command at index {}: {}", self.index, self.reason)
    }
}

/// Errors produced while parsing or serialising commands.
///
/// Parse failures never escape the parser as panics: every malformed or
/// semantically invalid payload is reported through one of these variants,
/// whose `Display` text is the human-readable failure message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandParseError {
    /// The `action` field is missing, empty or whitespace-only.
    #[error("Action field is required")]
    MissingAction,

    /// The payload is not syntactically valid JSON.
    #[error("invalid command JSON: {0}")]
    Syntax(String),

    /// The payload is valid JSON but does not have the command shape.
    #[error("failed to parse command: {0}")]
    Deserialization(String),

    /// One or more commands in a batch failed validation.
    #[error("command batch validation failed: {}", format_violations(.0))]
    InvalidBatch(Vec<BatchViolation>),

    /// A command or result could not be serialised.
    #[error("failed to serialise: {0}")]
    Serialization(String),
}

fn format_violations(violations: &[BatchViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl CommandParseError {
    /// Returns `true` for semantic failures on syntactically valid input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::MissingAction | Self::InvalidBatch(_))
    }

    /// Returns the individual violations of a batch failure.
    #[must_use]
    pub fn violations(&self) -> Option<&[BatchViolation]> {
        match self {
            Self::InvalidBatch(violations) => Some(violations),
            _ => None,
        }
    }

    pub(crate) fn from_json_error(error: &serde_json::Error) -> Self {
        use serde_json::error::Category;
        match error.classify() {
            Category::Syntax | Category::Eof => Self::Syntax(error.to_string()),
            Category::Data | Category::Io => Self::Deserialization(error.to_string()),
        }
    }
}
