//! The originator of a session message.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sender {
    /// The person using the app.
    User,
    /// The remote language model.
    Ai,
    /// The app itself (operation results, status notices).
    System,
}

impl Sender {
    /// Returns the canonical persisted representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Ai => "AI",
            Self::System => "SYSTEM",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown sender string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sender: {0}")]
pub struct ParseSenderError(pub String);

impl TryFrom<&str> for Sender {
    type Error = ParseSenderError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "USER" => Ok(Self::User),
            "AI" => Ok(Self::Ai),
            "SYSTEM" => Ok(Self::System),
            _ => Err(ParseSenderError(value.to_owned())),
        }
    }
}
