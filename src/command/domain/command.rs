//! The universal action-invocation format.

use serde::{Deserialize, Serialize};

use super::{ParamMap, ParamValue};
use crate::command::error::CommandParseError;

/// A single requested action.
///
/// Commands are uniform across user, AI and internal origins. They are built
/// immediately before dispatch, never mutated, and discarded once executed.
///
/// # Invariants
///
/// - `action` is never blank (enforced by [`Command::new`] and by
///   deserialisation)
/// - `description` and `reason` are only present for AI-originated commands
///
/// # Examples
///
/// ```
/// use assistant_core::command::domain::Command;
///
/// let command = Command::new("execute->tools->tracking->add_entry")
///     .expect("non-blank action")
///     .with_param("value", 42_i64)
///     .with_id("cmd-1");
///
/// assert_eq!(command.action(), "execute->tools->tracking->add_entry");
/// assert_eq!(command.id(), Some("cmd-1"));
/// assert!(!command.is_ai_originated());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCommand")]
pub struct Command {
    action: String,
    params: ParamMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl Command {
    /// Creates a command with no parameters.
    ///
    /// # Errors
    ///
    /// Returns [`CommandParseError::MissingAction`] if `action` is empty or
    /// whitespace-only.
    pub fn new(action: impl Into<String>) -> Result<Self, CommandParseError> {
        let name = action.into();
        if name.trim().is_empty() {
            return Err(CommandParseError::MissingAction);
        }
        Ok(Self {
            action: name,
            params: ParamMap::new(),
            id: None,
            description: None,
            reason: None,
        })
    }

    /// Adds a parameter, replacing any previous value under `name`.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Replaces the whole parameter map.
    #[must_use]
    pub fn with_params(mut self, params: ParamMap) -> Self {
        self.params = params;
        self
    }

    /// Sets the correlation identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Attaches the human-readable annotations an AI provider supplies.
    #[must_use]
    pub fn with_ai_annotations(
        mut self,
        description: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        self.description = Some(description.into());
        self.reason = Some(reason.into());
        self
    }

    /// Returns the action identifier.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Returns the parameters.
    #[must_use]
    pub const fn params(&self) -> &ParamMap {
        &self.params
    }

    /// Returns a single parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Returns the correlation identifier.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns the AI-supplied description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the AI-supplied reason.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Returns `true` when the command carries AI annotations.
    #[must_use]
    pub const fn is_ai_originated(&self) -> bool {
        self.description.is_some() || self.reason.is_some()
    }

    /// Splits a `->`-separated action into its namespace segments.
    pub fn action_segments(&self) -> impl Iterator<Item = &str> {
        self.action.split("->").map(str::trim)
    }
}

/// Wire shape of a command before the action has been validated.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawCommand {
    #[serde(default)]
    pub(crate) action: Option<String>,
    #[serde(default)]
    pub(crate) params: ParamMap,
    #[serde(default)]
    pub(crate) id: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) reason: Option<String>,
}

impl RawCommand {
    pub(crate) fn has_blank_action(&self) -> bool {
        self.action
            .as_deref()
            .is_none_or(|action| action.trim().is_empty())
    }
}

impl TryFrom<RawCommand> for Command {
    type Error = CommandParseError;

    fn try_from(raw: RawCommand) -> Result<Self, Self::Error> {
        let mut command = Self::new(raw.action.unwrap_or_default())?.with_params(raw.params);
        command.id = raw.id;
        command.description = raw.description;
        command.reason = raw.reason;
        Ok(command)
    }
}
