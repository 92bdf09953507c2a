//! Command execution outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ParamMap, ParamValue};

/// Execution-level status of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandStatus {
    /// The command ran to completion.
    Success,
    /// Generic failure.
    Error,
    /// Aborted by the user or the system.
    Cancelled,
    /// Execution paused pending user confirmation.
    ValidationRequired,
    /// Rejected by policy.
    PermissionDenied,
    /// The command shape was malformed at execution time.
    InvalidFormat,
    /// No handler is registered for the action.
    UnknownAction,
}

impl CommandStatus {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Error => "ERROR",
            Self::Cancelled => "CANCELLED",
            Self::ValidationRequired => "VALIDATION_REQUIRED",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::InvalidFormat => "INVALID_FORMAT",
            Self::UnknownAction => "UNKNOWN_ACTION",
        }
    }

    /// Returns `true` for [`CommandStatus::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns `true` for statuses that pause execution rather than fail it.
    #[must_use]
    pub const fn is_control_state(&self) -> bool {
        matches!(self, Self::ValidationRequired)
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of executing exactly one [`Command`](super::Command).
///
/// # Invariants
///
/// A successful result never carries an `error`. Deserialising a payload
/// that violates this is rejected.
///
/// # Examples
///
/// ```
/// use assistant_core::command::domain::{CommandResult, CommandStatus};
///
/// let ok = CommandResult::success().with_message("entry added");
/// assert!(ok.status().is_success());
/// assert!(ok.error().is_none());
///
/// let denied = CommandResult::failure(CommandStatus::PermissionDenied, "read-only zone");
/// assert_eq!(denied.error(), Some("read-only zone"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawCommandResult")]
pub struct CommandResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    command_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    command_id: Option<String>,
    status: CommandStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    requested_data: Option<ParamMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<ParamMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl CommandResult {
    const fn with_status(status: CommandStatus) -> Self {
        Self {
            command_index: None,
            command_id: None,
            status,
            message: None,
            requested_data: None,
            data: None,
            error: None,
        }
    }

    /// Creates a successful result.
    #[must_use]
    pub const fn success() -> Self {
        Self::with_status(CommandStatus::Success)
    }

    /// Creates a non-successful result carrying an error detail.
    ///
    /// Passing [`CommandStatus::Success`] is a caller bug: debug builds
    /// assert, release builds downgrade the status to
    /// [`CommandStatus::Error`] so the invariant still holds.
    #[must_use]
    pub fn failure(status: CommandStatus, error: impl Into<String>) -> Self {
        debug_assert!(!status.is_success(), "failure() called with SUCCESS");
        let effective = if status.is_success() {
            CommandStatus::Error
        } else {
            status
        };
        Self {
            error: Some(error.into()),
            ..Self::with_status(effective)
        }
    }

    /// Sets the human-readable summary.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the data explicitly queried by the command.
    #[must_use]
    pub fn with_requested_data(mut self, requested_data: ParamMap) -> Self {
        self.requested_data = Some(requested_data);
        self
    }

    /// Adds one entry to the queried data.
    #[must_use]
    pub fn with_requested_value(
        mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Self {
        self.requested_data
            .get_or_insert_with(ParamMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Sets the payload of a side-effecting operation.
    #[must_use]
    pub fn with_data(mut self, data: ParamMap) -> Self {
        self.data = Some(data);
        self
    }

    /// Records the position of the originating command within a batch.
    #[must_use]
    pub fn with_command_index(mut self, index: usize) -> Self {
        self.command_index = Some(index);
        self
    }

    /// Echoes the originating command identifier.
    #[must_use]
    pub fn with_command_id(mut self, id: impl Into<String>) -> Self {
        self.command_id = Some(id.into());
        self
    }

    /// Returns the batch position, if any.
    #[must_use]
    pub const fn command_index(&self) -> Option<usize> {
        self.command_index
    }

    /// Returns the echoed command identifier, if any.
    #[must_use]
    pub fn command_id(&self) -> Option<&str> {
        self.command_id.as_deref()
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> CommandStatus {
        self.status
    }

    /// Returns the human-readable summary.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the queried data.
    #[must_use]
    pub const fn requested_data(&self) -> Option<&ParamMap> {
        self.requested_data.as_ref()
    }

    /// Returns the side-effect payload.
    #[must_use]
    pub const fn data(&self) -> Option<&ParamMap> {
        self.data.as_ref()
    }

    /// Returns the error detail.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCommandResult {
    #[serde(default)]
    command_index: Option<usize>,
    #[serde(default)]
    command_id: Option<String>,
    status: CommandStatus,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    requested_data: Option<ParamMap>,
    #[serde(default)]
    data: Option<ParamMap>,
    #[serde(default)]
    error: Option<String>,
}

impl TryFrom<RawCommandResult> for CommandResult {
    type Error = String;

    fn try_from(raw: RawCommandResult) -> Result<Self, Self::Error> {
        if raw.status.is_success() && raw.error.is_some() {
            return Err("a SUCCESS result must not carry an error".to_owned());
        }
        Ok(Self {
            command_index: raw.command_index,
            command_id: raw.command_id,
            status: raw.status,
            message: raw.message,
            requested_data: raw.requested_data,
            data: raw.data,
            error: raw.error,
        })
    }
}
