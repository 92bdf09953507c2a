//! Conversation threads with a remote AI provider.
//!
//! The event processor is the sole writer of a session's state; the types
//! here only guard which transitions are legal.

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::{SessionId, SessionMessage};

/// Kind of conversation thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionType {
    /// Interactive chat started by the user.
    Chat,
    /// Run triggered by an automation rule.
    Automation,
    /// Seed conversation used to bootstrap app data.
    Seed,
}

/// Execution state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// Nothing in flight.
    Idle,
    /// A request to the provider is in flight.
    AwaitingProvider,
    /// Commands are pending user confirmation.
    AwaitingValidation,
    /// An embedded module is waiting for the user's answer.
    AwaitingUserResponse,
    /// Commands are being executed.
    Executing,
}

impl SessionState {
    /// Returns the canonical persisted representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::AwaitingProvider => "AWAITING_PROVIDER",
            Self::AwaitingValidation => "AWAITING_VALIDATION",
            Self::AwaitingUserResponse => "AWAITING_USER_RESPONSE",
            Self::Executing => "EXECUTING",
        }
    }

    /// Returns `true` if the state machine allows moving to `next`.
    ///
    /// Any state may return to `Idle` (completion, interruption or error).
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (_, Self::Idle)
                | (Self::Idle, Self::AwaitingProvider | Self::Executing)
                | (
                    Self::AwaitingProvider,
                    Self::AwaitingValidation | Self::AwaitingUserResponse | Self::Executing
                )
                | (Self::AwaitingValidation | Self::AwaitingUserResponse, Self::Executing)
                | (
                    Self::AwaitingValidation | Self::AwaitingUserResponse | Self::Executing,
                    Self::AwaitingProvider
                )
        )
    }

    /// Returns `true` while the session waits on the user.
    #[must_use]
    pub const fn is_waiting_on_user(&self) -> bool {
        matches!(self, Self::AwaitingValidation | Self::AwaitingUserResponse)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown session state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown session state: {0}")]
pub struct ParseSessionStateError(pub String);

impl TryFrom<&str> for SessionState {
    type Error = ParseSessionStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "IDLE" => Ok(Self::Idle),
            "AWAITING_PROVIDER" => Ok(Self::AwaitingProvider),
            "AWAITING_VALIDATION" => Ok(Self::AwaitingValidation),
            "AWAITING_USER_RESPONSE" => Ok(Self::AwaitingUserResponse),
            "EXECUTING" => Ok(Self::Executing),
            _ => Err(ParseSessionStateError(value.to_owned())),
        }
    }
}

/// Why a session stopped being active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndReason {
    /// The conversation or automation finished normally.
    Completed,
    /// The user stopped the session.
    UserCancelled,
    /// The provider could not be reached.
    NetworkError,
    /// The session waited too long.
    Timeout,
    /// Another session replaced this one.
    Superseded,
    /// An unrecoverable error occurred.
    Error,
}

/// Errors raised by session state changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionDomainError {
    /// The requested state transition is not allowed.
    #[error("invalid session state transition from {from} to {to}")]
    InvalidTransition {
        /// Current state.
        from: SessionState,
        /// Requested state.
        to: SessionState,
    },

    /// The session has already ended.
    #[error("session {0} has already ended")]
    AlreadyEnded(SessionId),

    /// An automation session was created without its automation reference.
    #[error("automation sessions require an automation id")]
    MissingAutomationId,
}

/// Where a session talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderBinding {
    /// Remote model/provider identifier.
    pub provider_id: String,
    /// Provider-side session identifier.
    pub provider_session_id: String,
}

impl ProviderBinding {
    /// Creates a provider binding.
    #[must_use]
    pub fn new(provider_id: impl Into<String>, provider_session_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            provider_session_id: provider_session_id.into(),
        }
    }
}

/// One conversation thread.
///
/// Sessions are never deleted while messages reference them; they end softly
/// via [`AiSession::end`].
///
/// # Examples
///
/// ```
/// use assistant_core::session::domain::{AiSession, ProviderBinding, SessionState, SessionType};
/// use mockable::DefaultClock;
///
/// let mut session = AiSession::chat(
///     "Morning check-in",
///     ProviderBinding::new("claude", "remote-1"),
///     &DefaultClock,
/// );
/// assert_eq!(session.session_type, SessionType::Chat);
/// session
///     .transition_to(SessionState::AwaitingProvider, &DefaultClock)
///     .expect("idle sessions can query the provider");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSession {
    /// Unique identifier.
    pub id: SessionId,
    /// Display name.
    pub name: String,
    /// Kind of thread.
    #[serde(rename = "type")]
    pub session_type: SessionType,
    /// Whether AI commands need user confirmation before running.
    pub require_validation: bool,
    /// Serialised pending-interaction state; `None` when nothing is pending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiting_state_json: Option<String>,
    /// Automation that created the session (automation sessions only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automation_id: Option<String>,
    /// When the automation was scheduled to run (automation sessions only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_execution_time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    provider: ProviderBinding,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// Last user, provider or execution activity.
    pub last_activity: DateTime<Utc>,
    /// Messages in chronological order.
    #[serde(default)]
    pub messages: Vec<SessionMessage>,
    /// `false` once the session has ended.
    pub is_active: bool,
    /// Current execution state.
    pub state: SessionState,
    /// Last time the provider could not be reached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_network_error_time: Option<DateTime<Utc>>,
    /// Why the session ended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_reason: Option<EndReason>,
}

impl AiSession {
    fn new(
        name: impl Into<String>,
        session_type: SessionType,
        provider: ProviderBinding,
        clock: &impl Clock,
    ) -> Self {
        let now = clock.utc();
        Self {
            id: SessionId::generate(),
            name: name.into(),
            session_type,
            require_validation: false,
            waiting_state_json: None,
            automation_id: None,
            scheduled_execution_time: None,
            provider,
            created_at: now,
            last_activity: now,
            messages: Vec::new(),
            is_active: true,
            state: SessionState::Idle,
            last_network_error_time: None,
            end_reason: None,
        }
    }

    /// Creates an interactive chat session.
    #[must_use]
    pub fn chat(name: impl Into<String>, provider: ProviderBinding, clock: &impl Clock) -> Self {
        Self::new(name, SessionType::Chat, provider, clock)
    }

    /// Creates a seed session.
    #[must_use]
    pub fn seed(name: impl Into<String>, provider: ProviderBinding, clock: &impl Clock) -> Self {
        Self::new(name, SessionType::Seed, provider, clock)
    }

    /// Creates a session for an automation run.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError::MissingAutomationId`] if
    /// `automation_id` is blank.
    pub fn automation(
        name: impl Into<String>,
        automation_id: impl Into<String>,
        scheduled_execution_time: DateTime<Utc>,
        provider: ProviderBinding,
        clock: &impl Clock,
    ) -> Result<Self, SessionDomainError> {
        let automation = automation_id.into();
        if automation.trim().is_empty() {
            return Err(SessionDomainError::MissingAutomationId);
        }
        Ok(Self {
            automation_id: Some(automation),
            scheduled_execution_time: Some(scheduled_execution_time),
            ..Self::new(name, SessionType::Automation, provider, clock)
        })
    }

    /// Sets whether commands need confirmation before they run.
    #[must_use]
    pub const fn with_validation_required(mut self, require_validation: bool) -> Self {
        self.require_validation = require_validation;
        self
    }

    /// Returns the provider identifier, fixed for the session's lifetime.
    #[must_use]
    pub fn provider_id(&self) -> &str {
        &self.provider.provider_id
    }

    /// Returns the provider-side session identifier.
    #[must_use]
    pub fn provider_session_id(&self) -> &str {
        &self.provider.provider_session_id
    }

    /// Moves the session to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError::AlreadyEnded`] for ended sessions and
    /// [`SessionDomainError::InvalidTransition`] for disallowed moves.
    pub fn transition_to(
        &mut self,
        next: SessionState,
        clock: &impl Clock,
    ) -> Result<(), SessionDomainError> {
        self.ensure_active()?;
        if !self.state.can_transition_to(next) {
            return Err(SessionDomainError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        self.record_activity(clock);
        Ok(())
    }

    /// Appends a message and bumps `last_activity`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError::AlreadyEnded`] for ended sessions.
    pub fn append_message(
        &mut self,
        message: SessionMessage,
        clock: &impl Clock,
    ) -> Result<(), SessionDomainError> {
        self.ensure_active()?;
        self.messages.push(message);
        self.record_activity(clock);
        Ok(())
    }

    /// Stores the serialised pending interaction.
    pub fn set_waiting_state(&mut self, waiting_state_json: impl Into<String>) {
        self.waiting_state_json = Some(waiting_state_json.into());
    }

    /// Clears the pending interaction.
    pub fn clear_waiting_state(&mut self) {
        self.waiting_state_json = None;
    }

    /// Records activity at the current time.
    pub fn record_activity(&mut self, clock: &impl Clock) {
        self.last_activity = clock.utc();
    }

    /// Records a failed provider call.
    pub fn record_network_error(&mut self, clock: &impl Clock) {
        self.last_network_error_time = Some(clock.utc());
    }

    /// Ends the session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError::AlreadyEnded`] if the session has
    /// already ended; the original reason is kept.
    pub fn end(&mut self, reason: EndReason, clock: &impl Clock) -> Result<(), SessionDomainError> {
        self.ensure_active()?;
        self.is_active = false;
        self.end_reason = Some(reason);
        self.state = SessionState::Idle;
        self.waiting_state_json = None;
        self.record_activity(clock);
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), SessionDomainError> {
        if self.is_active {
            Ok(())
        } else {
            Err(SessionDomainError::AlreadyEnded(self.id.clone()))
        }
    }
}
