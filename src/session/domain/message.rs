//! The unified session message record.
//!
//! Six logical kinds of turn share one record type. Each kind has a
//! dedicated constructor so callers cannot mix content forms by accident.

use mockable::Clock;
use serde::{Deserialize, Serialize};

use super::{AiMessage, ExecutionMetadata, MessageId, RichMessage, Sender, SystemMessage};

/// One turn in a conversation.
///
/// # Invariants
///
/// - at least one of `rich_content`, `text_content`, `ai_message` and
///   `system_message` is present
/// - `ai_message_json`, when present, is exactly what the provider produced
/// - messages are immutable once built
///
/// # Examples
///
/// ```
/// use assistant_core::session::domain::{Sender, SessionMessage};
/// use mockable::DefaultClock;
///
/// let reply = SessionMessage::ai_reply(r#"{"preText":"hi"}"#, &DefaultClock)
///     .expect("valid reply");
/// assert_eq!(reply.sender(), Sender::Ai);
/// assert_eq!(reply.ai_message_json(), Some(r#"{"preText":"hi"}"#));
/// assert_eq!(reply.ai_message().map(|m| m.pre_text.as_str()), Some("hi"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PersistedSessionMessage")]
pub struct SessionMessage {
    id: MessageId,
    timestamp: i64,
    sender: Sender,
    #[serde(skip_serializing_if = "Option::is_none")]
    rich_content: Option<RichMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ai_message: Option<AiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ai_message_json: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_message: Option<SystemMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    execution_metadata: Option<ExecutionMetadata>,
    exclude_from_prompt: bool,
}

/// Fields of a message read back from storage.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSessionMessage {
    /// Message identifier.
    pub id: MessageId,
    /// Creation time, epoch millis.
    pub timestamp: i64,
    /// Originator.
    pub sender: Sender,
    /// Rich user content.
    pub rich_content: Option<RichMessage>,
    /// Plain text content.
    pub text_content: Option<String>,
    /// Parsed AI reply.
    pub ai_message: Option<AiMessage>,
    /// Raw AI payload.
    pub ai_message_json: Option<String>,
    /// System message.
    pub system_message: Option<SystemMessage>,
    /// Automation metadata.
    pub execution_metadata: Option<ExecutionMetadata>,
    /// Whether the message is hidden from prompt history.
    #[serde(default)]
    pub exclude_from_prompt: bool,
}

impl TryFrom<PersistedSessionMessage> for SessionMessage {
    type Error = SessionMessageError;

    fn try_from(persisted: PersistedSessionMessage) -> Result<Self, Self::Error> {
        Self::from_persisted(persisted)
    }
}

impl SessionMessage {
    /// Message skeleton with no content; callers must set a primary form.
    fn skeleton(sender: Sender, clock: &impl Clock) -> Self {
        Self {
            id: MessageId::generate(),
            timestamp: clock.utc().timestamp_millis(),
            sender,
            rich_content: None,
            text_content: None,
            ai_message: None,
            ai_message_json: None,
            system_message: None,
            execution_metadata: None,
            exclude_from_prompt: false,
        }
    }

    /// User chat message with enrichments.
    #[must_use]
    pub fn user_chat(content: RichMessage, clock: &impl Clock) -> Self {
        Self {
            rich_content: Some(content),
            ..Self::skeleton(Sender::User, clock)
        }
    }

    /// The user's plain-text answer to an embedded communication module.
    #[must_use]
    pub fn module_response(text: impl Into<String>, clock: &impl Clock) -> Self {
        Self {
            text_content: Some(text.into()),
            ..Self::skeleton(Sender::User, clock)
        }
    }

    /// Structured AI reply, parsed from the raw provider payload.
    ///
    /// # Errors
    ///
    /// Returns [`SessionMessageError::InvalidAiPayload`] if `raw_json` does
    /// not decode as an [`AiMessage`].
    pub fn ai_reply(
        raw_json: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, SessionMessageError> {
        Self::builder(Sender::Ai).with_ai_json(raw_json)?.build(clock)
    }

    /// User-editable prompt that triggered an automation run.
    #[must_use]
    pub fn automation_prompt(
        content: RichMessage,
        metadata: ExecutionMetadata,
        clock: &impl Clock,
    ) -> Self {
        Self {
            rich_content: Some(content),
            execution_metadata: Some(metadata),
            ..Self::skeleton(Sender::User, clock)
        }
    }

    /// AI reply recorded while executing an automation.
    ///
    /// # Errors
    ///
    /// Returns [`SessionMessageError::InvalidAiPayload`] if `raw_json` does
    /// not decode as an [`AiMessage`].
    pub fn automation_execution(
        raw_json: impl Into<String>,
        metadata: ExecutionMetadata,
        clock: &impl Clock,
    ) -> Result<Self, SessionMessageError> {
        Self::builder(Sender::Ai)
            .with_ai_json(raw_json)?
            .with_execution_metadata(metadata)
            .build(clock)
    }

    /// Success banner shown after actions ran. Never replayed to the provider.
    #[must_use]
    pub fn post_action_notice(text: impl Into<String>, clock: &impl Clock) -> Self {
        Self {
            text_content: Some(text.into()),
            exclude_from_prompt: true,
            ..Self::skeleton(Sender::Ai, clock)
        }
    }

    /// System message reporting operation results or status.
    #[must_use]
    pub fn system(message: SystemMessage, clock: &impl Clock) -> Self {
        Self {
            system_message: Some(message),
            ..Self::skeleton(Sender::System, clock)
        }
    }

    /// Returns a builder for messages from `sender`.
    #[must_use]
    pub fn builder(sender: Sender) -> SessionMessageBuilder {
        SessionMessageBuilder::new(sender)
    }

    /// Reconstructs a message from stored fields.
    ///
    /// # Errors
    ///
    /// Returns [`SessionMessageError::EmptyContent`] if no primary content
    /// form is present.
    pub fn from_persisted(persisted: PersistedSessionMessage) -> Result<Self, SessionMessageError> {
        let message = Self {
            id: persisted.id,
            timestamp: persisted.timestamp,
            sender: persisted.sender,
            rich_content: persisted.rich_content,
            text_content: persisted.text_content,
            ai_message: persisted.ai_message,
            ai_message_json: persisted.ai_message_json,
            system_message: persisted.system_message,
            execution_metadata: persisted.execution_metadata,
            exclude_from_prompt: persisted.exclude_from_prompt,
        };
        if message.has_primary_content() {
            Ok(message)
        } else {
            Err(SessionMessageError::EmptyContent)
        }
    }

    const fn has_primary_content(&self) -> bool {
        self.rich_content.is_some()
            || self.text_content.is_some()
            || self.ai_message.is_some()
            || self.system_message.is_some()
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> &MessageId {
        &self.id
    }

    /// Returns the creation time in epoch millis.
    #[must_use]
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Returns the originator.
    #[must_use]
    pub const fn sender(&self) -> Sender {
        self.sender
    }

    /// Returns rich user content.
    #[must_use]
    pub const fn rich_content(&self) -> Option<&RichMessage> {
        self.rich_content.as_ref()
    }

    /// Returns plain text content.
    #[must_use]
    pub fn text_content(&self) -> Option<&str> {
        self.text_content.as_deref()
    }

    /// Returns the parsed AI reply.
    #[must_use]
    pub const fn ai_message(&self) -> Option<&AiMessage> {
        self.ai_message.as_ref()
    }

    /// Returns the raw AI payload, byte-identical to the provider's output.
    #[must_use]
    pub fn ai_message_json(&self) -> Option<&str> {
        self.ai_message_json.as_deref()
    }

    /// Returns the system message.
    #[must_use]
    pub const fn system_message(&self) -> Option<&SystemMessage> {
        self.system_message.as_ref()
    }

    /// Returns the automation metadata.
    #[must_use]
    pub const fn execution_metadata(&self) -> Option<&ExecutionMetadata> {
        self.execution_metadata.as_ref()
    }

    /// Returns `true` if the message must never be replayed to the provider.
    #[must_use]
    pub const fn is_excluded_from_prompt(&self) -> bool {
        self.exclude_from_prompt
    }
}

/// Builder for [`SessionMessage`]s not covered by the kind constructors.
#[derive(Debug, Clone)]
pub struct SessionMessageBuilder {
    id: Option<MessageId>,
    timestamp: Option<i64>,
    sender: Sender,
    rich_content: Option<RichMessage>,
    text_content: Option<String>,
    ai_message: Option<AiMessage>,
    ai_message_json: Option<String>,
    system_message: Option<SystemMessage>,
    execution_metadata: Option<ExecutionMetadata>,
    exclude_from_prompt: bool,
}

impl SessionMessageBuilder {
    /// Creates a builder for messages from `sender`.
    #[must_use]
    pub const fn new(sender: Sender) -> Self {
        Self {
            id: None,
            timestamp: None,
            sender,
            rich_content: None,
            text_content: None,
            ai_message: None,
            ai_message_json: None,
            system_message: None,
            execution_metadata: None,
            exclude_from_prompt: false,
        }
    }

    /// Uses a specific identifier instead of a generated one.
    #[must_use]
    pub fn with_id(mut self, id: MessageId) -> Self {
        self.id = Some(id);
        self
    }

    /// Uses a specific timestamp (epoch millis) instead of the clock.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets rich user content.
    #[must_use]
    pub fn with_rich_content(mut self, content: RichMessage) -> Self {
        self.rich_content = Some(content);
        self
    }

    /// Sets plain text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    /// Sets a parsed AI reply together with the raw payload it came from.
    #[must_use]
    pub fn with_ai_message(mut self, message: AiMessage, raw_json: impl Into<String>) -> Self {
        self.ai_message = Some(message);
        self.ai_message_json = Some(raw_json.into());
        self
    }

    /// Parses the raw AI payload and keeps both forms.
    ///
    /// # Errors
    ///
    /// Returns [`SessionMessageError::InvalidAiPayload`] if the payload does
    /// not decode.
    pub fn with_ai_json(self, raw_json: impl Into<String>) -> Result<Self, SessionMessageError> {
        let raw = raw_json.into();
        let parsed = AiMessage::from_json(&raw)
            .map_err(|e| SessionMessageError::InvalidAiPayload(e.to_string()))?;
        Ok(self.with_ai_message(parsed, raw))
    }

    /// Sets a system message.
    #[must_use]
    pub fn with_system_message(mut self, message: SystemMessage) -> Self {
        self.system_message = Some(message);
        self
    }

    /// Attaches automation metadata.
    #[must_use]
    pub fn with_execution_metadata(mut self, metadata: ExecutionMetadata) -> Self {
        self.execution_metadata = Some(metadata);
        self
    }

    /// Marks the message as UI-only.
    #[must_use]
    pub fn exclude_from_prompt(mut self) -> Self {
        self.exclude_from_prompt = true;
        self
    }

    /// Builds the message.
    ///
    /// # Errors
    ///
    /// Returns [`SessionMessageError::EmptyContent`] if no primary content
    /// form was set.
    pub fn build(self, clock: &impl Clock) -> Result<SessionMessage, SessionMessageError> {
        let timestamp = self
            .timestamp
            .unwrap_or_else(|| clock.utc().timestamp_millis());
        SessionMessage::from_persisted(PersistedSessionMessage {
            id: self.id.unwrap_or_default(),
            timestamp,
            sender: self.sender,
            rich_content: self.rich_content,
            text_content: self.text_content,
            ai_message: self.ai_message,
            ai_message_json: self.ai_message_json,
            system_message: self.system_message,
            execution_metadata: self.execution_metadata,
            exclude_from_prompt: self.exclude_from_prompt,
        })
    }
}

/// Errors that can occur when building a session message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionMessageError {
    /// No primary content form was supplied.
    #[error("message must carry rich content, text, an AI reply or a system message")]
    EmptyContent,

    /// The raw AI payload could not be decoded.
    #[error("invalid AI payload: {0}")]
    InvalidAiPayload(String),
}
