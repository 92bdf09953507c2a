//! Storable form of a session message.
//!
//! Each structured field is serialised into its own text slot so that a
//! missing field stays `NULL` instead of becoming a default instance. The raw
//! AI payload is stored as given.

use serde::{Serialize, de::DeserializeOwned};

use crate::session::{
    domain::{MessageId, PersistedSessionMessage, Sender, SessionId, SessionMessage},
    error::StorageError,
};

/// A session message with structured fields pre-serialised to JSON text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntity {
    /// Message identifier.
    pub id: String,
    /// Owning session.
    pub session_id: String,
    /// Creation time, epoch millis.
    pub timestamp: i64,
    /// Originator (`USER`, `AI` or `SYSTEM`).
    pub sender: String,
    /// Serialised rich user content.
    pub rich_content: Option<String>,
    /// Plain text content.
    pub text_content: Option<String>,
    /// Serialised parsed AI reply.
    pub ai_message: Option<String>,
    /// Raw AI payload, verbatim.
    pub ai_message_json: Option<String>,
    /// Serialised system message.
    pub system_message: Option<String>,
    /// Serialised automation metadata.
    pub execution_metadata: Option<String>,
    /// Whether the message is hidden from prompt history.
    pub exclude_from_prompt: bool,
}

impl MessageEntity {
    /// Converts a domain message into its storable form.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] if a structured field cannot
    /// be encoded.
    pub fn try_from_domain(
        session_id: &SessionId,
        message: &SessionMessage,
    ) -> Result<Self, StorageError> {
        Ok(Self {
            id: message.id().as_str().to_owned(),
            session_id: session_id.as_str().to_owned(),
            timestamp: message.timestamp(),
            sender: message.sender().as_str().to_owned(),
            rich_content: encode(message.rich_content())?,
            text_content: message.text_content().map(str::to_owned),
            ai_message: encode(message.ai_message())?,
            ai_message_json: message.ai_message_json().map(str::to_owned),
            system_message: encode(message.system_message())?,
            execution_metadata: encode(message.execution_metadata())?,
            exclude_from_prompt: message.is_excluded_from_prompt(),
        })
    }

    /// Rebuilds the domain message.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] if a slot does not decode or
    /// the decoded message carries no content.
    pub fn into_domain(self) -> Result<SessionMessage, StorageError> {
        let sender = Sender::try_from(self.sender.as_str())
            .map_err(|e| StorageError::serialization(e.to_string()))?;
        SessionMessage::from_persisted(PersistedSessionMessage {
            id: MessageId::new(self.id),
            timestamp: self.timestamp,
            sender,
            rich_content: decode(self.rich_content.as_deref())?,
            text_content: self.text_content,
            ai_message: decode(self.ai_message.as_deref())?,
            ai_message_json: self.ai_message_json,
            system_message: decode(self.system_message.as_deref())?,
            execution_metadata: decode(self.execution_metadata.as_deref())?,
            exclude_from_prompt: self.exclude_from_prompt,
        })
        .map_err(|e| StorageError::serialization(e.to_string()))
    }

    /// Returns the message identifier.
    #[must_use]
    pub fn message_id(&self) -> MessageId {
        MessageId::new(self.id.as_str())
    }
}

fn encode<T: Serialize>(value: Option<&T>) -> Result<Option<String>, StorageError> {
    value
        .map(serde_json::to_string)
        .transpose()
        .map_err(StorageError::from)
}

fn decode<T: DeserializeOwned>(slot: Option<&str>) -> Result<Option<T>, StorageError> {
    slot.map(serde_json::from_str)
        .transpose()
        .map_err(StorageError::from)
}
