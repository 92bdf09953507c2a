//! Diesel row models for session messages.

use diesel::prelude::*;

use super::schema::session_messages;
use crate::session::adapters::entity::MessageEntity;

/// Query result row for session messages.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = session_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageRow {
    /// Message identifier.
    pub id: String,
    /// Owning session.
    pub session_id: String,
    /// Creation time, epoch millis.
    pub timestamp_ms: i64,
    /// Originator.
    pub sender: String,
    /// Serialised rich user content.
    pub rich_content: Option<String>,
    /// Plain text content.
    pub text_content: Option<String>,
    /// Serialised parsed AI reply.
    pub ai_message: Option<String>,
    /// Raw AI payload.
    pub ai_message_json: Option<String>,
    /// Serialised system message.
    pub system_message: Option<String>,
    /// Serialised automation metadata.
    pub execution_metadata: Option<String>,
    /// Hidden from prompt history.
    pub exclude_from_prompt: bool,
}

/// Insert model for session messages; `position` is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = session_messages)]
pub struct NewMessageRow {
    /// Message identifier.
    pub id: String,
    /// Owning session.
    pub session_id: String,
    /// Creation time, epoch millis.
    pub timestamp_ms: i64,
    /// Originator.
    pub sender: String,
    /// Serialised rich user content.
    pub rich_content: Option<String>,
    /// Plain text content.
    pub text_content: Option<String>,
    /// Serialised parsed AI reply.
    pub ai_message: Option<String>,
    /// Raw AI payload.
    pub ai_message_json: Option<String>,
    /// Serialised system message.
    pub system_message: Option<String>,
    /// Serialised automation metadata.
    pub execution_metadata: Option<String>,
    /// Hidden from prompt history.
    pub exclude_from_prompt: bool,
}

impl From<&MessageEntity> for NewMessageRow {
    fn from(entity: &MessageEntity) -> Self {
        Self {
            id: entity.id.clone(),
            session_id: entity.session_id.clone(),
            timestamp_ms: entity.timestamp,
            sender: entity.sender.clone(),
            rich_content: entity.rich_content.clone(),
            text_content: entity.text_content.clone(),
            ai_message: entity.ai_message.clone(),
            ai_message_json: entity.ai_message_json.clone(),
            system_message: entity.system_message.clone(),
            execution_metadata: entity.execution_metadata.clone(),
            exclude_from_prompt: entity.exclude_from_prompt,
        }
    }
}

impl From<MessageRow> for MessageEntity {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            session_id: row.session_id,
            timestamp: row.timestamp_ms,
            sender: row.sender,
            rich_content: row.rich_content,
            text_content: row.text_content,
            ai_message: row.ai_message,
            ai_message_json: row.ai_message_json,
            system_message: row.system_message,
            execution_metadata: row.execution_metadata,
            exclude_from_prompt: row.exclude_from_prompt,
        }
    }
}
