//! Prompt history: the part of a conversation replayed to the provider.

use serde::{Deserialize, Serialize};

use crate::session::domain::{Sender, SessionMessage};

/// Role of a replayed turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    /// The user.
    User,
    /// The AI provider.
    Assistant,
    /// App-generated context such as command results.
    System,
}

impl From<Sender> for PromptRole {
    fn from(sender: Sender) -> Self {
        match sender {
            Sender::User => Self::User,
            Sender::Ai => Self::Assistant,
            Sender::System => Self::System,
        }
    }
}

/// One turn as sent back to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptEntry {
    /// Who produced the turn.
    pub role: PromptRole,
    /// Replayed content.
    pub content: String,
}

/// Builds prompt history from session messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptHistory;

impl PromptHistory {
    /// Returns the replayable turns of `messages`, in order.
    ///
    /// Messages flagged `exclude_from_prompt` are dropped and nothing else
    /// is. AI turns replay the raw provider payload so the provider sees
    /// exactly what it produced.
    #[must_use]
    pub fn from_messages(messages: &[SessionMessage]) -> Vec<PromptEntry> {
        messages
            .iter()
            .filter(|message| !message.is_excluded_from_prompt())
            .map(|message| PromptEntry {
                role: message.sender().into(),
                content: Self::content_of(message),
            })
            .collect()
    }

    fn content_of(message: &SessionMessage) -> String {
        if let Some(raw) = message.ai_message_json() {
            return raw.to_owned();
        }
        if let Some(parsed) = message.ai_message() {
            return serde_json::to_string(parsed).unwrap_or_else(|_| parsed.pre_text.clone());
        }
        if let Some(rich) = message.rich_content() {
            return rich.linear_text.clone();
        }
        if let Some(text) = message.text_content() {
            return text.to_owned();
        }
        message
            .system_message()
            .map(|system| system.summary.clone())
            .unwrap_or_default()
    }
}
