//! Structured content forms a session message can carry.
//!
//! A message holds exactly one primary form: rich user content, plain text,
//! a parsed AI reply, or a system message. The raw AI payload is kept
//! alongside the parsed reply and is not a primary form.

use serde::{Deserialize, Serialize};

use crate::command::domain::{Command, CommandResult};

/// What an enrichment points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrichmentKind {
    /// A zone, the container grouping tool instances.
    Zone,
    /// A configured tool instance (tracking, journal, notes...).
    ToolInstance,
    /// A time period the user referred to.
    Period,
    /// Any other data reference.
    Data,
}

/// A reference the user attached to a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrichment {
    /// What the reference points at.
    pub kind: EnrichmentKind,
    /// Identifier of the referenced object.
    pub target: String,
    /// Label shown in the chat bubble.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Enrichment {
    /// Creates an enrichment without a label.
    #[must_use]
    pub fn new(kind: EnrichmentKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            label: None,
        }
    }

    /// Sets the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// User chat content with enrichments.
///
/// `linear_text` is the message flattened to plain text, which is what gets
/// replayed to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichMessage {
    /// The message as plain text.
    pub linear_text: String,
    /// References attached to the message.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enrichments: Vec<Enrichment>,
}

impl RichMessage {
    /// Creates rich content with no enrichments.
    #[must_use]
    pub fn new(linear_text: impl Into<String>) -> Self {
        Self {
            linear_text: linear_text.into(),
            enrichments: Vec::new(),
        }
    }

    /// Adds an enrichment.
    #[must_use]
    pub fn with_enrichment(mut self, enrichment: Enrichment) -> Self {
        self.enrichments.push(enrichment);
        self
    }
}

/// An interactive element the AI embeds in a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationModule {
    /// Module type, e.g. `MULTIPLE_CHOICE` or `VALIDATION`.
    pub kind: String,
    /// The question put to the user.
    pub question: String,
    /// Offered answers, empty for free-text modules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// A parsed AI reply.
///
/// Decoded from the provider's JSON payload; only `preText` is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiMessage {
    /// Text shown before any actions.
    pub pre_text: String,
    /// Commands the AI wants executed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Command>,
    /// Text shown after the actions have run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_text: Option<String>,
    /// Embedded interactive modules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<CommunicationModule>,
}

impl AiMessage {
    /// Creates a reply consisting only of text.
    #[must_use]
    pub fn text(pre_text: impl Into<String>) -> Self {
        Self {
            pre_text: pre_text.into(),
            actions: Vec::new(),
            post_text: None,
            modules: Vec::new(),
        }
    }

    /// Decodes a provider payload.
    ///
    /// # Errors
    ///
    /// Returns the decoder error if the payload is not a valid reply.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Returns `true` if the reply asks for commands to run.
    #[must_use]
    pub fn has_actions(&self) -> bool {
        !self.actions.is_empty()
    }
}

/// Category of a system message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemMessageKind {
    /// Results of data queries requested by the AI.
    DataQuery,
    /// Results of actions executed for the AI.
    Actions,
    /// The AI reply could not be decoded.
    FormatError,
    /// An automatic-round limit was hit.
    LimitReached,
    /// The provider could not be reached.
    NetworkError,
    /// The session timed out waiting.
    SessionTimeout,
    /// The user interrupted processing.
    Interrupted,
}

/// An operation-result or status message produced by the app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemMessage {
    /// Category.
    pub kind: SystemMessageKind,
    /// One-line summary, replayed to the provider.
    pub summary: String,
    /// Per-command outcomes, when the message reports executed commands.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<CommandResult>,
}

impl SystemMessage {
    /// Creates a system message without command results.
    #[must_use]
    pub fn new(kind: SystemMessageKind, summary: impl Into<String>) -> Self {
        Self {
            kind,
            summary: summary.into(),
            results: Vec::new(),
        }
    }

    /// Attaches command outcomes.
    #[must_use]
    pub fn with_results(mut self, results: Vec<CommandResult>) -> Self {
        self.results = results;
        self
    }
}
