//! Domain types for AI sessions.
//!
//! Pure data with no infrastructure dependencies. Messages are immutable
//! after construction and serialisable via serde.

mod content;
mod execution;
mod ids;
mod message;
mod sender;
mod session;
mod usage;

pub use content::{
    AiMessage, CommunicationModule, Enrichment, EnrichmentKind, RichMessage, SystemMessage,
    SystemMessageKind,
};
pub use execution::{ExecutionFeedback, ExecutionMetadata, Rating, RatingOutOfRange};
pub use ids::{MessageId, SessionId};
pub use message::{
    PersistedSessionMessage, SessionMessage, SessionMessageBuilder, SessionMessageError,
};
pub use sender::{ParseSenderError, Sender};
pub use session::{
    AiSession, EndReason, ParseSessionStateError, ProviderBinding, SessionDomainError,
    SessionState, SessionType,
};
pub use usage::{format_usd, CostBreakdown, ModelPricing, TokenUsage};
