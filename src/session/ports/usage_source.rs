//! Port for reading accumulated token usage.

use async_trait::async_trait;

use crate::session::{
    domain::{SessionId, TokenUsage},
    error::StorageError,
};

/// Token usage recorded for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUsage {
    /// Provider the tokens were billed by.
    pub provider_id: String,
    /// Accumulated counts.
    pub usage: TokenUsage,
}

/// Source of per-session token usage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsageSource: Send + Sync {
    /// Returns the usage of a session, or `None` if nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the usage cannot be read.
    async fn session_usage(&self, session_id: &SessionId) -> Result<Option<SessionUsage>, StorageError>;
}
