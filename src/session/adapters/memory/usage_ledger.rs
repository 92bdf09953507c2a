//! In-memory implementation of the `UsageSource` port.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::session::{
    domain::{SessionId, TokenUsage},
    error::StorageError,
    ports::{SessionUsage, UsageSource},
};

/// Accumulates token usage per session in memory.
///
/// # Example
///
/// ```
/// use assistant_core::session::adapters::memory::InMemoryUsageLedger;
/// use assistant_core::session::domain::{SessionId, TokenUsage};
///
/// let ledger = InMemoryUsageLedger::new();
/// ledger
///     .record(&SessionId::new("s1"), "claude", TokenUsage::new(100, 0, 0, 20))
///     .expect("ledger lock");
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryUsageLedger {
    sessions: Arc<RwLock<HashMap<SessionId, SessionUsage>>>,
}

impl InMemoryUsageLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds usage for one provider call.
    ///
    /// The provider of the first call is kept; a session is bound to one
    /// provider for its lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Connection`] if the internal lock is poisoned.
    pub fn record(
        &self,
        session_id: &SessionId,
        provider_id: &str,
        usage: TokenUsage,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .sessions
            .write()
            .map_err(|e| StorageError::connection(format!("lock poisoned: {e}")))?;
        guard
            .entry(session_id.clone())
            .or_insert_with(|| SessionUsage {
                provider_id: provider_id.to_owned(),
                usage: TokenUsage::default(),
            })
            .usage
            .add(usage);
        Ok(())
    }
}

#[async_trait]
impl UsageSource for InMemoryUsageLedger {
    async fn session_usage(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<SessionUsage>, StorageError> {
        let guard = self
            .sessions
            .read()
            .map_err(|e| StorageError::connection(format!("lock poisoned: {e}")))?;
        Ok(guard.get(session_id).cloned())
    }
}
