//! In-memory implementation of the `MessageStore` port.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::session::{
    adapters::entity::MessageEntity,
    domain::{MessageId, SessionId},
    error::StorageError,
    ports::{MessageStore, StoreResult},
};

/// In-memory implementation of [`MessageStore`].
///
/// Entities are kept in insertion order, which is also the persisted order
/// for entities sharing a timestamp.
///
/// # Example
///
/// ```
/// use assistant_core::session::adapters::memory::InMemoryMessageStore;
///
/// let store = InMemoryMessageStore::new();
/// assert!(store.is_empty());
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryMessageStore {
    entities: Arc<RwLock<Vec<MessageEntity>>>,
}

impl InMemoryMessageStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entities.
    ///
    /// Returns `0` if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned(e: impl std::fmt::Display) -> StorageError {
    StorageError::connection(format!("lock poisoned: {e}"))
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn insert(&self, entity: &MessageEntity) -> StoreResult<()> {
        let mut guard = self.entities.write().map_err(poisoned)?;
        if guard.iter().any(|existing| existing.id == entity.id) {
            return Err(StorageError::Duplicate(entity.message_id()));
        }
        guard.push(entity.clone());
        Ok(())
    }

    async fn delete(&self, entity: &MessageEntity) -> StoreResult<()> {
        let mut guard = self.entities.write().map_err(poisoned)?;
        guard.retain(|existing| existing.id != entity.id);
        Ok(())
    }

    async fn get_message(&self, id: &MessageId) -> StoreResult<Option<MessageEntity>> {
        let guard = self.entities.read().map_err(poisoned)?;
        Ok(guard
            .iter()
            .find(|entity| entity.id == id.as_str())
            .cloned())
    }

    async fn get_messages_for_session(
        &self,
        session_id: &SessionId,
    ) -> StoreResult<Vec<MessageEntity>> {
        let guard = self.entities.read().map_err(poisoned)?;
        let mut entities: Vec<MessageEntity> = guard
            .iter()
            .filter(|entity| entity.session_id == session_id.as_str())
            .cloned()
            .collect();
        // Stable: equal timestamps keep insertion order.
        entities.sort_by_key(|entity| entity.timestamp);
        Ok(entities)
    }
}
