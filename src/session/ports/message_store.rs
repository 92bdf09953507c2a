//! Durable storage port for session messages.

use async_trait::async_trait;

use crate::session::{
    adapters::entity::MessageEntity,
    domain::{MessageId, SessionId},
    error::StorageError,
};

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StorageError>;

/// Durable storage for message entities.
///
/// The store is the source of truth; the repository's cache is derived from
/// it. Implementations must return a session's messages in the order they
/// were persisted, oldest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persists a new entity.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entity id already exists or the write
    /// fails.
    async fn insert(&self, entity: &MessageEntity) -> StoreResult<()>;

    /// Removes an entity.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    async fn delete(&self, entity: &MessageEntity) -> StoreResult<()>;

    /// Looks up one entity by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn get_message(&self, id: &MessageId) -> StoreResult<Option<MessageEntity>>;

    /// Returns every entity of a session in persisted order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn get_messages_for_session(&self, session_id: &SessionId)
    -> StoreResult<Vec<MessageEntity>>;
}
