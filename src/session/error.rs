//! Storage error types for the session subsystem.

use super::domain::MessageId;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by message and usage storage.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// A message with this ID already exists.
    #[error("duplicate message: {0}")]
    Duplicate(MessageId),

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(Arc<dyn std::error::Error + Send + Sync>),

    /// A stored field could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The store could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// The background write task was aborted before finishing.
    #[error("storage task failed: {0}")]
    Task(String),
}

impl StorageError {
    /// Creates a database error from any error type.
    #[must_use]
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Database(Arc::new(err))
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }
}

impl From<diesel::result::Error> for StorageError {
    fn from(err: diesel::result::Error) -> Self {
        Self::database(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
