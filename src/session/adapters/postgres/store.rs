//! `PostgreSQL` implementation of the `MessageStore` port.

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use super::{
    models::{MessageRow, NewMessageRow},
    schema::session_messages,
};
use crate::session::{
    adapters::entity::MessageEntity,
    domain::{MessageId, SessionId},
    error::StorageError,
    ports::{MessageStore, StoreResult},
};

/// `PostgreSQL` connection pool type.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed message store.
///
/// All queries run on tokio's blocking pool.
///
/// # Example
///
/// ```ignore
/// use assistant_core::config::StoreConfig;
/// use assistant_core::session::adapters::postgres::PostgresMessageStore;
///
/// let pool = StoreConfig::from_env()?.build_pool()?;
/// let store = PostgresMessageStore::new(pool);
/// ```
#[derive(Debug, Clone)]
pub struct PostgresMessageStore {
    pool: PgPool,
}

impl PostgresMessageStore {
    /// Creates a store from a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(|e| StorageError::connection(e.to_string()))?;
            f(&mut connection)
        })
        .await
        .map_err(|e| StorageError::connection(format!("task join error: {e}")))?
    }
}

#[async_trait]
impl MessageStore for PostgresMessageStore {
    async fn insert(&self, entity: &MessageEntity) -> StoreResult<()> {
        let row = NewMessageRow::from(entity);
        let id = entity.message_id();
        self.run_blocking(move |connection| {
            diesel::insert_into(session_messages::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        StorageError::Duplicate(id)
                    }
                    _ => StorageError::database(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, entity: &MessageEntity) -> StoreResult<()> {
        let id = entity.id.clone();
        self.run_blocking(move |connection| {
            diesel::delete(session_messages::table.filter(session_messages::id.eq(id)))
                .execute(connection)?;
            Ok(())
        })
        .await
    }

    async fn get_message(&self, id: &MessageId) -> StoreResult<Option<MessageEntity>> {
        let lookup_id = id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = session_messages::table
                .filter(session_messages::id.eq(lookup_id))
                .select(MessageRow::as_select())
                .first::<MessageRow>(connection)
                .optional()?;
            Ok(row.map(MessageEntity::from))
        })
        .await
    }

    async fn get_messages_for_session(
        &self,
        session_id: &SessionId,
    ) -> StoreResult<Vec<MessageEntity>> {
        let owner = session_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = session_messages::table
                .filter(session_messages::session_id.eq(owner))
                .order((
                    session_messages::timestamp_ms.asc(),
                    session_messages::position.asc(),
                ))
                .select(MessageRow::as_select())
                .load::<MessageRow>(connection)?;
            Ok(rows.into_iter().map(MessageEntity::from).collect())
        })
        .await
    }
}
