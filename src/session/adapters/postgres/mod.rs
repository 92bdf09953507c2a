//! `PostgreSQL` adapter for message persistence.

mod models;
mod schema;
mod store;

pub use store::{PgPool, PostgresMessageStore};
