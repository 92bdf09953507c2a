//! Storage adapters for the session module.
//!
//! # Available Adapters
//!
//! - [`memory::InMemoryMessageStore`] and [`memory::InMemoryUsageLedger`]:
//!   thread-safe in-memory storage
//! - [`postgres::PostgresMessageStore`]: `PostgreSQL` persistence using
//!   Diesel
//!
//! [`entity::MessageEntity`] is the storable form shared by all message
//! stores.

pub mod entity;
pub mod memory;
pub mod postgres;
