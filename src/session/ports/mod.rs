//! Port trait definitions for the session subsystem.
//!
//! Ports define what the session services need from infrastructure; the
//! adapters module provides in-memory and `PostgreSQL` implementations.

pub mod message_store;
pub mod usage_source;

pub use message_store::{MessageStore, StoreResult};
pub use usage_source::{SessionUsage, UsageSource};

#[cfg(test)]
pub use message_store::MockMessageStore;
#[cfg(test)]
pub use usage_source::MockUsageSource;
