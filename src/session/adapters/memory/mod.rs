//! In-memory adapter implementations.
//!
//! Thread-safe stand-ins for durable storage, used by tests and by
//! embedders that do not need persistence.

mod message_store;
mod usage_ledger;

pub use message_store::InMemoryMessageStore;
pub use usage_ledger::InMemoryUsageLedger;
