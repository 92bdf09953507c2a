//! AI sessions: conversation threads with a remote language model.
//!
//! This module records each turn of a conversation as a
//! [`domain::SessionMessage`], persists it, and exposes the ordered message
//! list of every active session as a live stream.
//!
//! # Architecture
//!
//! - **Domain**: [`domain::SessionMessage`], [`domain::AiSession`],
//!   [`domain::SessionState`], token usage and pricing
//! - **Ports**: [`ports::MessageStore`] and [`ports::UsageSource`]
//! - **Adapters**: in-memory and `PostgreSQL` stores
//! - **Services**: [`services::AiMessageRepository`],
//!   [`services::PromptHistory`] and [`services::SessionCostHandler`]
//!
//! # Ordering
//!
//! [`services::AiMessageRepository::store_message`] completes the durable
//! write before the message becomes visible to observers. A failed write
//! leaves the cached list untouched and is reported to the caller.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
