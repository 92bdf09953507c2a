//! Application services for AI sessions.

pub mod cost_query;
pub mod message_repository;
pub mod prompt_history;

pub use cost_query::{GET_COST_ACTION, SessionCostHandler};
pub use message_repository::{AiMessageRepository, MessageList, MessageStream};
pub use prompt_history::{PromptEntry, PromptHistory, PromptRole};
