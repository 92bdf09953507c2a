//! Dispatch boundary between the command layer and application services.

use async_trait::async_trait;

use crate::command::domain::{CommandResult, ParamMap};

/// Routes an action to whichever service owns it.
///
/// Implementations never fail with an error: every outcome, including an
/// unknown action, is expressed as a [`CommandResult`] status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Coordinator: Send + Sync {
    /// Executes `action` with `params` and reports the outcome.
    async fn process_action(&self, action: &str, params: &ParamMap) -> CommandResult;
}

/// Handles a single action on behalf of a coordinator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Executes the action with the supplied parameters.
    async fn handle(&self, params: &ParamMap) -> CommandResult;
}
