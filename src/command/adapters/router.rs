//! In-process coordinator that dispatches actions to registered handlers.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::command::domain::{CommandResult, CommandStatus, ParamMap};
use crate::command::ports::{ActionHandler, Coordinator};

/// Error returned when a handler is registered twice for the same action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("a handler is already registered for action '{0}'")]
pub struct DuplicateActionError(pub String);

/// [`Coordinator`] backed by an explicit action → handler table.
///
/// The router is built once at start-up and shared by reference; there is no
/// global registry. Actions are matched exactly.
#[derive(Clone, Default)]
pub struct ActionRouter {
    handlers: HashMap<String, Arc<dyn ActionHandler>>,
}

impl ActionRouter {
    /// Creates a router with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `action`.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateActionError`] if `action` already has a handler.
    pub fn register(
        &mut self,
        action: impl Into<String>,
        handler: Arc<dyn ActionHandler>,
    ) -> Result<(), DuplicateActionError> {
        let name = action.into();
        if self.handlers.contains_key(&name) {
            return Err(DuplicateActionError(name));
        }
        self.handlers.insert(name, handler);
        Ok(())
    }

    /// Builder-style variant of [`ActionRouter::register`].
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateActionError`] if `action` already has a handler.
    pub fn with_handler(
        mut self,
        action: impl Into<String>,
        handler: Arc<dyn ActionHandler>,
    ) -> Result<Self, DuplicateActionError> {
        self.register(action, handler)?;
        Ok(self)
    }

    /// Returns `true` if a handler exists for `action`.
    #[must_use]
    pub fn handles(&self, action: &str) -> bool {
        self.handlers.contains_key(action)
    }

    /// Lists registered actions in sorted order.
    #[must_use]
    pub fn actions(&self) -> Vec<&str> {
        let mut actions: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        actions.sort_unstable();
        actions
    }
}

impl fmt::Debug for ActionRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRouter")
            .field("actions", &self.actions())
            .finish()
    }
}

#[async_trait]
impl Coordinator for ActionRouter {
    async fn process_action(&self, action: &str, params: &ParamMap) -> CommandResult {
        match self.handlers.get(action) {
            Some(handler) => handler.handle(params).await,
            None => {
                tracing::debug!(action, "no handler registered");
                CommandResult::failure(
                    CommandStatus::UnknownAction,
                    format!("no handler registered for action '{action}'"),
                )
            }
        }
    }
}
