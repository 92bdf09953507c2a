//! Command execution through a coordinator.

use std::sync::Arc;

use crate::command::domain::{Command, CommandResult, CommandStatus};
use crate::command::parser::parse_commands;
use crate::command::ports::Coordinator;

/// Executes commands against a [`Coordinator`] and correlates the results.
#[derive(Debug, Clone)]
pub struct CommandExecutor<C>
where
    C: Coordinator,
{
    coordinator: Arc<C>,
}

impl<C> CommandExecutor<C>
where
    C: Coordinator,
{
    /// Creates a new executor.
    #[must_use]
    pub const fn new(coordinator: Arc<C>) -> Self {
        Self { coordinator }
    }

    /// Executes one command, echoing its identifier into the result.
    pub async fn execute(&self, command: &Command) -> CommandResult {
        let result = self
            .coordinator
            .process_action(command.action(), command.params())
            .await;
        match command.id() {
            Some(id) => result.with_command_id(id),
            None => result,
        }
    }

    /// Executes a batch in order, tagging each result with its index.
    ///
    /// A `VALIDATION_REQUIRED` result pauses the batch: the remaining
    /// commands are not dispatched and are reported as `CANCELLED`.
    pub async fn execute_batch(&self, commands: &[Command]) -> Vec<CommandResult> {
        let mut results = Vec::with_capacity(commands.len());
        let mut paused = false;

        for (index, command) in commands.iter().enumerate() {
            let result = if paused {
                skipped(command)
            } else {
                self.execute(command).await
            };
            paused = paused || result.status().is_control_state();
            results.push(result.with_command_index(index));
        }

        results
    }

    /// Parses a JSON batch and executes it.
    ///
    /// A parse failure yields a single `INVALID_FORMAT` result carrying the
    /// parser's message instead of an error.
    pub async fn execute_json(&self, text: &str) -> Vec<CommandResult> {
        match parse_commands(text) {
            Ok(commands) => self.execute_batch(&commands).await,
            Err(error) => {
                tracing::warn!(error = %error, "rejected malformed command batch");
                vec![CommandResult::failure(
                    CommandStatus::InvalidFormat,
                    error.to_string(),
                )]
            }
        }
    }
}

fn skipped(command: &Command) -> CommandResult {
    let result = CommandResult::failure(
        CommandStatus::Cancelled,
        "not executed: awaiting validation of an earlier command",
    );
    match command.id() {
        Some(id) => result.with_command_id(id),
        None => result,
    }
}
