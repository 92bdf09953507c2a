//! Command protocol: the universal action-invocation format.
//!
//! Every request to act on the assistant's data, whether it comes from the
//! UI, from an AI provider or from internal automation, is a
//! [`domain::Command`]. Executing one yields exactly one
//! [`domain::CommandResult`].
//!
//! # Architecture
//!
//! - **Domain**: [`domain::Command`], [`domain::CommandResult`],
//!   [`domain::CommandStatus`], [`domain::ParamValue`]
//! - **Parser**: JSON conversion with aggregated batch validation
//!   ([`parser::parse_commands`])
//! - **Ports**: [`ports::Coordinator`] and [`ports::ActionHandler`]
//! - **Adapters**: [`adapters::ActionRouter`]
//! - **Services**: [`services::CommandExecutor`]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod parser;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
