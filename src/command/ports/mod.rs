//! Port trait definitions for the command subsystem.
//!
//! Routing commands to services is the coordinator's job; the command layer
//! only depends on the shape of the result it hands back.

pub mod coordinator;

pub use coordinator::{ActionHandler, Coordinator};

#[cfg(test)]
pub use coordinator::{MockActionHandler, MockCoordinator};
