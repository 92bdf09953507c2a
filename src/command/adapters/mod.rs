//! In-process adapters for the command ports.

pub mod router;

pub use router::{ActionRouter, DuplicateActionError};
