//! Application services for the command subsystem.

mod executor;

pub use executor::CommandExecutor;
