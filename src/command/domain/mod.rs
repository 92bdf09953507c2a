//! Domain types for the command protocol.
//!
//! Commands, their results and parameter values are plain immutable data,
//! serialisable to the JSON wire format exchanged with the UI and with AI
//! providers.

mod command;
mod result;
mod value;

pub(crate) use command::RawCommand;
pub use command::Command;
pub use result::{CommandResult, CommandStatus};
pub use value::{ParamMap, ParamValue};
