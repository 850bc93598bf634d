//! Command dispatch domain.
//!
//! The command channel's single execution endpoint routes through
//! [`CommandRegistry`]; each named command lives in `definitions/` and runs
//! resolver → validator → store mutation, producing either a payload or a
//! [`CommandError`] for the response envelope.

pub mod definitions;
mod error;
mod registry;

pub use error::{CommandError, CommandResult};
pub use registry::CommandRegistry;
