//! Command definitions.
//!
//! One file per command family. Each command declares its wire `NAME`, a
//! params struct describing its argument shape, and an `execute` that runs
//! resolver, validator and store mutation in that order.

pub mod element;
pub mod lookup;
pub mod object;
pub mod property;
pub mod reorder;
pub mod workflow;

use serde::de::DeserializeOwned;

use super::error::CommandError;
use crate::model::Named;

pub use element::{AddButtonCommand, AddColumnCommand, AddOutputVariableCommand, AddParameterCommand};
pub use lookup::AddLookupItemCommand;
pub use object::{CreateObjectCommand, DeleteObjectCommand, UpdateObjectCommand};
pub use property::{AddPropertyCommand, RemovePropertyCommand, UpdatePropertyCommand};
pub use reorder::MoveElementCommand;
pub use workflow::{CreateWorkflowCommand, DeleteWorkflowCommand};

/// Deserialize command arguments into the command's declared shape.
pub(crate) fn parse_args<T: DeserializeOwned>(args: serde_json::Value) -> Result<T, CommandError> {
    serde_json::from_value(args).map_err(|e| CommandError::invalid_arguments(e.to_string()))
}

/// Case-insensitive position lookup in a named list.
pub(crate) fn position_of<T: Named>(list: &[T], name: &str) -> Option<usize> {
    list.iter()
        .position(|el| crate::model::document::names_collide(el.entity_name(), name))
}

/// Serialize a payload fragment, mapping the (unreachable in practice)
/// failure into an internal error instead of a panic.
pub(crate) fn to_payload<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, CommandError> {
    serde_json::to_value(value).map_err(|e| CommandError::internal(e.to_string()))
}
