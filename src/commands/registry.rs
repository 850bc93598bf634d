//! Command registry — central dispatch for the command channel.
//!
//! Maps an inbound command name to its definition. Adding a command means
//! adding a definition file and one match arm here; nothing in the bridge
//! layer changes.

use tracing::warn;

use super::definitions::{
    AddButtonCommand, AddColumnCommand, AddLookupItemCommand, AddOutputVariableCommand,
    AddParameterCommand, AddPropertyCommand, CreateObjectCommand, CreateWorkflowCommand,
    DeleteObjectCommand, DeleteWorkflowCommand, MoveElementCommand, RemovePropertyCommand,
    UpdateObjectCommand, UpdatePropertyCommand,
};
use super::error::{CommandError, CommandResult};
use crate::model::DocumentStore;

/// Dispatches named commands against one document store.
pub struct CommandRegistry;

impl CommandRegistry {
    /// All command names, the single source of truth for discovery.
    pub fn command_names() -> Vec<&'static str> {
        vec![
            CreateObjectCommand::NAME,
            UpdateObjectCommand::NAME,
            DeleteObjectCommand::NAME,
            AddPropertyCommand::NAME,
            UpdatePropertyCommand::NAME,
            RemovePropertyCommand::NAME,
            AddLookupItemCommand::NAME,
            CreateWorkflowCommand::NAME,
            DeleteWorkflowCommand::NAME,
            AddParameterCommand::NAME,
            AddButtonCommand::NAME,
            AddColumnCommand::NAME,
            AddOutputVariableCommand::NAME,
            MoveElementCommand::NAME,
        ]
    }

    /// Command names with their descriptions, for the discovery payload.
    pub fn describe() -> Vec<(&'static str, &'static str)> {
        vec![
            (CreateObjectCommand::NAME, CreateObjectCommand::DESCRIPTION),
            (UpdateObjectCommand::NAME, UpdateObjectCommand::DESCRIPTION),
            (DeleteObjectCommand::NAME, DeleteObjectCommand::DESCRIPTION),
            (AddPropertyCommand::NAME, AddPropertyCommand::DESCRIPTION),
            (UpdatePropertyCommand::NAME, UpdatePropertyCommand::DESCRIPTION),
            (RemovePropertyCommand::NAME, RemovePropertyCommand::DESCRIPTION),
            (AddLookupItemCommand::NAME, AddLookupItemCommand::DESCRIPTION),
            (CreateWorkflowCommand::NAME, CreateWorkflowCommand::DESCRIPTION),
            (DeleteWorkflowCommand::NAME, DeleteWorkflowCommand::DESCRIPTION),
            (AddParameterCommand::NAME, AddParameterCommand::DESCRIPTION),
            (AddButtonCommand::NAME, AddButtonCommand::DESCRIPTION),
            (AddColumnCommand::NAME, AddColumnCommand::DESCRIPTION),
            (AddOutputVariableCommand::NAME, AddOutputVariableCommand::DESCRIPTION),
            (MoveElementCommand::NAME, MoveElementCommand::DESCRIPTION),
        ]
    }

    /// Dispatch one command. The store lock is held by the caller for the
    /// whole call, so the mutation is serialized and atomic.
    pub fn dispatch(store: &mut DocumentStore, name: &str, args: serde_json::Value) -> CommandResult {
        match name {
            CreateObjectCommand::NAME => CreateObjectCommand::run(store, args),
            UpdateObjectCommand::NAME => UpdateObjectCommand::run(store, args),
            DeleteObjectCommand::NAME => DeleteObjectCommand::run(store, args),
            AddPropertyCommand::NAME => AddPropertyCommand::run(store, args),
            UpdatePropertyCommand::NAME => UpdatePropertyCommand::run(store, args),
            RemovePropertyCommand::NAME => RemovePropertyCommand::run(store, args),
            AddLookupItemCommand::NAME => AddLookupItemCommand::run(store, args),
            CreateWorkflowCommand::NAME => CreateWorkflowCommand::run(store, args),
            DeleteWorkflowCommand::NAME => DeleteWorkflowCommand::run(store, args),
            AddParameterCommand::NAME => AddParameterCommand::run(store, args),
            AddButtonCommand::NAME => AddButtonCommand::run(store, args),
            AddColumnCommand::NAME => AddColumnCommand::run(store, args),
            AddOutputVariableCommand::NAME => AddOutputVariableCommand::run(store, args),
            MoveElementCommand::NAME => MoveElementCommand::run(store, args),
            _ => {
                warn!("unknown command requested: {}", name);
                Err(CommandError::UnknownCommand(name.to_string()))
            }
        }
    }
}
