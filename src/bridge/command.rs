//! Command channel handlers.
//!
//! A single execution endpoint dispatching through the command registry,
//! plus health and command discovery. Not idempotent in general; callers
//! must not blindly retry on timeout.

use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::data;
use super::routes::{AppState, RouteEntry, RouteRequest};
use crate::commands::{CommandError, CommandRegistry, CommandResult};

/// Route table for the command channel.
pub fn routes() -> Vec<RouteEntry> {
    vec![
        RouteEntry::get("/api/health", data::health),
        RouteEntry::get("/api/commands", list_commands),
        RouteEntry::post("/api/execute-command", execute_command),
    ]
}

/// Body of `POST /api/execute-command`.
#[derive(Debug, Deserialize)]
struct ExecuteRequest {
    command: String,
    #[serde(default, alias = "arguments")]
    args: serde_json::Value,
}

fn list_commands(_state: &AppState, _req: &RouteRequest) -> CommandResult {
    let commands = CommandRegistry::describe()
        .into_iter()
        .map(|(name, description)| json!({ "name": name, "description": description }))
        .collect::<Vec<_>>();
    Ok(json!({ "count": commands.len(), "commands": commands }))
}

fn execute_command(state: &AppState, req: &RouteRequest) -> CommandResult {
    let body = req
        .body
        .as_ref()
        .ok_or_else(|| CommandError::invalid_arguments("missing JSON request body"))?;
    let request: ExecuteRequest = serde_json::from_value(body.clone())
        .map_err(|e| CommandError::invalid_arguments(e.to_string()))?;

    info!(command = %request.command, "executing command");
    // The write lock is held for the whole dispatch, so the mutation is
    // serialized against every other request on either channel.
    let mut store = state.write_store()?;
    CommandRegistry::dispatch(&mut store, &request.command, request.args)
}
