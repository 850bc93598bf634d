//! Data channel handlers: read-only queries over the document store.
//!
//! Idempotent and side-effect free; safe to retry.

use serde_json::json;

use super::routes::{AppState, RouteEntry, RouteRequest};
use crate::commands::{CommandError, CommandResult};
use crate::model::document::normalized;

/// Route table for the data channel.
pub fn routes() -> Vec<RouteEntry> {
    vec![
        RouteEntry::get("/api/health", health),
        RouteEntry::get("/api/model", model),
        RouteEntry::get("/api/objects", objects),
        RouteEntry::get("/api/workflows", workflows),
        RouteEntry::get("/api/usages", usages),
    ]
}

pub fn health(state: &AppState, _req: &RouteRequest) -> CommandResult {
    let store = state.read_store()?;
    Ok(json!({
        "status": "ok",
        "channel": state.channel.as_str(),
        "port": state.port,
        "dirty": store.is_dirty(),
        "name": state.config.server.name,
        "version": state.config.server.version,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

fn model(state: &AppState, _req: &RouteRequest) -> CommandResult {
    let store = state.read_store()?;
    Ok(json!({
        "model": serde_json::to_value(store.model())
            .map_err(|e| CommandError::internal(e.to_string()))?,
        "dirty": store.is_dirty(),
    }))
}

fn objects(state: &AppState, req: &RouteRequest) -> CommandResult {
    let store = state.read_store()?;
    let name = req.query_param("name").map(normalized);
    let search = req.query_param("search").map(normalized);
    let lookup = match req.query_param("lookup") {
        Some("true") => Some(true),
        Some("false") => Some(false),
        Some(other) => {
            return Err(CommandError::invalid_arguments(format!(
                "'lookup' must be \"true\" or \"false\", got '{other}'"
            )));
        }
        None => None,
    };

    let matched = store
        .model()
        .iter_objects()
        .filter(|obj| {
            name.as_ref().is_none_or(|n| normalized(&obj.name) == *n)
                && search.as_ref().is_none_or(|s| normalized(&obj.name).contains(s.as_str()))
                && lookup.is_none_or(|flag| obj.is_lookup == flag)
        })
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CommandError::internal(e.to_string()))?;

    Ok(json!({ "count": matched.len(), "objects": matched }))
}

fn workflows(state: &AppState, req: &RouteRequest) -> CommandResult {
    let store = state.read_store()?;
    let owner = req.query_param("object").map(normalized);
    let kind = req.query_param("kind");

    let mut matched = Vec::new();
    for obj in store.model().iter_objects() {
        if owner.as_ref().is_some_and(|o| normalized(&obj.name) != *o) {
            continue;
        }
        for wf in &obj.workflows {
            if kind.is_some_and(|k| wf.kind().as_str() != k) {
                continue;
            }
            let mut body = serde_json::to_value(wf)
                .map_err(|e| CommandError::internal(e.to_string()))?;
            body["object"] = json!(obj.name);
            body["kind"] = json!(wf.kind().as_str());
            matched.push(body);
        }
    }

    Ok(json!({ "count": matched.len(), "workflows": matched }))
}

fn usages(state: &AppState, req: &RouteRequest) -> CommandResult {
    let object = req
        .query_param("object")
        .ok_or_else(|| CommandError::invalid_arguments("'object' query parameter is required"))?;
    let store = state.read_store()?;
    // Resolve first so an unknown name reports not_found, not an empty list.
    let object_ref = store.resolver().object(object)?;
    let stored_name = store.object(object_ref).name.clone();
    let usages = store.usages_of(&stored_name);
    Ok(json!({
        "object": stored_name,
        "count": usages.len(),
        "usages": serde_json::to_value(usages)
            .map_err(|e| CommandError::internal(e.to_string()))?,
    }))
}
