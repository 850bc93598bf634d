//! Shared helpers for bridge-backed tools.

use rmcp::model::{CallToolResult, Content};
use serde_json::Value;

/// Convert a bridge envelope into a tool result.
///
/// Envelopes carry their own `success` flag; failures (including degraded
/// `{"success": false, "note": ...}` responses) become error results with
/// the full envelope as text so the caller sees violations or the note.
pub fn envelope_result(body: Value) -> CallToolResult {
    let success = body["success"].as_bool().unwrap_or(false);
    let text = serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string());
    if success {
        CallToolResult::success(vec![Content::text(text)])
    } else {
        CallToolResult::error(vec![Content::text(text)])
    }
}

/// Insert a key only when the value is present.
pub fn set_opt(args: &mut serde_json::Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(value) = value {
        args.insert(key.to_string(), Value::String(value));
    }
}

/// Wire flags are string literals, not JSON booleans.
pub fn flag(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}
