//! Uniform response envelope.
//!
//! Every channel response is `{success, ...payload fields, error?, message?}`.
//! Error responses add kind-specific detail (violation list, candidate list,
//! bounds) so a caller can correct everything in one round trip.

use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::commands::CommandError;

/// Wrap a success payload. Payload fields land at the top level of the
/// envelope next to `success`.
pub fn success(payload: Value) -> Value {
    match payload {
        Value::Object(mut map) => {
            map.insert("success".to_string(), Value::Bool(true));
            Value::Object(map)
        }
        other => json!({ "success": true, "data": other }),
    }
}

/// Wrap a command error.
pub fn failure(err: &CommandError) -> Value {
    let mut body = json!({
        "success": false,
        "error": err.kind(),
        "message": err.to_string(),
    });
    match err {
        CommandError::Validation(violations) => {
            body["violations"] = serde_json::to_value(violations).unwrap_or(Value::Null);
        }
        CommandError::Ambiguous { candidates, .. } => {
            body["ambiguous"] = Value::Bool(true);
            body["candidates"] = json!(candidates);
        }
        CommandError::Bounds { position, count } => {
            body["position"] = json!(position);
            body["count"] = json!(count);
        }
        _ => {}
    }
    body
}

/// HTTP status mirroring the error kind. The envelope stays the source of
/// truth; the status is a convenience for plain HTTP tooling.
pub fn status_for(err: &CommandError) -> StatusCode {
    match err {
        CommandError::NotFound { .. } => StatusCode::NOT_FOUND,
        CommandError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}
