//! Route registry.
//!
//! A declarative table of (method, path) → handler entries per channel,
//! folded into an axum `Router` by a single build function. Adding an
//! endpoint is a pure data addition to the channel's table; no dispatch
//! conditionals anywhere.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::{MethodFilter, on},
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use super::envelope;
use crate::commands::CommandError;
use crate::core::config::Config;
use crate::model::DocumentStore;

/// The document store as shared by both channels. One writer at a time;
/// handler bodies run synchronously under the lock, so no reader ever
/// observes a half-applied mutation.
pub type SharedStore = Arc<RwLock<DocumentStore>>;

/// Which channel a listener serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Data,
    Command,
}

impl ChannelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Command => "command",
        }
    }
}

/// State shared across one channel's handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub config: Arc<Config>,
    pub channel: ChannelKind,
    /// Port actually bound, surfaced via the health endpoint.
    pub port: u16,
}

impl AppState {
    /// Read access to the store; a poisoned lock becomes an internal error
    /// instead of a panic.
    pub fn read_store(&self) -> Result<RwLockReadGuard<'_, DocumentStore>, CommandError> {
        self.store
            .read()
            .map_err(|_| CommandError::internal("document store lock poisoned"))
    }

    pub fn write_store(&self) -> Result<RwLockWriteGuard<'_, DocumentStore>, CommandError> {
        self.store
            .write()
            .map_err(|_| CommandError::internal("document store lock poisoned"))
    }
}

/// The inbound request as handlers see it.
pub struct RouteRequest {
    pub query: HashMap<String, String>,
    pub body: Option<serde_json::Value>,
}

impl RouteRequest {
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(|s| s.as_str())
    }
}

/// Uniform handler shape: synchronous, store access through `AppState`.
pub type RouteHandler = fn(&AppState, &RouteRequest) -> Result<serde_json::Value, CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMethod {
    Get,
    Post,
}

/// One row of a channel's route table.
pub struct RouteEntry {
    pub method: RouteMethod,
    pub path: &'static str,
    pub handler: RouteHandler,
}

impl RouteEntry {
    pub const fn get(path: &'static str, handler: RouteHandler) -> Self {
        Self {
            method: RouteMethod::Get,
            path,
            handler,
        }
    }

    pub const fn post(path: &'static str, handler: RouteHandler) -> Self {
        Self {
            method: RouteMethod::Post,
            path,
            handler,
        }
    }
}

/// Fold a route table into an axum router and apply the channel layers.
pub fn build_router(state: AppState, table: Vec<RouteEntry>) -> Router {
    let mut router = Router::new();
    for entry in table {
        let handler = entry.handler;
        let filter = match entry.method {
            RouteMethod::Get => MethodFilter::GET,
            RouteMethod::Post => MethodFilter::POST,
        };
        router = router.route(
            entry.path,
            on(
                filter,
                move |State(state): State<AppState>,
                      Query(query): Query<HashMap<String, String>>,
                      body: Option<Json<serde_json::Value>>| async move {
                    let request = RouteRequest {
                        query,
                        body: body.map(|Json(value)| value),
                    };
                    respond(handler(&state, &request))
                },
            ),
        );
    }

    let enable_cors = state.config.bridge.enable_cors;
    let mut app = router.with_state(state);
    if enable_cors {
        // Both ends run on the same trusted host; permissive CORS is fine.
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }
    app.layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
}

fn respond(result: Result<serde_json::Value, CommandError>) -> impl IntoResponse {
    match result {
        Ok(payload) => (axum::http::StatusCode::OK, Json(envelope::success(payload))),
        Err(err) => {
            if matches!(err, CommandError::Internal(_)) {
                error!("handler failed: {err}");
            }
            (envelope::status_for(&err), Json(envelope::failure(&err)))
        }
    }
}

/// Outermost boundary: a panicking handler becomes a generic failure body
/// instead of killing the listener.
fn handle_panic(panic: Box<dyn std::any::Any + Send + 'static>) -> axum::response::Response {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    error!("handler panicked: {detail}");
    (
        axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "success": false,
            "error": "internal",
            "message": "internal server error",
        })),
    )
        .into_response()
}
