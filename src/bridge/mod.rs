//! Dual HTTP bridge.
//!
//! Two independently-lifecycled listeners in the host process: a read-only
//! data channel and a command channel dispatching named mutations. Both
//! build from a declarative route table and share one document store.

mod bind;
pub mod command;
pub mod data;
pub mod envelope;
mod error;
mod routes;
mod service;

pub use bind::{RetryPolicy, bind_with_retry};
pub use error::{BridgeError, BridgeResult};
pub use routes::{
    AppState, ChannelKind, RouteEntry, RouteHandler, RouteMethod, RouteRequest, SharedStore,
    build_router,
};
pub use service::{BridgeService, RunningBridge};
