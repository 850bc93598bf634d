//! Model Bridge Library
//!
//! Cross-process bridge between an AI agent and a host application holding a
//! hierarchical application model in memory. The host exposes the live model
//! over two localhost HTTP channels (read-only data, mutation commands); the
//! agent exposes MCP tools over stdio that proxy to those channels.
//!
//! # Architecture
//!
//! - **core**: configuration and the unified error type
//! - **model**: the document tree, store, entity resolver, mutation
//!   validator, and reordering engine
//! - **commands**: mutation commands and the dispatcher that routes them
//! - **bridge**: the host-side dual HTTP bridge (data + command channels)
//! - **client**: the agent-side MCP server and its bridge HTTP client
//!
//! # Example
//!
//! ```rust,no_run
//! use model_bridge::bridge::BridgeService;
//! use model_bridge::core::Config;
//! use model_bridge::model::DocumentStore;
//! use std::sync::{Arc, RwLock};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let store = Arc::new(RwLock::new(DocumentStore::empty()));
//!     BridgeService::new(Arc::new(config)).run(store).await?;
//!     Ok(())
//! }
//! ```

pub mod bridge;
pub mod client;
pub mod commands;
pub mod core;
pub mod model;

// Re-export commonly used types for convenience
pub use core::{Config, Error, Result, RunMode};
