//! Model Bridge Entry Point
//!
//! One binary, two roles. `BRIDGE_MODE=host` (the default) runs the dual
//! HTTP bridge inside the document-owning process; `BRIDGE_MODE=agent` runs
//! the stdio MCP server that proxies tool calls to that bridge.

use std::sync::{Arc, RwLock};

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use model_bridge::bridge::BridgeService;
use model_bridge::client::AgentServer;
use model_bridge::core::{Config, RunMode};
use model_bridge::model::DocumentStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    // Initialize logging
    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);

    match config.mode {
        RunMode::Host => {
            let store = Arc::new(RwLock::new(DocumentStore::empty()));
            let service = BridgeService::new(Arc::new(config));
            service.run(store).await?;
        }
        RunMode::Agent => {
            AgentServer::new(config).run().await?;
        }
    }

    info!("Shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Configures tracing with the specified log level and format. Logs go to
/// stderr so agent mode keeps stdout clean for the MCP session.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
