//! Configuration management.
//!
//! Centralized configuration populated from defaults and `BRIDGE_`-prefixed
//! environment variables (via dotenv). The host and agent processes share
//! one config shape; each reads the sections relevant to its mode.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Which process role this invocation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Document-owning host: runs the dual HTTP bridge.
    Host,
    /// Stateless tool process: serves MCP tools over stdio, proxying to the
    /// bridge.
    Agent,
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Process role.
    pub mode: RunMode,

    /// Host-side channel configuration.
    pub bridge: BridgeConfig,

    /// Agent-side client configuration.
    pub client: ClientConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name reported on health endpoints and to MCP clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Configuration for the dual HTTP bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Address both channels bind to.
    pub host: String,

    /// Preferred data channel port.
    pub data_port: u16,

    /// Preferred command channel port.
    pub command_port: u16,

    /// How many consecutive ports a channel tries before giving up.
    pub bind_attempts: u32,

    /// Fixed delay between bind attempts.
    pub bind_retry_delay_ms: u64,

    /// Permissive CORS for same-host browser tooling.
    pub enable_cors: bool,
}

/// Configuration for the agent-side bridge client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Host the bridge is expected on.
    pub host: String,

    /// Preferred data channel port; discovery probes upward from here.
    pub data_port: u16,

    /// Preferred command channel port.
    pub command_port: u16,

    /// How many consecutive ports discovery probes. Matches the bridge's
    /// bind-retry window so an evicted channel is still found.
    pub discovery_window: u16,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "model-bridge".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            mode: RunMode::Host,
            bridge: BridgeConfig::default(),
            client: ClientConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            data_port: 3001,
            command_port: 3002,
            bind_attempts: 10,
            bind_retry_delay_ms: 250,
            enable_cors: true,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            data_port: 3001,
            command_port: 3002,
            discovery_window: 10,
            timeout_secs: 5,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `BRIDGE_`.
    /// For example: `BRIDGE_MODE`, `BRIDGE_DATA_PORT`, `BRIDGE_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(mode) = std::env::var("BRIDGE_MODE") {
            config.mode = match mode.to_lowercase().as_str() {
                "agent" => RunMode::Agent,
                _ => RunMode::Host,
            };
        }

        if let Ok(name) = std::env::var("BRIDGE_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("BRIDGE_LOG_LEVEL") {
            config.logging.level = level;
        }

        // The bridge and its client default to the same endpoints, so a
        // single variable moves both sides.
        if let Ok(host) = std::env::var("BRIDGE_HOST") {
            config.bridge.host = host.clone();
            config.client.host = host;
        }
        if let Some(port) = env_port("BRIDGE_DATA_PORT") {
            config.bridge.data_port = port;
            config.client.data_port = port;
        }
        if let Some(port) = env_port("BRIDGE_COMMAND_PORT") {
            config.bridge.command_port = port;
            config.client.command_port = port;
        }

        if let Ok(attempts) = std::env::var("BRIDGE_BIND_ATTEMPTS")
            && let Ok(attempts) = attempts.parse::<u32>()
        {
            config.bridge.bind_attempts = attempts;
            config.client.discovery_window = attempts.min(u16::MAX as u32) as u16;
        }

        if let Ok(timeout) = std::env::var("BRIDGE_TIMEOUT_SECS")
            && let Ok(timeout) = timeout.parse()
        {
            config.client.timeout_secs = timeout;
        }

        if let Ok(cors) = std::env::var("BRIDGE_CORS") {
            config.bridge.enable_cors = !matches!(cors.to_lowercase().as_str(), "false" | "0");
        }

        info!(
            mode = ?config.mode,
            data_port = config.bridge.data_port,
            command_port = config.bridge.command_port,
            "configuration loaded"
        );

        config
    }
}

fn env_port(name: &str) -> Option<u16> {
    std::env::var(name).ok().and_then(|p| p.parse().ok())
}
