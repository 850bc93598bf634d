//! HTTP client for the model bridge.
//!
//! The agent process owns no document; everything it reports comes from the
//! bridge over localhost HTTP. The bridge may have slid off its preferred
//! ports, so the client probes a discovery window of consecutive ports and
//! caches whichever one answers with a matching health payload.
//!
//! Transport failures never surface as errors to tool callers. A bridge that
//! is not running is an expected state, reported as a degraded envelope:
//! `{"success": false, "note": "..."}`.

use std::time::Duration;

use serde_json::{Value, json};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::core::config::ClientConfig;

/// Client for the dual HTTP bridge, used by the agent-side tools.
pub struct BridgeClient {
    http: reqwest::Client,
    config: ClientConfig,
    data_port: RwLock<Option<u16>>,
    command_port: RwLock<Option<u16>>,
}

impl BridgeClient {
    /// Create a client for the configured bridge endpoints.
    pub fn new(config: &ClientConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            http,
            config: config.clone(),
            data_port: RwLock::new(None),
            command_port: RwLock::new(None),
        }
    }

    /// Create a client pinned to exact ports, skipping discovery.
    pub fn with_ports(host: &str, data_port: u16, command_port: u16) -> Self {
        let config = ClientConfig {
            host: host.to_string(),
            data_port,
            command_port,
            discovery_window: 1,
            timeout_secs: 2,
        };
        Self::new(&config)
    }

    fn base_url(&self, port: u16) -> String {
        format!("http://{}:{}", self.config.host, port)
    }

    /// Probe the discovery window for a channel, starting at its preferred
    /// port, and return the first port whose health payload names the
    /// expected channel.
    async fn discover(&self, channel: &str, preferred: u16) -> Option<u16> {
        for offset in 0..self.config.discovery_window {
            let Some(port) = preferred.checked_add(offset) else {
                break;
            };
            if self.probe(channel, port).await {
                debug!(channel, port, "bridge channel discovered");
                return Some(port);
            }
        }
        None
    }

    async fn probe(&self, channel: &str, port: u16) -> bool {
        let url = format!("{}/api/health", self.base_url(port));
        match self.http.get(&url).send().await {
            Ok(response) => match response.json::<Value>().await {
                Ok(body) => body["channel"].as_str() == Some(channel),
                Err(_) => false,
            },
            Err(_) => false,
        }
    }

    async fn channel_port(
        &self,
        channel: &str,
        preferred: u16,
        cache: &RwLock<Option<u16>>,
    ) -> Option<u16> {
        if let Some(port) = *cache.read().await {
            return Some(port);
        }
        let port = self.discover(channel, preferred).await?;
        *cache.write().await = Some(port);
        Some(port)
    }

    async fn data_port(&self) -> Option<u16> {
        self.channel_port("data", self.config.data_port, &self.data_port)
            .await
    }

    async fn command_port(&self) -> Option<u16> {
        self.channel_port("command", self.config.command_port, &self.command_port)
            .await
    }

    /// Drop cached ports so the next request re-discovers the bridge.
    async fn forget(&self) {
        *self.data_port.write().await = None;
        *self.command_port.write().await = None;
    }

    fn degraded(note: impl Into<String>) -> Value {
        let note = note.into();
        warn!(note = %note, "bridge request degraded");
        json!({ "success": false, "note": note })
    }

    /// GET a data channel route, returning the response envelope or a
    /// degraded envelope when the bridge is unreachable.
    pub async fn get_data(&self, path: &str, query: &[(&str, &str)]) -> Value {
        let Some(port) = self.data_port().await else {
            return Self::degraded("bridge data channel not reachable");
        };
        let url = format!("{}{}", self.base_url(port), path);
        match self.http.get(&url).query(query).send().await {
            Ok(response) => match response.json::<Value>().await {
                Ok(body) => body,
                Err(e) => Self::degraded(format!("invalid bridge response: {e}")),
            },
            Err(e) => {
                self.forget().await;
                Self::degraded(format!("bridge unreachable: {e}"))
            }
        }
    }

    /// Execute a mutation command over the command channel.
    pub async fn execute(&self, command: &str, args: Value) -> Value {
        let Some(port) = self.command_port().await else {
            return Self::degraded("bridge command channel not reachable");
        };
        let url = format!("{}/api/execute-command", self.base_url(port));
        let body = json!({ "command": command, "args": args });
        match self.http.post(&url).json(&body).send().await {
            Ok(response) => match response.json::<Value>().await {
                Ok(body) => body,
                Err(e) => Self::degraded(format!("invalid bridge response: {e}")),
            },
            Err(e) => {
                self.forget().await;
                Self::degraded(format!("bridge unreachable: {e}"))
            }
        }
    }

    /// Fetch the data channel health payload.
    pub async fn health(&self) -> Value {
        self.get_data("/api/health", &[]).await
    }

    /// List objects, optionally filtered.
    pub async fn objects(&self, query: &[(&str, &str)]) -> Value {
        self.get_data("/api/objects", query).await
    }

    /// List workflows, optionally filtered.
    pub async fn workflows(&self, query: &[(&str, &str)]) -> Value {
        self.get_data("/api/workflows", query).await
    }

    /// Find FK references to an object.
    pub async fn usages(&self, object: &str) -> Value {
        self.get_data("/api/usages", &[("object", object)]).await
    }
}
