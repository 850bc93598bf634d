//! Dual-channel bridge lifecycle.
//!
//! Starts the read-only data channel and the mutating command channel as two
//! independent listeners over one shared document store, and runs them to
//! completion.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use super::bind::{RetryPolicy, bind_with_retry};
use super::error::{BridgeError, BridgeResult};
use super::routes::{AppState, ChannelKind, SharedStore, build_router};
use super::{command, data};
use crate::core::config::Config;

/// A started bridge: the ports actually bound plus the serving tasks.
pub struct RunningBridge {
    pub data_port: u16,
    pub command_port: u16,
    data_task: JoinHandle<BridgeResult<()>>,
    command_task: JoinHandle<BridgeResult<()>>,
}

impl RunningBridge {
    /// Wait for both channels; returns the first failure.
    pub async fn join(self) -> BridgeResult<()> {
        let (data, command) = tokio::try_join!(self.data_task, self.command_task)
            .map_err(|e| BridgeError::serve(e.to_string()))?;
        data?;
        command
    }

    /// Stop both listeners. Used by tests; production runs until killed.
    pub fn abort(&self) {
        self.data_task.abort();
        self.command_task.abort();
    }
}

/// Builds and runs the two HTTP channels.
pub struct BridgeService {
    config: Arc<Config>,
}

impl BridgeService {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Bind both channels (with port retry) and start serving.
    pub async fn start(&self, store: SharedStore) -> BridgeResult<RunningBridge> {
        let bridge = &self.config.bridge;
        let policy = RetryPolicy {
            max_attempts: bridge.bind_attempts,
            delay: Duration::from_millis(bridge.bind_retry_delay_ms),
        };

        let (data_listener, data_port) =
            bind_with_retry(&bridge.host, bridge.data_port, "data", &policy).await?;
        let (command_listener, command_port) =
            bind_with_retry(&bridge.host, bridge.command_port, "command", &policy).await?;

        info!(
            host = %bridge.host,
            data_port,
            command_port,
            "bridge ready - data channel (read-only) and command channel listening"
        );

        let data_state = AppState {
            store: store.clone(),
            config: self.config.clone(),
            channel: ChannelKind::Data,
            port: data_port,
        };
        let command_state = AppState {
            store,
            config: self.config.clone(),
            channel: ChannelKind::Command,
            port: command_port,
        };

        let data_app = build_router(data_state, data::routes());
        let command_app = build_router(command_state, command::routes());

        let data_task = tokio::spawn(async move {
            axum::serve(data_listener, data_app)
                .await
                .map_err(|e| BridgeError::serve(e.to_string()))
        });
        let command_task = tokio::spawn(async move {
            axum::serve(command_listener, command_app)
                .await
                .map_err(|e| BridgeError::serve(e.to_string()))
        });

        Ok(RunningBridge {
            data_port,
            command_port,
            data_task,
            command_task,
        })
    }

    /// Start and block until shutdown.
    pub async fn run(&self, store: SharedStore) -> BridgeResult<()> {
        self.start(store).await?.join().await
    }
}
