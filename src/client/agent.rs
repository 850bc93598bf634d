//! MCP server for the agent process.
//!
//! The agent speaks MCP over stdio and owns no document. Every tool call is
//! proxied to the host's HTTP bridge; when the bridge is down, tools report
//! a degraded envelope instead of failing the MCP session.

use std::sync::Arc;

use rmcp::{
    ServerHandler, ServiceExt, handler::server::tool::ToolRouter, model::*, tool_handler,
};
use tracing::info;

use super::http::BridgeClient;
use super::tools::build_tool_router;
use crate::core::config::Config;
use crate::core::error::Error;

/// The agent-side MCP server handler.
#[derive(Clone)]
pub struct AgentServer {
    config: Arc<Config>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl AgentServer {
    /// Create a new agent server with the given configuration.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let client = Arc::new(BridgeClient::new(&config.client));

        Self {
            tool_router: build_tool_router::<Self>(client),
            config,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Run the MCP session over stdin/stdout until the client disconnects.
    pub async fn run(self) -> crate::core::error::Result<()> {
        info!("Ready - communicating via stdin/stdout");

        let service = self
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| Error::internal(format!("failed to start MCP session: {e}")))?;

        service
            .waiting()
            .await
            .map_err(|e| Error::internal(format!("MCP session failed: {e}")))?;

        info!("MCP session finished");
        Ok(())
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for AgentServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Bridge to the model currently open in the host application. Read tools query \
                 the live model; mutation tools validate and apply changes through the host. \
                 If the host is not running, tools return {\"success\": false, \"note\": ...}."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_exposes_all_tools() {
        let server = AgentServer::new(Config::default());
        assert_eq!(server.tool_router.list_all().len(), 6);
    }

    #[test]
    fn test_server_info_enables_tools() {
        let server = AgentServer::new(Config::default());
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.is_some());
    }

    #[test]
    fn test_server_identity_from_config() {
        let server = AgentServer::new(Config::default());
        assert_eq!(server.name(), "model-bridge");
        assert!(!server.version().is_empty());
    }
}
