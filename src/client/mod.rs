//! Agent-side process: MCP server plus the HTTP client it proxies through.

pub mod agent;
pub mod http;
pub mod tools;

pub use agent::AgentServer;
pub use http::BridgeClient;
pub use tools::build_tool_router;
