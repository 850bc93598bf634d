//! Builds the rmcp ToolRouter from the tool definitions.
//!
//! Each tool knows how to create its own route; this module only wires them
//! together around a shared bridge client.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use super::{
    AddPropertyTool, CreateObjectTool, FindUsagesTool, GetObjectTool, ListObjectsTool,
    MoveElementTool,
};
use crate::client::http::BridgeClient;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(client: Arc<BridgeClient>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(ListObjectsTool::create_route(client.clone()))
        .with_route(GetObjectTool::create_route(client.clone()))
        .with_route(FindUsagesTool::create_route(client.clone()))
        .with_route(CreateObjectTool::create_route(client.clone()))
        .with_route(AddPropertyTool::create_route(client.clone()))
        .with_route(MoveElementTool::create_route(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestServer {}

    fn test_client() -> Arc<BridgeClient> {
        Arc::new(BridgeClient::with_ports("127.0.0.1", 3001, 3002))
    }

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(test_client());
        let tools = router.list_all();
        assert_eq!(tools.len(), 6);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"model_list_objects"));
        assert!(names.contains(&"model_get_object"));
        assert!(names.contains(&"model_find_usages"));
        assert!(names.contains(&"model_create_object"));
        assert!(names.contains(&"model_add_property"));
        assert!(names.contains(&"model_move_element"));
    }

    #[test]
    fn test_tool_schemas_have_descriptions() {
        let router: ToolRouter<TestServer> = build_tool_router(test_client());
        for tool in router.list_all() {
            assert!(tool.description.is_some(), "{} lacks description", tool.name);
        }
    }
}
