//! Tool fetching a single object by name.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;

use super::common::envelope_result;
use crate::client::http::BridgeClient;

/// Parameters for fetching an object.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetObjectParams {
    /// Object name; matching tolerates case and embedded spaces.
    #[schemars(description = "Name of the object to fetch")]
    pub name: String,
}

/// Fetch one object with its properties, lookup items, and workflows.
#[derive(Debug, Clone)]
pub struct GetObjectTool;

impl GetObjectTool {
    pub const NAME: &'static str = "model_get_object";

    pub const DESCRIPTION: &'static str = "Fetch a single object from the live model by name, including its properties, lookup items, and workflows. Name matching falls back to ignoring case and spaces.";

    pub async fn execute(client: &BridgeClient, params: &GetObjectParams) -> CallToolResult {
        envelope_result(client.objects(&[("name", &params.name)]).await)
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetObjectParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    pub fn create_route<S>(client: Arc<BridgeClient>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let client = client.clone();
            async move {
                let params: GetObjectParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&client, &params).await)
            }
            .boxed()
        })
    }
}
