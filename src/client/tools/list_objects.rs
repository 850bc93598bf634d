//! Tool listing the objects of the live model.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;

use super::common::{envelope_result, flag};
use crate::client::http::BridgeClient;

/// Parameters for listing objects.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListObjectsParams {
    /// Case-insensitive substring filter on object names.
    #[schemars(description = "Substring filter on object names")]
    #[serde(default)]
    pub search: Option<String>,

    /// Restrict to lookup (or non-lookup) objects.
    #[schemars(description = "Only lookup objects (true) or only regular objects (false)")]
    #[serde(default)]
    pub lookup: Option<bool>,
}

/// List the objects of the model currently open on the bridge host.
#[derive(Debug, Clone)]
pub struct ListObjectsTool;

impl ListObjectsTool {
    pub const NAME: &'static str = "model_list_objects";

    pub const DESCRIPTION: &'static str = "List the objects of the model currently open in the host application. Supports a substring name filter and a lookup-object filter. Returns each object's name, properties, and workflows.";

    pub async fn execute(client: &BridgeClient, params: &ListObjectsParams) -> CallToolResult {
        let lookup = params.lookup.map(flag);
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(search) = params.search.as_deref() {
            query.push(("search", search));
        }
        if let Some(lookup) = lookup.as_deref() {
            query.push(("lookup", lookup));
        }
        envelope_result(client.objects(&query).await)
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ListObjectsParams>(),
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
                let params: ListObjectsParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&client, &params).await)
            }
            .boxed()
        })
    }
}
