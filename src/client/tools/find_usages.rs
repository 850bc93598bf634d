//! Tool reporting FK references to an object.

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

/// Parameters for the usages query.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FindUsagesParams {
    /// Target object name.
    #[schemars(description = "Object whose inbound FK references to list")]
    pub object_name: String,
}

/// List every FK property in the model that targets the given object.
#[derive(Debug, Clone)]
pub struct FindUsagesTool;

impl FindUsagesTool {
    pub const NAME: &'static str = "model_find_usages";

    pub const DESCRIPTION: &'static str = "Find every foreign-key property in the live model that references the given object. Useful before deleting an object: deletion is refused while references remain.";

    pub async fn execute(client: &BridgeClient, params: &FindUsagesParams) -> CallToolResult {
        envelope_result(client.usages(&params.object_name).await)
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<FindUsagesParams>(),
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
                let params: FindUsagesParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&client, &params).await)
            }
            .boxed()
        })
    }
}
