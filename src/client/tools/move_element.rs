//! Tool reordering a named element within its collection.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use super::common::{envelope_result, set_opt};
use crate::client::http::BridgeClient;

/// Parameters for moving an element.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MoveElementParams {
    /// Collection the element lives in: properties, lookupItems,
    /// parameters, buttons, columns, or outputVariables.
    #[schemars(description = "Collection to reorder within")]
    pub collection: String,

    /// Name of the element to move.
    #[schemars(description = "Name of the element to move")]
    pub name: String,

    /// Zero-based target position.
    #[schemars(description = "Target position (zero-based)")]
    pub new_position: i64,

    /// Owning object, for object-level collections or to scope a workflow.
    #[schemars(description = "Owning object name")]
    #[serde(default)]
    pub object_name: Option<String>,

    /// Owning workflow, for workflow-level collections.
    #[schemars(description = "Owning workflow name")]
    #[serde(default)]
    pub workflow_name: Option<String>,
}

/// Move an element to a new position within its collection.
#[derive(Debug, Clone)]
pub struct MoveElementTool;

impl MoveElementTool {
    pub const NAME: &'static str = "model_move_element";

    pub const DESCRIPTION: &'static str = "Move a named element to a new zero-based position within its collection. Object collections (properties, lookupItems) need object_name; workflow collections (parameters, buttons, columns, outputVariables) need workflow_name. Relative order of the other elements is preserved.";

    pub async fn execute(client: &BridgeClient, params: &MoveElementParams) -> CallToolResult {
        let mut args = serde_json::Map::new();
        args.insert(
            "collection".to_string(),
            Value::String(params.collection.clone()),
        );
        args.insert("name".to_string(), Value::String(params.name.clone()));
        args.insert("newPosition".to_string(), json!(params.new_position));
        set_opt(&mut args, "objectName", params.object_name.clone());
        set_opt(&mut args, "workflowName", params.workflow_name.clone());

        envelope_result(client.execute("move_element", Value::Object(args)).await)
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<MoveElementParams>(),
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
                let params: MoveElementParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&client, &params).await)
            }
            .boxed()
        })
    }
}
