//! Tool creating a new object through the command channel.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use super::common::{envelope_result, flag, set_opt};
use crate::client::http::BridgeClient;

/// Parameters for object creation.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateObjectParams {
    /// PascalCase object name, unique within the model.
    #[schemars(description = "Name of the new object (PascalCase)")]
    pub name: String,

    /// Optional description.
    #[schemars(description = "Human-readable description")]
    #[serde(default)]
    pub description: Option<String>,

    /// Optional parent object, creating the object as a child.
    #[schemars(description = "Name of an existing parent object")]
    #[serde(default)]
    pub parent_object_name: Option<String>,

    /// Mark the object as a lookup (reference-data) object.
    #[schemars(description = "Create as a lookup object")]
    #[serde(default)]
    pub is_lookup: Option<bool>,
}

/// Create an object in the live model.
#[derive(Debug, Clone)]
pub struct CreateObjectTool;

impl CreateObjectTool {
    pub const NAME: &'static str = "model_create_object";

    pub const DESCRIPTION: &'static str = "Create a new object in the live model, optionally under a parent or as a lookup object. A page-init workflow is added automatically. Fails with a violation list if the name is invalid or already taken.";

    pub async fn execute(client: &BridgeClient, params: &CreateObjectParams) -> CallToolResult {
        let mut args = serde_json::Map::new();
        args.insert("name".to_string(), Value::String(params.name.clone()));
        set_opt(&mut args, "description", params.description.clone());
        set_opt(
            &mut args,
            "parentObjectName",
            params.parent_object_name.clone(),
        );
        set_opt(&mut args, "isLookup", params.is_lookup.map(flag));

        envelope_result(client.execute("create_object", Value::Object(args)).await)
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<CreateObjectParams>(),
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
                let params: CreateObjectParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&client, &params).await)
            }
            .boxed()
        })
    }
}
