//! Tool adding a property to an existing object.

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

/// Parameters for adding a property.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddPropertyParams {
    /// Owning object.
    #[schemars(description = "Name of the object to add the property to")]
    pub object_name: String,

    /// PascalCase property name, unique within the object.
    #[schemars(description = "Name of the new property (PascalCase)")]
    pub name: String,

    /// One of the model's data types (Text, Integer, Decimal, Date,
    /// DateTime, Boolean, Money, Image, File).
    #[schemars(description = "Data type of the property")]
    pub data_type: String,

    /// Mark the property as a foreign key.
    #[schemars(description = "Whether the property is a foreign key")]
    #[serde(default)]
    pub is_fk: Option<bool>,

    /// Target object for a foreign key; required when is_fk is true.
    #[schemars(description = "Object the foreign key points at")]
    #[serde(default)]
    pub fk_object_name: Option<String>,
}

/// Add a property to an object in the live model.
#[derive(Debug, Clone)]
pub struct AddPropertyTool;

impl AddPropertyTool {
    pub const NAME: &'static str = "model_add_property";

    pub const DESCRIPTION: &'static str = "Add a property to an existing object in the live model. Supports foreign keys: set is_fk and name the target object. All validation violations are reported together and nothing is applied on failure.";

    pub async fn execute(client: &BridgeClient, params: &AddPropertyParams) -> CallToolResult {
        let mut args = serde_json::Map::new();
        args.insert(
            "objectName".to_string(),
            Value::String(params.object_name.clone()),
        );
        args.insert("name".to_string(), Value::String(params.name.clone()));
        args.insert(
            "dataType".to_string(),
            Value::String(params.data_type.clone()),
        );
        set_opt(&mut args, "isFK", params.is_fk.map(flag));
        set_opt(&mut args, "fkObjectName", params.fk_object_name.clone());

        envelope_result(client.execute("add_property", Value::Object(args)).await)
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<AddPropertyParams>(),
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
                let params: AddPropertyParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&client, &params).await)
            }
            .boxed()
        })
    }
}
