//! Lookup item commands.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{parse_args, to_payload};
use crate::commands::error::CommandResult;
use crate::model::{DocumentStore, LookupItem, MutationValidator};

/// Arguments for `add_lookup_item`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddLookupItemParams {
    /// Owning object; must be flagged as a lookup object.
    pub object_name: String,

    pub name: String,

    #[serde(default)]
    pub value: Option<String>,
}

pub struct AddLookupItemCommand;

impl AddLookupItemCommand {
    pub const NAME: &'static str = "add_lookup_item";
    pub const DESCRIPTION: &'static str = "Add an item to a lookup object's value list";

    pub fn run(store: &mut DocumentStore, args: serde_json::Value) -> CommandResult {
        let params: AddLookupItemParams = parse_args(args)?;
        Self::execute(store, &params)
    }

    pub fn execute(store: &mut DocumentStore, params: &AddLookupItemParams) -> CommandResult {
        let object_ref = store.resolver().object(&params.object_name)?;
        let obj = store.object(object_ref);

        let mut validator = MutationValidator::new(store);
        if !obj.is_lookup {
            validator.structural(
                "objectName",
                format!("'{}' is not a lookup object", obj.name),
            );
        }
        validator
            .identifier("name", &params.name)
            .unique_among(
                "name",
                &params.name,
                obj.lookup_items.iter().map(|item| item.name.as_str()),
            );
        validator.finish()?;

        let item = LookupItem {
            name: params.name.clone(),
            value: params.value.clone().unwrap_or_else(|| params.name.clone()),
        };
        let payload = to_payload(&item)?;
        let object = store.object_mut(object_ref);
        let object_name = object.name.clone();
        object.lookup_items.push(item);
        store.mark_dirty();
        info!(object = %object_name, name = %params.name, "added lookup item");
        Ok(json!({ "object": object_name, "item": payload }))
    }
}
