//! The `move_element` command: repositioning within order-significant lists.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{parse_args, to_payload};
use crate::commands::error::{CommandError, CommandResult};
use crate::model::{DocumentStore, MoveOutcome, move_named};

const COLLECTIONS: &[&str] = &[
    "properties",
    "lookupItems",
    "parameters",
    "buttons",
    "columns",
    "outputVariables",
];

/// Arguments for `move_element`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveElementParams {
    /// Which ordered list to reorder: "properties", "lookupItems",
    /// "parameters", "buttons", "columns" or "outputVariables".
    pub collection: String,

    /// Name of the element to move.
    pub name: String,

    /// Target 0-based position; must be within `[0, count)`.
    pub new_position: i64,

    /// Owning object; required for object-level collections, otherwise an
    /// owner hint for the workflow search.
    #[serde(default)]
    pub object_name: Option<String>,

    /// Owning workflow; required for workflow-level collections.
    #[serde(default)]
    pub workflow_name: Option<String>,
}

pub struct MoveElementCommand;

impl MoveElementCommand {
    pub const NAME: &'static str = "move_element";
    pub const DESCRIPTION: &'static str =
        "Move a named element to a new position within its ordered list";

    pub fn run(store: &mut DocumentStore, args: serde_json::Value) -> CommandResult {
        let params: MoveElementParams = parse_args(args)?;
        Self::execute(store, &params)
    }

    pub fn execute(store: &mut DocumentStore, params: &MoveElementParams) -> CommandResult {
        let outcome = match params.collection.as_str() {
            "properties" | "lookupItems" => {
                let object_name = params.object_name.as_deref().ok_or_else(|| {
                    CommandError::invalid_arguments(format!(
                        "'objectName' is required when collection is '{}'",
                        params.collection
                    ))
                })?;
                let object_ref = store.resolver().object(object_name)?;
                let object = store.object_mut(object_ref);
                if params.collection == "properties" {
                    move_named(&mut object.properties, &params.name, params.new_position)?
                } else {
                    move_named(&mut object.lookup_items, &params.name, params.new_position)?
                }
            }
            "parameters" | "buttons" | "columns" | "outputVariables" => {
                let workflow_name = params.workflow_name.as_deref().ok_or_else(|| {
                    CommandError::invalid_arguments(format!(
                        "'workflowName' is required when collection is '{}'",
                        params.collection
                    ))
                })?;
                let workflow_ref = store
                    .resolver()
                    .workflow(workflow_name, params.object_name.as_deref())?;
                let workflow = store.workflow_mut(workflow_ref);
                let list = match params.collection.as_str() {
                    "parameters" => &mut workflow.parameters as &mut dyn AnyList,
                    "buttons" => &mut workflow.buttons,
                    "columns" => &mut workflow.columns,
                    _ => &mut workflow.output_variables,
                };
                list.move_named(&params.name, params.new_position)?
            }
            other => {
                return Err(CommandError::invalid_arguments(format!(
                    "unknown collection '{other}'; expected one of: {}",
                    COLLECTIONS.join(", ")
                )));
            }
        };

        store.mark_dirty();
        info!(
            collection = %params.collection,
            name = %params.name,
            from = outcome.old_position,
            to = outcome.new_position,
            "moved element"
        );
        let mut payload = to_payload(&outcome)?;
        payload["collection"] = json!(params.collection);
        payload["name"] = json!(params.name);
        Ok(payload)
    }
}

/// Object-safe adapter so the four workflow lists share one move call site.
trait AnyList {
    fn move_named(&mut self, name: &str, new_position: i64)
    -> Result<MoveOutcome, crate::model::ReorderError>;
}

impl<T: crate::model::Named> AnyList for Vec<T> {
    fn move_named(
        &mut self,
        name: &str,
        new_position: i64,
    ) -> Result<MoveOutcome, crate::model::ReorderError> {
        move_named(self, name, new_position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::definitions::object::CreateObjectCommand;
    use crate::commands::definitions::property::AddPropertyCommand;
    use serde_json::json;

    fn store_with_properties() -> DocumentStore {
        let mut store = DocumentStore::empty();
        CreateObjectCommand::run(&mut store, json!({ "name": "Invoice" })).unwrap();
        for name in ["Number", "Date", "Total"] {
            AddPropertyCommand::run(
                &mut store,
                json!({ "objectName": "Invoice", "name": name, "dataType": "Text" }),
            )
            .unwrap();
        }
        store
    }

    fn property_names(store: &DocumentStore) -> Vec<String> {
        let object_ref = store.resolver().object("Invoice").unwrap();
        store
            .object(object_ref)
            .properties
            .iter()
            .map(|p| p.name.clone())
            .collect()
    }

    #[test]
    fn test_move_property() {
        let mut store = store_with_properties();
        let payload = MoveElementCommand::run(
            &mut store,
            json!({
                "collection": "properties",
                "objectName": "Invoice",
                "name": "Total",
                "newPosition": 0
            }),
        )
        .unwrap();
        assert_eq!(payload["oldPosition"], 2);
        assert_eq!(payload["newPosition"], 0);
        assert_eq!(payload["count"], 3);
        assert_eq!(property_names(&store), vec!["Total", "Number", "Date"]);
    }

    #[test]
    fn test_move_out_of_bounds() {
        let mut store = store_with_properties();
        let err = MoveElementCommand::run(
            &mut store,
            json!({
                "collection": "properties",
                "objectName": "Invoice",
                "name": "Total",
                "newPosition": 3
            }),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "bounds_error");
        assert_eq!(property_names(&store), vec!["Number", "Date", "Total"]);
    }

    #[test]
    fn test_move_negative_position() {
        let mut store = store_with_properties();
        let err = MoveElementCommand::run(
            &mut store,
            json!({
                "collection": "properties",
                "objectName": "Invoice",
                "name": "Total",
                "newPosition": -1
            }),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "bounds_error");
    }

    #[test]
    fn test_unknown_collection() {
        let mut store = store_with_properties();
        let err = MoveElementCommand::run(
            &mut store,
            json!({
                "collection": "rows",
                "objectName": "Invoice",
                "name": "Total",
                "newPosition": 0
            }),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "invalid_arguments");
    }

    #[test]
    fn test_missing_owner_for_object_collection() {
        let mut store = store_with_properties();
        let err = MoveElementCommand::run(
            &mut store,
            json!({ "collection": "properties", "name": "Total", "newPosition": 0 }),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "invalid_arguments");
    }

    #[test]
    fn test_move_workflow_parameter() {
        let mut store = store_with_properties();
        crate::commands::definitions::workflow::CreateWorkflowCommand::run(
            &mut store,
            json!({ "objectName": "Invoice", "name": "EditForm", "kind": "form" }),
        )
        .unwrap();
        for name in ["First", "Second"] {
            crate::commands::definitions::element::AddParameterCommand::run(
                &mut store,
                json!({ "workflowName": "EditForm", "name": name, "dataType": "Text" }),
            )
            .unwrap();
        }
        let payload = MoveElementCommand::run(
            &mut store,
            json!({
                "collection": "parameters",
                "workflowName": "EditForm",
                "name": "Second",
                "newPosition": 0
            }),
        )
        .unwrap();
        assert_eq!(payload["newPosition"], 0);
    }
}
