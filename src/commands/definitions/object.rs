//! Data object commands: create, update, delete.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{parse_args, to_payload};
use crate::commands::error::CommandResult;
use crate::model::{DataObject, DocumentStore, MutationValidator, Violation, parse_flag};

// ============================================================================
// create_object
// ============================================================================

/// Arguments for `create_object`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateObjectParams {
    /// Name of the new object; PascalCase, unique model-wide.
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Optional parent object; must exist.
    #[serde(default)]
    pub parent_object_name: Option<String>,

    /// "true" to create a lookup object.
    #[serde(default)]
    pub is_lookup: Option<String>,
}

/// Creates a data object together with its default page-init flow.
pub struct CreateObjectCommand;

impl CreateObjectCommand {
    pub const NAME: &'static str = "create_object";
    pub const DESCRIPTION: &'static str =
        "Create a new data object (and its default page-init flow) in the model";

    pub fn run(store: &mut DocumentStore, args: serde_json::Value) -> CommandResult {
        let params: CreateObjectParams = parse_args(args)?;
        Self::execute(store, &params)
    }

    pub fn execute(store: &mut DocumentStore, params: &CreateObjectParams) -> CommandResult {
        let mut validator = MutationValidator::new(store);
        validator
            .identifier("name", &params.name)
            .unique_object_name("name", &params.name);
        if let Some(parent) = &params.parent_object_name {
            validator.fk_target("parentObjectName", parent);
        }
        if let Some(flag) = &params.is_lookup {
            validator.bool_literal("isLookup", flag);
        }
        validator.finish()?;

        let mut object = DataObject::new(&params.name);
        object.description = params.description.clone().unwrap_or_default();
        object.parent_object_name = params.parent_object_name.clone();
        object.is_lookup = params.is_lookup.as_deref().map(parse_flag).unwrap_or(false);

        let object_ref = store.insert_object(object);
        info!(name = %params.name, "created data object");
        Ok(json!({ "object": to_payload(store.object(object_ref))? }))
    }
}

// ============================================================================
// update_object
// ============================================================================

/// Arguments for `update_object`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateObjectParams {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub is_lookup: Option<String>,
}

pub struct UpdateObjectCommand;

impl UpdateObjectCommand {
    pub const NAME: &'static str = "update_object";
    pub const DESCRIPTION: &'static str = "Update the attributes of an existing data object";

    pub fn run(store: &mut DocumentStore, args: serde_json::Value) -> CommandResult {
        let params: UpdateObjectParams = parse_args(args)?;
        Self::execute(store, &params)
    }

    pub fn execute(store: &mut DocumentStore, params: &UpdateObjectParams) -> CommandResult {
        let object_ref = store.resolver().object(&params.name)?;

        let mut validator = MutationValidator::new(store);
        if let Some(flag) = &params.is_lookup {
            validator.bool_literal("isLookup", flag);
            // A lookup object cannot lose the flag while it still holds items.
            if flag == "false" && !store.object(object_ref).lookup_items.is_empty() {
                validator.structural(
                    "isLookup",
                    "cannot clear isLookup while the object still has lookup items",
                );
            }
        }
        validator.finish()?;

        let object = store.object_mut(object_ref);
        if let Some(description) = &params.description {
            object.description = description.clone();
        }
        if let Some(flag) = &params.is_lookup {
            object.is_lookup = parse_flag(flag);
        }
        store.mark_dirty();
        info!(name = %params.name, "updated data object");
        Ok(json!({ "object": to_payload(store.object(object_ref))? }))
    }
}

// ============================================================================
// delete_object
// ============================================================================

/// Arguments for `delete_object`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteObjectParams {
    pub name: String,
}

pub struct DeleteObjectCommand;

impl DeleteObjectCommand {
    pub const NAME: &'static str = "delete_object";
    pub const DESCRIPTION: &'static str =
        "Remove a data object; rejected while other objects still reference it";

    pub fn run(store: &mut DocumentStore, args: serde_json::Value) -> CommandResult {
        let params: DeleteObjectParams = parse_args(args)?;
        Self::execute(store, &params)
    }

    pub fn execute(store: &mut DocumentStore, params: &DeleteObjectParams) -> CommandResult {
        let object_ref = store.resolver().object(&params.name)?;
        let stored_name = store.object(object_ref).name.clone();

        let usages = store.usages_of(&stored_name);
        if !usages.is_empty() {
            let violations = usages
                .into_iter()
                .map(|usage| {
                    Violation::new(
                        "name",
                        "referentialIntegrity",
                        format!(
                            "'{stored_name}' is still referenced by {}.{}",
                            usage.object, usage.property
                        ),
                    )
                })
                .collect::<Vec<_>>();
            return Err(violations.into());
        }

        store.remove_object(object_ref);
        info!(name = %stored_name, "deleted data object");
        Ok(json!({ "removed": stored_name }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::error::CommandError;
    use serde_json::json;

    fn create(store: &mut DocumentStore, name: &str) {
        CreateObjectCommand::run(store, json!({ "name": name })).unwrap();
    }

    #[test]
    fn test_create_then_query_round_trip() {
        let mut store = DocumentStore::empty();
        create(&mut store, "Pac");
        let payload = CreateObjectCommand::run(
            &mut store,
            json!({ "name": "Invoice", "parentObjectName": "Pac" }),
        )
        .unwrap();
        assert_eq!(payload["object"]["name"], "Invoice");
        assert_eq!(payload["object"]["parentObjectName"], "Pac");

        let object_ref = store.resolver().object("Invoice").unwrap();
        let obj = store.object(object_ref);
        assert_eq!(obj.name, "Invoice");
        assert!(obj.properties.is_empty());
    }

    #[test]
    fn test_create_rejects_case_insensitive_duplicate() {
        let mut store = DocumentStore::empty();
        create(&mut store, "Invoice");
        let err = CreateObjectCommand::run(&mut store, json!({ "name": "invoice" })).unwrap_err();
        match err {
            CommandError::Validation(violations) => {
                // "invoice" breaks both the naming convention and uniqueness.
                assert!(violations.iter().any(|v| v.rule == "uniqueness"));
                assert!(violations.iter().any(|v| v.rule == "naming"));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_create_rejects_missing_parent() {
        let mut store = DocumentStore::empty();
        let err = CreateObjectCommand::run(
            &mut store,
            json!({ "name": "Invoice", "parentObjectName": "Missing" }),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "validation_failed");
    }

    #[test]
    fn test_create_lookup_flag_literal() {
        let mut store = DocumentStore::empty();
        let err = CreateObjectCommand::run(
            &mut store,
            json!({ "name": "Status", "isLookup": "yes" }),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "validation_failed");

        CreateObjectCommand::run(&mut store, json!({ "name": "Status", "isLookup": "true" }))
            .unwrap();
        let object_ref = store.resolver().object("Status").unwrap();
        assert!(store.object(object_ref).is_lookup);
    }

    #[test]
    fn test_update_object_description() {
        let mut store = DocumentStore::empty();
        create(&mut store, "Invoice");
        let payload = UpdateObjectCommand::run(
            &mut store,
            json!({ "name": "Invoice", "description": "Customer invoice" }),
        )
        .unwrap();
        assert_eq!(payload["object"]["description"], "Customer invoice");
    }

    #[test]
    fn test_delete_blocked_by_fk_usage() {
        let mut store = DocumentStore::empty();
        create(&mut store, "Customer");
        create(&mut store, "Invoice");
        crate::commands::definitions::property::AddPropertyCommand::run(
            &mut store,
            json!({
                "objectName": "Invoice",
                "name": "CustomerId",
                "dataType": "Integer",
                "isFK": "true",
                "fkObjectName": "Customer"
            }),
        )
        .unwrap();

        let err =
            DeleteObjectCommand::run(&mut store, json!({ "name": "Customer" })).unwrap_err();
        match err {
            CommandError::Validation(violations) => {
                assert!(violations[0].message.contains("Invoice.CustomerId"));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }

        // Removing the referencing object unblocks the delete.
        DeleteObjectCommand::run(&mut store, json!({ "name": "Invoice" })).unwrap();
        DeleteObjectCommand::run(&mut store, json!({ "name": "Customer" })).unwrap();
    }

    #[test]
    fn test_delete_missing_object() {
        let mut store = DocumentStore::empty();
        let err = DeleteObjectCommand::run(&mut store, json!({ "name": "Ghost" })).unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }
}
