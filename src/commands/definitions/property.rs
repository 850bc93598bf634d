//! Property commands: add, update, remove.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{parse_args, position_of, to_payload};
use crate::commands::error::{CommandError, CommandResult};
use crate::model::{DocumentStore, MutationValidator, Property, parse_flag};

// ============================================================================
// add_property
// ============================================================================

/// Arguments for `add_property`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPropertyParams {
    /// Owning data object.
    pub object_name: String,

    /// Name of the new property; PascalCase, unique within the object.
    pub name: String,

    pub data_type: String,

    #[serde(default)]
    pub size: Option<u32>,

    /// "true" / "false".
    #[serde(default)]
    pub is_required: Option<String>,

    /// "true" marks the property as a foreign key; requires `fkObjectName`.
    #[serde(default, rename = "isFK")]
    pub is_fk: Option<String>,

    #[serde(default)]
    pub fk_object_name: Option<String>,
}

pub struct AddPropertyCommand;

impl AddPropertyCommand {
    pub const NAME: &'static str = "add_property";
    pub const DESCRIPTION: &'static str = "Add a typed property to a data object";

    pub fn run(store: &mut DocumentStore, args: serde_json::Value) -> CommandResult {
        let params: AddPropertyParams = parse_args(args)?;
        Self::execute(store, &params)
    }

    pub fn execute(store: &mut DocumentStore, params: &AddPropertyParams) -> CommandResult {
        let object_ref = store.resolver().object(&params.object_name)?;

        let mut validator = MutationValidator::new(store);
        validator
            .identifier("name", &params.name)
            .unique_among(
                "name",
                &params.name,
                store
                    .object(object_ref)
                    .properties
                    .iter()
                    .map(|p| p.name.as_str()),
            )
            .data_type("dataType", &params.data_type);
        if let Some(flag) = &params.is_required {
            validator.bool_literal("isRequired", flag);
        }
        let is_fk = match &params.is_fk {
            Some(flag) => {
                validator.bool_literal("isFK", flag);
                flag == "true"
            }
            None => false,
        };
        if is_fk {
            match &params.fk_object_name {
                Some(target) => {
                    validator.fk_target("fkObjectName", target);
                }
                None => {
                    validator.structural("fkObjectName", "required when isFK is \"true\"");
                }
            }
        }
        validator.finish()?;

        let property = Property {
            name: params.name.clone(),
            data_type: params.data_type.clone(),
            size: params.size,
            is_required: params.is_required.as_deref().map(parse_flag).unwrap_or(false),
            is_fk,
            fk_object_name: if is_fk { params.fk_object_name.clone() } else { None },
        };
        let payload = to_payload(&property)?;
        let object = store.object_mut(object_ref);
        let object_name = object.name.clone();
        object.properties.push(property);
        store.mark_dirty();
        info!(object = %object_name, name = %params.name, "added property");
        Ok(json!({ "object": object_name, "property": payload }))
    }
}

// ============================================================================
// update_property
// ============================================================================

/// Arguments for `update_property`. Only the provided fields change.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePropertyParams {
    pub object_name: String,
    pub property_name: String,

    #[serde(default)]
    pub new_name: Option<String>,

    #[serde(default)]
    pub data_type: Option<String>,

    #[serde(default)]
    pub size: Option<u32>,

    #[serde(default)]
    pub is_required: Option<String>,

    #[serde(default, rename = "isFK")]
    pub is_fk: Option<String>,

    #[serde(default)]
    pub fk_object_name: Option<String>,
}

pub struct UpdatePropertyCommand;

impl UpdatePropertyCommand {
    pub const NAME: &'static str = "update_property";
    pub const DESCRIPTION: &'static str = "Update attributes of an existing property";

    pub fn run(store: &mut DocumentStore, args: serde_json::Value) -> CommandResult {
        let params: UpdatePropertyParams = parse_args(args)?;
        Self::execute(store, &params)
    }

    pub fn execute(store: &mut DocumentStore, params: &UpdatePropertyParams) -> CommandResult {
        let object_ref = store.resolver().object(&params.object_name)?;
        let index = position_of(&store.object(object_ref).properties, &params.property_name)
            .ok_or_else(|| CommandError::NotFound {
                kind: "property",
                name: params.property_name.clone(),
                scope: format!("object '{}'", store.object(object_ref).name),
            })?;

        let mut validator = MutationValidator::new(store);
        if let Some(new_name) = &params.new_name {
            let siblings = store
                .object(object_ref)
                .properties
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, p)| p.name.as_str());
            validator
                .identifier("newName", new_name)
                .unique_among("newName", new_name, siblings);
        }
        if let Some(data_type) = &params.data_type {
            validator.data_type("dataType", data_type);
        }
        if let Some(flag) = &params.is_required {
            validator.bool_literal("isRequired", flag);
        }
        let existing = &store.object(object_ref).properties[index];
        let becomes_fk = match params.is_fk.as_deref() {
            Some("true") => true,
            Some("false") => false,
            Some(other) => {
                validator.bool_literal("isFK", other);
                false
            }
            None => existing.is_fk,
        };
        if becomes_fk {
            let target = params
                .fk_object_name
                .as_deref()
                .or(existing.fk_object_name.as_deref());
            match target {
                Some(target) => {
                    validator.fk_target("fkObjectName", target);
                }
                None => {
                    validator.structural("fkObjectName", "required when isFK is \"true\"");
                }
            }
        }
        validator.finish()?;

        let fk_override = params.fk_object_name.clone();
        let object = store.object_mut(object_ref);
        let object_name = object.name.clone();
        let property = &mut object.properties[index];
        if let Some(new_name) = &params.new_name {
            property.name = new_name.clone();
        }
        if let Some(data_type) = &params.data_type {
            property.data_type = data_type.clone();
        }
        if let Some(size) = params.size {
            property.size = Some(size);
        }
        if let Some(flag) = &params.is_required {
            property.is_required = parse_flag(flag);
        }
        property.is_fk = becomes_fk;
        if becomes_fk {
            if let Some(target) = fk_override {
                property.fk_object_name = Some(target);
            }
        } else {
            property.fk_object_name = None;
        }
        let payload = to_payload(&*property)?;
        store.mark_dirty();
        info!(object = %object_name, name = %params.property_name, "updated property");
        Ok(json!({ "object": object_name, "property": payload }))
    }
}

// ============================================================================
// remove_property
// ============================================================================

/// Arguments for `remove_property`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemovePropertyParams {
    pub object_name: String,
    pub property_name: String,
}

pub struct RemovePropertyCommand;

impl RemovePropertyCommand {
    pub const NAME: &'static str = "remove_property";
    pub const DESCRIPTION: &'static str = "Remove a property from a data object";

    pub fn run(store: &mut DocumentStore, args: serde_json::Value) -> CommandResult {
        let params: RemovePropertyParams = parse_args(args)?;
        Self::execute(store, &params)
    }

    pub fn execute(store: &mut DocumentStore, params: &RemovePropertyParams) -> CommandResult {
        let object_ref = store.resolver().object(&params.object_name)?;
        let index = position_of(&store.object(object_ref).properties, &params.property_name)
            .ok_or_else(|| CommandError::NotFound {
                kind: "property",
                name: params.property_name.clone(),
                scope: format!("object '{}'", store.object(object_ref).name),
            })?;

        let object = store.object_mut(object_ref);
        let object_name = object.name.clone();
        let removed = object.properties.remove(index);
        store.mark_dirty();
        info!(object = %object_name, name = %removed.name, "removed property");
        Ok(json!({ "object": object_name, "removed": removed.name }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::definitions::object::CreateObjectCommand;
    use serde_json::json;

    fn store_with(names: &[&str]) -> DocumentStore {
        let mut store = DocumentStore::empty();
        for name in names {
            CreateObjectCommand::run(&mut store, json!({ "name": name })).unwrap();
        }
        store
    }

    #[test]
    fn test_add_property() {
        let mut store = store_with(&["Invoice"]);
        let payload = AddPropertyCommand::run(
            &mut store,
            json!({ "objectName": "Invoice", "name": "Total", "dataType": "Money" }),
        )
        .unwrap();
        assert_eq!(payload["property"]["name"], "Total");
        assert_eq!(payload["property"]["dataType"], "Money");
    }

    #[test]
    fn test_add_fk_property_with_missing_target() {
        let mut store = store_with(&["Invoice"]);
        let err = AddPropertyCommand::run(
            &mut store,
            json!({
                "objectName": "Invoice",
                "name": "CustomerId",
                "dataType": "Integer",
                "isFK": "true",
                "fkObjectName": "DoesNotExist"
            }),
        )
        .unwrap_err();
        match err {
            CommandError::Validation(violations) => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].rule, "referentialIntegrity");
                assert!(violations[0].message.contains("DoesNotExist"));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        // Nothing landed: all-or-nothing.
        let object_ref = store.resolver().object("Invoice").unwrap();
        assert!(store.object(object_ref).properties.is_empty());
    }

    #[test]
    fn test_add_fk_property_without_target_field() {
        let mut store = store_with(&["Invoice"]);
        let err = AddPropertyCommand::run(
            &mut store,
            json!({
                "objectName": "Invoice",
                "name": "CustomerId",
                "dataType": "Integer",
                "isFK": "true"
            }),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "validation_failed");
    }

    #[test]
    fn test_add_duplicate_property_name() {
        let mut store = store_with(&["Invoice"]);
        AddPropertyCommand::run(
            &mut store,
            json!({ "objectName": "Invoice", "name": "Total", "dataType": "Money" }),
        )
        .unwrap();
        let err = AddPropertyCommand::run(
            &mut store,
            json!({ "objectName": "Invoice", "name": "Total", "dataType": "Money" }),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "validation_failed");
    }

    #[test]
    fn test_update_property_clears_fk_on_false() {
        let mut store = store_with(&["Customer", "Invoice"]);
        AddPropertyCommand::run(
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

        let payload = UpdatePropertyCommand::run(
            &mut store,
            json!({
                "objectName": "Invoice",
                "propertyName": "CustomerId",
                "isFK": "false"
            }),
        )
        .unwrap();
        assert_eq!(payload["property"]["isFK"], false);
        assert!(payload["property"].get("fkObjectName").is_none());
    }

    #[test]
    fn test_update_property_rename_checks_siblings() {
        let mut store = store_with(&["Invoice"]);
        for name in ["Total", "Subtotal"] {
            AddPropertyCommand::run(
                &mut store,
                json!({ "objectName": "Invoice", "name": name, "dataType": "Money" }),
            )
            .unwrap();
        }
        let err = UpdatePropertyCommand::run(
            &mut store,
            json!({
                "objectName": "Invoice",
                "propertyName": "Subtotal",
                "newName": "total"
            }),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "validation_failed");

        UpdatePropertyCommand::run(
            &mut store,
            json!({
                "objectName": "Invoice",
                "propertyName": "Subtotal",
                "newName": "SubtotalAmount"
            }),
        )
        .unwrap();
    }

    #[test]
    fn test_remove_property() {
        let mut store = store_with(&["Invoice"]);
        AddPropertyCommand::run(
            &mut store,
            json!({ "objectName": "Invoice", "name": "Total", "dataType": "Money" }),
        )
        .unwrap();
        let payload = RemovePropertyCommand::run(
            &mut store,
            json!({ "objectName": "Invoice", "propertyName": "total" }),
        )
        .unwrap();
        assert_eq!(payload["removed"], "Total");
        let err = RemovePropertyCommand::run(
            &mut store,
            json!({ "objectName": "Invoice", "propertyName": "Total" }),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }
}
