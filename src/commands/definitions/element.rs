//! Workflow element commands: parameters, buttons, columns, output variables.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{parse_args, position_of, to_payload};
use crate::commands::error::CommandResult;
use crate::model::{
    Button, Column, DocumentStore, MutationValidator, OutputVariable, Parameter, Violation,
    WorkflowKind, WorkflowRef, parse_flag,
};

fn labeled_scope(store: &DocumentStore, workflow_ref: WorkflowRef) -> (String, String) {
    (
        store.object(workflow_ref.object).name.clone(),
        store.workflow(workflow_ref).name.clone(),
    )
}

// ============================================================================
// add_parameter
// ============================================================================

/// Arguments for `add_parameter`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddParameterParams {
    pub workflow_name: String,

    /// Optional owner hint; scopes the workflow search.
    #[serde(default)]
    pub object_name: Option<String>,

    pub name: String,
    pub data_type: String,

    #[serde(default)]
    pub is_required: Option<String>,
}

pub struct AddParameterCommand;

impl AddParameterCommand {
    pub const NAME: &'static str = "add_parameter";
    pub const DESCRIPTION: &'static str = "Add an input parameter to a workflow";

    pub fn run(store: &mut DocumentStore, args: serde_json::Value) -> CommandResult {
        let params: AddParameterParams = parse_args(args)?;
        Self::execute(store, &params)
    }

    pub fn execute(store: &mut DocumentStore, params: &AddParameterParams) -> CommandResult {
        let workflow_ref = store
            .resolver()
            .workflow(&params.workflow_name, params.object_name.as_deref())?;

        let mut validator = MutationValidator::new(store);
        validator
            .identifier("name", &params.name)
            .unique_among(
                "name",
                &params.name,
                store
                    .workflow(workflow_ref)
                    .parameters
                    .iter()
                    .map(|p| p.name.as_str()),
            )
            .data_type("dataType", &params.data_type);
        if let Some(flag) = &params.is_required {
            validator.bool_literal("isRequired", flag);
        }
        validator.finish()?;

        let parameter = Parameter {
            name: params.name.clone(),
            data_type: params.data_type.clone(),
            is_required: params.is_required.as_deref().map(parse_flag).unwrap_or(false),
        };
        let payload = to_payload(&parameter)?;
        let (object_name, workflow_name) = labeled_scope(store, workflow_ref);
        store.workflow_mut(workflow_ref).parameters.push(parameter);
        store.mark_dirty();
        info!(workflow = %workflow_name, name = %params.name, "added parameter");
        Ok(json!({
            "object": object_name,
            "workflow": workflow_name,
            "parameter": payload
        }))
    }
}

// ============================================================================
// add_button
// ============================================================================

/// Arguments for `add_button`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddButtonParams {
    pub workflow_name: String,

    #[serde(default)]
    pub object_name: Option<String>,

    pub name: String,

    #[serde(default)]
    pub caption: Option<String>,
}

pub struct AddButtonCommand;

impl AddButtonCommand {
    pub const NAME: &'static str = "add_button";
    pub const DESCRIPTION: &'static str = "Add a button to a workflow";

    pub fn run(store: &mut DocumentStore, args: serde_json::Value) -> CommandResult {
        let params: AddButtonParams = parse_args(args)?;
        Self::execute(store, &params)
    }

    pub fn execute(store: &mut DocumentStore, params: &AddButtonParams) -> CommandResult {
        let workflow_ref = store
            .resolver()
            .workflow(&params.workflow_name, params.object_name.as_deref())?;

        let mut validator = MutationValidator::new(store);
        validator.identifier("name", &params.name).unique_among(
            "name",
            &params.name,
            store
                .workflow(workflow_ref)
                .buttons
                .iter()
                .map(|b| b.name.as_str()),
        );
        validator.finish()?;

        let button = Button {
            name: params.name.clone(),
            caption: params.caption.clone().unwrap_or_else(|| params.name.clone()),
        };
        let payload = to_payload(&button)?;
        let (object_name, workflow_name) = labeled_scope(store, workflow_ref);
        store.workflow_mut(workflow_ref).buttons.push(button);
        store.mark_dirty();
        info!(workflow = %workflow_name, name = %params.name, "added button");
        Ok(json!({
            "object": object_name,
            "workflow": workflow_name,
            "button": payload
        }))
    }
}

// ============================================================================
// add_column
// ============================================================================

/// Arguments for `add_column`. Columns exist on reports only.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddColumnParams {
    pub workflow_name: String,

    #[serde(default)]
    pub object_name: Option<String>,

    pub name: String,

    /// Optional property of the owning object that feeds the column.
    #[serde(default)]
    pub source_property: Option<String>,
}

pub struct AddColumnCommand;

impl AddColumnCommand {
    pub const NAME: &'static str = "add_column";
    pub const DESCRIPTION: &'static str = "Add a column to a report workflow";

    pub fn run(store: &mut DocumentStore, args: serde_json::Value) -> CommandResult {
        let params: AddColumnParams = parse_args(args)?;
        Self::execute(store, &params)
    }

    pub fn execute(store: &mut DocumentStore, params: &AddColumnParams) -> CommandResult {
        let workflow_ref = store
            .resolver()
            .workflow(&params.workflow_name, params.object_name.as_deref())?;
        let workflow = store.workflow(workflow_ref);
        let owner = store.object(workflow_ref.object);

        let mut validator = MutationValidator::new(store);
        if workflow.kind() != WorkflowKind::Report {
            validator.structural(
                "workflowName",
                format!("'{}' is not a report; columns exist on reports only", workflow.name),
            );
        }
        validator.identifier("name", &params.name).unique_among(
            "name",
            &params.name,
            workflow.columns.iter().map(|c| c.name.as_str()),
        );
        if let Some(source) = &params.source_property {
            if position_of(&owner.properties, source).is_none() {
                validator.record(Violation::new(
                    "sourceProperty",
                    "referentialIntegrity",
                    format!("object '{}' has no property '{source}'", owner.name),
                ));
            }
        }
        validator.finish()?;

        let column = Column {
            name: params.name.clone(),
            source_property: params.source_property.clone(),
        };
        let payload = to_payload(&column)?;
        let (object_name, workflow_name) = labeled_scope(store, workflow_ref);
        store.workflow_mut(workflow_ref).columns.push(column);
        store.mark_dirty();
        info!(workflow = %workflow_name, name = %params.name, "added column");
        Ok(json!({
            "object": object_name,
            "workflow": workflow_name,
            "column": payload
        }))
    }
}

// ============================================================================
// add_output_variable
// ============================================================================

/// Arguments for `add_output_variable`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddOutputVariableParams {
    pub workflow_name: String,

    #[serde(default)]
    pub object_name: Option<String>,

    pub name: String,
    pub data_type: String,
}

pub struct AddOutputVariableCommand;

impl AddOutputVariableCommand {
    pub const NAME: &'static str = "add_output_variable";
    pub const DESCRIPTION: &'static str = "Add an output variable to a workflow";

    pub fn run(store: &mut DocumentStore, args: serde_json::Value) -> CommandResult {
        let params: AddOutputVariableParams = parse_args(args)?;
        Self::execute(store, &params)
    }

    pub fn execute(store: &mut DocumentStore, params: &AddOutputVariableParams) -> CommandResult {
        let workflow_ref = store
            .resolver()
            .workflow(&params.workflow_name, params.object_name.as_deref())?;

        let mut validator = MutationValidator::new(store);
        validator
            .identifier("name", &params.name)
            .unique_among(
                "name",
                &params.name,
                store
                    .workflow(workflow_ref)
                    .output_variables
                    .iter()
                    .map(|v| v.name.as_str()),
            )
            .data_type("dataType", &params.data_type);
        validator.finish()?;

        let variable = OutputVariable {
            name: params.name.clone(),
            data_type: params.data_type.clone(),
        };
        let payload = to_payload(&variable)?;
        let (object_name, workflow_name) = labeled_scope(store, workflow_ref);
        store
            .workflow_mut(workflow_ref)
            .output_variables
            .push(variable);
        store.mark_dirty();
        info!(workflow = %workflow_name, name = %params.name, "added output variable");
        Ok(json!({
            "object": object_name,
            "workflow": workflow_name,
            "outputVariable": payload
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::definitions::object::CreateObjectCommand;
    use crate::commands::definitions::property::AddPropertyCommand;
    use crate::commands::definitions::workflow::CreateWorkflowCommand;
    use crate::commands::error::CommandError;
    use serde_json::json;

    fn store_with_report() -> DocumentStore {
        let mut store = DocumentStore::empty();
        CreateObjectCommand::run(&mut store, json!({ "name": "Invoice" })).unwrap();
        AddPropertyCommand::run(
            &mut store,
            json!({ "objectName": "Invoice", "name": "Total", "dataType": "Money" }),
        )
        .unwrap();
        CreateWorkflowCommand::run(
            &mut store,
            json!({ "objectName": "Invoice", "name": "SalesReport", "kind": "report" }),
        )
        .unwrap();
        CreateWorkflowCommand::run(
            &mut store,
            json!({ "objectName": "Invoice", "name": "EditForm", "kind": "form" }),
        )
        .unwrap();
        store
    }

    #[test]
    fn test_add_parameter() {
        let mut store = store_with_report();
        let payload = AddParameterCommand::run(
            &mut store,
            json!({
                "workflowName": "EditForm",
                "name": "InvoiceId",
                "dataType": "Integer",
                "isRequired": "true"
            }),
        )
        .unwrap();
        assert_eq!(payload["parameter"]["name"], "InvoiceId");
        assert_eq!(payload["parameter"]["isRequired"], true);
    }

    #[test]
    fn test_add_button_defaults_caption() {
        let mut store = store_with_report();
        let payload = AddButtonCommand::run(
            &mut store,
            json!({ "workflowName": "EditForm", "name": "Save" }),
        )
        .unwrap();
        assert_eq!(payload["button"]["caption"], "Save");
    }

    #[test]
    fn test_add_column_on_report() {
        let mut store = store_with_report();
        let payload = AddColumnCommand::run(
            &mut store,
            json!({
                "workflowName": "SalesReport",
                "name": "TotalColumn",
                "sourceProperty": "Total"
            }),
        )
        .unwrap();
        assert_eq!(payload["column"]["sourceProperty"], "Total");
    }

    #[test]
    fn test_add_column_rejected_on_form() {
        let mut store = store_with_report();
        let err = AddColumnCommand::run(
            &mut store,
            json!({ "workflowName": "EditForm", "name": "TotalColumn" }),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "validation_failed");
    }

    #[test]
    fn test_add_column_unknown_source_property() {
        let mut store = store_with_report();
        let err = AddColumnCommand::run(
            &mut store,
            json!({
                "workflowName": "SalesReport",
                "name": "TotalColumn",
                "sourceProperty": "Missing"
            }),
        )
        .unwrap_err();
        match err {
            CommandError::Validation(violations) => {
                assert_eq!(violations[0].rule, "referentialIntegrity");
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_add_output_variable() {
        let mut store = store_with_report();
        let payload = AddOutputVariableCommand::run(
            &mut store,
            json!({
                "workflowName": "EditForm",
                "name": "SavedId",
                "dataType": "Integer"
            }),
        )
        .unwrap();
        assert_eq!(payload["outputVariable"]["dataType"], "Integer");
    }

    #[test]
    fn test_missing_required_argument() {
        let mut store = store_with_report();
        let err =
            AddParameterCommand::run(&mut store, json!({ "workflowName": "EditForm" }))
                .unwrap_err();
        assert_eq!(err.kind(), "invalid_arguments");
    }
}
