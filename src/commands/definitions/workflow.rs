//! Workflow commands: create and delete forms, reports and flows.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{parse_args, to_payload};
use crate::commands::error::{CommandError, CommandResult};
use crate::model::{DocumentStore, MutationValidator, Workflow, WorkflowKind};

const WORKFLOW_KINDS: &[&str] = &["form", "report", "flow"];

fn kind_from_str(kind: &str) -> Option<WorkflowKind> {
    match kind {
        "form" => Some(WorkflowKind::Form),
        "report" => Some(WorkflowKind::Report),
        "flow" => Some(WorkflowKind::Flow),
        _ => None,
    }
}

// ============================================================================
// create_workflow
// ============================================================================

/// Arguments for `create_workflow`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkflowParams {
    /// Owning data object.
    pub object_name: String,

    /// Workflow name; forms must end in "Form", reports in "Report".
    pub name: String,

    /// "form", "report" or "flow".
    pub kind: String,
}

pub struct CreateWorkflowCommand;

impl CreateWorkflowCommand {
    pub const NAME: &'static str = "create_workflow";
    pub const DESCRIPTION: &'static str = "Create a form, report or flow on a data object";

    pub fn run(store: &mut DocumentStore, args: serde_json::Value) -> CommandResult {
        let params: CreateWorkflowParams = parse_args(args)?;
        Self::execute(store, &params)
    }

    pub fn execute(store: &mut DocumentStore, params: &CreateWorkflowParams) -> CommandResult {
        let object_ref = store.resolver().object(&params.object_name)?;
        let obj = store.object(object_ref);

        let mut validator = MutationValidator::new(store);
        validator
            .identifier("name", &params.name)
            .unique_among(
                "name",
                &params.name,
                obj.workflows.iter().map(|wf| wf.name.as_str()),
            )
            .one_of("kind", &params.kind, WORKFLOW_KINDS);
        if let Some(kind) = kind_from_str(&params.kind) {
            // Kind is carried by the naming suffix, so the two must agree
            // both ways: a flow may not claim a reserved suffix either.
            match kind.required_suffix() {
                Some(suffix) if !params.name.ends_with(suffix) => {
                    validator.structural(
                        "name",
                        format!("a {} workflow's name must end with '{suffix}'", params.kind),
                    );
                }
                Some(_) => {}
                None => {
                    for reserved in [WorkflowKind::Form, WorkflowKind::Report] {
                        if let Some(suffix) = reserved.required_suffix()
                            && params.name.ends_with(suffix)
                        {
                            validator.structural(
                                "name",
                                format!(
                                    "a {} workflow's name must not end with '{suffix}'",
                                    params.kind
                                ),
                            );
                        }
                    }
                }
            }
        }
        validator.finish()?;

        let workflow = Workflow::new(&params.name);
        let kind = workflow.kind().as_str();
        let payload = to_payload(&workflow)?;
        let object = store.object_mut(object_ref);
        let object_name = object.name.clone();
        object.workflows.push(workflow);
        store.mark_dirty();
        info!(object = %object_name, name = %params.name, kind, "created workflow");
        Ok(json!({ "object": object_name, "workflow": payload, "kind": kind }))
    }
}

// ============================================================================
// delete_workflow
// ============================================================================

/// Arguments for `delete_workflow`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteWorkflowParams {
    pub name: String,

    /// Optional owner hint; required when the name exists under multiple
    /// objects.
    #[serde(default)]
    pub object_name: Option<String>,
}

pub struct DeleteWorkflowCommand;

impl DeleteWorkflowCommand {
    pub const NAME: &'static str = "delete_workflow";
    pub const DESCRIPTION: &'static str = "Remove a workflow from its owning data object";

    pub fn run(store: &mut DocumentStore, args: serde_json::Value) -> CommandResult {
        let params: DeleteWorkflowParams = parse_args(args)?;
        Self::execute(store, &params)
    }

    pub fn execute(store: &mut DocumentStore, params: &DeleteWorkflowParams) -> CommandResult {
        let workflow_ref = store
            .resolver()
            .workflow(&params.name, params.object_name.as_deref())?;

        if store.workflow(workflow_ref).page_init {
            return Err(CommandError::Validation(vec![
                crate::model::Violation::new(
                    "name",
                    "structure",
                    "the default page-init flow cannot be removed",
                ),
            ]));
        }

        let object_name = store.object(workflow_ref.object).name.clone();
        let removed = store.remove_workflow(workflow_ref);
        info!(object = %object_name, name = %removed.name, "deleted workflow");
        Ok(json!({ "object": object_name, "removed": removed.name }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::definitions::object::CreateObjectCommand;
    use serde_json::json;

    fn store_with_invoice() -> DocumentStore {
        let mut store = DocumentStore::empty();
        CreateObjectCommand::run(&mut store, json!({ "name": "Invoice" })).unwrap();
        store
    }

    #[test]
    fn test_create_form() {
        let mut store = store_with_invoice();
        let payload = CreateWorkflowCommand::run(
            &mut store,
            json!({ "objectName": "Invoice", "name": "EditForm", "kind": "form" }),
        )
        .unwrap();
        assert_eq!(payload["workflow"]["name"], "EditForm");
        assert_eq!(payload["kind"], "form");
    }

    #[test]
    fn test_form_suffix_is_enforced() {
        let mut store = store_with_invoice();
        let err = CreateWorkflowCommand::run(
            &mut store,
            json!({ "objectName": "Invoice", "name": "Editor", "kind": "form" }),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "validation_failed");
    }

    #[test]
    fn test_unknown_kind() {
        let mut store = store_with_invoice();
        let err = CreateWorkflowCommand::run(
            &mut store,
            json!({ "objectName": "Invoice", "name": "Edit", "kind": "screen" }),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "validation_failed");
    }

    #[test]
    fn test_flow_needs_no_suffix() {
        let mut store = store_with_invoice();
        CreateWorkflowCommand::run(
            &mut store,
            json!({ "objectName": "Invoice", "name": "RecalcTotals", "kind": "flow" }),
        )
        .unwrap();
    }

    #[test]
    fn test_flow_rejects_reserved_suffixes() {
        // A flow named like a form would read back as kind "form".
        let mut store = store_with_invoice();
        for name in ["ApprovalForm", "MonthlyReport"] {
            let err = CreateWorkflowCommand::run(
                &mut store,
                json!({ "objectName": "Invoice", "name": name, "kind": "flow" }),
            )
            .unwrap_err();
            assert_eq!(err.kind(), "validation_failed");
        }
    }

    #[test]
    fn test_delete_workflow_with_hint() {
        let mut store = store_with_invoice();
        CreateWorkflowCommand::run(
            &mut store,
            json!({ "objectName": "Invoice", "name": "EditForm", "kind": "form" }),
        )
        .unwrap();
        let payload = DeleteWorkflowCommand::run(
            &mut store,
            json!({ "name": "EditForm", "objectName": "Invoice" }),
        )
        .unwrap();
        assert_eq!(payload["removed"], "EditForm");
    }

    #[test]
    fn test_delete_ambiguous_without_hint() {
        let mut store = store_with_invoice();
        CreateObjectCommand::run(&mut store, json!({ "name": "Customer" })).unwrap();
        for object in ["Invoice", "Customer"] {
            CreateWorkflowCommand::run(
                &mut store,
                json!({ "objectName": object, "name": "EditForm", "kind": "form" }),
            )
            .unwrap();
        }
        let err =
            DeleteWorkflowCommand::run(&mut store, json!({ "name": "EditForm" })).unwrap_err();
        match err {
            CommandError::Ambiguous { candidates, .. } => {
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("expected ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn test_page_init_flow_is_protected() {
        let mut store = store_with_invoice();
        let err = DeleteWorkflowCommand::run(&mut store, json!({ "name": "InvoicePageInit" }))
            .unwrap_err();
        assert_eq!(err.kind(), "validation_failed");
    }
}
