//! Entity resolver.
//!
//! Locates named entities anywhere in the document tree and returns typed
//! index references back into the owning arrays, so mutations can write into
//! the correct parent list. Resolution failure is always a value
//! ([`ResolveError`]), never a panic that aborts the request.

use thiserror::Error;

use super::document::{DataObject, Model, Workflow, names_collide, normalized};

/// Reference to a data object inside a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRef {
    pub namespace: usize,
    pub object: usize,
}

/// Reference to a workflow inside a data object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowRef {
    pub object: ObjectRef,
    pub workflow: usize,
}

/// Resolution failures.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The named entity does not exist at the searched scope.
    #[error("{kind} not found: '{name}' in {scope}")]
    NotFound {
        kind: &'static str,
        name: String,
        scope: String,
    },

    /// The name matched under more than one owner and no owner hint was
    /// given. Candidates are `Owner.Entity` pairs in tree order.
    #[error("'{name}' is ambiguous; candidates: {}", candidates.join(", "))]
    Ambiguous {
        name: String,
        candidates: Vec<String>,
    },
}

impl ResolveError {
    pub fn not_found(kind: &'static str, name: &str, scope: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.to_string(),
            scope: scope.into(),
        }
    }
}

/// Read-only resolver over a model snapshot.
pub struct EntityResolver<'a> {
    model: &'a Model,
}

impl<'a> EntityResolver<'a> {
    pub fn new(model: &'a Model) -> Self {
        Self { model }
    }

    /// Resolve a data object by name.
    ///
    /// Exact case-sensitive match wins; otherwise falls back to a
    /// case-insensitive, space-normalized match. Object names are unique
    /// model-wide, so the fallback can match at most one object.
    pub fn object(&self, name: &str) -> Result<ObjectRef, ResolveError> {
        let mut fallback = None;
        for (ns_idx, ns) in self.model.namespaces.iter().enumerate() {
            for (obj_idx, obj) in ns.data_objects.iter().enumerate() {
                let object_ref = ObjectRef {
                    namespace: ns_idx,
                    object: obj_idx,
                };
                if obj.name == name {
                    return Ok(object_ref);
                }
                if fallback.is_none() && names_collide(&obj.name, name) {
                    fallback = Some(object_ref);
                }
            }
        }
        fallback.ok_or_else(|| ResolveError::not_found("object", name, "model"))
    }

    /// Borrow the object behind a reference.
    pub fn object_at(&self, object_ref: ObjectRef) -> &'a DataObject {
        &self.model.namespaces[object_ref.namespace].data_objects[object_ref.object]
    }

    /// Resolve a workflow by name, case-insensitively.
    ///
    /// With an owner hint the search is scoped to that object only. Without
    /// a hint, a name matching under more than one owner resolves to
    /// [`ResolveError::Ambiguous`] carrying every candidate, rather than
    /// silently picking the first tree-order match.
    pub fn workflow(
        &self,
        name: &str,
        owner_hint: Option<&str>,
    ) -> Result<WorkflowRef, ResolveError> {
        if let Some(owner) = owner_hint {
            let object_ref = self.object(owner)?;
            let obj = self.object_at(object_ref);
            return find_workflow(obj, name)
                .map(|workflow| WorkflowRef {
                    object: object_ref,
                    workflow,
                })
                .ok_or_else(|| {
                    ResolveError::not_found("workflow", name, format!("object '{}'", obj.name))
                });
        }

        let wanted = normalized(name);
        let mut matches = Vec::new();
        for (ns_idx, ns) in self.model.namespaces.iter().enumerate() {
            for (obj_idx, obj) in ns.data_objects.iter().enumerate() {
                for (wf_idx, wf) in obj.workflows.iter().enumerate() {
                    if normalized(&wf.name) == wanted {
                        matches.push((
                            WorkflowRef {
                                object: ObjectRef {
                                    namespace: ns_idx,
                                    object: obj_idx,
                                },
                                workflow: wf_idx,
                            },
                            format!("{}.{}", obj.name, wf.name),
                        ));
                    }
                }
            }
        }

        match matches.len() {
            0 => Err(ResolveError::not_found("workflow", name, "model")),
            1 => Ok(matches.remove(0).0),
            _ => Err(ResolveError::Ambiguous {
                name: name.to_string(),
                candidates: matches.into_iter().map(|(_, label)| label).collect(),
            }),
        }
    }

    /// Borrow the workflow behind a reference.
    pub fn workflow_at(&self, workflow_ref: WorkflowRef) -> &'a Workflow {
        &self.object_at(workflow_ref.object).workflows[workflow_ref.workflow]
    }
}

fn find_workflow(obj: &DataObject, name: &str) -> Option<usize> {
    let wanted = normalized(name);
    obj.workflows
        .iter()
        .position(|wf| normalized(&wf.name) == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::document::Namespace;

    fn sample_model() -> Model {
        let mut invoice = DataObject::new("Invoice");
        invoice.workflows.push(Workflow::new("EditForm"));
        invoice.workflows.push(Workflow::new("SalesReport"));

        let mut customer = DataObject::new("Customer");
        customer.workflows.push(Workflow::new("EditForm"));

        let mut ns = Namespace::new("Default");
        ns.data_objects.push(invoice);
        ns.data_objects.push(customer);

        Model {
            namespaces: vec![ns],
        }
    }

    #[test]
    fn test_object_exact_match() {
        let model = sample_model();
        let resolver = EntityResolver::new(&model);
        let object_ref = resolver.object("Invoice").unwrap();
        assert_eq!(resolver.object_at(object_ref).name, "Invoice");
    }

    #[test]
    fn test_object_normalized_fallback() {
        let model = sample_model();
        let resolver = EntityResolver::new(&model);
        let object_ref = resolver.object("invoice").unwrap();
        assert_eq!(resolver.object_at(object_ref).name, "Invoice");
    }

    #[test]
    fn test_object_not_found() {
        let model = sample_model();
        let resolver = EntityResolver::new(&model);
        let err = resolver.object("Order").unwrap_err();
        assert!(matches!(err, ResolveError::NotFound { .. }));
        assert!(err.to_string().contains("Order"));
    }

    #[test]
    fn test_workflow_scoped_by_owner_hint() {
        let model = sample_model();
        let resolver = EntityResolver::new(&model);
        let workflow_ref = resolver.workflow("editform", Some("Customer")).unwrap();
        assert_eq!(resolver.object_at(workflow_ref.object).name, "Customer");
        assert_eq!(resolver.workflow_at(workflow_ref).name, "EditForm");
    }

    #[test]
    fn test_workflow_unique_without_hint() {
        let model = sample_model();
        let resolver = EntityResolver::new(&model);
        let workflow_ref = resolver.workflow("SalesReport", None).unwrap();
        assert_eq!(resolver.object_at(workflow_ref.object).name, "Invoice");
    }

    #[test]
    fn test_workflow_ambiguous_without_hint() {
        let model = sample_model();
        let resolver = EntityResolver::new(&model);
        let err = resolver.workflow("EditForm", None).unwrap_err();
        match err {
            ResolveError::Ambiguous { candidates, .. } => {
                assert_eq!(
                    candidates,
                    vec!["Invoice.EditForm".to_string(), "Customer.EditForm".to_string()]
                );
            }
            other => panic!("expected ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn test_workflow_not_found_in_owner_scope() {
        let model = sample_model();
        let resolver = EntityResolver::new(&model);
        let err = resolver.workflow("SalesReport", Some("Customer")).unwrap_err();
        assert!(err.to_string().contains("Customer"));
    }
}
