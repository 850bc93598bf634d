//! Document store.
//!
//! Owns the canonical in-memory document tree and its dirty flag, and
//! exposes the narrow mutation primitives the command dispatcher builds on.
//! The store is an explicitly constructed instance (no process-wide global);
//! the bridge shares it behind `Arc<RwLock<..>>` with exactly one writer at
//! a time, so every mutation is synchronous and atomic from the caller's
//! point of view.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::document::{DataObject, Model, Workflow};
use super::resolver::{EntityResolver, ObjectRef, WorkflowRef};

/// One FK reference to an object, reported by the usage cross-reference
/// query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    /// Object owning the referencing property.
    pub object: String,
    /// The referencing property.
    pub property: String,
}

/// The single source of truth for the open document.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    model: Model,
    dirty: bool,
}

impl DocumentStore {
    /// Wrap an already-loaded document. Loading and saving the document are
    /// owned by an external collaborator; the store only tracks dirtiness.
    pub fn new(model: Model) -> Self {
        Self {
            model,
            dirty: false,
        }
    }

    /// A store over a freshly opened, empty document.
    pub fn empty() -> Self {
        Self::new(Model::with_default_namespace())
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn resolver(&self) -> EntityResolver<'_> {
        EntityResolver::new(&self.model)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record that a mutation landed since the last save.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Called by the save collaborator after persisting.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn object(&self, object_ref: ObjectRef) -> &DataObject {
        &self.model.namespaces[object_ref.namespace].data_objects[object_ref.object]
    }

    pub fn object_mut(&mut self, object_ref: ObjectRef) -> &mut DataObject {
        &mut self.model.namespaces[object_ref.namespace].data_objects[object_ref.object]
    }

    pub fn workflow(&self, workflow_ref: WorkflowRef) -> &Workflow {
        &self.object(workflow_ref.object).workflows[workflow_ref.workflow]
    }

    pub fn workflow_mut(&mut self, workflow_ref: WorkflowRef) -> &mut Workflow {
        let object_ref = workflow_ref.object;
        &mut self.object_mut(object_ref).workflows[workflow_ref.workflow]
    }

    /// Insert a new object into the first namespace together with its
    /// default page-init flow. The two land as one atomic step; no caller
    /// ever observes the object without its flow.
    pub fn insert_object(&mut self, mut object: DataObject) -> ObjectRef {
        object
            .workflows
            .insert(0, Workflow::page_init_for(&object.name));
        if self.model.namespaces.is_empty() {
            self.model
                .namespaces
                .push(super::document::Namespace::new("Default"));
        }
        let namespace = 0;
        let objects = &mut self.model.namespaces[namespace].data_objects;
        objects.push(object);
        self.dirty = true;
        ObjectRef {
            namespace,
            object: objects.len() - 1,
        }
    }

    pub fn remove_object(&mut self, object_ref: ObjectRef) -> DataObject {
        let removed = self.model.namespaces[object_ref.namespace]
            .data_objects
            .remove(object_ref.object);
        self.dirty = true;
        removed
    }

    pub fn remove_workflow(&mut self, workflow_ref: WorkflowRef) -> Workflow {
        let object_ref = workflow_ref.object;
        let removed = self
            .object_mut(object_ref)
            .workflows
            .remove(workflow_ref.workflow);
        self.dirty = true;
        removed
    }

    /// Every FK property anywhere in the model that references the named
    /// object, in tree order.
    pub fn usages_of(&self, object_name: &str) -> Vec<Usage> {
        self.model
            .iter_objects()
            .flat_map(|obj| {
                obj.properties
                    .iter()
                    .filter(|prop| {
                        prop.is_fk
                            && prop
                                .fk_object_name
                                .as_deref()
                                .is_some_and(|target| {
                                    super::document::names_collide(target, object_name)
                                })
                    })
                    .map(|prop| Usage {
                        object: obj.name.clone(),
                        property: prop.name.clone(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::document::Property;

    fn store_with(names: &[&str]) -> DocumentStore {
        let mut store = DocumentStore::empty();
        for name in names {
            store.insert_object(DataObject::new(*name));
        }
        store
    }

    #[test]
    fn test_insert_creates_page_init_flow() {
        let mut store = DocumentStore::empty();
        let object_ref = store.insert_object(DataObject::new("Invoice"));
        let obj = store.object(object_ref);
        assert_eq!(obj.workflows.len(), 1);
        assert_eq!(obj.workflows[0].name, "InvoicePageInit");
        assert!(obj.workflows[0].page_init);
    }

    #[test]
    fn test_dirty_flag_lifecycle() {
        let mut store = DocumentStore::empty();
        assert!(!store.is_dirty());
        store.insert_object(DataObject::new("Invoice"));
        assert!(store.is_dirty());
        store.mark_clean();
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_remove_object() {
        let mut store = store_with(&["Invoice", "Customer"]);
        let object_ref = store.resolver().object("Invoice").unwrap();
        let removed = store.remove_object(object_ref);
        assert_eq!(removed.name, "Invoice");
        assert!(store.resolver().object("Invoice").is_err());
        assert!(store.resolver().object("Customer").is_ok());
    }

    #[test]
    fn test_usages_of() {
        let mut store = store_with(&["Customer"]);
        let mut invoice = DataObject::new("Invoice");
        invoice.properties.push(Property {
            name: "CustomerId".into(),
            data_type: "Integer".into(),
            is_fk: true,
            fk_object_name: Some("Customer".into()),
            ..Default::default()
        });
        store.insert_object(invoice);

        let usages = store.usages_of("Customer");
        assert_eq!(
            usages,
            vec![Usage {
                object: "Invoice".into(),
                property: "CustomerId".into(),
            }]
        );
        assert!(store.usages_of("Invoice").is_empty());
    }
}
