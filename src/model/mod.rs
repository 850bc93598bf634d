//! Document model domain.
//!
//! The document tree types, the store that owns the open document, and the
//! three engines every mutation passes through: resolver, validator and
//! reorderer.

pub mod document;
pub mod reorder;
pub mod resolver;
pub mod store;
pub mod validator;

pub use document::{
    Button, Column, DATA_TYPES, DataObject, LookupItem, Model, Named, Namespace, OutputVariable,
    Parameter, Property, UserStory, Workflow, WorkflowKind,
};
pub use reorder::{MoveOutcome, ReorderError, move_named};
pub use resolver::{EntityResolver, ObjectRef, ResolveError, WorkflowRef};
pub use store::{DocumentStore, Usage};
pub use validator::{MutationValidator, Violation, is_identifier, parse_flag};
