//! Document tree types.
//!
//! The document is a rooted, ordered tree: a [`Model`] holds namespaces,
//! namespaces hold data objects, data objects own their properties, lookup
//! items and workflows, and workflows own their parameters, buttons, columns
//! and output variables. Array order in the ordered lists is meaningful
//! application state (display position), not incidental.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Closed set of property/parameter data types.
pub const DATA_TYPES: &[&str] = &[
    "Text", "Integer", "Decimal", "Date", "DateTime", "Boolean", "Money", "Image", "File",
];

/// Root of the document tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub namespaces: Vec<Namespace>,
}

impl Model {
    /// A model with a single empty namespace, the shape a freshly opened
    /// document has before any object is created.
    pub fn with_default_namespace() -> Self {
        Self {
            namespaces: vec![Namespace::new("Default")],
        }
    }

    /// Iterate every data object across all namespaces in tree order.
    pub fn iter_objects(&self) -> impl Iterator<Item = &DataObject> {
        self.namespaces.iter().flat_map(|ns| ns.data_objects.iter())
    }
}

/// A namespace groups data objects and top-level collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Namespace {
    pub name: String,
    #[serde(default)]
    pub data_objects: Vec<DataObject>,
    #[serde(default)]
    pub user_stories: Vec<UserStory>,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A user story kept at namespace level.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStory {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A data object: the central named entity of the model.
///
/// Identity is the case-preserved `name`; sibling uniqueness and lookups are
/// case-insensitive (see `resolver`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DataObject {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Optional parent object reference; must name an existing object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_object_name: Option<String>,
    /// Lookup objects carry `lookup_items`; others must not.
    #[serde(default)]
    pub is_lookup: bool,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub lookup_items: Vec<LookupItem>,
    #[serde(default)]
    pub workflows: Vec<Workflow>,
}

impl DataObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A typed attribute of a data object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default, rename = "isFK")]
    pub is_fk: bool,
    /// Target object when `is_fk`; validated to exist at mutation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fk_object_name: Option<String>,
}

/// One entry of a lookup object's value list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LookupItem {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// Kind of a workflow, derived from naming suffix and flags rather than a
/// stored type field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowKind {
    Form,
    Report,
    Flow,
    PageInit,
}

impl WorkflowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Report => "report",
            Self::Flow => "flow",
            Self::PageInit => "pageInit",
        }
    }

    /// Required name suffix for the kind, if the convention demands one.
    pub fn required_suffix(&self) -> Option<&'static str> {
        match self {
            Self::Form => Some("Form"),
            Self::Report => Some("Report"),
            Self::Flow | Self::PageInit => None,
        }
    }
}

/// A workflow (form, report, general flow or page-init flow) owned by
/// exactly one data object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub name: String,
    /// Set on the flow that initializes the object's page.
    #[serde(default)]
    pub page_init: bool,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub buttons: Vec<Button>,
    /// Only reports carry columns.
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub output_variables: Vec<OutputVariable>,
}

impl Workflow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn page_init_for(object_name: &str) -> Self {
        Self {
            name: format!("{object_name}PageInit"),
            page_init: true,
            ..Default::default()
        }
    }

    pub fn kind(&self) -> WorkflowKind {
        if self.page_init {
            WorkflowKind::PageInit
        } else if self.name.ends_with("Form") {
            WorkflowKind::Form
        } else if self.name.ends_with("Report") {
            WorkflowKind::Report
        } else {
            WorkflowKind::Flow
        }
    }
}

/// An input parameter of a workflow.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    pub data_type: String,
    #[serde(default)]
    pub is_required: bool,
}

/// A button on a form or flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    pub name: String,
    #[serde(default)]
    pub caption: String,
}

/// A report column, optionally bound to a property of the owning object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_property: Option<String>,
}

/// An output variable produced by a workflow.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutputVariable {
    pub name: String,
    pub data_type: String,
}

/// Any entity that lives in a named, order-significant list.
pub trait Named {
    fn entity_name(&self) -> &str;
}

macro_rules! impl_named {
    ($($ty:ty),+) => {
        $(impl Named for $ty {
            fn entity_name(&self) -> &str {
                &self.name
            }
        })+
    };
}

impl_named!(DataObject, Property, LookupItem, Workflow, Parameter, Button, Column, OutputVariable);

/// Normalize a name for case-insensitive, space-insensitive comparison.
/// Storage always preserves the original casing.
pub fn normalized(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Case-insensitive name equality with space normalization.
pub fn names_collide(a: &str, b: &str) -> bool {
    normalized(a) == normalized(b)
}
