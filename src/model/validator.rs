//! Mutation validator.
//!
//! Checks naming conventions, sibling uniqueness, referential integrity and
//! closed value sets before any write commits. Validation is all-or-nothing:
//! a single pass collects every violation found and returns the complete
//! list, so a caller can correct everything in one round trip.

use schemars::JsonSchema;
use serde::Serialize;

use super::document::{DATA_TYPES, names_collide};
use super::store::DocumentStore;

/// One broken rule, naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub field: String,
    pub rule: &'static str,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule,
            message: message.into(),
        }
    }
}

/// True when `name` is a conventionally-cased identifier: leading uppercase
/// letter, ASCII alphanumerics only, no spaces, every word capitalized.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric())
}

/// Collects violations against one store snapshot.
pub struct MutationValidator<'a> {
    store: &'a DocumentStore,
    violations: Vec<Violation>,
}

impl<'a> MutationValidator<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self {
            store,
            violations: Vec::new(),
        }
    }

    /// Naming convention check for a newly created entity name.
    pub fn identifier(&mut self, field: &str, value: &str) -> &mut Self {
        if !is_identifier(value) {
            self.violations.push(Violation::new(
                field,
                "naming",
                format!(
                    "'{value}' is not a valid identifier; expected PascalCase \
                     (leading letter, no spaces, every word capitalized)"
                ),
            ));
        }
        self
    }

    /// Case-insensitive collision check against sibling names at the same
    /// scope. Storage preserves the original case; collisions do not.
    pub fn unique_among<'b>(
        &mut self,
        field: &str,
        value: &str,
        siblings: impl IntoIterator<Item = &'b str>,
    ) -> &mut Self {
        if let Some(existing) = siblings.into_iter().find(|s| names_collide(s, value)) {
            self.violations.push(Violation::new(
                field,
                "uniqueness",
                format!("'{value}' collides with existing sibling '{existing}'"),
            ));
        }
        self
    }

    /// Model-wide object name collision check.
    pub fn unique_object_name(&mut self, field: &str, value: &str) -> &mut Self {
        let names = self
            .store
            .model()
            .iter_objects()
            .map(|obj| obj.name.as_str())
            .collect::<Vec<_>>();
        self.unique_among(field, value, names)
    }

    /// Referential integrity: the FK target object must exist right now.
    pub fn fk_target(&mut self, field: &str, target: &str) -> &mut Self {
        if self.store.resolver().object(target).is_err() {
            self.violations.push(Violation::new(
                field,
                "referentialIntegrity",
                format!("foreign key target object '{target}' does not exist"),
            ));
        }
        self
    }

    /// Closed-set check for an enumerated field.
    pub fn one_of(&mut self, field: &str, value: &str, allowed: &[&str]) -> &mut Self {
        if !allowed.contains(&value) {
            self.violations.push(Violation::new(
                field,
                "enum",
                format!(
                    "'{value}' is not a valid value for {field}; expected one of: {}",
                    allowed.join(", ")
                ),
            ));
        }
        self
    }

    /// Closed-set check for data types.
    pub fn data_type(&mut self, field: &str, value: &str) -> &mut Self {
        self.one_of(field, value, DATA_TYPES)
    }

    /// Boolean-like wire fields are the literal strings "true" / "false".
    pub fn bool_literal(&mut self, field: &str, value: &str) -> &mut Self {
        if value != "true" && value != "false" {
            self.violations.push(Violation::new(
                field,
                "enum",
                format!("'{value}' is not a valid flag; expected \"true\" or \"false\""),
            ));
        }
        self
    }

    /// Structural rule that does not fit the other categories.
    pub fn structural(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.violations
            .push(Violation::new(field, "structure", message));
        self
    }

    /// Record a pre-built violation.
    pub fn record(&mut self, violation: Violation) -> &mut Self {
        self.violations.push(violation);
        self
    }

    /// All-or-nothing outcome: empty list means the mutation may commit.
    pub fn finish(self) -> Result<(), Vec<Violation>> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(self.violations)
        }
    }
}

/// Parse an already-validated "true"/"false" literal.
pub fn parse_flag(value: &str) -> bool {
    value == "true"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::document::DataObject;

    fn store_with_invoice() -> DocumentStore {
        let mut store = DocumentStore::empty();
        store.insert_object(DataObject::new("Invoice"));
        store
    }

    #[test]
    fn test_identifier_convention() {
        assert!(is_identifier("Invoice"));
        assert!(is_identifier("InvoiceLine2"));
        assert!(!is_identifier("invoice"));
        assert!(!is_identifier("Invoice Line"));
        assert!(!is_identifier("2Invoice"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("Invoice_Line"));
    }

    #[test]
    fn test_uniqueness_is_case_insensitive() {
        let store = store_with_invoice();
        let mut validator = MutationValidator::new(&store);
        validator.unique_object_name("name", "invoice");
        let violations = validator.finish().unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, "uniqueness");
        assert!(violations[0].message.contains("Invoice"));
    }

    #[test]
    fn test_fk_target_must_exist() {
        let store = store_with_invoice();
        let mut validator = MutationValidator::new(&store);
        validator.fk_target("fkObjectName", "DoesNotExist");
        let violations = validator.finish().unwrap_err();
        assert_eq!(violations[0].rule, "referentialIntegrity");
        assert!(violations[0].message.contains("DoesNotExist"));
    }

    #[test]
    fn test_fk_target_exists_passes() {
        let store = store_with_invoice();
        let mut validator = MutationValidator::new(&store);
        validator.fk_target("fkObjectName", "Invoice");
        assert!(validator.finish().is_ok());
    }

    #[test]
    fn test_data_type_closed_set() {
        let store = DocumentStore::empty();
        let mut validator = MutationValidator::new(&store);
        validator.data_type("dataType", "Text");
        assert!(validator.finish().is_ok());

        let mut validator = MutationValidator::new(&store);
        validator.data_type("dataType", "Varchar");
        assert_eq!(validator.finish().unwrap_err()[0].rule, "enum");
    }

    #[test]
    fn test_bool_literal() {
        let store = DocumentStore::empty();
        let mut validator = MutationValidator::new(&store);
        validator
            .bool_literal("isRequired", "true")
            .bool_literal("isFK", "yes");
        let violations = validator.finish().unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "isFK");
    }

    #[test]
    fn test_collects_every_violation_in_one_pass() {
        let store = store_with_invoice();
        let mut validator = MutationValidator::new(&store);
        validator
            .identifier("name", "bad name")
            .unique_object_name("name", "Invoice")
            .data_type("dataType", "Nope")
            .fk_target("fkObjectName", "Missing");
        let violations = validator.finish().unwrap_err();
        assert_eq!(violations.len(), 4);
    }
}
