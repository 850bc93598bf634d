//! Reordering engine for position-significant lists.
//!
//! Positions are implied by array order and are always `0..count-1` with no
//! gaps. A move is stable: the element is removed and reinserted, leaving
//! every other element's relative order unchanged.

use schemars::JsonSchema;
use serde::Serialize;
use thiserror::Error;

use super::document::{Named, names_collide};

/// Outcome of a successful move, returned so the caller can confirm the
/// effect without a second read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveOutcome {
    pub old_position: usize,
    pub new_position: usize,
    pub count: usize,
}

#[derive(Debug, Error)]
pub enum ReorderError {
    #[error("element not found: '{name}'")]
    NotFound { name: String },

    /// `position` is outside `[0, count)`.
    #[error("position {position} is out of bounds for a list of {count} elements")]
    OutOfBounds { position: i64, count: usize },
}

/// Move the element named `name` to `new_position` within `list`.
pub fn move_named<T: Named>(
    list: &mut Vec<T>,
    name: &str,
    new_position: i64,
) -> Result<MoveOutcome, ReorderError> {
    let count = list.len();
    if new_position < 0 || new_position as usize >= count {
        return Err(ReorderError::OutOfBounds {
            position: new_position,
            count,
        });
    }
    let old_position = list
        .iter()
        .position(|el| names_collide(el.entity_name(), name))
        .ok_or_else(|| ReorderError::NotFound {
            name: name.to_string(),
        })?;

    let new_position = new_position as usize;
    let element = list.remove(old_position);
    list.insert(new_position, element);

    Ok(MoveOutcome {
        old_position,
        new_position,
        count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::document::Parameter;

    fn params(names: &[&str]) -> Vec<Parameter> {
        names
            .iter()
            .map(|name| Parameter {
                name: name.to_string(),
                data_type: "Text".into(),
                is_required: false,
            })
            .collect()
    }

    fn names(list: &[Parameter]) -> Vec<&str> {
        list.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_stable_move_forward() {
        let mut list = params(&["A", "B", "C", "D"]);
        let outcome = move_named(&mut list, "A", 2).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome {
                old_position: 0,
                new_position: 2,
                count: 4
            }
        );
        assert_eq!(names(&list), vec!["B", "C", "A", "D"]);
    }

    #[test]
    fn test_stable_move_backward() {
        let mut list = params(&["A", "B", "C", "D"]);
        move_named(&mut list, "D", 0).unwrap();
        assert_eq!(names(&list), vec!["D", "A", "B", "C"]);
    }

    #[test]
    fn test_move_to_same_position() {
        let mut list = params(&["A", "B", "C"]);
        let outcome = move_named(&mut list, "B", 1).unwrap();
        assert_eq!(outcome.old_position, 1);
        assert_eq!(outcome.new_position, 1);
        assert_eq!(names(&list), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_length_is_preserved_for_every_valid_position() {
        for target in 0..4 {
            let mut list = params(&["A", "B", "C", "D"]);
            move_named(&mut list, "C", target).unwrap();
            assert_eq!(list.len(), 4);
            // Relative order of the untouched elements survives the move.
            let rest: Vec<_> = list.iter().filter(|p| p.name != "C").map(|p| &p.name).collect();
            assert_eq!(rest, vec!["A", "B", "D"]);
        }
    }

    #[test]
    fn test_position_at_count_is_rejected() {
        let mut list = params(&["A", "B", "C"]);
        let err = move_named(&mut list, "A", 3).unwrap_err();
        assert!(matches!(
            err,
            ReorderError::OutOfBounds { position: 3, count: 3 }
        ));
        assert_eq!(names(&list), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_negative_position_is_rejected() {
        let mut list = params(&["A", "B"]);
        assert!(matches!(
            move_named(&mut list, "A", -1),
            Err(ReorderError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_unknown_name() {
        let mut list = params(&["A"]);
        assert!(matches!(
            move_named(&mut list, "Z", 0),
            Err(ReorderError::NotFound { .. })
        ));
    }

    #[test]
    fn test_name_match_is_case_insensitive() {
        let mut list = params(&["Alpha", "Beta"]);
        move_named(&mut list, "beta", 0).unwrap();
        assert_eq!(names(&list), vec!["Beta", "Alpha"]);
    }
}
