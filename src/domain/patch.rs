//! JSON Patch (RFC 6902) documents applied to a point-of-interest snapshot.
//!
//! Only the two mutable fields are addressable: `/name` and `/description`.
//! Property names are matched case-insensitively. Application works on a
//! [`PointOfInterestPatchTarget`] copy so a failing document never touches the
//! stored entity.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::model::{PointOfInterest, PointOfInterestForUpdate};
use crate::domain::validation::{validate_fields, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    Test { path: String, value: Value },
}

impl PatchOperation {
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::Replace { .. } => "replace",
            Self::Move { .. } => "move",
            Self::Copy { .. } => "copy",
            Self::Test { .. } => "test",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchDocument {
    operations: Vec<PatchOperation>,
}

impl PatchDocument {
    pub fn new(operations: Vec<PatchOperation>) -> Self {
        Self { operations }
    }

    pub fn operations(&self) -> &[PatchOperation] {
        &self.operations
    }

    /// Applies every operation in document order, stopping at the first
    /// structural failure. The target may be partially modified on error.
    pub fn apply_to(&self, target: &mut PointOfInterestPatchTarget) -> Result<(), PatchError> {
        for (index, operation) in self.operations.iter().enumerate() {
            target.apply(index, operation)?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatchError {
    #[error("operation {index} ({op}): the target location '{path}' does not exist")]
    UnknownPath {
        index: usize,
        op: &'static str,
        path: String,
    },

    #[error("operation {index} ({op}): the value for '{path}' must be a string or null")]
    InvalidValue {
        index: usize,
        op: &'static str,
        path: String,
    },

    #[error("operation {index} (test): the current value at '{path}' is {actual}, expected {expected}")]
    TestFailed {
        index: usize,
        path: String,
        expected: Value,
        actual: Value,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatchField {
    Name,
    Description,
}

/// Mutable copy of the update shape. Fields are optional because `remove`
/// and `move` can clear them; validation decides whether that is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointOfInterestPatchTarget {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl From<&PointOfInterest> for PointOfInterestPatchTarget {
    fn from(point: &PointOfInterest) -> Self {
        Self {
            name: Some(point.name.clone()),
            description: point.description.clone(),
        }
    }
}

impl PointOfInterestPatchTarget {
    /// Field rules plus the name/description rule; on success yields the
    /// update that can be copied onto the entity.
    pub fn into_validated_update(self) -> Result<PointOfInterestForUpdate, ValidationErrors> {
        let errors = validate_fields(self.name.as_deref(), self.description.as_deref());

        match self.name {
            Some(name) if errors.is_empty() => Ok(PointOfInterestForUpdate {
                name,
                description: self.description,
            }),
            _ => Err(errors),
        }
    }

    fn apply(&mut self, index: usize, operation: &PatchOperation) -> Result<(), PatchError> {
        let op = operation.verb();
        match operation {
            PatchOperation::Add { path, value } | PatchOperation::Replace { path, value } => {
                let field = parse_path(index, op, path)?;
                let value = string_value(index, op, path, value)?;
                *self.slot(field) = value;
            }
            PatchOperation::Remove { path } => {
                let field = parse_path(index, op, path)?;
                *self.slot(field) = None;
            }
            PatchOperation::Move { from, path } => {
                let source = parse_path(index, op, from)?;
                let target = parse_path(index, op, path)?;
                if source != target {
                    let value = self.slot(source).take();
                    *self.slot(target) = value;
                }
            }
            PatchOperation::Copy { from, path } => {
                let source = parse_path(index, op, from)?;
                let target = parse_path(index, op, path)?;
                let value = self.slot(source).clone();
                *self.slot(target) = value;
            }
            PatchOperation::Test { path, value } => {
                let field = parse_path(index, op, path)?;
                let actual = match self.slot(field) {
                    Some(current) => Value::String(current.clone()),
                    None => Value::Null,
                };
                if &actual != value {
                    return Err(PatchError::TestFailed {
                        index,
                        path: path.clone(),
                        expected: value.clone(),
                        actual,
                    });
                }
            }
        }
        Ok(())
    }

    fn slot(&mut self, field: PatchField) -> &mut Option<String> {
        match field {
            PatchField::Name => &mut self.name,
            PatchField::Description => &mut self.description,
        }
    }
}

fn parse_path(index: usize, op: &'static str, path: &str) -> Result<PatchField, PatchError> {
    let unknown = || PatchError::UnknownPath {
        index,
        op,
        path: path.to_string(),
    };

    let segment = path.strip_prefix('/').ok_or_else(unknown)?;
    if segment.contains('/') {
        return Err(unknown());
    }

    if segment.eq_ignore_ascii_case("name") {
        Ok(PatchField::Name)
    } else if segment.eq_ignore_ascii_case("description") {
        Ok(PatchField::Description)
    } else {
        Err(unknown())
    }
}

fn string_value(
    index: usize,
    op: &'static str,
    path: &str,
    value: &Value,
) -> Result<Option<String>, PatchError> {
    match value {
        Value::String(s) => Ok(Some(s.clone())),
        Value::Null => Ok(None),
        _ => Err(PatchError::InvalidValue {
            index,
            op,
            path: path.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn target(name: &str, description: Option<&str>) -> PointOfInterestPatchTarget {
        PointOfInterestPatchTarget {
            name: Some(name.to_string()),
            description: description.map(str::to_string),
        }
    }

    fn document(value: Value) -> PatchDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parses_all_operation_kinds() {
        let doc = document(json!([
            {"op": "add", "path": "/name", "value": "A"},
            {"op": "remove", "path": "/description"},
            {"op": "replace", "path": "/name", "value": "B"},
            {"op": "move", "from": "/name", "path": "/description"},
            {"op": "copy", "from": "/description", "path": "/name"},
            {"op": "test", "path": "/name", "value": "B"}
        ]));

        let verbs: Vec<&str> = doc.operations().iter().map(PatchOperation::verb).collect();
        assert_eq!(verbs, ["add", "remove", "replace", "move", "copy", "test"]);
    }

    #[test]
    fn unknown_verb_does_not_parse() {
        let result: Result<PatchDocument, _> =
            serde_json::from_value(json!([{"op": "increment", "path": "/name"}]));
        assert!(result.is_err());
    }

    #[test]
    fn replace_and_remove_update_the_snapshot() {
        let mut snapshot = target("Central Park", Some("Big park"));
        let doc = document(json!([
            {"op": "replace", "path": "/Name", "value": "Bryant Park"},
            {"op": "remove", "path": "/description"}
        ]));

        doc.apply_to(&mut snapshot).unwrap();

        assert_eq!(snapshot, target("Bryant Park", None));
    }

    #[test]
    fn move_clears_the_source_and_copy_keeps_it() {
        let mut moved = target("Louvre", Some("Museum"));
        document(json!([{"op": "move", "from": "/name", "path": "/description"}]))
            .apply_to(&mut moved)
            .unwrap();
        assert_eq!(moved.name, None);
        assert_eq!(moved.description.as_deref(), Some("Louvre"));

        let mut copied = target("Louvre", Some("Museum"));
        document(json!([{"op": "copy", "from": "/name", "path": "/description"}]))
            .apply_to(&mut copied)
            .unwrap();
        assert_eq!(copied, target("Louvre", Some("Louvre")));
    }

    #[test]
    fn move_onto_itself_is_a_no_op() {
        let mut snapshot = target("Louvre", Some("Museum"));
        document(json!([{"op": "move", "from": "/name", "path": "/name"}]))
            .apply_to(&mut snapshot)
            .unwrap();
        assert_eq!(snapshot, target("Louvre", Some("Museum")));
    }

    #[test]
    fn unknown_paths_are_structural_errors() {
        for path in ["/id", "/name/0", "name", "", "/"] {
            let mut snapshot = target("A", Some("B"));
            let err = document(json!([{"op": "replace", "path": path, "value": "x"}]))
                .apply_to(&mut snapshot)
                .unwrap_err();
            assert!(
                matches!(err, PatchError::UnknownPath { index: 0, op: "replace", .. }),
                "path {path:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn non_string_values_are_rejected() {
        let mut snapshot = target("A", Some("B"));
        let err = document(json!([
            {"op": "replace", "path": "/description", "value": "ok"},
            {"op": "add", "path": "/name", "value": 42}
        ]))
        .apply_to(&mut snapshot)
        .unwrap_err();

        assert_eq!(
            err,
            PatchError::InvalidValue {
                index: 1,
                op: "add",
                path: "/name".to_string()
            }
        );
    }

    #[test]
    fn failed_test_operation_stops_the_document() {
        let mut snapshot = target("A", Some("B"));
        let err = document(json!([
            {"op": "test", "path": "/name", "value": "Z"},
            {"op": "replace", "path": "/name", "value": "C"}
        ]))
        .apply_to(&mut snapshot)
        .unwrap_err();

        assert!(matches!(err, PatchError::TestFailed { index: 0, .. }));
        assert_eq!(snapshot.name.as_deref(), Some("A"));
    }

    #[test]
    fn test_against_missing_field_compares_with_null() {
        let mut snapshot = target("A", None);
        document(json!([{"op": "test", "path": "/description", "value": null}]))
            .apply_to(&mut snapshot)
            .unwrap();
    }

    #[test]
    fn validated_update_enforces_cross_field_rule() {
        let errors = target("B", Some("B")).into_validated_update().unwrap_err();
        assert!(errors.has_error("description"));

        let update = target("A", Some("B")).into_validated_update().unwrap();
        assert_eq!(update.name, "A");
        assert_eq!(update.description.as_deref(), Some("B"));
    }

    #[test]
    fn removed_name_fails_validation() {
        let snapshot = PointOfInterestPatchTarget {
            name: None,
            description: Some("B".to_string()),
        };
        let errors = snapshot.into_validated_update().unwrap_err();
        assert!(errors.has_error("name"));
    }
}
