//! Field-level rules shared by every point-of-interest write path.
//!
//! Create payloads, replace payloads and the snapshot produced by a patch
//! document all go through [`validate_fields`]. Every violated rule is
//! collected; nothing here fails fast.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::model::{PointOfInterestForCreation, PointOfInterestForUpdate};

pub const NAME_FIELD: &str = "name";
pub const DESCRIPTION_FIELD: &str = "description";

pub const NAME_MAX_LENGTH: usize = 50;
pub const DESCRIPTION_MAX_LENGTH: usize = 200;

pub const NAME_REQUIRED_MESSAGE: &str = "You should provide a name value.";
pub const DESCRIPTION_MUST_DIFFER_MESSAGE: &str = "description must differ from name";

/// `(field, message)` pairs keyed by field, in the shape returned to clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has_error(&self, field: &str) -> bool {
        !self.field(field).is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| (field.as_str(), m.as_str())))
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Runs the structural rules and the name/description distinctness rule.
///
/// `name` is optional because a patch document may have removed it.
pub fn validate_fields(name: Option<&str>, description: Option<&str>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    match name {
        None => errors.add(NAME_FIELD, NAME_REQUIRED_MESSAGE),
        Some(name) if name.trim().is_empty() => errors.add(NAME_FIELD, NAME_REQUIRED_MESSAGE),
        Some(name) if name.chars().count() > NAME_MAX_LENGTH => errors.add(
            NAME_FIELD,
            format!("{} must be at most {} characters", NAME_FIELD, NAME_MAX_LENGTH),
        ),
        Some(_) => {}
    }

    if let Some(description) = description {
        if description.chars().count() > DESCRIPTION_MAX_LENGTH {
            errors.add(
                DESCRIPTION_FIELD,
                format!(
                    "{} must be at most {} characters",
                    DESCRIPTION_FIELD, DESCRIPTION_MAX_LENGTH
                ),
            );
        }
    }

    // 兩者皆為空值也算相同
    if name == description {
        errors.add(DESCRIPTION_FIELD, DESCRIPTION_MUST_DIFFER_MESSAGE);
    }

    errors
}

pub trait ValidatePayload {
    fn validate_payload(&self) -> Result<(), ValidationErrors>;
}

impl ValidatePayload for PointOfInterestForCreation {
    fn validate_payload(&self) -> Result<(), ValidationErrors> {
        validate_fields(Some(self.name.as_str()), self.description.as_deref()).into_result()
    }
}

impl ValidatePayload for PointOfInterestForUpdate {
    fn validate_payload(&self) -> Result<(), ValidationErrors> {
        validate_fields(Some(self.name.as_str()), self.description.as_deref()).into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_payload_has_no_errors() {
        let errors = validate_fields(Some("Central Park"), Some("A big park"));
        assert!(errors.is_empty());
    }

    #[test]
    fn missing_description_is_allowed() {
        assert!(validate_fields(Some("Central Park"), None).is_empty());
    }

    #[test]
    fn equal_name_and_description_fails_on_description() {
        let errors = validate_fields(Some("Louvre"), Some("Louvre"));

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.field(DESCRIPTION_FIELD), [DESCRIPTION_MUST_DIFFER_MESSAGE]);
        assert!(!errors.has_error(NAME_FIELD));
    }

    #[test]
    fn empty_and_whitespace_names_are_rejected() {
        assert!(validate_fields(Some(""), Some("x")).has_error(NAME_FIELD));
        assert!(validate_fields(Some("   "), Some("x")).has_error(NAME_FIELD));
        assert!(validate_fields(None, Some("x")).has_error(NAME_FIELD));
    }

    #[test]
    fn all_violations_are_reported_together() {
        let long_name = "n".repeat(NAME_MAX_LENGTH + 1);
        let long_description = "d".repeat(DESCRIPTION_MAX_LENGTH + 1);

        let errors = validate_fields(Some(long_name.as_str()), Some(long_description.as_str()));
        assert!(errors.has_error(NAME_FIELD));
        assert!(errors.has_error(DESCRIPTION_FIELD));
        assert_eq!(errors.len(), 2);

        let errors = validate_fields(None, None);
        assert!(errors.has_error(NAME_FIELD));
        assert_eq!(errors.field(DESCRIPTION_FIELD), [DESCRIPTION_MUST_DIFFER_MESSAGE]);
    }

    #[test]
    fn length_limits_count_characters() {
        let name = "é".repeat(NAME_MAX_LENGTH);
        assert!(validate_fields(Some(name.as_str()), None).is_empty());
    }

    #[test]
    fn payloads_share_the_same_rules() {
        let create = PointOfInterestForCreation {
            name: "Same".to_string(),
            description: Some("Same".to_string()),
        };
        let update = PointOfInterestForUpdate {
            name: "Same".to_string(),
            description: Some("Same".to_string()),
        };

        let create_errors = create.validate_payload().unwrap_err();
        let update_errors = update.validate_payload().unwrap_err();
        assert_eq!(create_errors, update_errors);
    }

    #[test]
    fn display_lists_every_pair() {
        let errors = validate_fields(Some(""), Some(""));
        let text = errors.to_string();
        assert!(text.contains("name: You should provide a name value."));
        assert!(text.contains("description: description must differ from name"));
    }
}
