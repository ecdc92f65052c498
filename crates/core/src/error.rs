use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// A single violated field constraint, reported with the wire (camelCase)
/// field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {}", join_violations(.0))]
    Validation(Vec<FieldViolation>),
}

impl CoreError {
    /// Shorthand for a validation error carrying one violation.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::Validation(vec![FieldViolation::new(field, message)])
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display_lists_every_field() {
        let err = CoreError::Validation(vec![
            FieldViolation::new("issueDate", "is required"),
            FieldViolation::new("userName", "is required"),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: issueDate: is required; userName: is required"
        );
    }

    #[test]
    fn not_found_display_names_entity_and_id() {
        let err = CoreError::NotFound {
            entity: "Issue",
            id: 7,
        };
        assert_eq!(err.to_string(), "Entity not found: Issue with id 7");
    }
}
