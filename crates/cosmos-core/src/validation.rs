//! # Field Validators
//!
//! Presence validators shared by every record type. They run on every
//! assignment: at construction and again before any mutation is committed.

use crate::ValidationError;

/// Validate a required text field.
///
/// Fails only if the value is empty; any non-empty string, whitespace
/// included, is accepted. Returns the owned value on success.
pub fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(value.to_string())
}

/// Validate a required foreign key. Zero means "absent".
pub fn require_reference(field: &'static str, id: u64) -> Result<u64, ValidationError> {
    if id == 0 {
        return Err(ValidationError::MissingReference { field });
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_rejected() {
        assert_eq!(
            require_text("name", ""),
            Err(ValidationError::Empty { field: "name" })
        );
    }

    #[test]
    fn whitespace_counts_as_present() {
        assert_eq!(require_text("name", " ").as_deref(), Ok(" "));
    }

    #[test]
    fn long_text_is_accepted() {
        let long = "x".repeat(1_000);
        assert_eq!(require_text("field_of_study", &long), Ok(long.clone()));
    }

    #[test]
    fn zero_reference_is_missing() {
        assert_eq!(
            require_reference("scientist_id", 0),
            Err(ValidationError::MissingReference {
                field: "scientist_id"
            })
        );
        assert_eq!(require_reference("scientist_id", 5), Ok(5));
    }
}
