//! Core types for plugin options

/// Trait for types that can be validated
#[allow(clippy::missing_errors_doc)]
pub trait Validate {
    /// Type of validation error
    type Error;

    /// Validates this type
    fn validate(&self) -> std::result::Result<(), Self::Error>;
}

/// Fails with [`ValidationError::EmptyField`] when `value` is blank
///
/// # Errors
///
/// Returns an error naming `field` if `value` is empty or whitespace.
///
/// [`ValidationError::EmptyField`]: super::ValidationError::EmptyField
pub fn require_non_empty(
    field: &'static str,
    value: &str,
) -> Result<(), super::ValidationError> {
    if value.trim().is_empty() {
        return Err(super::ValidationError::EmptyField { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::ValidationError;

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("project", "site").is_ok());
        assert_eq!(
            require_non_empty("project", "  "),
            Err(ValidationError::EmptyField { field: "project" })
        );
    }
}
