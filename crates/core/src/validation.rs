//! Form validation support

use thiserror::Error;

/// A form value the backend would reject
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be a non-negative number")]
    Negative { field: String },

    #[error("{field} must not exceed {max}")]
    TooLarge { field: String, max: String },

    #[error("{field} appears more than once")]
    Duplicate { field: String },
}

/// Common validation helpers
pub mod validators {
    use super::ValidationError;

    /// Validate that a text field is not blank
    pub fn validate_required(value: &str, field: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::Required {
                field: field.to_string(),
            });
        }
        Ok(())
    }

    /// Validate that an amount is finite and not below zero
    pub fn validate_amount(value: f64, field: &str) -> Result<(), ValidationError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::Negative {
                field: field.to_string(),
            });
        }
        Ok(())
    }

    /// Validate an amount and cap it at `max`
    pub fn validate_amount_at_most(
        value: f64,
        max: f64,
        field: &str,
    ) -> Result<(), ValidationError> {
        validate_amount(value, field)?;
        if value > max {
            return Err(ValidationError::TooLarge {
                field: field.to_string(),
                max: max.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::validators::*;
    use super::*;

    #[test]
    fn test_validate_required() {
        assert!(validate_required("ops@acme.test", "email").is_ok());
        assert_eq!(
            validate_required("   ", "email"),
            Err(ValidationError::Required {
                field: "email".to_string()
            })
        );
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(0.0, "value").is_ok());
        assert!(validate_amount(12.5, "value").is_ok());
        assert!(validate_amount(-0.01, "value").is_err());
        assert!(validate_amount(f64::NAN, "value").is_err());
        assert!(validate_amount(f64::INFINITY, "value").is_err());
    }

    #[test]
    fn test_validate_amount_at_most() {
        assert!(validate_amount_at_most(100.0, 100.0, "value").is_ok());
        let err = validate_amount_at_most(100.5, 100.0, "value").unwrap_err();
        assert_eq!(err.to_string(), "value must not exceed 100");
    }
}
