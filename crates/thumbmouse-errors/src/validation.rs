//! Configuration validation errors.
//!
//! Raised while loading calibration, shaping and timing configuration, before
//! anything starts running. At runtime the same class of problem surfaces as
//! [`ErrorCode::ConfigurationFault`](crate::ErrorCode::ConfigurationFault).

use core::fmt;

use crate::common::ErrorSeverity;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Value out of range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Field name
        field: String,
        /// The invalid value
        value: String,
        /// Minimum allowed value
        min: String,
        /// Maximum allowed value
        max: String,
    },

    /// Value must be non-zero
    #[error("Field '{0}' must be non-zero")]
    Zero(String),

    /// Calibration points are not strictly ordered
    #[error("Field '{field}' is not ordered: {reason}")]
    Unordered {
        /// Field name
        field: String,
        /// Which ordering was violated
        reason: String,
    },

    /// Collection must contain at least one entry
    #[error("Field '{0}' must not be empty")]
    Empty(String),

    /// Invalid enum value
    #[error("Invalid value '{value}' for field '{field}', expected one of: {expected}")]
    InvalidEnumValue {
        /// Field name
        field: String,
        /// The invalid value
        value: String,
        /// Expected values
        expected: String,
    },

    /// Constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl ValidationError {
    /// Create an out of range error.
    pub fn out_of_range<T: fmt::Display>(field: impl Into<String>, value: T, min: T, max: T) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    /// Create a zero-value error.
    pub fn zero(field: impl Into<String>) -> Self {
        ValidationError::Zero(field.into())
    }

    /// Create an ordering error.
    pub fn unordered(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::Unordered {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an empty-collection error.
    pub fn empty(field: impl Into<String>) -> Self {
        ValidationError::Empty(field.into())
    }

    /// Create an invalid enum value error.
    pub fn invalid_enum(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        ValidationError::InvalidEnumValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Create a constraint violation error.
    pub fn constraint(msg: impl Into<String>) -> Self {
        ValidationError::ConstraintViolation(msg.into())
    }

    /// Configuration problems block startup.
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = ValidationError::out_of_range("sign", 3, -1, 1);
        assert_eq!(err.to_string(), "sign value 3 is out of range [-1, 1]");
    }

    #[test]
    fn test_unordered_message() {
        let err = ValidationError::unordered("x", "min 500 >= center 412");
        assert!(err.to_string().contains("min 500 >= center 412"));
    }

    #[test]
    fn test_zero_message() {
        let err = ValidationError::zero("report_frequency_hz");
        assert_eq!(
            err.to_string(),
            "Field 'report_frequency_hz' must be non-zero"
        );
    }
}
