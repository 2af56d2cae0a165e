//! # Error Types
//!
//! Validation error types for motorlot-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  motorlot-core errors (this file)                                       │
//! │  └── ValidationError  - Malformed or missing required input             │
//! │                                                                         │
//! │  motorlot-store errors (separate crate)                                 │
//! │  ├── StoreError::Validation  - wraps ValidationError                    │
//! │  ├── StoreError::Conflict    - invariant-protecting precondition failed │
//! │  ├── StoreError::NotFound    - referenced document absent               │
//! │  └── StoreError::Write       - transient store failure (retryable)      │
//! │                                                                         │
//! │  Flow: ValidationError → StoreError → caller                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending field in error messages
//! 3. Errors are enum variants, never String
//! 4. Aggregation NEVER raises: sparse data renders as zeros, not errors

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Reported inline to the caller, never silently defaulted except where a
/// field is explicitly optional.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative. Negative money input is an error,
    /// never silently clamped to zero.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value is not allowed in this position.
    #[error("{field} has invalid value: {reason}")]
    NotAllowed { field: String, reason: String },
}

impl ValidationError {
    /// Creates a Required error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates a NotAllowed error for the given field.
    pub fn not_allowed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::NotAllowed {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::required("buyerName");
        assert_eq!(err.to_string(), "buyerName is required");

        let err = ValidationError::MustBeNonNegative {
            field: "purchasePrice".to_string(),
        };
        assert_eq!(err.to_string(), "purchasePrice must not be negative");

        let err = ValidationError::OutOfRange {
            field: "year".to_string(),
            min: 1990,
            max: 2030,
        };
        assert_eq!(err.to_string(), "year must be between 1990 and 2030");
    }
}
