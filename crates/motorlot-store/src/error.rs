//! # Store Error Types
//!
//! The error taxonomy every mutating operation reports through.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                     │
//! │                                                                         │
//! │  ValidationError (motorlot-core)                                        │
//! │       │  #[from]                                                        │
//! │       ▼                                                                 │
//! │  StoreError (this module)                                               │
//! │   ├── Validation  - malformed/missing input, reported inline            │
//! │   ├── Conflict    - precondition failed (e.g. double-sale attempt),     │
//! │   │                 user-actionable, NOT a generic error                │
//! │   ├── NotFound    - referenced document absent; surfaced, not retried   │
//! │   ├── Write       - transient store failure; the WHOLE logical          │
//! │   │                 operation is safe to retry                          │
//! │   ├── Forbidden   - caller's role does not allow the operation          │
//! │   └── Decode      - document body did not match the entity shape        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The Sale Commit Protocol recovers from partial dual-writes itself
//! (compensating delete) before any of these surface; all other components
//! propagate without local recovery.

use thiserror::Error;

use motorlot_core::ValidationError;

/// Store-layer operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed or missing required input.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// An invariant-protecting precondition failed.
    ///
    /// ## When This Occurs
    /// - Committing a sale on a vehicle that is already sold
    /// - Deleting a sold vehicle
    /// - Reviewing an expense that was already reviewed
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// Referenced document absent from its collection.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Transient failure talking to the store. The whole logical operation
    /// may be retried; retries re-check preconditions.
    #[error("store write failed: {0}")]
    Write(String),

    /// The caller's role does not permit this operation.
    #[error("forbidden: {action} requires an admin")]
    Forbidden { action: String },

    /// A stored document did not deserialize into its entity shape.
    #[error("corrupt document in '{collection}': {message}")]
    Decode { collection: String, message: String },
}

impl StoreError {
    /// Creates a Conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        StoreError::Conflict {
            message: message.into(),
        }
    }

    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a Forbidden error for an admin-gated action.
    pub fn forbidden(action: impl Into<String>) -> Self {
        StoreError::Forbidden {
            action: action.into(),
        }
    }

    /// Creates a Write error.
    pub fn write(message: impl Into<String>) -> Self {
        StoreError::Write(message.into())
    }

    /// Whether retrying the whole logical operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Write(_))
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → StoreError::NotFound
/// Other                       → StoreError::Write (retryable)
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound {
                entity: "Document".to_string(),
                id: "unknown".to_string(),
            },
            other => StoreError::Write(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Write(format!("migration failed: {err}"))
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::conflict("vehicle v-1 is already sold");
        assert_eq!(err.to_string(), "conflict: vehicle v-1 is already sold");

        let err = StoreError::not_found("Vehicle", "v-9");
        assert_eq!(err.to_string(), "Vehicle not found: v-9");

        let err = StoreError::forbidden("delete vehicle");
        assert_eq!(err.to_string(), "forbidden: delete vehicle requires an admin");
    }

    #[test]
    fn test_only_write_is_retryable() {
        assert!(StoreError::write("timeout").is_retryable());
        assert!(!StoreError::conflict("sold").is_retryable());
        assert!(!StoreError::not_found("Sale", "s-1").is_retryable());
    }

    #[test]
    fn test_validation_converts() {
        let err: StoreError = ValidationError::required("buyerName").into();
        assert!(matches!(err, StoreError::Validation(_)));
    }
}
