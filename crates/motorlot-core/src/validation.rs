//! # Validation Module
//!
//! Input validation rules shared by the store layer.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Calling surface (UI / API, out of scope here)                │
//! │  ├── Basic format checks, immediate user feedback                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                        │
//! │  ├── Required fields, sign rules, year range                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Document store (opaque - no schema enforcement assumed)       │
//! │                                                                         │
//! │  The store enforces nothing, so layer 2 is the last line of defense    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::{MAX_VEHICLE_YEAR, MIN_VEHICLE_YEAR};

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required free-text field.
///
/// ## Returns
/// The trimmed value.
///
/// ## Example
/// ```rust
/// use motorlot_core::validation::validate_required;
///
/// assert_eq!(validate_required("make", "  Toyota ").unwrap(), "Toyota");
/// assert!(validate_required("make", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(value.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a monetary amount that must not be negative (zero allowed).
pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a monetary amount that must be strictly positive.
///
/// Used for sale prices and expense amounts.
pub fn validate_positive(field: &str, value: i64) -> ValidationResult<()> {
    if value <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a vehicle model year.
pub fn validate_year(year: i32) -> ValidationResult<()> {
    if year < MIN_VEHICLE_YEAR || year > MAX_VEHICLE_YEAR {
        return Err(ValidationError::OutOfRange {
            field: "year".to_string(),
            min: MIN_VEHICLE_YEAR as i64,
            max: MAX_VEHICLE_YEAR as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert_eq!(validate_required("make", "Toyota").unwrap(), "Toyota");
        assert_eq!(validate_required("make", "  Camry  ").unwrap(), "Camry");
        assert!(validate_required("make", "").is_err());
        assert!(validate_required("make", "   ").is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("extraCosts", 0).is_ok());
        assert!(validate_non_negative("extraCosts", 500).is_ok());
        assert!(validate_non_negative("extraCosts", -1).is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("price", 1).is_ok());
        assert!(validate_positive("price", 0).is_err());
        assert!(validate_positive("price", -100).is_err());
    }

    #[test]
    fn test_validate_year_bounds() {
        assert!(validate_year(1990).is_ok());
        assert!(validate_year(2025).is_ok());
        assert!(validate_year(2030).is_ok());
        assert!(validate_year(1989).is_err());
        assert!(validate_year(2031).is_err());
    }
}
