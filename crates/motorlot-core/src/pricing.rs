//! # Pricing Module
//!
//! Pure derivation of cost price and profit, plus the compact number format
//! used by dashboard tiles.
//!
//! ## The Two Derivations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cost_price = purchase_price + extra_costs                              │
//! │      │  recomputed on EVERY vehicle edit, never stored independently   │
//! │      ▼                                                                  │
//! │  profit = sale_price - cost_price                                       │
//! │         computed ONCE at commit time and frozen on the Sale record     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sign Rules
//! - Inputs to [`cost_price`] are non-negative; a negative input is a
//!   validation error, never silently clamped.
//! - [`profit`] may be negative. A loss is valid data and must be displayed
//!   distinctly, never rejected.

use crate::error::{ValidationError, ValidationResult};

// =============================================================================
// Derivations
// =============================================================================

/// Derives the cost price of a vehicle.
///
/// ## Example
/// ```rust
/// use motorlot_core::pricing::cost_price;
///
/// assert_eq!(cost_price(8_000, 500).unwrap(), 8_500);
/// assert!(cost_price(-1, 0).is_err());
/// ```
pub fn cost_price(purchase_price: i64, extra_costs: i64) -> ValidationResult<i64> {
    if purchase_price < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "purchasePrice".to_string(),
        });
    }
    if extra_costs < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "extraCosts".to_string(),
        });
    }

    Ok(purchase_price + extra_costs)
}

/// Derives the profit of a sale. Negative results are valid (a loss).
#[inline]
pub const fn profit(sale_price: i64, cost_price: i64) -> i64 {
    sale_price - cost_price
}

// =============================================================================
// Compact Display Format
// =============================================================================

/// Formats a number for compact tile display.
///
/// - `>= 1_000_000` renders as `X.YM` (one decimal)
/// - `>= 1_000` renders as an integer with a `K` suffix
/// - otherwise the literal integer
///
/// Presentation only: the result must never feed back into stored or
/// compared values.
///
/// ## Example
/// ```rust
/// use motorlot_core::pricing::format_compact;
///
/// assert_eq!(format_compact(8_500_000), "8.5M");
/// assert_eq!(format_compact(12_000), "12K");
/// assert_eq!(format_compact(950), "950");
/// assert_eq!(format_compact(-50), "-50");
/// ```
pub fn format_compact(n: i64) -> String {
    if n >= 1_000_000 {
        // One decimal, rounded half up: 1_250_000 -> "1.3M".
        // Saturating add so an amount near i64::MAX cannot panic a
        // display helper.
        let tenths = n.saturating_add(50_000) / 100_000;
        format!("{}.{}M", tenths / 10, tenths % 10)
    } else if n >= 1_000 {
        // Integer thousands, rounded half up: 1_500 -> "2K"
        format!("{}K", n.saturating_add(500) / 1_000)
    } else {
        n.to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_price_sum() {
        assert_eq!(cost_price(8_000, 500).unwrap(), 8_500);
        assert_eq!(cost_price(0, 0).unwrap(), 0);
    }

    #[test]
    fn test_cost_price_rejects_negative_input() {
        assert_eq!(
            cost_price(-8_000, 500),
            Err(ValidationError::MustBeNonNegative {
                field: "purchasePrice".to_string()
            })
        );
        assert_eq!(
            cost_price(8_000, -1),
            Err(ValidationError::MustBeNonNegative {
                field: "extraCosts".to_string()
            })
        );
    }

    #[test]
    fn test_profit_may_be_negative() {
        assert_eq!(profit(10_000, 8_500), 1_500);
        assert_eq!(profit(8_000, 8_500), -500);
        assert_eq!(profit(8_500, 8_500), 0);
    }

    #[test]
    fn test_format_compact_thresholds() {
        assert_eq!(format_compact(0), "0");
        assert_eq!(format_compact(999), "999");
        assert_eq!(format_compact(1_000), "1K");
        assert_eq!(format_compact(1_500), "2K");
        assert_eq!(format_compact(999_999), "1000K");
        assert_eq!(format_compact(1_000_000), "1.0M");
        assert_eq!(format_compact(8_500_000), "8.5M");
        assert_eq!(format_compact(1_250_000), "1.3M");
    }

    #[test]
    fn test_format_compact_extreme_amount_does_not_panic() {
        assert_eq!(format_compact(i64::MAX), "9223372036854.7M");
    }

    #[test]
    fn test_format_compact_negative_is_literal() {
        // Losses render as literal integers; only gains are compacted
        assert_eq!(format_compact(-1_500_000), "-1500000");
        assert_eq!(format_compact(-50), "-50");
    }
}
