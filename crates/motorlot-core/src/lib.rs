//! # motorlot-core: Pure Business Logic for Motorlot
//!
//! This crate is the **heart** of the dealership back office. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Motorlot Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               External document store / auth provider           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  motorlot-store (async I/O)                     │   │
//! │  │   repositories • Sale Commit Protocol • Dealership facade       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ motorlot-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  pricing  │  │  report   │  │  filter   │  │   │
//! │  │   │  Vehicle  │  │ costPrice │  │  yearly   │  │  search   │  │   │
//! │  │   │   Sale    │  │  profit   │  │ dashboard │  │  narrow   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Vehicle, Sale, Expense, Employee, Identity)
//! - [`pricing`] - Cost price and profit derivation, compact number display
//! - [`report`] - The aggregation pipeline (yearly report, dashboard summary)
//! - [`filter`] - In-memory search and status/category narrowing
//! - [`error`] - Validation error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Document store, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: Monetary values are whole currency units (i64), never floats
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use motorlot_core::pricing;
//!
//! // Cost price is always derived, never stored independently
//! let cost = pricing::cost_price(8_000, 500).unwrap();
//! assert_eq!(cost, 8_500);
//!
//! // Profit may be negative (a loss) - that is valid data
//! assert_eq!(pricing::profit(10_000, cost), 1_500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod filter;
pub mod pricing;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use motorlot_core::Vehicle` instead of
// `use motorlot_core::types::Vehicle`

pub use error::{ValidationError, ValidationResult};
pub use report::{DashboardSummary, ExpenseScope, YearReport};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Earliest model year accepted on a vehicle form.
pub const MIN_VEHICLE_YEAR: i32 = 1990;

/// Latest model year accepted on a vehicle form.
pub const MAX_VEHICLE_YEAR: i32 = 2030;

/// Number of employees shown on the dashboard leaderboard.
pub const DASHBOARD_TOP_SELLERS: usize = 3;

/// Number of sales shown in the dashboard recent-sales list.
pub const DASHBOARD_RECENT_SALES: usize = 8;

/// Number of entries kept in the top-model ranking of the yearly report.
pub const REPORT_TOP_MODELS: usize = 5;
