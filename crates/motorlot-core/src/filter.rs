//! # Filter Module
//!
//! The query/filter layer: free-text search plus exact status/category
//! narrowing over already-fetched snapshots.
//!
//! ## Matching Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Text match: lowercase(searchable fields, concatenated)                 │
//! │              CONTAINS lowercase(query)                                  │
//! │                                                                         │
//! │  Searchable fields per entity:                                          │
//! │    Vehicle  →  make + model + color                                     │
//! │    Sale     →  carName + buyerName + employeeName                       │
//! │    Expense  →  category + description + addedBy                         │
//! │                                                                         │
//! │  Status/category filter: exact match, AND-composed with the text        │
//! │  filter (never OR).                                                     │
//! │                                                                         │
//! │  Purely in memory - never re-queries the external store.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::types::{Expense, ExpenseStatus, Sale, Vehicle, VehicleStatus};

/// True when `haystack` (already lowercased) contains the query.
/// An empty query matches everything.
fn text_match(haystack: &str, query: &str) -> bool {
    query.is_empty() || haystack.contains(&query.to_lowercase())
}

/// Narrows vehicles by free-text query and optional exact status.
pub fn vehicles<'a>(
    items: &'a [Vehicle],
    query: &str,
    status: Option<VehicleStatus>,
) -> Vec<&'a Vehicle> {
    items
        .iter()
        .filter(|v| {
            let haystack = format!("{} {} {}", v.make, v.model, v.color).to_lowercase();
            text_match(&haystack, query) && status.map_or(true, |s| v.status == s)
        })
        .collect()
}

/// Narrows sales by free-text query.
pub fn sales<'a>(items: &'a [Sale], query: &str) -> Vec<&'a Sale> {
    items
        .iter()
        .filter(|s| {
            let haystack =
                format!("{} {} {}", s.car_name, s.buyer_name, s.employee_name).to_lowercase();
            text_match(&haystack, query)
        })
        .collect()
}

/// Narrows expenses by free-text query and optional exact status.
pub fn expenses<'a>(
    items: &'a [Expense],
    query: &str,
    status: Option<ExpenseStatus>,
) -> Vec<&'a Expense> {
    items
        .iter()
        .filter(|e| {
            let haystack = format!(
                "{} {} {}",
                e.category.as_str(),
                e.description,
                e.added_by
            )
            .to_lowercase();
            text_match(&haystack, query) && status.map_or(true, |s| e.status == s)
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
