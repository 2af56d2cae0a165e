//! # Document Store Abstraction
//!
//! The capability set the core depends on, modelled after the external
//! managed document database: named record collections with
//! insert-with-generated-id, partial-merge update, delete, equality-filtered
//! query, ordered query, and a change subscription.
//!
//! ## The Guarded Update
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  update_guarded(collection, id, "status", forbidden="sold", patch)      │
//! │                                                                         │
//! │  One atomic read-modify-write:                                          │
//! │      match document WHERE id = ?  AND  status IS NOT "sold"             │
//! │      └── hit  → apply patch, return true                                │
//! │      └── miss → change nothing,  return false                           │
//! │                                                                         │
//! │  This single primitive is the sole safeguard against the double-sale    │
//! │  race: two sessions selling the same vehicle resolve to exactly one     │
//! │  hit and one miss, never two hits. A separate read followed by an       │
//! │  unconditional write would NOT be safe.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::error::StoreResult;

// =============================================================================
// Supporting Types
// =============================================================================

/// Direction for ordered queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Notification that a document in a collection changed.
///
/// Subscribers re-fetch the result set they care about; the event itself
/// carries no body (matching a live-query store that re-delivers the full
/// matching set on every underlying change).
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub collection: String,
    pub id: String,
}

// =============================================================================
// DocumentStore Trait
// =============================================================================

/// An opaque keyed record collection with query-by-equality and
/// live-subscription capability.
///
/// Document bodies are JSON objects. The store owns id generation; after
/// [`insert`](DocumentStore::insert) the body's `id` field carries the
/// generated id. Updates are partial merges of top-level fields.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a document and returns its generated id.
    async fn insert(&self, collection: &str, body: Value) -> StoreResult<String>;

    /// Fetches a document by id. `Ok(None)` when absent.
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>>;

    /// Merges `patch` into the document's top-level fields.
    /// Fails with `NotFound` when the document is absent.
    async fn update(&self, collection: &str, id: &str, patch: Value) -> StoreResult<()>;

    /// Conditionally merges `patch` as one atomic read-modify-write:
    /// the patch applies only when the document exists AND its
    /// `guard_field` does not equal `forbidden`.
    ///
    /// ## Returns
    /// * `Ok(true)` - document matched and was updated
    /// * `Ok(false)` - document absent or guard failed; nothing changed
    async fn update_guarded(
        &self,
        collection: &str,
        id: &str,
        guard_field: &str,
        forbidden: &Value,
        patch: Value,
    ) -> StoreResult<bool>;

    /// Deletes a document by id. Fails with `NotFound` when absent.
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;

    /// Returns all documents whose top-level `field` equals `value`.
    /// No ordering is guaranteed; callers compute their own.
    async fn find_eq(&self, collection: &str, field: &str, value: &Value)
        -> StoreResult<Vec<Value>>;

    /// Returns all documents in a collection ordered by a top-level field.
    async fn list(
        &self,
        collection: &str,
        order_by: &str,
        order: SortOrder,
    ) -> StoreResult<Vec<Value>>;

    /// Subscribes to change notifications across all collections.
    fn changes(&self) -> broadcast::Receiver<ChangeEvent>;
}

// =============================================================================
// Shared Helpers
// =============================================================================

/// Merges `patch` into `body` at the top level (last-writer-wins per field).
pub(crate) fn merge_patch(body: &mut Value, patch: &Value) {
    if let (Some(target), Some(fields)) = (body.as_object_mut(), patch.as_object()) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
}

/// Total order over the JSON values we sort by (RFC 3339 strings, numbers).
/// Mixed or non-comparable types compare equal, keeping the sort stable.
pub(crate) fn compare_values(a: &Value, b: &Value) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    match (a, b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_patch_is_shallow_last_writer_wins() {
        let mut body = json!({"status": "available", "color": "White"});
        merge_patch(&mut body, &json!({"status": "sold"}));
        assert_eq!(body, json!({"status": "sold", "color": "White"}));
    }

    #[test]
    fn test_compare_values() {
        use std::cmp::Ordering;

        assert_eq!(
            compare_values(&json!("2025-01-01T00:00:00Z"), &json!("2025-06-01T00:00:00Z")),
            Ordering::Less
        );
        assert_eq!(compare_values(&json!(2), &json!(1)), Ordering::Greater);
        // Mixed types stay put
        assert_eq!(compare_values(&json!("a"), &json!(1)), Ordering::Equal);
    }
}
