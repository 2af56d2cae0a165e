//! # In-Memory Store Backend
//!
//! A [`DocumentStore`] held entirely in process memory. Used by the test
//! suite and as an offline scratch backend; the guarded update is atomic
//! because every read-modify-write runs under one write lock.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::{compare_values, merge_patch, ChangeEvent, DocumentStore, SortOrder};

/// Capacity of the change-notification channel.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// In-memory document store.
///
/// Collections are created lazily on first insert. Iteration order inside a
/// collection is by document id; callers order through
/// [`list`](DocumentStore::list), never by storage order.
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Value>>>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        MemoryStore {
            collections: RwLock::new(HashMap::new()),
            changes,
        }
    }

    fn notify(&self, collection: &str, id: &str) {
        // No receivers is fine; subscriptions are optional.
        let _ = self.changes.send(ChangeEvent {
            collection: collection.to_string(),
            id: id.to_string(),
        });
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, mut body: Value) -> StoreResult<String> {
        let id = Uuid::new_v4().to_string();

        let fields = body
            .as_object_mut()
            .ok_or_else(|| StoreError::write("document body must be a JSON object"))?;
        fields.insert("id".to_string(), Value::String(id.clone()));

        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), body);
        drop(collections);

        debug!(collection = %collection, id = %id, "Document inserted");
        self.notify(collection, &id);
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let body = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::not_found("Document", id))?;

        merge_patch(body, &patch);
        drop(collections);

        self.notify(collection, id);
        Ok(())
    }

    async fn update_guarded(
        &self,
        collection: &str,
        id: &str,
        guard_field: &str,
        forbidden: &Value,
        patch: Value,
    ) -> StoreResult<bool> {
        // Single write lock covers check + mutate: the read-modify-write
        // other sessions race against is atomic here.
        let mut collections = self.collections.write().await;
        let body = match collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
        {
            Some(body) => body,
            None => return Ok(false),
        };

        if body.get(guard_field) == Some(forbidden) {
            return Ok(false);
        }

        merge_patch(body, &patch);
        drop(collections);

        self.notify(collection, id);
        Ok(true)
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id));
        drop(collections);

        if removed.is_none() {
            return Err(StoreError::not_found("Document", id));
        }

        self.notify(collection, id);
        Ok(())
    }

    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|body| body.get(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list(
        &self,
        collection: &str,
        order_by: &str,
        order: SortOrder,
    ) -> StoreResult<Vec<Value>> {
        let collections = self.collections.read().await;
        let mut docs: Vec<Value> = collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default();
        drop(collections);

        docs.sort_by(|a, b| {
            let null = Value::Null;
            let left = a.get(order_by).unwrap_or(&null);
            let right = b.get(order_by).unwrap_or(&null);
            match order {
                SortOrder::Ascending => compare_values(left, right),
                SortOrder::Descending => compare_values(right, left),
            }
        });

        Ok(docs)
    }

    fn changes(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
