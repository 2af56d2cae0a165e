//! # SQLite Store Backend
//!
//! A [`DocumentStore`] persisted in a single SQLite file. Documents live in
//! one `documents` table as JSON text; field access goes through
//! `json_extract`, partial updates through `json_patch`.
//!
//! ## Connection Setup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SqliteStore::connect(path)                                             │
//! │      │                                                                  │
//! │      ├── create_if_missing(true)     - first run bootstraps the file    │
//! │      ├── journal_mode(Wal)           - readers don't block the writer   │
//! │      ├── synchronous(Normal)         - safe with WAL, faster than Full  │
//! │      └── run embedded migrations     - schema is always current         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The guarded update compiles to a single conditional `UPDATE`; SQLite's
//! writer serialization makes it atomic without explicit transactions.

use std::str::FromStr;

use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::{ChangeEvent, DocumentStore, SortOrder};

/// Capacity of the change-notification channel.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// SQLite-backed document store.
pub struct SqliteStore {
    pool: SqlitePool,
    changes: broadcast::Sender<ChangeEvent>,
}

impl SqliteStore {
    /// Opens (creating if missing) a database file and runs migrations.
    pub async fn connect(database_path: &str) -> StoreResult<Self> {
        info!("Connecting to database: {}", database_path);

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{database_path}"))
            .map_err(|e| StoreError::write(format!("invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Opens a private in-memory database. Used by tests.
    ///
    /// A single connection keeps the database alive; in-memory SQLite
    /// databases are per-connection.
    pub async fn in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| StoreError::write(format!("invalid connection string: {e}")))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> StoreResult<Self> {
        sqlx::migrate!("../../migrations/sqlite").run(&pool).await?;
        info!("Database migrations complete");

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(SqliteStore { pool, changes })
    }

    fn notify(&self, collection: &str, id: &str) {
        let _ = self.changes.send(ChangeEvent {
            collection: collection.to_string(),
            id: id.to_string(),
        });
    }

    fn parse_body(collection: &str, text: String) -> StoreResult<Value> {
        serde_json::from_str(&text).map_err(|e| StoreError::Decode {
            collection: collection.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl DocumentStore for SqliteStore {
    async fn insert(&self, collection: &str, mut body: Value) -> StoreResult<String> {
        let id = Uuid::new_v4().to_string();

        let fields = body
            .as_object_mut()
            .ok_or_else(|| StoreError::write("document body must be a JSON object"))?;
        fields.insert("id".to_string(), Value::String(id.clone()));

        sqlx::query("INSERT INTO documents (collection, id, body) VALUES (?, ?, ?)")
            .bind(collection)
            .bind(&id)
            .bind(body.to_string())
            .execute(&self.pool)
            .await?;

        debug!(collection = %collection, id = %id, "Document inserted");
        self.notify(collection, &id);
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let row: Option<String> = sqlx::query_scalar(
            "SELECT body FROM documents WHERE collection = ? AND id = ?",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|text| Self::parse_body(collection, text)).transpose()
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE documents SET body = json_patch(body, ?) \
             WHERE collection = ? AND id = ?",
        )
        .bind(patch.to_string())
        .bind(collection)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Document", id));
        }

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
        // One conditional UPDATE. rows_affected tells hit from miss; SQLite's
        // single-writer model makes the check-and-set atomic.
        let guard_path = format!("$.{guard_field}");
        let forbidden_text = match forbidden {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        let result = sqlx::query(
            "UPDATE documents SET body = json_patch(body, ?) \
             WHERE collection = ? AND id = ? \
               AND json_extract(body, ?) IS NOT ?",
        )
        .bind(patch.to_string())
        .bind(collection)
        .bind(id)
        .bind(guard_path)
        .bind(forbidden_text)
        .execute(&self.pool)
        .await?;

        let hit = result.rows_affected() > 0;
        if hit {
            self.notify(collection, id);
        }
        Ok(hit)
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Document", id));
        }

        debug!(collection = %collection, id = %id, "Document deleted");
        self.notify(collection, id);
        Ok(())
    }

    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Value>> {
        let field_path = format!("$.{field}");
        let value_text = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        let rows: Vec<String> = sqlx::query_scalar(
            "SELECT body FROM documents \
             WHERE collection = ? AND json_extract(body, ?) = ?",
        )
        .bind(collection)
        .bind(field_path)
        .bind(value_text)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|text| Self::parse_body(collection, text))
            .collect()
    }

    async fn list(
        &self,
        collection: &str,
        order_by: &str,
        order: SortOrder,
    ) -> StoreResult<Vec<Value>> {
        // order_by is a field name chosen by repository code, never user
        // input, so building the ORDER BY clause by format is safe.
        let direction = match order {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        };
        let sql = format!(
            "SELECT body FROM documents WHERE collection = ? \
             ORDER BY json_extract(body, ?) {direction}"
        );

        let rows: Vec<String> = sqlx::query_scalar(&sql)
            .bind(collection)
            .bind(format!("$.{order_by}"))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|text| Self::parse_body(collection, text))
            .collect()
    }

    fn changes(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let store = SqliteStore::in_memory().await.unwrap();
        let id = store
            .insert("vehicles", json!({"make": "Chevrolet", "model": "Malibu"}))
            .await
            .unwrap();

        let body = store.get("vehicles", &id).await.unwrap().unwrap();
        assert_eq!(body["id"], Value::String(id));
        assert_eq!(body["make"], "Chevrolet");

        assert!(store.get("vehicles", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_patches_only_named_fields() {
        let store = SqliteStore::in_memory().await.unwrap();
        let id = store
            .insert("vehicles", json!({"status": "available", "color": "Black"}))
            .await
            .unwrap();

        store
            .update("vehicles", &id, json!({"status": "pending"}))
            .await
            .unwrap();

        let body = store.get("vehicles", &id).await.unwrap().unwrap();
        assert_eq!(body["status"], "pending");
        assert_eq!(body["color"], "Black");
    }

    #[tokio::test]
    async fn test_guarded_update_blocks_second_writer() {
        let store = SqliteStore::in_memory().await.unwrap();
        let id = store
            .insert("vehicles", json!({"status": "available"}))
            .await
            .unwrap();
        let forbidden = json!("sold");

        let first = store
            .update_guarded("vehicles", &id, "status", &forbidden, json!({"status": "sold"}))
            .await
            .unwrap();
        let second = store
            .update_guarded("vehicles", &id, "status", &forbidden, json!({"status": "sold"}))
            .await
            .unwrap();

        assert!(first);
        assert!(!second);
    }

    #[tokio::test]
    async fn test_find_eq_and_ordered_list() {
        let store = SqliteStore::in_memory().await.unwrap();
        store
            .insert("sales", json!({"paymentType": "cash", "date": "2025-02-01T00:00:00Z"}))
            .await
            .unwrap();
        store
            .insert("sales", json!({"paymentType": "bank-transfer", "date": "2025-03-01T00:00:00Z"}))
            .await
            .unwrap();
        store
            .insert("sales", json!({"paymentType": "cash", "date": "2025-01-01T00:00:00Z"}))
            .await
            .unwrap();

        let cash = store
            .find_eq("sales", "paymentType", &json!("cash"))
            .await
            .unwrap();
        assert_eq!(cash.len(), 2);

        let newest_first = store
            .list("sales", "date", SortOrder::Descending)
            .await
            .unwrap();
        assert_eq!(newest_first[0]["date"], "2025-03-01T00:00:00Z");
        assert_eq!(newest_first[2]["date"], "2025-01-01T00:00:00Z");
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = SqliteStore::in_memory().await.unwrap();
        let err = store.delete("vehicles", "missing").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
