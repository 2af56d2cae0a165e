//! Sale repository.
//!
//! Read-only. Sales are created exclusively by the commit protocol
//! ([`crate::commit`]) and are never updated or deleted afterwards, so the
//! repository exposes no mutations at all.

use std::sync::Arc;

use motorlot_core::Sale;

use crate::error::{StoreError, StoreResult};
use crate::repository::{decode, SALES};
use crate::store::{DocumentStore, SortOrder};

/// Repository for the sales collection.
pub struct SaleRepository {
    store: Arc<dyn DocumentStore>,
}

impl SaleRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        SaleRepository { store }
    }

    /// Fetches a sale by id.
    pub async fn get(&self, id: &str) -> StoreResult<Sale> {
        let body = self
            .store
            .get(SALES, id)
            .await?
            .ok_or_else(|| StoreError::not_found("Sale", id))?;
        decode(SALES, body)
    }

    /// All sales, newest first.
    pub async fn list(&self) -> StoreResult<Vec<Sale>> {
        let bodies = self.store.list(SALES, "date", SortOrder::Descending).await?;
        bodies.into_iter().map(|body| decode(SALES, body)).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
