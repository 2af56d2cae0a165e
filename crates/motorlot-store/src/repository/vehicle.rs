//! Vehicle repository.
//!
//! Inventory mutations stop here; the status flip to sold never does — that
//! path belongs to the commit protocol exclusively, and this repository
//! actively refuses it.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use motorlot_core::{
    pricing, validation, Identity, Transmission, ValidationError, Vehicle, VehicleStatus,
};

use crate::error::{StoreError, StoreResult};
use crate::repository::{decode, encode, VEHICLES};
use crate::store::{DocumentStore, SortOrder};

/// Input for creating or editing a vehicle. Wire names mirror the stored
/// document fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleForm {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub mileage: i64,
    pub engine_size: f64,
    pub transmission: Transmission,
    pub purchase_price: i64,
    pub extra_costs: i64,
    #[serde(default)]
    pub status: VehicleStatus,
    #[serde(default)]
    pub notes: String,
}

/// Repository for the vehicles collection.
pub struct VehicleRepository {
    store: Arc<dyn DocumentStore>,
}

impl VehicleRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        VehicleRepository { store }
    }

    /// Validates a form and derives the stored cost price.
    fn check(form: &VehicleForm) -> StoreResult<(String, String, i64)> {
        let make = validation::validate_required("make", &form.make)?;
        let model = validation::validate_required("model", &form.model)?;
        validation::validate_year(form.year)?;
        validation::validate_non_negative("mileage", form.mileage)?;
        let cost_price = pricing::cost_price(form.purchase_price, form.extra_costs)?;

        if form.status == VehicleStatus::Sold {
            return Err(ValidationError::not_allowed(
                "status",
                "a vehicle becomes sold through a committed sale, not an edit",
            )
            .into());
        }

        Ok((make, model, cost_price))
    }

    /// Adds a vehicle to inventory.
    ///
    /// The cost price is always derived from purchase price plus extra
    /// costs; callers cannot set it directly.
    pub async fn add(&self, form: VehicleForm, identity: &Identity) -> StoreResult<Vehicle> {
        let (make, model, cost_price) = Self::check(&form)?;

        let mut vehicle = Vehicle {
            id: String::new(),
            make,
            model,
            year: form.year,
            color: form.color.trim().to_string(),
            mileage: form.mileage,
            engine_size: form.engine_size,
            transmission: form.transmission,
            purchase_price: form.purchase_price,
            extra_costs: form.extra_costs,
            cost_price,
            status: form.status,
            added_by: identity.name.clone(),
            date_added: Utc::now(),
            notes: form.notes,
        };

        let id = self.store.insert(VEHICLES, encode(&vehicle)?).await?;
        vehicle.id = id;

        info!(
            vehicle_id = %vehicle.id,
            name = %vehicle.display_name(),
            "Vehicle added to inventory"
        );
        Ok(vehicle)
    }

    /// Edits a vehicle. Sold vehicles are frozen; their history lives in the
    /// sale record and must not drift.
    pub async fn update(&self, id: &str, form: VehicleForm) -> StoreResult<Vehicle> {
        let current = self.get(id).await?;
        if current.status == VehicleStatus::Sold {
            return Err(StoreError::conflict(format!(
                "vehicle {id} is sold and can no longer be edited"
            )));
        }

        let (make, model, cost_price) = Self::check(&form)?;

        let patch = json!({
            "make": make,
            "model": model,
            "year": form.year,
            "color": form.color.trim(),
            "mileage": form.mileage,
            "engineSize": form.engine_size,
            "transmission": form.transmission,
            "purchasePrice": form.purchase_price,
            "extraCosts": form.extra_costs,
            "costPrice": cost_price,
            "status": form.status,
            "notes": form.notes,
        });

        // The patch carries "status", so it must not land on a vehicle a
        // concurrent commit just sold: an unconditional write here would
        // resurrect the vehicle and let it sell twice. Same guard as the
        // commit protocol's status flip.
        let hit = self
            .store
            .update_guarded(
                VEHICLES,
                id,
                "status",
                &json!(VehicleStatus::Sold.as_str()),
                patch,
            )
            .await?;
        if !hit {
            return match self.store.get(VEHICLES, id).await? {
                Some(_) => Err(StoreError::conflict(format!(
                    "vehicle {id} is sold and can no longer be edited"
                ))),
                None => Err(StoreError::not_found("Vehicle", id)),
            };
        }

        debug!(vehicle_id = %id, "Vehicle updated");
        self.get(id).await
    }

    /// Removes a vehicle from inventory. Admin only; sold vehicles are
    /// referenced by sale records and stay.
    pub async fn delete(&self, id: &str, identity: &Identity) -> StoreResult<()> {
        if !identity.is_admin() {
            return Err(StoreError::forbidden("delete vehicle"));
        }

        let current = self.get(id).await?;
        if current.status == VehicleStatus::Sold {
            return Err(StoreError::conflict(format!(
                "vehicle {id} is sold and cannot be deleted"
            )));
        }

        self.store.delete(VEHICLES, id).await?;
        info!(vehicle_id = %id, "Vehicle deleted");
        Ok(())
    }

    /// Fetches a vehicle by id.
    pub async fn get(&self, id: &str) -> StoreResult<Vehicle> {
        let body = self
            .store
            .get(VEHICLES, id)
            .await?
            .ok_or_else(|| StoreError::not_found("Vehicle", id))?;
        decode(VEHICLES, body)
    }

    /// All vehicles, newest first.
    pub async fn list(&self) -> StoreResult<Vec<Vehicle>> {
        let bodies = self
            .store
            .list(VEHICLES, "dateAdded", SortOrder::Descending)
            .await?;
        bodies
            .into_iter()
            .map(|body| decode(VEHICLES, body))
            .collect()
    }

    /// Vehicles currently offered for sale.
    pub async fn list_available(&self) -> StoreResult<Vec<Vehicle>> {
        let bodies = self
            .store
            .find_eq(VEHICLES, "status", &json!(VehicleStatus::Available.as_str()))
            .await?;
        bodies
            .into_iter()
            .map(|body| decode(VEHICLES, body))
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use motorlot_core::Role;

    fn staff() -> Identity {
        Identity {
            id: "u-1".to_string(),
            name: "Aziz".to_string(),
            role: Role::Staff,
        }
    }

    fn admin() -> Identity {
        Identity {
            id: "u-0".to_string(),
            name: "Olim".to_string(),
            role: Role::Admin,
        }
    }

    fn form() -> VehicleForm {
        VehicleForm {
            make: "Chevrolet".to_string(),
            model: "Cobalt".to_string(),
            year: 2022,
            color: "White".to_string(),
            mileage: 15_000,
            engine_size: 1.5,
            transmission: Transmission::Automatic,
            purchase_price: 8_000,
            extra_costs: 500,
            status: VehicleStatus::Available,
            notes: String::new(),
        }
    }

    fn repo() -> VehicleRepository {
        VehicleRepository::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_add_derives_cost_and_stamps_author() {
        let repo = repo();
        let vehicle = repo.add(form(), &staff()).await.unwrap();

        assert_eq!(vehicle.cost_price, 8_500);
        assert_eq!(vehicle.added_by, "Aziz");
        assert!(!vehicle.id.is_empty());

        let stored = repo.get(&vehicle.id).await.unwrap();
        assert_eq!(stored.cost_price, 8_500);
    }

    #[tokio::test]
    async fn test_add_rejects_blank_make_and_sold_status() {
        let repo = repo();

        let mut blank = form();
        blank.make = "   ".to_string();
        let err = repo.add(blank, &staff()).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let mut sold = form();
        sold.status = VehicleStatus::Sold;
        let err = repo.add(sold, &staff()).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_recomputes_cost_price() {
        let repo = repo();
        let vehicle = repo.add(form(), &staff()).await.unwrap();

        let mut edited = form();
        edited.extra_costs = 1_200;
        let updated = repo.update(&vehicle.id, edited).await.unwrap();
        assert_eq!(updated.cost_price, 9_200);
        // Author stamp survives edits
        assert_eq!(updated.added_by, "Aziz");
    }

    #[tokio::test]
    async fn test_sold_vehicle_is_frozen() {
        let repo = VehicleRepository::new(Arc::new(MemoryStore::new()));
        let vehicle = repo.add(form(), &staff()).await.unwrap();
        repo.store
            .update(VEHICLES, &vehicle.id, json!({"status": "sold"}))
            .await
            .unwrap();

        let err = repo.update(&vehicle.id, form()).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));

        let err = repo.delete(&vehicle.id, &admin()).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_delete_requires_admin() {
        let repo = repo();
        let vehicle = repo.add(form(), &staff()).await.unwrap();

        let err = repo.delete(&vehicle.id, &staff()).await.unwrap_err();
        assert!(matches!(err, StoreError::Forbidden { .. }));

        repo.delete(&vehicle.id, &admin()).await.unwrap();
        let err = repo.get(&vehicle.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    /// Store double whose reads lag behind writes: `get` keeps serving the
    /// pre-sale snapshot while the stored document already says sold.
    struct StaleReadStore {
        inner: MemoryStore,
        stale: serde_json::Value,
    }

    #[async_trait::async_trait]
    impl crate::store::DocumentStore for StaleReadStore {
        async fn insert(&self, collection: &str, body: serde_json::Value) -> StoreResult<String> {
            self.inner.insert(collection, body).await
        }
        async fn get(
            &self,
            _collection: &str,
            _id: &str,
        ) -> StoreResult<Option<serde_json::Value>> {
            Ok(Some(self.stale.clone()))
        }
        async fn update(
            &self,
            collection: &str,
            id: &str,
            patch: serde_json::Value,
        ) -> StoreResult<()> {
            self.inner.update(collection, id, patch).await
        }
        async fn update_guarded(
            &self,
            collection: &str,
            id: &str,
            guard_field: &str,
            forbidden: &serde_json::Value,
            patch: serde_json::Value,
        ) -> StoreResult<bool> {
            self.inner
                .update_guarded(collection, id, guard_field, forbidden, patch)
                .await
        }
        async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
            self.inner.delete(collection, id).await
        }
        async fn find_eq(
            &self,
            collection: &str,
            field: &str,
            value: &serde_json::Value,
        ) -> StoreResult<Vec<serde_json::Value>> {
            self.inner.find_eq(collection, field, value).await
        }
        async fn list(
            &self,
            collection: &str,
            order_by: &str,
            order: crate::store::SortOrder,
        ) -> StoreResult<Vec<serde_json::Value>> {
            self.inner.list(collection, order_by, order).await
        }
        fn changes(&self) -> tokio::sync::broadcast::Receiver<crate::store::ChangeEvent> {
            self.inner.changes()
        }
    }

    #[tokio::test]
    async fn test_edit_racing_a_commit_cannot_resurrect_a_sold_vehicle() {
        // The sold-check reads an available snapshot, but by the time the
        // patch lands a commit has flipped the vehicle to sold. The edit
        // must miss, not write status back to available.
        let inner = MemoryStore::new();
        let body = json!({
            "make": "Chevrolet",
            "model": "Cobalt",
            "year": 2022,
            "color": "White",
            "mileage": 15_000,
            "engineSize": 1.5,
            "transmission": "automatic",
            "purchasePrice": 8_000,
            "extraCosts": 500,
            "costPrice": 8_500,
            "status": "sold",
            "addedBy": "Aziz",
            "dateAdded": "2025-03-14T09:30:00Z",
            "notes": "",
        });
        let id = inner.insert(VEHICLES, body.clone()).await.unwrap();

        let mut stale = body;
        stale["id"] = json!(id);
        stale["status"] = json!("available");

        let store = Arc::new(StaleReadStore { inner, stale });
        let repo = VehicleRepository::new(Arc::clone(&store) as Arc<dyn DocumentStore>);

        let mut edit = form();
        edit.color = "Red".to_string();
        let err = repo.update(&id, edit).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));

        // The commit's outcome survives the lost edit
        let body = store.inner.get(VEHICLES, &id).await.unwrap().unwrap();
        assert_eq!(body["status"], "sold");
    }

    #[tokio::test]
    async fn test_list_available_excludes_pending_and_sold() {
        let repo = repo();
        repo.add(form(), &staff()).await.unwrap();

        let mut pending = form();
        pending.status = VehicleStatus::Pending;
        repo.add(pending, &staff()).await.unwrap();

        let available = repo.list_available().await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].status, VehicleStatus::Available);

        assert_eq!(repo.list().await.unwrap().len(), 2);
    }
}
