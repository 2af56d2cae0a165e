//! # Sale Commit Protocol
//!
//! Selling a vehicle writes two collections: a new sale document and the
//! vehicle's status flip to `sold`. The store offers no cross-collection
//! transaction, so the protocol orders the writes and compensates on
//! partial failure.
//!
//! ## Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  commit_sale(request, identity)                                         │
//! │                                                                         │
//! │  1. validate input          ──► ValidationError                         │
//! │  2. load vehicle            ──► NotFound                                │
//! │  3. vehicle already sold?   ──► Conflict (fast path, still racy)        │
//! │  4. freeze the money        carName, cost, profit = price - cost        │
//! │  5. INSERT sale                                                         │
//! │  6. guarded status flip     UPDATE ... WHERE status IS NOT "sold"       │
//! │       ├── hit               ──► Ok(sale)                                │
//! │       └── miss / error      ──► DELETE the sale from step 5, then       │
//! │                                 Conflict / the original error           │
//! │                                                                         │
//! │  Invariant: a vehicle is sold AT MOST ONCE. Step 6's conditional        │
//! │  update is the safeguard; step 3 only gives a friendlier early error.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Retry safety: every failure leaves the pair (no sale + vehicle unsold)
//! or the vehicle already sold, so retrying the whole call is always safe.
//!
//! Cancellation safety: steps 5-6 run in a spawned task, so a caller
//! dropping this future cannot strand a sale without its status flip.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use motorlot_core::{pricing, validation, Identity, PaymentType, Sale, Vehicle, VehicleStatus};

use crate::error::{StoreError, StoreResult};
use crate::repository::{decode, encode, SALES, VEHICLES};
use crate::store::DocumentStore;

/// Input for committing a sale.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    pub vehicle_id: String,
    pub buyer_name: String,
    #[serde(default)]
    pub buyer_phone: String,
    #[serde(default)]
    pub buyer_passport: Option<String>,
    /// Agreed sale price. May sit below the vehicle's cost (a loss).
    pub price: i64,
    pub payment_type: PaymentType,
    #[serde(default)]
    pub contract_number: String,
    #[serde(default)]
    pub notes: String,
}

/// Commits a sale: records the transaction and marks the vehicle sold.
///
/// ## Errors
/// * `Validation` - blank buyer name or non-positive price
/// * `NotFound` - the vehicle does not exist
/// * `Conflict` - the vehicle is already sold (including a concurrent commit
///   that won the race); no sale record remains
/// * `Write` - a store write failed; the operation is safe to retry
pub async fn commit_sale(
    store: Arc<dyn DocumentStore>,
    request: SaleRequest,
    identity: &Identity,
) -> StoreResult<Sale> {
    let buyer_name = validation::validate_required("buyerName", &request.buyer_name)?;
    validation::validate_positive("price", request.price)?;

    let body = store
        .get(VEHICLES, &request.vehicle_id)
        .await?
        .ok_or_else(|| StoreError::not_found("Vehicle", &request.vehicle_id))?;
    let vehicle: Vehicle = decode(VEHICLES, body)?;

    if !vehicle.is_sellable() {
        return Err(StoreError::conflict(format!(
            "vehicle {} is already sold",
            vehicle.id
        )));
    }

    // Freeze the financial facts. Later vehicle edits must never move them.
    let sale = Sale {
        id: String::new(),
        vehicle_id: vehicle.id.clone(),
        car_name: vehicle.display_name(),
        buyer_name,
        buyer_phone: request.buyer_phone,
        buyer_passport: request.buyer_passport,
        price: request.price,
        cost: vehicle.cost_price,
        profit: pricing::profit(request.price, vehicle.cost_price),
        payment_type: request.payment_type,
        employee_name: identity.name.clone(),
        employee_id: identity.id.clone(),
        date: Utc::now(),
        contract_number: request.contract_number,
        notes: request.notes,
    };

    // The dual-write runs detached from the caller: abandoning this future
    // must not leave the protocol mid-flight.
    tokio::spawn(commit_writes(store, sale))
        .await
        .map_err(|err| StoreError::write(format!("commit task aborted: {err}")))?
}

/// Steps 5-6 plus compensation. Runs to completion once started.
async fn commit_writes(store: Arc<dyn DocumentStore>, mut sale: Sale) -> StoreResult<Sale> {
    let sale_id = store.insert(SALES, encode(&sale)?).await?;
    sale.id = sale_id;

    // The guarded flip decides the race: of N concurrent commits on one
    // vehicle, exactly one hits.
    let flip = store
        .update_guarded(
            VEHICLES,
            &sale.vehicle_id,
            "status",
            &json!(VehicleStatus::Sold.as_str()),
            json!({"status": VehicleStatus::Sold.as_str()}),
        )
        .await;

    match flip {
        Ok(true) => {
            info!(
                sale_id = %sale.id,
                vehicle_id = %sale.vehicle_id,
                price = sale.price,
                profit = sale.profit,
                "Sale committed"
            );
            Ok(sale)
        }
        Ok(false) => {
            warn!(
                sale_id = %sale.id,
                vehicle_id = %sale.vehicle_id,
                "Vehicle sold concurrently, rolling back sale record"
            );
            compensate(store.as_ref(), &sale.id).await;
            Err(StoreError::conflict(format!(
                "vehicle {} is already sold",
                sale.vehicle_id
            )))
        }
        Err(err) => {
            warn!(
                sale_id = %sale.id,
                vehicle_id = %sale.vehicle_id,
                error = %err,
                "Status flip failed, rolling back sale record"
            );
            compensate(store.as_ref(), &sale.id).await;
            Err(err)
        }
    }
}

/// Best-effort removal of an orphaned sale record. A failure here leaves a
/// sale without a sold vehicle; it is logged loudly and the original error
/// still surfaces to the caller.
async fn compensate(store: &dyn DocumentStore, sale_id: &str) {
    if let Err(err) = store.delete(SALES, sale_id).await {
        error!(
            sale_id = %sale_id,
            error = %err,
            "Compensating delete failed; orphaned sale record needs manual cleanup"
        );
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
