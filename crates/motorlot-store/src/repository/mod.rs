//! # Repository Layer
//!
//! Typed access to the document collections. Each repository owns one
//! collection: it validates input, stamps server-side fields, and maps
//! JSON bodies to entity types.
//!
//! ## Collections
//! ```text
//! ┌──────────────┬───────────────────────┬──────────────────────────────────┐
//! │ Collection   │ Entity                │ Mutations                        │
//! ├──────────────┼───────────────────────┼──────────────────────────────────┤
//! │ vehicles     │ Vehicle               │ add / update / delete (admin)    │
//! │ sales        │ Sale                  │ via the commit protocol only     │
//! │ expenses     │ Expense               │ add / review (admin) / delete    │
//! │ employees    │ Employee              │ add / set_active / delete        │
//! └──────────────┴───────────────────────┴──────────────────────────────────┘
//! ```

mod employee;
mod expense;
mod sale;
mod vehicle;

pub use employee::{EmployeeForm, EmployeeRepository};
pub use expense::{ExpenseForm, ExpenseRepository};
pub use sale::SaleRepository;
pub use vehicle::{VehicleForm, VehicleRepository};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{StoreError, StoreResult};

/// Collection names. One place, so repositories and the commit protocol
/// never drift apart.
pub const VEHICLES: &str = "vehicles";
pub const SALES: &str = "sales";
pub const EXPENSES: &str = "expenses";
pub const EMPLOYEES: &str = "employees";

/// Deserializes a document body into an entity type.
pub(crate) fn decode<T: DeserializeOwned>(collection: &str, body: Value) -> StoreResult<T> {
    serde_json::from_value(body).map_err(|e| StoreError::Decode {
        collection: collection.to_string(),
        message: e.to_string(),
    })
}

/// Serializes an entity into a document body.
pub(crate) fn encode<T: Serialize>(entity: &T) -> StoreResult<Value> {
    serde_json::to_value(entity).map_err(|e| StoreError::write(e.to_string()))
}
