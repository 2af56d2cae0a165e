//! # Domain Types
//!
//! Core domain types used throughout Motorlot.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Vehicle      │   │      Sale       │   │    Expense      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  make/model     │   │  vehicle_id     │   │  category       │       │
//! │  │  cost_price     │   │  profit(frozen) │   │  amount         │       │
//! │  │  status         │   │  payment_type   │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ VehicleStatus   │   │  PaymentType    │   │ ExpenseStatus   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Available      │   │  Cash           │   │  Pending        │       │
//! │  │  Pending        │   │  Installment    │   │  Approved       │       │
//! │  │  Sold (terminal)│   │  Bank           │   │  Rejected       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persisted Field Names
//! Documents in the external store use camelCase field names
//! (`purchasePrice`, `costPrice`, `addedBy`, `carName`, ...), so every
//! entity here carries `#[serde(rename_all = "camelCase")]`.
//!
//! ## Snapshot Pattern
//! [`Sale`] denormalizes the vehicle name and cost at commit time. This
//! freezes historical financial facts: later edits to the vehicle must
//! never change a past sale's profit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Vehicle Status
// =============================================================================

/// Lifecycle state of a vehicle in inventory.
///
/// ## State Machine
/// ```text
/// available ──► pending ──► sold
///     │                      ▲
///     └──────────────────────┘  (pending is optional)
/// ```
/// `Sold` is terminal. The only operation allowed to produce it is the
/// Sale Commit Protocol in motorlot-store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    /// On the lot and sellable.
    Available,
    /// Reserved / awaiting paperwork, still sellable.
    Pending,
    /// Resolved by exactly one Sale. Terminal.
    Sold,
}

impl VehicleStatus {
    /// Wire name as persisted in the store.
    pub const fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "available",
            VehicleStatus::Pending => "pending",
            VehicleStatus::Sold => "sold",
        }
    }
}

impl Default for VehicleStatus {
    fn default() -> Self {
        VehicleStatus::Available
    }
}

// =============================================================================
// Transmission
// =============================================================================

/// Gearbox type. Descriptive only, never drives business rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transmission {
    Automatic,
    Manual,
}

// =============================================================================
// Payment Type
// =============================================================================

/// How the buyer paid for a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// Physical cash payment.
    Cash,
    /// Paid in installments over time.
    Installment,
    /// Bank transfer.
    #[serde(rename = "bank-transfer")]
    Bank,
}

// =============================================================================
// Expense Category
// =============================================================================

/// Closed set of expense categories.
///
/// Persisted under the variant name (`"Rent"`, `"Fuel"`, ...), which is also
/// the grouping key of the category breakdown in [`crate::report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Rent,
    Salary,
    Repair,
    Advertising,
    Fuel,
    Utilities,
    Other,
}

impl ExpenseCategory {
    /// Wire name as persisted in the store.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Rent => "Rent",
            ExpenseCategory::Salary => "Salary",
            ExpenseCategory::Repair => "Repair",
            ExpenseCategory::Advertising => "Advertising",
            ExpenseCategory::Fuel => "Fuel",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Other => "Other",
        }
    }
}

// =============================================================================
// Expense Status
// =============================================================================

/// Review state of an expense.
///
/// Created `Pending`; a reviewer moves it to `Approved` or `Rejected`.
/// Both review outcomes are terminal (no un-approve path).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    Pending,
    Approved,
    Rejected,
}

impl ExpenseStatus {
    /// Wire name as persisted in the store.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ExpenseStatus::Pending => "pending",
            ExpenseStatus::Approved => "approved",
            ExpenseStatus::Rejected => "rejected",
        }
    }
}

impl Default for ExpenseStatus {
    fn default() -> Self {
        ExpenseStatus::Pending
    }
}

// =============================================================================
// Role
// =============================================================================

/// Caller role, supplied read-only by the auth collaborator.
///
/// Admin gates: approve/reject expense, delete vehicle, delete employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

// =============================================================================
// Vehicle
// =============================================================================

/// An inventory item representing one car available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    /// Unique identifier (UUID v4, generated by the store).
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    /// Odometer reading in kilometres.
    pub mileage: i64,
    /// Engine displacement in litres.
    pub engine_size: f64,
    pub transmission: Transmission,
    /// Acquisition price in whole currency units.
    pub purchase_price: i64,
    /// Pre-sale costs (repairs, transport, paperwork).
    pub extra_costs: i64,
    /// Derived: ALWAYS `purchase_price + extra_costs`, recomputed on every
    /// edit. Stored for query convenience, never edited independently.
    pub cost_price: i64,
    pub status: VehicleStatus,
    /// Display name of whoever added the record.
    pub added_by: String,
    pub date_added: DateTime<Utc>,
    pub notes: String,
}

impl Vehicle {
    /// The denormalized name a Sale snapshots: `"Make Model (Year)"`.
    pub fn display_name(&self) -> String {
        format!("{} {} ({})", self.make, self.model, self.year)
    }

    /// Whether the vehicle can still be sold.
    #[inline]
    pub fn is_sellable(&self) -> bool {
        self.status != VehicleStatus::Sold
    }
}

// =============================================================================
// Sale
// =============================================================================

/// An immutable record of a completed transaction resolving exactly one
/// vehicle. Created only by the Sale Commit Protocol; never updated or
/// deleted afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    /// Weak reference to the vehicle this sale resolves. The vehicle row
    /// persists independently after the sale.
    pub vehicle_id: String,
    /// Vehicle name at time of sale (frozen snapshot).
    pub car_name: String,
    pub buyer_name: String,
    pub buyer_phone: String,
    /// Optional; absent when the buyer did not provide one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_passport: Option<String>,
    /// Agreed sale price.
    pub price: i64,
    /// Vehicle cost price at time of sale (frozen snapshot).
    pub cost: i64,
    /// `price - cost`, computed once at commit time and frozen thereafter.
    /// An audit fact, not a live computation; may be negative (a loss).
    pub profit: i64,
    pub payment_type: PaymentType,
    /// Display name of the employee who closed the sale.
    pub employee_name: String,
    pub employee_id: String,
    /// Commit timestamp.
    pub date: DateTime<Utc>,
    pub contract_number: String,
    pub notes: String,
}

// =============================================================================
// Expense
// =============================================================================

/// An operating expense awaiting or past review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub category: ExpenseCategory,
    pub amount: i64,
    pub date: DateTime<Utc>,
    pub added_by: String,
    pub description: String,
    pub status: ExpenseStatus,
}

// =============================================================================
// Employee
// =============================================================================

/// A staff member. Used by the core only as an aggregation dimension
/// (sales count, attributed profit); the core never mutates sales through it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub position: String,
    pub active: bool,
    pub date_added: DateTime<Utc>,
}

// =============================================================================
// Identity
// =============================================================================

/// The caller's identity as supplied by the auth collaborator.
///
/// Consumed read-only: stamped onto `added_by` / `employee_*` fields and
/// checked for admin-only operations. The core does not implement
/// authentication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl Identity {
    /// Whether this caller may perform admin-gated operations.
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn vehicle() -> Vehicle {
        Vehicle {
            id: "v-1".to_string(),
            make: "Chevrolet".to_string(),
            model: "Nexia".to_string(),
            year: 2019,
            color: "White".to_string(),
            mileage: 84_000,
            engine_size: 1.5,
            transmission: Transmission::Manual,
            purchase_price: 8_000,
            extra_costs: 500,
            cost_price: 8_500,
            status: VehicleStatus::Available,
            added_by: "Ali".to_string(),
            date_added: Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_display_name_snapshot_format() {
        assert_eq!(vehicle().display_name(), "Chevrolet Nexia (2019)");
    }

    #[test]
    fn test_vehicle_wire_field_names() {
        let value = serde_json::to_value(vehicle()).unwrap();
        // Persisted names are camelCase for store interoperability
        assert!(value.get("purchasePrice").is_some());
        assert!(value.get("extraCosts").is_some());
        assert!(value.get("costPrice").is_some());
        assert!(value.get("addedBy").is_some());
        assert!(value.get("dateAdded").is_some());
        assert_eq!(value["status"], "available");
        assert_eq!(value["transmission"], "manual");
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_value(PaymentType::Installment).unwrap(),
            "installment"
        );
        assert_eq!(
            serde_json::to_value(PaymentType::Bank).unwrap(),
            "bank-transfer"
        );
        assert_eq!(serde_json::to_value(ExpenseCategory::Fuel).unwrap(), "Fuel");
        assert_eq!(
            serde_json::to_value(ExpenseStatus::Rejected).unwrap(),
            "rejected"
        );
        assert_eq!(VehicleStatus::Sold.as_str(), "sold");
    }

    #[test]
    fn test_sellable() {
        let mut v = vehicle();
        assert!(v.is_sellable());
        v.status = VehicleStatus::Pending;
        assert!(v.is_sellable());
        v.status = VehicleStatus::Sold;
        assert!(!v.is_sellable());
    }

    #[test]
    fn test_identity_roles() {
        let admin = Identity {
            id: "u-1".to_string(),
            name: "Boss".to_string(),
            role: Role::Admin,
        };
        let staff = Identity {
            id: "u-2".to_string(),
            name: "Clerk".to_string(),
            role: Role::Staff,
        };
        assert!(admin.is_admin());
        assert!(!staff.is_admin());
    }
}
