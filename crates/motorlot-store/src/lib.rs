//! # motorlot-store: Store Layer for Motorlot
//!
//! Async access to the dealership's document collections, the Sale Commit
//! Protocol, and the [`Dealership`] facade tying them together.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Motorlot Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            ★ motorlot-store (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────┐   ┌──────────────┐   ┌─────────────────────┐  │   │
//! │  │   │ Dealership │──►│ repositories │──►│   DocumentStore     │  │   │
//! │  │   │   facade   │   │  + commit    │   │  memory │ sqlite    │  │   │
//! │  │   └────────────┘   └──────────────┘   └─────────────────────┘  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ pure calls                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                     motorlot-core                                │   │
//! │  │         types • pricing • report • filter • validation          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`store`] - The [`DocumentStore`] trait and change events
//! - [`memory`] - In-memory backend
//! - [`sqlite`] - SQLite backend with embedded migrations
//! - [`repository`] - Typed per-collection repositories
//! - [`commit`] - The Sale Commit Protocol
//! - [`dealership`] - The facade
//! - [`error`] - The [`StoreError`] taxonomy

// =============================================================================
// Module Declarations
// =============================================================================

pub mod commit;
pub mod dealership;
pub mod error;
pub mod memory;
pub mod repository;
pub mod sqlite;
pub mod store;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use commit::{commit_sale, SaleRequest};
pub use dealership::Dealership;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use repository::{
    EmployeeForm, EmployeeRepository, ExpenseForm, ExpenseRepository, SaleRepository,
    VehicleForm, VehicleRepository,
};
pub use sqlite::SqliteStore;
pub use store::{ChangeEvent, DocumentStore, SortOrder};
