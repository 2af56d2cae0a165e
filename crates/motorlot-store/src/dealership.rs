//! # Dealership Facade
//!
//! One handle over a shared [`DocumentStore`]: repositories per collection,
//! the sale commit entry point, and the two read-side views (dashboard and
//! yearly report).
//!
//! ## Read-Side Degradation
//! The views are built from full collection snapshots. A collection that
//! fails to load degrades to empty with a warning instead of failing the
//! whole view; a dashboard with a missing tile beats no dashboard.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::warn;

use motorlot_core::{report, Identity, Sale};
use motorlot_core::{DashboardSummary, ExpenseScope, YearReport};

use crate::commit::{commit_sale, SaleRequest};
use crate::error::StoreResult;
use crate::repository::{
    EmployeeRepository, ExpenseRepository, SaleRepository, VehicleRepository,
};
use crate::store::{ChangeEvent, DocumentStore};

/// Entry point for one dealership's data.
pub struct Dealership {
    store: Arc<dyn DocumentStore>,
    expense_scope: ExpenseScope,
}

impl Dealership {
    /// Creates a facade over a store. Dashboard expenses default to counting
    /// every expense regardless of review state.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Dealership {
            store,
            expense_scope: ExpenseScope::All,
        }
    }

    /// Same, with an explicit dashboard expense scope.
    pub fn with_expense_scope(store: Arc<dyn DocumentStore>, scope: ExpenseScope) -> Self {
        Dealership {
            store,
            expense_scope: scope,
        }
    }

    pub fn vehicles(&self) -> VehicleRepository {
        VehicleRepository::new(Arc::clone(&self.store))
    }

    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(Arc::clone(&self.store))
    }

    pub fn expenses(&self) -> ExpenseRepository {
        ExpenseRepository::new(Arc::clone(&self.store))
    }

    pub fn employees(&self) -> EmployeeRepository {
        EmployeeRepository::new(Arc::clone(&self.store))
    }

    /// Commits a sale. See [`crate::commit`] for the protocol.
    pub async fn commit_sale(
        &self,
        request: SaleRequest,
        identity: &Identity,
    ) -> StoreResult<Sale> {
        commit_sale(Arc::clone(&self.store), request, identity).await
    }

    /// The yearly report for one calendar year.
    pub async fn yearly_report(&self, year: i32) -> YearReport {
        let sales = self.sales().list().await.unwrap_or_else(|err| {
            warn!(error = %err, "Sales unavailable for report, degrading to empty");
            Vec::new()
        });
        let expenses = self.expenses().list().await.unwrap_or_else(|err| {
            warn!(error = %err, "Expenses unavailable for report, degrading to empty");
            Vec::new()
        });

        report::yearly(&sales, &expenses, year)
    }

    /// The current-month dashboard summary.
    pub async fn dashboard(&self) -> DashboardSummary {
        let vehicles = self.vehicles().list().await.unwrap_or_else(|err| {
            warn!(error = %err, "Vehicles unavailable for dashboard, degrading to empty");
            Vec::new()
        });
        let sales = self.sales().list().await.unwrap_or_else(|err| {
            warn!(error = %err, "Sales unavailable for dashboard, degrading to empty");
            Vec::new()
        });
        let expenses = self.expenses().list().await.unwrap_or_else(|err| {
            warn!(error = %err, "Expenses unavailable for dashboard, degrading to empty");
            Vec::new()
        });

        report::dashboard(&vehicles, &sales, &expenses, Utc::now(), self.expense_scope)
    }

    /// Subscribes to change notifications from the underlying store.
    pub fn changes(&self) -> broadcast::Receiver<ChangeEvent> {
        self.store.changes()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
