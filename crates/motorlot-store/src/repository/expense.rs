//! Expense repository.
//!
//! Expenses are born `pending` and move exactly once to `approved` or
//! `rejected`. Review is admin-gated and terminal.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use motorlot_core::{validation, Expense, ExpenseCategory, ExpenseStatus, Identity};

use crate::error::{StoreError, StoreResult};
use crate::repository::{decode, encode, EXPENSES};
use crate::store::{DocumentStore, SortOrder};

/// Input for recording an expense.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseForm {
    pub category: ExpenseCategory,
    pub amount: i64,
    #[serde(default)]
    pub description: String,
    /// Defaults to the moment of recording.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Repository for the expenses collection.
pub struct ExpenseRepository {
    store: Arc<dyn DocumentStore>,
}

impl ExpenseRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        ExpenseRepository { store }
    }

    /// Records an expense. Always enters review as `pending`.
    pub async fn add(&self, form: ExpenseForm, identity: &Identity) -> StoreResult<Expense> {
        validation::validate_positive("amount", form.amount)?;

        let mut expense = Expense {
            id: String::new(),
            category: form.category,
            amount: form.amount,
            date: form.date.unwrap_or_else(Utc::now),
            added_by: identity.name.clone(),
            description: form.description,
            status: ExpenseStatus::Pending,
        };

        let id = self.store.insert(EXPENSES, encode(&expense)?).await?;
        expense.id = id;

        info!(
            expense_id = %expense.id,
            category = %expense.category.as_str(),
            amount = expense.amount,
            "Expense recorded"
        );
        Ok(expense)
    }

    /// Reviews a pending expense. Admin only; the outcome is terminal.
    pub async fn set_status(
        &self,
        id: &str,
        decision: ExpenseStatus,
        identity: &Identity,
    ) -> StoreResult<Expense> {
        if !identity.is_admin() {
            return Err(StoreError::forbidden("review expense"));
        }
        if decision == ExpenseStatus::Pending {
            return Err(motorlot_core::ValidationError::not_allowed(
                "status",
                "a review decides approved or rejected",
            )
            .into());
        }

        let current = self.get(id).await?;
        if current.status != ExpenseStatus::Pending {
            return Err(StoreError::conflict(format!(
                "expense {id} was already reviewed ({})",
                current.status.as_str()
            )));
        }

        self.store
            .update(EXPENSES, id, json!({"status": decision.as_str()}))
            .await?;

        info!(expense_id = %id, decision = %decision.as_str(), "Expense reviewed");
        self.get(id).await
    }

    /// Removes an expense record. Admin only.
    pub async fn delete(&self, id: &str, identity: &Identity) -> StoreResult<()> {
        if !identity.is_admin() {
            return Err(StoreError::forbidden("delete expense"));
        }
        self.store.delete(EXPENSES, id).await?;
        info!(expense_id = %id, "Expense deleted");
        Ok(())
    }

    /// Fetches an expense by id.
    pub async fn get(&self, id: &str) -> StoreResult<Expense> {
        let body = self
            .store
            .get(EXPENSES, id)
            .await?
            .ok_or_else(|| StoreError::not_found("Expense", id))?;
        decode(EXPENSES, body)
    }

    /// All expenses, newest first.
    pub async fn list(&self) -> StoreResult<Vec<Expense>> {
        let bodies = self
            .store
            .list(EXPENSES, "date", SortOrder::Descending)
            .await?;
        bodies
            .into_iter()
            .map(|body| decode(EXPENSES, body))
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

    fn form(amount: i64) -> ExpenseForm {
        ExpenseForm {
            category: ExpenseCategory::Fuel,
            amount,
            description: "fleet refuel".to_string(),
            date: None,
        }
    }

    fn repo() -> ExpenseRepository {
        ExpenseRepository::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_add_enters_pending_with_author_stamp() {
        let repo = repo();
        let expense = repo.add(form(300), &staff()).await.unwrap();

        assert_eq!(expense.status, ExpenseStatus::Pending);
        assert_eq!(expense.added_by, "Aziz");
        assert_eq!(repo.get(&expense.id).await.unwrap().amount, 300);
    }

    #[tokio::test]
    async fn test_add_rejects_non_positive_amount() {
        let repo = repo();
        let err = repo.add(form(0), &staff()).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_review_is_admin_gated_and_terminal() {
        let repo = repo();
        let expense = repo.add(form(300), &staff()).await.unwrap();

        let err = repo
            .set_status(&expense.id, ExpenseStatus::Approved, &staff())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Forbidden { .. }));

        let reviewed = repo
            .set_status(&expense.id, ExpenseStatus::Approved, &admin())
            .await
            .unwrap();
        assert_eq!(reviewed.status, ExpenseStatus::Approved);

        // Second review conflicts
        let err = repo
            .set_status(&expense.id, ExpenseStatus::Rejected, &admin())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_review_cannot_decide_pending() {
        let repo = repo();
        let expense = repo.add(form(300), &staff()).await.unwrap();

        let err = repo
            .set_status(&expense.id, ExpenseStatus::Pending, &admin())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_requires_admin() {
        let repo = repo();
        let expense = repo.add(form(300), &staff()).await.unwrap();

        let err = repo.delete(&expense.id, &staff()).await.unwrap_err();
        assert!(matches!(err, StoreError::Forbidden { .. }));

        repo.delete(&expense.id, &admin()).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }
}
