//! Employee repository.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use motorlot_core::{validation, Employee, Identity, Role};

use crate::error::{StoreError, StoreResult};
use crate::repository::{decode, encode, EMPLOYEES};
use crate::store::{DocumentStore, SortOrder};

/// Input for registering an employee.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub role: Role,
    #[serde(default)]
    pub position: String,
}

/// Repository for the employees collection.
pub struct EmployeeRepository {
    store: Arc<dyn DocumentStore>,
}

impl EmployeeRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        EmployeeRepository { store }
    }

    /// Registers an employee. New employees start active.
    pub async fn add(&self, form: EmployeeForm) -> StoreResult<Employee> {
        let name = validation::validate_required("name", &form.name)?;
        let email = validation::validate_required("email", &form.email)?;

        let mut employee = Employee {
            id: String::new(),
            name,
            email,
            phone: form.phone,
            role: form.role,
            position: form.position,
            active: true,
            date_added: Utc::now(),
        };

        let id = self.store.insert(EMPLOYEES, encode(&employee)?).await?;
        employee.id = id;

        info!(employee_id = %employee.id, name = %employee.name, "Employee registered");
        Ok(employee)
    }

    /// Activates or deactivates an employee.
    pub async fn set_active(&self, id: &str, active: bool) -> StoreResult<Employee> {
        self.store
            .update(EMPLOYEES, id, json!({"active": active}))
            .await?;
        self.get(id).await
    }

    /// Removes an employee record. Admin only. Past sales keep their
    /// snapshot of the employee name.
    pub async fn delete(&self, id: &str, identity: &Identity) -> StoreResult<()> {
        if !identity.is_admin() {
            return Err(StoreError::forbidden("delete employee"));
        }
        self.store.delete(EMPLOYEES, id).await?;
        info!(employee_id = %id, "Employee deleted");
        Ok(())
    }

    /// Fetches an employee by id.
    pub async fn get(&self, id: &str) -> StoreResult<Employee> {
        let body = self
            .store
            .get(EMPLOYEES, id)
            .await?
            .ok_or_else(|| StoreError::not_found("Employee", id))?;
        decode(EMPLOYEES, body)
    }

    /// All employees, newest first.
    pub async fn list(&self) -> StoreResult<Vec<Employee>> {
        let bodies = self
            .store
            .list(EMPLOYEES, "dateAdded", SortOrder::Descending)
            .await?;
        bodies
            .into_iter()
            .map(|body| decode(EMPLOYEES, body))
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

    fn admin() -> Identity {
        Identity {
            id: "u-0".to_string(),
            name: "Olim".to_string(),
            role: Role::Admin,
        }
    }

    fn form() -> EmployeeForm {
        EmployeeForm {
            name: "Aziz".to_string(),
            email: "aziz@example.com".to_string(),
            phone: String::new(),
            role: Role::Staff,
            position: "Sales".to_string(),
        }
    }

    fn repo() -> EmployeeRepository {
        EmployeeRepository::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_add_starts_active() {
        let repo = repo();
        let employee = repo.add(form()).await.unwrap();
        assert!(employee.active);
        assert_eq!(employee.name, "Aziz");
    }

    #[tokio::test]
    async fn test_add_requires_name_and_email() {
        let repo = repo();
        let mut blank = form();
        blank.email = " ".to_string();
        let err = repo.add(blank).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_set_active_toggles() {
        let repo = repo();
        let employee = repo.add(form()).await.unwrap();

        let off = repo.set_active(&employee.id, false).await.unwrap();
        assert!(!off.active);
        let on = repo.set_active(&employee.id, true).await.unwrap();
        assert!(on.active);
    }

    #[tokio::test]
    async fn test_delete_is_admin_gated() {
        let repo = repo();
        let employee = repo.add(form()).await.unwrap();

        let staff = Identity {
            id: "u-9".to_string(),
            name: "Clerk".to_string(),
            role: Role::Staff,
        };
        let err = repo.delete(&employee.id, &staff).await.unwrap_err();
        assert!(matches!(err, StoreError::Forbidden { .. }));

        repo.delete(&employee.id, &admin()).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }
}
