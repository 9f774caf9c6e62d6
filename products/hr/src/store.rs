use async_trait::async_trait;

use crate::model::{Department, Employee, EmployeeChanges, NewEmployee};

/// Persistence operations the employee service depends on.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Employee>>;
    /// One page ordered by id, each row joined with its department.
    async fn find_page(&self, offset: u64, limit: u64) -> anyhow::Result<Vec<Employee>>;
    async fn count(&self) -> anyhow::Result<u64>;
    async fn insert(&self, employee: NewEmployee) -> anyhow::Result<Employee>;
    /// Applies the supplied fields. Returns false when no row has that id.
    async fn update(&self, id: i32, changes: &EmployeeChanges) -> anyhow::Result<bool>;
    async fn delete(&self, id: i32) -> anyhow::Result<u64>;
    /// Removes all ids in a single statement.
    async fn delete_many(&self, ids: &[i32]) -> anyhow::Result<u64>;
    async fn exists_by_name(&self, name: &str) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait DepartmentStore: Send + Sync {
    async fn find_all(&self) -> anyhow::Result<Vec<Department>>;
}
