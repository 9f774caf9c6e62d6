use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    error::{HrError, HrResult},
    ids::decode_ids,
    model::{Department, Employee, EmployeeChanges, EmployeeDraft},
    pagination::{PageResult, PageSettings, paginate},
    store::{DepartmentStore, EmployeeStore},
    username::check_username,
    validation::validate,
};

/// Create, read, update and delete for employee records.
#[derive(Clone)]
pub struct EmployeeService {
    store: Arc<dyn EmployeeStore>,
    pages: PageSettings,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn EmployeeStore>, pages: PageSettings) -> Self {
        Self { store, pages }
    }

    #[instrument(name = "hr.employees.list", skip(self))]
    pub async fn list(&self, page_num: Option<i64>) -> HrResult<PageResult<Employee>> {
        paginate(self.store.as_ref(), page_num, &self.pages).await
    }

    /// `None` when no employee has this id.
    #[instrument(name = "hr.employees.get", skip(self))]
    pub async fn get(&self, id: i32) -> HrResult<Option<Employee>> {
        Ok(self.store.find_by_id(id).await?)
    }

    #[instrument(name = "hr.employees.create", skip_all)]
    pub async fn create(&self, draft: EmployeeDraft) -> HrResult<Employee> {
        let employee = validate(draft).map_err(|errors| {
            debug!(fields = ?errors.fields().collect::<Vec<_>>(), "employee rejected");
            HrError::Validation(errors)
        })?;
        let created = self.store.insert(employee).await?;
        info!(id = created.id, "employee created");
        Ok(created)
    }

    /// Overwrites the supplied fields without re-running field validation.
    #[instrument(name = "hr.employees.update", skip(self, changes))]
    pub async fn update(&self, id: i32, changes: EmployeeChanges) -> HrResult<()> {
        let found = if changes.is_empty() {
            self.store.find_by_id(id).await?.is_some()
        } else {
            self.store.update(id, &changes).await?
        };
        if !found {
            return Err(HrError::NotFound(id));
        }
        info!(id, "employee updated");
        Ok(())
    }

    /// Deletes one id or a hyphen-joined batch; unknown ids are skipped.
    /// Returns the number of rows removed.
    #[instrument(name = "hr.employees.delete", skip(self))]
    pub async fn delete(&self, token: &str) -> HrResult<u64> {
        let ids = decode_ids(token)?;
        let removed = match ids.as_slice() {
            [id] => self.store.delete(*id).await?,
            batch => self.store.delete_many(batch).await?,
        };
        info!(requested = ids.len(), removed, "employees deleted");
        Ok(removed)
    }

    #[instrument(name = "hr.employees.check_username", skip(self))]
    pub async fn check_username(&self, name: &str) -> HrResult<()> {
        check_username(self.store.as_ref(), name).await
    }
}

/// Read-only access to the department list.
#[derive(Clone)]
pub struct DepartmentService {
    store: Arc<dyn DepartmentStore>,
}

impl DepartmentService {
    pub fn new(store: Arc<dyn DepartmentStore>) -> Self {
        Self { store }
    }

    #[instrument(name = "hr.departments.list", skip(self))]
    pub async fn list(&self) -> HrResult<Vec<Department>> {
        Ok(self.store.find_all().await?)
    }
}
