//! HR vertical slice: employee records, their validation and paging, and the
//! department lookup they reference.

pub mod error;
pub mod ids;
pub mod model;
pub mod pagination;
pub mod service;
pub mod store;
pub mod username;
pub mod validation;

#[cfg(test)]
mod testing;

use std::sync::Arc;

pub use error::{FieldErrors, HrError, HrResult, UsernameRejection};
pub use model::{Department, Employee, EmployeeChanges, EmployeeDraft, Gender, NewEmployee};
pub use pagination::{PageResult, PageSettings};
pub use service::{DepartmentService, EmployeeService};
pub use store::{DepartmentStore, EmployeeStore};

/// Services of the HR slice, wired to their stores.
#[derive(Clone)]
pub struct HrModule {
    pub employees: EmployeeService,
    pub departments: DepartmentService,
}

impl HrModule {
    pub fn new(
        employee_store: Arc<dyn EmployeeStore>,
        department_store: Arc<dyn DepartmentStore>,
        pages: PageSettings,
    ) -> Self {
        Self {
            employees: EmployeeService::new(employee_store, pages),
            departments: DepartmentService::new(department_store),
        }
    }
}
