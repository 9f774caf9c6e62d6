//! In-memory stores that record every call, for unit tests.

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;

use crate::{
    model::{Department, Employee, EmployeeChanges, NewEmployee},
    store::{DepartmentStore, EmployeeStore},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreCall {
    FindById(i32),
    FindPage { offset: u64, limit: u64 },
    Count,
    Insert(String),
    Update(i32),
    Delete(i32),
    DeleteMany(Vec<i32>),
    ExistsByName(String),
    FindDepartments,
}

#[derive(Default)]
struct State {
    employees: BTreeMap<i32, Employee>,
    departments: Vec<Department>,
    next_id: i32,
    calls: Vec<StoreCall>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn with_employees(names: &[&str]) -> Self {
        let store = Self::default();
        {
            let mut state = store.lock();
            for name in names {
                state.next_id += 1;
                let id = state.next_id;
                state.employees.insert(
                    id,
                    Employee {
                        id,
                        name: name.to_string(),
                        gender: None,
                        email: format!("{name}@example.com"),
                        department_id: None,
                        department: None,
                    },
                );
            }
        }
        store
    }

    pub fn with_departments(self, departments: Vec<Department>) -> Self {
        self.lock().departments = departments;
        self
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    pub fn ids(&self) -> Vec<i32> {
        self.lock().employees.keys().copied().collect()
    }

    pub fn employee(&self, id: i32) -> Option<Employee> {
        self.lock().employees.get(&id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("memory store poisoned")
    }

    fn record(&self, call: StoreCall) -> MutexGuard<'_, State> {
        let mut state = self.lock();
        state.calls.push(call);
        state
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Employee>> {
        let state = self.record(StoreCall::FindById(id));
        Ok(state.employees.get(&id).cloned())
    }

    async fn find_page(&self, offset: u64, limit: u64) -> anyhow::Result<Vec<Employee>> {
        let state = self.record(StoreCall::FindPage { offset, limit });
        Ok(state
            .employees
            .values()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self) -> anyhow::Result<u64> {
        let state = self.record(StoreCall::Count);
        Ok(state.employees.len() as u64)
    }

    async fn insert(&self, employee: NewEmployee) -> anyhow::Result<Employee> {
        let mut state = self.record(StoreCall::Insert(employee.name.clone()));
        state.next_id += 1;
        let stored = Employee {
            id: state.next_id,
            name: employee.name,
            gender: employee.gender,
            email: employee.email,
            department_id: employee.department_id,
            department: None,
        };
        state.employees.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: i32, changes: &EmployeeChanges) -> anyhow::Result<bool> {
        let mut state = self.record(StoreCall::Update(id));
        let Some(existing) = state.employees.get_mut(&id) else {
            return Ok(false);
        };
        if let Some(name) = &changes.name {
            existing.name = name.clone();
        }
        if let Some(gender) = changes.gender {
            existing.gender = Some(gender);
        }
        if let Some(email) = &changes.email {
            existing.email = email.clone();
        }
        if let Some(department_id) = changes.department_id {
            existing.department_id = Some(department_id);
        }
        Ok(true)
    }

    async fn delete(&self, id: i32) -> anyhow::Result<u64> {
        let mut state = self.record(StoreCall::Delete(id));
        Ok(state.employees.remove(&id).map_or(0, |_| 1))
    }

    async fn delete_many(&self, ids: &[i32]) -> anyhow::Result<u64> {
        let mut state = self.record(StoreCall::DeleteMany(ids.to_vec()));
        let mut removed = 0;
        for id in ids {
            if state.employees.remove(id).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn exists_by_name(&self, name: &str) -> anyhow::Result<bool> {
        let state = self.record(StoreCall::ExistsByName(name.to_string()));
        Ok(state.employees.values().any(|e| e.name == name))
    }
}

#[async_trait]
impl DepartmentStore for MemoryStore {
    async fn find_all(&self) -> anyhow::Result<Vec<Department>> {
        let state = self.record(StoreCall::FindDepartments);
        Ok(state.departments.clone())
    }
}

/// A store whose every call fails, for error propagation tests.
pub struct BrokenStore;

#[async_trait]
impl EmployeeStore for BrokenStore {
    async fn find_by_id(&self, _id: i32) -> anyhow::Result<Option<Employee>> {
        Err(anyhow::anyhow!("connection refused"))
    }

    async fn find_page(&self, _offset: u64, _limit: u64) -> anyhow::Result<Vec<Employee>> {
        Err(anyhow::anyhow!("connection refused"))
    }

    async fn count(&self) -> anyhow::Result<u64> {
        Err(anyhow::anyhow!("connection refused"))
    }

    async fn insert(&self, _employee: NewEmployee) -> anyhow::Result<Employee> {
        Err(anyhow::anyhow!("connection refused"))
    }

    async fn update(&self, _id: i32, _changes: &EmployeeChanges) -> anyhow::Result<bool> {
        Err(anyhow::anyhow!("connection refused"))
    }

    async fn delete(&self, _id: i32) -> anyhow::Result<u64> {
        Err(anyhow::anyhow!("connection refused"))
    }

    async fn delete_many(&self, _ids: &[i32]) -> anyhow::Result<u64> {
        Err(anyhow::anyhow!("connection refused"))
    }

    async fn exists_by_name(&self, _name: &str) -> anyhow::Result<bool> {
        Err(anyhow::anyhow!("connection refused"))
    }
}
