use anyhow::Context;
use async_trait::async_trait;
use entity::{department, employee};
use products_hr::{
    Department, DepartmentStore, Employee, EmployeeChanges, EmployeeStore, Gender, NewEmployee,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use crate::DbPool;

/// Employee and department persistence over a sea-orm connection.
#[derive(Clone, Debug)]
pub struct HrStore {
    db: DbPool,
}

impl HrStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

pub(crate) fn gender_to_db(gender: Gender) -> employee::Gender {
    match gender {
        Gender::Male => employee::Gender::Male,
        Gender::Female => employee::Gender::Female,
    }
}

fn gender_from_db(gender: employee::Gender) -> Gender {
    match gender {
        employee::Gender::Male => Gender::Male,
        employee::Gender::Female => Gender::Female,
    }
}

fn department_from_model(model: department::Model) -> Department {
    Department {
        id: model.id,
        name: model.name,
    }
}

fn employee_from_model(model: employee::Model, department: Option<department::Model>) -> Employee {
    Employee {
        id: model.id,
        name: model.name,
        gender: model.gender.map(gender_from_db),
        email: model.email,
        department_id: model.department_id,
        department: department.map(department_from_model),
    }
}

#[async_trait]
impl EmployeeStore for HrStore {
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Employee>> {
        let model = employee::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .with_context(|| format!("loading employee {id}"))?;
        Ok(model.map(|m| employee_from_model(m, None)))
    }

    async fn find_page(&self, offset: u64, limit: u64) -> anyhow::Result<Vec<Employee>> {
        let rows = employee::Entity::find()
            .find_also_related(department::Entity)
            .order_by_asc(employee::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .context("loading employee page")?;
        Ok(rows
            .into_iter()
            .map(|(model, department)| employee_from_model(model, department))
            .collect())
    }

    async fn count(&self) -> anyhow::Result<u64> {
        employee::Entity::find()
            .count(&self.db)
            .await
            .context("counting employees")
    }

    async fn insert(&self, new: NewEmployee) -> anyhow::Result<Employee> {
        let active = employee::ActiveModel {
            name: Set(new.name),
            gender: Set(new.gender.map(gender_to_db)),
            email: Set(new.email),
            department_id: Set(new.department_id),
            ..Default::default()
        };
        let model = active.insert(&self.db).await.context("inserting employee")?;
        Ok(employee_from_model(model, None))
    }

    async fn update(&self, id: i32, changes: &EmployeeChanges) -> anyhow::Result<bool> {
        if changes.is_empty() {
            return Ok(self.find_by_id(id).await?.is_some());
        }
        let mut active = <employee::ActiveModel as Default>::default();
        if let Some(name) = &changes.name {
            active.name = Set(name.clone());
        }
        if let Some(gender) = changes.gender {
            active.gender = Set(Some(gender_to_db(gender)));
        }
        if let Some(email) = &changes.email {
            active.email = Set(email.clone());
        }
        if let Some(department_id) = changes.department_id {
            active.department_id = Set(Some(department_id));
        }
        let result = employee::Entity::update_many()
            .set(active)
            .filter(employee::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .with_context(|| format!("updating employee {id}"))?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: i32) -> anyhow::Result<u64> {
        let result = employee::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .with_context(|| format!("deleting employee {id}"))?;
        Ok(result.rows_affected)
    }

    async fn delete_many(&self, ids: &[i32]) -> anyhow::Result<u64> {
        let result = employee::Entity::delete_many()
            .filter(employee::Column::Id.is_in(ids.iter().copied()))
            .exec(&self.db)
            .await
            .context("deleting employee batch")?;
        Ok(result.rows_affected)
    }

    async fn exists_by_name(&self, name: &str) -> anyhow::Result<bool> {
        let matches = employee::Entity::find()
            .filter(employee::Column::Name.eq(name))
            .count(&self.db)
            .await
            .context("looking up employee name")?;
        Ok(matches > 0)
    }
}

#[async_trait]
impl DepartmentStore for HrStore {
    async fn find_all(&self) -> anyhow::Result<Vec<Department>> {
        let rows = department::Entity::find()
            .order_by_asc(department::Column::Id)
            .all(&self.db)
            .await
            .context("loading departments")?;
        Ok(rows.into_iter().map(department_from_model).collect())
    }
}
