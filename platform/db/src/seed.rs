use entity::{department, employee};
use products_hr::Gender;
use sea_orm::{ActiveValue::Set, DbErr, EntityTrait, PaginatorTrait};
use tracing::info;

use crate::{DbPool, hr::gender_to_db};

const DEPARTMENTS: [&str; 2] = ["Development", "Testing"];

// Rows per insert statement; each row binds four values.
const SEED_BATCH: u32 = 1000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub departments: u64,
    pub employees: u64,
}

/// Inserts demo departments and `employees` demo staff into empty tables.
/// Tables that already hold rows are left alone.
pub async fn seed_demo(db: &DbPool, employees: u32) -> Result<SeedSummary, DbErr> {
    let mut summary = SeedSummary::default();

    if department::Entity::find().count(db).await? == 0 {
        let rows = DEPARTMENTS.iter().map(|name| department::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        });
        department::Entity::insert_many(rows)
            .exec_without_returning(db)
            .await?;
        summary.departments = DEPARTMENTS.len() as u64;
    }

    if employee::Entity::find().count(db).await? == 0 && employees > 0 {
        let department_ids: Vec<i32> = department::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|d| d.id)
            .collect();
        for start in (1..=employees).step_by(SEED_BATCH as usize) {
            let end = employees.min(start.saturating_add(SEED_BATCH - 1));
            let rows = (start..=end).map(|n| {
                let name = format!("staff_{n:04}");
                let gender = if n % 2 == 0 { Gender::Female } else { Gender::Male };
                let department_id = if department_ids.is_empty() {
                    None
                } else {
                    Some(department_ids[n as usize % department_ids.len()])
                };
                employee::ActiveModel {
                    email: Set(format!("{name}@example.com")),
                    name: Set(name),
                    gender: Set(Some(gender_to_db(gender))),
                    department_id: Set(department_id),
                    ..Default::default()
                }
            });
            summary.employees += employee::Entity::insert_many(rows)
                .exec_without_returning(db)
                .await?;
        }
    }

    info!(
        departments = summary.departments,
        employees = summary.employees,
        "demo data seeded"
    );
    Ok(summary)
}
