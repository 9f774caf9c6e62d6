use sea_orm_migration::prelude::*;

const INDEX_NAME: &str = "idx_employee_name";

#[derive(DeriveIden)]
enum Employee {
    Table,
    Name,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    // Username availability checks look employees up by exact name.
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name(INDEX_NAME)
                    .table(Employee::Table)
                    .col(Employee::Name)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(INDEX_NAME).table(Employee::Table).to_owned())
            .await
    }
}
