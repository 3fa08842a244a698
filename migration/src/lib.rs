pub use sea_orm_migration::prelude::*;

mod m20260105_000001_create_directory;
mod m20260105_000002_create_public_forms;
mod m20260105_000003_create_finance_exams;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260105_000001_create_directory::Migration),
            Box::new(m20260105_000002_create_public_forms::Migration),
            Box::new(m20260105_000003_create_finance_exams::Migration),
        ]
    }
}
