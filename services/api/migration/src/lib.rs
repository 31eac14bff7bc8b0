use sea_orm_migration::prelude::*;

mod m20260301_000001_create_identity;
mod m20260301_000002_create_journal;
mod m20260301_000003_create_lectionary;
mod m20260301_000004_create_resources;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_identity::Migration),
            Box::new(m20260301_000002_create_journal::Migration),
            Box::new(m20260301_000003_create_lectionary::Migration),
            Box::new(m20260301_000004_create_resources::Migration),
        ]
    }
}
