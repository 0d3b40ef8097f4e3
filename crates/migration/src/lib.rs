pub use sea_orm_migration::prelude::*;

use sea_orm::DatabaseConnection;

mod m20251019_000001_init;
mod m20251019_000002_event_drafts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251019_000001_init::Migration),
            Box::new(m20251019_000002_event_drafts::Migration),
        ]
    }
}

/// Bring the schema up to date.
///
/// Safe to call on every start: applied migrations are skipped, tables are
/// created only when absent and the draft column is added only when missing.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    Migrator::up(db, None).await
}
