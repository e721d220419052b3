use sea_orm_migration::prelude::*;

mod m20251201_initial;
mod m20251208_add_login_audit;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251201_initial::Migration),
            Box::new(m20251208_add_login_audit::Migration),
        ]
    }
}
