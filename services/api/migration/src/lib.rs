use sea_orm_migration::prelude::*;

mod m20260401_000001_create_users;
mod m20260401_000002_create_rbac_tables;
mod m20260401_000003_seed_rbac;
mod m20260401_000004_create_audit_logs;
mod m20260401_000005_create_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260401_000001_create_users::Migration),
            Box::new(m20260401_000002_create_rbac_tables::Migration),
            Box::new(m20260401_000003_seed_rbac::Migration),
            Box::new(m20260401_000004_create_audit_logs::Migration),
            Box::new(m20260401_000005_create_events::Migration),
        ]
    }
}
