pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_employee_tables;
mod m20250301_000002_create_kyc_submissions;
mod m20250301_000003_create_dependent_tables;
mod m20250301_000004_create_audit_tables;

/// Migrations for the people database (employees, users, KYC, dependent records)
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_employee_tables::Migration),
            Box::new(m20250301_000002_create_kyc_submissions::Migration),
            Box::new(m20250301_000003_create_dependent_tables::Migration),
        ]
    }
}

pub struct AuditMigrator;

#[async_trait::async_trait]
impl MigratorTrait for AuditMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000004_create_audit_tables::Migration),
        ]
    }
}
