use migration::{AuditMigrator, Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::config::BootstrapSettings;
use crate::errors::InternalError;

/// Connections to the people database and the audit database
#[derive(Clone)]
pub struct DatabaseConnections {
    pub people: DatabaseConnection,
    pub audit: DatabaseConnection,
}

impl DatabaseConnections {
    /// Connect to both databases. Migrations are run separately via `migrate()`.
    pub async fn init(bootstrap_settings: &BootstrapSettings) -> Result<Self, InternalError> {
        let people = connect(bootstrap_settings.database_url(), "connect_database").await?;
        let audit = connect(bootstrap_settings.audit_database_url(), "connect_audit_database").await?;

        Ok(Self { people, audit })
    }

    pub async fn migrate(&self) -> Result<(), InternalError> {
        migrate_people_database(&self.people).await?;
        migrate_audit_database(&self.audit).await?;
        Ok(())
    }
}

async fn connect(url: &str, operation: &str) -> Result<DatabaseConnection, InternalError> {
    let db = Database::connect(url)
        .await
        .map_err(|e| InternalError::database(operation, e))?;

    tracing::debug!("Connected to database: {}", url);

    Ok(db)
}

/// Run pending migrations on the people database
///
/// # Arguments
/// * `db` - Connection to run migrations on
///
/// # Returns
/// * `Ok(())` - Migrations completed successfully
/// * `Err(InternalError)` - Migration failed
pub async fn migrate_people_database(db: &DatabaseConnection) -> Result<(), InternalError> {
    Migrator::up(db, None)
        .await
        .map_err(|e| InternalError::database("run_migrations", e))?;

    tracing::debug!("People database migrations completed");

    Ok(())
}

/// Run pending migrations on the audit database
pub async fn migrate_audit_database(audit_db: &DatabaseConnection) -> Result<(), InternalError> {
    AuditMigrator::up(audit_db, None)
        .await
        .map_err(|e| InternalError::database("run_audit_migrations", e))?;

    tracing::debug!("Audit database migrations completed");

    Ok(())
}
