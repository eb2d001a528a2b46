use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter};

use crate::errors::InternalError;
use crate::types::db::{access_log, attendance, leave, payslip};
use crate::types::internal::deletion::DeletionStep;

/// Keys a dependent row may carry back to its employee
#[derive(Debug, Clone)]
pub struct DependentOwner {
    pub employee_id: i32,
    pub email: String,
}

/// A dependent row as seen by the deletion cascade
#[derive(Debug, Clone, PartialEq)]
pub struct DependentRecord {
    pub id: i32,
    /// File on disk that belongs to the row
    pub attachment_path: Option<String>,
}

/// Tables that reference an employee only through soft keys
#[async_trait]
pub trait DependentStore: Send + Sync {
    fn step(&self) -> DeletionStep;

    async fn find_all_for(&self, owner: &DependentOwner) -> Result<Vec<DependentRecord>, InternalError>;

    /// Returns the number of rows removed
    async fn destroy(&self, record: &DependentRecord) -> Result<u64, InternalError>;
}

fn email_matches<C: ColumnTrait>(column: C, email: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).eq(email.trim().to_lowercase())
}

pub struct AttendanceStore {
    db: DatabaseConnection,
}

impl AttendanceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DependentStore for AttendanceStore {
    fn step(&self) -> DeletionStep {
        DeletionStep::Attendance
    }

    async fn find_all_for(&self, owner: &DependentOwner) -> Result<Vec<DependentRecord>, InternalError> {
        let rows = attendance::Entity::find()
            .filter(email_matches(attendance::Column::Email, &owner.email))
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("find_attendance", e))?;

        Ok(rows
            .into_iter()
            .map(|row| DependentRecord { id: row.id, attachment_path: None })
            .collect())
    }

    async fn destroy(&self, record: &DependentRecord) -> Result<u64, InternalError> {
        let result = attendance::Entity::delete_by_id(record.id)
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_attendance", e))?;
        Ok(result.rows_affected)
    }
}

/// Leave requests; attachments are handed back so the caller can remove them
pub struct LeaveStore {
    db: DatabaseConnection,
}

impl LeaveStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DependentStore for LeaveStore {
    fn step(&self) -> DeletionStep {
        DeletionStep::Leaves
    }

    async fn find_all_for(&self, owner: &DependentOwner) -> Result<Vec<DependentRecord>, InternalError> {
        let rows = leave::Entity::find()
            .filter(email_matches(leave::Column::Email, &owner.email))
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("find_leaves", e))?;

        Ok(rows
            .into_iter()
            .map(|row| DependentRecord {
                id: row.id,
                attachment_path: row.attachment_path.filter(|p| !p.trim().is_empty()),
            })
            .collect())
    }

    async fn destroy(&self, record: &DependentRecord) -> Result<u64, InternalError> {
        let result = leave::Entity::delete_by_id(record.id)
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_leave", e))?;
        Ok(result.rows_affected)
    }
}

/// Payslips are keyed by numeric employee id on older rows and by email on newer ones
pub struct PayslipStore {
    db: DatabaseConnection,
}

impl PayslipStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DependentStore for PayslipStore {
    fn step(&self) -> DeletionStep {
        DeletionStep::Payslips
    }

    async fn find_all_for(&self, owner: &DependentOwner) -> Result<Vec<DependentRecord>, InternalError> {
        let rows = payslip::Entity::find()
            .filter(
                Condition::any()
                    .add(payslip::Column::EmployeeId.eq(owner.employee_id))
                    .add(email_matches(payslip::Column::Email, &owner.email)),
            )
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("find_payslips", e))?;

        Ok(rows
            .into_iter()
            .map(|row| DependentRecord { id: row.id, attachment_path: None })
            .collect())
    }

    async fn destroy(&self, record: &DependentRecord) -> Result<u64, InternalError> {
        let result = payslip::Entity::delete_by_id(record.id)
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_payslip", e))?;
        Ok(result.rows_affected)
    }
}

pub struct AccessLogStore {
    db: DatabaseConnection,
}

impl AccessLogStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DependentStore for AccessLogStore {
    fn step(&self) -> DeletionStep {
        DeletionStep::AccessLogs
    }

    async fn find_all_for(&self, owner: &DependentOwner) -> Result<Vec<DependentRecord>, InternalError> {
        let rows = access_log::Entity::find()
            .filter(email_matches(access_log::Column::Email, &owner.email))
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("find_access_logs", e))?;

        Ok(rows
            .into_iter()
            .map(|row| DependentRecord { id: row.id, attachment_path: None })
            .collect())
    }

    async fn destroy(&self, record: &DependentRecord) -> Result<u64, InternalError> {
        let result = access_log::Entity::delete_by_id(record.id)
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_access_log", e))?;
        Ok(result.rows_affected)
    }
}
