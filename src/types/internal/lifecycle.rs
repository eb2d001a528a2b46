use crate::types::db::{employee, kyc_submission};

/// Input for creating an employee
#[derive(Debug, Clone, Default)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
    pub can_access_system: Option<bool>,
}

/// Fields an admin may change; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct EmployeeChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub status: Option<employee::EmploymentStatus>,
    pub is_active: Option<bool>,
    pub can_access_system: Option<bool>,
}

/// What happened to the onboarding notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, poem_openapi::Enum)]
#[oai(rename_all = "snake_case")]
pub enum NotificationState {
    Sent,
    /// Employee is inactive or has no system access
    Skipped,
    Failed,
}

/// Outcome of `create_employee`; warnings carry best-effort failures
#[derive(Debug, Clone)]
pub struct CreatedEmployee {
    pub employee: employee::Model,
    /// `None` when credential issuance failed after the employee row was written
    pub temp_password: Option<String>,
    pub notification: NotificationState,
    pub warnings: Vec<String>,
}

/// Outcome of `update_employee`
#[derive(Debug, Clone)]
pub struct UpdatedEmployee {
    pub employee: employee::Model,
    /// Whether a matching user row was found and synchronized
    pub user_synced: bool,
    pub warnings: Vec<String>,
}

/// Outcome of a KYC review
#[derive(Debug, Clone)]
pub struct ReviewedKyc {
    pub submission: kyc_submission::Model,
    /// Employee after side effects, when one could be matched
    pub employee: Option<employee::Model>,
    pub permanent_code: Option<String>,
    pub warnings: Vec<String>,
}
