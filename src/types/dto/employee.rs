use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Object};

use crate::types::db::employee::{self, EmployeeKycStatus, EmploymentStatus};
use crate::types::internal::deletion::{DeletionOutcome, DeletionSummary, DeletionType};
use crate::types::internal::lifecycle::{
    CreatedEmployee, EmployeeChanges, NewEmployee, NotificationState, UpdatedEmployee,
};

/// Request to onboard an employee
#[derive(Object, Debug)]
pub struct CreateEmployeeRequest {
    pub name: String,
    pub email: String,
    /// Free-form role label such as "Developer" or "HR Manager"
    pub role: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    /// Defaults to true
    pub is_active: Option<bool>,
    /// Defaults to true
    pub can_access_system: Option<bool>,
}

impl From<CreateEmployeeRequest> for NewEmployee {
    fn from(req: CreateEmployeeRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            role: req.role,
            department: req.department,
            designation: req.designation,
            location: req.location,
            phone: req.phone,
            is_active: req.is_active,
            can_access_system: req.can_access_system,
        }
    }
}

/// Partial update; omitted fields are left unchanged
#[derive(Object, Debug, Default)]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub status: Option<EmploymentStatus>,
    pub is_active: Option<bool>,
    pub can_access_system: Option<bool>,
}

impl From<UpdateEmployeeRequest> for EmployeeChanges {
    fn from(req: UpdateEmployeeRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            role: req.role,
            department: req.department,
            designation: req.designation,
            location: req.location,
            phone: req.phone,
            status: req.status,
            is_active: req.is_active,
            can_access_system: req.can_access_system,
        }
    }
}

#[derive(Object, Debug, Clone)]
pub struct EmployeeResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub employee_code: String,
    pub provisional_code: Option<String>,
    pub role: String,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub status: EmploymentStatus,
    pub is_active: bool,
    pub can_access_system: bool,
    pub kyc_status: EmployeeKycStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<employee::Model> for EmployeeResponse {
    fn from(model: employee::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            employee_code: model.employee_code,
            provisional_code: model.provisional_code,
            role: model.role,
            department: model.department,
            designation: model.designation,
            location: model.location,
            phone: model.phone,
            status: model.status,
            is_active: model.is_active,
            can_access_system: model.can_access_system,
            kyc_status: model.kyc_status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct CreateEmployeeResponse {
    pub employee: EmployeeResponse,
    /// Shown once; absent when credential issuance failed
    pub temp_password: Option<String>,
    pub notification: NotificationState,
    pub warnings: Vec<String>,
}

#[derive(ApiResponse)]
pub enum CreateEmployeeApiResponse {
    /// Employee onboarded
    #[oai(status = 201)]
    Created(Json<CreateEmployeeResponse>),
}

impl From<CreatedEmployee> for CreateEmployeeResponse {
    fn from(created: CreatedEmployee) -> Self {
        Self {
            employee: created.employee.into(),
            temp_password: created.temp_password,
            notification: created.notification,
            warnings: created.warnings,
        }
    }
}

#[derive(Object, Debug)]
pub struct UpdateEmployeeResponse {
    pub employee: EmployeeResponse,
    pub user_synced: bool,
    pub warnings: Vec<String>,
}

impl From<UpdatedEmployee> for UpdateEmployeeResponse {
    fn from(updated: UpdatedEmployee) -> Self {
        Self {
            employee: updated.employee.into(),
            user_synced: updated.user_synced,
            warnings: updated.warnings,
        }
    }
}

/// Per-category counts of a permanent delete
#[derive(Object, Debug)]
pub struct DeletionSummaryResponse {
    pub kyc_submissions: u64,
    pub attendance: u64,
    pub leaves: u64,
    pub payslips: u64,
    pub access_logs: u64,
    pub users: u64,
    pub employees: u64,
    pub files_removed: u64,
    pub files_missing: u64,
    /// Steps or files that failed without stopping the cascade
    pub failures: Vec<String>,
}

impl From<DeletionSummary> for DeletionSummaryResponse {
    fn from(summary: DeletionSummary) -> Self {
        let mut failures: Vec<String> = summary
            .failures
            .iter()
            .map(|f| format!("{}: {}", f.step.as_str(), f.error))
            .collect();
        failures.extend(
            summary
                .files
                .failed
                .iter()
                .map(|(path, error)| format!("file {}: {}", path, error)),
        );

        Self {
            kyc_submissions: summary.kyc_submissions,
            attendance: summary.attendance,
            leaves: summary.leaves,
            payslips: summary.payslips,
            access_logs: summary.access_logs,
            users: summary.users,
            employees: summary.employees,
            files_removed: summary.files.removed as u64,
            files_missing: summary.files.missing as u64,
            failures,
        }
    }
}

#[derive(Object, Debug)]
pub struct DeleteEmployeeResponse {
    pub deletion_type: DeletionType,
    pub employee_id: i32,
    pub employee_code: String,
    pub summary: Option<DeletionSummaryResponse>,
}

impl From<DeletionOutcome> for DeleteEmployeeResponse {
    fn from(outcome: DeletionOutcome) -> Self {
        Self {
            deletion_type: outcome.deletion_type,
            employee_id: outcome.employee_id,
            employee_code: outcome.employee_code,
            summary: outcome.summary.map(Into::into),
        }
    }
}
