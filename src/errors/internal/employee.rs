use thiserror::Error;

use super::ErrorKind;

#[derive(Error, Debug)]
pub enum EmployeeError {
    #[error("Invalid email address: {email}")]
    InvalidEmail { email: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Email already in use: {email}")]
    DuplicateEmail { email: String },

    #[error("Employee not found: {employee_id}")]
    NotFound { employee_id: String },

    #[error("Could not allocate a unique employee code after {attempts} attempts")]
    CodeAllocationExhausted { attempts: u32 },

    #[error("Role {role} may not delete employees")]
    DeletionNotPermitted { role: String },

    #[error("Role {role} may not manage employees")]
    ManagementNotPermitted { role: String },
}

impl EmployeeError {
    pub fn missing_field(field: &str) -> Self {
        Self::MissingField {
            field: field.to_string(),
        }
    }

    pub fn not_found(employee_id: impl ToString) -> Self {
        Self::NotFound {
            employee_id: employee_id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidEmail { .. } | Self::MissingField { .. } | Self::DuplicateEmail { .. } => {
                ErrorKind::Validation
            }
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::CodeAllocationExhausted { .. } => ErrorKind::Conflict,
            Self::DeletionNotPermitted { .. } | Self::ManagementNotPermitted { .. } => ErrorKind::Forbidden,
        }
    }
}
