use thiserror::Error;

use super::ErrorKind;

#[derive(Error, Debug)]
pub enum KycError {
    #[error("KYC submission not found: {kyc_id}")]
    NotFound { kyc_id: i32 },

    #[error("A KYC submission for {employee_code} is already {status}")]
    SubmissionBlocked { employee_code: String, status: String },

    #[error("No acceptable documents were uploaded: {}", rejected.join("; "))]
    NoValidDocuments { rejected: Vec<String> },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Cannot move a KYC submission to {status}")]
    InvalidReviewStatus { status: String },

    #[error("KYC submission {kyc_id} is already approved")]
    AlreadyApproved { kyc_id: i32 },

    #[error("Role {role} may not review KYC submissions")]
    ReviewNotPermitted { role: String },
}

impl KycError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::SubmissionBlocked { .. } | Self::AlreadyApproved { .. } => ErrorKind::Validation,
            Self::NoValidDocuments { .. }
            | Self::MissingField { .. }
            | Self::InvalidReviewStatus { .. } => ErrorKind::Validation,
            Self::ReviewNotPermitted { .. } => ErrorKind::Forbidden,
        }
    }
}
