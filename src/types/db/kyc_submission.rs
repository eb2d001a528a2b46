use sea_orm::entity::prelude::*;

use crate::errors::InternalError;
use crate::types::internal::kyc::{DocumentReviews, KycDocuments};

/// Overall state of one KYC submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, poem_openapi::Enum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[oai(rename_all = "snake_case")]
pub enum KycStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "partially_rejected")]
    PartiallyRejected,
}

impl KycStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::PartiallyRejected => "partially_rejected",
        }
    }

    /// A submission in this state prevents the employee from submitting again
    pub fn blocks_resubmission(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }
}

impl std::fmt::Display for KycStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "kyc_submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Soft reference to `employees.employee_code` (or a placeholder code)
    #[sea_orm(indexed)]
    pub employee_id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub status: KycStatus,
    /// JSON-encoded `KycDocuments`
    pub documents: String,
    /// JSON-encoded `DocumentReviews`
    pub document_reviews: String,
    pub remarks: Option<String>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Model {
    pub fn parsed_documents(&self) -> Result<KycDocuments, InternalError> {
        serde_json::from_str(&self.documents).map_err(|e| InternalError::parse("kyc documents", e.to_string()))
    }

    pub fn parsed_reviews(&self) -> Result<DocumentReviews, InternalError> {
        if self.document_reviews.trim().is_empty() {
            return Ok(DocumentReviews::new());
        }
        serde_json::from_str(&self.document_reviews)
            .map_err(|e| InternalError::parse("kyc document reviews", e.to_string()))
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
