use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Document slots accepted on a KYC submission; the multipart field name equals the slot name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, poem_openapi::Enum)]
#[serde(rename_all = "snake_case")]
#[oai(rename_all = "snake_case")]
pub enum DocumentType {
    AadhaarFront,
    AadhaarBack,
    PanCard,
    Photo,
    BankProof,
    EducationCertificate,
    ExperienceLetter,
}

impl DocumentType {
    pub const ALL: [DocumentType; 7] = [
        Self::AadhaarFront,
        Self::AadhaarBack,
        Self::PanCard,
        Self::Photo,
        Self::BankProof,
        Self::EducationCertificate,
        Self::ExperienceLetter,
    ];

    pub fn field_name(&self) -> &'static str {
        match self {
            Self::AadhaarFront => "aadhaar_front",
            Self::AadhaarBack => "aadhaar_back",
            Self::PanCard => "pan_card",
            Self::Photo => "photo",
            Self::BankProof => "bank_proof",
            Self::EducationCertificate => "education_certificate",
            Self::ExperienceLetter => "experience_letter",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.field_name() == name)
    }
}

/// A file accepted by the document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub path: String,
    pub original_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, poem_openapi::Object)]
pub struct PersonalDetails {
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub nationality: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, poem_openapi::Object)]
pub struct BankDetails {
    pub account_holder: Option<String>,
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub bank_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, poem_openapi::Object)]
pub struct EmergencyContact {
    pub name: Option<String>,
    pub relation: Option<String>,
    pub phone: Option<String>,
}

/// Content of the `documents` column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KycDocuments {
    pub files: Vec<StoredDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal: Option<PersonalDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank: Option<BankDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<EmergencyContact>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, poem_openapi::Enum)]
#[serde(rename_all = "snake_case")]
#[oai(rename_all = "snake_case")]
pub enum DocumentReviewStatus {
    Pending,
    Approved,
    Rejected,
}

/// Reviewer decision for one document slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReview {
    pub status: DocumentReviewStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Content of the `document_reviews` column
pub type DocumentReviews = BTreeMap<DocumentType, DocumentReview>;

/// Every uploaded slot starts out pending
pub fn initial_reviews(files: &[StoredDocument]) -> DocumentReviews {
    files
        .iter()
        .map(|doc| {
            (
                doc.doc_type,
                DocumentReview {
                    status: DocumentReviewStatus::Pending,
                    remark: None,
                },
            )
        })
        .collect()
}

/// A file received on a submission, before validation
#[derive(Debug, Clone)]
pub struct IncomingDocument {
    pub doc_type: DocumentType,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Everything an employee sends with a KYC submission
#[derive(Debug, Clone, Default)]
pub struct KycSubmissionInput {
    /// Code the caller believes is theirs; re-validated against the name on file
    pub employee_code: Option<String>,
    pub full_name: String,
    pub email: Option<String>,
    pub personal: Option<PersonalDetails>,
    pub bank: Option<BankDetails>,
    pub emergency_contact: Option<EmergencyContact>,
    pub documents: Vec<IncomingDocument>,
}

/// How a submission was tied to an employee
#[derive(Debug, Clone, Copy, PartialEq, Eq, poem_openapi::Enum)]
#[oai(rename_all = "snake_case")]
pub enum MatchSource {
    Code,
    Name,
    Email,
    /// No employee matched; a placeholder code was synthesized
    Placeholder,
}

/// Result of resolving the employee a submission belongs to
#[derive(Debug, Clone)]
pub struct ResolvedEmployee {
    pub employee_code: String,
    pub employee_id: Option<i32>,
    /// Every code earlier submissions may have been filed under
    pub known_codes: Vec<String>,
    pub matched_by: MatchSource,
}

/// Outcome of a document intake pass
#[derive(Debug, Clone, Default)]
pub struct DocumentIntake {
    pub accepted: Vec<StoredDocument>,
    /// One message per rejected file, citing its field name
    pub rejected: Vec<String>,
}

/// A reviewer decision on a submission
#[derive(Debug, Clone)]
pub struct KycReviewInput {
    pub status: crate::types::db::kyc_submission::KycStatus,
    pub remarks: Option<String>,
    pub document_reviews: DocumentReviews,
}

/// Outcome of a successful submission
#[derive(Debug, Clone)]
pub struct SubmittedKyc {
    pub submission: crate::types::db::kyc_submission::Model,
    pub matched_by: MatchSource,
    pub rejected_files: Vec<String>,
}

/// Apply reviewer decisions on top of the stored ones; unlisted slots keep their review
pub fn merge_reviews(current: &DocumentReviews, decisions: &DocumentReviews) -> DocumentReviews {
    let mut merged = current.clone();
    for (doc_type, review) in decisions {
        merged.insert(*doc_type, review.clone());
    }
    merged
}
