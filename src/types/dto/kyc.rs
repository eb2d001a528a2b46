use poem_openapi::types::multipart::Upload;
use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Multipart, Object};

use crate::errors::InternalError;
use crate::types::db::kyc_submission::{self, KycStatus};
use crate::types::dto::employee::EmployeeResponse;
use crate::types::internal::kyc::{
    BankDetails, DocumentReview, DocumentReviewStatus, DocumentReviews, DocumentType, EmergencyContact,
    IncomingDocument, KycReviewInput, KycSubmissionInput, MatchSource, PersonalDetails, SubmittedKyc,
};
use crate::types::internal::lifecycle::ReviewedKyc;

/// Multipart KYC submission: text fields plus one optional file per document slot
#[derive(Multipart, Debug)]
pub struct KycSubmissionForm {
    pub employee_code: Option<String>,
    pub full_name: String,
    pub email: Option<String>,

    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub nationality: Option<String>,

    pub account_holder: Option<String>,
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub bank_name: Option<String>,

    pub emergency_contact_name: Option<String>,
    pub emergency_contact_relation: Option<String>,
    pub emergency_contact_phone: Option<String>,

    pub aadhaar_front: Option<Upload>,
    pub aadhaar_back: Option<Upload>,
    pub pan_card: Option<Upload>,
    pub photo: Option<Upload>,
    pub bank_proof: Option<Upload>,
    pub education_certificate: Option<Upload>,
    pub experience_letter: Option<Upload>,
}

impl KycSubmissionForm {
    /// Read every uploaded file into memory and split the form into domain input
    pub async fn into_input(self) -> Result<KycSubmissionInput, InternalError> {
        let personal = any_present(&[&self.date_of_birth, &self.address, &self.nationality]).then(|| {
            PersonalDetails {
                date_of_birth: self.date_of_birth.clone(),
                address: self.address.clone(),
                nationality: self.nationality.clone(),
            }
        });

        let bank = any_present(&[&self.account_holder, &self.account_number, &self.ifsc_code, &self.bank_name])
            .then(|| BankDetails {
                account_holder: self.account_holder.clone(),
                account_number: self.account_number.clone(),
                ifsc_code: self.ifsc_code.clone(),
                bank_name: self.bank_name.clone(),
            });

        let emergency_contact = any_present(&[
            &self.emergency_contact_name,
            &self.emergency_contact_relation,
            &self.emergency_contact_phone,
        ])
        .then(|| EmergencyContact {
            name: self.emergency_contact_name.clone(),
            relation: self.emergency_contact_relation.clone(),
            phone: self.emergency_contact_phone.clone(),
        });

        let uploads = [
            (DocumentType::AadhaarFront, self.aadhaar_front),
            (DocumentType::AadhaarBack, self.aadhaar_back),
            (DocumentType::PanCard, self.pan_card),
            (DocumentType::Photo, self.photo),
            (DocumentType::BankProof, self.bank_proof),
            (DocumentType::EducationCertificate, self.education_certificate),
            (DocumentType::ExperienceLetter, self.experience_letter),
        ];

        let mut documents = Vec::new();
        for (doc_type, upload) in uploads {
            let Some(upload) = upload else { continue };
            let file_name = upload.file_name().map(str::to_string);
            let content_type = upload.content_type().map(str::to_string);
            let bytes = upload
                .into_vec()
                .await
                .map_err(|e| InternalError::storage("read_upload", doc_type.field_name(), e))?;

            documents.push(IncomingDocument {
                doc_type,
                file_name,
                content_type,
                bytes,
            });
        }

        Ok(KycSubmissionInput {
            employee_code: self.employee_code,
            full_name: self.full_name,
            email: self.email,
            personal,
            bank,
            emergency_contact,
            documents,
        })
    }
}

fn any_present(fields: &[&Option<String>]) -> bool {
    fields
        .iter()
        .any(|f| f.as_deref().is_some_and(|v| !v.trim().is_empty()))
}

/// Reviewer decision for one document slot
#[derive(Object, Debug, Clone)]
pub struct DocumentDecision {
    #[oai(rename = "type")]
    pub doc_type: DocumentType,
    pub status: DocumentReviewStatus,
    pub remark: Option<String>,
}

#[derive(Object, Debug)]
pub struct KycReviewRequest {
    /// approved, rejected or partially_rejected
    pub status: KycStatus,
    pub remarks: Option<String>,
    #[oai(default)]
    pub documents: Vec<DocumentDecision>,
}

impl From<KycReviewRequest> for KycReviewInput {
    fn from(req: KycReviewRequest) -> Self {
        let document_reviews: DocumentReviews = req
            .documents
            .into_iter()
            .map(|d| {
                (
                    d.doc_type,
                    DocumentReview {
                        status: d.status,
                        remark: d.remark,
                    },
                )
            })
            .collect();

        Self {
            status: req.status,
            remarks: req.remarks,
            document_reviews,
        }
    }
}

/// One stored document with its review state
#[derive(Object, Debug, Clone)]
pub struct KycDocumentResponse {
    #[oai(rename = "type")]
    pub doc_type: DocumentType,
    pub original_name: String,
    pub path: String,
    pub review_status: DocumentReviewStatus,
    pub remark: Option<String>,
}

#[derive(Object, Debug, Clone)]
pub struct KycResponse {
    pub id: i32,
    pub employee_id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub status: KycStatus,
    pub documents: Vec<KycDocumentResponse>,
    pub personal: Option<PersonalDetails>,
    pub bank: Option<BankDetails>,
    pub emergency_contact: Option<EmergencyContact>,
    pub remarks: Option<String>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl KycResponse {
    pub fn try_from_model(model: kyc_submission::Model) -> Result<Self, InternalError> {
        let documents = model.parsed_documents()?;
        let reviews = model.parsed_reviews()?;

        let files = documents
            .files
            .into_iter()
            .map(|doc| {
                let review = reviews.get(&doc.doc_type);
                KycDocumentResponse {
                    doc_type: doc.doc_type,
                    original_name: doc.original_name,
                    path: doc.path,
                    review_status: review.map(|r| r.status).unwrap_or(DocumentReviewStatus::Pending),
                    remark: review.and_then(|r| r.remark.clone()),
                }
            })
            .collect();

        Ok(Self {
            id: model.id,
            employee_id: model.employee_id,
            full_name: model.full_name,
            email: model.email,
            status: model.status,
            documents: files,
            personal: documents.personal,
            bank: documents.bank,
            emergency_contact: documents.emergency_contact,
            remarks: model.remarks,
            reviewed_by: model.reviewed_by,
            reviewed_at: model.reviewed_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[derive(Object, Debug)]
pub struct KycSubmittedResponse {
    pub submission: KycResponse,
    pub matched_by: MatchSource,
    /// Files that were refused, each naming its field
    pub rejected_files: Vec<String>,
}

#[derive(ApiResponse)]
pub enum KycSubmitApiResponse {
    /// Submission stored as pending
    #[oai(status = 201)]
    Created(Json<KycSubmittedResponse>),
}

impl KycSubmittedResponse {
    pub fn try_from_outcome(outcome: SubmittedKyc) -> Result<Self, InternalError> {
        Ok(Self {
            submission: KycResponse::try_from_model(outcome.submission)?,
            matched_by: outcome.matched_by,
            rejected_files: outcome.rejected_files,
        })
    }
}

#[derive(Object, Debug)]
pub struct KycReviewResponse {
    pub submission: KycResponse,
    pub employee: Option<EmployeeResponse>,
    pub permanent_code: Option<String>,
    pub warnings: Vec<String>,
}

impl KycReviewResponse {
    pub fn try_from_outcome(outcome: ReviewedKyc) -> Result<Self, InternalError> {
        Ok(Self {
            submission: KycResponse::try_from_model(outcome.submission)?,
            employee: outcome.employee.map(Into::into),
            permanent_code: outcome.permanent_code,
            warnings: outcome.warnings,
        })
    }
}
