use std::sync::Arc;

use chrono::Utc;
use sea_orm::{IntoActiveModel, Set};
use serde_json::json;

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::config::LifecycleSettings;
use crate::coordinators::{authenticated_role, is_people_manager};
use crate::errors::internal::{EmployeeError, KycError};
use crate::errors::InternalError;
use crate::providers::{
    CodeAllocator, DocumentProvider, EmployeeResolver, IdentifierProvider, NotificationSender, NotificationTemplate,
};
use crate::stores::{EmployeeStore, KycStore};
use crate::types::db::employee::{self, EmployeeKycStatus};
use crate::types::db::kyc_submission::{self, KycStatus};
use crate::types::internal::context::RequestContext;
use crate::types::internal::kyc::{
    initial_reviews, merge_reviews, DocumentReviewStatus, KycDocuments, KycReviewInput, KycSubmissionInput,
    SubmittedKyc,
};
use crate::types::internal::lifecycle::ReviewedKyc;

/// Subdirectory of the upload root holding KYC documents
const KYC_UPLOAD_PURPOSE: &str = "kyc";

/// Password wording in the approval notice; the real password is never re-sent
const APPROVAL_PASSWORD_PLACEHOLDER: &str = "your set password";

/// Drives KYC submissions through intake and review
///
/// ```text
/// not_submitted → pending → approved | rejected | partially_rejected
///                    ↑            (rejected / partially_rejected)
///                    └──────── resubmission creates a new row
/// ```
pub struct KycCoordinator {
    settings: Arc<LifecycleSettings>,
    kyc_store: KycStore,
    employee_store: EmployeeStore,
    resolver: EmployeeResolver,
    code_allocator: Arc<dyn CodeAllocator>,
    document_provider: Arc<DocumentProvider>,
    notification_sender: Arc<dyn NotificationSender>,
    audit_logger: Arc<AuditLogger>,
}

impl KycCoordinator {
    /// Create KycCoordinator from AppData
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            settings: app_data.settings.clone(),
            kyc_store: app_data.kyc_store.clone(),
            employee_store: app_data.employee_store.clone(),
            resolver: EmployeeResolver::new(app_data.employee_store.clone(), app_data.kyc_store.clone()),
            code_allocator: Arc::new(IdentifierProvider::new(
                app_data.employee_store.clone(),
                app_data.settings.code_strategy(),
                app_data.settings.code_width(),
            )),
            document_provider: app_data.document_provider.clone(),
            notification_sender: app_data.notification_sender.clone(),
            audit_logger: app_data.audit_logger.clone(),
        }
    }

    /// Replace the code source used for permanent codes
    pub fn with_code_allocator(mut self, code_allocator: Arc<dyn CodeAllocator>) -> Self {
        self.code_allocator = code_allocator;
        self
    }

    /// Orchestrate a KYC submission
    ///
    /// Coordinates the sequence of operations:
    /// 1. Require an authenticated caller and a full name
    /// 2. Resolve the employee (code, name, email, placeholder)
    /// 3. Refuse while the latest submission is pending or approved
    /// 4. Store the files; each bad file is refused alone
    /// 5. Insert a pending row and move the employee back to pending
    ///
    /// # Returns
    /// * `Ok(SubmittedKyc)` - The new row, how the employee was matched, and refused files
    /// * `Err(InternalError)` - Blocked resubmission, no usable documents, or database error
    pub async fn submit_kyc(
        &self,
        ctx: &RequestContext,
        input: KycSubmissionInput,
    ) -> Result<SubmittedKyc, InternalError> {
        // Step 1: Authentication and required fields
        authenticated_role(ctx)?;
        let full_name = input.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(KycError::MissingField {
                field: "full_name".to_string(),
            }
            .into());
        }
        let email = input
            .email
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty());

        // Step 2: Resolve the employee
        let resolved = self
            .resolver
            .resolve_submission(input.employee_code.as_deref(), &full_name, email.as_deref())
            .await?;

        // Step 3: Resubmission gate
        if let Some(latest) = self.kyc_store.latest_for_codes(&resolved.known_codes).await? {
            if latest.status.blocks_resubmission() {
                return Err(KycError::SubmissionBlocked {
                    employee_code: resolved.employee_code,
                    status: latest.status.to_string(),
                }
                .into());
            }
        }

        // Step 4: Document intake
        let intake = self
            .document_provider
            .accept(KYC_UPLOAD_PURPOSE, input.documents)
            .await;
        if intake.accepted.is_empty() {
            let mut rejected = intake.rejected;
            if rejected.is_empty() {
                rejected.push("no documents were uploaded".to_string());
            }
            return Err(KycError::NoValidDocuments { rejected }.into());
        }

        // Step 5: Persist
        let documents = KycDocuments {
            files: intake.accepted,
            personal: input.personal,
            bank: input.bank,
            emergency_contact: input.emergency_contact,
        };
        let stored_paths: Vec<String> = documents.files.iter().map(|f| f.path.clone()).collect();
        let document_count = documents.files.len();

        let submission = match self.insert_submission(&resolved.employee_code, &full_name, email, &documents).await {
            Ok(submission) => submission,
            Err(e) => {
                let cleanup = self.document_provider.remove(&stored_paths).await;
                if !cleanup.failed.is_empty() {
                    tracing::warn!("Could not remove {} orphaned uploads", cleanup.failed.len());
                }
                return Err(e);
            }
        };

        if let Some(employee_id) = resolved.employee_id {
            self.reset_employee_kyc_status(employee_id).await;
        }

        if let Err(e) = self
            .audit_logger
            .log_kyc_submitted(ctx, &submission, document_count)
            .await
        {
            tracing::warn!("Failed to log KYC submission: {}", e);
        }

        tracing::info!(
            "KYC submission {} filed for {} ({:?})",
            submission.id,
            submission.employee_id,
            resolved.matched_by
        );

        Ok(SubmittedKyc {
            submission,
            matched_by: resolved.matched_by,
            rejected_files: intake.rejected,
        })
    }

    async fn insert_submission(
        &self,
        employee_code: &str,
        full_name: &str,
        email: Option<String>,
        documents: &KycDocuments,
    ) -> Result<kyc_submission::Model, InternalError> {
        let documents_json = serde_json::to_string(documents)
            .map_err(|e| InternalError::parse("kyc documents", e.to_string()))?;
        let reviews_json = serde_json::to_string(&initial_reviews(&documents.files))
            .map_err(|e| InternalError::parse("kyc document reviews", e.to_string()))?;
        let now = Utc::now().timestamp();

        let row = kyc_submission::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            employee_id: Set(employee_code.to_string()),
            full_name: Set(full_name.to_string()),
            email: Set(email),
            status: Set(KycStatus::Pending),
            documents: Set(documents_json),
            document_reviews: Set(reviews_json),
            remarks: Set(None),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        self.kyc_store.insert(row).await
    }

    /// A fresh submission puts a previously rejected employee back to pending
    async fn reset_employee_kyc_status(&self, employee_id: i32) {
        let employee = match self.employee_store.find_by_id(employee_id).await {
            Ok(Some(employee)) if employee.kyc_status != EmployeeKycStatus::Pending => employee,
            Ok(_) => return,
            Err(e) => {
                tracing::warn!("Could not load employee {} after KYC submission: {}", employee_id, e);
                return;
            }
        };

        let mut row = employee.into_active_model();
        row.kyc_status = Set(EmployeeKycStatus::Pending);
        row.updated_at = Set(Utc::now().timestamp());
        if let Err(e) = self.employee_store.update(row).await {
            tracing::warn!("Could not reset KYC status of employee {}: {}", employee_id, e);
        }
    }

    /// Fetch one submission; admin and hr callers only
    pub async fn get_kyc(&self, ctx: &RequestContext, kyc_id: i32) -> Result<kyc_submission::Model, InternalError> {
        if !is_people_manager(authenticated_role(ctx)?) {
            return Err(KycError::ReviewNotPermitted { role: ctx.role_label() }.into());
        }

        self.kyc_store
            .find_by_id(kyc_id)
            .await?
            .ok_or_else(|| KycError::NotFound { kyc_id }.into())
    }

    /// Orchestrate a KYC review
    ///
    /// Coordinates the sequence of operations:
    /// 1. Check the caller is admin or hr and the target status is a decision
    /// 2. Load the submission; approved submissions are final
    /// 3. On approval, give the matched employee a permanent code and mark it approved
    /// 4. Write the decision, reviewer and merged per-document reviews
    /// 5. On rejection, mark the matched employee rejected (best-effort)
    /// 6. On approval, send the approval notice (best-effort)
    ///
    /// The employee is approved before the submission row is written. If that
    /// write fails the employee is already approved while the row is still
    /// pending; an employee already holding a permanent code keeps it, so
    /// repeating the review finishes the row without allocating twice.
    ///
    /// # Arguments
    /// * `ctx` - Request context of the reviewer
    /// * `kyc_id` - Submission to review
    /// * `review` - Overall status, remarks and per-document decisions
    pub async fn review_kyc(
        &self,
        ctx: &RequestContext,
        kyc_id: i32,
        review: KycReviewInput,
    ) -> Result<ReviewedKyc, InternalError> {
        // Step 1: Authorization and target state
        if !is_people_manager(authenticated_role(ctx)?) {
            return Err(KycError::ReviewNotPermitted { role: ctx.role_label() }.into());
        }
        if review.status == KycStatus::Pending {
            return Err(KycError::InvalidReviewStatus {
                status: review.status.to_string(),
            }
            .into());
        }

        // Step 2: Load
        let submission = self
            .kyc_store
            .find_by_id(kyc_id)
            .await?
            .ok_or(KycError::NotFound { kyc_id })?;
        if submission.status == KycStatus::Approved {
            return Err(KycError::AlreadyApproved { kyc_id }.into());
        }

        let mut warnings = Vec::new();
        let matched = self.resolver.match_for_review(&submission).await?;
        if matched.is_none() {
            tracing::warn!("KYC {} matches no employee", kyc_id);
            warnings.push(format!("no employee matches KYC submission {}", kyc_id));
        }

        // Step 3: Approval side effects on the employee
        let mut employee = matched;
        if review.status == KycStatus::Approved {
            if let Some(current) = employee.take() {
                employee = Some(self.approve_employee(current).await?);
            }
        }

        // Step 4: Record the decision
        let mut reviews = merge_reviews(&submission.parsed_reviews()?, &review.document_reviews);
        if review.status == KycStatus::Approved {
            for entry in reviews.values_mut() {
                if entry.status == DocumentReviewStatus::Pending {
                    entry.status = DocumentReviewStatus::Approved;
                }
            }
        }
        let reviews_json = serde_json::to_string(&reviews)
            .map_err(|e| InternalError::parse("kyc document reviews", e.to_string()))?;

        let now = Utc::now().timestamp();
        let mut row = submission.into_active_model();
        row.status = Set(review.status);
        row.remarks = Set(review.remarks.and_then(|r| {
            let r = r.trim().to_string();
            (!r.is_empty()).then_some(r)
        }));
        row.reviewed_by = Set(Some(ctx.actor_id.clone()));
        row.reviewed_at = Set(Some(now));
        row.document_reviews = Set(reviews_json);
        row.updated_at = Set(now);
        let submission = match self.kyc_store.update(row).await {
            Ok(submission) => submission,
            Err(e) => {
                if let Some(approved) = employee.as_ref().filter(|_| review.status == KycStatus::Approved) {
                    tracing::error!(
                        "Employee {} was approved as {} but KYC {} could not be updated; repeat the review: {}",
                        approved.id,
                        approved.employee_code,
                        kyc_id,
                        e
                    );
                }
                return Err(e);
            }
        };

        // Step 5: Rejection mirrors onto the employee
        if review.status != KycStatus::Approved {
            if let Some(current) = employee.take() {
                employee = Some(match self.mark_employee_rejected(current.clone()).await {
                    Ok(updated) => updated,
                    Err(e) => {
                        tracing::warn!("Could not mark employee {} as rejected: {}", current.id, e);
                        warnings.push(format!("employee kyc status not updated: {}", e));
                        current
                    }
                });
            }
        }

        // Step 6: Approval notice
        let permanent_code = match (&employee, review.status) {
            (Some(approved), KycStatus::Approved) => {
                self.notify_approval(approved, &mut warnings).await;
                Some(approved.employee_code.clone())
            }
            _ => None,
        };

        if let Err(e) = self
            .audit_logger
            .log_kyc_reviewed(ctx, &submission, permanent_code.as_deref())
            .await
        {
            tracing::warn!("Failed to log KYC review: {}", e);
        }

        tracing::info!("KYC {} reviewed as {} by {}", kyc_id, submission.status, ctx.actor_id);

        Ok(ReviewedKyc {
            submission,
            employee,
            permanent_code,
            warnings,
        })
    }

    /// Assign a permanent code and mark the employee approved, retrying on code collisions
    async fn approve_employee(&self, current: employee::Model) -> Result<employee::Model, InternalError> {
        let permanent_prefix = self.settings.permanent_code_prefix();

        if current.employee_code.starts_with(permanent_prefix) {
            let mut row = current.into_active_model();
            row.kyc_status = Set(EmployeeKycStatus::Approved);
            row.updated_at = Set(Utc::now().timestamp());
            return self.employee_store.update(row).await;
        }

        let attempts = self.settings.allocation_attempts();
        for attempt in 1..=attempts {
            let code = self.code_allocator.allocate(permanent_prefix).await?;

            let mut row = current.clone().into_active_model();
            row.employee_code = Set(code.clone());
            row.provisional_code = Set(Some(
                current
                    .provisional_code
                    .clone()
                    .unwrap_or_else(|| current.employee_code.clone()),
            ));
            row.kyc_status = Set(EmployeeKycStatus::Approved);
            row.updated_at = Set(Utc::now().timestamp());

            match self.employee_store.update(row).await {
                Ok(updated) => {
                    tracing::info!(
                        "Employee {} moved from {} to permanent code {}",
                        updated.id,
                        current.employee_code,
                        code
                    );
                    return Ok(updated);
                }
                Err(e) if e.is_unique_violation_on("employee_code") => {
                    tracing::warn!("Permanent code {} was taken concurrently (attempt {}/{})", code, attempt, attempts);
                }
                Err(e) => return Err(e),
            }
        }

        Err(EmployeeError::CodeAllocationExhausted { attempts }.into())
    }

    async fn mark_employee_rejected(&self, current: employee::Model) -> Result<employee::Model, InternalError> {
        let mut row = current.into_active_model();
        row.kyc_status = Set(EmployeeKycStatus::Rejected);
        row.updated_at = Set(Utc::now().timestamp());
        self.employee_store.update(row).await
    }

    async fn notify_approval(&self, employee: &employee::Model, warnings: &mut Vec<String>) {
        let payload = json!({
            "name": employee.name,
            "email": employee.email,
            "employee_code": employee.employee_code,
            "password": APPROVAL_PASSWORD_PLACEHOLDER,
        });

        let result = self
            .notification_sender
            .send(&employee.email, NotificationTemplate::KycApproved, payload)
            .await;

        if !result.success {
            let error = result.error.unwrap_or_else(|| "unknown error".to_string());
            tracing::warn!("Approval notice for {} failed: {}", employee.email, error);
            warnings.push(format!("approval notification failed: {}", error));
        }
    }
}
