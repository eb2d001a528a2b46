use uuid::Uuid;

use crate::errors::InternalError;
use crate::stores::{EmployeeStore, KycStore};
use crate::types::db::{employee, kyc_submission};
use crate::types::internal::kyc::{MatchSource, ResolvedEmployee};

const PLACEHOLDER_PREFIX: &str = "PENDING-";

/// Ties KYC submissions to employees through soft keys (code, name, email)
pub struct EmployeeResolver {
    employee_store: EmployeeStore,
    kyc_store: KycStore,
}

impl EmployeeResolver {
    pub fn new(employee_store: EmployeeStore, kyc_store: KycStore) -> Self {
        Self {
            employee_store,
            kyc_store,
        }
    }

    /// Resolve the employee a new submission belongs to
    ///
    /// Tried in order:
    /// 1. a well-formed caller-supplied code whose employee carries the submitted name
    /// 2. the full name
    /// 3. the email
    /// 4. the placeholder code of an earlier unmatched submission by the same
    ///    name or email, so the resubmission gate sees that row
    /// 5. a fresh placeholder code
    pub async fn resolve_submission(
        &self,
        claimed_code: Option<&str>,
        full_name: &str,
        email: Option<&str>,
    ) -> Result<ResolvedEmployee, InternalError> {
        if let Some(code) = claimed_code.map(str::trim).filter(|c| is_well_formed_code(c)) {
            match self.employee_store.find_by_code(code).await? {
                Some(found) if names_match(&found.name, full_name) => {
                    return Ok(resolved(&found, MatchSource::Code));
                }
                Some(found) => {
                    tracing::info!(
                        "Submitted code {} belongs to a different name than {:?}; ignoring it",
                        found.employee_code,
                        full_name
                    );
                }
                None => tracing::debug!("Submitted code {} is unknown", code),
            }
        }

        if let Some(found) = self.employee_store.find_by_name_ignoring_case(full_name).await? {
            return Ok(resolved(&found, MatchSource::Name));
        }

        if let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) {
            if let Some(found) = self.employee_store.find_by_email(email).await? {
                return Ok(resolved(&found, MatchSource::Email));
            }
        }

        if let Some(earlier) = self
            .kyc_store
            .latest_with_code_prefix_for(PLACEHOLDER_PREFIX, full_name, email)
            .await?
        {
            tracing::info!(
                "No employee matched KYC submission for {:?}; reusing placeholder {}",
                full_name,
                earlier.employee_id
            );
            return Ok(ResolvedEmployee {
                known_codes: vec![earlier.employee_id.clone()],
                employee_code: earlier.employee_id,
                employee_id: None,
                matched_by: MatchSource::Placeholder,
            });
        }

        let placeholder = placeholder_code();
        tracing::warn!("No employee matched KYC submission for {:?}; filing under {}", full_name, placeholder);

        Ok(ResolvedEmployee {
            known_codes: vec![placeholder.clone()],
            employee_code: placeholder,
            employee_id: None,
            matched_by: MatchSource::Placeholder,
        })
    }

    /// Find the employee a submission refers to at review time
    ///
    /// Tries the stored code (current or provisional), the exact name, the
    /// email, then the name ignoring case.
    pub async fn match_for_review(
        &self,
        submission: &kyc_submission::Model,
    ) -> Result<Option<employee::Model>, InternalError> {
        if let Some(found) = self.employee_store.find_by_code(&submission.employee_id).await? {
            return Ok(Some(found));
        }
        if let Some(found) = self.employee_store.find_by_exact_name(&submission.full_name).await? {
            return Ok(Some(found));
        }
        if let Some(email) = submission.email.as_deref().filter(|e| !e.trim().is_empty()) {
            if let Some(found) = self.employee_store.find_by_email(email).await? {
                return Ok(Some(found));
            }
        }
        self.employee_store.find_by_name_ignoring_case(&submission.full_name).await
    }
}

fn resolved(employee: &employee::Model, matched_by: MatchSource) -> ResolvedEmployee {
    ResolvedEmployee {
        employee_code: employee.employee_code.clone(),
        employee_id: Some(employee.id),
        known_codes: employee.known_codes(),
        matched_by,
    }
}

/// 3 to 32 ASCII letters, digits or hyphens
pub fn is_well_formed_code(code: &str) -> bool {
    (3..=32).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn names_match(on_file: &str, submitted: &str) -> bool {
    on_file.trim().eq_ignore_ascii_case(submitted.trim())
}

fn placeholder_code() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{}{}", PLACEHOLDER_PREFIX, id[..8].to_ascii_uppercase())
}
