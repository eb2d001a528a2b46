use std::sync::Arc;

use chrono::Utc;
use sea_orm::{IntoActiveModel, Set};
use serde_json::json;
use validator::ValidateEmail;

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::config::LifecycleSettings;
use crate::coordinators::{authenticated_role, is_people_manager};
use crate::errors::internal::EmployeeError;
use crate::errors::InternalError;
use crate::providers::{
    CodeAllocator, CredentialProvider, DocumentProvider, IdentifierProvider, NotificationSender, NotificationTemplate,
};
use crate::stores::{
    AccessLogStore, AttendanceStore, DependentOwner, DependentStore, EmployeeStore, KycStore, LeaveStore,
    PayslipStore, UserStore,
};
use crate::types::db::employee::{self, EmployeeKycStatus, EmploymentStatus};
use crate::types::db::user::UserRole;
use crate::types::internal::context::RequestContext;
use crate::types::internal::deletion::{DeletionOutcome, DeletionStep, DeletionSummary, DeletionType};
use crate::types::internal::lifecycle::{
    CreatedEmployee, EmployeeChanges, NewEmployee, NotificationState, UpdatedEmployee,
};
use crate::types::internal::role_mapping::DEFAULT_ROLE_LABEL;

/// Orchestrates employee creation, update and deletion
///
/// Creation writes the employee first; everything after the insert
/// (credentials, notification, audit) is best-effort and never rolls the
/// employee back. Deletion is a saga over the dependent tables with a
/// per-step accumulator.
pub struct EmployeeCoordinator {
    settings: Arc<LifecycleSettings>,
    employee_store: EmployeeStore,
    user_store: UserStore,
    kyc_store: KycStore,
    dependent_stores: Vec<Box<dyn DependentStore>>,
    code_allocator: Arc<dyn CodeAllocator>,
    credential_provider: CredentialProvider,
    document_provider: Arc<DocumentProvider>,
    notification_sender: Arc<dyn NotificationSender>,
    audit_logger: Arc<AuditLogger>,
}

impl EmployeeCoordinator {
    /// Create EmployeeCoordinator from AppData
    ///
    /// # Arguments
    /// * `app_data` - Application data containing stores, settings and shared providers
    pub fn new(app_data: Arc<AppData>) -> Self {
        let people_db = app_data.connections.people.clone();

        // Step 1: Providers built from shared stores
        let code_allocator: Arc<dyn CodeAllocator> = Arc::new(IdentifierProvider::new(
            app_data.employee_store.clone(),
            app_data.settings.code_strategy(),
            app_data.settings.code_width(),
        ));
        let credential_provider =
            CredentialProvider::new(app_data.user_store.clone(), app_data.crypto_provider.clone());

        // Step 2: Dependent tables in cascade order
        let dependent_stores: Vec<Box<dyn DependentStore>> = vec![
            Box::new(AttendanceStore::new(people_db.clone())),
            Box::new(LeaveStore::new(people_db.clone())),
            Box::new(PayslipStore::new(people_db.clone())),
            Box::new(AccessLogStore::new(people_db)),
        ];

        Self {
            settings: app_data.settings.clone(),
            employee_store: app_data.employee_store.clone(),
            user_store: app_data.user_store.clone(),
            kyc_store: app_data.kyc_store.clone(),
            dependent_stores,
            code_allocator,
            credential_provider,
            document_provider: app_data.document_provider.clone(),
            notification_sender: app_data.notification_sender.clone(),
            audit_logger: app_data.audit_logger.clone(),
        }
    }

    /// Replace the code source used for provisional codes
    pub fn with_code_allocator(mut self, code_allocator: Arc<dyn CodeAllocator>) -> Self {
        self.code_allocator = code_allocator;
        self
    }

    /// Orchestrate employee onboarding
    ///
    /// Coordinates the sequence of operations:
    /// 1. Check the caller is admin or hr
    /// 2. Validate name and email, reject emails already on file
    /// 3. Allocate a provisional code and insert, retrying on code collisions
    /// 4. Issue credentials (best-effort)
    /// 5. Send the welcome notification when the employee may log in (best-effort)
    ///
    /// # Arguments
    /// * `ctx` - Request context of the caller
    /// * `input` - Employee fields
    ///
    /// # Returns
    /// * `Ok(CreatedEmployee)` - Employee row plus the outcome of the best-effort steps
    /// * `Err(InternalError)` - Forbidden, validation failure, exhausted code allocation, or database error
    pub async fn create_employee(
        &self,
        ctx: &RequestContext,
        input: NewEmployee,
    ) -> Result<CreatedEmployee, InternalError> {
        // Step 1: Authorization
        let role = authenticated_role(ctx)?;
        if !is_people_manager(role) {
            return Err(EmployeeError::ManagementNotPermitted { role: ctx.role_label() }.into());
        }

        // Step 2: Validation before any write
        let name = normalize_name(&input.name).ok_or_else(|| EmployeeError::missing_field("name"))?;
        let email = normalize_email(&input.email)?;
        if self.employee_store.email_taken(&email, None).await? {
            return Err(EmployeeError::DuplicateEmail { email }.into());
        }

        // Step 3: Allocate and insert
        let employee = self.insert_with_fresh_code(ctx, &name, &email, &input).await?;
        tracing::info!("Employee {} created with code {}", employee.id, employee.employee_code);

        let mut warnings = Vec::new();

        // Step 4: Credentials
        let temp_password = match self.credential_provider.issue(&employee).await {
            Ok(issued) => Some(issued.temp_password),
            Err(e) => {
                tracing::warn!("Credential issuance failed for employee {}: {}", employee.id, e);
                warnings.push(format!("credential issuance failed: {}", e));
                None
            }
        };

        // Step 5: Welcome notification
        let notification = match (&temp_password, employee.has_system_access()) {
            (Some(password), true) => {
                let payload = json!({
                    "name": employee.name,
                    "email": employee.email,
                    "employee_code": employee.employee_code,
                    "temp_password": password,
                });
                let result = self
                    .notification_sender
                    .send(&employee.email, NotificationTemplate::NewEmployee, payload)
                    .await;
                if result.success {
                    NotificationState::Sent
                } else {
                    let error = result.error.unwrap_or_else(|| "unknown error".to_string());
                    tracing::warn!("Welcome notification for {} failed: {}", employee.email, error);
                    warnings.push(format!("welcome notification failed: {}", error));
                    NotificationState::Failed
                }
            }
            _ => NotificationState::Skipped,
        };

        if let Err(e) = self
            .audit_logger
            .log_employee_created(ctx, &employee, temp_password.is_some())
            .await
        {
            tracing::warn!("Failed to log employee creation: {}", e);
        }

        Ok(CreatedEmployee {
            employee,
            temp_password,
            notification,
            warnings,
        })
    }

    async fn insert_with_fresh_code(
        &self,
        ctx: &RequestContext,
        name: &str,
        email: &str,
        input: &NewEmployee,
    ) -> Result<employee::Model, InternalError> {
        let attempts = self.settings.allocation_attempts();
        let now = Utc::now().timestamp();

        for attempt in 1..=attempts {
            let code = self
                .code_allocator
                .allocate(self.settings.provisional_code_prefix())
                .await?;

            let row = employee::ActiveModel {
                id: sea_orm::ActiveValue::NotSet,
                name: Set(name.to_string()),
                email: Set(email.to_string()),
                employee_code: Set(code.clone()),
                provisional_code: Set(Some(code.clone())),
                role: Set(clean(&input.role).unwrap_or_else(|| DEFAULT_ROLE_LABEL.to_string())),
                department: Set(clean(&input.department)),
                designation: Set(clean(&input.designation)),
                location: Set(clean(&input.location)),
                phone: Set(clean(&input.phone)),
                status: Set(EmploymentStatus::Working),
                is_active: Set(input.is_active.unwrap_or(true)),
                can_access_system: Set(input.can_access_system.unwrap_or(true)),
                kyc_status: Set(EmployeeKycStatus::Pending),
                created_at: Set(now),
                updated_at: Set(now),
            };

            match self.employee_store.insert(row).await {
                Ok(employee) => return Ok(employee),
                Err(e) if e.is_unique_violation_on("employee_code") => {
                    tracing::warn!(
                        "Code {} was taken concurrently (attempt {}/{}, request {})",
                        code,
                        attempt,
                        attempts,
                        ctx.request_id
                    );
                }
                Err(e) if e.is_unique_violation_on("email") => {
                    return Err(EmployeeError::DuplicateEmail { email: email.to_string() }.into());
                }
                Err(e) => return Err(e),
            }
        }

        Err(EmployeeError::CodeAllocationExhausted { attempts }.into())
    }

    /// Fetch one employee; admin, hr and manager callers only
    pub async fn get_employee(&self, ctx: &RequestContext, id: i32) -> Result<employee::Model, InternalError> {
        let role = authenticated_role(ctx)?;
        if !(is_people_manager(role) || role == Some(UserRole::Manager)) {
            return Err(EmployeeError::ManagementNotPermitted { role: ctx.role_label() }.into());
        }

        self.employee_store
            .find_by_id(id)
            .await?
            .ok_or_else(|| EmployeeError::not_found(id).into())
    }

    /// Orchestrate an employee update
    ///
    /// Coordinates the sequence of operations:
    /// 1. Check the caller is admin or hr
    /// 2. Load the employee and validate the changed fields
    /// 3. Write the merged row
    /// 4. Mirror name, email, role and access onto the user (best-effort)
    ///
    /// A missing user is reported through `user_synced = false`, not as an error.
    pub async fn update_employee(
        &self,
        ctx: &RequestContext,
        id: i32,
        changes: EmployeeChanges,
    ) -> Result<UpdatedEmployee, InternalError> {
        // Step 1: Authorization
        let role = authenticated_role(ctx)?;
        if !is_people_manager(role) {
            return Err(EmployeeError::ManagementNotPermitted { role: ctx.role_label() }.into());
        }

        // Step 2: Load and validate
        let current = self
            .employee_store
            .find_by_id(id)
            .await?
            .ok_or_else(|| EmployeeError::not_found(id))?;
        let previous_email = current.email.clone();

        let name = match &changes.name {
            Some(raw) => Some(normalize_name(raw).ok_or_else(|| EmployeeError::missing_field("name"))?),
            None => None,
        };
        let email = match &changes.email {
            Some(raw) => {
                let email = normalize_email(raw)?;
                if self.employee_store.email_taken(&email, Some(id)).await? {
                    return Err(EmployeeError::DuplicateEmail { email }.into());
                }
                Some(email)
            }
            None => None,
        };

        // Step 3: Merge and write
        let mut changed_fields = Vec::new();
        let mut row = current.into_active_model();
        if let Some(name) = name {
            row.name = Set(name);
            changed_fields.push("name");
        }
        if let Some(email) = email {
            row.email = Set(email);
            changed_fields.push("email");
        }
        if let Some(role) = clean(&changes.role) {
            row.role = Set(role);
            changed_fields.push("role");
        }
        if changes.department.is_some() {
            row.department = Set(clean(&changes.department));
            changed_fields.push("department");
        }
        if changes.designation.is_some() {
            row.designation = Set(clean(&changes.designation));
            changed_fields.push("designation");
        }
        if changes.location.is_some() {
            row.location = Set(clean(&changes.location));
            changed_fields.push("location");
        }
        if changes.phone.is_some() {
            row.phone = Set(clean(&changes.phone));
            changed_fields.push("phone");
        }
        if let Some(status) = changes.status {
            row.status = Set(status);
            changed_fields.push("status");
        }
        if let Some(is_active) = changes.is_active {
            row.is_active = Set(is_active);
            changed_fields.push("is_active");
        }
        if let Some(can_access_system) = changes.can_access_system {
            row.can_access_system = Set(can_access_system);
            changed_fields.push("can_access_system");
        }
        row.updated_at = Set(Utc::now().timestamp());

        let employee = match self.employee_store.update(row).await {
            Ok(employee) => employee,
            Err(e) if e.is_unique_violation_on("email") => {
                return Err(EmployeeError::DuplicateEmail {
                    email: changes.email.unwrap_or_default(),
                }
                .into());
            }
            Err(e) => return Err(e),
        };

        // Step 4: Propagate to the login record
        let mut warnings = Vec::new();
        let user_synced = match self.credential_provider.sync_from_employee(&previous_email, &employee).await {
            Ok(synced) => synced,
            Err(e) => {
                tracing::warn!("User sync failed for employee {}: {}", employee.id, e);
                warnings.push(format!("user sync failed: {}", e));
                false
            }
        };

        if let Err(e) = self.audit_logger.log_employee_updated(ctx, &employee, changed_fields).await {
            tracing::warn!("Failed to log employee update: {}", e);
        }

        Ok(UpdatedEmployee {
            employee,
            user_synced,
            warnings,
        })
    }

    /// Orchestrate employee deletion according to the caller's role
    ///
    /// * `hr` - soft delete: deactivate the employee and the user, keep every row
    /// * `admin` - permanent delete of the employee and every dependent row and file
    /// * anyone else - forbidden
    ///
    /// # Returns
    /// * `Ok(DeletionOutcome)` - Deletion type plus, for permanent deletes, the per-category summary
    /// * `Err(InternalError)` - Forbidden, not found, or the employee row itself could not be changed
    pub async fn delete_employee(&self, ctx: &RequestContext, id: i32) -> Result<DeletionOutcome, InternalError> {
        let deletion_type = match authenticated_role(ctx)? {
            Some(UserRole::Admin) => DeletionType::Permanent,
            Some(UserRole::Hr) => DeletionType::Soft,
            _ => return Err(EmployeeError::DeletionNotPermitted { role: ctx.role_label() }.into()),
        };

        let employee = self
            .employee_store
            .find_by_id(id)
            .await?
            .ok_or_else(|| EmployeeError::not_found(id))?;

        match deletion_type {
            DeletionType::Soft => self.soft_delete(ctx, employee).await,
            DeletionType::Permanent => self.hard_delete(ctx, employee).await,
        }
    }

    async fn soft_delete(
        &self,
        ctx: &RequestContext,
        employee: employee::Model,
    ) -> Result<DeletionOutcome, InternalError> {
        let email = employee.email.clone();

        let mut row = employee.into_active_model();
        row.is_active = Set(false);
        row.status = Set(EmploymentStatus::NotWorking);
        row.updated_at = Set(Utc::now().timestamp());
        let employee = self.employee_store.update(row).await?;

        match self.credential_provider.deactivate(&email).await {
            Ok(true) => {}
            Ok(false) => tracing::debug!("No user to deactivate for {}", email),
            Err(e) => tracing::warn!("Failed to deactivate user {}: {}", email, e),
        }

        if let Err(e) = self.audit_logger.log_employee_soft_deleted(ctx, &employee).await {
            tracing::warn!("Failed to log soft delete: {}", e);
        }

        tracing::info!("Employee {} deactivated by {}", employee.id, ctx.actor_id);

        Ok(DeletionOutcome {
            deletion_type: DeletionType::Soft,
            employee_id: employee.id,
            employee_code: employee.employee_code,
            summary: None,
        })
    }

    /// Run the permanent-delete cascade
    ///
    /// Every dependent step logs and continues; only failing to remove the
    /// employee row itself aborts, since the employee would still exist.
    async fn hard_delete(
        &self,
        ctx: &RequestContext,
        employee: employee::Model,
    ) -> Result<DeletionOutcome, InternalError> {
        let mut summary = DeletionSummary::default();

        // Step 1: KYC rows filed under any known code or the employee's name, with their files
        self.purge_kyc_submissions(&employee, &mut summary).await;

        // Step 2: Attendance, leaves (with attachments), payslips, access logs
        let owner = DependentOwner {
            employee_id: employee.id,
            email: employee.email.clone(),
        };
        for store in &self.dependent_stores {
            self.purge_dependents(store.as_ref(), &owner, &mut summary).await;
        }

        // Step 3: Login record
        match self.user_store.delete_by_email(&employee.email).await {
            Ok(n) => summary.add_count(DeletionStep::User, n),
            Err(e) => summary.record_failure(DeletionStep::User, e),
        }

        // Step 4: The employee row
        let removed = self.employee_store.delete(employee.id).await?;
        summary.add_count(DeletionStep::Employee, removed);

        if let Err(e) = self
            .audit_logger
            .log_employee_hard_deleted(ctx, &employee, &summary)
            .await
        {
            tracing::warn!("Failed to log hard delete: {}", e);
        }

        tracing::info!(
            "Employee {} permanently deleted by {} ({} step failures)",
            employee.id,
            ctx.actor_id,
            summary.failures.len()
        );

        Ok(DeletionOutcome {
            deletion_type: DeletionType::Permanent,
            employee_id: employee.id,
            employee_code: employee.employee_code,
            summary: Some(summary),
        })
    }

    async fn purge_kyc_submissions(&self, employee: &employee::Model, summary: &mut DeletionSummary) {
        let step = DeletionStep::KycSubmissions;

        let submissions = match self
            .kyc_store
            .find_for_employee(&employee.known_codes(), &employee.name)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                summary.record_failure(step, e);
                return;
            }
        };

        for submission in submissions {
            match submission.parsed_documents() {
                Ok(documents) => {
                    let paths: Vec<String> = documents.files.into_iter().map(|f| f.path).collect();
                    summary.files.merge(self.document_provider.remove(&paths).await);
                }
                Err(e) => summary.record_failure(step, format!("kyc {} documents unreadable: {}", submission.id, e)),
            }

            match self.kyc_store.delete(submission.id).await {
                Ok(n) => summary.add_count(step, n),
                Err(e) => summary.record_failure(step, e),
            }
        }
    }

    async fn purge_dependents(
        &self,
        store: &dyn DependentStore,
        owner: &DependentOwner,
        summary: &mut DeletionSummary,
    ) {
        let step = store.step();

        let records = match store.find_all_for(owner).await {
            Ok(records) => records,
            Err(e) => {
                summary.record_failure(step, e);
                return;
            }
        };

        let mut attachments = Vec::new();
        for record in records {
            match store.destroy(&record).await {
                Ok(n) => {
                    summary.add_count(step, n);
                    attachments.extend(record.attachment_path);
                }
                Err(e) => summary.record_failure(step, e),
            }
        }

        if !attachments.is_empty() {
            summary.files.merge(self.document_provider.remove(&attachments).await);
        }
    }
}

/// Trimmed, upper-cased name; `None` when blank
fn normalize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_uppercase())
}

/// Trimmed, lower-cased, syntactically valid email
fn normalize_email(raw: &str) -> Result<String, EmployeeError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(EmployeeError::missing_field("email"));
    }
    if !email.validate_email() {
        return Err(EmployeeError::InvalidEmail { email });
    }
    Ok(email)
}

fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
