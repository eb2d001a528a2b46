use std::sync::Arc;

use serde_json::json;

use crate::errors::InternalError;
use crate::stores::audit_store::AuditStore;
use crate::types::db::{employee, kyc_submission};
use crate::types::internal::audit::{AuditEvent, EventType};
use crate::types::internal::context::RequestContext;
use crate::types::internal::deletion::DeletionSummary;

/// Writes lifecycle events to the audit database
///
/// Every method is fallible; coordinators treat audit writes as best-effort
/// and only log a warning when one fails.
pub struct AuditLogger {
    pub audit_store: Arc<AuditStore>,
}

impl AuditLogger {
    pub fn new(audit_store: Arc<AuditStore>) -> Self {
        Self { audit_store }
    }

    /// Seed an event with the actor, request id and ip taken from the context
    fn event_for(ctx: &RequestContext, event_type: EventType) -> AuditEvent {
        let mut event = AuditEvent::new(event_type, ctx.actor_id.clone(), ctx.request_id.to_string());
        event.ip_address = ctx.ip_address.map(|ip| ip.to_string());
        event.data.insert("source".to_string(), json!(ctx.source.as_str()));
        if let Some(claims) = &ctx.claims {
            event.data.insert("jwt_id".to_string(), json!(claims.jti));
        }
        event
    }

    /// Log employee creation
    ///
    /// # Arguments
    /// * `ctx` - Request context of the caller
    /// * `employee` - The inserted row
    /// * `credentials_issued` - Whether a login record was created or refreshed
    pub async fn log_employee_created(
        &self,
        ctx: &RequestContext,
        employee: &employee::Model,
        credentials_issued: bool,
    ) -> Result<(), InternalError> {
        let mut event = Self::event_for(ctx, EventType::EmployeeCreated).with_subject(&employee.employee_code);
        event.data.insert("employee_id".to_string(), json!(employee.id));
        event.data.insert("employee_code".to_string(), json!(employee.employee_code));
        event.data.insert("email".to_string(), json!(employee.email));
        event.data.insert("credentials_issued".to_string(), json!(credentials_issued));

        self.audit_store.write_event(event).await
    }

    pub async fn log_employee_updated(
        &self,
        ctx: &RequestContext,
        employee: &employee::Model,
        changed_fields: Vec<&'static str>,
    ) -> Result<(), InternalError> {
        let mut event = Self::event_for(ctx, EventType::EmployeeUpdated).with_subject(&employee.employee_code);
        event.data.insert("employee_id".to_string(), json!(employee.id));
        event.data.insert("changed_fields".to_string(), json!(changed_fields));

        self.audit_store.write_event(event).await
    }

    pub async fn log_employee_soft_deleted(
        &self,
        ctx: &RequestContext,
        employee: &employee::Model,
    ) -> Result<(), InternalError> {
        let mut event = Self::event_for(ctx, EventType::EmployeeSoftDeleted).with_subject(&employee.employee_code);
        event.data.insert("employee_id".to_string(), json!(employee.id));
        event.data.insert("employee_code".to_string(), json!(employee.employee_code));

        self.audit_store.write_event(event).await
    }

    /// Log a permanent delete with its per-category counts
    pub async fn log_employee_hard_deleted(
        &self,
        ctx: &RequestContext,
        employee: &employee::Model,
        summary: &DeletionSummary,
    ) -> Result<(), InternalError> {
        let mut event = Self::event_for(ctx, EventType::EmployeeHardDeleted).with_subject(&employee.employee_code);
        event.data.insert("employee_id".to_string(), json!(employee.id));
        event.data.insert("employee_code".to_string(), json!(employee.employee_code));
        event.data.insert("email".to_string(), json!(employee.email));
        event.data.insert("summary".to_string(), json!(summary));

        self.audit_store.write_event(event).await
    }

    pub async fn log_kyc_submitted(
        &self,
        ctx: &RequestContext,
        submission: &kyc_submission::Model,
        document_count: usize,
    ) -> Result<(), InternalError> {
        let mut event = Self::event_for(ctx, EventType::KycSubmitted).with_subject(&submission.employee_id);
        event.data.insert("kyc_id".to_string(), json!(submission.id));
        event.data.insert("employee_code".to_string(), json!(submission.employee_id));
        event.data.insert("document_count".to_string(), json!(document_count));

        self.audit_store.write_event(event).await
    }

    pub async fn log_kyc_reviewed(
        &self,
        ctx: &RequestContext,
        submission: &kyc_submission::Model,
        permanent_code: Option<&str>,
    ) -> Result<(), InternalError> {
        let subject = permanent_code.unwrap_or(&submission.employee_id);
        let mut event = Self::event_for(ctx, EventType::KycReviewed).with_subject(subject);
        event.data.insert("kyc_id".to_string(), json!(submission.id));
        event.data.insert("status".to_string(), json!(submission.status.as_str()));
        if let Some(code) = permanent_code {
            event.data.insert("permanent_code".to_string(), json!(code));
        }

        self.audit_store.write_event(event).await
    }
}
