use std::collections::HashMap;
use std::fmt;

/// Event types for audit logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    EmployeeCreated,
    EmployeeUpdated,
    EmployeeSoftDeleted,
    EmployeeHardDeleted,
    KycSubmitted,
    KycReviewed,
    Custom(String),
}

impl EventType {
    /// Convert EventType to string representation for database storage
    pub fn as_str(&self) -> &str {
        match self {
            Self::EmployeeCreated => "employee_created",
            Self::EmployeeUpdated => "employee_updated",
            Self::EmployeeSoftDeleted => "employee_soft_deleted",
            Self::EmployeeHardDeleted => "employee_hard_deleted",
            Self::KycSubmitted => "kyc_submitted",
            Self::KycReviewed => "kyc_reviewed",
            Self::Custom(s) => s.as_str(),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An audit entry before it is stamped and written
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub event_type: EventType,
    pub actor_id: String,
    /// Employee code the action touched
    pub subject: Option<String>,
    pub request_id: String,
    pub ip_address: Option<String>,
    pub data: HashMap<String, serde_json::Value>,
}

impl AuditEvent {
    pub fn new(event_type: EventType, actor_id: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            event_type,
            actor_id: actor_id.into(),
            subject: None,
            request_id: request_id.into(),
            ip_address: None,
            data: HashMap::new(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}
