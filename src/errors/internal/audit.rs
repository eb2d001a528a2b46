use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Could not encode data for audit event '{event_type}': {message}")]
    EncodeFailed { event_type: String, message: String },

    #[error("Audit event '{0}' has no actor")]
    MissingActor(String),
}
