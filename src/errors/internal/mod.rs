use thiserror::Error;

pub mod audit;
pub mod database;
pub mod employee;
pub mod kyc;
pub mod token;

pub use audit::AuditError;
pub use database::DatabaseError;
pub use employee::EmployeeError;
pub use kyc::KycError;
pub use token::TokenError;

/// Internal error type for store, provider and coordinator operations
///
/// Hybrid design separates infrastructure errors (shared) from domain errors.
/// Not exposed via API - endpoints convert to `ApiError`.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto {
        operation: String,
        message: String,
    },

    #[error("Storage error: {operation} failed for {path}: {source}")]
    Storage {
        operation: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Employee(#[from] EmployeeError),

    #[error(transparent)]
    Kyc(#[from] KycError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Audit(#[from] AuditError),
}

/// Caller-facing classification of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any write; the caller can fix the input
    Validation,
    /// Lost a uniqueness race; re-invoking is expected to succeed
    Conflict,
    NotFound,
    Unauthorized,
    Forbidden,
    Internal,
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn parse(value_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            value_type: value_type.into(),
            message: message.into(),
        }
    }

    pub fn crypto(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Crypto {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn storage(operation: impl Into<String>, path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Storage {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// True when a write lost against a unique constraint
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, InternalError::Database(db) if db.is_unique_violation())
    }

    /// True when the violated unique constraint involves `column`
    pub fn is_unique_violation_on(&self, column: &str) -> bool {
        match self {
            InternalError::Database(db) => db
                .unique_violation_message()
                .is_some_and(|message| message.contains(column)),
            _ => false,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            InternalError::Database(db) if db.is_unique_violation() => ErrorKind::Conflict,
            InternalError::Database(_)
            | InternalError::Parse { .. }
            | InternalError::Crypto { .. }
            | InternalError::Storage { .. }
            | InternalError::Audit(_) => ErrorKind::Internal,
            InternalError::Employee(e) => e.kind(),
            InternalError::Kyc(e) => e.kind(),
            InternalError::Token(_) => ErrorKind::Unauthorized,
        }
    }
}
