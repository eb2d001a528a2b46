use sea_orm::SqlErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {operation} failed: {source}")]
    Operation {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Starting transaction failed: {source}")]
    TransactionBegin {
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Committing transaction failed: {source}")]
    TransactionCommit {
        #[source]
        source: sea_orm::DbErr,
    },
}

impl DatabaseError {
    pub fn source_err(&self) -> &sea_orm::DbErr {
        match self {
            Self::Operation { source, .. }
            | Self::TransactionBegin { source }
            | Self::TransactionCommit { source } => source,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self.source_err().sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
    }

    /// Driver message of a unique violation, e.g. `UNIQUE constraint failed: employees.email`
    pub fn unique_violation_message(&self) -> Option<String> {
        match self.source_err().sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message)) => Some(message),
            _ => None,
        }
    }
}
