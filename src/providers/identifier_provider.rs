use async_trait::async_trait;
use chrono::{Datelike, Utc};
use rand::Rng;

use crate::config::CodeStrategy;
use crate::errors::internal::EmployeeError;
use crate::errors::InternalError;
use crate::stores::EmployeeStore;

/// Random year-stamped candidates drawn before giving up
const MAX_RANDOM_DRAWS: u32 = 50;

/// Source of candidate employee codes
///
/// Coordinators insert the returned code and call again when the insert hits
/// the unique constraint, so an implementation only has to be unique at call time.
#[async_trait]
pub trait CodeAllocator: Send + Sync {
    async fn allocate(&self, prefix: &str) -> Result<String, InternalError>;
}

/// Allocates employee codes that are unique against stored codes at call time
///
/// Uniqueness is only checked, not reserved; a concurrent insert can still
/// take the same code, which callers see as a unique violation and retry.
pub struct IdentifierProvider {
    employee_store: EmployeeStore,
    strategy: CodeStrategy,
    width: usize,
}

impl IdentifierProvider {
    pub fn new(employee_store: EmployeeStore, strategy: CodeStrategy, width: usize) -> Self {
        Self {
            employee_store,
            strategy,
            width,
        }
    }

    /// Allocate the next code under `prefix`
    pub async fn allocate(&self, prefix: &str) -> Result<String, InternalError> {
        match self.strategy {
            CodeStrategy::Sequential => self.allocate_sequential(prefix).await,
            CodeStrategy::YearRandom => self.allocate_year_random(prefix).await,
        }
    }

    async fn allocate_sequential(&self, prefix: &str) -> Result<String, InternalError> {
        let next = match self.employee_store.codes_with_prefix(prefix).await {
            Ok(codes) => next_sequence_number(prefix, &codes)?,
            Err(e) => {
                tracing::warn!("Max code lookup failed, falling back to row count: {}", e);
                self.employee_store
                    .count()
                    .await?
                    .checked_add(1)
                    .ok_or(EmployeeError::CodeAllocationExhausted { attempts: 1 })?
            }
        };

        Ok(format_sequential(prefix, next, self.width))
    }

    async fn allocate_year_random(&self, prefix: &str) -> Result<String, InternalError> {
        let year = Utc::now().year();

        for _ in 0..MAX_RANDOM_DRAWS {
            let suffix: u16 = rand::rng().random_range(0..10_000);
            let candidate = format_year_random(prefix, year, suffix);
            if !self.employee_store.code_exists(&candidate).await? {
                return Ok(candidate);
            }
        }

        Err(EmployeeError::CodeAllocationExhausted {
            attempts: MAX_RANDOM_DRAWS,
        }
        .into())
    }
}

#[async_trait]
impl CodeAllocator for IdentifierProvider {
    async fn allocate(&self, prefix: &str) -> Result<String, InternalError> {
        IdentifierProvider::allocate(self, prefix).await
    }
}

/// One past the highest numeric suffix among codes of the form `{prefix}{digits}`
///
/// Legacy free-form codes that share the prefix but carry non-digit
/// suffixes are ignored. A suffix already at `u64::MAX` leaves no next
/// number and is reported as exhausted allocation.
pub fn next_sequence_number(prefix: &str, codes: &[String]) -> Result<u64, InternalError> {
    let highest = codes
        .iter()
        .filter_map(|code| code.strip_prefix(prefix))
        .filter(|suffix| !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .unwrap_or(0);

    highest
        .checked_add(1)
        .ok_or_else(|| EmployeeError::CodeAllocationExhausted { attempts: 1 }.into())
}

pub fn format_sequential(prefix: &str, n: u64, width: usize) -> String {
    format!("{}{:0width$}", prefix, n, width = width)
}

pub fn format_year_random(prefix: &str, year: i32, suffix: u16) -> String {
    format!("{}{}{:04}", prefix, year, suffix)
}
