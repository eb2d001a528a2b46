use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::errors::ApplicationError;
use crate::config::{read_parsed, EnvironmentProvider};

const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// How employee codes are generated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeStrategy {
    /// `{prefix}{n}` with `n` one past the highest existing suffix
    Sequential,
    /// `{prefix}{year}{4 random digits}`
    YearRandom,
}

impl FromStr for CodeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "year_random" | "year-random" => Ok(Self::YearRandom),
            other => Err(format!(
                "unknown strategy '{}', expected 'sequential' or 'year_random'",
                other
            )),
        }
    }
}

impl fmt::Display for CodeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::YearRandom => write!(f, "year_random"),
        }
    }
}

/// Settings that shape the employee lifecycle
#[derive(Debug, Clone)]
pub struct LifecycleSettings {
    code_strategy: CodeStrategy,
    provisional_code_prefix: String,
    permanent_code_prefix: String,
    code_width: usize,
    allocation_attempts: u32,
    upload_dir: PathBuf,
    max_upload_bytes: u64,
    notification_url: Option<String>,
    notification_from: String,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            code_strategy: CodeStrategy::Sequential,
            provisional_code_prefix: "TMP".to_string(),
            permanent_code_prefix: "EMP".to_string(),
            code_width: 4,
            allocation_attempts: 5,
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            notification_url: None,
            notification_from: "no-reply@staffdesk.local".to_string(),
        }
    }
}

impl LifecycleSettings {
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, ApplicationError> {
        let defaults = Self::default();

        let code_strategy = read_parsed(env, "EMPLOYEE_CODE_STRATEGY", defaults.code_strategy)?;
        let provisional_code_prefix = Self::prefix(env, "PROVISIONAL_CODE_PREFIX", defaults.provisional_code_prefix)?;
        let permanent_code_prefix = Self::prefix(env, "PERMANENT_CODE_PREFIX", defaults.permanent_code_prefix)?;

        if provisional_code_prefix == permanent_code_prefix {
            return Err(ApplicationError::invalid_setting(
                "PERMANENT_CODE_PREFIX",
                "must differ from PROVISIONAL_CODE_PREFIX",
            ));
        }

        let code_width: usize = read_parsed(env, "EMPLOYEE_CODE_WIDTH", defaults.code_width)?;
        if !(1..=9).contains(&code_width) {
            return Err(ApplicationError::invalid_setting("EMPLOYEE_CODE_WIDTH", "must be between 1 and 9"));
        }

        let allocation_attempts: u32 = read_parsed(env, "CODE_ALLOCATION_ATTEMPTS", defaults.allocation_attempts)?;
        if allocation_attempts == 0 {
            return Err(ApplicationError::invalid_setting("CODE_ALLOCATION_ATTEMPTS", "must be at least 1"));
        }

        let upload_dir = env
            .get_non_empty("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.upload_dir);

        let max_upload_bytes: u64 = read_parsed(env, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?;
        if max_upload_bytes == 0 {
            return Err(ApplicationError::invalid_setting("MAX_UPLOAD_BYTES", "must be greater than zero"));
        }

        let notification_url = env.get_non_empty("NOTIFICATION_URL");
        let notification_from = env
            .get_non_empty("NOTIFICATION_FROM")
            .unwrap_or(defaults.notification_from);

        Ok(Self {
            code_strategy,
            provisional_code_prefix,
            permanent_code_prefix,
            code_width,
            allocation_attempts,
            upload_dir,
            max_upload_bytes,
            notification_url,
            notification_from,
        })
    }

    pub fn from_env() -> Result<Self, ApplicationError> {
        use crate::config::SystemEnvironment;
        Self::from_env_provider(&SystemEnvironment)
    }

    fn prefix(env: &dyn EnvironmentProvider, key: &str, default: String) -> Result<String, ApplicationError> {
        let value = env.get_non_empty(key).unwrap_or(default).to_ascii_uppercase();
        if value.len() > 8 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ApplicationError::invalid_setting(key, "must be 1 to 8 ASCII letters"));
        }
        Ok(value)
    }

    pub fn with_upload_dir(mut self, upload_dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = upload_dir.into();
        self
    }

    pub fn with_code_strategy(mut self, code_strategy: CodeStrategy) -> Self {
        self.code_strategy = code_strategy;
        self
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: u64) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    pub fn code_strategy(&self) -> CodeStrategy {
        self.code_strategy
    }

    pub fn provisional_code_prefix(&self) -> &str {
        &self.provisional_code_prefix
    }

    pub fn permanent_code_prefix(&self) -> &str {
        &self.permanent_code_prefix
    }

    pub fn code_width(&self) -> usize {
        self.code_width
    }

    pub fn allocation_attempts(&self) -> u32 {
        self.allocation_attempts
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    pub fn notification_url(&self) -> Option<&str> {
        self.notification_url.as_deref()
    }

    pub fn notification_from(&self) -> &str {
        &self.notification_from
    }
}
