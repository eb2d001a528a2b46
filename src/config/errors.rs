use thiserror::Error;

/// Startup failures: bad environment values or missing secrets
///
/// These stop the process before the server binds, so they never reach
/// an HTTP response.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Invalid setting '{setting_name}': {reason}")]
    InvalidSetting { setting_name: String, reason: String },

    #[error("Could not parse setting '{setting_name}': {error}")]
    ParseError { setting_name: String, error: String },

    #[error("Required secret '{secret_name}' is not set")]
    MissingSecret { secret_name: String },

    #[error("Secret '{secret_name}' needs at least {expected} characters, got {actual}")]
    SecretTooShort { secret_name: String, expected: usize, actual: usize },
}

impl ApplicationError {
    pub fn invalid_setting(setting_name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            setting_name: setting_name.to_string(),
            reason: reason.into(),
        }
    }
}
