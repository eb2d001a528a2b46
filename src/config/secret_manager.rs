use std::fmt;

use crate::config::errors::ApplicationError;
use crate::config::EnvironmentProvider;

const JWT_SECRET_MIN_LENGTH: usize = 32;
const PEPPER_MIN_LENGTH: usize = 16;

/// Centralized manager for application secrets
pub struct SecretManager {
    jwt_secret: String,
    password_pepper: String,
}

impl SecretManager {
    /// Load and validate all secrets from the given provider
    ///
    /// # Errors
    /// Returns `ApplicationError` if a secret is missing or too short
    pub fn init_from(env: &dyn EnvironmentProvider) -> Result<Self, ApplicationError> {
        let jwt_secret = Self::load_secret(env, "JWT_SECRET", JWT_SECRET_MIN_LENGTH)?;
        let password_pepper = Self::load_secret(env, "PASSWORD_PEPPER", PEPPER_MIN_LENGTH)?;

        Ok(Self {
            jwt_secret,
            password_pepper,
        })
    }

    pub fn init() -> Result<Self, ApplicationError> {
        use crate::config::SystemEnvironment;
        Self::init_from(&SystemEnvironment)
    }

    /// Build a manager from literal values, used by tests and tooling
    pub fn from_values(jwt_secret: &str, password_pepper: &str) -> Self {
        Self {
            jwt_secret: jwt_secret.to_string(),
            password_pepper: password_pepper.to_string(),
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    fn load_secret(env: &dyn EnvironmentProvider, name: &str, min_length: usize) -> Result<String, ApplicationError> {
        let value = env.get_var(name).ok_or_else(|| ApplicationError::MissingSecret {
            secret_name: name.to_string(),
        })?;

        if value.len() < min_length {
            return Err(ApplicationError::SecretTooShort {
                secret_name: name.to_string(),
                expected: min_length,
                actual: value.len(),
            });
        }

        Ok(value)
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"[REDACTED]")
            .field("password_pepper", &"[REDACTED]")
            .finish()
    }
}
