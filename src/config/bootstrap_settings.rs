use std::fmt;

use crate::config::errors::ApplicationError;
use crate::config::{read_parsed, EnvironmentProvider};

/// Bootstrap settings for infrastructure configuration
pub struct BootstrapSettings {
    database_url: String,
    audit_database_url: String,
    server_host: String,
    server_port: u16,
}

impl BootstrapSettings {
    /// Load bootstrap settings from the given environment provider
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, ApplicationError> {
        let database_url = env
            .get_non_empty("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://staffdesk.db?mode=rwc".to_string());
        let audit_database_url = env
            .get_non_empty("AUDIT_DATABASE_URL")
            .unwrap_or_else(|| "sqlite://staffdesk_audit.db?mode=rwc".to_string());
        let server_host = env
            .get_non_empty("HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string());

        if server_host.parse::<std::net::IpAddr>().is_err() && server_host != "localhost" {
            return Err(ApplicationError::invalid_setting(
                "HOST",
                format!("'{}' is not an IP address", server_host),
            ));
        }

        let server_port: u16 = read_parsed(env, "PORT", 3000)?;
        if server_port == 0 {
            return Err(ApplicationError::invalid_setting("PORT", "port must be between 1 and 65535"));
        }

        Ok(Self {
            database_url,
            audit_database_url,
            server_host,
            server_port,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ApplicationError> {
        use crate::config::SystemEnvironment;
        Self::from_env_provider(&SystemEnvironment)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn audit_database_url(&self) -> &str {
        &self.audit_database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSettings")
            .field("database_url", &self.database_url)
            .field("audit_database_url", &self.audit_database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}
