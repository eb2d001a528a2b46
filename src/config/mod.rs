mod bootstrap_settings;
pub mod database;
mod env_provider;
mod errors;
mod lifecycle_settings;
mod logging;
mod secret_manager;

pub use bootstrap_settings::BootstrapSettings;
pub use env_provider::{read_parsed, EnvironmentProvider, SystemEnvironment};
#[cfg(test)]
pub use env_provider::MockEnvironment;
pub use errors::ApplicationError;
pub use lifecycle_settings::{CodeStrategy, LifecycleSettings};
pub use logging::{init_logging, LoggingError};
pub use secret_manager::SecretManager;
