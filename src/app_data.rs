use std::sync::Arc;

use crate::audit::AuditLogger;
use crate::config::database::DatabaseConnections;
use crate::config::{LifecycleSettings, SecretManager};
use crate::errors::InternalError;
use crate::providers::{
    CryptoProvider, DocumentProvider, HttpNotificationSender, LogNotificationSender, NotificationSender,
    TokenProvider,
};
use crate::stores::{AuditStore, EmployeeStore, KycStore, UserStore};

/// Centralized application data following the main-owned stores pattern
///
/// Everything here is created once in `main` and shared by the coordinators,
/// which build their own providers from it.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init()
///   ├─ connections (people + audit DatabaseConnection)
///   ├─ settings, secret_manager
///   ├─ audit_store → audit_logger
///   ├─ employee_store, user_store, kyc_store
///   └─ crypto, documents, notifications, tokens
///   ↓ wrapped in Arc<AppData>
///   ├─ EmployeeCoordinator::new(app_data)
///   └─ KycCoordinator::new(app_data)
/// ```
pub struct AppData {
    pub connections: DatabaseConnections,
    pub settings: Arc<LifecycleSettings>,
    pub secret_manager: Arc<SecretManager>,
    pub audit_store: Arc<AuditStore>,
    pub audit_logger: Arc<AuditLogger>,
    pub employee_store: EmployeeStore,
    pub user_store: UserStore,
    pub kyc_store: KycStore,
    pub crypto_provider: Arc<CryptoProvider>,
    pub document_provider: Arc<DocumentProvider>,
    pub notification_sender: Arc<dyn NotificationSender>,
    pub token_provider: Arc<TokenProvider>,
}

impl AppData {
    /// Build application data, picking the notification sender from settings
    ///
    /// Database connections should be initialized and migrated before calling this.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` when the HTTP notification client cannot be built
    pub fn init(
        connections: DatabaseConnections,
        settings: LifecycleSettings,
        secret_manager: Arc<SecretManager>,
    ) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        let notification_sender: Arc<dyn NotificationSender> = match settings.notification_url() {
            Some(url) => {
                tracing::info!("Notifications will be posted to {}", url);
                Arc::new(
                    HttpNotificationSender::new(url, settings.notification_from())
                        .map_err(|e| InternalError::parse("notification_client", e.to_string()))?,
                )
            }
            None => {
                tracing::info!("NOTIFICATION_URL not set; notifications are logged only");
                Arc::new(LogNotificationSender)
            }
        };

        let app_data = Self::with_sender(connections, settings, secret_manager, notification_sender);

        tracing::info!("AppData initialization complete");

        Ok(app_data)
    }

    /// Build application data around an explicit notification sender
    pub fn with_sender(
        connections: DatabaseConnections,
        settings: LifecycleSettings,
        secret_manager: Arc<SecretManager>,
        notification_sender: Arc<dyn NotificationSender>,
    ) -> Self {
        let people_db = connections.people.clone();
        let audit_db = connections.audit.clone();

        let audit_store = Arc::new(AuditStore::new(audit_db));
        let audit_logger = Arc::new(AuditLogger::new(audit_store.clone()));

        let crypto_provider = Arc::new(CryptoProvider::new(secret_manager.password_pepper()));
        let document_provider = Arc::new(DocumentProvider::new(
            settings.upload_dir(),
            settings.max_upload_bytes(),
        ));
        let token_provider = Arc::new(TokenProvider::new(secret_manager.clone()));

        Self {
            employee_store: EmployeeStore::new(people_db.clone()),
            user_store: UserStore::new(people_db.clone()),
            kyc_store: KycStore::new(people_db),
            connections,
            settings: Arc::new(settings),
            secret_manager,
            audit_store,
            audit_logger,
            crypto_provider,
            document_provider,
            notification_sender,
            token_provider,
        }
    }
}
