// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use migration::{AuditMigrator, Migrator, MigratorTrait};
use poem::test::TestClient;
use poem::{Endpoint, EndpointExt, Route};
use poem_openapi::OpenApiService;
use sea_orm::{Database, DatabaseConnection};
use serde_json::Value;
use tempfile::TempDir;

use staffdesk_backend::api::{BodyLimit, EmployeeApi, HealthApi, KycApi};
use staffdesk_backend::config::database::DatabaseConnections;
use staffdesk_backend::config::{LifecycleSettings, SecretManager};
use staffdesk_backend::providers::{NotificationResult, NotificationSender, NotificationTemplate, TokenProvider};
use staffdesk_backend::types::db::user::UserRole;
use staffdesk_backend::AppData;

pub const JWT_SECRET: &str = "integration-secret-key-minimum-32-chars";
pub const PEPPER: &str = "integration-pepper-value";

/// Creates a migrated in-memory database
pub async fn setup_test_db<M: MigratorTrait>() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    M::up(&db, None).await.expect("Failed to run migrations");

    db
}

/// Captures every notification the lifecycle sends
#[derive(Default)]
pub struct CapturingSender {
    pub sent: Mutex<Vec<(String, NotificationTemplate, Value)>>,
}

impl CapturingSender {
    pub fn templates(&self) -> Vec<NotificationTemplate> {
        self.sent.lock().unwrap().iter().map(|(_, t, _)| *t).collect()
    }

    pub fn last_payload(&self) -> Option<Value> {
        self.sent.lock().unwrap().last().map(|(_, _, p)| p.clone())
    }
}

#[async_trait]
impl NotificationSender for CapturingSender {
    async fn send(&self, to: &str, template: NotificationTemplate, payload: Value) -> NotificationResult {
        self.sent.lock().unwrap().push((to.to_string(), template, payload));
        NotificationResult::sent()
    }
}

/// Everything a test needs to drive the lifecycle end to end
pub struct TestHarness {
    pub app_data: Arc<AppData>,
    pub sender: Arc<CapturingSender>,
    pub uploads: TempDir,
    tokens: TokenProvider,
}

impl TestHarness {
    pub async fn new() -> Self {
        let people = setup_test_db::<Migrator>().await;
        let audit = setup_test_db::<AuditMigrator>().await;
        let uploads = TempDir::new().expect("Failed to create upload dir");
        let sender = Arc::new(CapturingSender::default());
        let secret_manager = Arc::new(SecretManager::from_values(JWT_SECRET, PEPPER));

        let app_data = Arc::new(AppData::with_sender(
            DatabaseConnections { people, audit },
            LifecycleSettings::default().with_upload_dir(uploads.path()),
            secret_manager.clone(),
            sender.clone(),
        ));

        Self {
            app_data,
            sender,
            uploads,
            tokens: TokenProvider::new(secret_manager),
        }
    }

    /// Bearer header value for a caller with `role`
    pub fn bearer(&self, role: UserRole) -> String {
        let (token, _) = self
            .tokens
            .issue_token(&format!("{}-tester", role.as_str()), role, 15)
            .expect("Failed to issue token");
        format!("Bearer {}", token)
    }

    pub fn client(&self) -> TestClient<impl Endpoint> {
        let api_service = OpenApiService::new(
            (
                HealthApi,
                EmployeeApi::new(self.app_data.clone()),
                KycApi::new(self.app_data.clone()),
            ),
            "Staffdesk API",
            "test",
        );
        let body_limit = BodyLimit::for_uploads(&self.app_data.settings);
        TestClient::new(Route::new().nest("/", api_service.with(body_limit)))
    }
}
