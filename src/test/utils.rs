// Test utilities shared across unit tests
// Only compiled when running tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use migration::{AuditMigrator, Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, NotSet, Set};
use serde_json::Value;
use tempfile::TempDir;

use crate::app_data::AppData;
use crate::config::database::DatabaseConnections;
use crate::config::{LifecycleSettings, SecretManager};
use crate::errors::InternalError;
use crate::providers::{CodeAllocator, NotificationResult, NotificationSender, NotificationTemplate};
use crate::types::db::employee::{self, EmployeeKycStatus, EmploymentStatus};
use crate::types::db::user::UserRole;
use crate::types::internal::auth::Claims;
use crate::types::internal::context::RequestContext;

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
pub const TEST_PEPPER: &str = "test-pepper-for-unit-tests";

/// Creates migrated in-memory people and audit databases
///
/// Returns (people_db, audit_db)
pub async fn setup_test_databases() -> (DatabaseConnection, DatabaseConnection) {
    let people_db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&people_db, None)
        .await
        .expect("Failed to run people migrations");

    let audit_db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create audit database");

    AuditMigrator::up(&audit_db, None)
        .await
        .expect("Failed to run audit migrations");

    (people_db, audit_db)
}

/// Active, system-enabled employee row with the given identity
pub fn employee_row(name: &str, email: &str, code: &str) -> employee::ActiveModel {
    let now = Utc::now().timestamp();
    employee::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        employee_code: Set(code.to_string()),
        provisional_code: Set(None),
        role: Set("Employee".to_string()),
        department: Set(None),
        designation: Set(None),
        location: Set(None),
        phone: Set(None),
        status: Set(EmploymentStatus::Working),
        is_active: Set(true),
        can_access_system: Set(true),
        kyc_status: Set(EmployeeKycStatus::Pending),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

/// Authenticated API context for a caller with `role`
pub fn ctx_for(role: UserRole) -> RequestContext {
    let now = Utc::now().timestamp();
    RequestContext::for_api(None).with_claims(Claims {
        sub: format!("{}-caller", role.as_str()),
        role: role.as_str().to_string(),
        exp: now + 900,
        iat: now,
        jti: format!("jti-{}", role.as_str()),
    })
}

/// One captured notification
#[derive(Debug, Clone)]
pub struct SentNotification {
    pub to: String,
    pub template: NotificationTemplate,
    pub payload: Value,
}

/// Notification sender that records every message and can be told to fail
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<SentNotification>>,
    fail: bool,
}

impl RecordingSender {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send(&self, to: &str, template: NotificationTemplate, payload: Value) -> NotificationResult {
        self.sent.lock().unwrap().push(SentNotification {
            to: to.to_string(),
            template,
            payload,
        });

        if self.fail {
            NotificationResult::failed("relay unavailable")
        } else {
            NotificationResult::sent()
        }
    }
}

/// Code source that hands out a fixed script of codes, repeating the last one
///
/// Lets tests hand the coordinators a code that is already taken.
pub struct ScriptedAllocator {
    codes: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedAllocator {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Codes handed out so far, in order
    pub fn handed_out(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CodeAllocator for ScriptedAllocator {
    async fn allocate(&self, _prefix: &str) -> Result<String, InternalError> {
        let mut codes = self.codes.lock().unwrap();
        let code = if codes.len() > 1 {
            codes.pop_front().unwrap()
        } else {
            codes.front().cloned().unwrap()
        };
        self.calls.lock().unwrap().push(code.clone());
        Ok(code)
    }
}

/// Fully wired AppData over in-memory databases and a temporary upload directory
///
/// The TempDir must be kept alive for the duration of the test.
pub async fn setup_test_app_data(sender: Arc<RecordingSender>) -> (Arc<AppData>, TempDir) {
    let (people, audit) = setup_test_databases().await;
    let upload_dir = TempDir::new().expect("Failed to create upload dir");

    let settings = LifecycleSettings::default().with_upload_dir(upload_dir.path());
    let secret_manager = Arc::new(SecretManager::from_values(TEST_JWT_SECRET, TEST_PEPPER));

    let app_data = AppData::with_sender(
        DatabaseConnections { people, audit },
        settings,
        secret_manager,
        sender,
    );

    (Arc::new(app_data), upload_dir)
}
