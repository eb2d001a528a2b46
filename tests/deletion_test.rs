mod common;

use chrono::Utc;
use poem::http::StatusCode;
use sea_orm::{ActiveModelTrait, EntityTrait, NotSet, Set};
use serde_json::json;

use common::TestHarness;
use staffdesk_backend::types::db::{attendance, kyc_submission, leave, payslip};
use staffdesk_backend::types::db::employee::EmploymentStatus;
use staffdesk_backend::types::db::kyc_submission::KycStatus;
use staffdesk_backend::types::db::user::UserRole;
use staffdesk_backend::types::internal::kyc::{DocumentType, KycDocuments, StoredDocument};

/// Creates asha@x.co over HTTP and seeds one row in every dependent table
///
/// The KYC row references one file on disk and one that does not exist.
async fn seed(harness: &TestHarness) -> i64 {
    let resp = harness
        .client()
        .post("/api/employees")
        .header("Authorization", harness.bearer(UserRole::Admin))
        .body_json(&json!({ "name": "asha", "email": "asha@x.co" }))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);
    let body = resp.json().await;
    let employee = body.value().object().get("employee").object();
    let employee_id = employee.get("id").i64();

    let db = &harness.app_data.connections.people;
    let present = harness.uploads.path().join("photo.png");
    std::fs::write(&present, b"png").unwrap();
    let documents = KycDocuments {
        files: vec![
            StoredDocument {
                doc_type: DocumentType::Photo,
                path: present.to_string_lossy().into_owned(),
                original_name: "photo.png".to_string(),
            },
            StoredDocument {
                doc_type: DocumentType::AadhaarFront,
                path: harness.uploads.path().join("gone.pdf").to_string_lossy().into_owned(),
                original_name: "aadhaar.pdf".to_string(),
            },
        ],
        ..Default::default()
    };

    let now = Utc::now().timestamp();
    kyc_submission::ActiveModel {
        id: NotSet,
        employee_id: Set("TMP0001".to_string()),
        full_name: Set("ASHA".to_string()),
        email: Set(Some("asha@x.co".to_string())),
        status: Set(KycStatus::Pending),
        documents: Set(serde_json::to_string(&documents).unwrap()),
        document_reviews: Set("{}".to_string()),
        remarks: Set(None),
        reviewed_by: Set(None),
        reviewed_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();

    for date in ["2025-03-01", "2025-03-02"] {
        attendance::ActiveModel {
            id: NotSet,
            email: Set("asha@x.co".to_string()),
            date: Set(date.to_string()),
            check_in: Set(None),
            check_out: Set(None),
        }
        .insert(db)
        .await
        .unwrap();
    }

    leave::ActiveModel {
        id: NotSet,
        email: Set("asha@x.co".to_string()),
        leave_type: Set("casual".to_string()),
        start_date: Set("2025-03-10".to_string()),
        end_date: Set("2025-03-11".to_string()),
        status: Set("pending".to_string()),
        attachment_path: Set(None),
    }
    .insert(db)
    .await
    .unwrap();

    payslip::ActiveModel {
        id: NotSet,
        employee_id: Set(Some(employee_id as i32)),
        email: Set(Some("asha@x.co".to_string())),
        period: Set("2025-02".to_string()),
        net_pay_cents: Set(100),
    }
    .insert(db)
    .await
    .unwrap();

    employee_id
}

#[tokio::test]
async fn test_hard_delete_removes_rows_despite_missing_file() {
    let harness = TestHarness::new().await;
    let employee_id = seed(&harness).await;

    let resp = harness
        .client()
        .delete(format!("/api/employees/{}", employee_id))
        .header("Authorization", harness.bearer(UserRole::Admin))
        .send()
        .await;

    resp.assert_status_is_ok();
    let body = resp.json().await;
    let outcome = body.value().object();
    outcome.get("deletion_type").assert_string("permanent");
    let summary = outcome.get("summary").object();
    summary.get("kyc_submissions").assert_i64(1);
    summary.get("attendance").assert_i64(2);
    summary.get("leaves").assert_i64(1);
    summary.get("payslips").assert_i64(1);
    summary.get("users").assert_i64(1);
    summary.get("employees").assert_i64(1);
    summary.get("files_removed").assert_i64(1);
    summary.get("files_missing").assert_i64(1);

    let db = &harness.app_data.connections.people;
    assert!(kyc_submission::Entity::find().all(db).await.unwrap().is_empty());
    assert!(attendance::Entity::find().all(db).await.unwrap().is_empty());
    assert!(leave::Entity::find().all(db).await.unwrap().is_empty());
    assert!(payslip::Entity::find().all(db).await.unwrap().is_empty());
    assert!(harness.app_data.user_store.find_by_email("asha@x.co").await.unwrap().is_none());
    assert!(harness.app_data.employee_store.find_by_id(employee_id as i32).await.unwrap().is_none());
}

#[tokio::test]
async fn test_soft_delete_leaves_dependents_untouched() {
    let harness = TestHarness::new().await;
    let employee_id = seed(&harness).await;

    let resp = harness
        .client()
        .delete(format!("/api/employees/{}", employee_id))
        .header("Authorization", harness.bearer(UserRole::Hr))
        .send()
        .await;

    resp.assert_status_is_ok();
    resp.json().await.value().object().get("deletion_type").assert_string("soft");

    let db = &harness.app_data.connections.people;
    assert_eq!(kyc_submission::Entity::find().all(db).await.unwrap().len(), 1);
    assert_eq!(attendance::Entity::find().all(db).await.unwrap().len(), 2);
    assert_eq!(leave::Entity::find().all(db).await.unwrap().len(), 1);
    assert_eq!(payslip::Entity::find().all(db).await.unwrap().len(), 1);
    assert!(harness.uploads.path().join("photo.png").exists());

    let employee = harness
        .app_data
        .employee_store
        .find_by_id(employee_id as i32)
        .await
        .unwrap()
        .unwrap();
    assert!(!employee.is_active);
    assert_eq!(employee.status, EmploymentStatus::NotWorking);

    let login = harness.app_data.user_store.find_by_email("asha@x.co").await.unwrap().unwrap();
    assert!(!login.active);
}

#[tokio::test]
async fn test_manager_cannot_delete() {
    let harness = TestHarness::new().await;
    let employee_id = seed(&harness).await;

    let resp = harness
        .client()
        .delete(format!("/api/employees/{}", employee_id))
        .header("Authorization", harness.bearer(UserRole::Manager))
        .send()
        .await;

    resp.assert_status(StatusCode::FORBIDDEN);
    assert!(harness.app_data.employee_store.find_by_id(employee_id as i32).await.unwrap().is_some());
}
