mod common;

use poem::http::StatusCode;
use poem::test::{TestForm, TestFormField};
use serde_json::json;

use common::TestHarness;
use staffdesk_backend::providers::NotificationTemplate;
use staffdesk_backend::types::db::user::UserRole;

fn photo_form(full_name: &str, code: Option<&str>) -> TestForm {
    let mut form = TestForm::new().field(TestFormField::text(full_name).name("full_name"));
    if let Some(code) = code {
        form = form.field(TestFormField::text(code).name("employee_code"));
    }
    form.field(TestFormField::text("Bengaluru").name("address"))
        .field(
            TestFormField::bytes(vec![0x89, 0x50, 0x4e, 0x47])
                .name("photo")
                .filename("me.png")
                .content_type("image/png"),
        )
        .field(
            TestFormField::bytes(b"plain text".to_vec())
                .name("pan_card")
                .filename("pan.txt")
                .content_type("text/plain"),
        )
}

#[tokio::test]
async fn test_health() {
    let harness = TestHarness::new().await;

    let resp = harness.client().get("/api/health").send().await;

    resp.assert_status_is_ok();
    let json = resp.json().await;
    let body = json.value().object();
    body.get("status").assert_string("healthy");
    body.get("service").assert_string("staffdesk-backend");
    assert!(body.get("checked_at").i64() > 0);
}

#[tokio::test]
async fn test_onboarding_to_approval() {
    let harness = TestHarness::new().await;
    let client = harness.client();

    // Create
    let resp = client
        .post("/api/employees")
        .header("Authorization", harness.bearer(UserRole::Admin))
        .body_json(&json!({ "name": "asha", "email": "asha@x.co" }))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);
    let body = resp.json().await;
    let created = body.value().object();
    let employee = created.get("employee").object();
    employee.get("employee_code").assert_string("TMP0001");
    employee.get("name").assert_string("ASHA");
    employee.get("kyc_status").assert_string("pending");
    created.get("notification").assert_string("sent");
    assert_eq!(created.get("temp_password").string().len(), 20);
    let employee_id = employee.get("id").i64();

    let login = harness
        .app_data
        .user_store
        .find_by_email("asha@x.co")
        .await
        .unwrap()
        .expect("user row");
    assert!(login.active);
    assert!(login.must_change_password);

    // Submit
    let resp = client
        .post("/api/kyc")
        .header("Authorization", harness.bearer(UserRole::Employee))
        .multipart(photo_form("Asha", Some("TMP0001")))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);
    let body = resp.json().await;
    let submitted = body.value().object();
    submitted.get("matched_by").assert_string("code");
    submitted.get("rejected_files").array().assert_len(1);
    let submission = submitted.get("submission").object();
    submission.get("status").assert_string("pending");
    submission.get("employee_id").assert_string("TMP0001");
    submission.get("documents").array().assert_len(1);
    let kyc_id = submission.get("id").i64();

    // Review
    let resp = client
        .put(format!("/api/kyc/{}/review", kyc_id))
        .header("Authorization", harness.bearer(UserRole::Hr))
        .body_json(&json!({ "status": "approved", "remarks": "all good" }))
        .send()
        .await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    let reviewed = body.value().object();
    reviewed.get("permanent_code").assert_string("EMP0001");
    reviewed.get("submission").object().get("status").assert_string("approved");
    reviewed.get("submission").object().get("reviewed_by").assert_string("hr-tester");

    // Employee now carries the permanent code
    let resp = client
        .get(format!("/api/employees/{}", employee_id))
        .header("Authorization", harness.bearer(UserRole::Manager))
        .send()
        .await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    let employee = body.value().object();
    employee.get("employee_code").assert_string("EMP0001");
    employee.get("provisional_code").assert_string("TMP0001");
    employee.get("kyc_status").assert_string("approved");

    assert_eq!(
        harness.sender.templates(),
        vec![NotificationTemplate::NewEmployee, NotificationTemplate::KycApproved]
    );
    let payload = harness.sender.last_payload().unwrap();
    assert_eq!(payload["password"], "your set password");
}

#[tokio::test]
async fn test_missing_and_invalid_tokens_are_unauthorized() {
    let harness = TestHarness::new().await;
    let client = harness.client();

    let missing = client
        .post("/api/employees")
        .body_json(&json!({ "name": "asha", "email": "asha@x.co" }))
        .send()
        .await;
    let invalid = client
        .post("/api/employees")
        .header("Authorization", "Bearer not-a-token")
        .body_json(&json!({ "name": "asha", "email": "asha@x.co" }))
        .send()
        .await;

    missing.assert_status(StatusCode::UNAUTHORIZED);
    invalid.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(harness.app_data.employee_store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_error_statuses() {
    let harness = TestHarness::new().await;
    let client = harness.client();
    let admin = harness.bearer(UserRole::Admin);

    let forbidden = client
        .post("/api/employees")
        .header("Authorization", harness.bearer(UserRole::Employee))
        .body_json(&json!({ "name": "asha", "email": "asha@x.co" }))
        .send()
        .await;
    forbidden.assert_status(StatusCode::FORBIDDEN);

    let invalid_email = client
        .post("/api/employees")
        .header("Authorization", admin.clone())
        .body_json(&json!({ "name": "asha", "email": "nope" }))
        .send()
        .await;
    invalid_email.assert_status(StatusCode::BAD_REQUEST);

    client
        .post("/api/employees")
        .header("Authorization", admin.clone())
        .body_json(&json!({ "name": "asha", "email": "asha@x.co" }))
        .send()
        .await
        .assert_status(StatusCode::CREATED);
    let duplicate = client
        .post("/api/employees")
        .header("Authorization", admin.clone())
        .body_json(&json!({ "name": "other", "email": "ASHA@x.co" }))
        .send()
        .await;
    duplicate.assert_status(StatusCode::BAD_REQUEST);
    duplicate.json().await.value().object().get("retryable").assert_bool(false);

    let not_found = client
        .get("/api/employees/999")
        .header("Authorization", admin.clone())
        .send()
        .await;
    not_found.assert_status(StatusCode::NOT_FOUND);

    let review_missing = client
        .put("/api/kyc/999/review")
        .header("Authorization", admin)
        .body_json(&json!({ "status": "rejected" }))
        .send()
        .await;
    review_missing.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_resubmission_rules_over_http() {
    let harness = TestHarness::new().await;
    let client = harness.client();
    let employee = harness.bearer(UserRole::Employee);
    let hr = harness.bearer(UserRole::Hr);

    client
        .post("/api/employees")
        .header("Authorization", harness.bearer(UserRole::Admin))
        .body_json(&json!({ "name": "asha", "email": "asha@x.co" }))
        .send()
        .await
        .assert_status(StatusCode::CREATED);

    let first = client
        .post("/api/kyc")
        .header("Authorization", employee.clone())
        .multipart(photo_form("asha", None))
        .send()
        .await;
    first.assert_status(StatusCode::CREATED);
    let first_id = first.json().await.value().object().get("submission").object().get("id").i64();

    let blocked = client
        .post("/api/kyc")
        .header("Authorization", employee.clone())
        .multipart(photo_form("asha", None))
        .send()
        .await;
    blocked.assert_status(StatusCode::BAD_REQUEST);

    client
        .put(format!("/api/kyc/{}/review", first_id))
        .header("Authorization", hr.clone())
        .body_json(&json!({
            "status": "rejected",
            "documents": [{ "type": "photo", "status": "rejected", "remark": "blurry" }]
        }))
        .send()
        .await
        .assert_status_is_ok();

    let second = client
        .post("/api/kyc")
        .header("Authorization", employee)
        .multipart(photo_form("asha", None))
        .send()
        .await;
    second.assert_status(StatusCode::CREATED);

    // The rejected row is left as it was
    let old = client
        .get(format!("/api/kyc/{}", first_id))
        .header("Authorization", hr)
        .send()
        .await;
    old.assert_status_is_ok();
    let body = old.json().await;
    let old = body.value().object();
    old.get("status").assert_string("rejected");
    let documents = old.get("documents").array();
    documents.get(0).object().get("review_status").assert_string("rejected");
    documents.get(0).object().get("remark").assert_string("blurry");
}

#[tokio::test]
async fn test_oversized_kyc_body_is_refused_before_parsing() {
    let harness = TestHarness::new().await;

    let resp = harness
        .client()
        .post("/api/kyc")
        .header("Authorization", harness.bearer(UserRole::Employee))
        .header("content-type", "multipart/form-data; boundary=X")
        .header("content-length", 512 * 1024 * 1024)
        .body(&b"--X--"[..])
        .send()
        .await;

    resp.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}
