use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, NotSet, Set};

use crate::coordinators::EmployeeCoordinator;
use crate::errors::internal::{EmployeeError, TokenError};
use crate::errors::{ErrorKind, InternalError};
use crate::providers::NotificationTemplate;
use crate::test::utils::{ctx_for, employee_row, setup_test_app_data, RecordingSender, ScriptedAllocator};
use crate::types::db::employee::EmploymentStatus;
use crate::types::db::kyc_submission::{self, KycStatus};
use crate::types::db::user::UserRole;
use crate::types::db::{attendance, audit_event, leave, payslip, user};
use crate::types::internal::context::RequestContext;
use crate::types::internal::deletion::{DeletionStep, DeletionType};
use crate::types::internal::kyc::{DocumentType, KycDocuments, StoredDocument};
use crate::types::internal::lifecycle::{EmployeeChanges, NewEmployee, NotificationState};

fn new_employee(name: &str, email: &str) -> NewEmployee {
    NewEmployee {
        name: name.to_string(),
        email: email.to_string(),
        role: Some("Developer".to_string()),
        department: Some("Engineering".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_employee_allocates_provisional_code_and_credentials() {
    let sender = Arc::new(RecordingSender::default());
    let (app_data, _uploads) = setup_test_app_data(sender.clone()).await;
    let coordinator = EmployeeCoordinator::new(app_data.clone());

    let created = coordinator
        .create_employee(&ctx_for(UserRole::Admin), new_employee("  Asha Rao ", "Asha@X.co"))
        .await
        .unwrap();

    assert_eq!(created.employee.name, "ASHA RAO");
    assert_eq!(created.employee.email, "asha@x.co");
    assert_eq!(created.employee.employee_code, "TMP0001");
    assert_eq!(created.employee.provisional_code.as_deref(), Some("TMP0001"));
    assert_eq!(created.notification, NotificationState::Sent);
    assert!(created.warnings.is_empty());

    let temp_password = created.temp_password.expect("temporary password");
    assert_eq!(temp_password.len(), 20);

    let login = user::Entity::find().one(&app_data.connections.people).await.unwrap().unwrap();
    assert_eq!(login.email, "asha@x.co");
    assert_eq!(login.role, UserRole::Employee);
    assert!(login.must_change_password);
    assert!(app_data.crypto_provider.verify_password(&temp_password, &login.password_hash).unwrap());

    let sent = sender.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "asha@x.co");
    assert_eq!(sent[0].template, NotificationTemplate::NewEmployee);
    assert_eq!(sent[0].payload["temp_password"], temp_password.as_str());
    assert_eq!(sent[0].payload["employee_code"], "TMP0001");

    let events = audit_event::Entity::find().all(&app_data.connections.audit).await.unwrap();
    assert!(events.iter().any(|e| e.event_type == "employee_created" && e.actor_id == "admin-caller"));
}

#[tokio::test]
async fn test_sequential_codes_increase() {
    let (app_data, _uploads) = setup_test_app_data(Arc::new(RecordingSender::default())).await;
    let coordinator = EmployeeCoordinator::new(app_data);
    let ctx = ctx_for(UserRole::Hr);

    let first = coordinator.create_employee(&ctx, new_employee("Asha", "asha@x.co")).await.unwrap();
    let second = coordinator.create_employee(&ctx, new_employee("Ravi", "ravi@x.co")).await.unwrap();

    assert_eq!(first.employee.employee_code, "TMP0001");
    assert_eq!(second.employee.employee_code, "TMP0002");
}

#[tokio::test]
async fn test_taken_code_is_retried_with_a_fresh_one() {
    let (app_data, _uploads) = setup_test_app_data(Arc::new(RecordingSender::default())).await;
    app_data
        .employee_store
        .insert(employee_row("RAVI", "ravi@x.co", "TMP0001"))
        .await
        .unwrap();
    let allocator = Arc::new(ScriptedAllocator::new(&["TMP0001", "TMP0002"]));
    let coordinator = EmployeeCoordinator::new(app_data.clone()).with_code_allocator(allocator.clone());

    let created = coordinator
        .create_employee(&ctx_for(UserRole::Hr), new_employee("Asha", "asha@x.co"))
        .await
        .unwrap();

    assert_eq!(created.employee.employee_code, "TMP0002");
    assert_eq!(allocator.handed_out(), vec!["TMP0001".to_string(), "TMP0002".to_string()]);
    assert_eq!(app_data.employee_store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_code_collisions_past_attempt_limit_are_a_conflict() {
    let (app_data, _uploads) = setup_test_app_data(Arc::new(RecordingSender::default())).await;
    app_data
        .employee_store
        .insert(employee_row("RAVI", "ravi@x.co", "TMP0001"))
        .await
        .unwrap();
    let allocator = Arc::new(ScriptedAllocator::new(&["TMP0001"]));
    let coordinator = EmployeeCoordinator::new(app_data.clone()).with_code_allocator(allocator.clone());

    let err = coordinator
        .create_employee(&ctx_for(UserRole::Admin), new_employee("Asha", "asha@x.co"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InternalError::Employee(EmployeeError::CodeAllocationExhausted { attempts: 5 })
    ));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(allocator.handed_out().len(), 5);
    assert_eq!(app_data.employee_store.count().await.unwrap(), 1);
    assert!(app_data.user_store.find_by_email("asha@x.co").await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_employee_rejects_duplicate_email_before_writing() {
    let (app_data, _uploads) = setup_test_app_data(Arc::new(RecordingSender::default())).await;
    let coordinator = EmployeeCoordinator::new(app_data.clone());
    let ctx = ctx_for(UserRole::Admin);
    coordinator.create_employee(&ctx, new_employee("Asha", "asha@x.co")).await.unwrap();

    let err = coordinator
        .create_employee(&ctx, new_employee("Another Asha", "ASHA@x.co"))
        .await
        .unwrap_err();

    assert!(matches!(err, InternalError::Employee(EmployeeError::DuplicateEmail { .. })));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(app_data.employee_store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_employee_validates_input() {
    let (app_data, _uploads) = setup_test_app_data(Arc::new(RecordingSender::default())).await;
    let coordinator = EmployeeCoordinator::new(app_data.clone());
    let ctx = ctx_for(UserRole::Admin);

    let blank_name = coordinator.create_employee(&ctx, new_employee("   ", "asha@x.co")).await.unwrap_err();
    let bad_email = coordinator.create_employee(&ctx, new_employee("Asha", "not-an-email")).await.unwrap_err();

    assert!(matches!(blank_name, InternalError::Employee(EmployeeError::MissingField { .. })));
    assert!(matches!(bad_email, InternalError::Employee(EmployeeError::InvalidEmail { .. })));
    assert_eq!(app_data.employee_store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_employee_requires_people_manager() {
    let (app_data, _uploads) = setup_test_app_data(Arc::new(RecordingSender::default())).await;
    let coordinator = EmployeeCoordinator::new(app_data);

    let forbidden = coordinator
        .create_employee(&ctx_for(UserRole::Employee), new_employee("Asha", "asha@x.co"))
        .await
        .unwrap_err();
    let anonymous = coordinator
        .create_employee(&RequestContext::for_api(None), new_employee("Asha", "asha@x.co"))
        .await
        .unwrap_err();

    assert_eq!(forbidden.kind(), ErrorKind::Forbidden);
    assert!(matches!(anonymous, InternalError::Token(TokenError::Missing)));
}

#[tokio::test]
async fn test_failed_notification_is_reported_not_raised() {
    let (app_data, _uploads) = setup_test_app_data(Arc::new(RecordingSender::failing())).await;
    let coordinator = EmployeeCoordinator::new(app_data.clone());

    let created = coordinator
        .create_employee(&ctx_for(UserRole::Admin), new_employee("Asha", "asha@x.co"))
        .await
        .unwrap();

    assert_eq!(created.notification, NotificationState::Failed);
    assert_eq!(created.warnings.len(), 1);
    assert!(created.temp_password.is_some());
    assert!(app_data.employee_store.find_by_email("asha@x.co").await.unwrap().is_some());
}

#[tokio::test]
async fn test_no_notification_without_system_access() {
    let sender = Arc::new(RecordingSender::default());
    let (app_data, _uploads) = setup_test_app_data(sender.clone()).await;
    let coordinator = EmployeeCoordinator::new(app_data.clone());

    let mut input = new_employee("Asha", "asha@x.co");
    input.can_access_system = Some(false);
    let created = coordinator.create_employee(&ctx_for(UserRole::Admin), input).await.unwrap();

    assert_eq!(created.notification, NotificationState::Skipped);
    assert!(sender.sent().is_empty());

    let login = app_data.user_store.find_by_email("asha@x.co").await.unwrap().unwrap();
    assert!(!login.active);
}

#[tokio::test]
async fn test_update_employee_syncs_user() {
    let (app_data, _uploads) = setup_test_app_data(Arc::new(RecordingSender::default())).await;
    let coordinator = EmployeeCoordinator::new(app_data.clone());
    let ctx = ctx_for(UserRole::Admin);
    let created = coordinator.create_employee(&ctx, new_employee("Asha", "asha@x.co")).await.unwrap();

    let updated = coordinator
        .update_employee(
            &ctx,
            created.employee.id,
            EmployeeChanges {
                name: Some("asha rao".to_string()),
                email: Some("asha.rao@x.co".to_string()),
                role: Some("HR Manager".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(updated.user_synced);
    assert_eq!(updated.employee.name, "ASHA RAO");
    assert_eq!(updated.employee.employee_code, "TMP0001");

    assert!(app_data.user_store.find_by_email("asha@x.co").await.unwrap().is_none());
    let login = app_data.user_store.find_by_email("asha.rao@x.co").await.unwrap().unwrap();
    assert_eq!(login.name, "ASHA RAO");
    assert_eq!(login.role, UserRole::Hr);
}

#[tokio::test]
async fn test_update_employee_without_user_still_succeeds() {
    let (app_data, _uploads) = setup_test_app_data(Arc::new(RecordingSender::default())).await;
    let coordinator = EmployeeCoordinator::new(app_data.clone());
    let ctx = ctx_for(UserRole::Admin);
    let created = coordinator.create_employee(&ctx, new_employee("Asha", "asha@x.co")).await.unwrap();
    app_data.user_store.delete_by_email("asha@x.co").await.unwrap();

    let updated = coordinator
        .update_employee(
            &ctx,
            created.employee.id,
            EmployeeChanges {
                department: Some("Finance".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(!updated.user_synced);
    assert_eq!(updated.employee.department.as_deref(), Some("Finance"));
}

#[tokio::test]
async fn test_update_employee_rejects_email_of_another_employee() {
    let (app_data, _uploads) = setup_test_app_data(Arc::new(RecordingSender::default())).await;
    let coordinator = EmployeeCoordinator::new(app_data);
    let ctx = ctx_for(UserRole::Admin);
    coordinator.create_employee(&ctx, new_employee("Asha", "asha@x.co")).await.unwrap();
    let ravi = coordinator.create_employee(&ctx, new_employee("Ravi", "ravi@x.co")).await.unwrap();

    let err = coordinator
        .update_employee(
            &ctx,
            ravi.employee.id,
            EmployeeChanges {
                email: Some("asha@x.co".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, InternalError::Employee(EmployeeError::DuplicateEmail { .. })));
}

#[tokio::test]
async fn test_get_employee_allows_manager() {
    let (app_data, _uploads) = setup_test_app_data(Arc::new(RecordingSender::default())).await;
    let coordinator = EmployeeCoordinator::new(app_data);
    let created = coordinator
        .create_employee(&ctx_for(UserRole::Admin), new_employee("Asha", "asha@x.co"))
        .await
        .unwrap();

    let found = coordinator.get_employee(&ctx_for(UserRole::Manager), created.employee.id).await.unwrap();
    let missing = coordinator.get_employee(&ctx_for(UserRole::Manager), 999).await.unwrap_err();
    let forbidden = coordinator
        .get_employee(&ctx_for(UserRole::Employee), created.employee.id)
        .await
        .unwrap_err();

    assert_eq!(found.id, created.employee.id);
    assert_eq!(missing.kind(), ErrorKind::NotFound);
    assert_eq!(forbidden.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_hr_delete_is_soft() {
    let (app_data, _uploads) = setup_test_app_data(Arc::new(RecordingSender::default())).await;
    let coordinator = EmployeeCoordinator::new(app_data.clone());
    let created = coordinator
        .create_employee(&ctx_for(UserRole::Admin), new_employee("Asha", "asha@x.co"))
        .await
        .unwrap();

    let outcome = coordinator.delete_employee(&ctx_for(UserRole::Hr), created.employee.id).await.unwrap();

    assert_eq!(outcome.deletion_type, DeletionType::Soft);
    assert!(outcome.summary.is_none());

    let employee = app_data.employee_store.find_by_id(created.employee.id).await.unwrap().unwrap();
    assert!(!employee.is_active);
    assert_eq!(employee.status, EmploymentStatus::NotWorking);

    let login = app_data.user_store.find_by_email("asha@x.co").await.unwrap().unwrap();
    assert!(!login.active);
}

#[tokio::test]
async fn test_delete_forbidden_for_other_roles() {
    let (app_data, _uploads) = setup_test_app_data(Arc::new(RecordingSender::default())).await;
    let coordinator = EmployeeCoordinator::new(app_data.clone());
    let created = coordinator
        .create_employee(&ctx_for(UserRole::Admin), new_employee("Asha", "asha@x.co"))
        .await
        .unwrap();

    let err = coordinator
        .delete_employee(&ctx_for(UserRole::Manager), created.employee.id)
        .await
        .unwrap_err();

    assert!(matches!(err, InternalError::Employee(EmployeeError::DeletionNotPermitted { .. })));
    assert!(app_data.employee_store.find_by_id(created.employee.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_admin_delete_purges_dependents_and_files() {
    let (app_data, uploads) = setup_test_app_data(Arc::new(RecordingSender::default())).await;
    let coordinator = EmployeeCoordinator::new(app_data.clone());
    let db = app_data.connections.people.clone();
    let created = coordinator
        .create_employee(&ctx_for(UserRole::Admin), new_employee("Asha", "asha@x.co"))
        .await
        .unwrap();
    let employee = created.employee;

    // One KYC file on disk, one already gone
    let present = uploads.path().join("present-photo.png");
    std::fs::write(&present, b"png").unwrap();
    let absent = uploads.path().join("absent-pan.pdf");
    let documents = KycDocuments {
        files: vec![
            StoredDocument {
                doc_type: DocumentType::Photo,
                path: present.to_string_lossy().into_owned(),
                original_name: "photo.png".to_string(),
            },
            StoredDocument {
                doc_type: DocumentType::PanCard,
                path: absent.to_string_lossy().into_owned(),
                original_name: "pan.pdf".to_string(),
            },
        ],
        ..Default::default()
    };
    let now = Utc::now().timestamp();
    kyc_submission::ActiveModel {
        id: NotSet,
        employee_id: Set(employee.employee_code.clone()),
        full_name: Set(employee.name.clone()),
        email: Set(Some(employee.email.clone())),
        status: Set(KycStatus::Rejected),
        documents: Set(serde_json::to_string(&documents).unwrap()),
        document_reviews: Set("{}".to_string()),
        remarks: Set(None),
        reviewed_by: Set(None),
        reviewed_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await
    .unwrap();

    let leave_note = uploads.path().join("leave-note.pdf");
    std::fs::write(&leave_note, b"note").unwrap();
    leave::ActiveModel {
        id: NotSet,
        email: Set("asha@x.co".to_string()),
        leave_type: Set("sick".to_string()),
        start_date: Set("2025-03-03".to_string()),
        end_date: Set("2025-03-04".to_string()),
        status: Set("approved".to_string()),
        attachment_path: Set(Some(leave_note.to_string_lossy().into_owned())),
    }
    .insert(&db)
    .await
    .unwrap();

    attendance::ActiveModel {
        id: NotSet,
        email: Set("asha@x.co".to_string()),
        date: Set("2025-03-01".to_string()),
        check_in: Set(None),
        check_out: Set(None),
    }
    .insert(&db)
    .await
    .unwrap();

    payslip::ActiveModel {
        id: NotSet,
        employee_id: Set(Some(employee.id)),
        email: Set(None),
        period: Set("2025-02".to_string()),
        net_pay_cents: Set(100),
    }
    .insert(&db)
    .await
    .unwrap();

    let outcome = coordinator.delete_employee(&ctx_for(UserRole::Admin), employee.id).await.unwrap();

    assert_eq!(outcome.deletion_type, DeletionType::Permanent);
    assert_eq!(outcome.employee_code, "TMP0001");
    let summary = outcome.summary.expect("summary");
    assert_eq!(summary.kyc_submissions, 1);
    assert_eq!(summary.attendance, 1);
    assert_eq!(summary.leaves, 1);
    assert_eq!(summary.payslips, 1);
    assert_eq!(summary.access_logs, 0);
    assert_eq!(summary.users, 1);
    assert_eq!(summary.employees, 1);
    assert_eq!(summary.files.removed, 2);
    assert_eq!(summary.files.missing, 1);
    assert!(summary.is_clean());

    assert!(!present.exists());
    assert!(!leave_note.exists());
    assert!(app_data.employee_store.find_by_id(employee.id).await.unwrap().is_none());
    assert!(app_data.user_store.find_by_email("asha@x.co").await.unwrap().is_none());
    assert!(kyc_submission::Entity::find().all(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_delete_keeps_attachments_outside_upload_dir() {
    let (app_data, _uploads) = setup_test_app_data(Arc::new(RecordingSender::default())).await;
    let coordinator = EmployeeCoordinator::new(app_data.clone());
    let created = coordinator
        .create_employee(&ctx_for(UserRole::Admin), new_employee("Asha", "asha@x.co"))
        .await
        .unwrap();

    let elsewhere = tempfile::TempDir::new().unwrap();
    let unrelated = elsewhere.path().join("payroll-export.csv");
    std::fs::write(&unrelated, b"keep me").unwrap();
    leave::ActiveModel {
        id: NotSet,
        email: Set("asha@x.co".to_string()),
        leave_type: Set("casual".to_string()),
        start_date: Set("2025-04-01".to_string()),
        end_date: Set("2025-04-01".to_string()),
        status: Set("approved".to_string()),
        attachment_path: Set(Some(unrelated.to_string_lossy().into_owned())),
    }
    .insert(&app_data.connections.people)
    .await
    .unwrap();

    let outcome = coordinator
        .delete_employee(&ctx_for(UserRole::Admin), created.employee.id)
        .await
        .unwrap();

    let summary = outcome.summary.expect("summary");
    assert_eq!(summary.leaves, 1);
    assert_eq!(summary.employees, 1);
    assert_eq!(summary.files.removed, 0);
    assert_eq!(summary.files.failed.len(), 1);
    assert!(unrelated.exists());
}

#[tokio::test]
async fn test_unreadable_kyc_documents_are_recorded_and_cascade_continues() {
    let (app_data, _uploads) = setup_test_app_data(Arc::new(RecordingSender::default())).await;
    let coordinator = EmployeeCoordinator::new(app_data.clone());
    let db = app_data.connections.people.clone();
    let created = coordinator
        .create_employee(&ctx_for(UserRole::Admin), new_employee("Asha", "asha@x.co"))
        .await
        .unwrap();

    let now = Utc::now().timestamp();
    kyc_submission::ActiveModel {
        id: NotSet,
        employee_id: Set("TMP0001".to_string()),
        full_name: Set("ASHA".to_string()),
        email: Set(None),
        status: Set(KycStatus::Pending),
        documents: Set("not json".to_string()),
        document_reviews: Set(String::new()),
        remarks: Set(None),
        reviewed_by: Set(None),
        reviewed_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await
    .unwrap();

    let outcome = coordinator
        .delete_employee(&ctx_for(UserRole::Admin), created.employee.id)
        .await
        .unwrap();
    let summary = outcome.summary.unwrap();

    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].step, DeletionStep::KycSubmissions);
    assert_eq!(summary.kyc_submissions, 1);
    assert_eq!(summary.employees, 1);
}

#[tokio::test]
async fn test_delete_missing_employee_is_not_found() {
    let (app_data, _uploads) = setup_test_app_data(Arc::new(RecordingSender::default())).await;
    let coordinator = EmployeeCoordinator::new(app_data);

    let err = coordinator.delete_employee(&ctx_for(UserRole::Admin), 42).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}
