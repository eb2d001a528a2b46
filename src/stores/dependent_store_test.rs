use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, NotSet, Set};

use crate::stores::{AccessLogStore, AttendanceStore, DependentOwner, DependentStore, LeaveStore, PayslipStore};
use crate::test::utils::setup_test_databases;
use crate::types::db::{access_log, attendance, leave, payslip};
use crate::types::internal::deletion::DeletionStep;

fn owner() -> DependentOwner {
    DependentOwner {
        employee_id: 7,
        email: "asha@x.co".to_string(),
    }
}

async fn add_attendance(db: &DatabaseConnection, email: &str) {
    attendance::ActiveModel {
        id: NotSet,
        email: Set(email.to_string()),
        date: Set("2025-03-01".to_string()),
        check_in: Set(Some(1_740_800_000)),
        check_out: Set(None),
    }
    .insert(db)
    .await
    .unwrap();
}

async fn add_leave(db: &DatabaseConnection, email: &str, attachment: Option<&str>) {
    leave::ActiveModel {
        id: NotSet,
        email: Set(email.to_string()),
        leave_type: Set("sick".to_string()),
        start_date: Set("2025-03-03".to_string()),
        end_date: Set("2025-03-04".to_string()),
        status: Set("approved".to_string()),
        attachment_path: Set(attachment.map(str::to_string)),
    }
    .insert(db)
    .await
    .unwrap();
}

async fn add_payslip(db: &DatabaseConnection, employee_id: Option<i32>, email: Option<&str>) {
    payslip::ActiveModel {
        id: NotSet,
        employee_id: Set(employee_id),
        email: Set(email.map(str::to_string)),
        period: Set("2025-02".to_string()),
        net_pay_cents: Set(4_200_000),
    }
    .insert(db)
    .await
    .unwrap();
}

#[tokio::test]
async fn test_attendance_matches_email_ignoring_case() {
    let (db, _audit_db) = setup_test_databases().await;
    add_attendance(&db, "Asha@X.co").await;
    add_attendance(&db, "ravi@x.co").await;
    let store = AttendanceStore::new(db.clone());

    let records = store.find_all_for(&owner()).await.unwrap();

    assert_eq!(store.step(), DeletionStep::Attendance);
    assert_eq!(records.len(), 1);
    assert_eq!(store.destroy(&records[0]).await.unwrap(), 1);
    assert_eq!(attendance::Entity::find().all(&db).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_leaves_carry_attachment_paths() {
    let (db, _audit_db) = setup_test_databases().await;
    add_leave(&db, "asha@x.co", Some("uploads/leave/1-note.pdf")).await;
    add_leave(&db, "asha@x.co", Some("  ")).await;
    add_leave(&db, "asha@x.co", None).await;
    let store = LeaveStore::new(db);

    let records = store.find_all_for(&owner()).await.unwrap();
    let attachments: Vec<_> = records.iter().filter_map(|r| r.attachment_path.clone()).collect();

    assert_eq!(records.len(), 3);
    assert_eq!(attachments, vec!["uploads/leave/1-note.pdf".to_string()]);
}

#[tokio::test]
async fn test_payslips_match_by_id_or_email() {
    let (db, _audit_db) = setup_test_databases().await;
    add_payslip(&db, Some(7), None).await;
    add_payslip(&db, None, Some("ASHA@x.co")).await;
    add_payslip(&db, Some(8), Some("ravi@x.co")).await;
    let store = PayslipStore::new(db.clone());

    let records = store.find_all_for(&owner()).await.unwrap();
    for record in &records {
        store.destroy(record).await.unwrap();
    }

    assert_eq!(records.len(), 2);
    let remaining = payslip::Entity::find().all(&db).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].employee_id, Some(8));
}

#[tokio::test]
async fn test_access_logs_destroy_missing_row_removes_nothing() {
    let (db, _audit_db) = setup_test_databases().await;
    access_log::ActiveModel {
        id: NotSet,
        email: Set("asha@x.co".to_string()),
        action: Set("login".to_string()),
        ip_address: Set(None),
        created_at: Set(1_740_800_000),
    }
    .insert(&db)
    .await
    .unwrap();
    let store = AccessLogStore::new(db);

    let records = store.find_all_for(&owner()).await.unwrap();
    assert_eq!(store.destroy(&records[0]).await.unwrap(), 1);
    assert_eq!(store.destroy(&records[0]).await.unwrap(), 0);
}
