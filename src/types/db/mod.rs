// Database entities - SeaORM models
pub mod access_log;
pub mod attendance;
pub mod audit_event;
pub mod employee;
pub mod kyc_submission;
pub mod leave;
pub mod payslip;
pub mod user;
