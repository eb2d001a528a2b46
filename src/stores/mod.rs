// Stores layer - Data access and repository pattern
pub mod audit_store;
pub mod dependent_store;
pub mod employee_store;
pub mod kyc_store;
pub mod user_store;

pub use audit_store::AuditStore;
pub use dependent_store::{
    AccessLogStore, AttendanceStore, DependentOwner, DependentRecord, DependentStore, LeaveStore, PayslipStore,
};
pub use employee_store::EmployeeStore;
pub use kyc_store::KycStore;
pub use user_store::UserStore;

#[cfg(test)]
mod dependent_store_test;
