pub mod audit;
pub mod auth;
pub mod context;
pub mod deletion;
pub mod kyc;
pub mod lifecycle;
pub mod role_mapping;
