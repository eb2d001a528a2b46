// API request/response models
pub mod common;
pub mod employee;
pub mod kyc;
