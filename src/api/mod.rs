// API layer - HTTP endpoints
pub mod body_limit;
pub mod employees;
pub mod health;
pub mod helpers;
pub mod kyc;

pub use body_limit::BodyLimit;
pub use employees::EmployeeApi;
pub use health::HealthApi;
pub use kyc::KycApi;

use poem_openapi::auth::Bearer;
use poem_openapi::SecurityScheme;

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(ty = "bearer", key_name = "Authorization", key_in = "header", bearer_format = "JWT")]
pub struct BearerAuth(pub Bearer);
