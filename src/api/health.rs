use chrono::Utc;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::types::dto::common::HealthResponse;

pub struct HealthApi;

#[derive(Tags)]
enum ApiTags {
    /// Service liveness
    Health,
}

#[OpenApi(prefix_path = "/api")]
impl HealthApi {
    /// Report that the service is up
    ///
    /// Does not touch the database; use it for load balancer probes.
    #[oai(path = "/health", method = "get", tag = "ApiTags::Health")]
    async fn health(&self) -> Json<HealthResponse> {
        Json(HealthResponse {
            status: "healthy".to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            checked_at: Utc::now().timestamp(),
        })
    }
}
