use poem_openapi::Object;

/// Liveness probe payload
#[derive(Object, Debug)]
pub struct HealthResponse {
    /// Always "healthy" when the process can answer
    pub status: String,

    pub service: String,

    pub version: String,

    /// Unix seconds at which the probe was answered
    pub checked_at: i64,
}
