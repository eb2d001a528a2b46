// API-facing error types
pub mod lifecycle;

// Re-exports for convenience
pub use lifecycle::{ApiError, ApiErrorResponse};
