use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Missing bearer token")]
    Missing,

    #[error("Invalid token: {reason}")]
    Invalid { reason: String },

    #[error("Token expired")]
    Expired,
}
