use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SocialError>;

#[derive(Debug, Error)]
pub enum SocialError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Token endpoint returned {status}: {message}")]
    TokenEndpoint { status: u16, message: String },

    #[error("Invalid PKCE verifier: {0}")]
    InvalidVerifier(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
