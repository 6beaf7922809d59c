// ABOUTME: Error types for the order-operations client
// ABOUTME: Wraps authentication failures and the provider's in-body error codes

use thiserror::Error;

use ridelink_auth::AuthError;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Provider API error ({code}): {message}")]
    Api { code: String, message: String },

    #[error("Missing field in provider response: {0}")]
    MissingField(&'static str),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
