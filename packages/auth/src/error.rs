// ABOUTME: Error types for authentication and token lifecycle operations
// ABOUTME: Covers OAuth exchanges, token refresh, persistence, and strategy exhaustion

use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No stored credentials, authentication required")]
    NoCredentials,

    #[error("Stored token record has no refresh token")]
    NoRefreshToken,

    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("Provider rejected the exchange ({code}): {description}")]
    Provider { code: String, description: String },

    #[error("User cancelled interactive authorization")]
    UserCancelled,

    #[error("Interactive authorization prompt timed out")]
    PromptTimeout,

    #[error("All authentication strategies exhausted")]
    AllStrategiesExhausted,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
