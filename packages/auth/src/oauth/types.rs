// ABOUTME: Core type definitions for the token subsystem
// ABOUTME: Persisted token record, expiry status, and token endpoint wire shapes

use serde::{Deserialize, Serialize};

/// Lead time before expiry at which a proactive refresh is triggered.
pub const REFRESH_MARGIN_SECS: i64 = 300;

/// Lifetime assumed when the provider omits `expires_in` (12 hours).
pub const DEFAULT_EXPIRES_IN_SECS: i64 = 43_200;

/// The single persisted token record. All timestamps are Unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Lifetime in seconds as reported by the provider at issuance.
    pub expires_in: i64,
    pub expires_at: i64,
    /// Set at first issuance, never changed by a refresh.
    pub created_at: i64,
    pub updated_at: i64,
}

impl TokenRecord {
    /// Seconds until expiry. Negative once expired.
    pub fn remaining(&self, now: i64) -> i64 {
        self.expires_at - now
    }

    /// Whether a refresh should be attempted at `now`.
    pub fn needs_refresh(&self, now: i64) -> bool {
        now >= self.expires_at - REFRESH_MARGIN_SECS
    }

    pub fn status(&self, now: i64) -> TokenStatus {
        if now >= self.expires_at {
            TokenStatus::Expired
        } else if self.needs_refresh(now) {
            TokenStatus::ExpiringSoon
        } else {
            TokenStatus::Valid {
                remaining_secs: self.remaining(now),
            }
        }
    }
}

/// Expiry state of the persisted record at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    /// No record exists.
    Missing,
    Expired,
    /// Within the refresh margin.
    ExpiringSoon,
    Valid { remaining_secs: i64 },
}

impl TokenStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Expired => "expired",
            Self::ExpiringSoon => "expiring_soon",
            Self::Valid { .. } => "valid",
        }
    }
}

/// Snapshot of the record for status queries, e.g. a diagnostics resource.
#[derive(Debug, Clone, Serialize)]
pub struct TokenStatusReport {
    pub status: String,
    pub expires_at: Option<i64>,
    pub created_at: Option<i64>,
    pub has_refresh_token: bool,
}

impl TokenStatusReport {
    pub fn absent() -> Self {
        Self {
            status: TokenStatus::Missing.as_str().to_string(),
            expires_at: None,
            created_at: None,
            has_refresh_token: false,
        }
    }
}

/// A successful grant exchange as seen by callers of the gateway.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Providers may omit this; callers fall back to [`DEFAULT_EXPIRES_IN_SECS`].
    pub expires_in: Option<i64>,
}

/// Raw payload returned by `POST {auth_host}/oauth/token`.
///
/// The provider signals failure with `error`/`error_description` in the body
/// rather than an HTTP status, so both shapes share one struct.
#[derive(Debug, Deserialize)]
pub struct TokenEndpointResponse {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}
