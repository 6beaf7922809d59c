// ABOUTME: Owns the in-memory token record and refreshes it ahead of expiry
// ABOUTME: The record lock makes concurrent callers share a single refresh

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::{AuthError, AuthResult};
use crate::oauth::gateway::OAuthGateway;
use crate::oauth::storage::CredentialStore;
use crate::oauth::types::{
    TokenGrant, TokenRecord, TokenStatus, TokenStatusReport, DEFAULT_EXPIRES_IN_SECS,
};

/// Single writer of the token record, in memory and on disk.
pub struct TokenLifecycleManager {
    store: CredentialStore,
    gateway: Arc<dyn OAuthGateway>,
    clock: Arc<dyn Clock>,
    /// The only in-memory copy of the persisted record. Holding this lock
    /// across the refresh exchange is what makes refresh single-flight:
    /// concurrent callers queue here and find an already-fresh record.
    record: Mutex<Option<TokenRecord>>,
}

impl TokenLifecycleManager {
    /// Seed the in-memory record from whatever the store currently holds.
    pub fn new(store: CredentialStore, gateway: Arc<dyn OAuthGateway>, clock: Arc<dyn Clock>) -> Self {
        let record = store.load();
        Self {
            store,
            gateway,
            clock,
            record: Mutex::new(record),
        }
    }

    /// Return an access token that is good for at least the refresh margin,
    /// refreshing first when the current one is expiring or expired.
    pub async fn get_valid_access_token(&self) -> AuthResult<String> {
        let mut slot = self.record.lock().await;
        let record = slot.as_ref().ok_or(AuthError::NoCredentials)?;

        let now = self.clock.now();
        if !record.needs_refresh(now) {
            debug!(
                "Access token valid for another {}s",
                record.remaining(now)
            );
            return Ok(record.access_token.clone());
        }

        info!("Access token expiring, refreshing");
        self.refresh_locked(&mut slot).await
    }

    /// Exchange the refresh token for a new access token.
    pub async fn refresh(&self) -> AuthResult<()> {
        let mut slot = self.record.lock().await;
        self.refresh_locked(&mut slot).await.map(|_| ())
    }

    async fn refresh_locked(&self, slot: &mut Option<TokenRecord>) -> AuthResult<String> {
        let current = slot.as_ref().ok_or(AuthError::NoCredentials)?;
        let refresh_token = current
            .refresh_token
            .clone()
            .ok_or(AuthError::NoRefreshToken)?;

        let grant = self
            .gateway
            .refresh_grant(&refresh_token)
            .await
            .map_err(|e| AuthError::RefreshFailed(e.to_string()))?;

        let now = self.clock.now();
        let expires_in = grant.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        let record = TokenRecord {
            access_token: grant.access_token,
            // Some providers do not rotate the refresh token; keep the old one.
            refresh_token: grant.refresh_token.or(Some(refresh_token)),
            expires_in,
            expires_at: now + expires_in,
            created_at: current.created_at,
            updated_at: now,
        };

        self.persist(&record);
        info!("Refreshed access token, valid for {}s", expires_in);
        let access_token = record.access_token.clone();
        *slot = Some(record);
        Ok(access_token)
    }

    /// Replace the record after a fresh grant (password or authorization code).
    pub async fn set_tokens(
        &self,
        access_token: String,
        refresh_token: Option<String>,
        expires_in: Option<i64>,
    ) {
        let now = self.clock.now();
        let expires_in = expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        let record = TokenRecord {
            access_token,
            refresh_token,
            expires_in,
            expires_at: now + expires_in,
            created_at: now,
            updated_at: now,
        };

        let mut slot = self.record.lock().await;
        self.persist(&record);
        info!("Stored new token record, valid for {}s", expires_in);
        *slot = Some(record);
    }

    /// Convenience for storing the result of a grant exchange.
    pub async fn set_tokens_from_grant(&self, grant: TokenGrant) -> String {
        let access_token = grant.access_token.clone();
        self.set_tokens(grant.access_token, grant.refresh_token, grant.expires_in)
            .await;
        access_token
    }

    pub async fn status(&self) -> TokenStatus {
        let slot = self.record.lock().await;
        match slot.as_ref() {
            Some(record) => record.status(self.clock.now()),
            None => TokenStatus::Missing,
        }
    }

    /// Status snapshot for external diagnostics surfaces.
    pub async fn status_report(&self) -> TokenStatusReport {
        let slot = self.record.lock().await;
        match slot.as_ref() {
            Some(record) => TokenStatusReport {
                status: record.status(self.clock.now()).as_str().to_string(),
                expires_at: Some(record.expires_at),
                created_at: Some(record.created_at),
                has_refresh_token: record.refresh_token.is_some(),
            },
            None => TokenStatusReport::absent(),
        }
    }

    /// Persistence failures never abort a completed exchange; the in-memory
    /// record stays authoritative for the rest of the process lifetime.
    fn persist(&self, record: &TokenRecord) {
        if let Err(e) = self.store.save(record) {
            warn!("Failed to persist token record: {}", e);
        }
    }
}
