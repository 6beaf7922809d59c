// ABOUTME: Runs the ordered authentication strategy chain until one produces a token
// ABOUTME: Per-strategy failures are diagnostics; only full exhaustion is fatal

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::clock::SystemClock;
use crate::config::{AuthConfig, AuthStrategy, ProviderEndpoints};
use crate::error::{AuthError, AuthResult};
use crate::oauth::gateway::{HttpOAuthGateway, OAuthGateway};
use crate::oauth::lifecycle::TokenLifecycleManager;
use crate::oauth::prompt::{StdinPrompt, UserPrompt};
use crate::oauth::storage::CredentialStore;

/// Result of one strategy attempt.
enum StrategyOutcome {
    Success(String),
    /// Preconditions not met; nothing was attempted.
    Skipped,
    Failed(String),
}

/// Walks the configured strategy chain: saved token, password grant,
/// interactive authorization code. First success wins.
pub struct AuthOrchestrator {
    config: AuthConfig,
    endpoints: ProviderEndpoints,
    gateway: Arc<dyn OAuthGateway>,
    prompt: Arc<dyn UserPrompt>,
    lifecycle: Arc<TokenLifecycleManager>,
    /// At most one re-authentication chain runs at a time. Released while the
    /// interactive prompt waits on a human.
    chain_guard: Mutex<()>,
}

impl AuthOrchestrator {
    pub fn new(
        config: AuthConfig,
        endpoints: ProviderEndpoints,
        gateway: Arc<dyn OAuthGateway>,
        prompt: Arc<dyn UserPrompt>,
        lifecycle: Arc<TokenLifecycleManager>,
    ) -> Self {
        Self {
            config,
            endpoints,
            gateway,
            prompt,
            lifecycle,
            chain_guard: Mutex::new(()),
        }
    }

    /// Wire up the production components: HTTPS gateway, file-backed store,
    /// console prompt, wall clock.
    pub fn from_config(config: AuthConfig, endpoints: ProviderEndpoints) -> Self {
        let gateway: Arc<dyn OAuthGateway> = Arc::new(HttpOAuthGateway::new(endpoints.clone()));
        let store = CredentialStore::new(endpoints.token_file.clone());
        let lifecycle = Arc::new(TokenLifecycleManager::new(
            store,
            gateway.clone(),
            Arc::new(SystemClock),
        ));
        Self::new(config, endpoints, gateway, Arc::new(StdinPrompt), lifecycle)
    }

    pub fn lifecycle(&self) -> &Arc<TokenLifecycleManager> {
        &self.lifecycle
    }

    /// Produce a currently-valid access token, or fail once every configured
    /// strategy has been skipped or has failed.
    pub async fn get_valid_token(&self) -> AuthResult<String> {
        let mut guard: Option<MutexGuard<'_, ()>> = Some(self.chain_guard.lock().await);

        for strategy in &self.config.priority {
            let outcome = match strategy {
                AuthStrategy::SavedToken => self.try_saved_token().await,
                AuthStrategy::PasswordMode => self.try_password_grant().await,
                AuthStrategy::AuthorizationCode => self.try_authorization_code(&mut guard).await,
            };

            match outcome {
                StrategyOutcome::Success(token) => {
                    info!("Authenticated via {}", strategy);
                    return Ok(token);
                }
                StrategyOutcome::Skipped => {
                    debug!("Strategy {} not applicable, skipping", strategy);
                }
                StrategyOutcome::Failed(reason) => {
                    warn!("Strategy {} failed: {}", strategy, reason);
                }
            }
        }

        Err(AuthError::AllStrategiesExhausted)
    }

    async fn try_saved_token(&self) -> StrategyOutcome {
        match self.lifecycle.get_valid_access_token().await {
            Ok(token) => StrategyOutcome::Success(token),
            // No stored record means there is simply nothing to reuse.
            Err(AuthError::NoCredentials) => StrategyOutcome::Skipped,
            Err(e) => StrategyOutcome::Failed(e.to_string()),
        }
    }

    async fn try_password_grant(&self) -> StrategyOutcome {
        let (Some(username), Some(password)) = (&self.config.username, &self.config.password)
        else {
            return StrategyOutcome::Skipped;
        };
        if !self.config.has_password_credentials() {
            return StrategyOutcome::Skipped;
        }

        match self.gateway.password_grant(username, password).await {
            Ok(grant) => {
                let token = self.lifecycle.set_tokens_from_grant(grant).await;
                StrategyOutcome::Success(token)
            }
            Err(e) => StrategyOutcome::Failed(e.to_string()),
        }
    }

    async fn try_authorization_code<'a>(
        &'a self,
        guard: &mut Option<MutexGuard<'a, ()>>,
    ) -> StrategyOutcome {
        if !self.config.enable_interactive {
            return StrategyOutcome::Skipped;
        }

        let authorize_url = match self.endpoints.authorize_url() {
            Ok(url) => url,
            Err(e) => return StrategyOutcome::Failed(e.to_string()),
        };

        // A human may take minutes to act; do not hold the chain guard while
        // waiting. It is reacquired around the exchange and persistence step.
        *guard = None;
        let code = match self.config.prompt_timeout {
            Some(limit) => match timeout(limit, self.prompt.display(&authorize_url)).await {
                Ok(code) => code,
                Err(_) => {
                    *guard = Some(self.chain_guard.lock().await);
                    return StrategyOutcome::Failed(AuthError::PromptTimeout.to_string());
                }
            },
            None => self.prompt.display(&authorize_url).await,
        };
        *guard = Some(self.chain_guard.lock().await);

        let Some(code) = code.filter(|c| !c.is_empty()) else {
            return StrategyOutcome::Failed(AuthError::UserCancelled.to_string());
        };

        match self.gateway.authorization_code_grant(&code).await {
            Ok(grant) => {
                let token = self.lifecycle.set_tokens_from_grant(grant).await;
                StrategyOutcome::Success(token)
            }
            Err(e) => StrategyOutcome::Failed(e.to_string()),
        }
    }
}
