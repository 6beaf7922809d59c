// ABOUTME: OAuth token endpoint client for the three grant exchanges
// ABOUTME: Maps the provider's in-body error payloads onto typed errors

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error};

use crate::config::ProviderEndpoints;
use crate::error::{AuthError, AuthResult};
use crate::oauth::types::{TokenEndpointResponse, TokenGrant};

/// The provider's token endpoint, abstracted so tests can script exchanges.
#[async_trait]
pub trait OAuthGateway: Send + Sync {
    async fn password_grant(&self, username: &str, password: &str) -> AuthResult<TokenGrant>;
    async fn authorization_code_grant(&self, code: &str) -> AuthResult<TokenGrant>;
    async fn refresh_grant(&self, refresh_token: &str) -> AuthResult<TokenGrant>;
}

/// Gateway talking to the real token endpoint over HTTPS.
pub struct HttpOAuthGateway {
    endpoints: ProviderEndpoints,
    client: Client,
}

impl HttpOAuthGateway {
    pub fn new(endpoints: ProviderEndpoints) -> Self {
        Self {
            endpoints,
            client: Client::new(),
        }
    }

    /// One `POST {auth_host}/oauth/token` exchange. The provider reports both
    /// success and failure in the JSON body, keyed by `access_token` presence.
    async fn exchange(&self, grant_type: &str, extra: &[(&str, &str)]) -> AuthResult<TokenGrant> {
        let mut params: Vec<(&str, &str)> = vec![
            ("client_id", self.endpoints.client_id.as_str()),
            ("client_secret", self.endpoints.client_secret.as_str()),
            ("grant_type", grant_type),
        ];
        params.extend_from_slice(extra);

        debug!("Requesting {} grant from token endpoint", grant_type);
        let response = self
            .client
            .post(self.endpoints.token_url())
            .query(&params)
            .send()
            .await?;

        let payload: TokenEndpointResponse = response.json().await?;
        match payload.access_token {
            Some(access_token) => Ok(TokenGrant {
                access_token,
                refresh_token: payload.refresh_token,
                expires_in: payload.expires_in,
            }),
            None => {
                let code = payload.error.unwrap_or_else(|| "unknown".to_string());
                let description = payload
                    .error_description
                    .unwrap_or_else(|| "no error description".to_string());
                error!("{} grant rejected ({}): {}", grant_type, code, description);
                Err(AuthError::Provider { code, description })
            }
        }
    }
}

#[async_trait]
impl OAuthGateway for HttpOAuthGateway {
    async fn password_grant(&self, username: &str, password: &str) -> AuthResult<TokenGrant> {
        self.exchange("password", &[("username", username), ("password", password)])
            .await
    }

    async fn authorization_code_grant(&self, code: &str) -> AuthResult<TokenGrant> {
        let redirect_uri = self.endpoints.redirect_uri.clone();
        self.exchange(
            "authorization_code",
            &[("code", code), ("redirect_uri", redirect_uri.as_str())],
        )
        .await
    }

    async fn refresh_grant(&self, refresh_token: &str) -> AuthResult<TokenGrant> {
        self.exchange("refresh_token", &[("refresh_token", refresh_token)])
            .await
    }
}
