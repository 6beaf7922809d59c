// ABOUTME: Authentication configuration and provider endpoint settings
// ABOUTME: Derives the strategy priority chain from the configured auth mode

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::error::{AuthError, AuthResult};

/// How the subsystem is allowed to authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Try everything that is configured, in order.
    #[default]
    Auto,
    /// Saved token, then password grant only.
    Password,
    /// Saved token, then interactive authorization code only.
    OAuth,
}

impl FromStr for AuthMode {
    type Err = AuthError;

    fn from_str(s: &str) -> AuthResult<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "password" => Ok(Self::Password),
            "oauth" => Ok(Self::OAuth),
            _ => Err(AuthError::Configuration(format!(
                "Unknown auth mode: {}. Supported: auto, password, oauth",
                s
            ))),
        }
    }
}

/// One step of the authentication chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    SavedToken,
    PasswordMode,
    AuthorizationCode,
}

impl fmt::Display for AuthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SavedToken => write!(f, "saved_token"),
            Self::PasswordMode => write!(f, "password_mode"),
            Self::AuthorizationCode => write!(f, "authorization_code"),
        }
    }
}

impl FromStr for AuthStrategy {
    type Err = AuthError;

    fn from_str(s: &str) -> AuthResult<Self> {
        match s {
            "saved_token" => Ok(Self::SavedToken),
            "password_mode" => Ok(Self::PasswordMode),
            "authorization_code" => Ok(Self::AuthorizationCode),
            _ => Err(AuthError::Configuration(format!(
                "Unknown auth strategy: {}",
                s
            ))),
        }
    }
}

/// Default bound on how long the interactive prompt may block the chain.
pub const DEFAULT_PROMPT_TIMEOUT: Duration = Duration::from_secs(300);

/// Authentication settings, read-only to the subsystem once constructed.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub mode: AuthMode,
    pub username: Option<String>,
    pub password: Option<String>,
    pub enable_interactive: bool,
    /// Strategy chain, derived from `mode` unless overridden explicitly.
    pub priority: Vec<AuthStrategy>,
    /// Upper bound on the interactive prompt wait. `None` means unbounded.
    pub prompt_timeout: Option<Duration>,
}

impl AuthConfig {
    pub fn new(
        mode: AuthMode,
        username: Option<String>,
        password: Option<String>,
        enable_interactive: bool,
    ) -> Self {
        let has_credentials = matches!((&username, &password), (Some(u), Some(p)) if !u.is_empty() && !p.is_empty());
        Self {
            mode,
            username,
            password,
            enable_interactive,
            priority: derive_priority(mode, has_credentials),
            prompt_timeout: Some(DEFAULT_PROMPT_TIMEOUT),
        }
    }

    /// Override the derived strategy chain.
    pub fn with_priority(mut self, priority: Vec<AuthStrategy>) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_prompt_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.prompt_timeout = timeout;
        self
    }

    /// Read auth settings from `RIDELINK_*` environment variables.
    pub fn from_env() -> Self {
        let mode = std::env::var("RIDELINK_AUTH_MODE")
            .ok()
            .and_then(|m| m.parse().ok())
            .unwrap_or_default();
        let username = std::env::var("RIDELINK_USERNAME").ok().filter(|s| !s.is_empty());
        let password = std::env::var("RIDELINK_PASSWORD").ok().filter(|s| !s.is_empty());
        let enable_interactive = std::env::var("RIDELINK_INTERACTIVE")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        Self::new(mode, username, password, enable_interactive)
    }

    /// Whether the password grant has enough configuration to be attempted.
    pub fn has_password_credentials(&self) -> bool {
        matches!(
            (&self.username, &self.password),
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty()
        )
    }
}

/// Strategy order for a given mode. A saved token is always tried first.
fn derive_priority(mode: AuthMode, has_credentials: bool) -> Vec<AuthStrategy> {
    match mode {
        AuthMode::Auto if has_credentials => vec![
            AuthStrategy::SavedToken,
            AuthStrategy::PasswordMode,
            AuthStrategy::AuthorizationCode,
        ],
        AuthMode::Auto => vec![AuthStrategy::SavedToken, AuthStrategy::AuthorizationCode],
        AuthMode::Password => vec![AuthStrategy::SavedToken, AuthStrategy::PasswordMode],
        AuthMode::OAuth => vec![AuthStrategy::SavedToken, AuthStrategy::AuthorizationCode],
    }
}

/// Endpoints and client identity for one provider environment.
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_host: String,
    pub api_host: String,
    /// Location of the persisted token record.
    pub token_file: PathBuf,
}

impl ProviderEndpoints {
    /// Read provider settings from `RIDELINK_*` environment variables,
    /// falling back to the sandbox environment.
    pub fn from_env() -> Self {
        Self {
            client_id: std::env::var("RIDELINK_CLIENT_ID").unwrap_or_default(),
            client_secret: std::env::var("RIDELINK_CLIENT_SECRET").unwrap_or_default(),
            redirect_uri: std::env::var("RIDELINK_REDIRECT_URI")
                .unwrap_or_else(|_| "https://www.baidu.com".to_string()),
            auth_host: std::env::var("RIDELINK_AUTH_HOST")
                .unwrap_or_else(|_| "https://sandboxoauth.10101111.com".to_string()),
            api_host: std::env::var("RIDELINK_API_HOST")
                .unwrap_or_else(|_| "https://sandboxapi.10101111.com".to_string()),
            token_file: std::env::var("RIDELINK_TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("ridelink_tokens.json")),
        }
    }

    /// Token endpoint for every grant exchange.
    pub fn token_url(&self) -> String {
        format!("{}/oauth/token", self.auth_host.trim_end_matches('/'))
    }

    /// Authorization URL shown to the user for the interactive flow.
    pub fn authorize_url(&self) -> AuthResult<String> {
        let mut url = Url::parse(&self.auth_host)
            .map_err(|e| AuthError::Configuration(format!("Invalid auth host: {}", e)))?;
        url.set_path("/oauth/authorize");
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", "read");
        Ok(url.to_string())
    }
}
