// ABOUTME: Ridelink authentication library for the provider's OAuth endpoints
// ABOUTME: Multi-strategy auth chain with a persisted, refresh-ahead token record

pub mod clock;
pub mod config;
pub mod error;
pub mod oauth;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AuthConfig, AuthMode, AuthStrategy, ProviderEndpoints};
pub use error::{AuthError, AuthResult};
pub use oauth::{
    AuthOrchestrator, CredentialStore, HttpOAuthGateway, OAuthGateway, StdinPrompt,
    TokenGrant, TokenLifecycleManager, TokenRecord, TokenStatus, TokenStatusReport, UserPrompt,
};
