// ABOUTME: OAuth module covering grant exchanges, token lifecycle, and the strategy chain
// ABOUTME: Includes file-backed credential storage and the interactive prompt seam

pub mod gateway;
pub mod lifecycle;
pub mod orchestrator;
pub mod prompt;
pub mod storage;
pub mod types;

pub use gateway::{HttpOAuthGateway, OAuthGateway};
pub use lifecycle::TokenLifecycleManager;
pub use orchestrator::AuthOrchestrator;
pub use prompt::{StdinPrompt, UserPrompt};
pub use storage::CredentialStore;
pub use types::{TokenGrant, TokenRecord, TokenStatus, TokenStatusReport};
