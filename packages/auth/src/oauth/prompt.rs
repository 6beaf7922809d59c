// ABOUTME: Interactive capability that shows an authorization URL and collects a code
// ABOUTME: The console implementation blocks on stdin via spawn_blocking

use std::io::Write;

use async_trait::async_trait;

/// Blocking interactive step of the authorization-code flow.
///
/// `None` means the user cancelled or supplied no code. The orchestrator is
/// responsible for bounding how long this may take.
#[async_trait]
pub trait UserPrompt: Send + Sync {
    async fn display(&self, authorize_url: &str) -> Option<String>;
}

/// Console prompt reading the code from stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinPrompt;

#[async_trait]
impl UserPrompt for StdinPrompt {
    async fn display(&self, authorize_url: &str) -> Option<String> {
        println!("Open the following URL to authorize access:\n\n  {}\n", authorize_url);
        print!("Enter the authorization code: ");
        let _ = std::io::stdout().flush();

        let line = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            std::io::stdin().read_line(&mut line).ok().map(|_| line)
        })
        .await
        .ok()
        .flatten()?;

        let code = line.trim();
        if code.is_empty() {
            None
        } else {
            Some(code.to_string())
        }
    }
}
