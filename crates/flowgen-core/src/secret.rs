//! Access to the generation API key.

use crate::config::{GeminiConfig, SecretConfig};
use crate::error::Result;

/// Source of the Gemini credentials.
///
/// Keys must never reach logs or error messages.
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    async fn load_secrets(&self) -> Result<SecretConfig>;

    /// The Gemini section, if it carries a non-blank key.
    async fn gemini(&self) -> Result<Option<GeminiConfig>> {
        let secrets = self.load_secrets().await?;
        Ok(secrets
            .gemini
            .filter(|gemini| !gemini.api_key.trim().is_empty()))
    }
}
