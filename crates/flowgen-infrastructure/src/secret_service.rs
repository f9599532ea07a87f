//! Reads the Gemini API key from `secret.json`.
//!
//! `GEMINI_API_KEY` or `API_KEY` in the environment take precedence over the
//! file, so a deployment can inject the key without writing it to disk.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use flowgen_core::config::{GeminiConfig, SecretConfig};
use flowgen_core::error::Result;
use flowgen_core::secret::SecretService;

const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// File-backed [`SecretService`] with the environment override applied.
///
/// The first successful load is cached.
#[derive(Clone)]
pub struct SecretServiceImpl {
    path: PathBuf,
    cached: Arc<RwLock<Option<SecretConfig>>>,
}

impl SecretServiceImpl {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            cached: Arc::new(RwLock::new(None)),
        }
    }

    fn load_cached(&self) -> Result<SecretConfig> {
        if let Ok(guard) = self.cached.read()
            && let Some(secrets) = guard.as_ref()
        {
            return Ok(secrets.clone());
        }

        let mut secrets = self.read_file()?;
        apply_env_override(&mut secrets, env_api_key());
        if secrets.gemini.is_none() {
            tracing::debug!("[Secrets] No Gemini key in {}", self.path.display());
        }

        if let Ok(mut guard) = self.cached.write() {
            *guard = Some(secrets.clone());
        }
        Ok(secrets)
    }

    /// A missing or blank file is an empty configuration; malformed JSON is
    /// an error.
    fn read_file(&self) -> Result<SecretConfig> {
        if !self.path.exists() {
            return Ok(SecretConfig::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(SecretConfig::default());
        }
        Ok(serde_json::from_str(&content)?)
    }
}

fn env_api_key() -> Option<String> {
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

fn apply_env_override(secrets: &mut SecretConfig, api_key: Option<String>) {
    let Some(api_key) = api_key else {
        return;
    };
    match secrets.gemini.as_mut() {
        Some(gemini) => gemini.api_key = api_key,
        None => {
            secrets.gemini = Some(GeminiConfig {
                api_key,
                model_name: None,
            })
        }
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        self.load_cached()
    }
}
