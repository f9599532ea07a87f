//! Configuration service implementation.
//!
//! Loads `FlowgenConfig` from `config.toml` in the configuration directory.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use flowgen_core::config::FlowgenConfig;
use flowgen_core::error::Result;

/// Configuration service that loads and caches the application configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<FlowgenConfig>>>,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// A missing file yields the defaults; a malformed file is an error.
    pub fn get_config(&self) -> Result<FlowgenConfig> {
        if let Ok(read_lock) = self.config.read()
            && let Some(cached) = read_lock.as_ref()
        {
            return Ok(cached.clone());
        }

        let loaded = self.load_config()?;

        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    fn load_config(&self) -> Result<FlowgenConfig> {
        if !self.path.exists() {
            tracing::debug!(
                "[Config] No config file at {:?}, using defaults",
                self.path
            );
            return Ok(FlowgenConfig::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let config: FlowgenConfig = toml::from_str(&content)?;
        tracing::info!("[Config] Loaded configuration from {:?}", self.path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(temp_dir.path().join("config.toml"));
        assert_eq!(service.get_config().unwrap(), FlowgenConfig::default());
    }

    #[test]
    fn test_loads_and_caches() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[generation]\nmodel = \"gemini-2.5-flash\"\n").unwrap();

        let service = ConfigService::new(path.clone());
        assert_eq!(service.get_config().unwrap().generation.model, "gemini-2.5-flash");

        std::fs::write(&path, "[generation]\nmodel = \"other\"\n").unwrap();
        assert_eq!(service.get_config().unwrap().generation.model, "gemini-2.5-flash");

        service.invalidate_cache();
        assert_eq!(service.get_config().unwrap().generation.model, "other");
    }

    #[test]
    fn test_malformed_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[generation\nmodel = ").unwrap();

        let err = ConfigService::new(path).get_config().unwrap_err();
        assert!(err.is_serialization());
    }
}
