//! Unified path management for FlowGen files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/flowgen/              # Config directory
//! ├── config.toml                 # Application configuration
//! ├── secret.json                 # API keys (0600)
//! └── logs/                       # Application logs
//!     └── flowgen.log.YYYY-MM-DD
//!
//! ~/.local/share/flowgen/         # Data directory
//! └── flowgen_history.json        # Persisted history slot
//! ```
//!
//! Both roots can be overridden, which is how tests and `--config-dir` /
//! `--data-dir` point the application at other locations.

use std::path::{Path, PathBuf};

use flowgen_core::config::{GeminiConfig, SecretConfig};

const APP_DIR: &str = "flowgen";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolved configuration and data roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowgenPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl FlowgenPaths {
    /// Resolves the platform defaults (XDG on Linux), honoring optional
    /// overrides for either root.
    pub fn resolve(config_dir: Option<&Path>, data_dir: Option<&Path>) -> Result<Self, PathError> {
        let config_dir = match config_dir {
            Some(dir) => dir.to_path_buf(),
            None => dirs::config_dir()
                .ok_or(PathError::HomeDirNotFound)?
                .join(APP_DIR),
        };
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => dirs::data_dir()
                .ok_or(PathError::HomeDirNotFound)?
                .join(APP_DIR),
        };
        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    /// Places both roots under a single base directory.
    pub fn with_base(base: &Path) -> Self {
        Self {
            config_dir: base.join("config"),
            data_dir: base.join("data"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn secret_file(&self) -> PathBuf {
        self.config_dir.join("secret.json")
    }

    pub fn history_file(&self) -> PathBuf {
        self.data_dir
            .join(format!("{}.json", crate::history_repository::HISTORY_KEY))
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.config_dir.join("logs")
    }

    /// Ensures the secret file exists, creating it with a template if it doesn't.
    ///
    /// # Security Note
    ///
    /// This function sets file permissions to 600 (user read/write only) on Unix systems.
    pub fn ensure_secret_file(&self) -> Result<PathBuf, std::io::Error> {
        let secret_path = self.secret_file();

        if secret_path.exists() {
            return Ok(secret_path);
        }

        if let Some(parent) = secret_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template_config = SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: String::new(),
                model_name: Some(flowgen_core::config::DEFAULT_GEMINI_MODEL.to_string()),
            }),
        };

        let template_json =
            serde_json::to_string_pretty(&template_config).map_err(std::io::Error::other)?;

        std::fs::write(&secret_path, template_json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&secret_path, permissions)?;
        }

        Ok(secret_path)
    }
}
