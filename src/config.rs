//! Configuration for the sample library.
//!
//! Loaded from TOML; every field has a default so a partial (or missing)
//! file still produces a working local-only library.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LibraryError, Result};
use crate::store::DEFAULT_STORAGE_KEY;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Local tier settings.
    pub storage: StorageConfig,
    /// Remote catalog settings.
    pub remote: RemoteConfig,
}

/// Local persisted-state configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the persisted library.
    pub dir: PathBuf,
    /// Versioned key the sample list is stored under.
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: crate::vaani_dirs::library_dir(),
            key: DEFAULT_STORAGE_KEY.to_owned(),
        }
    }
}

/// Remote catalog configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// API base of the catalog backend, e.g. `http://localhost:5000/api`.
    /// `None` keeps the library local-only.
    pub base_url: Option<String>,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
    /// Custom User-Agent. Defaults to `vaani/<version>`.
    pub user_agent: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            // Matches the web client's generation timeout.
            timeout_secs: 120,
            user_agent: None,
        }
    }
}

impl LibraryConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| LibraryError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| LibraryError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_config_path() -> PathBuf {
        crate::vaani_dirs::config_file()
    }

    /// Checks:
    /// - `storage.key` must not be blank
    /// - `remote.timeout_secs` must be greater than 0
    /// - `remote.base_url`, when set, must be an absolute http(s) URL
    pub fn validate(&self) -> Result<()> {
        if self.storage.key.trim().is_empty() {
            return Err(LibraryError::Config("storage.key must not be empty".into()));
        }
        if self.remote.timeout_secs == 0 {
            return Err(LibraryError::Config(
                "remote.timeout_secs must be greater than 0".into(),
            ));
        }
        if let Some(ref base) = self.remote.base_url {
            let parsed = url::Url::parse(base)
                .map_err(|e| LibraryError::Config(format!("remote.base_url is invalid: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(LibraryError::Config(format!(
                    "remote.base_url must use http or https, got {}",
                    parsed.scheme()
                )));
            }
        }
        Ok(())
    }
}
