//! Application directory paths.
//!
//! Uses the [`dirs`] crate for platform-appropriate resolution.
//!
//! # Environment Overrides
//!
//! - `VAANI_DATA_DIR` overrides [`data_dir`]
//! - `VAANI_CONFIG_DIR` overrides [`config_dir`]

use std::path::PathBuf;

/// Application data root (`dirs::data_dir()/vaani/`).
///
/// Holds the persisted sample library.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("VAANI_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("vaani"))
        .unwrap_or_else(|| PathBuf::from("/tmp/vaani-data"))
}

/// Application config directory (`dirs::config_dir()/vaani/`).
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("VAANI_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("vaani"))
        .unwrap_or_else(|| PathBuf::from("/tmp/vaani-config"))
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Sample library directory (`data_dir()/library/`).
#[must_use]
pub fn library_dir() -> PathBuf {
    data_dir().join("library")
}
