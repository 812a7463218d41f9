//! Filesystem-backed key/value store.
//!
//! Each key is stored as `{dir}/{key}.json`. Writes are atomic (temp file
//! + fsync + rename) so a crash never leaves a half-written library.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::backend::KeyValueBackend;
use crate::error::LibraryError;

#[derive(Debug, Clone)]
pub struct FsBackend {
    dir: PathBuf,
}

impl FsBackend {
    /// Create a backend rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Io`] if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, LibraryError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`. Characters outside `[A-Za-z0-9._-]`
    /// are replaced so a key can never escape the directory.
    pub fn key_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }

    fn write_atomic(&self, key: &str, value: &str) -> Result<(), LibraryError> {
        let path = self.key_path(key);
        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, value.as_bytes()).map_err(|e| {
            LibraryError::PersistenceWrite(format!(
                "failed to write temp file {}: {e}",
                tmp_path.display()
            ))
        })?;

        if let Ok(file) = std::fs::File::open(&tmp_path) {
            let _ = file.sync_all();
        }

        std::fs::rename(&tmp_path, &path).map_err(|e| {
            LibraryError::PersistenceWrite(format!(
                "failed to rename temp file to {}: {e}",
                path.display()
            ))
        })
    }
}

#[async_trait]
impl KeyValueBackend for FsBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, LibraryError> {
        let path = self.key_path(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LibraryError::Io(e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), LibraryError> {
        self.write_atomic(key, value)
    }
}
