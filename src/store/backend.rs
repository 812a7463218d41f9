//! Key/value persistence backends for the local tier.
//!
//! Defines the [`KeyValueBackend`] trait (string keys, string values, the
//! same model as browser local storage) and provides [`MemoryBackend`] for
//! tests and ephemeral sessions.
//!
//! # Examples
//!
//! ```
//! use vaani::store::MemoryBackend;
//!
//! let backend = MemoryBackend::new();
//! let shared = backend.clone();
//! assert!(format!("{shared:?}").contains("MemoryBackend"));
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::LibraryError;

/// Async string key/value storage.
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// Read the value under `key`. Returns `Ok(None)` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, LibraryError>;

    /// Overwrite the value under `key`.
    ///
    /// Returns [`LibraryError::PersistenceWrite`] when the write is rejected.
    async fn set(&self, key: &str, value: &str) -> Result<(), LibraryError>;
}

/// In-memory backend, cheaply cloneable; clones share the same map.
///
/// An optional byte quota and a `fail_writes` switch simulate a full
/// storage quota.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<RwLock<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
    quota_bytes: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any single value larger than `bytes`.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota_bytes = Some(bytes);
        self
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Store a raw value, bypassing quota checks.
    pub async fn insert_raw(&self, key: &str, value: impl Into<String>) {
        self.entries.write().await.insert(key.to_owned(), value.into());
    }

    /// Read a raw value.
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }
}

#[async_trait]
impl KeyValueBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, LibraryError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), LibraryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(LibraryError::PersistenceWrite(format!(
                "writes disabled for key {key}"
            )));
        }
        if let Some(quota) = self.quota_bytes {
            if value.len() > quota {
                return Err(LibraryError::PersistenceWrite(format!(
                    "quota exceeded for key {key}: {} > {quota} bytes",
                    value.len()
                )));
            }
        }
        self.entries
            .write()
            .await
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
