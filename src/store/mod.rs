//! Local tier: the persisted sample list.
//!
//! [`SampleStore`] reads and writes the whole list under one versioned key.
//! Reads never fail: a missing key, an unreadable backend, or corrupt
//! content all yield an empty list so a bad cache cannot block the UI.
//! Writes that fail are logged; the in-memory list stays correct.

pub mod backend;
pub mod fs;
pub mod schema;

use std::sync::Arc;

use tokio::sync::RwLock;

pub use backend::{KeyValueBackend, MemoryBackend};
pub use fs::FsBackend;
pub use schema::StoredSchema;

use crate::error::LibraryError;
use crate::sample::Sample;

/// Storage key used by the original web client.
pub const DEFAULT_STORAGE_KEY: &str = "vaani_audio_samples_v1";

/// The local sample set and its persisted copy.
///
/// The in-memory list is hydrated from the backend on first use and is the
/// local tier's working state; every change is written through as a
/// full-list overwrite. Clones share the same state.
#[derive(Clone)]
pub struct SampleStore {
    backend: Arc<dyn KeyValueBackend>,
    key: String,
    state: Arc<RwLock<Option<Vec<Sample>>>>,
}

impl std::fmt::Debug for SampleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleStore").field("key", &self.key).finish()
    }
}

impl SampleStore {
    pub fn new(backend: Arc<dyn KeyValueBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            state: Arc::new(RwLock::new(None)),
        }
    }

    /// Store over a fresh [`MemoryBackend`] with the default key.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()), DEFAULT_STORAGE_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The local list, in stored order.
    pub async fn load(&self) -> Vec<Sample> {
        if let Some(samples) = self.state.read().await.as_ref() {
            return samples.clone();
        }
        let read = self.read_backend().await;
        self.state.write().await.get_or_insert(read).clone()
    }

    /// Drop the in-memory list and re-read the persisted one.
    pub async fn reload(&self) -> Vec<Sample> {
        let read = self.read_backend().await;
        *self.state.write().await = Some(read.clone());
        read
    }

    /// Replace the list, logging instead of failing on write errors.
    pub async fn save(&self, samples: &[Sample]) {
        *self.state.write().await = Some(samples.to_vec());
        self.persist_logged(samples).await;
    }

    /// Replace the list, returning the persistence failure.
    ///
    /// The in-memory list is updated either way.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::PersistenceWrite`] if serialization or the
    /// backend write fails.
    pub async fn try_save(&self, samples: &[Sample]) -> Result<(), LibraryError> {
        *self.state.write().await = Some(samples.to_vec());
        self.persist(samples).await
    }

    /// Mutate the list in place and write the result through.
    ///
    /// The mutation itself is exclusive; concurrent persisted writes may
    /// still land in either order (last write wins on disk).
    pub async fn update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Vec<Sample>) -> R,
    {
        if self.state.read().await.is_none() {
            let read = self.read_backend().await;
            self.state.write().await.get_or_insert(read);
        }
        let (result, snapshot) = {
            let mut guard = self.state.write().await;
            let samples = guard.get_or_insert_with(Vec::new);
            let result = f(samples);
            (result, samples.clone())
        };
        self.persist_logged(&snapshot).await;
        result
    }

    async fn read_backend(&self) -> Vec<Sample> {
        let raw = match self.backend.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to read stored samples");
                return Vec::new();
            }
        };

        match StoredSchema::decode(&raw) {
            StoredSchema::Invalid { reason } => {
                tracing::warn!(key = %self.key, %reason, "failed to parse stored samples");
                Vec::new()
            }
            decoded => decoded.into_samples().unwrap_or_default(),
        }
    }

    async fn persist(&self, samples: &[Sample]) -> Result<(), LibraryError> {
        let text = schema::encode(samples)
            .map_err(|e| LibraryError::PersistenceWrite(format!("failed to serialize: {e}")))?;
        self.backend.set(&self.key, &text).await
    }

    async fn persist_logged(&self, samples: &[Sample]) {
        if let Err(e) = self.persist(samples).await {
            tracing::warn!(key = %self.key, count = samples.len(), error = %e, "failed to persist samples");
        }
    }
}
