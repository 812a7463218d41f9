//! The sample library service.
//!
//! [`SampleLibrary`] is the single entry point every panel reads and writes
//! through. It never persists the merged view: each [`list`](SampleLibrary::list)
//! recomputes it from the local store and (when reachable) the remote
//! catalog.
//!
//! One instance is constructed per application session and shared behind an
//! [`Arc`].
//!
//! # Examples
//!
//! ```no_run
//! # async fn example() -> vaani::Result<()> {
//! let config = vaani::LibraryConfig::default();
//! let library = vaani::SampleLibrary::from_config(&config)?;
//!
//! let sample = library
//!     .add(&std::fs::read("clip.wav")?, "audio/wav", "clip.wav", None)
//!     .await;
//! let payload = library.get_payload(&sample.id).await?;
//! assert_eq!(payload.bytes.len() as u64, sample.size);
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, RwLock};

use bytes::Bytes;
use chrono::Utc;

use crate::codec::{self, DEFAULT_MEDIA_TYPE};
use crate::config::LibraryConfig;
use crate::error::{LibraryError, Result};
use crate::merge::merge;
use crate::remote::{HttpCatalog, Reachability, RemoteCatalog};
use crate::sample::{Sample, new_sample_id, resolve_name};
use crate::store::{FsBackend, SampleStore};

/// Payload bytes resolved for a sample, ready to hand to an upload form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePayload {
    pub bytes: Bytes,
    pub media_type: String,
    /// The sample's display name, used as the upload file name.
    pub file_name: String,
}

impl SamplePayload {
    fn for_sample(sample: &Sample, bytes: Bytes, hint: Option<String>) -> Self {
        let media_type = Some(sample.media_type.trim())
            .filter(|m| !m.is_empty())
            .map(str::to_owned)
            .or(hint)
            .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_owned());
        Self {
            bytes,
            media_type,
            file_name: sample.name.clone(),
        }
    }
}

/// Unified voice-sample list over the local store and an optional catalog.
pub struct SampleLibrary {
    store: SampleStore,
    catalog: Option<Arc<dyn RemoteCatalog>>,
    reachability: RwLock<Reachability>,
}

impl std::fmt::Debug for SampleLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleLibrary")
            .field("store", &self.store)
            .field("has_catalog", &self.catalog.is_some())
            .field("reachability", &self.reachability())
            .finish()
    }
}

impl SampleLibrary {
    pub fn new(store: SampleStore, catalog: Option<Arc<dyn RemoteCatalog>>) -> Self {
        Self {
            store,
            catalog,
            reachability: RwLock::new(Reachability::Unprobed),
        }
    }

    /// A library with no remote tier.
    pub fn local_only(store: SampleStore) -> Self {
        Self::new(store, None)
    }

    /// Compose a library from configuration: a filesystem store under
    /// `storage.dir`, plus an HTTP catalog when `remote.base_url` is set.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Config`] for invalid configuration and
    /// [`LibraryError::Io`] if the storage directory cannot be created.
    pub fn from_config(config: &LibraryConfig) -> Result<Self> {
        config.validate()?;
        let backend = FsBackend::new(&config.storage.dir)?;
        let store = SampleStore::new(Arc::new(backend), config.storage.key.clone());
        let catalog = HttpCatalog::from_config(&config.remote)?
            .map(|c| Arc::new(c) as Arc<dyn RemoteCatalog>);
        Ok(Self::new(store, catalog))
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    /// Current remote-tier state. Always `Unreachable` without a catalog.
    pub fn reachability(&self) -> Reachability {
        if self.catalog.is_none() {
            return Reachability::Unreachable;
        }
        match self.reachability.read() {
            Ok(state) => *state,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Forget the reachability verdict so the next [`list`](Self::list)
    /// probes the catalog again.
    pub fn reprobe(&self) {
        self.write_reachability(Reachability::Unprobed);
    }

    fn write_reachability(&self, next: Reachability) {
        let mut state = match self.reachability.write() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        *state = next;
    }

    /// Record a probe outcome, only if no other probe got there first.
    fn settle_probe(&self, outcome: Reachability) {
        let mut state = match self.reachability.write() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *state == Reachability::Unprobed {
            tracing::info!(reachability = %outcome, "voice catalog probed");
            *state = outcome;
        }
    }

    async fn remote_view(&self) -> Vec<Sample> {
        let Some(catalog) = self.catalog.as_ref() else {
            return Vec::new();
        };
        match self.reachability() {
            Reachability::Unreachable => Vec::new(),
            Reachability::Reachable => match catalog.list().await {
                Ok(samples) => samples,
                Err(e) => {
                    tracing::warn!(error = %e, "voice catalog list failed, using local samples");
                    Vec::new()
                }
            },
            Reachability::Unprobed => match catalog.list().await {
                Ok(samples) => {
                    self.settle_probe(Reachability::Reachable);
                    samples
                }
                Err(e) => {
                    tracing::warn!(error = %e, "voice catalog unavailable, using local storage only");
                    self.settle_probe(Reachability::Unreachable);
                    Vec::new()
                }
            },
        }
    }

    /// The merged sample list.
    pub async fn list(&self) -> Vec<Sample> {
        let local = self.store.load().await;
        let remote = self.remote_view().await;
        merge(&local, &remote)
    }

    /// Look up one sample in the merged view.
    pub async fn get(&self, id: &str) -> Option<Sample> {
        self.list().await.into_iter().find(|s| s.id == id)
    }

    /// Add a new sample.
    ///
    /// Uploads to the catalog first when it is reachable (failure is logged
    /// and ignored), then always records the sample locally with an inline
    /// copy of the payload. The returned sample is immediately listable and
    /// retrievable without the network.
    pub async fn add(
        &self,
        bytes: &[u8],
        media_type: &str,
        suggested_name: &str,
        custom_name: Option<&str>,
    ) -> Sample {
        let description = codec::describe(bytes, media_type);
        let fallback = Sample {
            id: new_sample_id(),
            name: resolve_name(suggested_name, custom_name),
            size: description.size,
            media_type: description.media_type,
            created_at: Utc::now(),
            inline_payload: None,
            remote_ref: None,
        };

        let uploaded = match self.catalog.as_ref() {
            Some(catalog) if self.reachability().is_reachable() => {
                match catalog
                    .create(bytes, &fallback.media_type, &fallback.name)
                    .await
                {
                    Ok(sample) => Some(sample),
                    Err(e) => {
                        tracing::warn!(error = %e, "could not upload voice to catalog, keeping local copy");
                        None
                    }
                }
            }
            _ => None,
        };

        let inline = codec::encode(bytes, &fallback.media_type);
        let mut sample = uploaded.unwrap_or(fallback);
        sample.inline_payload = Some(inline);

        let stored = sample.clone();
        self.store.update(move |samples| samples.push(stored)).await;
        tracing::info!(id = %sample.id, size = sample.size, remote = sample.remote_ref.is_some(), "voice sample added");
        sample
    }

    /// Rename a locally stored sample. Blank names and unknown ids are no-ops.
    pub async fn rename(&self, id: &str, new_name: &str) {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return;
        }
        let renamed = self
            .store
            .update(|samples| match samples.iter_mut().find(|s| s.id == id) {
                Some(sample) => {
                    sample.name = new_name.to_owned();
                    true
                }
                None => false,
            })
            .await;
        if !renamed {
            tracing::debug!(id, "rename ignored, sample not stored locally");
        }
    }

    /// Remove a sample from the local store.
    ///
    /// A copy that still exists in the catalog reappears on the next
    /// [`list`](Self::list).
    pub async fn delete(&self, id: &str) {
        self.store
            .update(|samples| samples.retain(|s| s.id != id))
            .await;
    }

    /// Resolve the payload bytes for a sample.
    ///
    /// A decodable inline copy in the local store is returned without
    /// touching the catalog. Only when that fails is the merged view
    /// consulted for a remote locator.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::InvalidId`] for a blank id
    /// - [`LibraryError::NotFound`] if the sample is unknown or has no
    ///   usable locator
    /// - [`LibraryError::Unreachable`] if only a remote locator exists and
    ///   the fetch failed
    pub async fn get_payload(&self, id: &str) -> Result<SamplePayload> {
        if id.trim().is_empty() {
            return Err(LibraryError::InvalidId);
        }

        let local = self.store.load().await.into_iter().find(|s| s.id == id);
        if let Some(payload) = local.as_ref().and_then(decode_inline) {
            return Ok(payload);
        }

        let sample = self
            .get(id)
            .await
            .ok_or_else(|| LibraryError::NotFound(id.to_owned()))?;

        let tried_inline = local.as_ref().and_then(|s| s.inline_payload.as_deref());
        if sample.inline_payload.as_deref() != tried_inline {
            if let Some(payload) = decode_inline(&sample) {
                return Ok(payload);
            }
        }

        if let Some(remote_ref) = sample.remote_ref.as_deref() {
            let Some(catalog) = self.catalog.as_ref() else {
                return Err(LibraryError::Unreachable(
                    "no voice catalog configured".into(),
                ));
            };
            let bytes = catalog.fetch(remote_ref).await?;
            return Ok(SamplePayload::for_sample(&sample, bytes, None));
        }

        Err(LibraryError::NotFound(id.to_owned()))
    }
}

/// Decode a sample's inline copy, logging and skipping a corrupt one.
fn decode_inline(sample: &Sample) -> Option<SamplePayload> {
    let encoded = sample.inline_payload.as_deref()?;
    match codec::decode(encoded) {
        Ok(decoded) => Some(SamplePayload::for_sample(
            sample,
            Bytes::from(decoded.bytes),
            decoded.media_type_hint,
        )),
        Err(e) => {
            tracing::warn!(id = %sample.id, error = %e, "cached payload is corrupt, trying remote copy");
            None
        }
    }
}
