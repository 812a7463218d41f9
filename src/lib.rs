//! Vaani: the voice-sample library behind the voice studio.
//!
//! Keeps one coherent list of reference voices across two storage tiers:
//! a local persisted cache that always works, and an optional remote
//! catalog that is used when reachable.
//!
//! # Architecture
//!
//! - **codec**: data-URL encoding of payloads for storage
//! - **store**: the local tier, tolerant of corrupt or legacy content
//! - **remote**: the HTTP catalog, every failure degrading to local-only
//! - **library**: merges both tiers, dual-writes on add, resolves payloads
//!   inline-first with a remote fallback

pub mod codec;
pub mod config;
pub mod error;
pub mod library;
pub mod merge;
pub mod remote;
pub mod sample;
pub mod store;
pub mod vaani_dirs;

pub use config::LibraryConfig;
pub use error::{LibraryError, Result};
pub use library::{SampleLibrary, SamplePayload};
pub use remote::{HttpCatalog, Reachability, RemoteCatalog};
pub use sample::{Availability, Sample};
pub use store::SampleStore;
