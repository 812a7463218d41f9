//! Remote tier: the optional network-backed voice catalog.
//!
//! Every [`RemoteCatalog`] operation reports failure as
//! [`LibraryError::Unreachable`]; callers treat that as "no remote data this
//! session" and carry on from the local tier.
//!
//! # Reachability
//!
//! [`Reachability`] starts [`Unprobed`](Reachability::Unprobed) and moves to
//! [`Reachable`](Reachability::Reachable) or
//! [`Unreachable`](Reachability::Unreachable) on the first library listing.
//! It is not re-probed automatically.

pub mod http;

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Deserialize;

pub use http::HttpCatalog;

use crate::codec::DEFAULT_MEDIA_TYPE;
use crate::error::LibraryError;
use crate::sample::Sample;

/// Best-effort mirror of the sample list.
///
/// All implementations must be `Send + Sync` so one catalog can serve every
/// consumer of a library.
#[async_trait]
pub trait RemoteCatalog: Send + Sync {
    /// List the catalog's samples in catalog order.
    async fn list(&self) -> Result<Vec<Sample>, LibraryError>;

    /// Upload a new sample. Nothing is committed on failure.
    async fn create(
        &self,
        bytes: &[u8],
        media_type: &str,
        name: &str,
    ) -> Result<Sample, LibraryError>;

    /// Fetch payload bytes from a locator previously returned by the catalog.
    async fn fetch(&self, remote_ref: &str) -> Result<Bytes, LibraryError>;
}

/// Whether the remote tier answered this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reachability {
    #[default]
    Unprobed,
    Reachable,
    Unreachable,
}

impl Reachability {
    pub fn is_reachable(self) -> bool {
        self == Self::Reachable
    }
}

impl fmt::Display for Reachability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unprobed => write!(f, "unprobed"),
            Self::Reachable => write!(f, "reachable"),
            Self::Unreachable => write!(f, "unreachable"),
        }
    }
}

/// Sample descriptor as the catalog sends it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDescriptor {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default = "default_media_type", alias = "type")]
    pub media_type: String,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub url: Option<String>,
}

impl From<RemoteDescriptor> for Sample {
    fn from(d: RemoteDescriptor) -> Self {
        Sample {
            id: d.id,
            name: d.name,
            size: d.size,
            media_type: d.media_type,
            created_at: d.created_at,
            inline_payload: None,
            remote_ref: d.url,
        }
    }
}

fn default_media_type() -> String {
    DEFAULT_MEDIA_TYPE.to_owned()
}
