//! The sample entity shared by both storage tiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::DEFAULT_MEDIA_TYPE;

/// Name used when neither the caller nor the upload provides one.
pub const DEFAULT_SAMPLE_NAME: &str = "Voice Sample";

/// One stored voice reference clip and its metadata.
///
/// Field names follow the persisted JSON layout. Older cache entries used
/// `type`, `dataUrl` and `url`; those names are still accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Opaque unique identifier, never reused.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Payload length in bytes at creation time.
    #[serde(default)]
    pub size: u64,
    /// MIME-like media type of the payload.
    #[serde(default = "default_media_type", alias = "type")]
    pub media_type: String,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    /// Codec-encoded copy of the payload, present when cached locally.
    #[serde(default, alias = "dataUrl", skip_serializing_if = "Option::is_none")]
    pub inline_payload: Option<String>,
    /// Locator for fetching the payload from the remote catalog.
    #[serde(default, alias = "url", skip_serializing_if = "Option::is_none")]
    pub remote_ref: Option<String>,
}

/// Where a sample's payload can be retrieved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Inline,
    Remote,
    Both,
    /// Listed but not retrievable: neither locator is present.
    Unavailable,
}

impl Sample {
    /// Returns `true` if at least one payload locator is present.
    pub fn is_retrievable(&self) -> bool {
        self.availability() != Availability::Unavailable
    }

    pub fn availability(&self) -> Availability {
        match (self.inline_payload.is_some(), self.remote_ref.is_some()) {
            (true, true) => Availability::Both,
            (true, false) => Availability::Inline,
            (false, true) => Availability::Remote,
            (false, false) => Availability::Unavailable,
        }
    }
}

/// Generate a fresh sample id (hyphenless UUID v4, as the catalog issues).
pub fn new_sample_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Pick the display name for a new sample.
///
/// A non-blank custom name wins, then the suggested (file) name, then
/// [`DEFAULT_SAMPLE_NAME`].
pub fn resolve_name(suggested_name: &str, custom_name: Option<&str>) -> String {
    custom_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .or_else(|| Some(suggested_name.trim()).filter(|name| !name.is_empty()))
        .unwrap_or(DEFAULT_SAMPLE_NAME)
        .to_owned()
}

fn default_media_type() -> String {
    DEFAULT_MEDIA_TYPE.to_owned()
}
