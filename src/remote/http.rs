//! HTTP implementation of [`RemoteCatalog`].
//!
//! Speaks the backend's voice-library contract:
//!
//! - `GET {base}/voices` → `200 {"samples": [descriptor, ...]}`
//! - `POST {base}/voices` (multipart `voice` file + `name`) → `200/201 descriptor`
//! - `GET {url}` → payload bytes, where relative `url`s resolve against `base`

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use url::Url;

use super::{RemoteCatalog, RemoteDescriptor};
use crate::config::RemoteConfig;
use crate::error::LibraryError;
use crate::sample::Sample;

#[derive(Debug, Deserialize)]
struct ListResponse {
    samples: Vec<serde_json::Value>,
}

/// [`RemoteCatalog`] backed by the voice-library HTTP API.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    base: Url,
}

impl HttpCatalog {
    /// Build a catalog client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Config`] if the URL does not parse or the
    /// HTTP client cannot be constructed.
    pub fn new(base_url: &str, config: &RemoteConfig) -> Result<Self, LibraryError> {
        let base = Url::parse(base_url)
            .map_err(|e| LibraryError::Config(format!("invalid catalog URL {base_url}: {e}")))?;
        Ok(Self {
            client: build_client(config)?,
            base,
        })
    }

    /// Catalog built from `config`, or `None` when no base URL is configured.
    ///
    /// # Errors
    ///
    /// Same as [`HttpCatalog::new`].
    pub fn from_config(config: &RemoteConfig) -> Result<Option<Self>, LibraryError> {
        config
            .base_url
            .as_deref()
            .map(|base| Self::new(base, config))
            .transpose()
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn voices_url(&self) -> String {
        format!("{}/voices", self.base.as_str().trim_end_matches('/'))
    }

    /// Resolve a locator: absolute URLs pass through, paths join the base.
    pub fn resolve(&self, remote_ref: &str) -> Result<Url, LibraryError> {
        self.base
            .join(remote_ref)
            .map_err(|e| LibraryError::Unreachable(format!("invalid sample locator: {e}")))
    }
}

/// Build the [`reqwest::Client`] used for catalog requests.
///
/// # Errors
///
/// Returns [`LibraryError::Config`] if the client cannot be constructed.
pub fn build_client(config: &RemoteConfig) -> Result<reqwest::Client, LibraryError> {
    let ua = match config.user_agent {
        Some(ref custom) => custom.clone(),
        None => format!("vaani/{}", env!("CARGO_PKG_VERSION")),
    };

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(ua)
        .build()
        .map_err(|e| LibraryError::Config(format!("failed to build HTTP client: {e}")))
}

fn unreachable_err(action: &str, err: impl std::fmt::Display) -> LibraryError {
    LibraryError::Unreachable(format!("{action}: {err}"))
}

#[async_trait]
impl RemoteCatalog for HttpCatalog {
    async fn list(&self) -> Result<Vec<Sample>, LibraryError> {
        let response = self
            .client
            .get(self.voices_url())
            .send()
            .await
            .map_err(|e| unreachable_err("list voices", e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(unreachable_err("list voices", format!("HTTP {status}")));
        }

        let body: ListResponse = response
            .json()
            .await
            .map_err(|e| unreachable_err("list voices", e))?;

        let samples = body
            .samples
            .into_iter()
            .filter_map(
                |entry| match serde_json::from_value::<RemoteDescriptor>(entry) {
                    Ok(d) => Some(Sample::from(d)),
                    Err(e) => {
                        tracing::warn!(error = %e, "skipping undecodable catalog entry");
                        None
                    }
                },
            )
            .collect::<Vec<_>>();
        tracing::debug!(count = samples.len(), "catalog listed samples");
        Ok(samples)
    }

    async fn create(
        &self,
        bytes: &[u8],
        media_type: &str,
        name: &str,
    ) -> Result<Sample, LibraryError> {
        let part = Part::bytes(bytes.to_vec()).file_name(name.to_owned());
        let part = match part.mime_str(media_type) {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!(media_type, error = %e, "unparseable media type, uploading untyped");
                Part::bytes(bytes.to_vec()).file_name(name.to_owned())
            }
        };
        let form = Form::new().part("voice", part).text("name", name.to_owned());

        let response = self
            .client
            .post(self.voices_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| unreachable_err("upload voice", e))?;

        let status = response.status();
        if !matches!(status, StatusCode::OK | StatusCode::CREATED) {
            return Err(unreachable_err("upload voice", format!("HTTP {status}")));
        }

        let descriptor: RemoteDescriptor = response
            .json()
            .await
            .map_err(|e| unreachable_err("upload voice", e))?;
        tracing::debug!(id = %descriptor.id, size = bytes.len(), "catalog accepted sample");
        Ok(descriptor.into())
    }

    async fn fetch(&self, remote_ref: &str) -> Result<Bytes, LibraryError> {
        let url = self.resolve(remote_ref)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| unreachable_err("fetch voice", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unreachable_err("fetch voice", format!("HTTP {status}")));
        }
        response
            .bytes()
            .await
            .map_err(|e| unreachable_err("fetch voice", e))
    }
}
