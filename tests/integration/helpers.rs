//! Shared helpers for integration tests.

use std::sync::Arc;

use serde_json::json;
use vaani::store::{DEFAULT_STORAGE_KEY, FsBackend};
use vaani::{HttpCatalog, RemoteCatalog, SampleLibrary, SampleStore};
use vaani::config::RemoteConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Filesystem-backed store rooted in `dir`.
pub(crate) fn fs_store(dir: &tempfile::TempDir) -> SampleStore {
    let backend = FsBackend::new(dir.path()).expect("create fs backend");
    SampleStore::new(Arc::new(backend), DEFAULT_STORAGE_KEY)
}

/// HTTP catalog pointed at `{server}/api`.
pub(crate) fn catalog_for(server: &MockServer) -> Arc<dyn RemoteCatalog> {
    let config = RemoteConfig {
        timeout_secs: 2,
        ..Default::default()
    };
    let catalog =
        HttpCatalog::new(&format!("{}/api", server.uri()), &config).expect("build catalog");
    Arc::new(catalog)
}

/// A fresh library session over `dir` talking to `server`.
pub(crate) fn session(dir: &tempfile::TempDir, server: &MockServer) -> SampleLibrary {
    SampleLibrary::new(fs_store(dir), Some(catalog_for(server)))
}

/// Descriptor in the shape the backend returns.
pub(crate) fn descriptor(id: &str, name: &str, size: usize) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "filename": format!("{id}.wav"),
        "size": size,
        "type": "audio/wav",
        "createdAt": "2024-06-01T12:00:00.000000Z",
        "url": format!("/api/voices/{id}/file"),
    })
}

/// Mount `GET /api/voices` returning `samples`.
pub(crate) async fn mount_listing(server: &MockServer, samples: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path("/api/voices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "samples": samples })))
        .mount(server)
        .await;
}

/// Mount `GET /api/voices` failing with `status`.
pub(crate) async fn mount_outage(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/api/voices"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Deterministic fake audio of `len` bytes.
pub(crate) fn clip(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 % 256) as u8).collect()
}
