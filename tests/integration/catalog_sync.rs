//! Dual-write and merge behaviour against an HTTP catalog.

use serde_json::json;
use vaani::Availability;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::{clip, descriptor, mount_listing, session};

#[tokio::test]
async fn add_uploads_and_keeps_inline_copy() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    mount_listing(&server, vec![]).await;
    Mock::given(method("POST"))
        .and(path("/api/voices"))
        .and(body_string_contains("Narrator"))
        .respond_with(ResponseTemplate::new(201).set_body_json(descriptor("srv1", "Narrator", 16)))
        .expect(1)
        .mount(&server)
        .await;

    let library = session(&dir, &server);
    library.list().await;
    let sample = library
        .add(&clip(16), "audio/wav", "clip.wav", Some("Narrator"))
        .await;

    assert_eq!(sample.id, "srv1");
    assert_eq!(sample.availability(), Availability::Both);

    // No file route is mounted, so this must be served from the inline copy.
    let payload = library.get_payload("srv1").await.unwrap();
    assert_eq!(payload.bytes.as_ref(), clip(16).as_slice());
}

#[tokio::test]
async fn upload_failure_keeps_local_descriptor() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    mount_listing(&server, vec![]).await;
    Mock::given(method("POST"))
        .and(path("/api/voices"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "disk full"})))
        .expect(1)
        .mount(&server)
        .await;

    let library = session(&dir, &server);
    library.list().await;
    let sample = library.add(b"abcd", "audio/wav", "clip.wav", None).await;

    assert_eq!(sample.availability(), Availability::Inline);
    assert_eq!(sample.name, "clip.wav");
    assert_eq!(library.list().await.len(), 1);
}

#[tokio::test]
async fn remote_metadata_wins_and_inline_is_backfilled() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    mount_listing(&server, vec![]).await;
    Mock::given(method("POST"))
        .and(path("/api/voices"))
        .respond_with(ResponseTemplate::new(201).set_body_json(descriptor("s1", "Original", 4)))
        .mount(&server)
        .await;

    let library = session(&dir, &server);
    library.list().await;
    library.add(b"abcd", "audio/wav", "Original", None).await;

    server.reset().await;
    mount_listing(&server, vec![descriptor("s1", "Renamed On Server", 4)]).await;

    let listed = library.list().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Renamed On Server");
    assert_eq!(listed[0].availability(), Availability::Both);
}

#[tokio::test]
async fn delete_hides_locally_but_remote_copy_returns() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    mount_listing(&server, vec![descriptor("b", "B", 4)]).await;

    let library = session(&dir, &server);
    library.add(b"local", "audio/wav", "local.wav", None).await;
    let before = library.list().await;
    assert_eq!(before.len(), 2);

    for sample in &before {
        library.delete(&sample.id).await;
    }
    let after = library.list().await;
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].id, "b");
}

#[tokio::test]
async fn remote_only_sample_is_fetched() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    mount_listing(&server, vec![descriptor("b", "B", 4)]).await;
    Mock::given(method("GET"))
        .and(path("/api/voices/b/file"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"RIFF".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let library = session(&dir, &server);
    let payload = library.get_payload("b").await.unwrap();
    assert_eq!(payload.bytes.as_ref(), b"RIFF");
    assert_eq!(payload.media_type, "audio/wav");
    assert_eq!(payload.file_name, "B");
}

#[tokio::test]
async fn rename_is_not_sent_to_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    mount_listing(&server, vec![descriptor("b", "B", 4)]).await;

    let library = session(&dir, &server);
    library.rename("b", "Local Name").await;
    // Remote-only entry: nothing stored locally to rename.
    assert_eq!(library.list().await[0].name, "B");

    let received = server.received_requests().await.unwrap();
    assert!(received.iter().all(|r| r.method.as_str() == "GET"));
}

#[tokio::test]
async fn inline_payload_skips_slow_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/voices"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "samples": [] }))
                .set_delay(std::time::Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let library = session(&dir, &server);
    library.list().await;
    let sample = library.add(b"abcd", "audio/wav", "clip.wav", None).await;
    let requests_before = server.received_requests().await.unwrap().len();

    let started = std::time::Instant::now();
    let payload = library.get_payload(&sample.id).await.unwrap();

    assert_eq!(payload.bytes.as_ref(), b"abcd");
    assert!(started.elapsed() < std::time::Duration::from_millis(1000));
    assert_eq!(server.received_requests().await.unwrap().len(), requests_before);
}
