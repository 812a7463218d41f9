//! The library keeps working with the catalog down, and picks remote
//! samples up once the catalog answers.

use vaani::{Availability, LibraryError, Reachability, SampleLibrary};
use wiremock::MockServer;

use crate::helpers::{clip, descriptor, fs_store, mount_listing, mount_outage, session};

#[tokio::test]
async fn add_offline_then_catalog_comes_back_in_new_session() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    mount_outage(&server, 503).await;

    let library = session(&dir, &server);
    let bytes = clip(1000);
    let a = library.add(&bytes, "audio/wav", "A", None).await;

    let listed = library.list().await;
    assert_eq!(library.reachability(), Reachability::Unreachable);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "A");
    assert_eq!(listed[0].size, 1000);
    assert_eq!(
        library.get_payload(&a.id).await.unwrap().bytes.as_ref(),
        bytes.as_slice()
    );
    drop(library);

    server.reset().await;
    mount_listing(&server, vec![descriptor("b", "B", 4)]).await;

    let next_session = session(&dir, &server);
    let names: Vec<String> = next_session
        .list()
        .await
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, ["B", "A"]);
    assert_eq!(next_session.reachability(), Reachability::Reachable);
}

#[tokio::test]
async fn explicit_reprobe_picks_up_recovered_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    mount_outage(&server, 500).await;

    let library = session(&dir, &server);
    library.add(&clip(1000), "audio/wav", "A", None).await;
    assert_eq!(library.list().await.len(), 1);

    server.reset().await;
    mount_listing(&server, vec![descriptor("b", "B", 4)]).await;

    // Without a reprobe the verdict sticks for the session.
    assert_eq!(library.list().await.len(), 1);

    library.reprobe();
    assert_eq!(library.list().await.len(), 2);
}

#[tokio::test]
async fn no_catalog_configured_is_pure_local() {
    let dir = tempfile::tempdir().unwrap();
    let library = SampleLibrary::local_only(fs_store(&dir));

    let sample = library.add(b"xyz", "audio/wav", "x.wav", None).await;
    assert_eq!(sample.availability(), Availability::Inline);
    assert_eq!(library.list().await.len(), 1);
    assert_eq!(library.reachability(), Reachability::Unreachable);
}

#[tokio::test]
async fn local_samples_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let first = SampleLibrary::local_only(fs_store(&dir));
    let sample = first.add(&clip(64), "audio/wav", "clip.wav", Some("Mine")).await;
    first.rename(&sample.id, "Renamed").await;
    drop(first);

    let second = SampleLibrary::local_only(fs_store(&dir));
    let listed = second.list().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Renamed");
    assert_eq!(second.get_payload(&sample.id).await.unwrap().bytes.len(), 64);
}

#[tokio::test]
async fn remote_only_sample_fetch_failure_is_unreachable() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    mount_listing(&server, vec![descriptor("b", "B", 4)]).await;

    let library = session(&dir, &server);
    let listed = library.list().await;
    assert_eq!(listed[0].availability(), Availability::Remote);

    // No file route mounted: the fetch fails.
    let err = library.get_payload("b").await.unwrap_err();
    assert!(matches!(err, LibraryError::Unreachable(_)));
}
