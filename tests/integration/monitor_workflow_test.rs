// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{fast_fetcher, page};
use sitewatch::domain::models::site::SiteConfig;
use sitewatch::domain::repositories::snapshot_repository::SnapshotStore;
use sitewatch::domain::services::monitor::{Monitor, SiteStatus};
use sitewatch::infrastructure::storage::JsonFileSnapshotStore;
use std::collections::BTreeSet;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn set(lines: &[&str]) -> BTreeSet<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_two_passes_detect_changes_and_persist_snapshots() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/example"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(&["Hello", "World"])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/example"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(&["Hello", "Foo"])))
        .mount(&server)
        .await;

    let data_dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileSnapshotStore::new(data_dir.path()));
    let site = SiteConfig::new(
        "Example",
        format!("{}/example", server.uri()),
        vec!["p".to_string()],
    );
    let monitor = Monitor::new(Arc::new(fast_fetcher()), store.clone(), vec![site]);

    let first = monitor.run().await;
    assert!(matches!(first.outcomes[0].status, SiteStatus::Baseline));
    assert!(data_dir.path().join("example.json").exists());

    let changes = monitor.start_monitoring().await;
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].website, "Example");
    assert_eq!(changes[0].added, set(&["Foo"]));
    assert_eq!(changes[0].removed, set(&["World"]));
    assert_eq!(changes[0].change_percentage, 66.67);
    assert!(changes[0].previous_check <= changes[0].timestamp);

    let stored = store.load("Example").await.unwrap().unwrap();
    assert_eq!(stored.content, "Hello\nFoo");

    monitor.close();
}

#[tokio::test]
async fn test_snapshots_survive_a_new_monitor_instance() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(&["Stable"])))
        .mount(&server)
        .await;

    let data_dir = tempfile::tempdir().unwrap();
    let site = SiteConfig::new("Stable Site", server.uri(), vec!["p".to_string()]);

    let first = Monitor::new(
        Arc::new(fast_fetcher()),
        Arc::new(JsonFileSnapshotStore::new(data_dir.path())),
        vec![site.clone()],
    );
    assert!(matches!(first.run().await.outcomes[0].status, SiteStatus::Baseline));
    first.close();

    let second = Monitor::new(
        Arc::new(fast_fetcher()),
        Arc::new(JsonFileSnapshotStore::new(data_dir.path())),
        vec![site],
    );
    let run = second.run().await;
    assert!(matches!(run.outcomes[0].status, SiteStatus::Unchanged));
    assert!(data_dir.path().join("stable_site.json").exists());
}

#[tokio::test]
async fn test_unreachable_site_is_isolated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/up"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(&["Up"])))
        .mount(&server)
        .await;

    let data_dir = tempfile::tempdir().unwrap();
    let sites = vec![
        SiteConfig::new("Down", format!("{}/down", server.uri()), vec!["p".to_string()]),
        SiteConfig::new("Up", format!("{}/up", server.uri()), vec!["p".to_string()]),
    ];
    let monitor = Monitor::new(
        Arc::new(fast_fetcher()),
        Arc::new(JsonFileSnapshotStore::new(data_dir.path())),
        sites,
    );

    let run = monitor.run().await;

    assert_eq!(run.failure_count(), 1);
    assert!(matches!(run.outcomes[0].status, SiteStatus::Failed(_)));
    assert!(matches!(run.outcomes[1].status, SiteStatus::Baseline));
    assert!(!data_dir.path().join("down.json").exists());
    assert!(data_dir.path().join("up.json").exists());
}

#[tokio::test]
async fn test_corrupt_snapshot_is_replaced_by_fresh_baseline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(&["Fresh"])))
        .mount(&server)
        .await;

    let data_dir = tempfile::tempdir().unwrap();
    std::fs::write(data_dir.path().join("example.json"), b"not json at all").unwrap();
    let store = Arc::new(JsonFileSnapshotStore::new(data_dir.path()));
    let site = SiteConfig::new("Example", server.uri(), vec!["p".to_string()]);
    let monitor = Monitor::new(Arc::new(fast_fetcher()), store.clone(), vec![site]);

    let run = monitor.run().await;

    assert!(matches!(run.outcomes[0].status, SiteStatus::Baseline));
    assert_eq!(store.load("Example").await.unwrap().unwrap().content, "Fresh");
}
