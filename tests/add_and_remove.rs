//! Tests for the add/remove/reset commands.
//!
//! `add` must never leave half-state behind: a domain is either fully
//! registered with a committed baseline, or absent along with its files.

mod helpers;

use std::sync::Arc;

use helpers::{commit_snapshot, seed_registry, test_config, to_set, StubSource};
use subwatch::app;
use subwatch::registry::DomainRegistry;
use subwatch::snapshot::SnapshotStore;
use tempfile::TempDir;

#[tokio::test]
async fn test_add_normalizes_registers_and_commits_baseline() {
    let dir = TempDir::new().expect("temp dir");
    let config = test_config(dir.path());
    let source = Arc::new(
        StubSource::new().answers("example.com", &["a.example.com", "b.example.com"]),
    );

    // URL input reduces to the registrable domain.
    app::add_domain(&config, source, "https://www.example.com/login", true)
        .await
        .expect("add should succeed");

    let registry = DomainRegistry::new(dir.path());
    assert_eq!(registry.list().unwrap(), vec!["example.com".to_string()]);

    let store = SnapshotStore::new(dir.path());
    assert_eq!(
        store.load("example.com").unwrap(),
        to_set(&["a.example.com", "b.example.com"])
    );
    assert!(!store.has_staged("example.com"));
}

#[tokio::test]
async fn test_add_rejects_already_monitored_domain() {
    let dir = TempDir::new().expect("temp dir");
    seed_registry(dir.path(), &["example.com"]);
    let config = test_config(dir.path());
    let source = Arc::new(StubSource::new().answers("example.com", &["a.example.com"]));

    let error = app::add_domain(&config, source, "example.com", true)
        .await
        .expect_err("duplicate add must fail");
    assert!(error.to_string().contains("already being monitored"));

    // The lookup never ran, so no baseline appeared.
    assert!(!SnapshotStore::new(dir.path()).exists("example.com"));
}

#[tokio::test]
async fn test_add_rejects_domain_with_no_subdomains() {
    let dir = TempDir::new().expect("temp dir");
    let config = test_config(dir.path());
    let source = Arc::new(StubSource::new().answers("example.com", &[]));

    let error = app::add_domain(&config, source, "example.com", true)
        .await
        .expect_err("empty baseline must be rejected");
    assert!(error.to_string().contains("Could not find any subdomains"));

    assert!(DomainRegistry::new(dir.path()).list().unwrap().is_empty());
    assert!(!SnapshotStore::new(dir.path()).exists("example.com"));
}

#[tokio::test]
async fn test_add_rejects_domain_when_lookup_fails() {
    let dir = TempDir::new().expect("temp dir");
    let config = test_config(dir.path());
    let source = Arc::new(StubSource::new().fails("example.com"));

    let error = app::add_domain(&config, source, "example.com", true)
        .await
        .expect_err("failed baseline lookup must be rejected");
    assert!(error.to_string().contains("Baseline lookup"));

    assert!(DomainRegistry::new(dir.path()).list().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_rejects_input_without_registrable_domain() {
    let dir = TempDir::new().expect("temp dir");
    let config = test_config(dir.path());
    let source = Arc::new(StubSource::new());

    let result = app::add_domain(&config, source, "localhost", true).await;
    assert!(result.is_err());
    assert!(DomainRegistry::new(dir.path()).list().unwrap().is_empty());
}

#[test]
fn test_remove_deletes_entry_and_snapshots() {
    let dir = TempDir::new().expect("temp dir");
    seed_registry(dir.path(), &["example.com", "example.org"]);
    commit_snapshot(dir.path(), "example.com", &["a.example.com"]);
    let store = SnapshotStore::new(dir.path());
    store
        .stage("example.com", &to_set(&["b.example.com"]))
        .unwrap();
    let config = test_config(dir.path());

    // www. prefix reduces to the registered domain.
    app::remove_domain(&config, "www.example.com").expect("remove should succeed");

    assert_eq!(
        DomainRegistry::new(dir.path()).list().unwrap(),
        vec!["example.org".to_string()]
    );
    assert!(!store.exists("example.com"));
    assert!(!store.has_staged("example.com"));
}

#[test]
fn test_remove_unknown_domain_fails() {
    let dir = TempDir::new().expect("temp dir");
    seed_registry(dir.path(), &["example.org"]);
    let config = test_config(dir.path());

    let error = app::remove_domain(&config, "example.com").expect_err("unknown remove must fail");
    assert!(error.to_string().contains("not being monitored"));
    // The registry is untouched.
    assert_eq!(
        DomainRegistry::new(dir.path()).list().unwrap(),
        vec!["example.org".to_string()]
    );
}

#[test]
fn test_reset_clears_registry_and_snapshots() {
    let dir = TempDir::new().expect("temp dir");
    seed_registry(dir.path(), &["example.com", "example.org"]);
    commit_snapshot(dir.path(), "example.com", &["a.example.com"]);
    commit_snapshot(dir.path(), "example.org", &["b.example.org"]);
    let config = test_config(dir.path());

    app::reset(&config, true).expect("reset should succeed");

    assert!(DomainRegistry::new(dir.path()).list().unwrap().is_empty());
    let store = SnapshotStore::new(dir.path());
    assert!(!store.exists("example.com"));
    assert!(!store.exists("example.org"));
}
