// Shared test helpers: stub source, collecting notifier, state-dir seeding.
//
// These let the scan pipeline run end-to-end against a temp directory with
// no certificate-transparency database and no Slack workspace.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use subwatch::config::{Config, LogLevel};
use subwatch::diff::DiscoveryEvent;
use subwatch::domain::SubdomainSet;
use subwatch::error_handling::{NotifyError, SourceError};
use subwatch::notify::Notifier;
use subwatch::registry::DomainRegistry;
use subwatch::resolve::ResolutionResult;
use subwatch::snapshot::SnapshotStore;
use subwatch::source::SubdomainSource;

/// Config pointed at a temp state dir, quiet and without post pauses.
#[allow(dead_code)] // Used by other test files
pub fn test_config(state_dir: &Path) -> Config {
    Config {
        state_dir: state_dir.to_path_buf(),
        log_level: LogLevel::Error,
        post_delay: None,
        ..Config::default()
    }
}

#[allow(dead_code)] // Used by other test files
pub fn to_set(hosts: &[&str]) -> SubdomainSet {
    hosts.iter().map(|h| h.to_string()).collect()
}

/// Registers domains directly, bypassing the `add` command's baseline scan.
#[allow(dead_code)] // Used by other test files
pub fn seed_registry(state_dir: &Path, domains: &[&str]) {
    let registry = DomainRegistry::new(state_dir);
    for domain in domains {
        registry.add(domain).expect("failed to seed registry");
    }
}

/// Writes a committed snapshot for a domain.
#[allow(dead_code)] // Used by other test files
pub fn commit_snapshot(state_dir: &Path, domain: &str, hosts: &[&str]) {
    let store = SnapshotStore::new(state_dir);
    store
        .stage(domain, &to_set(hosts))
        .expect("failed to stage snapshot");
    store.commit(domain).expect("failed to commit snapshot");
}

/// Canned per-domain answers; unknown domains fail the lookup.
#[derive(Default)]
pub struct StubSource {
    answers: HashMap<String, Option<SubdomainSet>>,
}

#[allow(dead_code)] // Used by other test files
impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lookup for `domain` succeeds with these hostnames.
    pub fn answers(mut self, domain: &str, hosts: &[&str]) -> Self {
        self.answers.insert(domain.to_string(), Some(to_set(hosts)));
        self
    }

    /// The lookup for `domain` fails.
    pub fn fails(mut self, domain: &str) -> Self {
        self.answers.insert(domain.to_string(), None);
        self
    }
}

#[async_trait::async_trait]
impl SubdomainSource for StubSource {
    async fn lookup(&self, domain: &str) -> Result<SubdomainSet, SourceError> {
        match self.answers.get(domain) {
            Some(Some(set)) => Ok(set.clone()),
            Some(None) => Err(SourceError::HttpStatus(reqwest::StatusCode::BAD_GATEWAY)),
            None => Err(SourceError::HttpStatus(
                reqwest::StatusCode::SERVICE_UNAVAILABLE,
            )),
        }
    }
}

/// What a notifier was asked to deliver, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Discovery { hostname: String, resolved: bool },
    NoChanges,
    Error(String),
}

/// Records every delivery instead of posting anywhere.
#[derive(Default)]
pub struct CollectingNotifier {
    deliveries: Mutex<Vec<Delivery>>,
    fail_deliveries: bool,
}

#[allow(dead_code)] // Used by other test files
impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose discovery and no-changes deliveries fail.
    pub fn failing() -> Self {
        Self {
            deliveries: Mutex::new(Vec::new()),
            fail_deliveries: true,
        }
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries
            .lock()
            .expect("deliveries lock poisoned")
            .clone()
    }
}

#[async_trait::async_trait]
impl Notifier for CollectingNotifier {
    async fn notify_discovery(
        &self,
        event: &DiscoveryEvent,
        resolution: Option<&ResolutionResult>,
    ) -> Result<(), NotifyError> {
        if self.fail_deliveries {
            return Err(NotifyError::Status(reqwest::StatusCode::TOO_MANY_REQUESTS));
        }
        self.deliveries
            .lock()
            .expect("deliveries lock poisoned")
            .push(Delivery::Discovery {
                hostname: event.hostname.clone(),
                resolved: resolution.is_some(),
            });
        Ok(())
    }

    async fn notify_no_changes(&self) -> Result<(), NotifyError> {
        if self.fail_deliveries {
            return Err(NotifyError::Status(reqwest::StatusCode::TOO_MANY_REQUESTS));
        }
        self.deliveries
            .lock()
            .expect("deliveries lock poisoned")
            .push(Delivery::NoChanges);
        Ok(())
    }

    async fn notify_error(&self, message: &str) {
        self.deliveries
            .lock()
            .expect("deliveries lock poisoned")
            .push(Delivery::Error(message.to_string()));
    }
}
