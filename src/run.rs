//! Scan orchestration.
//!
//! One scan walks the whole registry in five phases:
//!
//! 1. Concurrent per-domain lookups (bounded by a semaphore), each staging
//!    its result next to the committed snapshot without touching it
//! 2. A sequential diff pass comparing staged against committed snapshots;
//!    domains scanned for the first time commit immediately as baseline
//! 3. One batched notification pass over all discoveries, sorted by
//!    hostname, optionally resolving each name first
//! 4. A commit pass promoting every remaining staged snapshot
//! 5. A sweep deleting any staged file left behind by an interrupted run
//!
//! Notifications happen before commits on purpose: if delivery crashes, the
//! old snapshots are still committed and the next scan re-discovers (and
//! re-notifies) the same names. Duplicate alerts are recoverable, silently
//! swallowed ones are not.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, info, warn};

use crate::config::Config;
use crate::diff::{self, DiscoveryEvent};
use crate::error_handling::{ErrorType, InfoType, ScanStats, WarningType};
use crate::initialization::{init_resolver, init_semaphore};
use crate::notify::Notifier;
use crate::registry::DomainRegistry;
use crate::resolve::{self, RecordOutcome, ResolutionResult};
use crate::snapshot::SnapshotStore;
use crate::source::SubdomainSource;

/// Summary of one scan run.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Number of monitored domains
    pub domains: usize,
    /// Domains whose lookup succeeded and produced a staged snapshot
    pub staged: usize,
    /// Domains whose lookup answered but knew of no subdomains
    pub no_data: usize,
    /// Domains that failed (lookup, staging, diff, or commit)
    pub failed: usize,
    /// Newly discovered subdomains across all domains
    pub discoveries: usize,
    /// Discoveries actually delivered (differs from `discoveries` when
    /// resolution filtering drops names without DNS records)
    pub notified: usize,
    /// Wall-clock duration of the scan
    pub elapsed_seconds: f64,
}

enum TaskOutcome {
    Staged {
        domain: String,
        had_baseline: bool,
    },
    NoData,
    Failed {
        domain: String,
        error: String,
    },
}

/// Runs one full scan over every monitored domain.
///
/// The subdomain source and notifier are injected so the pipeline can be
/// exercised end-to-end without a database or a Slack workspace; production
/// wiring lives in `main`.
///
/// # Arguments
///
/// * `config` - Runtime configuration
/// * `source` - Where subdomain lookups are answered
/// * `notifier` - Where findings and errors are delivered
/// * `stats` - Shared counters, also fed by the source (fallback tracking)
///
/// # Returns
///
/// A `ScanReport` with summary statistics, or an error if the scan could
/// not run at all (empty registry, unreadable state directory).
///
/// # Errors
///
/// Individual domain failures never abort the scan; they are counted,
/// logged, and optionally forwarded to the error webhook. Only a registry
/// that cannot be read or is empty is fatal.
pub async fn run_scan(
    config: &Config,
    source: Arc<dyn SubdomainSource>,
    notifier: Arc<dyn Notifier>,
    stats: Arc<ScanStats>,
) -> Result<ScanReport> {
    let start_time = Instant::now();

    let registry = DomainRegistry::new(&config.state_dir);
    let domains = registry
        .list()
        .context("Failed to read the domain registry")?;
    if domains.is_empty() {
        anyhow::bail!("No domains are being monitored; add one with 'subwatch add <domain>'");
    }
    info!("Checking {} domain(s) for new subdomains", domains.len());

    let store = Arc::new(SnapshotStore::new(&config.state_dir));
    let semaphore = init_semaphore(config.workers.max(1));
    let mut tasks = FuturesUnordered::new();

    for domain in &domains {
        let permit = match Arc::clone(&semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                warn!("Semaphore closed, skipping domain: {}", domain);
                continue;
            }
        };

        let domain = domain.clone();
        let source = Arc::clone(&source);
        let store = Arc::clone(&store);
        let stats = Arc::clone(&stats);
        tasks.push(tokio::spawn(async move {
            let _permit = permit;
            scan_domain(domain, source, store, stats).await
        }));
    }

    let mut staged: Vec<(String, bool)> = Vec::new();
    let mut no_data = 0usize;
    let mut failed = 0usize;
    let mut failures: Vec<(String, String)> = Vec::new();

    while let Some(task_result) = tasks.next().await {
        match task_result {
            Ok(TaskOutcome::Staged {
                domain,
                had_baseline,
            }) => staged.push((domain, had_baseline)),
            Ok(TaskOutcome::NoData) => no_data += 1,
            Ok(TaskOutcome::Failed { domain, error }) => {
                failed += 1;
                failures.push((domain, error));
            }
            Err(join_error) => {
                failed += 1;
                warn!("Lookup task panicked: {:?}", join_error);
            }
        }
    }

    if config.log_errors {
        for (domain, error) in &failures {
            notifier.notify_error(&format!("{}: {}", domain, error)).await;
        }
    }

    // Diff pass. Sorted so notification order is deterministic across runs.
    staged.sort_by(|a, b| a.0.cmp(&b.0));
    let mut discoveries: Vec<DiscoveryEvent> = Vec::new();
    let mut to_commit: Vec<String> = Vec::new();

    for (domain, had_baseline) in &staged {
        if !*had_baseline {
            // First snapshot for this domain: everything would be "new", so
            // it becomes the baseline without notifications.
            match store.commit(domain) {
                Ok(()) => {
                    stats.increment_info(InfoType::BaselineCommit);
                    info!("Established baseline snapshot for {}", domain);
                }
                Err(e) => {
                    failed += 1;
                    stats.increment_error(ErrorType::SnapshotCommitError);
                    warn!("Failed to commit baseline for {}: {}", domain, e);
                }
            }
            continue;
        }

        let previous = match store.load(domain) {
            Ok(set) => set,
            Err(e) => {
                failed += 1;
                warn!("Failed to load committed snapshot for {}: {}", domain, e);
                continue;
            }
        };
        let current = match store.load_staged(domain) {
            Ok(set) => set,
            Err(e) => {
                failed += 1;
                warn!("Failed to load staged snapshot for {}: {}", domain, e);
                continue;
            }
        };

        let new = diff::new_subdomains(&previous, &current);
        debug!(
            "{}: {} known, {} staged, {} new",
            domain,
            previous.len(),
            current.len(),
            new.len()
        );
        for hostname in new {
            discoveries.push(DiscoveryEvent {
                domain: domain.clone(),
                hostname,
            });
        }
        to_commit.push(domain.clone());
    }

    discoveries.sort_by(|a, b| a.hostname.cmp(&b.hostname));

    // Notification pass.
    let mut notified = 0usize;
    if discoveries.is_empty() {
        info!("No new subdomains found");
        if let Err(e) = notifier.notify_no_changes().await {
            stats.increment_error(ErrorType::NotifyDeliveryError);
            warn!("Failed to deliver no-changes notification: {}", e);
            notifier
                .notify_error(&format!("Failed to deliver no-changes notification: {}", e))
                .await;
        }
    } else if config.resolve {
        info!(
            "Resolving {} new subdomain(s) before notifying",
            discoveries.len()
        );
        let resolver = init_resolver();
        for event in &discoveries {
            let resolution = resolve::resolve_host(&resolver, &event.hostname).await;
            record_resolution_stats(&stats, &resolution);
            if !resolution.has_records() {
                debug!("Skipping {} (no DNS records)", event.hostname);
                continue;
            }
            deliver(
                notifier.as_ref(),
                event,
                Some(&resolution),
                &stats,
                &mut notified,
            )
            .await;
        }
    } else {
        for event in &discoveries {
            deliver(notifier.as_ref(), event, None, &stats, &mut notified).await;
        }
    }

    // Commit pass: staged snapshots become the baseline for the next scan.
    for domain in &to_commit {
        match store.commit(domain) {
            Ok(()) => debug!("Committed snapshot for {}", domain),
            Err(e) => {
                failed += 1;
                stats.increment_error(ErrorType::SnapshotCommitError);
                warn!("Failed to commit snapshot for {}: {}", domain, e);
            }
        }
    }

    // Anything still staged belongs to a failed commit or an interrupted
    // earlier run; the data is re-fetchable, so sweep it.
    match store.sweep_staged() {
        Ok(0) => {}
        Ok(swept) => {
            warn!("Swept {} stale staged snapshot(s)", swept);
            for _ in 0..swept {
                stats.increment_warning(WarningType::StaleStagingSwept);
            }
        }
        Err(e) => warn!("Failed to sweep staged snapshots: {}", e),
    }

    stats.log_summary();
    let elapsed_seconds = start_time.elapsed().as_secs_f64();

    Ok(ScanReport {
        domains: domains.len(),
        staged: staged.len(),
        no_data,
        failed,
        discoveries: discoveries.len(),
        notified,
        elapsed_seconds,
    })
}

/// Looks up one domain and stages the result. Never touches the committed
/// snapshot; that is the diff/commit passes' job.
async fn scan_domain(
    domain: String,
    source: Arc<dyn SubdomainSource>,
    store: Arc<SnapshotStore>,
    stats: Arc<ScanStats>,
) -> TaskOutcome {
    info!("Checking {}", domain);
    let had_baseline = store.exists(&domain);

    match source.lookup(&domain).await {
        Ok(set) if set.is_empty() => {
            // An answered-but-empty lookup is data, not a fault. Nothing is
            // staged: certificate logs are append-only, so "no subdomains"
            // for a baselined domain can only mean the source answered from
            // a bad replica, and overwriting the baseline would be wrong.
            info!("{}: no subdomains known to certificate transparency", domain);
            stats.increment_info(InfoType::EmptyLookup);
            TaskOutcome::NoData
        }
        Ok(set) => {
            debug!("{}: lookup returned {} name(s)", domain, set.len());
            match store.stage(&domain, &set) {
                Ok(()) => TaskOutcome::Staged {
                    domain,
                    had_baseline,
                },
                Err(e) => {
                    stats.increment_error(ErrorType::SnapshotStageError);
                    warn!("Failed to stage snapshot for {}: {}", domain, e);
                    TaskOutcome::Failed {
                        error: e.to_string(),
                        domain,
                    }
                }
            }
        }
        Err(e) => {
            stats.increment_error(ErrorType::SourceLookupError);
            warn!("Lookup failed for {}: {}", domain, e);
            TaskOutcome::Failed {
                error: e.to_string(),
                domain,
            }
        }
    }
}

async fn deliver(
    notifier: &dyn Notifier,
    event: &DiscoveryEvent,
    resolution: Option<&ResolutionResult>,
    stats: &ScanStats,
    notified: &mut usize,
) {
    info!("New subdomain for {}: {}", event.domain, event.hostname);
    match notifier.notify_discovery(event, resolution).await {
        Ok(()) => *notified += 1,
        Err(e) => {
            stats.increment_error(ErrorType::NotifyDeliveryError);
            warn!("Failed to notify about {}: {}", event.hostname, e);
            notifier
                .notify_error(&format!(
                    "Failed to deliver notification for {}: {}",
                    event.hostname, e
                ))
                .await;
        }
    }
}

fn record_resolution_stats(stats: &ScanStats, resolution: &ResolutionResult) {
    if resolution.a == RecordOutcome::TimedOut || resolution.cname == RecordOutcome::TimedOut {
        stats.increment_error(ErrorType::DnsResolveTimeout);
    }
    if resolution.a == RecordOutcome::Failed || resolution.cname == RecordOutcome::Failed {
        stats.increment_error(ErrorType::DnsResolveError);
    }
}
