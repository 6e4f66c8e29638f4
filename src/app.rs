//! Command handlers for everything except `scan`.
//!
//! These wrap the registry and snapshot store with user-facing behavior:
//! validation, confirmation prompts, and terminal output. Only `add` talks
//! to the network (one lookup to record the baseline snapshot).

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use log::info;

use crate::config::Config;
use crate::domain::registrable_domain;
use crate::registry::DomainRegistry;
use crate::snapshot::SnapshotStore;
use crate::source::SubdomainSource;

/// Starts monitoring a domain.
///
/// The input is reduced to its registrable domain, looked up once, and the
/// result committed as the baseline snapshot before the domain is appended
/// to the registry. A failed or empty lookup adds nothing, so a typo never
/// becomes a monitored domain.
///
/// With `assume_yes` the "list the subdomains?" prompt is answered yes
/// instead of read from stdin.
pub async fn add_domain(
    config: &Config,
    source: Arc<dyn SubdomainSource>,
    raw: &str,
    assume_yes: bool,
) -> Result<()> {
    let domain = registrable_domain(raw)?;
    let registry = DomainRegistry::new(&config.state_dir);
    if registry.contains(&domain)? {
        bail!("{} is already being monitored", domain);
    }

    info!("Fetching baseline snapshot for {}", domain);
    let subdomains = source
        .lookup(&domain)
        .await
        .with_context(|| format!("Baseline lookup for {} failed", domain))?;
    if subdomains.is_empty() {
        bail!("Could not find any subdomains of {}; nothing was added", domain);
    }

    let store = SnapshotStore::new(&config.state_dir);
    store
        .stage(&domain, &subdomains)
        .and_then(|()| store.commit(&domain))
        .with_context(|| format!("Failed to write baseline snapshot for {}", domain))?;
    if let Err(e) = registry.add(&domain) {
        // Keep registry and snapshots consistent: no registry entry, no
        // baseline.
        let _ = store.delete(&domain);
        return Err(e).with_context(|| format!("Failed to register {}", domain));
    }

    println!(
        "✅ Now monitoring {} ({} known subdomain{})",
        domain,
        subdomains.len(),
        if subdomains.len() == 1 { "" } else { "s" }
    );

    if assume_yes || confirm(&format!("List the subdomains found for {}?", domain)) {
        for subdomain in &subdomains {
            println!("{}", subdomain.yellow());
        }
    }
    Ok(())
}

/// Stops monitoring a domain and deletes its snapshots.
pub fn remove_domain(config: &Config, raw: &str) -> Result<()> {
    // Stale registry entries may no longer validate against the public
    // suffix list; fall back to the raw input so they stay removable.
    let domain =
        registrable_domain(raw).unwrap_or_else(|_| raw.trim().to_ascii_lowercase());
    let registry = DomainRegistry::new(&config.state_dir);
    registry.remove(&domain)?;
    SnapshotStore::new(&config.state_dir)
        .delete(&domain)
        .with_context(|| format!("Failed to delete snapshots for {}", domain))?;
    println!("✅ Stopped monitoring {}", domain);
    Ok(())
}

/// Prints every monitored domain, one per line, in registry order.
pub fn list_domains(config: &Config) -> Result<()> {
    let domains = DomainRegistry::new(&config.state_dir).list()?;
    if domains.is_empty() {
        println!("No domains are being monitored.");
        return Ok(());
    }
    for domain in domains {
        println!("{}", domain);
    }
    Ok(())
}

/// Clears the registry and deletes every snapshot.
///
/// Prompts for confirmation unless `assume_yes` is set; answering anything
/// but `y` leaves the state directory untouched.
pub fn reset(config: &Config, assume_yes: bool) -> Result<()> {
    let registry = DomainRegistry::new(&config.state_dir);
    let count = registry.list()?.len();

    if !assume_yes
        && !confirm(&format!(
            "Delete all snapshots and stop monitoring {} domain{}?",
            count,
            if count == 1 { "" } else { "s" }
        ))
    {
        println!("Nothing was changed.");
        return Ok(());
    }

    SnapshotStore::new(&config.state_dir)
        .purge_all()
        .context("Failed to delete snapshots")?;
    registry.clear()?;
    println!("✅ Reset complete. Add new domains to monitor.");
    Ok(())
}

/// Asks a yes/no question on the terminal, defaulting to no.
fn confirm(question: &str) -> bool {
    print!("{} [y/N] ", question.yellow());
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    answer.trim().eq_ignore_ascii_case("y")
}
