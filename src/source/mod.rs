//! Certificate-transparency subdomain sources.
//!
//! This module provides:
//! - The [`SubdomainSource`] trait, the seam between the scan pipeline and
//!   whatever answers subdomain lookups
//! - [`CtDatabaseSource`] - the primary source, querying the public crt.sh
//!   PostgreSQL mirror directly
//! - [`CtHttpSource`] - the fallback source, using the crt.sh JSON endpoint
//! - [`CtSource`] - the production composition of the two
//!
//! Both concrete sources return the same canonical form: lowercase hostnames
//! with wildcard prefixes stripped, filtered to names whose registrable
//! domain is exactly the queried domain.

mod db;
mod http;

// Re-export public API
pub use db::CtDatabaseSource;
pub use http::CtHttpSource;

use std::sync::Arc;

use log::warn;

use crate::config::Config;
use crate::domain::{self, SubdomainSet};
use crate::error_handling::{InfoType, ScanStats, SourceError};

/// Anything that can enumerate the currently known subdomains of a domain.
///
/// An `Ok` with an empty set means the source answered and genuinely knows
/// of no subdomains; failure to get an answer at all is an `Err`. The scan
/// pipeline relies on that distinction to avoid treating an outage as "all
/// subdomains disappeared".
#[async_trait::async_trait]
pub trait SubdomainSource: Send + Sync {
    /// Enumerates every subdomain of `domain` the source currently knows of.
    async fn lookup(&self, domain: &str) -> Result<SubdomainSet, SourceError>;
}

/// Production source: the PostgreSQL mirror first, falling back to the HTTP
/// endpoint for faults the fallback can route around (connectivity,
/// authentication, schema mismatches).
pub struct CtSource {
    db: CtDatabaseSource,
    http: CtHttpSource,
    stats: Arc<ScanStats>,
}

impl CtSource {
    pub fn new(db: CtDatabaseSource, http: CtHttpSource, stats: Arc<ScanStats>) -> Self {
        Self { db, http, stats }
    }

    /// Builds the production source from configuration.
    pub fn from_config(config: &Config, client: Arc<reqwest::Client>, stats: Arc<ScanStats>) -> Self {
        Self::new(
            CtDatabaseSource::new(config.ct_db.clone()),
            CtHttpSource::new(client),
            stats,
        )
    }
}

#[async_trait::async_trait]
impl SubdomainSource for CtSource {
    async fn lookup(&self, domain: &str) -> Result<SubdomainSet, SourceError> {
        match self.db.lookup(domain).await {
            Ok(set) => Ok(set),
            Err(e) if e.prefer_fallback() => {
                warn!(
                    "Primary certificate-transparency lookup for {} failed ({}); trying HTTP fallback",
                    domain, e
                );
                self.stats.increment_info(InfoType::FallbackLookup);
                self.http.lookup(domain).await
            }
            Err(e) => Err(e),
        }
    }
}

/// Folds one raw certificate identity into `set`, if it normalizes to a
/// usable hostname under `domain`.
pub(crate) fn collect_candidate(set: &mut SubdomainSet, raw: &str, domain: &str) {
    if let Some(host) = domain::normalize_hostname(raw) {
        if domain::belongs_to(&host, domain) {
            set.insert(host);
        }
    }
}
