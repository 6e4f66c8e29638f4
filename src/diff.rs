//! Snapshot comparison.
//!
//! A discovery is a name present in the freshly staged snapshot but absent
//! from the committed one. Names that vanish are deliberately not reported:
//! certificates expire and rotate constantly, and the interesting signal for
//! monitoring is new attack surface, not churn.

use crate::domain::SubdomainSet;

/// One newly observed subdomain, attributed to its monitored domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryEvent {
    /// The monitored registrable domain
    pub domain: String,
    /// The newly observed subdomain
    pub hostname: String,
}

/// Returns the names in `current` that are not in `previous`.
pub fn new_subdomains(previous: &SubdomainSet, current: &SubdomainSet) -> SubdomainSet {
    current.difference(previous).cloned().collect()
}
