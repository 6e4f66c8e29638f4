//! Domain extraction and normalization utilities.
//!
//! This module provides functions to normalize hostnames found in
//! certificate-transparency logs and to validate operator-supplied domains
//! against the Public Suffix List (PSL).
//!
//! Key functions:
//! - `registrable_domain()` - Extracts the registrable domain from user input
//! - `normalize_hostname()` - Canonicalizes a certificate name (lowercase, no wildcard)
//! - `belongs_to()` - Checks that a hostname falls under a registrable domain

use std::collections::BTreeSet;

use anyhow::{Context, Result};

/// Canonical, ordered set of subdomain names for one monitored domain.
pub type SubdomainSet = BTreeSet<String>;

/// Canonicalizes a hostname as found in certificate-transparency entries.
///
/// Certificates routinely carry wildcard names (`*.example.com`) and mixed
/// case; both are normalized away so that the same logical name is never
/// counted twice. Returns `None` for entries that cannot name a host
/// (empty strings, email-style identities, names with embedded whitespace).
pub fn normalize_hostname(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('.');
    let stripped = trimmed.strip_prefix("*.").unwrap_or(trimmed);
    if stripped.is_empty()
        || stripped.contains(|c: char| c.is_whitespace())
        || stripped.contains('@')
    {
        return None;
    }
    Some(stripped.to_ascii_lowercase())
}

/// Extracts the registrable domain from operator input.
///
/// Accepts either a bare hostname (`www.example.co.uk`) or a full URL
/// (`https://www.example.co.uk/path`); either way the answer is the
/// registrable domain (`example.co.uk`) per the Public Suffix List.
///
/// # Errors
///
/// Returns an error if the input cannot be parsed, if the host is an IP
/// address, or if the name has no registrable domain (e.g. a bare suffix
/// like `co.uk` or a single label like `localhost`).
pub fn registrable_domain(input: &str) -> Result<String> {
    let host = if input.contains("://") {
        let parsed =
            url::Url::parse(input).with_context(|| format!("Failed to parse URL: {}", input))?;

        // Reject IP addresses (they don't have registrable domains)
        if parsed
            .host()
            .map(|h| matches!(h, url::Host::Ipv4(_) | url::Host::Ipv6(_)))
            .unwrap_or(false)
        {
            return Err(anyhow::anyhow!(
                "IP addresses do not have registrable domains: {}",
                input
            ));
        }

        parsed
            .host_str()
            .ok_or_else(|| anyhow::anyhow!("URL '{}' has no host component", input))?
            .to_string()
    } else {
        input.trim().trim_end_matches('.').to_string()
    };

    if host.parse::<std::net::Ipv4Addr>().is_ok() || host.parse::<std::net::Ipv6Addr>().is_ok() {
        return Err(anyhow::anyhow!(
            "IP addresses do not have registrable domains: {}",
            host
        ));
    }

    let lowered = host.to_ascii_lowercase();
    match psl::domain_str(&lowered) {
        Some(domain) => Ok(domain.to_string()),
        None => Err(anyhow::anyhow!(
            "'{}' has no registrable domain (PSL lookup failed)",
            input
        )),
    }
}

/// Whether `candidate` falls under `domain`, i.e. its registrable domain is
/// exactly `domain`. This is what filters out suffix look-alikes such as
/// `notexample.com` when monitoring `example.com`.
pub fn belongs_to(candidate: &str, domain: &str) -> bool {
    psl::domain_str(candidate) == Some(domain)
}
