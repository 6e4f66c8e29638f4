//! Fallback certificate-transparency source: the crt.sh JSON endpoint.
//!
//! Slower than the database and rate-limited, but reachable from networks
//! where outbound PostgreSQL is blocked. Queried as
//! `https://crt.sh/?q=%25.<domain>&output=json`.

use std::sync::Arc;

use log::debug;
use serde::Deserialize;

use crate::config::{CT_HTTP_BASE, CT_HTTP_TIMEOUT};
use crate::domain::SubdomainSet;
use crate::error_handling::SourceError;

use super::collect_candidate;

/// One row of the crt.sh JSON output. Only the identity field matters here;
/// `name_value` can pack several names separated by newlines.
#[derive(Debug, Deserialize)]
struct CtLogEntry {
    name_value: String,
}

/// Subdomain lookups against the crt.sh HTTP interface.
pub struct CtHttpSource {
    client: Arc<reqwest::Client>,
}

impl CtHttpSource {
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Self { client }
    }

    /// Queries the JSON endpoint for every known subdomain of `domain`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::HttpStatus`] for a non-success response and
    /// [`SourceError::Http`] for request or decode failures.
    pub(crate) async fn lookup(&self, domain: &str) -> Result<SubdomainSet, SourceError> {
        let url = format!("{}/?q=%25.{}&output=json", CT_HTTP_BASE, domain);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .timeout(CT_HTTP_TIMEOUT)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus(status));
        }

        let entries: Vec<CtLogEntry> = response.json().await?;
        Ok(collect_entries(&entries, domain))
    }
}

fn collect_entries(entries: &[CtLogEntry], domain: &str) -> SubdomainSet {
    let mut set = SubdomainSet::new();
    for entry in entries {
        for name in entry.name_value.split('\n') {
            collect_candidate(&mut set, name, domain);
        }
    }
    debug!(
        "{}: {} log entries -> {} candidate names",
        domain,
        entries.len(),
        set.len()
    );
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<CtLogEntry> {
        serde_json::from_str(json).expect("failed to parse test JSON")
    }

    #[test]
    fn test_collect_entries_from_sample_response() {
        let entries = parse(
            r#"[
                {"name_value": "www.example.com"},
                {"name_value": "*.example.com"},
                {"name_value": "api.example.com\nstaging.example.com"},
                {"name_value": "WWW.EXAMPLE.COM"}
            ]"#,
        );
        let set = collect_entries(&entries, "example.com");
        let expected: SubdomainSet = [
            "api.example.com",
            "example.com",
            "staging.example.com",
            "www.example.com",
        ]
        .iter()
        .map(|h| h.to_string())
        .collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn test_collect_entries_ignores_foreign_names() {
        let entries = parse(r#"[{"name_value": "www.other.org\nwww.example.com"}]"#);
        let set = collect_entries(&entries, "example.com");
        assert_eq!(set.len(), 1);
        assert!(set.contains("www.example.com"));
    }

    #[test]
    fn test_collect_entries_empty_response() {
        let entries = parse("[]");
        assert_eq!(collect_entries(&entries, "example.com"), SubdomainSet::new());
    }
}
