//! Primary certificate-transparency source: the crt.sh PostgreSQL mirror.
//!
//! crt.sh exposes its certwatch database for read-only access, which is much
//! faster than the HTTP interface for domains with large certificate
//! histories. One short-lived connection is opened per lookup; only the
//! connection attempt is bounded by a timeout, since the query itself can
//! legitimately take a while.

use std::time::Duration;

use log::debug;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;

use crate::config::{CtDatabaseConfig, CT_DB_CONNECT_TIMEOUT};
use crate::domain::SubdomainSet;
use crate::error_handling::SourceError;

use super::collect_candidate;

/// Matches every dNSName identity whose reversed form has the reversed
/// domain as a prefix, i.e. every name ending in the domain. The reversed
/// LIKE lets PostgreSQL use its index on `reverse(lower(name_value))`.
/// Suffix look-alikes (`notexample.com` for `example.com`) also match and
/// are filtered out client-side by the registrable-domain check.
const IDENTITY_QUERY: &str = "\
    SELECT ci.name_value \
    FROM certificate_identity ci \
    WHERE ci.name_type = 'dNSName' \
    AND reverse(lower(ci.name_value)) LIKE reverse(lower($1))";

/// Subdomain lookups against the certwatch PostgreSQL database.
pub struct CtDatabaseSource {
    host: String,
    options: PgConnectOptions,
    connect_timeout: Duration,
}

impl CtDatabaseSource {
    pub fn new(config: CtDatabaseConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .database(&config.name)
            .username(&config.user);
        Self {
            host: config.host,
            options,
            connect_timeout: CT_DB_CONNECT_TIMEOUT,
        }
    }

    /// Queries the database for every known subdomain of `domain`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::ConnectTimeout`] if the connection attempt
    /// does not complete in time, or [`SourceError::Database`] for any
    /// connection or query failure.
    pub(crate) async fn lookup(&self, domain: &str) -> Result<SubdomainSet, SourceError> {
        let connect = PgConnection::connect_with(&self.options);
        let mut conn = match tokio::time::timeout(self.connect_timeout, connect).await {
            Ok(result) => result?,
            Err(_) => return Err(SourceError::ConnectTimeout(self.connect_timeout)),
        };
        debug!("Connected to certificate-transparency database at {}", self.host);

        let pattern = format!("%{}", domain);
        let rows: Vec<String> = sqlx::query_scalar(IDENTITY_QUERY)
            .bind(pattern)
            .fetch_all(&mut conn)
            .await?;

        if let Err(e) = conn.close().await {
            debug!("Error closing database connection: {}", e);
        }

        let mut set = SubdomainSet::new();
        for value in &rows {
            collect_candidate(&mut set, value, domain);
        }
        debug!(
            "{}: {} certificate identities -> {} candidate names",
            domain,
            rows.len(),
            set.len()
        );
        Ok(set)
    }
}
