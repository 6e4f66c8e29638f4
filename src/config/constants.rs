//! Configuration constants.
//!
//! This module defines all configuration constants used throughout the application,
//! including timeouts, state-directory layout, and environment variable names.

use std::time::Duration;

// Concurrency defaults
/// Maximum concurrent per-domain lookups (semaphore limit)
pub const DEFAULT_WORKERS: usize = 10;

// State directory layout
/// Default state directory (registry file and snapshots live under it)
pub const DEFAULT_STATE_DIR: &str = ".";
/// File name of the monitored-domain registry inside the state directory
pub const REGISTRY_FILE: &str = "domains.txt";
/// Subdirectory of the state directory that holds per-domain snapshots
pub const SNAPSHOT_DIR: &str = "snapshots";
/// Extension of committed snapshot files
pub const SNAPSHOT_EXTENSION: &str = "txt";
/// Extension of staged (not yet committed) snapshot files
pub const STAGING_EXTENSION: &str = "staging";

// Certificate-transparency database (primary source)
/// Default host of the public certwatch PostgreSQL mirror
pub const CT_DB_HOST: &str = "crt.sh";
/// Default database name
pub const CT_DB_NAME: &str = "certwatch";
/// Default (read-only) database user
pub const CT_DB_USER: &str = "guest";
/// Connection timeout for the certificate-transparency database.
/// Only the connection attempt is bounded; the query itself may legitimately
/// run long for domains with large certificate histories.
pub const CT_DB_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// Certificate-transparency HTTP API (fallback source)
/// Base URL of the crt.sh HTTP interface
pub const CT_HTTP_BASE: &str = "https://crt.sh";
/// Per-request timeout for the HTTP fallback.
/// crt.sh can be slow for domains with many certificates, so this is generous.
pub const CT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

// DNS resolution
/// DNS query timeout in seconds
pub const DNS_TIMEOUT_SECS: u64 = 5;
/// Number of attempts per DNS query (initial attempt + retries)
pub const DNS_ATTEMPTS: usize = 2;

// Slack delivery
/// Per-request timeout for webhook posts
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);
/// Pause between consecutive webhook posts, to stay under Slack's
/// one-message-per-second rate limit
pub const POST_DELAY: Duration = Duration::from_secs(1);

/// Default User-Agent string for HTTP requests.
///
/// crt.sh occasionally rejects obviously non-browser clients, so a current
/// browser User-Agent is sent by default.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Environment variable names
/// Webhook URL for new-subdomain notifications
pub const ENV_WEBHOOK_URL: &str = "SUBWATCH_WEBHOOK_URL";
/// Webhook URL for error reports
pub const ENV_ERROR_WEBHOOK_URL: &str = "SUBWATCH_ERROR_WEBHOOK_URL";
/// Override for the certificate-transparency database host
pub const ENV_CT_DB_HOST: &str = "SUBWATCH_CT_DB_HOST";
/// Override for the certificate-transparency database name
pub const ENV_CT_DB_NAME: &str = "SUBWATCH_CT_DB_NAME";
/// Override for the certificate-transparency database user
pub const ENV_CT_DB_USER: &str = "SUBWATCH_CT_DB_USER";
/// Whether notifications should open with `<!channel>` ("1"/"true"/"yes"/"on")
pub const ENV_AT_CHANNEL: &str = "SUBWATCH_AT_CHANNEL";
