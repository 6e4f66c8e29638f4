//! Error type definitions.
//!
//! This module defines all error, warning, and info types used throughout the application.

use std::time::Duration;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// A required setting is absent from the environment.
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),
}

/// Error types for the monitored-domain registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The domain is already present in the registry.
    #[error("{0} is already being monitored")]
    AlreadyMonitored(String),

    /// The domain is not present in the registry.
    #[error("{0} is not being monitored")]
    NotMonitored(String),

    /// Filesystem error while reading or writing the registry.
    #[error("registry I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error types for snapshot storage.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Commit was requested but no staged snapshot exists for the domain.
    #[error("no staged snapshot for {0}")]
    NothingStaged(String),

    /// The staged file could not be moved into place.
    #[error("failed to persist staged snapshot: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// Filesystem error while reading or writing snapshot files.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error types for certificate-transparency lookups.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The database connection or query failed.
    #[error("certificate-transparency database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The database connection attempt did not complete in time.
    #[error("certificate-transparency database connection timed out after {0:?}")]
    ConnectTimeout(Duration),

    /// The HTTP fallback request failed.
    #[error("certificate-transparency HTTP error: {0}")]
    Http(#[from] ReqwestError),

    /// The HTTP fallback returned a non-success status.
    #[error("certificate-transparency HTTP status {0}")]
    HttpStatus(reqwest::StatusCode),
}

impl SourceError {
    /// Whether a failed primary (database) lookup should be retried against
    /// the HTTP fallback.
    ///
    /// Only connectivity faults, authentication rejections, and schema
    /// mismatches qualify. Anything else (a malformed query, a decode
    /// failure) would fail the same way over HTTP, so it is surfaced
    /// directly instead of masked by a second lookup.
    pub fn prefer_fallback(&self) -> bool {
        match self {
            SourceError::ConnectTimeout(_) => true,
            SourceError::Database(e) => match e {
                sqlx::Error::Io(_)
                | sqlx::Error::Tls(_)
                | sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed => true,
                sqlx::Error::Database(db) => db
                    .code()
                    .map(|code| sqlstate_prefers_fallback(&code))
                    .unwrap_or(false),
                _ => false,
            },
            SourceError::Http(_) | SourceError::HttpStatus(_) => false,
        }
    }
}

/// Whether a PostgreSQL SQLSTATE code indicates a fault the HTTP fallback
/// can route around: class 28 (invalid authorization), 42P01 (undefined
/// table), or 3D000 (invalid catalog name).
pub(crate) fn sqlstate_prefers_fallback(code: &str) -> bool {
    code.starts_with("28") || code == "42P01" || code == "3D000"
}

/// Error types for Slack webhook delivery.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The POST request itself failed (connection, timeout, TLS).
    #[error("Slack webhook request error: {0}")]
    Http(#[from] ReqwestError),

    /// Slack answered with a non-success status.
    #[error("Slack webhook returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Types of errors that can occur during a scan.
///
/// This enum categorizes actual error conditions - failures that prevent a
/// domain from being checked or a notification from being delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // Source errors
    SourceLookupError,
    // Snapshot errors
    SnapshotStageError,
    SnapshotCommitError,
    // DNS errors
    DnsResolveTimeout,
    DnsResolveError,
    // Delivery errors
    NotifyDeliveryError,
}

/// Types of warnings that can occur during a scan.
///
/// Warnings indicate recoverable oddities that don't prevent the scan from
/// completing but are worth tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum WarningType {
    // Leftovers from an interrupted earlier run
    StaleStagingSwept,
}

/// Types of informational metrics that can occur during a scan.
///
/// Info metrics track notable events that aren't errors or warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    // Primary source unavailable, HTTP fallback answered instead
    FallbackLookup,
    // Lookup succeeded but returned no subdomains
    EmptyLookup,
    // First snapshot for a domain committed without diffing
    BaselineCommit,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::SourceLookupError => "Certificate-transparency lookup error",
            ErrorType::SnapshotStageError => "Snapshot stage error",
            ErrorType::SnapshotCommitError => "Snapshot commit error",
            ErrorType::DnsResolveTimeout => "DNS resolution timeout",
            ErrorType::DnsResolveError => "DNS resolution error",
            ErrorType::NotifyDeliveryError => "Notification delivery error",
        }
    }
}

impl WarningType {
    /// Returns a human-readable string representation of the warning type.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::StaleStagingSwept => "Stale staged snapshot swept",
        }
    }
}

impl InfoType {
    /// Returns a human-readable string representation of the info type.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::FallbackLookup => "HTTP fallback lookup",
            InfoType::EmptyLookup => "Empty lookup",
            InfoType::BaselineCommit => "Baseline commit",
        }
    }
}
