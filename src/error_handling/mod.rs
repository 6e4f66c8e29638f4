//! Error handling and scan statistics.
//!
//! This module provides:
//! - Error type definitions for every subsystem (registry, snapshots,
//!   certificate-transparency lookups, notification delivery)
//! - Scan statistics tracking (errors, warnings, info metrics)
//! - Fallback classification for failed database lookups
//!
//! Error types are categorized into:
//! - **Errors**: Failures that prevent a domain from being checked
//! - **Warnings**: Recoverable oddities worth tracking
//! - **Info**: Notable events (fallback lookups, baseline commits, etc.)

mod stats;
mod types;

// Re-export public API
pub use stats::ScanStats;
pub use types::{
    ErrorType, InfoType, InitializationError, NotifyError, RegistryError, SnapshotError,
    SourceError, WarningType,
};
