//! subwatch library: certificate-transparency subdomain monitoring
//!
//! This library watches the CT log database behind crt.sh for subdomains of
//! a set of monitored domains, keeps a per-domain snapshot on disk, and
//! reports the difference on every scan: names seen now that were absent
//! from the previous snapshot. Discoveries can optionally be resolved in DNS
//! first and are delivered to Slack webhooks.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use subwatch::error_handling::ScanStats;
//! use subwatch::initialization::init_client;
//! use subwatch::notify::SlackNotifier;
//! use subwatch::source::CtSource;
//! use subwatch::{run_scan, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = Config::default();
//! config.overlay_env();
//!
//! let stats = Arc::new(ScanStats::new());
//! let client = init_client(&config)?;
//! let source = Arc::new(CtSource::from_config(
//!     &config,
//!     Arc::clone(&client),
//!     Arc::clone(&stats),
//! ));
//! let notifier = Arc::new(SlackNotifier::from_config(&config, client)?);
//!
//! let report = run_scan(&config, source, notifier, stats).await?;
//! println!(
//!     "{} new subdomains across {} domains",
//!     report.discoveries, report.domains
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

pub mod app;
pub mod cli;
pub mod config;
pub mod diff;
pub mod domain;
pub mod error_handling;
pub mod initialization;
pub mod notify;
pub mod registry;
pub mod resolve;
mod run;
pub mod snapshot;
pub mod source;

// Re-export public API
pub use cli::{Cli, CliCommand};
pub use config::{Config, LogFormat, LogLevel};
pub use run::{run_scan, ScanReport};
