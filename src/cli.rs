//! Command-line interface.
//!
//! Parsing is kept separate from runtime configuration: `Cli` mirrors the
//! command line exactly, and [`Cli::split`] folds it together with
//! environment overrides into a [`Config`] plus the command to run.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Config, LogFormat, LogLevel, DEFAULT_STATE_DIR, DEFAULT_WORKERS};

/// Command-line options.
///
/// This struct is automatically generated by `clap` from the field attributes.
/// The state directory and logging options apply to every subcommand.
///
/// # Examples
///
/// ```bash
/// # Start monitoring a domain
/// subwatch add example.com
///
/// # Check all monitored domains, resolving new names before alerting
/// subwatch scan --resolve
///
/// # Keep state somewhere other than the current directory
/// subwatch --state-dir /var/lib/subwatch scan
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "subwatch",
    version,
    about = "Watches certificate-transparency logs for new subdomains and posts Slack alerts."
)]
pub struct Cli {
    /// Directory holding the domain registry and snapshots
    #[arg(long, value_parser, default_value = DEFAULT_STATE_DIR, global = true)]
    pub state_dir: PathBuf,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    /// What to do
    #[command(subcommand)]
    pub command: CliCommand,
}

/// The subcommands `subwatch` understands.
#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Start monitoring a domain and record its baseline snapshot
    Add {
        /// Domain (or URL; reduced to its registrable domain) to monitor
        domain: String,

        /// Answer yes to the "list subdomains?" prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Stop monitoring a domain and delete its snapshots
    Remove {
        /// Domain to stop monitoring
        domain: String,
    },

    /// Print every monitored domain
    List,

    /// Clear the registry and delete every snapshot
    Reset {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Check every monitored domain for new subdomains
    Scan {
        /// Maximum concurrent domain lookups
        #[arg(long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,

        /// Resolve new names and only alert on those with DNS records
        #[arg(long)]
        resolve: bool,

        /// Forward per-domain scan errors to the error webhook
        #[arg(long)]
        log_errors: bool,

        /// Post to Slack without pausing between messages
        #[arg(long)]
        no_post_delay: bool,
    },
}

impl Cli {
    /// Folds parsed arguments and environment overrides into the command to
    /// run and the runtime configuration.
    pub fn split(self) -> (CliCommand, Config) {
        let mut config = Config {
            state_dir: self.state_dir,
            log_level: self.log_level,
            log_format: self.log_format,
            ..Config::default()
        };

        if let CliCommand::Scan {
            workers,
            resolve,
            log_errors,
            no_post_delay,
        } = &self.command
        {
            config.workers = *workers;
            config.resolve = *resolve;
            config.log_errors = *log_errors;
            if *no_post_delay {
                config.post_delay = None;
            }
        }

        config.overlay_env();
        (self.command, config)
    }
}
