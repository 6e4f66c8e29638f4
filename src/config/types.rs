//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use crate::config::constants::{
    CT_DB_HOST, CT_DB_NAME, CT_DB_USER, DEFAULT_STATE_DIR, DEFAULT_USER_AGENT, DEFAULT_WORKERS,
    ENV_AT_CHANNEL, ENV_CT_DB_HOST, ENV_CT_DB_NAME, ENV_CT_DB_USER, ENV_ERROR_WEBHOOK_URL,
    ENV_WEBHOOK_URL, POST_DELAY,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Connection settings for the certificate-transparency PostgreSQL mirror.
///
/// Defaults point at the public crt.sh/certwatch instance, which allows
/// read-only access as the `guest` user without a password.
#[derive(Debug, Clone)]
pub struct CtDatabaseConfig {
    /// Database host
    pub host: String,
    /// Database name
    pub name: String,
    /// Database user
    pub user: String,
}

impl Default for CtDatabaseConfig {
    fn default() -> Self {
        Self {
            host: CT_DB_HOST.to_string(),
            name: CT_DB_NAME.to_string(),
            user: CT_DB_USER.to_string(),
        }
    }
}

impl CtDatabaseConfig {
    /// Builds the database configuration from the environment, falling back
    /// to the public crt.sh defaults for any unset variable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var(ENV_CT_DB_HOST).unwrap_or(defaults.host),
            name: env::var(ENV_CT_DB_NAME).unwrap_or(defaults.name),
            user: env::var(ENV_CT_DB_USER).unwrap_or(defaults.user),
        }
    }
}

/// Library configuration (no CLI dependencies).
///
/// This is the core configuration struct used by the library. It can be
/// constructed programmatically without any CLI dependencies.
///
/// # Examples
///
/// ```no_run
/// use subwatch::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     state_dir: PathBuf::from("/var/lib/subwatch"),
///     workers: 20,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the domain registry and snapshot files
    pub state_dir: PathBuf,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Maximum concurrent per-domain lookups
    pub workers: usize,

    /// Resolve new subdomains (A/CNAME) before notifying
    pub resolve: bool,

    /// Forward per-domain errors to the error webhook
    pub log_errors: bool,

    /// Pause between consecutive webhook posts; `None` disables the pause
    pub post_delay: Option<Duration>,

    /// Prefix notifications with `<!channel>`
    pub at_channel: bool,

    /// Webhook URL for new-subdomain notifications
    pub webhook_url: Option<String>,

    /// Webhook URL for error reports
    pub error_webhook_url: Option<String>,

    /// Certificate-transparency database connection settings
    pub ct_db: CtDatabaseConfig,

    /// HTTP User-Agent header value
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            workers: DEFAULT_WORKERS,
            resolve: false,
            log_errors: false,
            post_delay: Some(POST_DELAY),
            at_channel: true,
            webhook_url: None,
            error_webhook_url: None,
            ct_db: CtDatabaseConfig::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Overlays environment-provided settings (webhook URLs, database
    /// connection, `<!channel>` toggle) onto this configuration.
    pub fn overlay_env(&mut self) {
        self.webhook_url = env::var(ENV_WEBHOOK_URL).ok().filter(|v| !v.is_empty());
        self.error_webhook_url = env::var(ENV_ERROR_WEBHOOK_URL)
            .ok()
            .filter(|v| !v.is_empty());
        self.ct_db = CtDatabaseConfig::from_env();
        if let Ok(value) = env::var(ENV_AT_CHANNEL) {
            if let Some(flag) = parse_flag(&value) {
                self.at_channel = flag;
            }
        }
    }
}

/// Parses a boolean-ish environment value. Returns `None` for anything that
/// is not a recognized spelling, so callers can keep their default.
pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        // Test all LogLevel variants convert correctly to log::LevelFilter
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.workers, DEFAULT_WORKERS);
        assert_eq!(config.state_dir, PathBuf::from(DEFAULT_STATE_DIR));
        assert!(!config.resolve);
        assert!(!config.log_errors);
        assert!(config.at_channel);
        assert_eq!(config.post_delay, Some(POST_DELAY));
        assert!(config.webhook_url.is_none());
    }

    #[test]
    fn test_ct_database_defaults() {
        let db = CtDatabaseConfig::default();
        assert_eq!(db.host, "crt.sh");
        assert_eq!(db.name, "certwatch");
        assert_eq!(db.user, "guest");
    }

    #[test]
    fn test_parse_flag_truthy() {
        for value in ["1", "true", "TRUE", "yes", "on", " Yes "] {
            assert_eq!(parse_flag(value), Some(true), "value: {value:?}");
        }
    }

    #[test]
    fn test_parse_flag_falsy() {
        for value in ["0", "false", "no", "OFF"] {
            assert_eq!(parse_flag(value), Some(false), "value: {value:?}");
        }
    }

    #[test]
    fn test_parse_flag_unrecognized() {
        assert_eq!(parse_flag(""), None);
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag("2"), None);
    }
}
