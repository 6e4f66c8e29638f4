//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, state layout, environment variable names)
//! - CLI option types (log level/format)
//! - The runtime [`Config`] assembled from CLI flags and the environment

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, CtDatabaseConfig, LogFormat, LogLevel};
