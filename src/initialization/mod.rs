//! Application initialization and resource setup.
//!
//! This module provides functions to initialize all shared resources:
//! - The HTTP client (used for crt.sh fallback lookups and webhook posts)
//! - The DNS resolver
//! - The logger
//! - The concurrency-limiting semaphore
//!
//! All fallible initialization functions return proper error types.

mod client;
mod logger;
mod resolver;

use std::sync::Arc;

use tokio::sync::Semaphore;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;
pub use resolver::init_resolver;

/// Initializes a semaphore for controlling concurrency.
///
/// Creates a new semaphore with the specified permit count. This semaphore is
/// used to limit the number of concurrent per-domain lookups.
///
/// # Arguments
///
/// * `count` - Maximum number of concurrent operations allowed
///
/// # Returns
///
/// An `Arc<Semaphore>` that can be shared across multiple tasks.
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count))
}
