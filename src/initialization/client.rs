//! HTTP client initialization.
//!
//! This module provides the shared HTTP client used for crt.sh fallback
//! lookups and Slack webhook posts.

use std::sync::Arc;

use reqwest::ClientBuilder;

use crate::config::{Config, CT_HTTP_TIMEOUT};
use crate::error_handling::InitializationError;

/// Initializes the shared HTTP client.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from configuration
/// - A generous default timeout (individual requests override it where a
///   tighter bound applies, e.g. webhook posts)
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(CT_HTTP_TIMEOUT)
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(Arc::new(client))
}
