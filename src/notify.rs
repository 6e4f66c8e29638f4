//! Slack notification delivery.
//!
//! Two webhooks are used: one for findings (new subdomains, or an explicit
//! "nothing new" message so the operator knows the scan ran) and an optional
//! second one for error reports. Message texts are built by pure functions
//! so formatting is testable without any network.
//!
//! Slack rate-limits incoming webhooks to roughly one message per second;
//! a configurable pause after each successful post keeps bursts under that
//! limit.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

use crate::config::{Config, WEBHOOK_TIMEOUT};
use crate::diff::DiscoveryEvent;
use crate::error_handling::{InitializationError, NotifyError};
use crate::resolve::{RecordOutcome, ResolutionResult};

/// Delivery seam between the scan pipeline and the outside world.
///
/// [`notify_discovery`](Notifier::notify_discovery) and
/// [`notify_no_changes`](Notifier::notify_no_changes) report delivery
/// failures to the caller; [`notify_error`](Notifier::notify_error) is
/// terminal and handles its own failures (with one bounded retry), since
/// there is nowhere further to report them.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Reports one newly discovered subdomain, with its DNS records when
    /// resolution ran.
    async fn notify_discovery(
        &self,
        event: &DiscoveryEvent,
        resolution: Option<&ResolutionResult>,
    ) -> Result<(), NotifyError>;

    /// Reports that a scan completed without finding anything new.
    async fn notify_no_changes(&self) -> Result<(), NotifyError>;

    /// Forwards an operational error to the error channel, if configured.
    async fn notify_error(&self, message: &str);
}

/// Webhook-backed Slack notifier.
pub struct SlackNotifier {
    client: Arc<reqwest::Client>,
    webhook_url: String,
    error_webhook_url: Option<String>,
    at_channel: bool,
    post_delay: Option<Duration>,
}

impl SlackNotifier {
    /// Builds the notifier from configuration.
    ///
    /// # Errors
    ///
    /// Fails if the findings webhook is unset, or if error forwarding is
    /// requested without an error webhook. Both are configuration mistakes
    /// the operator should hear about before a scan starts, not after it
    /// has already fetched everything.
    pub fn from_config(
        config: &Config,
        client: Arc<reqwest::Client>,
    ) -> Result<Self, InitializationError> {
        let webhook_url = config.webhook_url.clone().ok_or_else(|| {
            InitializationError::MissingConfiguration(format!(
                "{} is not set",
                crate::config::ENV_WEBHOOK_URL
            ))
        })?;
        let error_webhook_url = if config.log_errors {
            Some(config.error_webhook_url.clone().ok_or_else(|| {
                InitializationError::MissingConfiguration(format!(
                    "{} is not set but error forwarding was requested",
                    crate::config::ENV_ERROR_WEBHOOK_URL
                ))
            })?)
        } else {
            None
        };
        Ok(Self {
            client,
            webhook_url,
            error_webhook_url,
            at_channel: config.at_channel,
            post_delay: config.post_delay,
        })
    }

    async fn post(&self, url: &str, text: &str) -> Result<(), NotifyError> {
        let payload = serde_json::json!({ "text": text });
        let response = self
            .client
            .post(url)
            .timeout(WEBHOOK_TIMEOUT)
            .json(&payload)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status));
        }
        if let Some(delay) = self.post_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Notifier for SlackNotifier {
    async fn notify_discovery(
        &self,
        event: &DiscoveryEvent,
        resolution: Option<&ResolutionResult>,
    ) -> Result<(), NotifyError> {
        for text in discovery_messages(self.at_channel, &event.hostname, resolution) {
            self.post(&self.webhook_url, &text).await?;
        }
        Ok(())
    }

    async fn notify_no_changes(&self) -> Result<(), NotifyError> {
        self.post(&self.webhook_url, &no_changes_message(self.at_channel))
            .await
    }

    async fn notify_error(&self, message: &str) {
        let Some(url) = &self.error_webhook_url else {
            debug!("Error webhook not configured, dropping report: {}", message);
            return;
        };
        let mut text = error_message(message);
        for attempt in 0..2 {
            match self.post(url, &text).await {
                Ok(()) => return,
                Err(e) if attempt == 0 => {
                    warn!("Failed to deliver error report to Slack: {}", e);
                    text = error_message(&format!(
                        "error delivery failed ({}); original report: {}",
                        e, message
                    ));
                }
                Err(e) => {
                    log::error!("Giving up on error report delivery: {}", e);
                }
            }
        }
    }
}

fn at_prefix(at_channel: bool) -> &'static str {
    if at_channel {
        "<!channel> "
    } else {
        ""
    }
}

/// Builds the message sequence for one discovery: a headline, followed by
/// one code-block message per record line when resolution data is present.
fn discovery_messages(
    at_channel: bool,
    hostname: &str,
    resolution: Option<&ResolutionResult>,
) -> Vec<String> {
    let at = at_prefix(at_channel);
    match resolution {
        None => vec![format!("{}:new: https://{}", at, hostname)],
        Some(result) => {
            let mut messages = vec![format!("{}:new: {}", at, hostname)];
            messages.extend(record_messages("A", &result.a));
            messages.extend(record_messages("CNAME", &result.cname));
            messages
        }
    }
}

fn record_messages(record_type: &str, outcome: &RecordOutcome) -> Vec<String> {
    match outcome {
        RecordOutcome::Answered(records) => records
            .iter()
            .map(|record| format!("```{} : {}```", record_type, record))
            .collect(),
        RecordOutcome::NoAnswer => Vec::new(),
        RecordOutcome::TimedOut => {
            vec![format!("```{} : Timed out while resolving.```", record_type)]
        }
        RecordOutcome::Failed => vec![format!(
            "```{} : There was an error while resolving.```",
            record_type
        )],
    }
}

fn no_changes_message(at_channel: bool) -> String {
    format!(
        "{}:-1: We couldn't find any new valid subdomains.",
        at_prefix(at_channel)
    )
}

fn error_message(message: &str) -> String {
    format!("```{}```", message)
}
