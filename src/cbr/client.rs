use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::settings::UpstreamConfig;
use crate::observability::metrics::get_metrics;
use crate::utils::user_agent::random_user_agent;

pub const DEFAULT_ATTEMPTS: u32 = 5;
pub const DEFAULT_BACKOFF_MS: u64 = 2_000;

/// GET-with-retry client for the cbr.ru XML scripts.
///
/// Failure semantics follow the gateway contract: connection-level failures
/// are retried with a fixed backoff; a non-200 status or exhausted attempts
/// degrade to "no data". Callers never see an error from a fetch.
#[derive(Debug, Clone)]
pub struct CbrClient {
    http: Client,
    attempts: u32,
    backoff: Duration,
}

impl CbrClient {
    pub fn new(cfg: &UpstreamConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()?;

        let retry = cfg.retry.as_ref();
        Ok(Self {
            http,
            attempts: retry
                .and_then(|r| r.attempts)
                .unwrap_or(DEFAULT_ATTEMPTS)
                .max(1),
            backoff: Duration::from_millis(
                retry.and_then(|r| r.backoff_ms).unwrap_or(DEFAULT_BACKOFF_MS),
            ),
        })
    }

    /// One GET per attempt, a freshly picked User-Agent each time.
    /// Returns the response body, or `None` when the upstream had no data
    /// for us (non-200, malformed transport, or attempts exhausted).
    pub async fn fetch_text(&self, url: &str) -> Option<String> {
        let metrics = get_metrics().await;

        for attempt in 1..=self.attempts {
            metrics.upstream_requests.inc();
            let result = self
                .http
                .get(url)
                .header(http::header::USER_AGENT, random_user_agent())
                .send()
                .await;

            match result {
                Ok(response) if response.status() == StatusCode::OK => {
                    return match response.text().await {
                        Ok(body) => Some(body),
                        Err(e) => {
                            warn!("upstream body read failed: {}", e);
                            metrics
                                .upstream_failures
                                .with_label_values(&["body"])
                                .inc();
                            None
                        }
                    };
                }
                // Non-200 means "no data available" here, not a fault to retry.
                Ok(response) => {
                    debug!("upstream returned {} for {}", response.status(), url);
                    metrics
                        .upstream_failures
                        .with_label_values(&["status"])
                        .inc();
                    return None;
                }
                Err(e) if e.is_connect() || e.is_timeout() => {
                    warn!(
                        "attempt {}/{}: upstream connection failed: {}",
                        attempt, self.attempts, e
                    );
                    metrics
                        .upstream_failures
                        .with_label_values(&["connect"])
                        .inc();
                    if attempt < self.attempts {
                        metrics.upstream_retries.inc();
                        sleep(self.backoff).await;
                    }
                }
                Err(e) => {
                    warn!("upstream request failed: {}", e);
                    metrics
                        .upstream_failures
                        .with_label_values(&["request"])
                        .inc();
                    return None;
                }
            }
        }

        debug!("all {} attempts exhausted for {}", self.attempts, url);
        None
    }
}
