//! HTTP transport for the search API
//!
//! One logical fetch per page: rate-limiter gate, authenticated GET with a
//! fixed timeout, and a bounded retry loop for transient network failures.
//! Each attempt resolves to an explicit outcome so the loop stays a small,
//! bounded state machine rather than fallthrough control flow.

use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

use crate::client::query::SearchQuery;
use crate::client::rate_limit::SlidingWindowLimiter;
use crate::client::response::{SearchEnvelope, SearchPage};
use crate::config::{retry_backoff, HarvestConfig};

pub mod query;
pub mod rate_limit;
pub mod response;

/// Credential header expected by the API.
const API_KEY_HEADER: &str = "X-ELS-APIKey";

/// Maximum bytes of a non-success body surfaced in diagnostics.
const BODY_EXCERPT_LEN: usize = 200;

/// Transport errors. Both variants end the run gracefully; neither is a
/// process-level failure.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transient network failure persisted through every allowed attempt.
    #[error("network failed {attempts} times; giving up ({last_error})")]
    NetworkExhausted {
        /// Attempts made before giving up.
        attempts: u32,
        /// Error from the final attempt.
        last_error: String,
    },

    /// Non-success status code. Never retried.
    #[error("HTTP {status} - {body_excerpt}")]
    BadStatus {
        /// Response status code.
        status: StatusCode,
        /// Body truncated to the first 200 bytes.
        body_excerpt: String,
    },

    /// Response body did not match the expected envelope.
    #[error("malformed response body: {0}")]
    Decode(String),
}

/// Result type for transport operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Outcome of a single fetch attempt.
enum AttemptOutcome {
    /// Parsed page; pagination continues.
    Success(SearchPage),
    /// Transient failure worth another attempt.
    Retryable(String),
    /// Unrecoverable for this run; surfaced without further attempts.
    Fatal(FetchError),
}

/// Authenticated client for the search endpoint.
///
/// Owns the HTTP connection pool, the API credential, and the rate limiter;
/// every request passes through [`SlidingWindowLimiter::acquire`] first.
pub struct SearchClient {
    http: Client,
    base_url: String,
    api_key: String,
    limiter: SlidingWindowLimiter,
    max_attempts: u32,
    retry_base_delay: Duration,
}

impl SearchClient {
    /// Build a client from the harvest configuration and credential.
    pub fn new(config: &HarvestConfig, api_key: impl Into<String>) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: api_key.into(),
            limiter: SlidingWindowLimiter::new(config.max_requests_per_window, config.rate_window),
            max_attempts: config.max_attempts,
            retry_base_delay: config.retry_base_delay,
        })
    }

    /// Fetch one page of results for the current query state.
    ///
    /// Connection errors and timeouts are retried up to the configured
    /// attempt bound with linearly increasing backoff. A non-success status
    /// is not retried: the API does not recover from auth or quota failures
    /// within a run, so the caller shuts down and checkpoints instead.
    pub async fn fetch_page(&self, query: &SearchQuery) -> FetchResult<SearchPage> {
        let mut last_error = String::new();

        for attempt in 0..self.max_attempts {
            match self.attempt(query).await {
                AttemptOutcome::Success(page) => {
                    debug!(attempt = attempt + 1, entries = page.entries.len(), "page fetched");
                    return Ok(page);
                }
                AttemptOutcome::Fatal(err) => return Err(err),
                AttemptOutcome::Retryable(err) => {
                    warn!(
                        attempt = attempt + 1,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "network error"
                    );
                    last_error = err;
                    if attempt + 1 < self.max_attempts {
                        let backoff = retry_backoff(attempt, self.retry_base_delay);
                        debug!(?backoff, "retrying after backoff");
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }

        Err(FetchError::NetworkExhausted {
            attempts: self.max_attempts,
            last_error,
        })
    }

    async fn attempt(&self, query: &SearchQuery) -> AttemptOutcome {
        self.limiter.acquire().await;

        let response = match self
            .http
            .get(&self.base_url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&query.to_params())
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => return AttemptOutcome::Retryable(err.to_string()),
        };

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return AttemptOutcome::Fatal(FetchError::BadStatus {
                status,
                body_excerpt: truncate_excerpt(&body),
            });
        }

        match response.json::<SearchEnvelope>().await {
            Ok(envelope) => AttemptOutcome::Success(envelope.into()),
            Err(err) => AttemptOutcome::Fatal(FetchError::Decode(err.to_string())),
        }
    }
}

/// First `BODY_EXCERPT_LEN` bytes of a body, cut on a char boundary.
fn truncate_excerpt(body: &str) -> String {
    if body.len() <= BODY_EXCERPT_LEN {
        return body.to_string();
    }
    let mut end = BODY_EXCERPT_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_string()
}
