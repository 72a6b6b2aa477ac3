//! Harvest configuration and retry timing constants

use std::path::PathBuf;
use std::time::Duration;

/// Maximum requests issued in a single run before stopping with a
/// quota-reached checkpoint. 10,000 requests at 25 docs/page is ~250k
/// documents, a reasonable per-run slice of a multi-day harvest.
pub const MAX_REQS_PER_RUN: u32 = 10_000;

/// Flush the record buffer to a compressed chunk every N requests.
pub const CHUNK_SIZE_REQS: u32 = 5_000;

/// Maximum requests allowed per rolling rate window.
/// Scopus enforces 9 req/s on the search endpoint.
pub const MAX_RPS: usize = 9;

/// Rolling window for the rate limiter.
pub const RATE_WINDOW: Duration = Duration::from_secs(1);

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Total attempts for one logical fetch (first try + retries).
/// 5 attempts with linear backoff bounds a dead network at ~20s of waiting
/// before the run shuts down gracefully.
pub const MAX_ATTEMPTS: u32 = 5;

/// Base delay before the first retry; subsequent retries add one second per
/// completed attempt (2s, 3s, 4s, 5s).
pub const RETRY_BASE_DELAY: Duration = Duration::from_secs(2);

/// Scopus Search API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.elsevier.com/content/search/scopus";

/// Linear backoff: `base + attempt` seconds, attempt counted from 0.
pub fn retry_backoff(attempt: u32, base: Duration) -> Duration {
    base + Duration::from_secs(u64::from(attempt))
}

/// Runtime configuration for one harvest run.
///
/// The reference deployment's values are the defaults; everything here is
/// CLI-overridable. Owned by the caller and passed by reference into the
/// components that need slices of it.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Search endpoint base URL (overridable for tests).
    pub base_url: String,
    /// Per-run request quota.
    pub max_requests_per_run: u32,
    /// Requests per chunk flush.
    pub chunk_size_requests: u32,
    /// Requests allowed per rolling window.
    pub max_requests_per_window: usize,
    /// Rolling rate window duration.
    pub rate_window: Duration,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Total fetch attempts before giving up on the network.
    pub max_attempts: u32,
    /// Base delay for the linear retry backoff.
    pub retry_base_delay: Duration,
    /// Directory receiving compressed chunk files.
    pub out_dir: PathBuf,
    /// Path of the checkpoint file.
    pub state_file: PathBuf,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_requests_per_run: MAX_REQS_PER_RUN,
            chunk_size_requests: CHUNK_SIZE_REQS,
            max_requests_per_window: MAX_RPS,
            rate_window: RATE_WINDOW,
            request_timeout: REQUEST_TIMEOUT,
            max_attempts: MAX_ATTEMPTS,
            retry_base_delay: RETRY_BASE_DELAY,
            out_dir: PathBuf::from("Data/raw"),
            state_file: PathBuf::from("cursor_state.json"),
        }
    }
}
