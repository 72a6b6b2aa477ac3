//! Progress reporting for a running harvest
//!
//! Emits a progress line every 10 requests or 5 seconds, whichever comes
//! first, with percent of quota, document count, request rate, and ETA.
//! Purely observational; nothing in the run depends on it.

use std::time::{Duration, Instant};
use tracing::info;

const UPDATE_INTERVAL: Duration = Duration::from_secs(5);
const REQUEST_STEP: u32 = 10;

/// Cadence-gated progress state for one run.
#[derive(Debug)]
pub struct ProgressState {
    start_time: Instant,
    last_update: Instant,
    quota: u32,
}

impl ProgressState {
    /// Start tracking a run bounded by `quota` requests.
    pub fn new(quota: u32) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_update: now,
            quota,
        }
    }

    /// Time since the run started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Record a completed request, logging a progress line when due.
    pub fn record_request(&mut self, requests_done: u32, total_docs: u64) {
        if !self.should_emit(requests_done) {
            return;
        }

        let elapsed = self.start_time.elapsed().as_secs_f64();
        let rate = if elapsed > 0.0 {
            f64::from(requests_done) / elapsed
        } else {
            0.0
        };
        let pct = f64::from(requests_done) / f64::from(self.quota.max(1)) * 100.0;
        let eta_minutes = if rate > 0.0 {
            f64::from(self.quota.saturating_sub(requests_done)) / rate / 60.0
        } else {
            0.0
        };

        info!(
            requests = requests_done,
            quota = self.quota,
            pct = format_args!("{pct:.1}"),
            docs = total_docs,
            rate = format_args!("{rate:.1} req/s"),
            eta = format_args!("{eta_minutes:.1}m"),
            "harvest progress"
        );
        self.last_update = Instant::now();
    }

    fn should_emit(&self, requests_done: u32) -> bool {
        requests_done % REQUEST_STEP == 0 || self.last_update.elapsed() >= UPDATE_INTERVAL
    }
}
