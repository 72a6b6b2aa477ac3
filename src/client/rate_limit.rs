//! Sliding-window rate limiting
//!
//! Bounds outbound requests to N per rolling window of duration W by keeping
//! a FIFO of the last N send times and sleeping until the oldest one ages out.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Padding added to each computed wait so the oldest timestamp is strictly
/// outside the window when we re-check.
const WAKE_SLACK: Duration = Duration::from_millis(1);

/// Sliding-window rate limiter.
///
/// The reference harvest runs a single task, but the timestamp queue sits
/// behind a mutex so the limiter stays correct if callers ever share it.
pub struct SlidingWindowLimiter {
    max_requests: usize,
    window: Duration,
    recent: Mutex<VecDeque<Instant>>,
}

impl SlidingWindowLimiter {
    /// Create a limiter allowing `max_requests` per rolling `window`.
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            recent: Mutex::new(VecDeque::with_capacity(max_requests)),
        }
    }

    /// Block until issuing one more request stays within the limit, then
    /// record the send time. Never fails; pure backoff behavior.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut recent = self.recent.lock().await;
                let now = Instant::now();

                while recent
                    .front()
                    .is_some_and(|ts| now.duration_since(*ts) >= self.window)
                {
                    recent.pop_front();
                }

                if recent.len() < self.max_requests {
                    recent.push_back(now);
                    return;
                }

                // Queue is full; the front entry is the one that must expire.
                let oldest = *recent
                    .front()
                    .unwrap_or(&now);
                self.window - now.duration_since(oldest) + WAKE_SLACK
            };

            sleep(wait).await;
        }
    }

    /// Number of send times currently inside the window.
    #[cfg(test)]
    async fn in_flight(&self) -> usize {
        let recent = self.recent.lock().await;
        let now = Instant::now();
        recent
            .iter()
            .filter(|ts| now.duration_since(**ts) < self.window)
            .count()
    }
}
