//! Fixed-interval pacing between browser actions
//!
//! Two delays shape a crawl:
//! - a settle delay after each successful navigation, so late client-side
//!   rendering has a chance to run (and to crash)
//! - a delay between consecutive URLs, so the target site sees a gentle
//!   request rate
//!
//! Both are plain sleeps on the tokio timer, which lets tests drive them with
//! paused time.

use crate::config::PacingConfig;
use std::time::Duration;

/// Fixed delays applied by the probe and the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiter {
    settle: Duration,
    between_urls: Duration,
}

impl RateLimiter {
    /// Creates a rate limiter with explicit delays
    ///
    /// # Arguments
    ///
    /// * `settle` - Delay after each successful navigation
    /// * `between_urls` - Delay after each URL, whatever its outcome
    pub fn new(settle: Duration, between_urls: Duration) -> Self {
        Self {
            settle,
            between_urls,
        }
    }

    /// Builds the rate limiter from the `[pacing]` config section
    pub fn from_config(config: &PacingConfig) -> Self {
        Self::new(
            Duration::from_millis(config.settle_delay_ms),
            Duration::from_millis(config.between_urls_delay_ms),
        )
    }

    /// A rate limiter that never waits
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle
    }

    pub fn between_urls_delay(&self) -> Duration {
        self.between_urls
    }

    /// Suspends the current task for `duration`
    ///
    /// A zero duration returns immediately without touching the timer.
    pub async fn wait(duration: Duration) {
        if duration.is_zero() {
            return;
        }
        tracing::trace!("Waiting {}ms", duration.as_millis());
        tokio::time::sleep(duration).await;
    }

    /// Waits out the post-navigation settle delay
    pub async fn settle(&self) {
        Self::wait(self.settle).await;
    }

    /// Waits out the delay between two URLs
    pub async fn between_urls(&self) {
        Self::wait(self.between_urls).await;
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::from_config(&PacingConfig::default())
    }
}
