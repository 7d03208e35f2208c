use std::time::Duration;
use tracing::debug;

/// Pause inserted between enrichment batches to stay under the upstream rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    interval: Duration,
}

impl PacingPolicy {
    /// Derive the pause from a requests-per-minute ceiling and the number of calls a
    /// batch issues. A ceiling of 0 disables pacing.
    pub fn from_rate(requests_per_minute: u32, calls_per_batch: u32) -> Self {
        if requests_per_minute == 0 {
            return Self::disabled();
        }
        let millis = 60_000u64 * u64::from(calls_per_batch) / u64::from(requests_per_minute);
        Self {
            interval: Duration::from_millis(millis),
        }
    }

    pub fn fixed(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn disabled() -> Self {
        Self {
            interval: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn pause(&self) {
        if self.interval.is_zero() {
            return;
        }
        debug!("Waiting {:?} before next batch", self.interval);
        tokio::time::sleep(self.interval).await;
    }
}
