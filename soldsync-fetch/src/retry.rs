//! Backoff schedule for rate-limited requests.

use async_trait::async_trait;
use std::time::Duration;

/// Waits applied after consecutive 429 responses: 10s, 20s, 40s, 1m, 2m,
/// 4m, 6m, 10m.
pub const RATE_LIMIT_DELAYS: [Duration; 8] = [
    Duration::from_secs(10),
    Duration::from_secs(20),
    Duration::from_secs(40),
    Duration::from_secs(60),
    Duration::from_secs(120),
    Duration::from_secs(240),
    Duration::from_secs(360),
    Duration::from_secs(600),
];

// ============================================================================
// Delay Schedule
// ============================================================================

/// Fixed escalating sequence of waits.
///
/// Index `i` is the wait before retry `i + 1`. An index past the end means
/// the caller should give up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelaySchedule {
    delays: &'static [Duration],
}

impl DelaySchedule {
    /// The marketplace rate-limit schedule.
    pub const fn rate_limit() -> Self {
        Self {
            delays: &RATE_LIMIT_DELAYS,
        }
    }

    /// Delay before the retry following `attempt` rate-limited responses,
    /// or `None` once the schedule is exhausted.
    pub fn delay_for(&self, attempt: usize) -> Option<Duration> {
        self.delays.get(attempt).copied()
    }

    /// Number of retries the schedule allows.
    pub fn len(&self) -> usize {
        self.delays.len()
    }

    /// Returns true if the schedule allows no retries.
    pub fn is_empty(&self) -> bool {
        self.delays.is_empty()
    }
}

impl Default for DelaySchedule {
    fn default() -> Self {
        Self::rate_limit()
    }
}

// ============================================================================
// Sleeper
// ============================================================================

/// Suspends the current task. Swapped for a recording fake in tests.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Sleeps for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_schedule() {
        let schedule = DelaySchedule::rate_limit();
        let secs: Vec<u64> = (0..schedule.len())
            .filter_map(|i| schedule.delay_for(i))
            .map(|d| d.as_secs())
            .collect();

        assert_eq!(secs, vec![10, 20, 40, 60, 120, 240, 360, 600]);
    }

    #[test]
    fn test_exhausted_schedule() {
        let schedule = DelaySchedule::default();
        assert_eq!(schedule.len(), 8);
        assert!(schedule.delay_for(8).is_none());
        assert!(schedule.delay_for(100).is_none());
    }

    #[test]
    fn test_total_wait() {
        assert_eq!(RATE_LIMIT_DELAYS.iter().sum::<Duration>(), Duration::from_secs(1450));
    }

    #[tokio::test]
    async fn test_tokio_sleeper_zero() {
        TokioSleeper.sleep(Duration::ZERO).await;
    }
}
