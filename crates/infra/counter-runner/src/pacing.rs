//! Pauses between attempts.

use std::time::Duration;

use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform random pause drawn from an inclusive millisecond range.
#[derive(Debug, Clone)]
pub struct Jitter {
    min_ms: u64,
    max_ms: u64,
    rng: ChaCha8Rng,
}

impl Jitter {
    /// Creates a generator over `[min, max]`. Bounds are swapped if inverted.
    pub fn new(min: Duration, max: Duration, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let (min_ms, max_ms) = (duration_ms(min), duration_ms(max));
        Self { min_ms: min_ms.min(max_ms), max_ms: min_ms.max(max_ms), rng }
    }

    /// Draws the next pause.
    pub fn next_delay(&mut self) -> Duration {
        Duration::from_millis(self.rng.gen_range(self.min_ms..=self.max_ms))
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// The pause schedule of a run: random jitter after a success, fixed backoff after a failure.
#[derive(Debug, Clone)]
pub struct Pacing {
    jitter: Jitter,
    retry_backoff: Duration,
}

impl Pacing {
    /// Creates a schedule.
    pub fn new(min: Duration, max: Duration, retry_backoff: Duration, seed: Option<u64>) -> Self {
        Self { jitter: Jitter::new(min, max, seed), retry_backoff }
    }

    /// Pause following a successful attempt.
    pub fn after_success(&mut self) -> Duration {
        self.jitter.next_delay()
    }

    /// Pause following a failed attempt.
    pub const fn after_failure(&self) -> Duration {
        self.retry_backoff
    }
}

/// Suspends the run loop.
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
    fn test_jitter_stays_in_bounds() {
        let mut jitter = Jitter::new(Duration::from_millis(1_000), Duration::from_millis(3_000), None);
        for _ in 0..1_000 {
            let delay = jitter.next_delay();
            assert!(delay >= Duration::from_millis(1_000));
            assert!(delay <= Duration::from_millis(3_000));
        }
    }

    #[test]
    fn test_seeded_jitter_is_reproducible() {
        let min = Duration::from_millis(0);
        let max = Duration::from_millis(10_000);
        let mut a = Jitter::new(min, max, Some(42));
        let mut b = Jitter::new(min, max, Some(42));
        let first: Vec<_> = (0..16).map(|_| a.next_delay()).collect();
        let second: Vec<_> = (0..16).map(|_| b.next_delay()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_degenerate_range() {
        let mut jitter = Jitter::new(Duration::from_millis(250), Duration::from_millis(250), None);
        assert_eq!(jitter.next_delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_backoff_is_fixed() {
        let pacing = Pacing::new(
            Duration::from_millis(1),
            Duration::from_millis(2),
            Duration::from_millis(5_000),
            Some(1),
        );
        assert_eq!(pacing.after_failure(), Duration::from_millis(5_000));
        assert_eq!(pacing.after_failure(), Duration::from_millis(5_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_sleeper_advances_clock() {
        let start = tokio::time::Instant::now();
        TokioSleeper.sleep(Duration::from_secs(5)).await;
        assert!(start.elapsed() >= Duration::from_secs(5));
    }
}
