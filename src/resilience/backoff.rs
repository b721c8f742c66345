//! Exponential backoff with jitter.

use std::time::Duration;

use rand::Rng;

/// Backoff schedule with explicit attempt state.
///
/// Each call to [`Backoff::next_delay`] advances the schedule; a successful
/// operation should call [`Backoff::reset`] so the next failure starts from
/// the base delay again.
#[derive(Debug)]
pub struct Backoff {
    base_ms: u64,
    max_ms: u64,
    attempt: u32,
}

impl Backoff {
    /// Create a schedule starting at `base_ms` and capped at `max_ms`.
    pub fn new(base_ms: u64, max_ms: u64) -> Self {
        Self {
            base_ms,
            max_ms,
            attempt: 0,
        }
    }

    /// Forget accumulated failures.
    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Delay before the next retry: base * 2^attempt, capped, plus up to
    /// 10% jitter.
    pub fn next_delay(&mut self) -> Duration {
        let exponential_base = 2u64.saturating_pow(self.attempt);
        self.attempt = self.attempt.saturating_add(1);

        let delay_ms = self.base_ms.saturating_mul(exponential_base);
        let capped_delay = delay_ms.min(self.max_ms);

        let jitter_range = capped_delay / 10;
        let jitter = if jitter_range > 0 {
            rand::thread_rng().gen_range(0..jitter_range)
        } else {
            0
        };

        Duration::from_millis(capped_delay + jitter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_growth_and_cap() {
        let mut backoff = Backoff::new(100, 2000);

        let d1 = backoff.next_delay();
        assert!(d1.as_millis() >= 100);

        let d2 = backoff.next_delay();
        assert!(d2.as_millis() >= 200);

        for _ in 0..10 {
            backoff.next_delay();
        }
        let capped = backoff.next_delay();
        assert!(capped.as_millis() >= 2000);
        assert!(capped.as_millis() <= 2200);
    }

    #[test]
    fn test_reset_restarts_schedule() {
        let mut backoff = Backoff::new(100, 2000);
        backoff.next_delay();
        backoff.next_delay();
        backoff.reset();

        let after_reset = backoff.next_delay();
        assert!(after_reset.as_millis() < 200);
    }
}
