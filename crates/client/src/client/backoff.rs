//! Delay policy between search job status polls.
//!
//! Capped exponential growth with symmetric jitter: attempt `n` waits
//! `min(initial * multiplier^n, max)`, then scales that by a random factor in
//! `[1 - jitter, 1 + jitter]`.

use std::time::Duration;

use sumo_config::PollingConfig;
use sumo_config::constants::{
    DEFAULT_POLL_INITIAL_MS, DEFAULT_POLL_JITTER, DEFAULT_POLL_MAX_MS, DEFAULT_POLL_MULTIPLIER,
};

#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    pub initial: Duration,
    pub multiplier: f64,
    pub max: Duration,
    /// Fraction of each delay randomized in either direction, clamped to `[0, 1)`.
    pub jitter: f64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(DEFAULT_POLL_INITIAL_MS),
            multiplier: DEFAULT_POLL_MULTIPLIER,
            max: Duration::from_millis(DEFAULT_POLL_MAX_MS),
            jitter: DEFAULT_POLL_JITTER,
        }
    }
}

impl From<&PollingConfig> for BackoffPolicy {
    fn from(polling: &PollingConfig) -> Self {
        Self {
            initial: polling.poll_initial,
            multiplier: polling.poll_multiplier,
            max: polling.poll_max,
            jitter: polling.poll_jitter,
        }
    }
}

impl BackoffPolicy {
    /// The same delay before every poll, without jitter.
    pub fn fixed(delay: Duration) -> Self {
        Self {
            initial: delay,
            multiplier: 1.0,
            max: delay,
            jitter: 0.0,
        }
    }

    /// Un-jittered delay before poll `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let max = self.max.max(self.initial);
        let multiplier = self.multiplier.max(1.0);
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let scaled = self.initial.as_secs_f64() * multiplier.powi(exponent);

        if !scaled.is_finite() || scaled >= max.as_secs_f64() {
            max
        } else {
            Duration::from_secs_f64(scaled)
        }
    }

    /// Delay before poll `attempt` with jitter applied.
    pub fn jittered_delay(&self, attempt: u32) -> Duration {
        self.apply_jitter(self.delay_for(attempt), rand::random::<f64>())
    }

    /// Scale `delay` by `1 + jitter * (2 * sample - 1)` for a sample in `[0, 1)`.
    fn apply_jitter(&self, delay: Duration, sample: f64) -> Duration {
        let jitter = self.jitter.clamp(0.0, 0.99);
        if jitter == 0.0 {
            return delay;
        }
        let factor = 1.0 + jitter * (2.0 * sample.clamp(0.0, 1.0) - 1.0);
        delay.mul_f64(factor)
    }
}
