//! # Retry Backoff
//!
//! Delays between failed feed requests. The poller never gives up, so there
//! is no attempt limit here: the delay grows exponentially up to a cap and
//! stays there until a request succeeds and the backoff is reset.
//!
//! ## Features
//!
//! - **Exponential Backoff**: base, 2x base, 4x base ... up to the cap
//! - **Jitter**: +/- a fraction of the delay so clients don't retry in lockstep
//!
//! ## Usage
//!
//! ```rust
//! use pollchat::client::retry::{Backoff, BackoffStrategy};
//! use std::time::Duration;
//!
//! let mut backoff = Backoff::new(BackoffStrategy::Fixed { interval: Duration::from_secs(1) });
//! assert_eq!(backoff.next_delay(), Duration::from_secs(1));
//! backoff.reset();
//! assert_eq!(backoff.attempt(), 0);
//! ```

use rand::Rng;
use std::time::Duration;

/// Backoff strategy configuration
#[derive(Debug, Clone, PartialEq)]
pub enum BackoffStrategy {
    /// Fixed interval between retries
    Fixed {
        interval: Duration,
    },
    /// Exponential backoff with jitter
    Exponential {
        /// Delay before the first retry
        base: Duration,
        /// Upper bound on any delay
        max: Duration,
        /// Jitter factor (0.0 to 1.0)
        jitter: f64,
    },
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(250),
            max: Duration::from_secs(30),
            jitter: 0.1,
        }
    }
}

impl BackoffStrategy {
    /// Delay before retry number `attempt` (1-based), before jitter
    pub fn nominal_delay(&self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { interval } => *interval,
            Self::Exponential { base, max, .. } => {
                let factor = 1u32
                    .checked_shl(attempt.saturating_sub(1))
                    .unwrap_or(u32::MAX);
                base.saturating_mul(factor).min(*max)
            }
        }
    }

    fn jittered(&self, delay: Duration) -> Duration {
        match self {
            Self::Fixed { .. } => delay,
            Self::Exponential { jitter, .. } if *jitter <= 0.0 => delay,
            Self::Exponential { max, jitter, .. } => {
                let jitter = jitter.min(1.0);
                let factor = 1.0 + rand::thread_rng().gen_range(-jitter..=jitter);
                delay.mul_f64(factor).min(*max)
            }
        }
    }
}

/// Backoff state for one retry sequence
#[derive(Debug, Clone)]
pub struct Backoff {
    strategy: BackoffStrategy,
    attempt: u32,
}

impl Backoff {
    pub fn new(strategy: BackoffStrategy) -> Self {
        Self {
            strategy,
            attempt: 0,
        }
    }

    /// Record a failure and return how long to wait before retrying
    pub fn next_delay(&mut self) -> Duration {
        self.attempt = self.attempt.saturating_add(1);
        let delay = self.strategy.nominal_delay(self.attempt);
        self.strategy.jittered(delay)
    }

    /// Start over after a success
    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Failures since the last reset
    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}
