//! Bounded-poll readiness. The probe never waits on a fixed delay: a
//! lookup is retried a limited number of times with a sleep between
//! attempts, then gives up. Exhaustion reads the same as a failed
//! lookup.

use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Maximum number of lookup attempts. At least one is always made.
    pub max_attempts: u32,
    /// Sleep between attempts. Not applied after the last one.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            interval: Duration::from_millis(200),
        }
    }
}

impl PollConfig {
    /// A single attempt, no sleeping. What in-memory pages want.
    pub fn immediate() -> Self {
        Self {
            max_attempts: 1,
            interval: Duration::ZERO,
        }
    }
}

/// Re-run a lookup until it yields a value or attempts run out.
pub fn poll_until<T>(config: &PollConfig, mut lookup: impl FnMut() -> Option<T>) -> Option<T> {
    let attempts = config.max_attempts.max(1);
    for attempt in 0..attempts {
        if let Some(value) = lookup() {
            return Some(value);
        }
        if attempt + 1 < attempts && !config.interval.is_zero() {
            thread::sleep(config.interval);
        }
    }
    None
}
