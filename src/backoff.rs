//! Fibonacci backoff used between async job status queries

use std::time::Duration;

/// Base unit of the default sequence
pub const DEFAULT_UNIT: Duration = Duration::from_secs(1);

/// n-th Fibonacci number, saturating at `u64::MAX`
pub fn fibonacci(n: u32) -> u64 {
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 0..n {
        let next = a.saturating_add(b);
        a = b;
        b = next;
    }
    a
}

/// Delay before the given attempt, in seconds: 0, 1, 1, 2, 3, 5, ...
pub fn delay(attempt: u32) -> Duration {
    delay_with_unit(attempt, DEFAULT_UNIT)
}

/// Delay before the given attempt scaled to an arbitrary unit
///
/// There is no ceiling here; capping the total wait is the caller's job.
pub fn delay_with_unit(attempt: u32, unit: Duration) -> Duration {
    let nanos = unit.as_nanos().saturating_mul(u128::from(fibonacci(attempt)));
    let secs = nanos / 1_000_000_000;
    match u64::try_from(secs) {
        Ok(secs) => Duration::new(secs, (nanos % 1_000_000_000) as u32),
        Err(_) => Duration::MAX,
    }
}

/// Backoff schedule carried by the poller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub unit: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff { unit: DEFAULT_UNIT }
    }
}

impl Backoff {
    pub fn new(unit: Duration) -> Self {
        Backoff { unit }
    }

    pub fn delay(&self, attempt: u32) -> Duration {
        delay_with_unit(attempt, self.unit)
    }
}
