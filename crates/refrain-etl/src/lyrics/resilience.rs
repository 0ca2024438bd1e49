//! Request pacing for lyrics sources.

use std::cell::Cell;
use std::thread::sleep;
use std::time::{Duration, Instant};

/// Spaces out blocking requests to at most `requests_per_second`.
///
/// The limiter remembers when the previous slot was handed out and sleeps
/// the calling thread for whatever is left of the interval. It is meant for
/// a single pipeline thread and is therefore not `Sync`.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    interval: Duration,
    last: Cell<Option<Instant>>,
}

impl RateLimiter {
    /// Creates a new `RateLimiter` that allows at most
    /// `requests_per_second` requests per second (minimum 1).
    pub fn new(requests_per_second: u32) -> Self {
        Self {
            interval: Duration::from_millis(1000 / u64::from(requests_per_second.max(1))),
            last: Cell::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Blocks until a request slot is available.
    pub fn acquire(&self) {
        if let Some(last) = self.last.get() {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                sleep(self.interval - elapsed);
            }
        }
        self.last.set(Some(Instant::now()));
    }
}
