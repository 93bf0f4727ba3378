//! Time sources and the fixed-rate ticker
//!
//! Growth and customer patience are computed from "now minus stored
//! timestamp", so the session only needs a monotonic clock. Tests drive a
//! `ManualClock` to get exact, repeatable timings.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Maximum ticks a single `Ticker::due` call will report after a stall
pub const MAX_CATCH_UP_TICKS: u32 = 10;

/// A monotonic time source measured from the session origin
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock backed by `Instant`
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually advanced clock. Clones share the same time, so a test can keep
/// one handle while the session owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_millis(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }

    pub fn advance_secs_f32(&self, secs: f32) {
        self.advance(Duration::from_secs_f32(secs.max(0.0)));
    }

    /// Jump to an absolute time. Going backwards is ignored.
    pub fn set(&self, at: Duration) {
        if at > self.now.get() {
            self.now.set(at);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Fixed-cadence tick accumulator
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    last: Duration,
    accumulated: Duration,
    ticks: u64,
}

impl Ticker {
    /// Create a ticker running at `rate_hz` ticks per second, starting at `start`
    pub fn new(rate_hz: u32, start: Duration) -> Self {
        let rate = rate_hz.max(1);
        Self {
            interval: Duration::from_secs(1) / rate,
            last: start,
            accumulated: Duration::ZERO,
            ticks: 0,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.interval
    }

    /// Total ticks handed out so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of whole ticks that became due since the previous call.
    /// Anything beyond `MAX_CATCH_UP_TICKS` is discarded.
    pub fn due(&mut self, now: Duration) -> u32 {
        let elapsed = now.saturating_sub(self.last);
        self.last = now.max(self.last);
        self.accumulated += elapsed;

        let mut due = 0;
        while self.accumulated >= self.interval {
            self.accumulated -= self.interval;
            due += 1;
            if due == MAX_CATCH_UP_TICKS {
                self.accumulated = Duration::ZERO;
                break;
            }
        }
        self.ticks += u64::from(due);
        due
    }
}
