//! Time sources for bracketing measured work
//!
//! All durations are carried as [`Elapsed`], a non-negative millisecond
//! value. Micro/nanosecond accessors exist for presentation only.

use std::cell::Cell;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Div};
use std::rc::Rc;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Non-negative elapsed time in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Elapsed(f64);

impl Elapsed {
    pub const ZERO: Elapsed = Elapsed(0.0);

    /// Negative and NaN inputs clamp to zero.
    pub fn from_millis(ms: f64) -> Self {
        if ms > 0.0 {
            Self(ms)
        } else {
            Self::ZERO
        }
    }

    pub fn from_micros(us: f64) -> Self {
        Self::from_millis(us / 1_000.0)
    }

    pub fn from_nanos(ns: u64) -> Self {
        Self::from_millis(ns as f64 / 1_000_000.0)
    }

    pub fn from_std(duration: Duration) -> Self {
        Self::from_millis(duration.as_secs_f64() * 1_000.0)
    }

    pub fn as_millis(self) -> f64 {
        self.0
    }

    pub fn as_micros(self) -> f64 {
        self.0 * 1_000.0
    }

    pub fn as_nanos(self) -> f64 {
        self.0 * 1_000_000.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl Add for Elapsed {
    type Output = Elapsed;

    fn add(self, rhs: Elapsed) -> Elapsed {
        Elapsed(self.0 + rhs.0)
    }
}

impl Sum for Elapsed {
    fn sum<I: Iterator<Item = Elapsed>>(iter: I) -> Elapsed {
        iter.fold(Elapsed::ZERO, Add::add)
    }
}

/// Even split across `count` operations; zero for an empty count.
impl Div<u64> for Elapsed {
    type Output = Elapsed;

    fn div(self, count: u64) -> Elapsed {
        if count == 0 {
            Elapsed::ZERO
        } else {
            Elapsed(self.0 / count as f64)
        }
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} ms", self.0)
    }
}

/// Monotonic time source
pub trait Clock {
    type Instant: Copy;

    fn now(&self) -> Self::Instant;

    /// Time between two instants of this clock. An `end` that precedes
    /// `start` yields [`Elapsed::ZERO`], never a negative value.
    fn elapsed(&self, start: Self::Instant, end: Self::Instant) -> Elapsed;
}

/// Wall-clock backed by [`std::time::Instant`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    type Instant = Instant;

    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, start: Instant, end: Instant) -> Elapsed {
        Elapsed::from_std(end.saturating_duration_since(start))
    }
}

/// Manually advanced nanosecond counter.
///
/// Clones share the same counter, so a stub subject can charge a fixed
/// cost per operation while the runner reads the same clock.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, nanos: u64) {
        self.nanos.set(self.nanos.get().saturating_add(nanos));
    }

    pub fn current(&self) -> u64 {
        self.nanos.get()
    }
}

impl Clock for ManualClock {
    type Instant = u64;

    fn now(&self) -> u64 {
        self.nanos.get()
    }

    fn elapsed(&self, start: u64, end: u64) -> Elapsed {
        Elapsed::from_nanos(end.saturating_sub(start))
    }
}
