//! Time sources.
//!
//! An axis reads time through a [`Clock`] chosen at construction. Readings are
//! in clock units; an axis whose speed scale is `k` expects `k` units per second.

use core::cell::Cell;

/// Monotonic time source.
///
/// Takes `&self` so one clock can be shared by every axis of a machine.
pub trait Clock {
    /// Time since a clock-specific reference point, in clock units.
    fn now(&self) -> f64;
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now(&self) -> f64 {
        C::now(self)
    }
}

/// Operating system clock, counting from its creation.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: std::time::Instant,
    ticks_per_second: f64,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Clock reading seconds.
    pub fn new() -> Self {
        Self::with_ticks_per_second(1.0)
    }

    /// Clock reading `ticks_per_second` units per second, e.g. `1e6` for microseconds.
    pub fn with_ticks_per_second(ticks_per_second: f64) -> Self {
        Self {
            origin: std::time::Instant::now(),
            ticks_per_second,
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * self.ticks_per_second
    }
}

/// Deterministic clock that advances by a fixed tick on every reading.
///
/// Drives simulations and tests without sleeping.
#[derive(Debug, Clone)]
pub struct SimClock {
    now: Cell<f64>,
    tick: f64,
}

impl SimClock {
    /// Start at zero, advancing `tick` per reading.
    pub fn new(tick: f64) -> Self {
        Self {
            now: Cell::new(0.0),
            tick,
        }
    }

    /// Time the next reading will return.
    #[inline]
    pub fn peek(&self) -> f64 {
        self.now.get()
    }

    /// Move the clock forward without reading it.
    pub fn advance(&self, by: f64) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for SimClock {
    fn now(&self) -> f64 {
        let now = self.now.get();
        self.now.set(now + self.tick);
        now
    }
}
