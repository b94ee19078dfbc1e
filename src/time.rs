// src/time.rs

//! # Monotonic Time
//!
//! The acquisition layer timestamps every sample with a free-running
//! microsecond counter supplied by the host through the [`Clock`] trait.
//! The counter is 64 bits wide so wrap-around is outside any realistic
//! session; differences are still taken with saturating subtraction.

use core::cell::Cell;

/// Microseconds since an arbitrary, fixed epoch (usually boot).
pub type Micros = u64;

/// Source of monotonic microsecond timestamps.
pub trait Clock {
    /// Returns the current time in microseconds.
    fn now_us(&self) -> Micros;

    /// Returns the microseconds elapsed since `reference_us`, saturating at zero.
    fn elapsed_since(&self, reference_us: Micros) -> Micros {
        self.now_us().saturating_sub(reference_us)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_us(&self) -> Micros {
        (**self).now_us()
    }
}

/// Adapts a closure such as a HAL `micros()` function into a [`Clock`].
///
/// ```
/// use starship_flight_core::time::{Clock, FnClock};
///
/// let clock = FnClock(|| 1_500);
/// assert_eq!(clock.now_us(), 1_500);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnClock<F>(pub F);

impl<F: Fn() -> Micros> Clock for FnClock<F> {
    fn now_us(&self) -> Micros {
        (self.0)()
    }
}

/// Clock with manually controlled time, for tests and simulation.
///
/// ```
/// use starship_flight_core::time::{Clock, MockClock};
///
/// let clock = MockClock::new();
/// clock.advance(1_000);
/// assert_eq!(clock.now_us(), 1_000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    current_us: Cell<Micros>,
}

impl MockClock {
    /// Creates a clock starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock starting at `start_us`.
    pub fn starting_at(start_us: Micros) -> Self {
        Self {
            current_us: Cell::new(start_us),
        }
    }

    /// Moves time forward by `us` microseconds.
    pub fn advance(&self, us: Micros) {
        self.current_us.set(self.current_us.get().saturating_add(us));
    }

    /// Jumps to an absolute time.
    pub fn set(&self, us: Micros) {
        self.current_us.set(us);
    }
}

impl Clock for MockClock {
    fn now_us(&self) -> Micros {
        self.current_us.get()
    }
}
