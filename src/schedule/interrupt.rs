// src/schedule/interrupt.rs

//! # Data-Ready Flag
//!
//! The only asynchronous input to the core. An interrupt handler calls
//! [`DataReadyFlag::set`] and does nothing else; the owning device consumes
//! the flag with [`DataReadyFlag::take`] on its next cooperative tick.
//!
//! The flag uses release/acquire ordering, so register reads made after a
//! successful `take` observe everything the interrupt published before `set`,
//! on single core and preemptive multicore targets alike.

use core::sync::atomic::{AtomicBool, Ordering};

/// Single-bit "data pending" signal shared between an interrupt and a device.
#[derive(Debug, Default)]
pub struct DataReadyFlag(AtomicBool);

impl DataReadyFlag {
    /// Creates a cleared flag. Usable in a `static`.
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Marks data as pending. This is the whole body of the interrupt handler.
    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Clears the flag and returns whether data was pending.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    /// Returns whether data is pending without consuming it.
    pub fn is_pending(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
