// src/schedule.rs

//! # Cooperative Scheduling
//!
//! Every component in this crate is ticked synchronously from one outer loop.
//! Nothing blocks: rate limiting is done with [`IntervalScheduler`] and the
//! only asynchronous input, a data-ready interrupt, is reduced to a
//! [`DataReadyFlag`].

pub mod interrupt;
pub use interrupt::*;
pub mod interval;
pub use interval::*;
