// src/lib.rs

//! # Flight Core
//!
//! This crate provides the `no_std` sensor-acquisition and guidance core of a
//! flight controller. It is driven from a single cooperative loop: every
//! component exposes a tick function that never blocks.
//!
//! - [`device`]: one lifecycle state machine with bounded retries, shared by
//!   every sensor, plus ADC, IMU and GPS adapters.
//! - [`buffer`]: timestamp-paired telemetry buffers and the chain list used
//!   for guidance paths.
//! - [`schedule`]: interval rate limiting and the interrupt data-ready flag.
//! - [`vehicle`]: kinetic data, the shared flight mode and guidance.
//!
//! The only allocation is in [`buffer::ChainList`], which needs `alloc`.

#![no_std]
#![deny(missing_docs)]

extern crate alloc;

pub mod buffer;
pub mod device;
pub mod error;
pub mod math;
pub mod schedule;
pub mod time;
pub mod vehicle;

#[doc(inline)]
pub use device::{Device, DeviceHealth, DeviceLifecycle, HealthReport, LifecycleConfig};
#[doc(inline)]
pub use error::{DeviceError, GuidanceError};
#[doc(inline)]
pub use vehicle::{FlightMode, FlightModeCell, Guidance, GuidanceConfig, KineticData};

#[cfg(test)]
mod test_utils;
