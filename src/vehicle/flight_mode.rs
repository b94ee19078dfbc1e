// src/vehicle/flight_mode.rs

//! # Flight Mode
//!
//! The vehicle-wide control authority. There is exactly one [`FlightModeCell`]
//! per vehicle, typically a `static`, and every consumer holds a reference to
//! it rather than a copy. Only the vehicle supervisor is expected to write it.

use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

/// Control authority of the whole vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum FlightMode {
    /// Outputs off.
    #[default]
    Disarmed = 0,
    /// Outputs live, no active control loop.
    Armed = 1,
    /// Guidance frozen, vehicle holds or recovers.
    Failsafe = 2,
    /// Body rate control.
    RateControl = 3,
    /// Attitude control.
    AttitudeControl = 4,
    /// Velocity control.
    VelocityControl = 5,
    /// Position control.
    PositionControl = 6,
}

impl FlightMode {
    /// Raw byte used for storage and transmission.
    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    /// Returns `true` for [`FlightMode::Failsafe`].
    pub const fn is_failsafe(self) -> bool {
        matches!(self, FlightMode::Failsafe)
    }
}

impl From<u8> for FlightMode {
    /// Unknown bytes decode to [`FlightMode::Failsafe`].
    fn from(raw: u8) -> Self {
        match raw {
            0 => FlightMode::Disarmed,
            1 => FlightMode::Armed,
            3 => FlightMode::RateControl,
            4 => FlightMode::AttitudeControl,
            5 => FlightMode::VelocityControl,
            6 => FlightMode::PositionControl,
            _ => FlightMode::Failsafe,
        }
    }
}

impl fmt::Display for FlightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlightMode::Disarmed => "disarmed",
            FlightMode::Armed => "armed",
            FlightMode::Failsafe => "failsafe",
            FlightMode::RateControl => "rate",
            FlightMode::AttitudeControl => "attitude",
            FlightMode::VelocityControl => "velocity",
            FlightMode::PositionControl => "position",
        };
        f.pad(name)
    }
}

/// Shared single location holding the current [`FlightMode`].
#[derive(Debug)]
pub struct FlightModeCell(AtomicU8);

impl FlightModeCell {
    /// Creates a cell holding `mode`. Usable in a `static`.
    pub const fn new(mode: FlightMode) -> Self {
        Self(AtomicU8::new(mode.as_raw()))
    }

    /// Current mode.
    pub fn get(&self) -> FlightMode {
        FlightMode::from(self.0.load(Ordering::Acquire))
    }

    /// Replaces the current mode.
    pub fn set(&self, mode: FlightMode) {
        self.0.store(mode.as_raw(), Ordering::Release);
    }
}

impl Default for FlightModeCell {
    fn default() -> Self {
        Self::new(FlightMode::Disarmed)
    }
}
