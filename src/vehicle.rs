// src/vehicle.rs

//! # Vehicle
//!
//! State shared between guidance and the output-control stage:
//! - [`KineticData`]: measured or commanded kinematic state.
//! - [`FlightModeCell`]: the one shared flight mode.
//! - [`Guidance`]: turns endpoint commands into a setpoint, tick by tick.

pub mod flight_mode;
pub use flight_mode::*;
pub mod guidance;
pub use guidance::*;
pub mod kinetic;
pub use kinetic::*;
