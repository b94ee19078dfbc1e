// src/error.rs

//! Error types shared across the crate.
//!
//! Expected failure modes of the state machines (busy bus, failed start) are
//! encoded as state transitions, not errors. These types describe what a
//! single call could not do.

/// Failure reported by a sensor adapter to its lifecycle controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    /// The bus driver's start routine returned a non-positive code.
    #[error("device start failed with code {0}")]
    StartFailed(i32),
    /// A transfer on the bus failed.
    #[error("bus transfer failed")]
    Bus,
    /// A conversion result was read without a matching request.
    #[error("no conversion pending")]
    NoConversionPending,
}

/// A guidance command that was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GuidanceError {
    /// Guidance is frozen while the flight mode is failsafe.
    #[error("guidance is frozen in failsafe")]
    Failsafe,
    /// The path already holds the maximum number of waypoints.
    #[error("path already holds {0} waypoints")]
    PathFull(usize),
    /// Waypoints can only be appended to a linear path.
    #[error("no linear path to extend")]
    NoActivePath,
}
