// src/device.rs

//! # Sensor Devices
//!
//! Every physical sensor runs behind the same lifecycle: it is started,
//! retried a bounded number of times if the start fails, polled without
//! blocking while running, and parked for good once its retry budget is
//! spent. The lifecycle is implemented once in [`DeviceLifecycle`]; a sensor
//! only provides the small [`Device`] capability set.
//!
//! Adapters for the sensors on the vehicle:
//! - [`adc`]: four-input ADC sampled round-robin.
//! - [`imu`]: gyro, accelerometer and magnetometer behind a data-ready interrupt.
//! - [`gps`]: position and velocity fixes.

use crate::time::Micros;
use core::fmt;

pub mod adc;
pub mod gps;
pub mod imu;
pub mod lifecycle;
pub use lifecycle::*;

/// Capability set a sensor exposes to its lifecycle controller.
pub trait Device {
    /// Short name used in log messages.
    const NAME: &'static str;

    /// The telemetry buffers this device fills.
    type Channels;

    /// Failure reported by `init` or `read_into`.
    type Error: fmt::Debug;

    /// Starts (or restarts) the device.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Returns `true` while the device is mid-conversion and must not be read.
    ///
    /// Polled once per acquisition tick; `read_into` is only called after
    /// this returned `false`.
    fn is_busy(&mut self) -> bool {
        false
    }

    /// Performs one non-blocking acquisition step, pushing whatever is
    /// available into `channels` stamped with `timestamp`.
    ///
    /// Returns the number of samples counted toward the data rate.
    /// `nb::Error::WouldBlock` means nothing was ready this tick.
    fn read_into(
        &mut self,
        channels: &mut Self::Channels,
        timestamp: Micros,
    ) -> nb::Result<u32, Self::Error>;
}

/// Health of one sensor.
///
/// The transition table is the same for every device:
///
/// | From             | Event                       | To               |
/// |------------------|-----------------------------|------------------|
/// | `NotStarted`     | start ok                    | `Running`        |
/// | `NotStarted`     | start failed                | `RestartAttempt` |
/// | `RestartAttempt` | start ok                    | `Running`        |
/// | `RestartAttempt` | start failed, budget left   | `RestartAttempt` |
/// | `RestartAttempt` | start failed, budget spent  | `Failure`        |
/// | `Running`        | read failed                 | `RestartAttempt` |
/// | `Failure`        | (terminal)                  | `Failure`        |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum DeviceHealth {
    /// The device has never been started.
    #[default]
    NotStarted = 0,
    /// The device is started and being polled.
    Running = 1,
    /// A start failed and will be retried.
    RestartAttempt = 2,
    /// The retry budget is spent. Needs an external hard reset.
    Failure = 3,
}

impl DeviceHealth {
    /// Encodes the state as a byte for telemetry.
    pub const fn as_raw(self) -> u8 {
        self as u8
    }
}

/// Decodes a telemetry byte. Unknown codes decode to `Failure`.
impl From<u8> for DeviceHealth {
    fn from(raw: u8) -> Self {
        match raw {
            0 => DeviceHealth::NotStarted,
            1 => DeviceHealth::Running,
            2 => DeviceHealth::RestartAttempt,
            _ => DeviceHealth::Failure,
        }
    }
}

impl fmt::Display for DeviceHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceHealth::NotStarted => "not started",
            DeviceHealth::Running => "running",
            DeviceHealth::RestartAttempt => "restart attempt",
            DeviceHealth::Failure => "failure",
        };
        f.write_str(name)
    }
}

/// Read-only snapshot for health monitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthReport {
    /// Current lifecycle state.
    pub health: DeviceHealth,
    /// Number of start attempts made so far.
    pub start_attempts: u8,
    /// Scheduled ticks in the last reporting interval.
    pub loop_rate: u32,
    /// Samples acquired in the last reporting interval.
    pub data_rate: u32,
    /// Time of the last successful start or acquisition.
    pub last_measurement_us: Micros,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_raw_round_trip() {
        for health in [
            DeviceHealth::NotStarted,
            DeviceHealth::Running,
            DeviceHealth::RestartAttempt,
            DeviceHealth::Failure,
        ] {
            assert_eq!(health, DeviceHealth::from(health.as_raw()));
        }
    }

    /// Garbage never decodes into a live state.
    #[test]
    fn test_unknown_raw_is_failure() {
        assert_eq!(DeviceHealth::Failure, DeviceHealth::from(4));
        assert_eq!(DeviceHealth::Failure, DeviceHealth::from(0xFF));
    }
}
