// src/device/gps.rs

//! # GPS Adapter
//!
//! Buffers position and velocity fixes from a GPS receiver. The receiver
//! produces a fix at its own measurement rate; polling in between is a no-op.

use crate::buffer::TelemetryBuffer;
use crate::device::Device;
use crate::error::DeviceError;
use crate::math::Vector3;
use crate::time::Micros;

/// One navigation solution.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GpsFix {
    /// Position in the local navigation frame, metres.
    pub position: Vector3<f32>,
    /// Velocity in the local navigation frame, m/s.
    pub velocity: Vector3<f32>,
    /// Satellites used in the solution.
    pub satellites: u8,
}

/// Receiver driver. Provided by the board support code.
pub trait GpsBus {
    /// Opens the port and probes the receiver. Non-positive codes are failures.
    fn begin(&mut self) -> i32;

    /// Sets the navigation solution rate.
    fn configure(&mut self, settings: &GpsSettings);

    /// Returns a new fix if one has arrived since the last poll.
    fn poll(&mut self) -> nb::Result<GpsFix, DeviceError>;
}

/// Receiver settings applied on every start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpsSettings {
    /// Navigation solutions per second.
    pub measurement_rate_hz: u16,
}

impl GpsSettings {
    /// 10 Hz solutions.
    pub const fn new() -> Self {
        Self {
            measurement_rate_hz: 10,
        }
    }
}

impl Default for GpsSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Buffered GPS channels.
#[derive(Debug, Clone, Default)]
pub struct GpsChannels<const N: usize> {
    /// Position fixes.
    pub position: TelemetryBuffer<Vector3<f32>, N>,
    /// Velocity fixes.
    pub velocity: TelemetryBuffer<Vector3<f32>, N>,
}

/// GPS device holding `N` fixes per channel.
pub struct GpsDevice<B, const N: usize> {
    bus: B,
    settings: GpsSettings,
    satellites: u8,
}

impl<B: GpsBus, const N: usize> GpsDevice<B, N> {
    /// Creates a device with default settings.
    pub fn new(bus: B) -> Self {
        Self::with_settings(bus, GpsSettings::new())
    }

    /// Creates a device using the provided settings.
    pub fn with_settings(bus: B, settings: GpsSettings) -> Self {
        Self {
            bus,
            settings,
            satellites: 0,
        }
    }

    /// Satellites used in the most recent fix.
    pub fn satellites(&self) -> u8 {
        self.satellites
    }
}

impl<B: GpsBus, const N: usize> Device for GpsDevice<B, N> {
    const NAME: &'static str = "gps";
    type Channels = GpsChannels<N>;
    type Error = DeviceError;

    fn init(&mut self) -> Result<(), DeviceError> {
        let code = self.bus.begin();
        if code <= 0 {
            return Err(DeviceError::StartFailed(code));
        }
        self.bus.configure(&self.settings);
        Ok(())
    }

    fn read_into(
        &mut self,
        channels: &mut GpsChannels<N>,
        timestamp: Micros,
    ) -> nb::Result<u32, DeviceError> {
        let fix = self.bus.poll()?;
        channels.position.push(fix.position, timestamp);
        channels.velocity.push(fix.velocity, timestamp);
        self.satellites = fix.satellites;
        Ok(1)
    }
}
