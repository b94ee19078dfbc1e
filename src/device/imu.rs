// src/device/imu.rs

//! # IMU Adapter
//!
//! Gyroscope, accelerometer and magnetometer read on the chip's data-ready
//! interrupt. The interrupt handler only sets a [`DataReadyFlag`]; the flag is
//! consumed here on the next tick. A sample identical to the previous one on
//! the same channel is treated as a repeat of old data and not buffered.

use crate::buffer::TelemetryBuffer;
use crate::device::Device;
use crate::error::DeviceError;
use crate::math::Vector3;
use crate::schedule::DataReadyFlag;
use crate::time::Micros;

/// One reading of all three sensors, in sensor axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImuReading {
    /// Angular rate in rad/s.
    pub gyro: Vector3<f32>,
    /// Specific force in m/s².
    pub accel: Vector3<f32>,
    /// Magnetic field in µT.
    pub mag: Vector3<f32>,
}

/// Register-level IMU driver. Provided by the board support code.
pub trait ImuBus {
    /// Probes and resets the chip. Non-positive codes are failures.
    fn begin(&mut self) -> i32;

    /// Sets ranges and filters and enables the data-ready interrupt.
    fn configure(&mut self);

    /// Reads one sample set from the chip.
    fn read_sensor(&mut self) -> Result<ImuReading, DeviceError>;
}

/// Mounting orientation, as a sign per sensor axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImuSettings {
    /// Signs applied to gyro axes.
    pub gyro_signs: Vector3<f32>,
    /// Signs applied to accelerometer axes.
    pub accel_signs: Vector3<f32>,
    /// Signs applied to magnetometer axes.
    pub mag_signs: Vector3<f32>,
}

impl ImuSettings {
    /// Chip mounted upside down with x and y mirrored on the gyro and
    /// magnetometer.
    pub const fn new() -> Self {
        Self {
            gyro_signs: Vector3::new(-1.0, -1.0, 1.0),
            accel_signs: Vector3::new(1.0, 1.0, -1.0),
            mag_signs: Vector3::new(-1.0, -1.0, 1.0),
        }
    }

    /// Sensor axes already match body axes.
    pub const fn identity() -> Self {
        Self {
            gyro_signs: Vector3::new(1.0, 1.0, 1.0),
            accel_signs: Vector3::new(1.0, 1.0, 1.0),
            mag_signs: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Default for ImuSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Buffered IMU channels.
#[derive(Debug, Clone, Default)]
pub struct ImuChannels<const N: usize> {
    /// Angular rate samples.
    pub gyro: TelemetryBuffer<Vector3<f32>, N>,
    /// Acceleration samples.
    pub accel: TelemetryBuffer<Vector3<f32>, N>,
    /// Magnetic field samples.
    pub mag: TelemetryBuffer<Vector3<f32>, N>,
}

/// Interrupt-driven IMU device holding `N` samples per channel.
pub struct ImuDevice<'a, B, const N: usize> {
    bus: B,
    settings: ImuSettings,
    data_ready: &'a DataReadyFlag,
    last: Option<ImuReading>,
}

impl<'a, B: ImuBus, const N: usize> ImuDevice<'a, B, N> {
    /// Creates a device fed by `data_ready`, with default mounting.
    pub fn new(bus: B, data_ready: &'a DataReadyFlag) -> Self {
        Self::with_settings(bus, data_ready, ImuSettings::new())
    }

    /// Creates a device using the provided mounting settings.
    pub fn with_settings(bus: B, data_ready: &'a DataReadyFlag, settings: ImuSettings) -> Self {
        Self {
            bus,
            settings,
            data_ready,
            last: None,
        }
    }

    /// The most recent reading, in body axes.
    pub fn last_reading(&self) -> Option<ImuReading> {
        self.last
    }
}

fn push_if_new<const N: usize>(
    buffer: &mut TelemetryBuffer<Vector3<f32>, N>,
    previous: Option<Vector3<f32>>,
    value: Vector3<f32>,
    timestamp: Micros,
) -> bool {
    if previous == Some(value) {
        return false;
    }
    buffer.push(value, timestamp);
    true
}

impl<'a, B: ImuBus, const N: usize> Device for ImuDevice<'a, B, N> {
    const NAME: &'static str = "imu";
    type Channels = ImuChannels<N>;
    type Error = DeviceError;

    fn init(&mut self) -> Result<(), DeviceError> {
        let code = self.bus.begin();
        if code <= 0 {
            return Err(DeviceError::StartFailed(code));
        }
        self.bus.configure();
        Ok(())
    }

    fn read_into(
        &mut self,
        channels: &mut ImuChannels<N>,
        timestamp: Micros,
    ) -> nb::Result<u32, DeviceError> {
        if !self.data_ready.take() {
            return Err(nb::Error::WouldBlock);
        }

        let raw = self.bus.read_sensor()?;
        let reading = ImuReading {
            gyro: raw.gyro.component_mul(&self.settings.gyro_signs),
            accel: raw.accel.component_mul(&self.settings.accel_signs),
            mag: raw.mag.component_mul(&self.settings.mag_signs),
        };
        let last = self.last;

        let gyro_pushed = push_if_new(
            &mut channels.gyro,
            last.map(|r| r.gyro),
            reading.gyro,
            timestamp,
        );
        push_if_new(&mut channels.accel, last.map(|r| r.accel), reading.accel, timestamp);
        push_if_new(&mut channels.mag, last.map(|r| r.mag), reading.mag, timestamp);

        self.last = Some(reading);
        Ok(u32::from(gyro_pushed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceHealth, DeviceLifecycle, LifecycleConfig};
    use crate::test_utils::*;
    use crate::time::MockClock;
    use alloc::collections::VecDeque;

    struct MockImuBus {
        start_codes: VecDeque<i32>,
        readings: VecDeque<Result<ImuReading, DeviceError>>,
        configured: bool,
    }

    impl MockImuBus {
        fn new(start_codes: &[i32]) -> Self {
            Self {
                start_codes: start_codes.iter().copied().collect(),
                readings: VecDeque::new(),
                configured: false,
            }
        }
    }

    impl ImuBus for MockImuBus {
        fn begin(&mut self) -> i32 {
            self.start_codes.pop_front().unwrap_or(-1)
        }

        fn configure(&mut self) {
            self.configured = true;
        }

        fn read_sensor(&mut self) -> Result<ImuReading, DeviceError> {
            self.readings.pop_front().unwrap_or(Err(DeviceError::Bus))
        }
    }

    fn reading(g: f32) -> ImuReading {
        ImuReading {
            gyro: Vector3::new(g, 2.0 * g, 3.0 * g),
            accel: Vector3::new(0.0, 0.0, 9.81),
            mag: Vector3::new(20.0, 0.0, -40.0),
        }
    }

    fn every_tick() -> LifecycleConfig {
        let mut config = LifecycleConfig::new();
        config.start_period_us = 0;
        config.run_period_us = 0;
        config
    }

    #[test]
    fn test_reads_only_on_data_ready() {
        let clock = MockClock::new();
        let flag = DataReadyFlag::new();
        let mut bus = MockImuBus::new(&[-5, 1]);
        bus.readings.push_back(Ok(reading(1.0)));
        let device = ImuDevice::<_, 16>::new(bus, &flag);
        let mut imu = DeviceLifecycle::with_config(device, &clock, every_tick());

        imu.thread();
        assert_eq!(DeviceHealth::RestartAttempt, imu.health());
        imu.thread();
        assert_eq!(DeviceHealth::Running, imu.health());
        assert!(imu.device().bus.configured);

        clock.advance(100);
        imu.thread();
        assert!(imu.channels().gyro.is_empty(), "No interrupt, no read.");

        flag.set();
        clock.advance(100);
        imu.thread();
        assert!(!flag.is_pending(), "Tick consumes the flag.");
        let gyro = imu.channels().gyro.peek_latest().map(|s| (*s.value, s.timestamp));
        assert_eq!(Some((Vector3::new(-1.0, -2.0, 3.0), 200)), gyro);
        let accel = imu.channels().accel.peek_latest().map(|s| *s.value);
        assert!(
            accel.map_or(false, |a| vector_close(Vector3::new(0.0, 0.0, -9.81), a)),
            "Mounting signs should flip accel z."
        );
    }

    /// Repeated identical samples are not buffered and not counted.
    #[test]
    fn test_duplicate_samples_suppressed() {
        let flag = DataReadyFlag::new();
        let mut bus = MockImuBus::new(&[1]);
        bus.readings.extend([Ok(reading(1.0)), Ok(reading(1.0)), Ok(reading(2.0))]);
        let mut device = ImuDevice::<_, 16>::with_settings(bus, &flag, ImuSettings::identity());
        let mut channels = ImuChannels::<16>::default();
        assert_eq!(Ok(()), device.init());

        let mut counted = 0;
        for t in 0..3 {
            flag.set();
            counted += device.read_into(&mut channels, t).unwrap_or(0);
        }
        assert_eq!(2, counted);
        assert_eq!(2, channels.gyro.len());
        assert_eq!(1, channels.accel.len(), "Accel never changed.");
        assert_eq!(1, channels.mag.len());
        assert_eq!(Some(reading(2.0)), device.last_reading());
    }

    #[test]
    fn test_read_error_propagates() {
        let flag = DataReadyFlag::new();
        let mut device = ImuDevice::<_, 4>::new(MockImuBus::new(&[1]), &flag);
        let mut channels = ImuChannels::<4>::default();
        flag.set();
        assert_eq!(
            Err(nb::Error::Other(DeviceError::Bus)),
            device.read_into(&mut channels, 0)
        );
    }
}
