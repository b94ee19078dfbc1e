// src/device/adc.rs

//! # ADC Adapter
//!
//! Samples a four-input ADC round-robin. Each tick reads the conversion that
//! was requested on the previous tick, files it under the input it was
//! requested for, and immediately requests the next input. The lifecycle
//! polls [`AdcBus::is_busy`] once before each read. The requested
//! input is stored alongside the request, so a result can never be filed
//! under the wrong input even if ticks are skipped while the chip is busy.

use crate::buffer::TelemetryBuffer;
use crate::device::Device;
use crate::error::DeviceError;
use crate::time::Micros;

/// Number of single-ended inputs.
pub const ADC_INPUTS: usize = 4;

/// One voltage buffer per input.
pub type AdcChannels<const N: usize> = [TelemetryBuffer<f32, N>; ADC_INPUTS];

/// Register-level ADC driver. Provided by the board support code.
pub trait AdcBus {
    /// Probes and resets the chip. Non-positive codes are failures.
    fn begin(&mut self) -> i32;

    /// Applies gain, data rate and conversion mode.
    fn configure(&mut self, settings: &AdcSettings);

    /// Returns `true` while a conversion is in progress.
    fn is_busy(&mut self) -> bool;

    /// Starts a conversion on `input`.
    fn request_read(&mut self, input: u8);

    /// Reads the result of the last finished conversion.
    fn read_value(&mut self) -> i16;

    /// Converts a raw result to volts at the configured gain.
    fn to_voltage(&self, raw: i16) -> f32;
}

/// Conversion settings applied on every start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdcSettings {
    /// Programmable gain amplifier setting.
    pub gain: u8,
    /// Data rate index.
    pub data_rate: u8,
    /// Single-shot conversions instead of continuous mode.
    pub single_shot: bool,
}

impl AdcSettings {
    /// ±4.096 V range, fastest data rate, single-shot conversions.
    pub const fn new() -> Self {
        Self {
            gain: 1,
            data_rate: 7,
            single_shot: true,
        }
    }
}

impl Default for AdcSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Round-robin ADC device holding `N` samples per input.
pub struct AdcDevice<B, const N: usize> {
    bus: B,
    settings: AdcSettings,
    pending: Option<u8>,
}

impl<B: AdcBus, const N: usize> AdcDevice<B, N> {
    /// Creates a device with default settings.
    pub fn new(bus: B) -> Self {
        Self::with_settings(bus, AdcSettings::new())
    }

    /// Creates a device using the provided settings.
    pub fn with_settings(bus: B, settings: AdcSettings) -> Self {
        Self {
            bus,
            settings,
            pending: None,
        }
    }

    /// The input whose conversion is outstanding, if any.
    pub fn pending_input(&self) -> Option<u8> {
        self.pending
    }

    /// The underlying bus driver.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    fn request(&mut self, input: u8) {
        self.bus.request_read(input);
        self.pending = Some(input);
    }
}

impl<B: AdcBus, const N: usize> Device for AdcDevice<B, N> {
    const NAME: &'static str = "adc";
    type Channels = AdcChannels<N>;
    type Error = DeviceError;

    fn init(&mut self) -> Result<(), DeviceError> {
        self.pending = None;
        let code = self.bus.begin();
        if code <= 0 {
            return Err(DeviceError::StartFailed(code));
        }
        self.bus.configure(&self.settings);
        self.request(0);
        Ok(())
    }

    fn is_busy(&mut self) -> bool {
        self.bus.is_busy()
    }

    fn read_into(
        &mut self,
        channels: &mut AdcChannels<N>,
        timestamp: Micros,
    ) -> nb::Result<u32, DeviceError> {
        let input = self
            .pending
            .ok_or(nb::Error::Other(DeviceError::NoConversionPending))?;

        let raw = self.bus.read_value();
        let voltage = self.bus.to_voltage(raw);
        channels[usize::from(input)].push(voltage, timestamp);

        self.request((input + 1) % ADC_INPUTS as u8);
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceHealth, DeviceLifecycle, LifecycleConfig};
    use crate::test_utils::*;
    use crate::time::{Clock, MockClock};
    use alloc::vec::Vec;

    /// Fake chip whose result encodes the input it was last asked for.
    struct MockAdcBus {
        start_code: i32,
        busy_polls: u32,
        busy_checks: u32,
        requested: Vec<u8>,
        configured: Option<AdcSettings>,
    }

    impl MockAdcBus {
        fn new(start_code: i32) -> Self {
            Self {
                start_code,
                busy_polls: 0,
                busy_checks: 0,
                requested: Vec::new(),
                configured: None,
            }
        }
    }

    impl AdcBus for MockAdcBus {
        fn begin(&mut self) -> i32 {
            self.start_code
        }

        fn configure(&mut self, settings: &AdcSettings) {
            self.configured = Some(*settings);
        }

        fn is_busy(&mut self) -> bool {
            self.busy_checks += 1;
            if self.busy_polls > 0 {
                self.busy_polls -= 1;
                true
            } else {
                false
            }
        }

        fn request_read(&mut self, input: u8) {
            self.requested.push(input);
        }

        fn read_value(&mut self) -> i16 {
            i16::from(*self.requested.last().unwrap_or(&0)) * 1000
        }

        fn to_voltage(&self, raw: i16) -> f32 {
            f32::from(raw) * 0.001
        }
    }

    fn run_every_tick() -> LifecycleConfig {
        let mut config = LifecycleConfig::new();
        config.start_period_us = 0;
        config.run_period_us = 0;
        config
    }

    #[test]
    fn test_round_robin_files_by_requested_input() {
        let clock = MockClock::new();
        let device = AdcDevice::<_, 4>::new(MockAdcBus::new(1));
        let mut adc = DeviceLifecycle::with_config(device, &clock, run_every_tick());

        adc.thread();
        assert_eq!(DeviceHealth::Running, adc.health());
        assert_eq!(Some(AdcSettings::new()), adc.device().bus().configured);

        for _ in 0..6 {
            clock.advance(10);
            adc.thread();
        }

        let channels = adc.channels();
        assert_eq!(2, channels[0].len());
        assert_eq!(2, channels[1].len());
        assert_eq!(1, channels[2].len());
        assert_eq!(1, channels[3].len());
        for (input, channel) in channels.iter().enumerate() {
            for sample in channel.iter() {
                assert!(
                    value_close(input as f32, *sample.value),
                    "Sample must be filed under the input it was requested for."
                );
            }
        }
        assert_eq!(Some(2), adc.device().pending_input());
    }

    /// A busy chip is skipped without touching the pending input.
    #[test]
    fn test_busy_keeps_pending_input() {
        let clock = MockClock::new();
        let device = AdcDevice::<_, 4>::new(MockAdcBus::new(1));
        let mut adc = DeviceLifecycle::with_config(device, &clock, run_every_tick());
        adc.thread();

        adc.device_mut().bus.busy_polls = 3;
        for _ in 0..3 {
            clock.advance(10);
            adc.thread();
        }
        assert_eq!(Some(0), adc.device().pending_input());
        assert!(adc.channels().iter().all(|c| c.is_empty()));
        assert_eq!(1, adc.start_attempts());

        clock.advance(10);
        adc.thread();
        assert_eq!(Some(clock.now_us()), adc.channels()[0].latest_timestamp());
    }

    /// Each acquisition tick costs exactly one busy poll on the bus.
    #[test]
    fn test_one_busy_poll_per_tick() {
        let clock = MockClock::new();
        let device = AdcDevice::<_, 4>::new(MockAdcBus::new(1));
        let mut adc = DeviceLifecycle::with_config(device, &clock, run_every_tick());
        adc.thread();
        assert_eq!(0, adc.device().bus().busy_checks, "Starting does not poll.");

        clock.advance(10);
        adc.thread();
        assert_eq!(1, adc.channels()[0].len());
        assert_eq!(1, adc.device().bus().busy_checks);

        adc.device_mut().bus.busy_polls = 1;
        clock.advance(10);
        adc.thread();
        clock.advance(10);
        adc.thread();
        assert_eq!(3, adc.device().bus().busy_checks);
        assert_eq!(1, adc.channels()[1].len());
    }

    #[test]
    fn test_non_positive_start_code_fails() {
        let mut device = AdcDevice::<_, 4>::new(MockAdcBus::new(0));
        assert_eq!(Err(DeviceError::StartFailed(0)), device.init());
        assert_eq!(None, device.pending_input());

        let mut channels = AdcChannels::<4>::default();
        assert_eq!(
            Err(nb::Error::Other(DeviceError::NoConversionPending)),
            device.read_into(&mut channels, 0)
        );
    }
}
