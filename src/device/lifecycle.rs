// src/device/lifecycle.rs

//! # Device Lifecycle Controller
//!
//! One generic state machine drives every sensor. It is ticked once per outer
//! loop pass through [`DeviceLifecycle::thread`] and never blocks:
//!
//! - A busy bus skips the tick. It is not an error and does not touch the
//!   retry budget.
//! - A failed start is retried at the slow start cadence until
//!   `max_start_attempts` starts have been made, then the device is parked in
//!   [`DeviceHealth::Failure`] with its scheduler blocked.
//! - While running, throughput is counted and published once per reporting
//!   interval as a loop rate and a data rate.

use crate::device::{Device, DeviceHealth, HealthReport};
use crate::schedule::IntervalScheduler;
use crate::time::{Clock, Micros};
use log::{error, info, warn};

/// Timing and retry settings for a [`DeviceLifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// Tick period while the device is being started.
    pub start_period_us: Micros,
    /// Tick period once the device is running.
    pub run_period_us: Micros,
    /// Period at which loop and data rates are recomputed.
    pub rate_period_us: Micros,
    /// Starts allowed before the device is declared failed.
    pub max_start_attempts: u8,
}

impl LifecycleConfig {
    /// Default configuration: retry starts at 1 Hz, run at 1 kHz, report
    /// rates every second and give up after 5 starts.
    pub const fn new() -> Self {
        Self {
            start_period_us: 1_000_000,
            run_period_us: 1_000,
            rate_period_us: 1_000_000,
            max_start_attempts: 5,
        }
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Retry and health state machine wrapping one [`Device`].
pub struct DeviceLifecycle<D: Device, C: Clock> {
    device: D,
    channels: D::Channels,
    clock: C,
    config: LifecycleConfig,
    health: DeviceHealth,
    start_attempts: u8,
    run_interval: IntervalScheduler,
    rate_interval: IntervalScheduler,
    loop_counter: u32,
    data_counter: u32,
    loop_rate: u32,
    data_rate: u32,
    last_measurement_us: Micros,
}

impl<D, C> DeviceLifecycle<D, C>
where
    D: Device,
    D::Channels: Default,
    C: Clock,
{
    /// Creates a controller with default settings and empty channels.
    pub fn new(device: D, clock: C) -> Self {
        Self::with_config(device, clock, LifecycleConfig::new())
    }

    /// Creates a controller using the provided configuration.
    pub fn with_config(device: D, clock: C, config: LifecycleConfig) -> Self {
        Self::with_channels(device, D::Channels::default(), clock, config)
    }
}

impl<D: Device, C: Clock> DeviceLifecycle<D, C> {
    /// Creates a controller around pre-built channels.
    pub fn with_channels(
        device: D,
        channels: D::Channels,
        clock: C,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            device,
            channels,
            clock,
            config,
            health: DeviceHealth::NotStarted,
            start_attempts: 0,
            run_interval: IntervalScheduler::new(config.start_period_us),
            rate_interval: IntervalScheduler::new(config.rate_period_us),
            loop_counter: 0,
            data_counter: 0,
            loop_rate: 0,
            data_rate: 0,
            last_measurement_us: 0,
        }
    }

    /// Advances the state machine by one tick.
    pub fn thread(&mut self) {
        let now = self.clock.now_us();
        if !self.run_interval.is_time_to_run(now) {
            return;
        }

        self.loop_counter = self.loop_counter.saturating_add(1);

        match self.health {
            DeviceHealth::Running => self.acquire(now),
            DeviceHealth::NotStarted | DeviceHealth::RestartAttempt => self.start(now),
            DeviceHealth::Failure => self.enter_failure(),
        }

        if self.health != DeviceHealth::Failure && self.rate_interval.is_time_to_run(now) {
            self.loop_rate = self.loop_counter;
            self.data_rate = self.data_counter;
            self.loop_counter = 0;
            self.data_counter = 0;
        }
    }

    /// Returns the controller to `NotStarted` with a fresh retry budget.
    /// Buffered samples are kept.
    pub fn reset(&mut self) {
        info!("{}: reset", D::NAME);
        self.health = DeviceHealth::NotStarted;
        self.start_attempts = 0;
        self.run_interval = IntervalScheduler::new(self.config.start_period_us);
        self.rate_interval = IntervalScheduler::new(self.config.rate_period_us);
        self.loop_counter = 0;
        self.data_counter = 0;
        self.loop_rate = 0;
        self.data_rate = 0;
    }

    fn start(&mut self, now: Micros) {
        self.start_attempts = self.start_attempts.saturating_add(1);

        match self.device.init() {
            Ok(()) => {
                info!("{}: started (attempt {})", D::NAME, self.start_attempts);
                self.health = DeviceHealth::Running;
                self.last_measurement_us = now;
                self.run_interval.set_period_us(self.config.run_period_us);
            }
            Err(e) => {
                warn!(
                    "{}: start failed (attempt {}/{}): {:?}",
                    D::NAME,
                    self.start_attempts,
                    self.config.max_start_attempts,
                    e
                );
                if self.start_attempts >= self.config.max_start_attempts {
                    self.enter_failure();
                } else {
                    self.health = DeviceHealth::RestartAttempt;
                }
            }
        }
    }

    fn acquire(&mut self, now: Micros) {
        if self.device.is_busy() {
            return;
        }

        match self.device.read_into(&mut self.channels, now) {
            Ok(count) => {
                if count > 0 {
                    self.data_counter = self.data_counter.saturating_add(count);
                    self.last_measurement_us = now;
                }
            }
            Err(nb::Error::WouldBlock) => {}
            Err(nb::Error::Other(e)) => {
                warn!("{}: read failed, restarting: {:?}", D::NAME, e);
                self.health = DeviceHealth::RestartAttempt;
                self.run_interval.set_period_us(self.config.start_period_us);
            }
        }
    }

    fn enter_failure(&mut self) {
        if self.health != DeviceHealth::Failure {
            error!(
                "{}: failed after {} start attempts",
                D::NAME,
                self.start_attempts
            );
        }
        self.health = DeviceHealth::Failure;
        self.run_interval.block(true);
        self.loop_counter = 0;
        self.data_counter = 0;
        self.loop_rate = 0;
        self.data_rate = 0;
    }

    /// Current lifecycle state.
    pub fn health(&self) -> DeviceHealth {
        self.health
    }

    /// Number of start attempts made so far, successful ones included.
    pub fn start_attempts(&self) -> u8 {
        self.start_attempts
    }

    /// Scheduled ticks in the last reporting interval.
    pub fn loop_rate(&self) -> u32 {
        self.loop_rate
    }

    /// Samples acquired in the last reporting interval.
    pub fn data_rate(&self) -> u32 {
        self.data_rate
    }

    /// Time of the last successful start or acquisition.
    pub fn last_measurement_us(&self) -> Micros {
        self.last_measurement_us
    }

    /// Returns `true` if nothing has been acquired for at least `timeout_us`.
    pub fn is_stale(&self, timeout_us: Micros) -> bool {
        self.clock.elapsed_since(self.last_measurement_us) >= timeout_us
    }

    /// Returns `true` once scheduling has been force-disabled.
    pub fn is_blocked(&self) -> bool {
        self.run_interval.is_blocked()
    }

    /// Snapshot for health monitors.
    pub fn report(&self) -> HealthReport {
        HealthReport {
            health: self.health,
            start_attempts: self.start_attempts,
            loop_rate: self.loop_rate,
            data_rate: self.data_rate,
            last_measurement_us: self.last_measurement_us,
        }
    }

    /// The device's telemetry buffers.
    pub fn channels(&self) -> &D::Channels {
        &self.channels
    }

    /// The device's telemetry buffers, for consumers that pop samples.
    pub fn channels_mut(&mut self) -> &mut D::Channels {
        &mut self.channels
    }

    /// The wrapped device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// The wrapped device, mutably.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }
}
