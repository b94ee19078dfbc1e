// demos/acquisition.rs

use starship_flight_core::device::adc::{AdcBus, AdcDevice, AdcSettings};
use starship_flight_core::time::{Clock, MockClock};
use starship_flight_core::{DeviceLifecycle, LifecycleConfig};

/// Simulated ADC that refuses to start twice, then converts each input to a
/// fixed voltage after one busy poll.
struct SimulatedAdc {
    starts: u32,
    input: u8,
    busy: bool,
}

impl AdcBus for SimulatedAdc {
    fn begin(&mut self) -> i32 {
        self.starts += 1;
        if self.starts < 3 {
            -1
        } else {
            1
        }
    }

    fn configure(&mut self, settings: &AdcSettings) {
        println!(
            "configured: gain {}, data rate {}, single shot {}",
            settings.gain, settings.data_rate, settings.single_shot
        );
    }

    fn is_busy(&mut self) -> bool {
        let busy = self.busy;
        self.busy = false;
        busy
    }

    fn request_read(&mut self, input: u8) {
        self.input = input;
        self.busy = true;
    }

    fn read_value(&mut self) -> i16 {
        1_000 * (i16::from(self.input) + 1)
    }

    fn to_voltage(&self, raw: i16) -> f32 {
        f32::from(raw) * 0.000_125
    }
}

fn main() {
    let clock = MockClock::new();

    let mut config = LifecycleConfig::new();
    config.start_period_us = 100_000;
    config.run_period_us = 1_000;
    config.rate_period_us = 10_000;

    let adc = SimulatedAdc {
        starts: 0,
        input: 0,
        busy: false,
    };
    let mut lifecycle = DeviceLifecycle::with_config(AdcDevice::<_, 8>::new(adc), &clock, config);

    for _ in 0..3 {
        clock.advance(100_000);
        lifecycle.thread();
        println!(
            "t = {:>7} us: {} (attempt {})",
            clock.now_us(),
            lifecycle.health(),
            lifecycle.start_attempts()
        );
    }

    for _ in 0..20 {
        clock.advance(1_000);
        lifecycle.thread();
    }

    let report = lifecycle.report();
    println!(
        "health {}, loop rate {}, data rate {}",
        report.health, report.loop_rate, report.data_rate
    );
    for (input, channel) in lifecycle.channels().iter().enumerate() {
        if let Some(sample) = channel.peek_latest() {
            println!(
                "input {}: {} samples, latest {:.3} V at {} us",
                input,
                channel.len(),
                sample.value,
                sample.timestamp
            );
        }
    }
}
