// src/schedule/interval.rs

//! # Interval Scheduler
//!
//! A cooperative rate limiter. It never waits; the caller polls
//! [`IntervalScheduler::is_time_to_run`] once per outer loop pass and only
//! does its work when the scheduler says enough time has elapsed.

use crate::time::Micros;

const MICROS_PER_SECOND: Micros = 1_000_000;

/// Rate limiter driven by an external microsecond clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalScheduler {
    period_us: Micros,
    last_run_us: Micros,
    blocked: bool,
}

impl IntervalScheduler {
    /// Creates a scheduler that fires at most once every `period_us`.
    pub const fn new(period_us: Micros) -> Self {
        Self {
            period_us,
            last_run_us: 0,
            blocked: false,
        }
    }

    /// Creates a scheduler firing at `rate_hz`. A rate of zero creates a
    /// blocked scheduler.
    pub const fn from_rate_hz(rate_hz: u32) -> Self {
        if rate_hz == 0 {
            Self {
                period_us: 0,
                last_run_us: 0,
                blocked: true,
            }
        } else {
            Self::new(MICROS_PER_SECOND / rate_hz as Micros)
        }
    }

    /// Returns `true` and records `now_us` as the last run if the scheduler is
    /// not blocked and at least one period has elapsed since the last run.
    /// Returns `false` without side effects otherwise.
    pub fn is_time_to_run(&mut self, now_us: Micros) -> bool {
        if self.blocked || now_us.saturating_sub(self.last_run_us) < self.period_us {
            return false;
        }
        self.last_run_us = now_us;
        true
    }

    /// Changes the period. Takes effect on the next poll and never fires
    /// retroactively.
    pub fn set_period_us(&mut self, period_us: Micros) {
        self.period_us = period_us;
    }

    /// Changes the cadence to `rate_hz`. A rate of zero blocks the scheduler
    /// and any non-zero rate unblocks it.
    pub fn set_rate_hz(&mut self, rate_hz: u32) {
        if rate_hz == 0 {
            self.blocked = true;
        } else {
            self.period_us = MICROS_PER_SECOND / rate_hz as Micros;
            self.blocked = false;
        }
    }

    /// Force-disables (`true`) or re-enables (`false`) scheduling regardless
    /// of elapsed time.
    pub fn block(&mut self, blocked: bool) {
        self.blocked = blocked;
    }

    /// Returns `true` while scheduling is force-disabled.
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// The current period in microseconds.
    pub fn period_us(&self) -> Micros {
        self.period_us
    }

    /// Timestamp of the last successful poll.
    pub fn last_run_us(&self) -> Micros {
        self.last_run_us
    }
}
