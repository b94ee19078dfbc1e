// src/vehicle/guidance.rs

//! # Guidance Trajectory State Machine
//!
//! Turns endpoint commands into a setpoint that is refreshed once per tick.
//!
//! - A direct command (`to_point`, `to_point_rel`) makes the target the
//!   setpoint on the next tick.
//! - A linear command (`to_point_linear`, `to_point_linear_rel`) blends from
//!   start to end over `transition_ticks` ticks, then holds the end state.
//!   Further waypoints can be queued behind it with
//!   [`Guidance::append_waypoint`].
//! - Relative commands are offsets from the current setpoint, expressed in
//!   the vehicle's heading frame.
//!
//! Only the channels listed in [`GuidanceConfig::supported_channels`] are ever
//! written into the setpoint. The rest keep whatever value they had.
//!
//! While the shared flight mode is [`FlightMode::Failsafe`] the setpoint is
//! frozen and every command is rejected.

use crate::buffer::ChainList;
use crate::error::GuidanceError;
use crate::vehicle::{FlightMode, FlightModeCell, KineticChannels, KineticData};
use log::{debug, info, warn};
use num_traits::Float;

/// How the current path is followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathMode {
    /// Jump straight to the target.
    #[default]
    Direct,
    /// Blend from waypoint to waypoint.
    Linear,
}

/// Guidance settings for one vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuidanceConfig<T> {
    /// Ticks taken by one linear leg. Zero completes a leg on its first tick.
    pub transition_ticks: u32,
    /// Setpoint channels the vehicle can follow.
    pub supported_channels: KineticChannels,
    /// Waypoints that may be queued ahead of the vehicle.
    pub max_waypoints: usize,
    /// State commanded while in failsafe. `None` holds the last setpoint.
    pub safe_hold: Option<KineticData<T>>,
}

impl<T> GuidanceConfig<T> {
    /// All channels, 100 tick legs, 3 waypoints, hold last setpoint in
    /// failsafe.
    pub const fn new() -> Self {
        Self {
            transition_ticks: 100,
            supported_channels: KineticChannels::all(),
            max_waypoints: 3,
            safe_hold: None,
        }
    }
}

impl<T> Default for GuidanceConfig<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Guidance state machine observing a shared flight mode.
pub struct Guidance<'a, T> {
    config: GuidanceConfig<T>,
    flight_mode: &'a FlightModeCell,
    path_mode: PathMode,
    path: ChainList<KineticData<T>>,
    leg_tick: u32,
    setpoint: KineticData<T>,
    frozen: Option<KineticData<T>>,
}

impl<'a, T: Float> Guidance<'a, T> {
    /// Creates guidance with default settings and an all-zero setpoint.
    pub fn new(flight_mode: &'a FlightModeCell) -> Self {
        Self::with_config(flight_mode, GuidanceConfig::new())
    }

    /// Creates guidance using the provided configuration.
    pub fn with_config(flight_mode: &'a FlightModeCell, config: GuidanceConfig<T>) -> Self {
        Self {
            config,
            flight_mode,
            path_mode: PathMode::Direct,
            path: ChainList::new(),
            leg_tick: 0,
            setpoint: KineticData::setpoint(),
            frozen: None,
        }
    }

    /// Current setpoint, as produced by the last tick.
    pub fn setpoint(&self) -> KineticData<T> {
        self.setpoint
    }

    /// Current path mode.
    pub fn path_mode(&self) -> PathMode {
        self.path_mode
    }

    /// Waypoints still ahead, the leg currently being flown included.
    pub fn remaining_waypoints(&self) -> usize {
        match self.path_mode {
            PathMode::Direct => usize::from(!self.path.is_empty()),
            PathMode::Linear => self.path.len().saturating_sub(1),
        }
    }

    /// Returns `true` once the last leg has been completed.
    pub fn is_settled(&self) -> bool {
        match self.path_mode {
            PathMode::Direct => true,
            PathMode::Linear => {
                self.path.len() <= 2 && self.leg_tick >= self.config.transition_ticks
            }
        }
    }

    /// Mode read from the shared cell.
    pub fn flight_mode(&self) -> FlightMode {
        self.flight_mode.get()
    }

    /// Writes the shared cell. Every other holder of the cell sees the change.
    pub fn set_flight_mode(&self, mode: FlightMode) {
        info!("guidance: flight mode {} -> {}", self.flight_mode.get(), mode);
        self.flight_mode.set(mode);
    }

    /// Replaces the setpoint with `state` and drops the current path, for
    /// example to start from the measured state after arming.
    pub fn hold_at(&mut self, state: KineticData<T>) -> Result<(), GuidanceError> {
        self.accept_command()?;
        self.path.clear();
        self.path_mode = PathMode::Direct;
        self.leg_tick = 0;
        self.setpoint = state.as_setpoint();
        Ok(())
    }

    /// Targets `end` directly. `start` is kept as the origin of the path.
    pub fn to_point(
        &mut self,
        start: KineticData<T>,
        end: KineticData<T>,
    ) -> Result<(), GuidanceError> {
        self.accept_command()?;
        self.load_path(PathMode::Direct, start, end);
        debug!("guidance: direct target");
        Ok(())
    }

    /// Targets the offset `end` from the current setpoint.
    pub fn to_point_rel(&mut self, end: KineticData<T>) -> Result<(), GuidanceError> {
        self.accept_command()?;
        let end = self.resolve_relative(&end);
        self.load_path(PathMode::Direct, self.setpoint, end);
        debug!("guidance: relative direct target");
        Ok(())
    }

    /// Blends from `start` to `end` over `transition_ticks` ticks.
    pub fn to_point_linear(
        &mut self,
        start: KineticData<T>,
        end: KineticData<T>,
    ) -> Result<(), GuidanceError> {
        self.accept_command()?;
        self.load_path(PathMode::Linear, start, end);
        debug!(
            "guidance: linear path over {} ticks",
            self.config.transition_ticks
        );
        Ok(())
    }

    /// Blends from the current setpoint to the offset `end`.
    pub fn to_point_linear_rel(&mut self, end: KineticData<T>) -> Result<(), GuidanceError> {
        self.accept_command()?;
        let end = self.resolve_relative(&end);
        self.load_path(PathMode::Linear, self.setpoint, end);
        debug!(
            "guidance: relative linear path over {} ticks",
            self.config.transition_ticks
        );
        Ok(())
    }

    /// Queues `waypoint` after the current end of a linear path.
    pub fn append_waypoint(&mut self, waypoint: KineticData<T>) -> Result<(), GuidanceError> {
        self.accept_command()?;
        if self.path_mode != PathMode::Linear || self.path.is_empty() {
            warn!("guidance: waypoint rejected, no linear path");
            return Err(GuidanceError::NoActivePath);
        }
        if self.remaining_waypoints() >= self.config.max_waypoints {
            warn!(
                "guidance: waypoint rejected, {} already queued",
                self.config.max_waypoints
            );
            return Err(GuidanceError::PathFull(self.config.max_waypoints));
        }
        self.path.append(waypoint.as_setpoint());
        debug!("guidance: {} waypoints queued", self.remaining_waypoints());
        Ok(())
    }

    /// Advances guidance by one tick and returns the new setpoint.
    pub fn tick(&mut self) -> KineticData<T> {
        if self.flight_mode.get().is_failsafe() {
            let hold = *self.frozen.get_or_insert_with(|| {
                let mut hold = self.setpoint;
                if let Some(safe) = &self.config.safe_hold {
                    hold.merge_channels(safe, self.config.supported_channels);
                }
                hold
            });
            self.setpoint = hold;
            return self.setpoint;
        }
        self.frozen = None;

        let target = match self.path_mode {
            PathMode::Direct => self.path.back().copied(),
            PathMode::Linear => self.advance_leg(),
        };
        if let Some(target) = target {
            self.setpoint.merge_channels(&target, self.config.supported_channels);
        }
        self.setpoint
    }

    fn accept_command(&self) -> Result<(), GuidanceError> {
        if self.flight_mode.get().is_failsafe() {
            warn!("guidance: command rejected in failsafe");
            return Err(GuidanceError::Failsafe);
        }
        Ok(())
    }

    fn load_path(&mut self, mode: PathMode, start: KineticData<T>, end: KineticData<T>) {
        self.path.clear();
        self.path.append(start.as_setpoint());
        self.path.append(end.as_setpoint());
        self.path_mode = mode;
        self.leg_tick = 0;
    }

    /// Offsets are rotated by the commanded heading, then added channel by
    /// channel to the current setpoint.
    fn resolve_relative(&self, offset: &KineticData<T>) -> KineticData<T> {
        let heading = self.setpoint.heading();
        KineticData {
            position: self.setpoint.position + offset.position.rotate_z(heading),
            velocity: self.setpoint.velocity + offset.velocity.rotate_z(heading),
            attitude: self.setpoint.attitude + offset.attitude,
            angular_rate: self.setpoint.angular_rate + offset.angular_rate,
            kind: self.setpoint.kind,
        }
        .as_setpoint()
    }

    fn advance_leg(&mut self) -> Option<KineticData<T>> {
        let start = *self.path.get(0)?;
        let end = *self.path.get(1)?;

        let total = self.config.transition_ticks;
        self.leg_tick = self.leg_tick.saturating_add(1).min(total);
        let fraction = if total == 0 {
            T::one()
        } else {
            let done: T = num_traits::cast(self.leg_tick).unwrap_or_else(T::one);
            let total: T = num_traits::cast(total).unwrap_or_else(T::one);
            (done / total).min(T::one())
        };

        if self.leg_tick >= total && self.path.len() > 2 {
            self.path.remove_front();
            self.leg_tick = 0;
            debug!("guidance: leg complete, {} waypoints left", self.remaining_waypoints());
            return Some(end);
        }
        Some(start.lerp(&end, fraction))
    }
}
