// src/vehicle/kinetic.rs

//! # Kinetic Data
//!
//! The value bundle exchanged between the state estimator, guidance and the
//! output-control stage. An instance is either a measurement or a setpoint,
//! never a mix of both.

use crate::math::Vector3;
use bitflags::bitflags;
use num_traits::Float;

/// Whether a [`KineticData`] describes measured state or commanded state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KineticKind {
    /// Estimated from sensors.
    #[default]
    Measured,
    /// Commanded by guidance.
    Setpoint,
}

bitflags! {
    /// Kinetic channels a vehicle is able to follow.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KineticChannels: u8 {
        /// Position.
        const POSITION = 1 << 0;
        /// Velocity.
        const VELOCITY = 1 << 1;
        /// Attitude.
        const ATTITUDE = 1 << 2;
        /// Angular rate.
        const ANGULAR_RATE = 1 << 3;
    }
}

impl KineticChannels {
    /// Channels an underactuated multirotor can follow. Attitude is a
    /// consequence of the translational commands and is left alone.
    pub const MULTIROTOR: Self = Self::POSITION.union(Self::VELOCITY);
}

/// Position, velocity, attitude and angular rate of the vehicle.
///
/// Attitude is stored as roll, pitch and yaw in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KineticData<T> {
    /// Position, metres.
    pub position: Vector3<T>,
    /// Velocity, m/s.
    pub velocity: Vector3<T>,
    /// Roll, pitch and yaw, radians.
    pub attitude: Vector3<T>,
    /// Body angular rate, rad/s.
    pub angular_rate: Vector3<T>,
    /// Measured or commanded.
    pub kind: KineticKind,
}

impl<T: Float> KineticData<T> {
    /// All-zero state of the given kind.
    pub fn zero(kind: KineticKind) -> Self {
        Self {
            position: Vector3::zero(),
            velocity: Vector3::zero(),
            attitude: Vector3::zero(),
            angular_rate: Vector3::zero(),
            kind,
        }
    }

    /// All-zero measurement.
    pub fn measured() -> Self {
        Self::zero(KineticKind::Measured)
    }

    /// All-zero setpoint.
    pub fn setpoint() -> Self {
        Self::zero(KineticKind::Setpoint)
    }

    /// Replaces the position.
    pub fn with_position(mut self, position: Vector3<T>) -> Self {
        self.position = position;
        self
    }

    /// Replaces the velocity.
    pub fn with_velocity(mut self, velocity: Vector3<T>) -> Self {
        self.velocity = velocity;
        self
    }

    /// Replaces the attitude.
    pub fn with_attitude(mut self, attitude: Vector3<T>) -> Self {
        self.attitude = attitude;
        self
    }

    /// Replaces the angular rate.
    pub fn with_angular_rate(mut self, angular_rate: Vector3<T>) -> Self {
        self.angular_rate = angular_rate;
        self
    }

    /// The same state relabelled as a setpoint.
    pub fn as_setpoint(mut self) -> Self {
        self.kind = KineticKind::Setpoint;
        self
    }

    /// Heading (yaw) in radians.
    pub fn heading(&self) -> T {
        self.attitude.z
    }

    /// Component-wise blend of every channel. The kind of `self` is kept.
    pub fn lerp(&self, other: &Self, fraction: T) -> Self {
        Self {
            position: self.position.lerp(&other.position, fraction),
            velocity: self.velocity.lerp(&other.velocity, fraction),
            attitude: self.attitude.lerp(&other.attitude, fraction),
            angular_rate: self.angular_rate.lerp(&other.angular_rate, fraction),
            kind: self.kind,
        }
    }

    /// Copies the selected channels from `source`, leaving the rest untouched.
    pub fn merge_channels(&mut self, source: &Self, channels: KineticChannels) {
        if channels.contains(KineticChannels::POSITION) {
            self.position = source.position;
        }
        if channels.contains(KineticChannels::VELOCITY) {
            self.velocity = source.velocity;
        }
        if channels.contains(KineticChannels::ATTITUDE) {
            self.attitude = source.attitude;
        }
        if channels.contains(KineticChannels::ANGULAR_RATE) {
            self.angular_rate = source.angular_rate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_blends_every_channel() {
        let start = KineticData::<f32>::setpoint();
        let end = KineticData::setpoint()
            .with_position(Vector3::new(10.0, 0.0, 0.0))
            .with_velocity(Vector3::new(0.0, 4.0, 0.0))
            .with_attitude(Vector3::new(0.0, 0.0, 1.0))
            .with_angular_rate(Vector3::new(2.0, 0.0, 0.0));
        let mid = start.lerp(&end, 0.5);
        assert_eq!(Vector3::new(5.0, 0.0, 0.0), mid.position);
        assert_eq!(Vector3::new(0.0, 2.0, 0.0), mid.velocity);
        assert_eq!(Vector3::new(0.0, 0.0, 0.5), mid.attitude);
        assert_eq!(Vector3::new(1.0, 0.0, 0.0), mid.angular_rate);
        assert_eq!(KineticKind::Setpoint, mid.kind);
    }

    /// Unsupported channels keep their previous value.
    #[test]
    fn test_merge_selected_channels() {
        let mut target = KineticData::<f64>::setpoint().with_attitude(Vector3::new(0.1, 0.2, 0.3));
        let source = KineticData::setpoint()
            .with_position(Vector3::new(1.0, 2.0, 3.0))
            .with_attitude(Vector3::new(9.0, 9.0, 9.0));
        target.merge_channels(&source, KineticChannels::MULTIROTOR);
        assert_eq!(Vector3::new(1.0, 2.0, 3.0), target.position);
        assert_eq!(Vector3::new(0.1, 0.2, 0.3), target.attitude);
    }

    #[test]
    fn test_relabel_as_setpoint() {
        let measured = KineticData::<f32>::measured().with_attitude(Vector3::new(0.0, 0.0, 1.5));
        assert_eq!(KineticKind::Measured, measured.kind);
        let commanded = measured.as_setpoint();
        assert_eq!(KineticKind::Setpoint, commanded.kind);
        assert_eq!(1.5, commanded.heading());
    }
}
