// src/math/vector.rs

//! # Three Component Vector
//!
//! A small `Copy` vector used for positions, velocities, attitudes and sensor
//! axes. Every operation is total: magnitudes never return NaN and normalizing
//! the zero vector yields the zero vector.

use core::cmp::Ordering;
use core::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};
use num_traits::Float;

/// A vector with `x`, `y` and `z` components.
///
/// Equality is exact component equality. Use [`Vector3::magnitude_cmp`] when
/// vectors need to be ordered by length.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3<T> {
    /// X component.
    pub x: T,
    /// Y component.
    pub y: T,
    /// Z component.
    pub z: T,
}

impl<T> Vector3<T> {
    /// Creates a vector from its components.
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }
}

impl<T: Float> Vector3<T> {
    /// The zero vector.
    pub fn zero() -> Self {
        Self::splat(T::zero())
    }

    /// Creates a vector with every component set to `n`.
    pub fn splat(n: T) -> Self {
        Self::new(n, n, n)
    }

    /// Standard gravity pointing down the z axis, in m/s².
    pub fn gravity() -> Self {
        Self::new(T::zero(), T::zero(), T::from(-9.81).unwrap_or_else(T::zero))
    }

    /// Euclidean length. A NaN intermediate result is reported as zero.
    pub fn magnitude(&self) -> T {
        let m = self.dot(self).sqrt();
        if m.is_nan() {
            T::zero()
        } else {
            m
        }
    }

    /// Returns `true` when the magnitude is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.magnitude() == T::zero()
    }

    /// Returns the unit vector pointing the same way.
    ///
    /// The zero vector normalizes to the zero vector.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag == T::zero() {
            Self::zero()
        } else {
            *self / mag
        }
    }

    /// Dot product.
    pub fn dot(&self, other: &Self) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product `self × other`.
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Component-wise product.
    pub fn component_mul(&self, other: &Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    /// Angle to `other` in radians, in `[0, π]`.
    ///
    /// Returns zero if either vector has zero length.
    pub fn angle_to(&self, other: &Self) -> T {
        let denom = self.magnitude() * other.magnitude();
        if denom == T::zero() {
            return T::zero();
        }
        let cos = self.dot(other) / denom;
        cos.max(-T::one()).min(T::one()).acos()
    }

    /// Projection of `self` onto `other`.
    ///
    /// Projecting onto the zero vector yields the zero vector.
    pub fn project_on(&self, other: &Self) -> Self {
        let unit = other.normalize();
        unit * self.dot(&unit)
    }

    /// Rotates the vector about the z axis by `angle` radians.
    pub fn rotate_z(&self, angle: T) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(
            self.x * cos - self.y * sin,
            self.x * sin + self.y * cos,
            self.z,
        )
    }

    /// Linear blend: `self` at `fraction == 0`, `other` at `fraction == 1`.
    pub fn lerp(&self, other: &Self, fraction: T) -> Self {
        *self + (*other - *self) * fraction
    }

    /// Orders two vectors by magnitude.
    pub fn magnitude_cmp(&self, other: &Self) -> Option<Ordering> {
        self.magnitude().partial_cmp(&other.magnitude())
    }
}

impl<T: Float> Add for Vector3<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl<T: Float> Sub for Vector3<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl<T: Float> Neg for Vector3<T> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl<T: Float> Mul<T> for Vector3<T> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl<T: Float> Div<T> for Vector3<T> {
    type Output = Self;

    fn div(self, rhs: T) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl<T: Float> AddAssign for Vector3<T> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Float> SubAssign for Vector3<T> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: Float> MulAssign<T> for Vector3<T> {
    fn mul_assign(&mut self, rhs: T) {
        *self = *self * rhs;
    }
}
