// src/math.rs

//! # Math Module
//!
//! Numeric primitives shared by the acquisition and guidance layers.

pub mod vector;
pub use vector::*;
