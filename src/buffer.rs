// src/buffer.rs

//! # Buffers
//!
//! Containers for sensor samples and guidance paths:
//! - [`TelemetryBuffer`]: fixed capacity, timestamp-paired, never reallocates.
//!   Used on the acquisition hot path.
//! - [`ChainList`]: unbounded, allocates per node. Only touched when the
//!   guidance path changes.

pub mod chain;
pub use chain::*;
pub mod telemetry;
pub use telemetry::*;
