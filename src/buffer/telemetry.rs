// src/buffer/telemetry.rs

//! # Telemetry Buffer
//!
//! A fixed-capacity queue holding the most recent `N` samples of one signal
//! channel (one gyro, one ADC input, GPS position, ...). Values and their
//! timestamps live in two parallel queues that are only ever pushed and
//! popped together, so a reader can never see a value without its matching
//! timestamp.
//!
//! Pushing never fails: once the buffer is full the oldest sample is
//! displaced. Popping returns the oldest unread sample.

use crate::time::Micros;
use heapless::Deque;

/// A value paired with the time it was acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample<T> {
    /// The measured value.
    pub value: T,
    /// Acquisition time in microseconds.
    pub timestamp: Micros,
}

/// Timestamp-paired circular queue with capacity `N`.
#[derive(Debug, Clone)]
pub struct TelemetryBuffer<T, const N: usize> {
    values: Deque<T, N>,
    timestamps: Deque<Micros, N>,
}

impl<T, const N: usize> TelemetryBuffer<T, N> {
    /// Creates an empty buffer. Usable in a `static`.
    pub const fn new() -> Self {
        Self {
            values: Deque::new(),
            timestamps: Deque::new(),
        }
    }

    /// Appends a sample, displacing and returning the oldest one if the
    /// buffer was full.
    pub fn push(&mut self, value: T, timestamp: Micros) -> Option<Sample<T>> {
        let evicted = if self.is_full() { self.pop() } else { None };
        // Space was made above; a zero capacity buffer simply drops the sample.
        let _ = self.values.push_back(value);
        let _ = self.timestamps.push_back(timestamp);
        evicted
    }

    /// Removes and returns the oldest sample, or `None` if empty.
    pub fn pop(&mut self) -> Option<Sample<T>> {
        let value = self.values.pop_front()?;
        let timestamp = self.timestamps.pop_front()?;
        Some(Sample { value, timestamp })
    }

    /// The most recent sample, without removing it.
    pub fn peek_latest(&self) -> Option<Sample<&T>> {
        Some(Sample {
            value: self.values.back()?,
            timestamp: *self.timestamps.back()?,
        })
    }

    /// The oldest sample, without removing it.
    pub fn peek_oldest(&self) -> Option<Sample<&T>> {
        Some(Sample {
            value: self.values.front()?,
            timestamp: *self.timestamps.front()?,
        })
    }

    /// Timestamp of the most recent sample.
    pub fn latest_timestamp(&self) -> Option<Micros> {
        self.timestamps.back().copied()
    }

    /// Iterates over the buffered samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = Sample<&T>> + '_ {
        self.values
            .iter()
            .zip(self.timestamps.iter())
            .map(|(value, &timestamp)| Sample { value, timestamp })
    }

    /// Drops every buffered sample.
    pub fn clear(&mut self) {
        self.values.clear();
        self.timestamps.clear();
    }

    /// Number of buffered samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no samples are buffered.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns `true` if the next push will displace the oldest sample.
    pub fn is_full(&self) -> bool {
        self.values.len() == N
    }

    /// The fixed capacity `N`.
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<T, const N: usize> Default for TelemetryBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixed::types::I16F16;

    fn assert_lockstep<T, const N: usize>(buffer: &TelemetryBuffer<T, N>) {
        assert_eq!(
            buffer.values.len(),
            buffer.timestamps.len(),
            "Value and timestamp queues must stay the same length."
        );
    }

    /// After N + k pushes exactly the last N samples remain, oldest first.
    #[test]
    fn test_overflow_keeps_latest() {
        let mut buffer = TelemetryBuffer::<u32, 4>::new();
        for i in 0..10u32 {
            buffer.push(i, u64::from(i) * 100);
            assert!(buffer.len() <= 4, "Length must never exceed capacity.");
            assert_lockstep(&buffer);
        }
        let kept: heapless::Vec<u32, 4> = buffer.iter().map(|s| *s.value).collect();
        assert_eq!(&[6, 7, 8, 9], kept.as_slice());
        assert_eq!(Some(600), buffer.peek_oldest().map(|s| s.timestamp));
    }

    #[test]
    fn test_push_returns_evicted_sample() {
        let mut buffer = TelemetryBuffer::<char, 2>::new();
        assert_eq!(None, buffer.push('a', 1));
        assert_eq!(None, buffer.push('b', 2));
        assert!(buffer.is_full());
        assert_eq!(
            Some(Sample { value: 'a', timestamp: 1 }),
            buffer.push('c', 3)
        );
    }

    #[test]
    fn test_pop_oldest_and_empty_signal() {
        let mut buffer = TelemetryBuffer::<i16, 8>::new();
        assert_eq!(None, buffer.pop(), "Empty buffer should signal empty.");
        buffer.push(-3, 10);
        buffer.push(7, 20);
        assert_eq!(Some(Sample { value: -3, timestamp: 10 }), buffer.pop());
        assert_lockstep(&buffer);
        assert_eq!(Some(Sample { value: 7, timestamp: 20 }), buffer.pop());
        assert!(buffer.is_empty());
        assert_eq!(None, buffer.pop());
        assert_lockstep(&buffer);
    }

    #[test]
    fn test_peek_latest_does_not_remove() {
        let mut buffer = TelemetryBuffer::<u8, 3>::default();
        assert!(buffer.peek_latest().is_none());
        buffer.push(1, 5);
        buffer.push(2, 6);
        let latest = buffer.peek_latest().map(|s| (*s.value, s.timestamp));
        assert_eq!(Some((2, 6)), latest);
        assert_eq!(2, buffer.len());
        assert_eq!(Some(6), buffer.latest_timestamp());
    }

    /// Mixed push/pop sequences keep both queues in lockstep.
    #[test]
    fn test_interleaved_lockstep() {
        let mut buffer = TelemetryBuffer::<u16, 5>::new();
        for round in 0..20u16 {
            buffer.push(round, u64::from(round));
            if round % 3 == 0 {
                let _ = buffer.pop();
            }
            assert_lockstep(&buffer);
        }
        buffer.clear();
        assert!(buffer.is_empty());
        assert_lockstep(&buffer);
    }

    /// Fixed-point ADC voltages are buffered as-is.
    #[test]
    fn test_fixed_point_samples() {
        let mut buffer = TelemetryBuffer::<I16F16, 2>::new();
        buffer.push(I16F16::from_num(3.3), 1);
        buffer.push(I16F16::from_num(1.65), 2);
        buffer.push(I16F16::from_num(0.5), 3);
        let oldest = buffer.pop().map(|s| s.value);
        assert_eq!(Some(I16F16::from_num(1.65)), oldest);
        assert_eq!(2, buffer.capacity());
    }
}
