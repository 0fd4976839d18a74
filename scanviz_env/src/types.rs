//! Common types for the scanviz environment abstraction.

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A wire timestamp: whole seconds plus nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Time {
    pub sec: i32,
    pub nanosec: u32,
}

impl Time {
    /// Creates a timestamp from its parts.
    pub fn new(sec: i32, nanosec: u32) -> Self {
        Self { sec, nanosec }
    }
    
    /// Returns the timestamp as fractional seconds.
    pub fn as_secs_f64(&self) -> f64 {
        self.sec as f64 + self.nanosec as f64 * 1e-9
    }
}

/// Clocks before the epoch collapse to zero. Instants past 2038-01-19
/// saturate to the largest representable stamp instead of wrapping.
impl From<SystemTime> for Time {
    fn from(t: SystemTime) -> Self {
        let since_epoch = t.duration_since(UNIX_EPOCH).unwrap_or_default();
        let (sec, nanosec) = saturating_parts(since_epoch);
        Self { sec, nanosec }
    }
}

/// Splits `d` into wire seconds and nanoseconds, clamping to
/// `i32::MAX` seconds plus a full second of nanoseconds.
fn saturating_parts(d: Duration) -> (i32, u32) {
    match i32::try_from(d.as_secs()) {
        Ok(sec) => (sec, d.subsec_nanos()),
        Err(_) => (i32::MAX, 999_999_999),
    }
}

/// A wire duration: signed seconds plus nanoseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSpan {
    pub sec: i32,
    pub nanosec: u32,
}

impl TimeSpan {
    /// Creates a whole-second span.
    pub const fn from_secs(sec: i32) -> Self {
        Self { sec, nanosec: 0 }
    }
}

/// Spans longer than `i32::MAX` seconds saturate.
impl From<Duration> for TimeSpan {
    fn from(d: Duration) -> Self {
        let (sec, nanosec) = saturating_parts(d);
        Self { sec, nanosec }
    }
}

impl From<TimeSpan> for Duration {
    fn from(span: TimeSpan) -> Self {
        Duration::new(span.sec.max(0) as u64, span.nanosec)
    }
}

/// Message header: the frame the payload is expressed in and its stamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub frame_id: String,
    pub stamp: Time,
}

impl Header {
    /// Creates a header.
    pub fn new(frame_id: impl Into<String>, stamp: Time) -> Self {
        Self {
            frame_id: frame_id.into(),
            stamp,
        }
    }
}

/// Delivery guarantee of a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reliability {
    /// Drop on overflow; the receiver tolerates gaps.
    BestEffort,
    /// Never drop silently; a full queue is reported to the publisher.
    Reliable,
}

/// Quality-of-service profile of a pub/sub channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QosProfile {
    pub reliability: Reliability,
    /// Bounded queue depth (keep-last history)
    pub depth: usize,
}

impl QosProfile {
    /// Sensor-rate profile used for incoming scans.
    pub const SENSOR_DATA: Self = Self {
        reliability: Reliability::BestEffort,
        depth: 5,
    };
    
    /// Default publisher profile used for markers.
    pub const DEFAULT: Self = Self {
        reliability: Reliability::Reliable,
        depth: 10,
    };
}

impl Default for QosProfile {
    fn default() -> Self {
        Self::DEFAULT
    }
}
