//! Sample — one timestamped orientation reading from a single sensor.

use serde::{Deserialize, Serialize};

use crate::Quaternion;

/// Monotonic milliseconds, as produced by the sensor's synchronized clock.
pub type TimestampMs = i64;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: TimestampMs,
    pub quaternion: Quaternion,
}

impl Sample {
    pub fn new(timestamp: TimestampMs, quaternion: Quaternion) -> Self {
        Self {
            timestamp,
            quaternion,
        }
    }
}

/// `{ prev, curr }` held per sensor by a joint aligner. Together they bracket
/// any grid timestamp in `[prev.ts, curr.ts]` and supply SLERP endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorState {
    pub prev: Option<Sample>,
    pub curr: Option<Sample>,
}

impl SensorState {
    pub fn is_active(&self) -> bool {
        self.curr.is_some()
    }
}
