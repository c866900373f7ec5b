//! DebugStats — observability-only diagnostic snapshot (§6, §7).
//!
//! Not part of the functional contract: nothing in the pipeline's correctness
//! depends on these numbers, but they are how `OutOfOrderTimestamp`,
//! `BufferOverflow`, and `SubscriberFailure` become visible to an operator.

use serde::{Deserialize, Serialize};

use crate::{SensorId, TimestampMs};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerSensorStats {
    pub sensor_id: SensorId,
    pub buffer_len: usize,
    pub out_of_order_count: u64,
    pub overflow_count: u64,
    pub newest_ts: Option<TimestampMs>,
}

impl PerSensorStats {
    pub fn new(sensor_id: SensorId) -> Self {
        Self {
            sensor_id,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugStats {
    pub push_count: u64,
    pub emit_count: u64,
    pub tick_count: u64,
    pub subscriber_failure_count: u64,
    pub grid_position: Option<TimestampMs>,
    pub per_sensor: Vec<PerSensorStats>,
}
