//! Grid Scheduler & Aligner (C4) — drives the fixed-rate output grid.
//!
//! Converts the two joints' asynchronous arrivals into a single monotonic
//! grid at `output_hz`, advancing only as far as the *scan line* — the
//! latest timestamp every active joint has already committed data up to —
//! so the pipeline never extrapolates.

use contracts::{
    ActiveJoint, AlignedSampleSet, JointSide, PerSensorStats, Quaternion, SensorId, SyncCoreConfig,
    TimestampMs,
};
use tracing::{trace, warn};

use crate::buffer::PushOutcome;
use crate::joint_aligner::JointAligner;

pub struct GridScheduler {
    tick_period_ms: TimestampMs,
    drain_per_tick_limit: usize,
    grid_position: Option<TimestampMs>,
    left: JointAligner,
    right: JointAligner,
    single_joint_mode: bool,
    tick_count: u64,
}

impl GridScheduler {
    pub fn new(config: &SyncCoreConfig) -> Self {
        let find = |side: JointSide, placement: contracts::SensorPlacement| {
            config
                .sensor_map
                .iter()
                .find(|slot| slot.side == side && slot.placement == placement)
                .map(|slot| slot.sensor_id)
        };

        let left_thigh = find(JointSide::Left, contracts::SensorPlacement::Thigh);
        let left_shin = find(JointSide::Left, contracts::SensorPlacement::Shin);
        let right_thigh = find(JointSide::Right, contracts::SensorPlacement::Thigh);
        let right_shin = find(JointSide::Right, contracts::SensorPlacement::Shin);

        let left_configured = left_thigh.is_some() || left_shin.is_some();
        let right_configured = right_thigh.is_some() || right_shin.is_some();

        Self {
            tick_period_ms: config.tick_period_ms(),
            drain_per_tick_limit: config.drain_per_tick_limit,
            grid_position: None,
            left: JointAligner::new(JointSide::Left, left_thigh, left_shin, config.buffer_capacity),
            right: JointAligner::new(
                JointSide::Right,
                right_thigh,
                right_shin,
                config.buffer_capacity,
            ),
            single_joint_mode: left_configured != right_configured,
            tick_count: 0,
        }
    }

    /// Route a sample to whichever joint owns `sensor_id`. `None` means the
    /// id is not present in the configured sensor map (§7 `UnknownSensor`).
    pub fn push(&mut self, sensor_id: SensorId, ts: TimestampMs, q: Quaternion) -> Option<PushOutcome> {
        if let Some(outcome) = self.left.push(sensor_id, ts, q) {
            return Some(outcome);
        }
        self.right.push(sensor_id, ts, q)
    }

    pub fn owns_sensor(&self, sensor_id: SensorId) -> bool {
        self.left.owns_sensor(sensor_id) || self.right.owns_sensor(sensor_id)
    }

    fn scan_line(&self) -> Option<TimestampMs> {
        match (self.left.newest_ts(), self.right.newest_ts()) {
            (Some(l), Some(r)) => Some(l.min(r)),
            (Some(l), None) => Some(l),
            (None, Some(r)) => Some(r),
            (None, None) => None,
        }
    }

    /// Run one tick: intake new data, then advance the grid as far as the
    /// scan line allows, emitting up to `drain_per_tick_limit` grid points.
    #[tracing::instrument(skip(self))]
    pub fn tick(&mut self) -> Vec<AlignedSampleSet> {
        self.tick_count += 1;
        self.left.consume_one_match();
        self.right.consume_one_match();

        let Some(scan_line) = self.scan_line() else {
            trace!("no active joint yet, nothing to emit");
            return Vec::new();
        };

        let Some(grid_position) = self.grid_position else {
            trace!(scan_line, "initializing grid position");
            self.grid_position = Some(scan_line);
            return Vec::new();
        };

        let mut emitted = Vec::new();
        let mut position = grid_position;
        while emitted.len() < self.drain_per_tick_limit {
            let next = position + self.tick_period_ms;
            if next > scan_line {
                break;
            }
            position = next;
            emitted.push(self.emit_at(next));
        }

        if !emitted.is_empty() {
            self.grid_position = Some(position);
        }
        if emitted.len() == self.drain_per_tick_limit {
            warn!(
                drain_per_tick_limit = self.drain_per_tick_limit,
                "drain limit reached this tick; more catch-up pending"
            );
        }
        emitted
    }

    fn emit_at(&self, t: TimestampMs) -> AlignedSampleSet {
        AlignedSampleSet {
            timestamp: t,
            left_knee: self.left.is_active().then(|| self.left.interpolate_at(t)),
            right_knee: self.right.is_active().then(|| self.right.interpolate_at(t)),
        }
    }

    pub fn active_joint(&self) -> ActiveJoint {
        match (self.left.is_active(), self.right.is_active()) {
            (true, true) => ActiveJoint::Both,
            (true, false) => ActiveJoint::Left,
            (false, true) => ActiveJoint::Right,
            (false, false) => ActiveJoint::None,
        }
    }

    pub fn is_single_joint_mode(&self) -> bool {
        self.single_joint_mode
    }

    pub fn grid_position(&self) -> Option<TimestampMs> {
        self.grid_position
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Override the grid period, e.g. because `start(output_hz)` chose a
    /// different rate than the one baked into the original config.
    pub fn set_tick_period_ms(&mut self, ms: TimestampMs) {
        self.tick_period_ms = ms.max(1);
    }

    pub fn per_sensor_stats(&self) -> Vec<PerSensorStats> {
        [
            self.left.thigh_sensor_id(),
            self.left.shin_sensor_id(),
            self.right.thigh_sensor_id(),
            self.right.shin_sensor_id(),
        ]
        .into_iter()
        .flatten()
        .map(|sensor_id| {
            let joint = if self.left.owns_sensor(sensor_id) {
                &self.left
            } else {
                &self.right
            };
            let (out_of_order_count, overflow_count) =
                joint.buffer_counters(sensor_id).unwrap_or_default();
            PerSensorStats {
                sensor_id,
                buffer_len: joint.buffer_len(sensor_id).unwrap_or(0),
                out_of_order_count,
                overflow_count,
                newest_ts: joint.sensor_newest_ts(sensor_id),
            }
        })
        .collect()
    }

    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        self.grid_position = None;
        self.tick_count = 0;
    }
}
