//! Joint Aligner (C3) — pairs thigh/shin samples within one joint.
//!
//! Owns two [`SensorBuffer`]s and two `SensorState`s. Never advances
//! autonomously: the grid scheduler drives it once per tick via
//! [`JointAligner::consume_one_match`].

use contracts::{slerp, JointSamples, JointSide, Quaternion, Sample, SensorId, SensorState, TimestampMs};

use crate::buffer::{PushOutcome, SensorBuffer};

struct SensorSlot {
    buffer: SensorBuffer,
    state: SensorState,
}

impl SensorSlot {
    fn new(sensor_id: SensorId, capacity: Option<usize>) -> Self {
        Self {
            buffer: SensorBuffer::new(sensor_id, capacity),
            state: SensorState::default(),
        }
    }
}

pub struct JointAligner {
    side: JointSide,
    thigh: Option<SensorSlot>,
    shin: Option<SensorSlot>,
}

impl JointAligner {
    pub fn new(
        side: JointSide,
        thigh_id: Option<SensorId>,
        shin_id: Option<SensorId>,
        capacity: Option<usize>,
    ) -> Self {
        Self {
            side,
            thigh: thigh_id.map(|id| SensorSlot::new(id, capacity)),
            shin: shin_id.map(|id| SensorSlot::new(id, capacity)),
        }
    }

    pub fn side(&self) -> JointSide {
        self.side
    }

    pub fn thigh_sensor_id(&self) -> Option<SensorId> {
        self.thigh.as_ref().map(|s| s.buffer.sensor_id())
    }

    pub fn shin_sensor_id(&self) -> Option<SensorId> {
        self.shin.as_ref().map(|s| s.buffer.sensor_id())
    }

    /// Push a sample into this joint's thigh or shin buffer. No-op if
    /// `sensor_id` is neither of this joint's configured sensors.
    pub fn push(&mut self, sensor_id: SensorId, ts: TimestampMs, q: Quaternion) -> Option<PushOutcome> {
        if let Some(slot) = self.thigh.as_mut() {
            if slot.buffer.sensor_id() == sensor_id {
                return Some(slot.buffer.push(ts, q));
            }
        }
        if let Some(slot) = self.shin.as_mut() {
            if slot.buffer.sensor_id() == sensor_id {
                return Some(slot.buffer.push(ts, q));
            }
        }
        None
    }

    pub fn owns_sensor(&self, sensor_id: SensorId) -> bool {
        self.thigh_sensor_id() == Some(sensor_id) || self.shin_sensor_id() == Some(sensor_id)
    }

    /// Intake any newly-arrived samples: for each sensor with data, pick the
    /// oldest unconsumed sample closest to the other sensor's current
    /// frontier (intra-joint shear alignment), shift `prev`/`curr`, and
    /// drop everything consumed or skipped.
    pub fn consume_one_match(&mut self) {
        let shin_frontier = self.shin.as_ref().and_then(|s| s.state.curr).map(|s| s.timestamp);
        let thigh_frontier = self.thigh.as_ref().and_then(|s| s.state.curr).map(|s| s.timestamp);

        if let Some(slot) = self.thigh.as_mut() {
            consume_into(slot, shin_frontier);
        }
        if let Some(slot) = self.shin.as_mut() {
            consume_into(slot, thigh_frontier);
        }
    }

    /// `max(curr_thigh.ts, curr_shin.ts)`, or `None` if neither sensor has
    /// been consumed yet.
    pub fn newest_ts(&self) -> Option<TimestampMs> {
        let thigh_ts = self.thigh.as_ref().and_then(|s| s.state.curr).map(|s| s.timestamp);
        let shin_ts = self.shin.as_ref().and_then(|s| s.state.curr).map(|s| s.timestamp);
        match (thigh_ts, shin_ts) {
            (Some(t), Some(s)) => Some(t.max(s)),
            (Some(t), None) => Some(t),
            (None, Some(s)) => Some(s),
            (None, None) => None,
        }
    }

    /// SLERP-interpolate each configured sensor to `t`, clamping at the
    /// `[prev, curr]` endpoints.
    pub fn interpolate_at(&self, t: TimestampMs) -> JointSamples {
        JointSamples {
            thigh: self
                .thigh
                .as_ref()
                .and_then(|s| interpolate_sensor(&s.state, t))
                .map(|q| Sample::new(t, q)),
            shin: self
                .shin
                .as_ref()
                .and_then(|s| interpolate_sensor(&s.state, t))
                .map(|q| Sample::new(t, q)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.thigh.as_ref().is_some_and(|s| s.state.is_active())
            || self.shin.as_ref().is_some_and(|s| s.state.is_active())
    }

    pub fn buffer_len(&self, sensor_id: SensorId) -> Option<usize> {
        if self.thigh_sensor_id() == Some(sensor_id) {
            return self.thigh.as_ref().map(|s| s.buffer.size());
        }
        if self.shin_sensor_id() == Some(sensor_id) {
            return self.shin.as_ref().map(|s| s.buffer.size());
        }
        None
    }

    pub fn buffer_counters(&self, sensor_id: SensorId) -> Option<(u64, u64)> {
        if self.thigh_sensor_id() == Some(sensor_id) {
            return self
                .thigh
                .as_ref()
                .map(|s| (s.buffer.out_of_order_count(), s.buffer.overflow_count()));
        }
        if self.shin_sensor_id() == Some(sensor_id) {
            return self
                .shin
                .as_ref()
                .map(|s| (s.buffer.out_of_order_count(), s.buffer.overflow_count()));
        }
        None
    }

    pub fn sensor_newest_ts(&self, sensor_id: SensorId) -> Option<TimestampMs> {
        if self.thigh_sensor_id() == Some(sensor_id) {
            return self.thigh.as_ref().and_then(|s| s.buffer.newest_ts());
        }
        if self.shin_sensor_id() == Some(sensor_id) {
            return self.shin.as_ref().and_then(|s| s.buffer.newest_ts());
        }
        None
    }

    pub fn reset(&mut self) {
        if let Some(slot) = self.thigh.as_mut() {
            slot.buffer.clear();
            slot.state = SensorState::default();
        }
        if let Some(slot) = self.shin.as_mut() {
            slot.buffer.clear();
            slot.state = SensorState::default();
        }
    }
}

fn consume_into(slot: &mut SensorSlot, other_frontier: Option<TimestampMs>) -> bool {
    if slot.buffer.is_empty() {
        return false;
    }
    let target = other_frontier.unwrap_or_else(|| slot.buffer.oldest_ts().unwrap());
    let idx = slot.buffer.closest_index(target);
    if idx < 0 {
        return false;
    }
    let idx = idx as usize;
    let Some(selected) = slot.buffer.get(idx) else {
        return false;
    };
    slot.state.prev = slot.state.curr;
    slot.state.curr = Some(selected);
    slot.buffer.discard_up_to(idx + 1);
    true
}

fn interpolate_sensor(state: &SensorState, t: TimestampMs) -> Option<Quaternion> {
    match (state.prev, state.curr) {
        (Some(prev), Some(curr)) => {
            if t <= prev.timestamp {
                Some(prev.quaternion)
            } else if t >= curr.timestamp {
                Some(curr.quaternion)
            } else {
                let u = (t - prev.timestamp) as f64 / (curr.timestamp - prev.timestamp) as f64;
                Some(slerp(prev.quaternion, curr.quaternion, u))
            }
        }
        (None, Some(curr)) => Some(curr.quaternion),
        (_, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(deg: f64) -> Quaternion {
        let half = deg.to_radians() / 2.0;
        Quaternion::new(half.cos(), 0.0, 0.0, half.sin())
    }

    fn aligner() -> JointAligner {
        JointAligner::new(
            JointSide::Left,
            Some(SensorId::new(0)),
            Some(SensorId::new(1)),
            None,
        )
    }

    #[test]
    fn consume_one_match_primes_both_sensors() {
        let mut a = aligner();
        a.push(SensorId::new(0), 0, q(0.0));
        a.push(SensorId::new(1), 2, q(0.0));
        a.consume_one_match();
        assert_eq!(a.newest_ts(), Some(2));
        assert!(a.is_active());
    }

    #[test]
    fn one_sided_activity_leaves_other_state_untouched() {
        let mut a = aligner();
        a.push(SensorId::new(0), 0, q(0.0));
        a.consume_one_match();
        assert_eq!(a.newest_ts(), Some(0));
        // shin has no data at all: interpolation for it must stay absent.
        let samples = a.interpolate_at(0);
        assert!(samples.thigh.is_some());
        assert!(samples.shin.is_none());
    }

    #[test]
    fn interpolate_at_clamps_to_endpoints() {
        let mut a = aligner();
        a.push(SensorId::new(0), 0, q(0.0));
        a.push(SensorId::new(1), 0, q(0.0));
        a.consume_one_match();
        a.push(SensorId::new(0), 10, q(90.0));
        a.push(SensorId::new(1), 10, q(90.0));
        a.consume_one_match();

        let before = a.interpolate_at(-5);
        assert_eq!(before.thigh.unwrap().quaternion, q(0.0));

        let after = a.interpolate_at(100);
        assert_eq!(after.thigh.unwrap().quaternion, q(90.0));
    }

    #[test]
    fn shortest_arc_interpolation_goes_the_short_way() {
        let mut a = JointAligner::new(JointSide::Left, Some(SensorId::new(0)), None, None);
        a.push(SensorId::new(0), 0, q(179.0));
        a.consume_one_match();
        a.push(SensorId::new(0), 10, q(-179.0));
        a.consume_one_match();

        let mid = a.interpolate_at(5).thigh.unwrap().quaternion;
        // Near +/-180 degrees: w close to 0, not close to 1 (identity).
        assert!(mid.w.abs() < 0.1);
    }

    #[test]
    fn reset_clears_buffers_and_state() {
        let mut a = aligner();
        a.push(SensorId::new(0), 0, q(0.0));
        a.consume_one_match();
        a.reset();
        assert_eq!(a.newest_ts(), None);
        assert!(!a.is_active());
    }
}
