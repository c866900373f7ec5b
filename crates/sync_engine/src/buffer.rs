//! SensorBuffer (C2) — per-sensor timestamp-ordered sample buffer.
//!
//! Backed by a plain sorted `Vec`: arrivals are almost always append-only, so
//! the common path is O(1) amortized; out-of-order arrivals fall back to a
//! binary-search insertion, which the spec allows to be O(n) in the rare
//! case.

use contracts::{Quaternion, Sample, SensorId, TimestampMs};

/// What happened to a pushed sample, for the caller to fold into
/// `debug_stats` counters and `tracing` events (§7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PushOutcome {
    pub out_of_order: bool,
    pub overflowed: bool,
}

#[derive(Debug, Clone)]
pub struct SensorBuffer {
    sensor_id: SensorId,
    capacity: Option<usize>,
    samples: Vec<Sample>,
    out_of_order_count: u64,
    overflow_count: u64,
}

impl SensorBuffer {
    pub fn new(sensor_id: SensorId, capacity: Option<usize>) -> Self {
        Self {
            sensor_id,
            capacity,
            samples: Vec::with_capacity(capacity.unwrap_or(16).min(1024)),
            out_of_order_count: 0,
            overflow_count: 0,
        }
    }

    pub fn sensor_id(&self) -> SensorId {
        self.sensor_id
    }

    /// Append `(ts, q)`, inserting out of order if `ts` is older than the
    /// newest sample already buffered. Discards the oldest sample on
    /// overflow when bounded.
    pub fn push(&mut self, ts: TimestampMs, q: Quaternion) -> PushOutcome {
        let mut outcome = PushOutcome::default();

        match self.samples.last() {
            Some(last) if ts < last.timestamp => {
                outcome.out_of_order = true;
                self.out_of_order_count += 1;
                let idx = self.samples.partition_point(|s| s.timestamp < ts);
                self.samples.insert(idx, Sample::new(ts, q));
            }
            _ => self.samples.push(Sample::new(ts, q)),
        }

        if let Some(capacity) = self.capacity {
            while self.samples.len() > capacity {
                self.samples.remove(0);
                self.overflow_count += 1;
                outcome.overflowed = true;
            }
        }

        outcome
    }

    /// Binary search for the index of the sample minimizing `|ts - target|`.
    /// Returns `-1` on an empty buffer.
    pub fn closest_index(&self, target_ts: TimestampMs) -> isize {
        if self.samples.is_empty() {
            return -1;
        }
        let idx = self.samples.partition_point(|s| s.timestamp < target_ts);
        if idx == 0 {
            return 0;
        }
        if idx == self.samples.len() {
            return (idx - 1) as isize;
        }
        let before = self.samples[idx - 1];
        let after = self.samples[idx];
        if (target_ts - before.timestamp).abs() <= (after.timestamp - target_ts).abs() {
            (idx - 1) as isize
        } else {
            idx as isize
        }
    }

    pub fn get(&self, i: usize) -> Option<Sample> {
        self.samples.get(i).copied()
    }

    pub fn timestamp_at(&self, i: usize) -> Option<TimestampMs> {
        self.samples.get(i).map(|s| s.timestamp)
    }

    pub fn quaternion_at(&self, i: usize) -> Option<Quaternion> {
        self.samples.get(i).map(|s| s.quaternion)
    }

    /// Remove the first `n` elements (clamped to `size()`).
    pub fn discard_up_to(&mut self, n: usize) {
        let n = n.min(self.samples.len());
        self.samples.drain(0..n);
    }

    /// Discard all samples with `ts < target`.
    pub fn trim_before(&mut self, target: TimestampMs) {
        let idx = self.samples.partition_point(|s| s.timestamp < target);
        self.samples.drain(0..idx);
    }

    pub fn oldest_ts(&self) -> Option<TimestampMs> {
        self.samples.first().map(|s| s.timestamp)
    }

    pub fn newest_ts(&self) -> Option<TimestampMs> {
        self.samples.last().map(|s| s.timestamp)
    }

    pub fn size(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn out_of_order_count(&self) -> u64 {
        self.out_of_order_count
    }

    pub fn overflow_count(&self) -> u64 {
        self.overflow_count
    }
}
