//! Sync core metrics collection module
//!
//! Collects and aggregates pipeline runtime metrics based on `DebugStats`
//! and emitted `AlignedSampleSet` frames.

use contracts::{AlignedSampleSet, DebugStats};
use metrics::{counter, gauge, histogram};

/// Record metrics from one emitted frame.
///
/// Call this each time the pipeline's subscriber callback receives a frame.
///
/// ```ignore
/// use observability::metrics::record_frame_emitted;
///
/// pipeline.subscribe(Box::new(|frame| record_frame_emitted(frame)));
/// ```
pub fn record_frame_emitted(frame: &AlignedSampleSet) {
    counter!("sync_core_frames_emitted_total").increment(1);
    gauge!("sync_core_grid_position_ms").set(frame.timestamp as f64);

    if frame.left_knee.is_some() {
        counter!("sync_core_frames_total", "joint" => "left").increment(1);
    }
    if frame.right_knee.is_some() {
        counter!("sync_core_frames_total", "joint" => "right").increment(1);
    }
    if frame.is_single_joint() {
        counter!("sync_core_frames_single_joint_total").increment(1);
    }
}

/// Record a `DebugStats` snapshot, typically polled on an interval.
pub fn record_debug_stats(stats: &DebugStats) {
    gauge!("sync_core_push_total").set(stats.push_count as f64);
    gauge!("sync_core_emit_total").set(stats.emit_count as f64);
    gauge!("sync_core_tick_total").set(stats.tick_count as f64);
    gauge!("sync_core_subscriber_failure_total").set(stats.subscriber_failure_count as f64);

    if let Some(grid_position) = stats.grid_position {
        gauge!("sync_core_grid_position_ms").set(grid_position as f64);
    }

    for sensor in &stats.per_sensor {
        let sensor_id = sensor.sensor_id.to_string();
        gauge!("sync_core_buffer_depth", "sensor_id" => sensor_id.clone())
            .set(sensor.buffer_len as f64);
        gauge!("sync_core_out_of_order_total", "sensor_id" => sensor_id.clone())
            .set(sensor.out_of_order_count as f64);
        gauge!("sync_core_buffer_overflow_total", "sensor_id" => sensor_id.clone())
            .set(sensor.overflow_count as f64);
    }
}

/// Record raw sensor sample reception, independent of alignment outcome.
pub fn record_sample_received(sensor_id: &str) {
    counter!("sync_core_samples_received_total", "sensor_id" => sensor_id.to_string())
        .increment(1);
}

/// Record a sink's dispatch outcome for one emitted frame.
pub fn record_frame_dispatched(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "sync_core_frames_dispatched_total",
        "sink" => sink_name.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record the latency between a frame's grid timestamp and wall-clock
/// delivery to subscribers.
pub fn record_emit_latency_ms(latency_ms: f64) {
    histogram!("sync_core_emit_latency_ms").record(latency_ms);
}

/// In-memory aggregator for summary reporting (e.g. a CLI `info` command).
///
/// Consumes successive `DebugStats` snapshots and `AlignedSampleSet` frames,
/// tracking running statistics that a single snapshot can't express, such as
/// time between emissions.
#[derive(Debug, Clone, Default)]
pub struct AlignmentMetricsAggregator {
    pub total_frames: u64,
    pub single_joint_frames: u64,
    pub last_timestamp: Option<i64>,
    pub inter_frame_gap_ms: RunningStats,
    pub buffer_depth: std::collections::HashMap<u8, RunningStats>,
}

impl AlignmentMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe_frame(&mut self, frame: &AlignedSampleSet) {
        self.total_frames += 1;
        if frame.is_single_joint() {
            self.single_joint_frames += 1;
        }
        if let Some(prev) = self.last_timestamp {
            self.inter_frame_gap_ms.push((frame.timestamp - prev) as f64);
        }
        self.last_timestamp = Some(frame.timestamp);
    }

    pub fn observe_debug_stats(&mut self, stats: &DebugStats) {
        for sensor in &stats.per_sensor {
            self.buffer_depth
                .entry(sensor.sensor_id.raw())
                .or_default()
                .push(sensor.buffer_len as f64);
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_frames: self.total_frames,
            single_joint_frames: self.single_joint_frames,
            single_joint_rate: if self.total_frames > 0 {
                self.single_joint_frames as f64 / self.total_frames as f64 * 100.0
            } else {
                0.0
            },
            inter_frame_gap_ms: StatsSummary::from(&self.inter_frame_gap_ms),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Summary report, e.g. for a CLI `info` subcommand.
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_frames: u64,
    pub single_joint_frames: u64,
    pub single_joint_rate: f64,
    pub inter_frame_gap_ms: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Sync Core Metrics Summary ===")?;
        writeln!(f, "Total frames: {}", self.total_frames)?;
        writeln!(
            f,
            "Single-joint frames: {} ({:.2}%)",
            self.single_joint_frames, self.single_joint_rate
        )?;
        writeln!(f, "Inter-frame gap (ms): {}", self.inter_frame_gap_ms)?;
        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics calculator (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
