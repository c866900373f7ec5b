//! Pipeline statistics and metrics.

use std::time::Duration;

use observability::AlignmentMetricsAggregator;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Total aligned sample sets successfully emitted
    pub frames_synced: u64,

    /// Total samples discarded due to buffer overflow
    pub frames_dropped: u64,

    /// Total raw samples pushed into the synchronization core
    pub packets_received: u64,

    /// Total duration of the pipeline run
    pub duration: Duration,

    /// Number of sensor sources that were active
    pub active_sensors: usize,

    /// Number of sinks that received data
    pub active_sinks: usize,

    /// Synchronization core metrics aggregator
    pub sync_metrics: AlignmentMetricsAggregator,
}

impl PipelineStats {
    /// Calculate aligned sample sets per second throughput
    pub fn fps(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.frames_synced as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Calculate drop rate as percentage
    #[allow(dead_code)]
    pub fn drop_rate(&self) -> f64 {
        let total = self.frames_synced + self.frames_dropped;
        if total > 0 {
            (self.frames_dropped as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔═══════════════════════════════════════════════════════════╗");
        println!("║                    Pipeline Statistics                       ║");
        println!("╚═══════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Frames synced: {}", self.frames_synced);
        println!("   ├─ Samples received: {}", self.packets_received);
        println!("   ├─ FPS: {:.2}", self.fps());
        println!("   ├─ Active sensors: {}", self.active_sensors);
        println!("   └─ Active sinks: {}", self.active_sinks);

        let summary = self.sync_metrics.summary();

        println!("\n📈 Synchronization Core Metrics");
        println!("   ├─ Total frames: {}", summary.total_frames);
        println!(
            "   ├─ Single-joint frames: {} ({:.2}%)",
            summary.single_joint_frames, summary.single_joint_rate
        );
        println!(
            "   └─ Inter-frame gap (ms): {}",
            summary.inter_frame_gap_ms
        );

        println!();
    }
}
