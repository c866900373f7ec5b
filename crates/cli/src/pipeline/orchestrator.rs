//! Pipeline orchestrator - coordinates all components.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use contracts::{AlignedSampleSet, PipelineBlueprint};
use ingestion::{IngestionPipeline, MockImuSource};
use observability::AlignmentMetricsAggregator;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::PipelineStats;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The parsed and validated pipeline blueprint
    pub blueprint: PipelineBlueprint,

    /// Maximum number of aligned sample sets to emit (None = unlimited)
    pub max_frames: Option<u64>,

    /// Pipeline timeout (None = no timeout)
    pub timeout: Option<Duration>,

    /// Channel buffer size
    pub buffer_size: usize,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline to completion
    pub async fn run(self) -> Result<PipelineStats> {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;

        // ==== Stage 1: Initialize Metrics (optional) ====
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!(port, "Metrics endpoint available");
        }

        // ==== Stage 2: Setup Ingestion Pipeline ====
        info!("Setting up ingestion pipeline...");
        let mut ingestion = IngestionPipeline::new();

        for slot in &blueprint.sync.sensor_map {
            ingestion
                .register_source(Box::new(MockImuSource::imu(slot.sensor_id, 100.0)))
                .with_context(|| format!("Failed to register sensor source {}", slot.sensor_id))?;
        }

        let active_sensors = ingestion.source_count();
        info!(active_sensors, "Ingestion pipeline configured");

        // ==== Stage 3: Setup Synchronization Core ====
        info!("Configuring synchronization core...");
        let sync_config = blueprint.to_pipeline_config();
        let core = sync_engine::Pipeline::new(sync_config.clone());

        info!(
            output_hz = sync_config.output_hz,
            sensors = sync_config.sensor_map.len(),
            "Synchronization core configured"
        );

        // ==== Stage 4: Setup Dispatcher ====
        info!("Setting up dispatcher...");
        let (sync_tx, sync_rx) = mpsc::channel::<AlignedSampleSet>(self.config.buffer_size);

        if blueprint.sinks.is_empty() {
            warn!("No sinks configured - aligned sample sets will be dropped");
        }

        let dispatcher = dispatcher::create_dispatcher(blueprint.sinks.clone(), sync_rx)
            .await
            .context("Failed to create dispatcher")?;

        let active_sinks = blueprint.sinks.len();
        let dispatcher_handle = dispatcher.spawn();

        info!(active_sinks, "Dispatcher started");

        // ==== Stage 5: Wire core emissions into the dispatcher channel ====
        let metrics_aggregator = std::sync::Arc::new(parking_lot::Mutex::new(
            AlignmentMetricsAggregator::new(),
        ));
        let aggregator_for_subscriber = metrics_aggregator.clone();
        let sync_tx_for_subscriber = sync_tx.clone();
        core.subscribe(Box::new(move |frame| {
            aggregator_for_subscriber.lock().observe_frame(frame);
            observability::record_frame_emitted(frame);
            let _ = sync_tx_for_subscriber.try_send(*frame);
        }));
        drop(sync_tx);

        // ==== Stage 6: Start ingestion and the core's tick loop ====
        info!("Starting sensor data ingestion...");
        let core_for_ingestion = core.clone();
        ingestion.start_all(move |sensor_id, ts, q| {
            core_for_ingestion.push_sample(sensor_id, ts, q);
        });

        core.start(sync_config.output_hz)
            .context("Failed to start synchronization core")?;

        let max_frames = self.config.max_frames;

        info!(max_frames = ?max_frames, "Pipeline running");

        // Pipeline monitoring task: polls debug stats until a stop condition fires.
        let core_for_monitor = core.clone();
        let aggregator_for_monitor = metrics_aggregator.clone();
        let monitor_task = async move {
            let mut stats = PipelineStats {
                active_sensors,
                active_sinks,
                ..Default::default()
            };

            let mut poll = tokio::time::interval(Duration::from_millis(200));
            loop {
                poll.tick().await;
                let debug_stats = core_for_monitor.debug_stats();
                aggregator_for_monitor.lock().observe_debug_stats(&debug_stats);

                stats.packets_received = debug_stats.push_count;
                stats.frames_synced = debug_stats.emit_count;
                stats.frames_dropped = debug_stats
                    .per_sensor
                    .iter()
                    .map(|s| s.overflow_count)
                    .sum();

                if let Some(max) = max_frames {
                    if stats.frames_synced >= max {
                        info!(frames = stats.frames_synced, "Reached max frames limit");
                        break;
                    }
                }
            }

            stats
        };

        // Run with optional timeout
        let stats = if let Some(timeout) = self.config.timeout {
            match tokio::time::timeout(timeout, monitor_task).await {
                Ok(stats) => stats,
                Err(_) => {
                    warn!(timeout_secs = timeout.as_secs(), "Pipeline timed out");
                    let debug_stats = core.debug_stats();
                    PipelineStats {
                        active_sensors,
                        active_sinks,
                        packets_received: debug_stats.push_count,
                        frames_synced: debug_stats.emit_count,
                        frames_dropped: debug_stats
                            .per_sensor
                            .iter()
                            .map(|s| s.overflow_count)
                            .sum(),
                        ..Default::default()
                    }
                }
            }
        } else {
            monitor_task.await
        };

        // ==== Stage 7: Cleanup ====
        info!("Shutting down pipeline...");

        ingestion.stop_all();
        core.stop();

        // Wait for dispatcher to flush
        let _ = tokio::time::timeout(Duration::from_secs(5), dispatcher_handle).await;

        let mut final_stats = stats;
        final_stats.duration = start_time.elapsed();
        final_stats.sync_metrics = metrics_aggregator.lock().clone();

        info!(
            duration_secs = final_stats.duration.as_secs_f64(),
            fps = format!("{:.2}", final_stats.fps()),
            "Pipeline shutdown complete"
        );

        Ok(final_stats)
    }
}
