//! Ingestion Pipeline main entry

use std::collections::HashMap;
use std::sync::Arc;

use contracts::{SampleCallback, SensorId, SensorSource};
use tracing::{debug, info, instrument};

use crate::config::IngestionMetrics;
use crate::error::{IngestionError, Result};

/// Manages a set of `SensorSource`s and fans every reading out through one
/// forwarding callback (typically `Pipeline::push_sample`), tagging arrivals
/// with ingestion-side metrics along the way.
pub struct IngestionPipeline {
    sources: HashMap<SensorId, Box<dyn SensorSource>>,
    metrics: Arc<IngestionMetrics>,
}

impl IngestionPipeline {
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
            metrics: Arc::new(IngestionMetrics::new()),
        }
    }

    /// Register a sensor source. Returns an error if `sensor_id` is already
    /// registered.
    #[instrument(skip(self, source), fields(sensor_id = %source.sensor_id()))]
    pub fn register_source(&mut self, source: Box<dyn SensorSource>) -> Result<()> {
        let sensor_id = source.sensor_id();
        if self.sources.contains_key(&sensor_id) {
            return Err(IngestionError::AlreadyRegistered { sensor_id });
        }
        debug!(sensor_id = %sensor_id, "registered sensor source");
        self.sources.insert(sensor_id, source);
        Ok(())
    }

    /// Start every registered source, forwarding each reading to `forward`.
    /// `forward` is typically a closure wrapping `Pipeline::push_sample`.
    #[instrument(name = "ingestion_start_all", skip(self, forward))]
    pub fn start_all<F>(&self, forward: F)
    where
        F: Fn(SensorId, contracts::TimestampMs, contracts::Quaternion) + Send + Sync + 'static,
    {
        info!(count = self.sources.len(), "starting all sensor sources");
        let forward: Arc<F> = Arc::new(forward);
        let metrics = self.metrics.clone();
        for source in self.sources.values() {
            if source.is_listening() {
                continue;
            }
            let sensor_id = source.sensor_id();
            let forward = forward.clone();
            let metrics = metrics.clone();
            let callback: SampleCallback = Arc::new(move |ts, q| {
                metrics.record_received();
                forward(sensor_id, ts, q);
            });
            source.listen(callback);
        }
        self.metrics.set_active_sources(self.sources.len());
    }

    #[instrument(name = "ingestion_stop_all", skip(self))]
    pub fn stop_all(&self) {
        info!(count = self.sources.len(), "stopping all sensor sources");
        for source in self.sources.values() {
            source.stop();
        }
        self.metrics.set_active_sources(0);
    }

    pub fn metrics(&self) -> Arc<IngestionMetrics> {
        self.metrics.clone()
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn is_sensor_listening(&self, sensor_id: SensorId) -> bool {
        self.sources
            .get(&sensor_id)
            .map(|s| s.is_listening())
            .unwrap_or(false)
    }
}

impl Default for IngestionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for IngestionPipeline {
    fn drop(&mut self) {
        self.stop_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockImuSource;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn pipeline_starts_empty() {
        let pipeline = IngestionPipeline::new();
        assert_eq!(pipeline.source_count(), 0);
    }

    #[test]
    fn registering_duplicate_sensor_id_fails() {
        let mut pipeline = IngestionPipeline::new();
        pipeline
            .register_source(Box::new(MockImuSource::imu(SensorId::new(0), 100.0)))
            .unwrap();
        let result = pipeline.register_source(Box::new(MockImuSource::imu(SensorId::new(0), 100.0)));
        assert!(result.is_err());
    }

    #[test]
    fn start_all_forwards_readings() {
        let mut pipeline = IngestionPipeline::new();
        pipeline
            .register_source(Box::new(MockImuSource::imu(SensorId::new(0), 200.0)))
            .unwrap();

        let received = Arc::new(AtomicUsize::new(0));
        let received2 = received.clone();
        pipeline.start_all(move |_sensor_id, _ts, _q| {
            received2.fetch_add(1, Ordering::SeqCst);
        });

        std::thread::sleep(Duration::from_millis(100));
        pipeline.stop_all();
        assert!(received.load(Ordering::SeqCst) > 0);
    }
}
