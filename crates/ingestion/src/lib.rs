//! # Ingestion
//!
//! Sensor data ingestion boundary layer.
//!
//! Responsibilities:
//! - Host one or more `SensorSource` implementations (mock or real BLE)
//! - Forward every reading into the synchronization core's `push_sample`
//! - Track ingestion-side metrics (received/dropped/active sources)
//!
//! BLE discovery and connection management themselves are out of scope;
//! a real adapter need only implement `contracts::SensorSource`.
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{IngestionPipeline, MockImuSource};
//! use contracts::SensorId;
//!
//! let mut ingestion = IngestionPipeline::new();
//! ingestion.register_source(Box::new(MockImuSource::imu(SensorId::new(0), 100.0)))?;
//!
//! let core = pipeline.clone();
//! ingestion.start_all(move |sensor_id, ts, q| core.push_sample(sensor_id, ts, q));
//! ```

mod config;
mod error;
mod mock;
mod pipeline;

pub use config::{BackpressureConfig, DropPolicy, IngestionMetrics, MetricsSnapshot};
pub use error::{IngestionError, Result};
pub use mock::{MockImuConfig, MockImuSource};
pub use pipeline::IngestionPipeline;
