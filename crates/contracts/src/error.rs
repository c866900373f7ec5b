//! CoreError — the pipeline's typed error surface (§7).
//!
//! Most error *kinds* named in §7 are never returned as `Err`; they are
//! non-fatal by design and only ever observed through [`crate::DebugStats`]
//! counters and `tracing::warn!` events. `AlreadyRunning` is the sole
//! data-path condition that is a real fatal `Err`.

use thiserror::Error;

use crate::SensorId;

#[derive(Debug, Error)]
pub enum CoreError {
    /// `start()` called while the pipeline is already ticking.
    #[error("pipeline is already running")]
    AlreadyRunning,

    /// `push_sample` with a `sensor_id` absent from the configured sensor map.
    #[error("push_sample referenced unknown sensor {sensor_id}")]
    UnknownSensor { sensor_id: SensorId },

    /// A pushed quaternion's norm drifted outside tolerance before renormalization.
    #[error("quaternion from sensor {sensor_id} had norm {norm:.6}, renormalized")]
    NonUnitQuaternion { sensor_id: SensorId, norm: f64 },

    /// A pushed sample's timestamp was older than the buffer's newest timestamp.
    #[error("out-of-order push for sensor {sensor_id}: ts={ts} < newest={newest}")]
    OutOfOrderTimestamp {
        sensor_id: SensorId,
        ts: i64,
        newest: i64,
    },

    /// Live-mode buffer was at capacity; the oldest sample was discarded.
    #[error("buffer overflow for sensor {sensor_id}: capacity={capacity}")]
    BufferOverflow { sensor_id: SensorId, capacity: usize },

    /// A subscriber callback panicked during emission and was isolated.
    #[error("subscriber {subscriber} failed during emission")]
    SubscriberFailure { subscriber: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("config validation error at '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            source: None,
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink '{sink_name}' write error: {message}")]
    Write { sink_name: String, message: String },

    #[error("sink '{sink_name}' connection error: {message}")]
    Connection { sink_name: String, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
