//! Ingestion error types

use contracts::SensorId;
use thiserror::Error;

/// Ingestion error
#[derive(Debug, Error)]
pub enum IngestionError {
    /// A source for this sensor id is already registered
    #[error("sensor {sensor_id} is already registered")]
    AlreadyRegistered { sensor_id: SensorId },

    /// `stop_all`/`is_sensor_listening` referenced an id with no registered source
    #[error("sensor {sensor_id} has no registered source")]
    SourceNotFound { sensor_id: SensorId },
}

/// Ingestion Result type alias
pub type Result<T> = std::result::Result<T, IngestionError>;
