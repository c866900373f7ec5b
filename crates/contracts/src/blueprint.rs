//! PipelineBlueprint — config_loader's parse/validate target (§12).
//!
//! Describes the complete host configuration: the pipeline's own options
//! (§6), the sensor map, and the output sinks. `to_pipeline_config()` derives
//! the core's `SyncCoreConfig` from this plus defaults, the same
//! override-or-default composition the host's own blueprint type uses for
//! its engine config.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use crate::{SensorSlot, SyncCoreConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PipelineBlueprint {
    #[serde(default)]
    pub version: ConfigVersion,

    #[validate(nested)]
    pub sync: SyncConfig,

    #[serde(default)]
    #[validate(nested)]
    pub sinks: Vec<SinkConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SyncConfig {
    #[serde(default = "default_output_hz")]
    #[validate(range(min = 1, max = 1000, message = "output_hz must be in 1..=1000"))]
    pub output_hz: u32,

    /// `None` means unbounded (offline/batch mode).
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: Option<usize>,

    #[serde(default = "default_drain_per_tick_limit")]
    #[validate(range(min = 1, message = "drain_per_tick_limit must be >= 1"))]
    pub drain_per_tick_limit: usize,

    #[validate(length(
        min = 1,
        max = 4,
        message = "sensor_map must have between 1 and 4 entries"
    ))]
    pub sensor_map: Vec<SensorSlot>,
}

fn default_output_hz() -> u32 {
    crate::DEFAULT_OUTPUT_HZ
}

fn default_buffer_capacity() -> Option<usize> {
    Some(crate::DEFAULT_BUFFER_CAPACITY)
}

fn default_drain_per_tick_limit() -> usize {
    crate::DEFAULT_DRAIN_PER_TICK_LIMIT
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SinkConfig {
    #[validate(length(min = 1, message = "sink name cannot be empty"))]
    pub name: String,

    pub sink_type: SinkType,

    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    #[serde(default)]
    pub params: HashMap<String, String>,
}

fn default_queue_capacity() -> usize {
    100
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    Log,
    File,
    Network,
}

impl PipelineBlueprint {
    /// Derive the core's own config from the blueprint.
    pub fn to_pipeline_config(&self) -> SyncCoreConfig {
        SyncCoreConfig {
            output_hz: self.sync.output_hz,
            buffer_capacity: self.sync.buffer_capacity,
            drain_per_tick_limit: self.sync.drain_per_tick_limit,
            sensor_map: self.sync.sensor_map.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JointSide, SensorId, SensorPlacement};

    fn sample_blueprint() -> PipelineBlueprint {
        PipelineBlueprint {
            version: ConfigVersion::V1,
            sync: SyncConfig {
                output_hz: 100,
                buffer_capacity: Some(100),
                drain_per_tick_limit: 20,
                sensor_map: vec![
                    SensorSlot {
                        sensor_id: SensorId::new(0),
                        side: JointSide::Left,
                        placement: SensorPlacement::Thigh,
                    },
                    SensorSlot {
                        sensor_id: SensorId::new(1),
                        side: JointSide::Left,
                        placement: SensorPlacement::Shin,
                    },
                ],
            },
            sinks: vec![],
        }
    }

    #[test]
    fn to_pipeline_config_carries_sync_options() {
        let blueprint = sample_blueprint();
        let config = blueprint.to_pipeline_config();
        assert_eq!(config.output_hz, 100);
        assert_eq!(config.drain_per_tick_limit, 20);
        assert_eq!(config.sensor_map.len(), 2);
    }

    #[test]
    fn blueprint_with_valid_sensor_map_passes_validation() {
        let blueprint = sample_blueprint();
        assert!(blueprint.validate().is_ok());
    }

    #[test]
    fn blueprint_with_empty_sensor_map_fails_validation() {
        let mut blueprint = sample_blueprint();
        blueprint.sync.sensor_map.clear();
        assert!(blueprint.validate().is_err());
    }
}
