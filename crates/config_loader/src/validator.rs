//! Configuration validation module
//!
//! Uses the `validator` crate for structured validation while retaining
//! custom validation rules the derive macro can't express.
//!
//! Validation rules:
//! - sensor_id must be unique across the sensor map
//! - a given (side, placement) pair may be mapped at most once
//! - output_hz/drain_per_tick_limit bounds (handled by validator derive)
//! - sensor_map length 1..=4 (handled by validator derive)
//! - sink name non-empty (handled by validator derive)

use std::collections::HashSet;

use contracts::{ConfigError, PipelineBlueprint};
use validator::Validate;

/// Validate a `PipelineBlueprint`.
///
/// First runs the validator-derive rules, then the custom cross-field
/// checks below.
pub fn validate(blueprint: &PipelineBlueprint) -> Result<(), ConfigError> {
    blueprint
        .validate()
        .map_err(|e| ConfigError::validation("validation", format!("{e}")))?;

    validate_unique_sensor_ids(blueprint)?;
    validate_unique_slot_assignments(blueprint)?;

    Ok(())
}

fn validate_unique_sensor_ids(blueprint: &PipelineBlueprint) -> Result<(), ConfigError> {
    let mut seen = HashSet::with_capacity(blueprint.sync.sensor_map.len());
    for slot in &blueprint.sync.sensor_map {
        if !seen.insert(slot.sensor_id) {
            return Err(ConfigError::validation(
                format!("sync.sensor_map[sensor_id={}]", slot.sensor_id),
                "duplicate sensor_id",
            ));
        }
    }
    Ok(())
}

fn validate_unique_slot_assignments(blueprint: &PipelineBlueprint) -> Result<(), ConfigError> {
    let mut seen = HashSet::with_capacity(blueprint.sync.sensor_map.len());
    for slot in &blueprint.sync.sensor_map {
        if !seen.insert((slot.side, slot.placement)) {
            return Err(ConfigError::validation(
                "sync.sensor_map",
                format!(
                    "more than one sensor mapped to {:?}/{:?}",
                    slot.side, slot.placement
                ),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{ConfigVersion, JointSide, SensorId, SensorPlacement, SensorSlot, SinkConfig, SinkType, SyncConfig};

    fn minimal_blueprint() -> PipelineBlueprint {
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
            sinks: vec![SinkConfig {
                name: "log".into(),
                sink_type: SinkType::Log,
                queue_capacity: 100,
                params: Default::default(),
            }],
        }
    }

    #[test]
    fn valid_config_passes() {
        let bp = minimal_blueprint();
        assert!(validate(&bp).is_ok());
    }

    #[test]
    fn duplicate_sensor_id_is_rejected() {
        let mut bp = minimal_blueprint();
        let dup = bp.sync.sensor_map[0].clone();
        bp.sync.sensor_map.push(dup);
        let result = validate(&bp);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("duplicate sensor_id"));
    }

    #[test]
    fn duplicate_slot_assignment_is_rejected() {
        let mut bp = minimal_blueprint();
        bp.sync.sensor_map.push(SensorSlot {
            sensor_id: SensorId::new(9),
            side: JointSide::Left,
            placement: SensorPlacement::Thigh,
        });
        let result = validate(&bp);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_output_hz_is_rejected() {
        let mut bp = minimal_blueprint();
        bp.sync.output_hz = 0;
        assert!(validate(&bp).is_err());
    }

    #[test]
    fn empty_sink_name_is_rejected() {
        let mut bp = minimal_blueprint();
        bp.sinks[0].name = String::new();
        assert!(validate(&bp).is_err());
    }

    #[test]
    fn empty_sensor_map_is_rejected() {
        let mut bp = minimal_blueprint();
        bp.sync.sensor_map.clear();
        assert!(validate(&bp).is_err());
    }
}
