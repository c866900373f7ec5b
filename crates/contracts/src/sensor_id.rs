//! SensorId — compact integer identifier for one of the four body-worn sensors.
//!
//! The meaning of a given id (which joint side, which placement) is not baked
//! into the type; it comes from the process-wide `sensor_map` table (see
//! [`crate::SensorSlot`]) so the wire-level id stays a plain small integer.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SensorId(pub u8);

impl SensorId {
    pub fn new(raw: u8) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u8 {
        self.0
    }
}

impl From<u8> for SensorId {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

impl Default for SensorId {
    fn default() -> Self {
        SensorId::new(0)
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sensor#{}", self.0)
    }
}

/// Which side of the body a joint is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointSide {
    Left,
    Right,
}

/// Where on the joint a sensor is strapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorPlacement {
    Thigh,
    Shin,
}

/// One entry of the fixed, process-wide `SensorId -> (joint, placement)` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorSlot {
    pub sensor_id: SensorId,
    pub side: JointSide,
    pub placement: SensorPlacement,
}

/// Which joint(s) currently have at least one active sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveJoint {
    None,
    Left,
    Right,
    Both,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn sensor_id_is_a_cheap_copy_type() {
        let a = SensorId::new(2);
        let b = a;
        assert_eq!(a, b);
    }

    #[test]
    fn sensor_id_usable_as_hashmap_key() {
        let mut map: HashMap<SensorId, &str> = HashMap::new();
        map.insert(SensorId::new(0), "left-thigh");
        map.insert(SensorId::new(1), "left-shin");
        assert_eq!(map.get(&SensorId::new(0)), Some(&"left-thigh"));
    }

    #[test]
    fn sensor_id_serde_roundtrip() {
        let id = SensorId::new(3);
        let json = serde_json::to_string(&id).unwrap();
        let parsed: SensorId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
