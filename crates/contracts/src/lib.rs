//! # Contracts
//!
//! Frozen interface contracts (ICD), defining the synchronization core's
//! data model, configuration, and the boundary traits external collaborators
//! (sensor adapters, sinks) implement. All business crates depend on this
//! crate; reverse dependencies are prohibited.

mod aligned;
mod blueprint;
mod config;
mod debug_stats;
mod error;
mod joint;
mod quaternion;
mod sample;
mod sensor_id;
mod sensor_source;
mod sink;

pub use aligned::*;
pub use blueprint::*;
pub use config::*;
pub use debug_stats::*;
pub use error::*;
pub use joint::*;
pub use quaternion::*;
pub use sample::*;
pub use sensor_id::*;
pub use sensor_source::{SampleCallback, SensorSource};
pub use sink::*;
