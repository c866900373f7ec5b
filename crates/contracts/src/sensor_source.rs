//! SensorSource trait — the §6 boundary a BLE adapter implements.
//!
//! This crate only defines the contract; BLE discovery/connection itself is
//! explicitly out of scope (§1). A mock implementation lives in the
//! `ingestion` crate for demos and tests.

use std::sync::Arc;

use crate::{Quaternion, SensorId, TimestampMs};

/// Invoked once per reading: `(timestamp_ms, orientation)`.
pub type SampleCallback = Arc<dyn Fn(TimestampMs, Quaternion) + Send + Sync>;

/// A single body-worn sensor's data source.
///
/// Decouples the pipeline from how a reading was actually obtained (real BLE
/// notification vs. a scripted/mock generator); both implement this trait and
/// drive the same `push_sample` call on the core.
pub trait SensorSource: Send + Sync {
    fn sensor_id(&self) -> SensorId;

    /// Register the callback that receives every reading. Idempotent if
    /// already listening.
    fn listen(&self, callback: SampleCallback);

    /// Stop producing readings. Idempotent.
    fn stop(&self);

    fn is_listening(&self) -> bool;
}
