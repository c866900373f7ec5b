//! SyncCoreConfig — the options the pipeline itself understands (§6).

use serde::{Deserialize, Serialize};

use crate::SensorSlot;

pub const DEFAULT_OUTPUT_HZ: u32 = 100;
pub const DEFAULT_BUFFER_CAPACITY: usize = 100;
pub const DEFAULT_DRAIN_PER_TICK_LIMIT: usize = 20;

/// Configuration recognized by the core pipeline. Everything else (sink
/// wiring, adapter selection) lives one layer out, in the host's own config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncCoreConfig {
    /// Emission rate in Hz. Determines the grid period `Δ = 1000 / output_hz`.
    pub output_hz: u32,
    /// Per-sensor buffer capacity in samples. `None` means unbounded
    /// (offline/batch mode).
    pub buffer_capacity: Option<usize>,
    /// Maximum grid points emitted per tick during catch-up.
    pub drain_per_tick_limit: usize,
    /// Static `SensorId -> (joint, placement)` table.
    pub sensor_map: Vec<SensorSlot>,
}

impl Default for SyncCoreConfig {
    fn default() -> Self {
        Self {
            output_hz: DEFAULT_OUTPUT_HZ,
            buffer_capacity: Some(DEFAULT_BUFFER_CAPACITY),
            drain_per_tick_limit: DEFAULT_DRAIN_PER_TICK_LIMIT,
            sensor_map: Vec::new(),
        }
    }
}

impl SyncCoreConfig {
    /// Grid period in milliseconds, `Δ = 1000 / output_hz`.
    pub fn tick_period_ms(&self) -> i64 {
        (1000 / self.output_hz.max(1) as i64).max(1)
    }
}
