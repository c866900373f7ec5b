//! AlignedSampleSet — the pipeline's output unit, one per grid tick.

use serde::{Deserialize, Serialize};

use crate::{JointSamples, TimestampMs};

/// Emitted once per grid position. At least one of `left_knee`/`right_knee`
/// is always present; the other is absent in single-joint operating mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignedSampleSet {
    pub timestamp: TimestampMs,
    pub left_knee: Option<JointSamples>,
    pub right_knee: Option<JointSamples>,
}

impl AlignedSampleSet {
    pub fn is_single_joint(&self) -> bool {
        self.left_knee.is_some() != self.right_knee.is_some()
    }
}
