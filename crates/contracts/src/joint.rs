//! JointSamples — the pair of (thigh, shin) samples for one knee.

use serde::{Deserialize, Serialize};

use crate::Sample;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JointSamples {
    pub thigh: Option<Sample>,
    pub shin: Option<Sample>,
}

impl JointSamples {
    pub fn is_empty(&self) -> bool {
        self.thigh.is_none() && self.shin.is_none()
    }
}
