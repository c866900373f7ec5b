//! # Sync Engine
//!
//! Multi-sensor synchronization and interpolation core for the four-IMU
//! wearable motion-capture rig.
//!
//! Responsibilities:
//! - Per-sensor ordered buffering with out-of-order/overflow handling (C2)
//! - Intra-joint thigh/shin pairing via shear alignment (C3)
//! - Fixed-rate grid scheduling bounded by the scan line, with bounded
//!   catch-up drain (C4)
//! - Panic-isolated subscriber fan-out (C5)
//!
//! ## Usage
//!
//! ```ignore
//! use sync_engine::Pipeline;
//! use contracts::SyncCoreConfig;
//!
//! let pipeline = Pipeline::new(SyncCoreConfig::default());
//! pipeline.start(100)?;
//! pipeline.subscribe(Box::new(|frame| println!("{:?}", frame)));
//! ```

mod buffer;
mod joint_aligner;
mod pipeline;
mod scheduler;
mod subscribers;

pub use pipeline::Pipeline;
pub use subscribers::{SubscriberCallback, SubscriptionHandle};

pub use contracts::{
    ActiveJoint, AlignedSampleSet, CoreError, DebugStats, JointSamples, JointSide,
    PerSensorStats, SensorId, SensorPlacement, SensorSlot, SyncCoreConfig,
};
