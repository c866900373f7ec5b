//! Backpressure configuration and metrics

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// What a sensor source does when its internal send buffer is full.
///
/// This is a boundary-layer concern only; the core itself never drops on
/// content, per its own non-goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropPolicy {
    /// Drop the newest sample, keeping whatever is already queued.
    #[default]
    DropNewest,
    /// Drop the oldest queued sample to make room.
    DropOldest,
}

/// Backpressure configuration for one registered sensor source.
#[derive(Debug, Clone)]
pub struct BackpressureConfig {
    /// Internal buffer capacity before the drop policy engages.
    pub queue_capacity: usize,

    /// Drop policy when full.
    pub drop_policy: DropPolicy,
}

impl Default for BackpressureConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 100,
            drop_policy: DropPolicy::DropNewest,
        }
    }
}

impl BackpressureConfig {
    pub fn new(queue_capacity: usize, drop_policy: DropPolicy) -> Self {
        Self {
            queue_capacity,
            drop_policy,
        }
    }
}

/// Ingestion metrics, shared across every registered source.
#[derive(Debug, Default)]
pub struct IngestionMetrics {
    pub samples_received: AtomicU64,
    pub samples_dropped: AtomicU64,
    pub active_sources: AtomicUsize,
}

impl IngestionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_received(&self) {
        self.samples_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self) {
        self.samples_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_active_sources(&self, count: usize) {
        self.active_sources.store(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            samples_received: self.samples_received.load(Ordering::Relaxed),
            samples_dropped: self.samples_dropped.load(Ordering::Relaxed),
            active_sources: self.active_sources.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    pub samples_received: u64,
    pub samples_dropped: u64,
    pub active_sources: usize,
}
