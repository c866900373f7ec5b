//! Pipeline — the owned, explicitly-constructed object that wires C1-C5
//! together and exposes the §6 external API.
//!
//! No process-wide singleton (§9): the pipeline is a value an adapter holds
//! a cheap `Clone` of (it is `Arc`-backed internally) and a subscriber never
//! needs a back-reference into. Dropping every clone tears the whole thing
//! down.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use contracts::{
    normalize, ActiveJoint, CoreError, DebugStats, Quaternion, SensorId, SyncCoreConfig,
    TimestampMs, EPSILON,
};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{instrument, warn};

use crate::scheduler::GridScheduler;
use crate::subscribers::{SubscriberCallback, SubscriberRegistry, SubscriptionHandle};

struct Inner {
    scheduler: GridScheduler,
    subscribers: SubscriberRegistry,
    push_count: u64,
    emit_count: u64,
    subscriber_failure_count: u64,
}

/// The synchronization core. Cheap to `Clone`: every clone shares the same
/// underlying state.
#[derive(Clone)]
pub struct Pipeline {
    inner: Arc<Mutex<Inner>>,
    running: Arc<AtomicBool>,
    driver: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Pipeline {
    pub fn new(config: SyncCoreConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                scheduler: GridScheduler::new(&config),
                subscribers: SubscriberRegistry::new(),
                push_count: 0,
                emit_count: 0,
                subscriber_failure_count: 0,
            })),
            running: Arc::new(AtomicBool::new(false)),
            driver: Arc::new(Mutex::new(None)),
        }
    }

    /// Begin ticking at `output_hz`. Spawns a `tokio::time::interval` task
    /// that drives [`Pipeline::tick`]; requires a Tokio runtime to be
    /// active. Fails with `AlreadyRunning` if already active.
    pub fn start(&self, output_hz: u32) -> Result<(), CoreError> {
        if self.running.swap(true, Ordering::SeqCst) {
            self.running.store(true, Ordering::SeqCst);
            return Err(CoreError::AlreadyRunning);
        }

        let tick_period_ms = (1000 / output_hz.max(1) as i64).max(1);
        self.inner.lock().scheduler.set_tick_period_ms(tick_period_ms);

        let inner = self.inner.clone();
        let running = self.running.clone();
        let period = Duration::from_millis(tick_period_ms as u64);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            while running.load(Ordering::SeqCst) {
                interval.tick().await;
                run_tick(&inner);
            }
        });

        *self.driver.lock() = Some(handle);
        Ok(())
    }

    /// Halt ticking. Idempotent. Late `push_sample` calls after `stop()`
    /// still append to buffers; they are observed on the next `start()`.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.driver.lock().take() {
            handle.abort();
        }
    }

    /// Clear all buffers, sensor states, grid position, and counters. Safe
    /// to call at any time; existing subscriptions are left registered.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.scheduler.reset();
        inner.push_count = 0;
        inner.emit_count = 0;
        inner.subscriber_failure_count = 0;
    }

    /// Enqueue one sample. Unknown `sensor_id` is logged and dropped
    /// (non-fatal). Bounded O(log n) work; never suspends.
    #[instrument(skip(self, q), fields(sensor_id = %sensor_id, ts = timestamp_ms))]
    pub fn push_sample(&self, sensor_id: SensorId, timestamp_ms: TimestampMs, q: Quaternion) {
        let norm = q.norm();
        let q = if (norm - 1.0).abs() > EPSILON {
            warn!(norm, "non-unit quaternion on push, renormalizing");
            metrics::counter!("pipeline_non_unit_quaternion_total").increment(1);
            normalize(q)
        } else {
            q
        };

        let mut inner = self.inner.lock();
        inner.push_count += 1;
        metrics::counter!("pipeline_push_total").increment(1);

        match inner.scheduler.push(sensor_id, timestamp_ms, q) {
            Some(outcome) => {
                if outcome.out_of_order {
                    warn!("out-of-order push, fell back to binary-search insertion");
                    metrics::counter!("pipeline_out_of_order_total").increment(1);
                }
                if outcome.overflowed {
                    warn!("buffer overflow, discarded oldest sample");
                    metrics::counter!("pipeline_buffer_overflow_total").increment(1);
                }
            }
            None => {
                warn!("push_sample referenced unknown sensor, dropping");
                metrics::counter!("pipeline_unknown_sensor_total").increment(1);
            }
        }
    }

    /// Run one scheduler tick synchronously and deliver any emitted frames
    /// to subscribers. Exposed directly so tests and offline/batch hosts can
    /// drive the pipeline without a Tokio runtime.
    pub fn tick(&self) -> Vec<contracts::AlignedSampleSet> {
        run_tick(&self.inner)
    }

    pub fn subscribe(&self, callback: SubscriberCallback) -> SubscriptionHandle {
        self.inner.lock().subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        self.inner.lock().subscribers.unsubscribe(handle)
    }

    pub fn is_single_joint_mode(&self) -> bool {
        self.inner.lock().scheduler.is_single_joint_mode()
    }

    pub fn active_joint(&self) -> ActiveJoint {
        self.inner.lock().scheduler.active_joint()
    }

    pub fn debug_stats(&self) -> DebugStats {
        let inner = self.inner.lock();
        DebugStats {
            push_count: inner.push_count,
            emit_count: inner.emit_count,
            tick_count: inner.scheduler.tick_count(),
            subscriber_failure_count: inner.subscriber_failure_count,
            grid_position: inner.scheduler.grid_position(),
            per_sensor: inner.scheduler.per_sensor_stats(),
        }
    }
}

fn run_tick(inner: &Mutex<Inner>) -> Vec<contracts::AlignedSampleSet> {
    let mut inner = inner.lock();
    let frames = inner.scheduler.tick();
    inner.emit_count += frames.len() as u64;
    for frame in &frames {
        metrics::gauge!("pipeline_grid_position_ms").set(frame.timestamp as f64);
        let failures = inner.subscribers.emit(frame);
        if failures > 0 {
            inner.subscriber_failure_count += failures as u64;
            metrics::counter!("pipeline_subscriber_failure_total").increment(failures as u64);
        }
    }
    frames
}
