//! Emit Path (C5) — subscriber registry with panic isolation.
//!
//! Subscriber slots live in a [`slab::Slab`] keyed by a generational handle,
//! so `subscribe`/`unsubscribe` are both O(1) and unsubscribing one
//! subscriber never invalidates another's handle.

use std::panic::{catch_unwind, AssertUnwindSafe};

use contracts::AlignedSampleSet;
use slab::Slab;
use tracing::warn;

pub type SubscriberCallback = Box<dyn Fn(&AlignedSampleSet) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionHandle(usize);

#[derive(Default)]
pub struct SubscriberRegistry {
    slots: Slab<SubscriberCallback>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self { slots: Slab::new() }
    }

    pub fn subscribe(&mut self, callback: SubscriberCallback) -> SubscriptionHandle {
        SubscriptionHandle(self.slots.insert(callback))
    }

    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        self.slots.try_remove(handle.0).is_some()
    }

    /// Invoke every subscriber with `frame`. A subscriber whose callback
    /// panics is isolated — caught, counted, and skipped — and never
    /// prevents delivery to the others or aborts the pipeline.
    pub fn emit(&self, frame: &AlignedSampleSet) -> usize {
        let mut failures = 0;
        for (key, callback) in self.slots.iter() {
            if catch_unwind(AssertUnwindSafe(|| callback(frame))).is_err() {
                failures += 1;
                warn!(subscriber = key, "subscriber callback panicked, isolating");
            }
        }
        failures
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn frame(ts: i64) -> AlignedSampleSet {
        AlignedSampleSet {
            timestamp: ts,
            left_knee: None,
            right_knee: None,
        }
    }

    #[test]
    fn delivers_to_every_subscriber() {
        let mut registry = SubscriberRegistry::new();
        let a = Arc::new(AtomicUsize::new(0));
        let b = Arc::new(AtomicUsize::new(0));
        let a2 = a.clone();
        let b2 = b.clone();
        registry.subscribe(Box::new(move |_| {
            a2.fetch_add(1, Ordering::SeqCst);
        }));
        registry.subscribe(Box::new(move |_| {
            b2.fetch_add(1, Ordering::SeqCst);
        }));

        registry.emit(&frame(10));
        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_stops_delivery_without_disturbing_others() {
        let mut registry = SubscriberRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count2 = count.clone();
        let handle = registry.subscribe(Box::new(move |_| {
            count2.fetch_add(1, Ordering::SeqCst);
        }));
        let survivor = Arc::new(AtomicUsize::new(0));
        let survivor2 = survivor.clone();
        registry.subscribe(Box::new(move |_| {
            survivor2.fetch_add(1, Ordering::SeqCst);
        }));

        assert!(registry.unsubscribe(handle));
        registry.emit(&frame(10));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(survivor.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_subscriber_is_isolated() {
        let mut registry = SubscriberRegistry::new();
        registry.subscribe(Box::new(|_| panic!("boom")));
        let survivor_calls = Arc::new(AtomicUsize::new(0));
        let survivor_calls2 = survivor_calls.clone();
        registry.subscribe(Box::new(move |_| {
            survivor_calls2.fetch_add(1, Ordering::SeqCst);
        }));

        for ts in 0..5 {
            let failures = registry.emit(&frame(ts));
            assert_eq!(failures, 1);
        }
        assert_eq!(survivor_calls.load(Ordering::SeqCst), 5);
    }
}
