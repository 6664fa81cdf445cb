use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Atomic counters tracking dispatch and delivery behaviour.
///
/// All counters use relaxed ordering. For a point-in-time view, call
/// [`snapshot`](Self::snapshot).
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Events handed to `dispatch` that got past the registration fetch.
    pub events: AtomicU64,
    /// Events that matched no registration.
    pub unmatched_events: AtomicU64,
    /// Events whose dispatch failed because registrations could not be loaded.
    pub registry_errors: AtomicU64,
    /// Delivery attempts issued to the transport.
    pub deliveries_attempted: AtomicU64,
    /// Deliveries the endpoint accepted.
    pub deliveries_succeeded: AtomicU64,
    /// Deliveries that failed (network, timeout, rejected status).
    pub deliveries_failed: AtomicU64,
}

impl DispatchMetrics {
    pub fn increment_events(&self) {
        self.events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_unmatched(&self) {
        self.unmatched_events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_registry_errors(&self) {
        self.registry_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_attempted(&self, count: u64) {
        self.deliveries_attempted.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_succeeded(&self) {
        self.deliveries_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_failed(&self) {
        self.deliveries_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> DispatchMetricsSnapshot {
        DispatchMetricsSnapshot {
            events: self.events.load(Ordering::Relaxed),
            unmatched_events: self.unmatched_events.load(Ordering::Relaxed),
            registry_errors: self.registry_errors.load(Ordering::Relaxed),
            deliveries_attempted: self.deliveries_attempted.load(Ordering::Relaxed),
            deliveries_succeeded: self.deliveries_succeeded.load(Ordering::Relaxed),
            deliveries_failed: self.deliveries_failed.load(Ordering::Relaxed),
        }
    }
}

/// A plain data snapshot of [`DispatchMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchMetricsSnapshot {
    pub events: u64,
    pub unmatched_events: u64,
    pub registry_errors: u64,
    pub deliveries_attempted: u64,
    pub deliveries_succeeded: u64,
    pub deliveries_failed: u64,
}
