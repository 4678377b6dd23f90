/// Statistics tracking for event buses
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Snapshot of one bus's counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EventBusStats {
    /// Number of times the event was invoked
    pub invocations: u64,
    /// Handler calls that returned `Ok`
    pub handler_runs: u64,
    /// Handler calls that returned `Err`
    pub faults: u64,
    /// Handler calls that panicked
    pub panics: u64,
    /// Deniable invocations that ended denied
    pub denials: u64,
}

/// Per-event-kind summary used in monitoring output.
#[derive(Debug, Clone, Serialize)]
pub struct BusReport {
    pub event: &'static str,
    pub handlers: usize,
    pub stats: EventBusStats,
}

#[derive(Debug, Default)]
pub(crate) struct BusCounters {
    invocations: AtomicU64,
    handler_runs: AtomicU64,
    faults: AtomicU64,
    panics: AtomicU64,
    denials: AtomicU64,
}

impl BusCounters {
    pub(crate) fn invocation(&self) {
        self.invocations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn handler_ran(&self) {
        self.handler_runs.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn fault(&self) {
        self.faults.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn panic(&self) {
        self.panics.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn denial(&self) {
        self.denials.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> EventBusStats {
        EventBusStats {
            invocations: self.invocations.load(Ordering::Relaxed),
            handler_runs: self.handler_runs.load(Ordering::Relaxed),
            faults: self.faults.load(Ordering::Relaxed),
            panics: self.panics.load(Ordering::Relaxed),
            denials: self.denials.load(Ordering::Relaxed),
        }
    }
}
