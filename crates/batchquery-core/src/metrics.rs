//! Global atomic counters for the batch endpoint.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. at server shutdown).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters, no allocations, no locking.
pub struct Metrics {
    batches_received: AtomicU64,
    images_dispatched: AtomicU64,
    batches_failed: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            batches_received: AtomicU64::new(0),
            images_dispatched: AtomicU64::new(0),
            batches_failed: AtomicU64::new(0),
        }
    }

    pub fn inc_batches_received(&self) {
        self.batches_received.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "batches_received", "counter incremented");
    }

    pub fn add_images_dispatched(&self, count: u64) {
        self.images_dispatched.fetch_add(count, Ordering::Relaxed);
        tracing::trace!(metric = "images_dispatched", count, "counter incremented");
    }

    pub fn inc_batches_failed(&self) {
        self.batches_failed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "batches_failed", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            batches_received = self.batches_received(),
            images_dispatched = self.images_dispatched(),
            batches_failed = self.batches_failed(),
        );
    }

    pub fn batches_received(&self) -> u64 {
        self.batches_received.load(Ordering::Relaxed)
    }

    pub fn images_dispatched(&self) -> u64 {
        self.images_dispatched.load(Ordering::Relaxed)
    }

    pub fn batches_failed(&self) -> u64 {
        self.batches_failed.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.batches_received.store(0, Ordering::Relaxed);
        self.images_dispatched.store(0, Ordering::Relaxed);
        self.batches_failed.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_increment() {
        let m = Metrics::new();
        m.inc_batches_received();
        m.inc_batches_received();
        assert_eq!(m.batches_received(), 2);

        m.add_images_dispatched(3);
        m.add_images_dispatched(1);
        assert_eq!(m.images_dispatched(), 4);

        m.inc_batches_failed();
        assert_eq!(m.batches_failed(), 1);
    }

    #[test]
    fn reset_zeroes_all() {
        let m = Metrics::new();
        m.inc_batches_received();
        m.add_images_dispatched(2);
        m.inc_batches_failed();
        m.reset();
        assert_eq!(m.batches_received(), 0);
        assert_eq!(m.images_dispatched(), 0);
        assert_eq!(m.batches_failed(), 0);
    }
}
