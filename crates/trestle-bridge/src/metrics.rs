//! Bridge metrics types.
//!
//! Provides counters maintained by the bridge coordinator:
//! - `BridgeMetrics`: Atomic counters updated as records are processed
//! - `BridgeMetricsSnapshot`: Point-in-time copy for reporting

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics tracked across the lifetime of a bridge.
///
/// Updated by the coordinator on every invocation; safe to read from any
/// thread.
#[derive(Debug)]
pub struct BridgeMetrics {
    /// Total records processed successfully.
    pub records_processed: AtomicU64,

    /// Total records that failed in the pipeline.
    pub records_failed: AtomicU64,

    /// Total result headers dropped because they had no string form.
    pub headers_dropped: AtomicU64,
}

impl BridgeMetrics {
    /// Creates a new metrics instance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records_processed: AtomicU64::new(0),
            records_failed: AtomicU64::new(0),
            headers_dropped: AtomicU64::new(0),
        }
    }

    /// Records a successfully processed record.
    pub fn record_success(&self) {
        self.records_processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a record that failed in the pipeline.
    pub fn record_failure(&self) {
        self.records_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records headers dropped during outbound conversion.
    pub fn record_dropped_headers(&self, count: u64) {
        self.headers_dropped.fetch_add(count, Ordering::Relaxed);
    }

    /// Returns a snapshot of the current metrics.
    #[must_use]
    pub fn snapshot(&self) -> BridgeMetricsSnapshot {
        BridgeMetricsSnapshot {
            records_processed: self.records_processed.load(Ordering::Relaxed),
            records_failed: self.records_failed.load(Ordering::Relaxed),
            headers_dropped: self.headers_dropped.load(Ordering::Relaxed),
        }
    }
}

impl Default for BridgeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time snapshot of bridge metrics.
#[derive(Debug, Clone, Default)]
pub struct BridgeMetricsSnapshot {
    /// Total records processed successfully.
    pub records_processed: u64,

    /// Total records that failed in the pipeline.
    pub records_failed: u64,

    /// Total result headers dropped.
    pub headers_dropped: u64,
}
