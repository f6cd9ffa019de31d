//! Memoization statistics and metrics tracking
//!
//! This module provides types for tracking wrapper performance metrics
//! including hit rates, call coalescing, eviction counts, and teardown
//! flushes. Counters are recorded only when `track_metrics` is enabled in
//! the configuration; `size` and `max_entries` are always reported live.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Statistics for memoized operation monitoring
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoStats {
    /// Current number of live entries
    pub size: usize,

    /// Maximum allowed entries (None = unbounded strategy)
    pub max_entries: Option<usize>,

    /// Total number of calls served from the cache
    pub hits: u64,

    /// Total number of calls that invoked the wrapped operation
    pub misses: u64,

    /// Hits that joined an in-flight computation instead of a settled one
    pub coalesced: u64,

    /// Total number of stored entries
    pub inserts: u64,

    /// Total number of capacity evictions
    pub evictions: u64,

    /// Total number of manual invalidation operations
    pub invalidations: u64,

    /// Total number of teardown flushes
    pub flushes: u64,
}

impl MemoStats {
    /// Calculate hit rate (hits / total calls)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Calculate miss rate (misses / total calls)
    pub fn miss_rate(&self) -> f64 {
        1.0 - self.hit_rate()
    }

    /// Calculate fill percentage (size / max_entries)
    pub fn fill_percentage(&self) -> Option<f64> {
        self.max_entries.map(|max| if max == 0 { 0.0 } else { self.size as f64 / max as f64 })
    }

    /// Total number of calls that reached the cache (hits + misses)
    pub fn total_calls(&self) -> u64 {
        self.hits + self.misses
    }
}

/// Thread-safe metrics collector for wrapper operations
///
/// This struct uses atomic operations to track metrics without requiring
/// locks, enabling low-overhead monitoring.
#[derive(Debug)]
pub(crate) struct MetricsCollector {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    coalesced: Arc<AtomicU64>,
    inserts: Arc<AtomicU64>,
    evictions: Arc<AtomicU64>,
    invalidations: Arc<AtomicU64>,
    flushes: Arc<AtomicU64>,
}

impl Clone for MetricsCollector {
    fn clone(&self) -> Self {
        Self {
            hits: Arc::clone(&self.hits),
            misses: Arc::clone(&self.misses),
            coalesced: Arc::clone(&self.coalesced),
            inserts: Arc::clone(&self.inserts),
            evictions: Arc::clone(&self.evictions),
            invalidations: Arc::clone(&self.invalidations),
            flushes: Arc::clone(&self.flushes),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    /// Create a new metrics collector
    pub(crate) fn new() -> Self {
        Self {
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            coalesced: Arc::new(AtomicU64::new(0)),
            inserts: Arc::new(AtomicU64::new(0)),
            evictions: Arc::new(AtomicU64::new(0)),
            invalidations: Arc::new(AtomicU64::new(0)),
            flushes: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record a cache hit
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cache miss
    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a hit that joined an in-flight computation
    pub(crate) fn record_coalesced(&self) {
        self.coalesced.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an insert operation
    pub(crate) fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a capacity eviction
    pub(crate) fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a manual invalidation operation
    pub(crate) fn record_invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a teardown flush
    pub(crate) fn record_flush(&self) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current statistics snapshot
    pub(crate) fn snapshot(&self, size: usize, max_entries: Option<usize>) -> MemoStats {
        MemoStats {
            size,
            max_entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
        }
    }

    /// Reset all metrics to zero
    pub(crate) fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.coalesced.store(0, Ordering::Relaxed);
        self.inserts.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        self.invalidations.store(0, Ordering::Relaxed);
        self.flushes.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for stats.
    use super::*;

    /// Validates `MemoStats::default` behavior for the stats default scenario.
    ///
    /// Assertions:
    /// - Confirms `stats.size` equals `0`.
    /// - Ensures `stats.max_entries.is_none()` evaluates to true.
    /// - Confirms `stats.hits` equals `0`.
    /// - Confirms `stats.misses` equals `0`.
    /// - Confirms `stats.coalesced` equals `0`.
    /// - Confirms `stats.flushes` equals `0`.
    #[test]
    fn test_memo_stats_default() {
        let stats = MemoStats::default();
        assert_eq!(stats.size, 0);
        assert!(stats.max_entries.is_none());
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.coalesced, 0);
        assert_eq!(stats.flushes, 0);
    }

    /// Validates `Default::default` behavior for the hit rate calculation
    /// scenario.
    ///
    /// Assertions:
    /// - Ensures `(stats.hit_rate() - 0.8).abs() < 1e-10` evaluates to true.
    /// - Ensures `(stats.miss_rate() - 0.2).abs() < 1e-10` evaluates to true.
    /// - Confirms `stats.total_calls()` equals `100`.
    #[test]
    fn test_hit_rate_calculation() {
        let stats = MemoStats { hits: 80, misses: 20, ..Default::default() };

        assert!((stats.hit_rate() - 0.8).abs() < 1e-10);
        assert!((stats.miss_rate() - 0.2).abs() < 1e-10);
        assert_eq!(stats.total_calls(), 100);
    }

    /// Validates `MemoStats::default` behavior for the hit rate no calls
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `stats.hit_rate()` equals `0.0`.
    /// - Confirms `stats.miss_rate()` equals `1.0`.
    /// - Confirms `stats.total_calls()` equals `0`.
    #[test]
    fn test_hit_rate_no_calls() {
        let stats = MemoStats::default();
        assert_eq!(stats.hit_rate(), 0.0);
        assert_eq!(stats.miss_rate(), 1.0);
        assert_eq!(stats.total_calls(), 0);
    }

    /// Validates `Default::default` behavior for the fill percentage scenario.
    ///
    /// Assertions:
    /// - Confirms `stats.fill_percentage()` equals `Some(0.5)`.
    #[test]
    fn test_fill_percentage() {
        let stats = MemoStats { size: 50, max_entries: Some(100), ..Default::default() };

        assert_eq!(stats.fill_percentage(), Some(0.5));
    }

    /// Validates `Default::default` behavior for the fill percentage no limit
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `stats.fill_percentage()` equals `None`.
    #[test]
    fn test_fill_percentage_no_limit() {
        let stats = MemoStats { size: 50, max_entries: None, ..Default::default() };

        assert_eq!(stats.fill_percentage(), None);
    }

    /// Validates `MetricsCollector::new` behavior for the collector record
    /// operations scenario.
    ///
    /// Assertions:
    /// - Confirms `stats.hits` equals `1`.
    /// - Confirms `stats.misses` equals `1`.
    /// - Confirms `stats.coalesced` equals `1`.
    /// - Confirms `stats.inserts` equals `1`.
    /// - Confirms `stats.evictions` equals `1`.
    /// - Confirms `stats.invalidations` equals `1`.
    /// - Confirms `stats.flushes` equals `1`.
    /// - Confirms `stats.size` equals `5`.
    /// - Confirms `stats.max_entries` equals `Some(10)`.
    #[test]
    fn test_metrics_collector_record_operations() {
        let collector = MetricsCollector::new();

        collector.record_hit();
        collector.record_miss();
        collector.record_coalesced();
        collector.record_insert();
        collector.record_eviction();
        collector.record_invalidation();
        collector.record_flush();

        let stats = collector.snapshot(5, Some(10));

        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.coalesced, 1);
        assert_eq!(stats.inserts, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.invalidations, 1);
        assert_eq!(stats.flushes, 1);
        assert_eq!(stats.size, 5);
        assert_eq!(stats.max_entries, Some(10));
    }

    /// Validates `MetricsCollector::reset` behavior for the collector reset
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `stats_before.hits` equals `1`.
    /// - Confirms `stats_after.hits` equals `0`.
    /// - Confirms `stats_after.misses` equals `0`.
    #[test]
    fn test_metrics_collector_reset() {
        let collector = MetricsCollector::new();

        collector.record_hit();
        collector.record_miss();

        let stats_before = collector.snapshot(0, None);
        assert_eq!(stats_before.hits, 1);

        collector.reset();

        let stats_after = collector.snapshot(0, None);
        assert_eq!(stats_after.hits, 0);
        assert_eq!(stats_after.misses, 0);
    }

    /// Validates `MetricsCollector::clone` behavior for the shared counters
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `stats1.hits` equals `2`.
    /// - Confirms `stats2.hits` equals `2`.
    #[test]
    fn test_metrics_collector_clone() {
        let collector1 = MetricsCollector::new();
        collector1.record_hit();

        let collector2 = collector1.clone();
        collector2.record_hit();

        // Both should see the same counts (shared Arc)
        let stats1 = collector1.snapshot(0, None);
        let stats2 = collector2.snapshot(0, None);

        assert_eq!(stats1.hits, 2);
        assert_eq!(stats2.hits, 2);
    }

    /// Validates `Arc::new` behavior for the metrics collector thread safety
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `stats.hits` equals `1000`.
    #[test]
    fn test_metrics_collector_thread_safety() {
        use std::thread;

        let collector = Arc::new(MetricsCollector::new());
        let mut handles = vec![];

        // Spawn 10 threads, each recording 100 hits
        for _ in 0..10 {
            let collector_clone = Arc::clone(&collector);
            let handle = thread::spawn(move || {
                for _ in 0..100 {
                    collector_clone.record_hit();
                }
            });
            handles.push(handle);
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let stats = collector.snapshot(0, None);
        assert_eq!(stats.hits, 1000);
    }
}
