//! Decoder statistics.
//!
//! Counters for monitoring reception quality. All counters are atomic and
//! can be read while segments are being applied.

use std::sync::atomic::{AtomicU64, Ordering};

/// Decoder statistics and metrics.
#[derive(Debug, Default)]
pub struct DecoderStats {
    /// Object (header or body) segments pushed.
    object_segments: AtomicU64,
    /// Directory segments pushed.
    directory_segments: AtomicU64,
    /// Objects that completed reassembly.
    objects_completed: AtomicU64,
    /// Directory cycles decoded successfully.
    directories_parsed: AtomicU64,
    /// Directory payloads that reassembled but failed to decode.
    directory_failures: AtomicU64,
    /// Records evicted by obsolete sweeps.
    objects_evicted: AtomicU64,
    /// Objects whose header flagged compressed or CA-scrambled content.
    objects_unsupported: AtomicU64,
}

impl DecoderStats {
    /// Creates a zeroed stats instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_object_segment(&self) {
        self.object_segments.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_directory_segment(&self) {
        self.directory_segments.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_object_completed(&self) {
        self.objects_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_directory_parsed(&self, evicted: u64) {
        self.directories_parsed.fetch_add(1, Ordering::Relaxed);
        self.objects_evicted.fetch_add(evicted, Ordering::Relaxed);
    }

    pub(crate) fn record_directory_failure(&self) {
        self.directory_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_objects_unsupported(&self, count: u64) {
        self.objects_unsupported.fetch_add(count, Ordering::Relaxed);
    }

    /// Object segments pushed so far.
    pub fn object_segments(&self) -> u64 {
        self.object_segments.load(Ordering::Relaxed)
    }

    /// Directory segments pushed so far.
    pub fn directory_segments(&self) -> u64 {
        self.directory_segments.load(Ordering::Relaxed)
    }

    /// Objects that completed reassembly.
    pub fn objects_completed(&self) -> u64 {
        self.objects_completed.load(Ordering::Relaxed)
    }

    /// Directory cycles decoded successfully.
    pub fn directories_parsed(&self) -> u64 {
        self.directories_parsed.load(Ordering::Relaxed)
    }

    /// Directory payloads that reassembled but failed to decode.
    pub fn directory_failures(&self) -> u64 {
        self.directory_failures.load(Ordering::Relaxed)
    }

    /// Records evicted by obsolete sweeps.
    pub fn objects_evicted(&self) -> u64 {
        self.objects_evicted.load(Ordering::Relaxed)
    }

    /// Objects whose header flagged compressed or CA-scrambled content.
    pub fn objects_unsupported(&self) -> u64 {
        self.objects_unsupported.load(Ordering::Relaxed)
    }

    /// Returns a point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            object_segments: self.object_segments(),
            directory_segments: self.directory_segments(),
            objects_completed: self.objects_completed(),
            directories_parsed: self.directories_parsed(),
            directory_failures: self.directory_failures(),
            objects_evicted: self.objects_evicted(),
            objects_unsupported: self.objects_unsupported(),
        }
    }
}

/// A point-in-time snapshot of decoder statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Object segments pushed.
    pub object_segments: u64,
    /// Directory segments pushed.
    pub directory_segments: u64,
    /// Objects that completed reassembly.
    pub objects_completed: u64,
    /// Directory cycles decoded successfully.
    pub directories_parsed: u64,
    /// Directory payloads that failed to decode.
    pub directory_failures: u64,
    /// Records evicted by obsolete sweeps.
    pub objects_evicted: u64,
    /// Objects whose header flagged compressed or CA-scrambled content.
    pub objects_unsupported: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stats_are_zero() {
        let stats = DecoderStats::new();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn record_operations() {
        let stats = DecoderStats::new();
        stats.record_object_segment();
        stats.record_object_segment();
        stats.record_object_completed();
        stats.record_directory_segment();
        stats.record_directory_parsed(3);
        stats.record_directory_failure();
        stats.record_objects_unsupported(2);

        let snap = stats.snapshot();
        assert_eq!(snap.object_segments, 2);
        assert_eq!(snap.objects_completed, 1);
        assert_eq!(snap.directory_segments, 1);
        assert_eq!(snap.directories_parsed, 1);
        assert_eq!(snap.objects_evicted, 3);
        assert_eq!(snap.directory_failures, 1);
        assert_eq!(snap.objects_unsupported, 2);
    }
}
