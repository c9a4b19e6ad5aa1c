use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared counters observed while a mapping stream is consumed.
///
/// Cloning is cheap and every clone views the same counters, so a handle
/// taken before [`map_reads`](crate::StreamingMapper::map_reads) reflects
/// progress while the returned stream is drained. Counts are cumulative over
/// the lifetime of the mapper that owns them.
#[derive(Debug, Clone, Default)]
pub struct MapStats {
    inner: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    seen: AtomicU64,
    skipped: AtomicU64,
    mapped: AtomicU64,
}

impl MapStats {
    /// Records pulled from the upstream source.
    pub fn seen(&self) -> u64 {
        self.inner.seen.load(Ordering::Relaxed)
    }

    /// Records dropped because their derived sequence was empty.
    ///
    /// Skips are a filtering rule, not failures; they never appear on the
    /// error channel.
    pub fn skipped(&self) -> u64 {
        self.inner.skipped.load(Ordering::Relaxed)
    }

    /// Result tuples yielded to the caller.
    pub fn mapped(&self) -> u64 {
        self.inner.mapped.load(Ordering::Relaxed)
    }

    pub(crate) fn add_seen(&self) {
        self.inner.seen.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_skipped(&self) {
        self.inner.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_mapped(&self) {
        self.inner.mapped.fetch_add(1, Ordering::Relaxed);
    }
}
