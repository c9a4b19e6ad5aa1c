use std::path::Path;

use tracing::debug;

use crate::error::{EngineResult, MapstreamError, Result};
use crate::engine::{BatchEngine, Hit, IndexOptions, SequentialEngine};

/// Which engine variant the process managed to acquire at startup.
///
/// The choice is made once by [`EngineProbe::acquire`] and never revisited:
/// a mapper constructed from a probe keeps the same backend for its whole
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineCapability {
    /// Blocking call-and-return engine, no internal concurrency.
    Sequential,
    /// Batch-submit/batch-drain engine with a worker pool.
    Concurrent,
}

impl EngineCapability {
    /// Whether this variant supports true concurrency.
    pub fn multithreaded(&self) -> bool {
        matches!(self, EngineCapability::Concurrent)
    }
}

/// Locates engine implementations and opens index handles on them.
///
/// This is implemented by the **integration** shipping an engine binding,
/// not by mapper callers. Availability probes must be side-effect free; the
/// open methods return engine-native errors, which the core wraps into
/// [`MapstreamError::IndexLoad`](crate::MapstreamError::IndexLoad).
pub trait EngineLoader {
    type Sequential: SequentialEngine;
    type Concurrent: BatchEngine;

    /// Whether the batch-capable variant can be acquired.
    fn has_concurrent(&self) -> bool;

    /// Whether the blocking variant can be acquired.
    fn has_sequential(&self) -> bool;

    /// Open an index handle on the batch-capable variant.
    fn open_concurrent(
        &self,
        index: &Path,
        options: &IndexOptions,
    ) -> EngineResult<Self::Concurrent>;

    /// Open an index handle on the blocking variant.
    fn open_sequential(
        &self,
        index: &Path,
        options: &IndexOptions,
    ) -> EngineResult<Self::Sequential>;
}

/// Startup probe that fixes the engine capability for the process lifetime.
///
/// Acquisition prefers the concurrent variant, falls back to the sequential
/// one, and fails with [`MapstreamError::BackendUnavailable`] when neither is
/// present. There is no retry and no degraded mode; absence is terminal.
///
/// # Examples
///
/// ```rust,no_run
/// use mapstream::{EngineProbe, ExactLoader};
///
/// # fn main() -> mapstream::Result<()> {
/// let probe = EngineProbe::acquire(ExactLoader::new())?;
/// assert!(probe.capability().multithreaded());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct EngineProbe<L> {
    loader: L,
    capability: EngineCapability,
}

impl<L: EngineLoader> EngineProbe<L> {
    /// Probe the loader once and fix the capability.
    pub fn acquire(loader: L) -> Result<Self> {
        let capability = if loader.has_concurrent() {
            EngineCapability::Concurrent
        } else if loader.has_sequential() {
            EngineCapability::Sequential
        } else {
            return Err(MapstreamError::BackendUnavailable);
        };
        debug!(?capability, "alignment engine acquired");
        Ok(Self { loader, capability })
    }

    /// The capability fixed at acquisition. Repeatable, no side effects.
    pub fn capability(&self) -> EngineCapability {
        self.capability
    }

    /// The loader this probe acquired.
    pub fn loader(&self) -> &L {
        &self.loader
    }
}

/// Placeholder engine for loaders that ship only one variant.
///
/// Uninhabited: it can never be constructed, so its trait methods are
/// unreachable by construction. A sequential-only loader sets
/// `type Concurrent = NoEngine` and reports `has_concurrent() == false`.
#[derive(Debug)]
pub enum NoEngine {}

impl SequentialEngine for NoEngine {
    fn initialised(&self) -> bool {
        match *self {}
    }

    fn map(&self, _sequence: &[u8]) -> EngineResult<Vec<Hit>> {
        match *self {}
    }
}

impl BatchEngine for NoEngine {
    fn initialised(&self) -> bool {
        match *self {}
    }

    fn enable_threading(&mut self, _threads: usize) -> EngineResult<()> {
        match *self {}
    }

    fn map_batch<T: Send + 'static>(
        &self,
        _submissions: crate::engine::SubmissionStream<T>,
    ) -> EngineResult<crate::engine::CompletionStream<T>> {
        match *self {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockLoader;

    #[test]
    fn test_probe_prefers_concurrent() {
        let probe = EngineProbe::acquire(MockLoader::both()).unwrap();
        assert_eq!(probe.capability(), EngineCapability::Concurrent);
        assert!(probe.capability().multithreaded());
    }

    #[test]
    fn test_probe_falls_back_to_sequential() {
        let probe = EngineProbe::acquire(MockLoader::sequential_only()).unwrap();
        assert_eq!(probe.capability(), EngineCapability::Sequential);
        assert!(!probe.capability().multithreaded());
    }

    #[test]
    fn test_probe_fails_when_nothing_available() {
        let err = EngineProbe::acquire(MockLoader::none()).unwrap_err();
        assert!(matches!(err, MapstreamError::BackendUnavailable));
    }

    #[test]
    fn test_capability_query_is_idempotent() {
        let probe = EngineProbe::acquire(MockLoader::both()).unwrap();
        let first = probe.capability();
        for _ in 0..3 {
            assert_eq!(probe.capability(), first);
        }
    }
}
