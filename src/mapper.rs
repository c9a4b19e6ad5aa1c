//! The public mapping façade.
//!
//! [`StreamingMapper`] hides which engine variant the process acquired:
//! callers hand it a lazy source of `(metadata, data)` records and a
//! sequence-extraction closure, and consume one uniform lazy stream of
//! [`MappedRead`](crate::MappedRead) tuples whichever protocol runs
//! underneath.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::engine::{
    BatchEngine, EngineCapability, EngineLoader, EngineProbe, ExactBatchEngine, ExactEngine,
    ExactLoader, IndexOptions, SequentialEngine,
};
use crate::error::{MapstreamError, Result};
use crate::stats::MapStats;
use crate::stream::{BatchedReadMap, ReadMap, SequentialReadMap};

/// The sealed pair of engine variants behind one handle.
#[derive(Debug)]
enum Backend<S, C> {
    Sequential(S),
    Concurrent(C),
}

/// Owns the engine's index handle and the threading configuration rules.
///
/// The backend variant is decided by the capability fixed at probe time and
/// never changes for the lifetime of the handle.
#[derive(Debug)]
pub struct AlignerHandle<S, C> {
    backend: Backend<S, C>,
    index: PathBuf,
    threads_set: bool,
    mapping_started: bool,
}

impl<S, C> AlignerHandle<S, C>
where
    S: SequentialEngine,
    C: BatchEngine,
{
    /// Open an index handle on the engine variant dictated by `capability`.
    ///
    /// On the concurrent variant a worker pool of size 1 is enabled up
    /// front; callers may still reconfigure it once via
    /// [`enable_threading`](AlignerHandle::enable_threading) before mapping
    /// starts.
    pub fn open<L>(
        loader: &L,
        capability: EngineCapability,
        index: &Path,
        options: &IndexOptions,
    ) -> Result<Self>
    where
        L: EngineLoader<Sequential = S, Concurrent = C>,
    {
        let backend = match capability {
            EngineCapability::Concurrent => {
                let mut engine =
                    loader
                        .open_concurrent(index, options)
                        .map_err(|source| MapstreamError::IndexLoad {
                            path: index.to_path_buf(),
                            source,
                        })?;
                engine.enable_threading(1).map_err(MapstreamError::Engine)?;
                Backend::Concurrent(engine)
            }
            EngineCapability::Sequential => {
                let engine =
                    loader
                        .open_sequential(index, options)
                        .map_err(|source| MapstreamError::IndexLoad {
                            path: index.to_path_buf(),
                            source,
                        })?;
                Backend::Sequential(engine)
            }
        };
        debug!(index = %index.display(), ?capability, "aligner handle ready");
        Ok(Self {
            backend,
            index: index.to_path_buf(),
            threads_set: false,
            mapping_started: false,
        })
    }

    /// Path the index was loaded from.
    pub fn index(&self) -> &Path {
        &self.index
    }

    /// Whether the engine reports its index as usable. Repeatable, no side
    /// effects, and never goes false once true.
    pub fn initialised(&self) -> bool {
        match &self.backend {
            Backend::Sequential(engine) => engine.initialised(),
            Backend::Concurrent(engine) => engine.initialised(),
        }
    }

    /// Whether the backend has a configurable worker pool.
    pub fn supports_threading(&self) -> bool {
        matches!(self.backend, Backend::Concurrent(_))
    }

    /// Set the worker-pool size.
    ///
    /// Allowed at most once, before the first mapping call, and only on the
    /// concurrent backend; every other case fails with
    /// [`MapstreamError::Unsupported`] and leaves the handle usable.
    pub fn enable_threading(&mut self, threads: usize) -> Result<()> {
        match &mut self.backend {
            Backend::Sequential(_) => Err(MapstreamError::Unsupported {
                reason: "sequential backend has no worker pool",
            }),
            Backend::Concurrent(engine) => {
                if self.mapping_started {
                    return Err(MapstreamError::Unsupported {
                        reason: "thread pool is locked once mapping has started",
                    });
                }
                if self.threads_set {
                    return Err(MapstreamError::Unsupported {
                        reason: "thread pool may only be configured once",
                    });
                }
                engine.enable_threading(threads).map_err(MapstreamError::Engine)?;
                self.threads_set = true;
                debug!(threads, "worker pool configured");
                Ok(())
            }
        }
    }
}

/// Streaming mapper over whichever engine variant the probe acquired.
///
/// Construction loads the index; from then on
/// [`map_reads`](StreamingMapper::map_reads) may be called any number of
/// times. The backend choice is fixed for the mapper's lifetime. A mapper
/// owns its engine handle exclusively; the `&mut self` receiver on
/// `map_reads` is what rules out two simultaneous mapping calls on one
/// instance, while distinct instances stay fully independent.
///
/// # Examples
///
/// ```rust,no_run
/// use mapstream::{IndexOptions, StreamingMapper};
///
/// # fn main() -> mapstream::Result<()> {
/// let mut mapper = StreamingMapper::open("ref.fa", IndexOptions::new())?;
/// assert!(mapper.initialised());
///
/// let reads = vec![
///     ("read-1", b"ACGTACGT".to_vec()),
///     ("read-2", Vec::new()), // empty extraction: silently dropped
/// ];
/// for result in mapper.map_reads(reads, |data| data.clone())? {
///     let mapped = result?;
///     println!("{}\t{} hits", mapped.metadata, mapped.hits.len());
/// }
/// println!("skipped {}", mapper.stats().skipped());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct StreamingMapper<S, C> {
    handle: AlignerHandle<S, C>,
    stats: MapStats,
}

impl StreamingMapper<ExactEngine, ExactBatchEngine> {
    /// Construct over the built-in exact-match engine.
    ///
    /// Probes the built-in loader and loads `index` with `options`
    /// forwarded verbatim to the engine.
    pub fn open(index: impl AsRef<Path>, options: IndexOptions) -> Result<Self> {
        let probe = EngineProbe::acquire(ExactLoader::new())?;
        Self::new(&probe, index, options)
    }
}

impl<S, C> StreamingMapper<S, C>
where
    S: SequentialEngine,
    C: BatchEngine,
{
    /// Construct from a startup probe and an index path.
    ///
    /// Fails with [`MapstreamError::IndexLoad`] when the engine rejects the
    /// path or options; no partially constructed mapper is ever returned.
    pub fn new<L>(
        probe: &EngineProbe<L>,
        index: impl AsRef<Path>,
        options: IndexOptions,
    ) -> Result<Self>
    where
        L: EngineLoader<Sequential = S, Concurrent = C>,
    {
        let handle = AlignerHandle::open(
            probe.loader(),
            probe.capability(),
            index.as_ref(),
            &options,
        )?;
        Ok(Self {
            handle,
            stats: MapStats::default(),
        })
    }

    /// Map a lazy stream of `(metadata, data)` records.
    ///
    /// `extract` derives the sequence submitted to the engine from each
    /// record's data; it must be pure, and an empty return value marks the
    /// record for silent exclusion (no tuple, no engine submission, not an
    /// error). The returned stream is lazy and single-pass: the sequential
    /// backend yields in input order with one record in flight, the batched
    /// backend in engine completion order.
    ///
    /// The `Send + 'static` bounds exist because the batch engine pulls
    /// submissions from its own threads; the sequential backend shares the
    /// same signature.
    pub fn map_reads<I, F, M, D>(
        &mut self,
        records: I,
        extract: F,
    ) -> Result<ReadMap<'_, S, I::IntoIter, F, M, D>>
    where
        I: IntoIterator<Item = (M, D)>,
        I::IntoIter: Send + 'static,
        F: Fn(&D) -> Vec<u8> + Send + 'static,
        M: Send + 'static,
        D: Send + 'static,
    {
        self.handle.mapping_started = true;
        let stats = self.stats.clone();
        match &self.handle.backend {
            Backend::Sequential(engine) => Ok(ReadMap::Sequential(SequentialReadMap::new(
                engine,
                records.into_iter(),
                extract,
                stats,
            ))),
            Backend::Concurrent(engine) => Ok(ReadMap::Batched(BatchedReadMap::start(
                engine,
                records.into_iter(),
                extract,
                stats,
            )?)),
        }
    }

    /// Set the batch engine's worker-pool size; see
    /// [`AlignerHandle::enable_threading`] for the rules.
    pub fn enable_threading(&mut self, threads: usize) -> Result<()> {
        self.handle.enable_threading(threads)
    }

    /// Whether the backend supports true concurrency. Repeatable, no side
    /// effects.
    pub fn has_multithreading(&self) -> bool {
        self.handle.supports_threading()
    }

    /// Whether the underlying index is usable. Repeatable, no side effects.
    pub fn initialised(&self) -> bool {
        self.handle.initialised()
    }

    /// Counters for records seen, skipped, and mapped across this mapper's
    /// lifetime. The returned handle stays live while streams are consumed.
    pub fn stats(&self) -> MapStats {
        self.stats.clone()
    }

    /// The engine-owning handle behind this mapper.
    pub fn handle(&self) -> &AlignerHandle<S, C> {
        &self.handle
    }
}
