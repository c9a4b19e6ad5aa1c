//! The engine boundary: traits for the two aligner variants, the work-item
//! types that cross it, and the built-in exact-match reference engine.
//!
//! Mapping itself is an opaque capability. The core only knows how to hand a
//! derived sequence to an engine and how to get a hit list back, either one
//! blocking call at a time ([`SequentialEngine`]) or through a
//! submit-then-drain pipeline ([`BatchEngine`]).

mod capability;
mod exact;
mod hit;
mod options;

#[cfg(test)]
pub(crate) mod mock;

pub use capability::{EngineCapability, EngineLoader, EngineProbe, NoEngine};
pub use exact::{ExactBatchEngine, ExactEngine, ExactError, ExactIndex, ExactLoader};
pub use hit::{Hit, Strand};
pub use options::{IndexOptions, OptionValue};

use crate::error::EngineResult;

/// One unit of work submitted to a batch engine.
///
/// The `tag` is an opaque passenger: the engine must hand back exactly the
/// value it received, attached to the matching [`Completion`], and must never
/// inspect or re-derive it. This is how caller metadata survives a pool that
/// completes work out of submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission<T> {
    /// Derived sequence to map. Never empty; empty extractions are filtered
    /// out before submission.
    pub sequence: Vec<u8>,
    /// Opaque passenger returned untouched with the completion.
    pub tag: T,
}

/// One finished unit of work drained from a batch engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion<T> {
    /// Hits the engine produced for the submitted sequence.
    pub hits: Vec<Hit>,
    /// The passenger from the matching [`Submission`].
    pub tag: T,
}

/// Lazy stream of submissions handed to a batch engine.
///
/// Engines pull from this on their own schedule, possibly from their own
/// threads; they must not materialize it up front, so that memory stays
/// bounded by the engine's pipeline depth rather than total input size.
pub type SubmissionStream<T> = Box<dyn Iterator<Item = Submission<T>> + Send>;

/// Lazy stream of completions drained from a batch engine.
///
/// Finite, but of length unknown to the consumer; it ends when every
/// submitted item has completed exactly once. Order is engine-defined.
pub type CompletionStream<T> = Box<dyn Iterator<Item = EngineResult<Completion<T>>> + Send>;

/// The blocking, call-and-return engine variant.
///
/// This is implemented by the **engine**, not by the caller; the caller side
/// of the contract lives in [`StreamingMapper`](crate::StreamingMapper).
pub trait SequentialEngine {
    /// Whether the index behind this engine is usable. Repeatable, no side
    /// effects.
    fn initialised(&self) -> bool;

    /// Map one sequence against the reference, blocking until the hit list
    /// is ready.
    fn map(&self, sequence: &[u8]) -> EngineResult<Vec<Hit>>;
}

/// The batch-submit/batch-drain engine variant with an internal worker pool.
///
/// Flow control is entirely the engine's responsibility: its queues decide
/// how far submission may run ahead of completion.
pub trait BatchEngine {
    /// Whether the index behind this engine is usable. Repeatable, no side
    /// effects.
    fn initialised(&self) -> bool;

    /// Set the worker-pool size. Engines may clamp or reject the request;
    /// a rejection surfaces to callers as an engine failure.
    fn enable_threading(&mut self, threads: usize) -> EngineResult<()>;

    /// Submit a lazy stream of work and return the completion stream.
    ///
    /// Every submission completes exactly once; completion order carries no
    /// relationship to submission order.
    fn map_batch<T: Send + 'static>(
        &self,
        submissions: SubmissionStream<T>,
    ) -> EngineResult<CompletionStream<T>>;
}
