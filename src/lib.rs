//! # mapstream - Streaming Read-to-Reference Mapping
//!
//! `mapstream` is a Rust library that lets a real-time read-processing
//! pipeline request sequence-to-reference alignment without depending on
//! which alignment engine variant is available. Two variants exist in the
//! wild: a single-threaded, call-and-return engine and a multithreaded,
//! batch-submit/batch-drain engine. Callers get one uniform lazy stream of
//! `(metadata, data, hits)` tuples regardless of which variant backs it.
//!
//! ## Architecture
//!
//! - A startup [`EngineProbe`] fixes the [`EngineCapability`] once: prefer
//!   the concurrent engine, fall back to the sequential one, fail with
//!   [`MapstreamError::BackendUnavailable`] when neither is present.
//! - [`StreamingMapper`] loads the reference index through an
//!   [`EngineLoader`] and dispatches every
//!   [`map_reads`](StreamingMapper::map_reads) call to the backend fixed at
//!   construction.
//! - The sequential adapter blocks on one engine call per record and
//!   preserves input order. The batched adapter filters and forwards
//!   records into the engine's pool and drains completions as they arrive,
//!   in engine order; caller metadata rides through the engine as an opaque
//!   passenger, so correlation survives out-of-order completion.
//! - Records whose extracted sequence is empty are silently dropped before
//!   any engine submission; the drop is a filtering rule, never an error,
//!   and is observable through [`MapStats`].
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use mapstream::{IndexOptions, StreamingMapper};
//!
//! # fn main() -> mapstream::Result<()> {
//! let mut options = IndexOptions::new();
//! options.set("max_hits", 4i64);
//!
//! let mut mapper = StreamingMapper::open("reference.fa", options)?;
//! if mapper.has_multithreading() {
//!     mapper.enable_threading(4)?;
//! }
//!
//! let reads = vec![
//!     ("read-1".to_string(), b"ACGTACGT".to_vec()),
//!     ("read-2".to_string(), Vec::new()),
//! ];
//! for result in mapper.map_reads(reads, |data| data.clone())? {
//!     let mapped = result?;
//!     for hit in &mapped.hits {
//!         println!("{}\t{}", mapped.metadata, hit);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Engine Backends
//!
//! The engine boundary is a pair of traits: [`SequentialEngine`] for the
//! blocking variant and [`BatchEngine`] for the submit/drain variant. An
//! integration ships an [`EngineLoader`] that reports which variants it can
//! acquire and opens index handles on them; [`NoEngine`] fills the
//! associated-type slot of a variant a loader does not provide. The built-in
//! exact-match pair ([`ExactEngine`], [`ExactBatchEngine`]) is both a usable
//! default and a conformance target for custom backends:
//!
//! ```rust
//! use std::io::Cursor;
//! use mapstream::{ExactIndex, IndexOptions, Strand};
//!
//! let fasta = b">chr1\nAAACGTAAA\n";
//! let index = ExactIndex::from_reader(Cursor::new(&fasta[..]), &IndexOptions::new()).unwrap();
//!
//! let hits = index.scan(b"ACGT");
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].target_start, 2);
//! assert_eq!(hits[0].strand, Strand::Forward);
//! ```
//!
//! ## Ordering and Failure
//!
//! The sequential backend yields results in exact input order; the batched
//! backend guarantees only that every submitted record completes exactly
//! once. Engine failures terminate the in-progress stream after yielding a
//! single `Err`; tuples already yielded remain valid. See
//! [`MapstreamError`] for the full taxonomy.

mod engine;
mod error;
mod mapper;
mod stats;
mod stream;

pub use engine::{
    BatchEngine, Completion, CompletionStream, EngineCapability, EngineLoader, EngineProbe,
    ExactBatchEngine, ExactEngine, ExactError, ExactIndex, ExactLoader, Hit, IndexOptions,
    NoEngine, OptionValue, SequentialEngine, Strand, Submission, SubmissionStream,
};
pub use error::{EngineError, EngineResult, IntoMapstreamError, MapstreamError, Result};
pub use mapper::{AlignerHandle, StreamingMapper};
pub use stats::MapStats;
pub use stream::{BatchedReadMap, MappedRead, ReadMap, SequentialReadMap};
