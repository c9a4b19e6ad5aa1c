//! Lazy streaming adapters over the two engine protocols.
//!
//! Both adapters expose the same item shape and the same filtering rule; the
//! difference is purely in how work reaches the engine. [`ReadMap`] is the
//! sealed union the façade hands back so callers never see which protocol
//! ran underneath.

mod batched;
mod sequential;

pub use batched::BatchedReadMap;
pub use sequential::SequentialReadMap;

use crate::engine::{Hit, SequentialEngine};
use crate::error::Result;

/// One result tuple: the original record plus the hits its derived sequence
/// produced.
///
/// `metadata` and `data` always come from the same input record that
/// produced the consumed sequence, whatever order the engine completed work
/// in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedRead<M, D> {
    pub metadata: M,
    pub data: D,
    pub hits: Vec<Hit>,
}

/// Unified lazy result stream returned by
/// [`map_reads`](crate::StreamingMapper::map_reads).
///
/// Single-pass. The sequential variant yields in input order; the batched
/// variant yields in engine completion order. Callers must not assume any
/// ordering beyond what the backend they constructed guarantees.
pub enum ReadMap<'e, E, I, F, M, D> {
    Sequential(SequentialReadMap<'e, E, I, F>),
    Batched(BatchedReadMap<M, D>),
}

impl<'e, E, I, F, M, D> Iterator for ReadMap<'e, E, I, F, M, D>
where
    E: SequentialEngine,
    I: Iterator<Item = (M, D)>,
    F: Fn(&D) -> Vec<u8>,
{
    type Item = Result<MappedRead<M, D>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            ReadMap::Sequential(stream) => stream.next(),
            ReadMap::Batched(stream) => stream.next(),
        }
    }
}
