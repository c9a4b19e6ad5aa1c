use crate::engine::{BatchEngine, Completion, CompletionStream, Submission};
use crate::error::{MapstreamError, Result};
use crate::stats::MapStats;
use crate::stream::MappedRead;

/// Submission stage: lazily turns records into engine work items.
///
/// The metadata/payload pair rides through the engine as the submission tag,
/// so correlation survives out-of-order completion without any bookkeeping
/// on this side. Records with an empty derived sequence are filtered here
/// and never reach the engine.
pub(crate) struct SubmitStage<I, F> {
    records: I,
    extract: F,
    stats: MapStats,
}

impl<I, F, M, D> Iterator for SubmitStage<I, F>
where
    I: Iterator<Item = (M, D)>,
    F: Fn(&D) -> Vec<u8>,
{
    type Item = Submission<(M, D)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (metadata, data) = self.records.next()?;
            self.stats.add_seen();
            let sequence = (self.extract)(&data);
            if sequence.is_empty() {
                self.stats.add_skipped();
                continue;
            }
            return Some(Submission {
                sequence,
                tag: (metadata, data),
            });
        }
    }
}

/// Drain stage: adapter over the batch engine's completion stream.
///
/// Yields tuples in whatever order the engine completes them; no
/// resequencing. The first engine failure is yielded once and ends the
/// stream; tuples already yielded stay valid.
pub struct BatchedReadMap<M, D> {
    drain: CompletionStream<(M, D)>,
    stats: MapStats,
    done: bool,
}

impl<M, D> BatchedReadMap<M, D>
where
    M: Send + 'static,
    D: Send + 'static,
{
    /// Filter-and-submit `records` to the engine, returning the drain.
    ///
    /// The submission stream is handed over lazily; how far it runs ahead of
    /// the drain is bounded by the engine's internal queues, not by input
    /// size.
    pub(crate) fn start<E, I, F>(
        engine: &E,
        records: I,
        extract: F,
        stats: MapStats,
    ) -> Result<Self>
    where
        E: BatchEngine,
        I: Iterator<Item = (M, D)> + Send + 'static,
        F: Fn(&D) -> Vec<u8> + Send + 'static,
    {
        let stage = SubmitStage {
            records,
            extract,
            stats: stats.clone(),
        };
        let drain = engine
            .map_batch(Box::new(stage))
            .map_err(MapstreamError::Engine)?;
        Ok(Self {
            drain,
            stats,
            done: false,
        })
    }
}

impl<M, D> Iterator for BatchedReadMap<M, D> {
    type Item = Result<MappedRead<M, D>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.drain.next()? {
            Ok(Completion {
                hits,
                tag: (metadata, data),
            }) => {
                self.stats.add_mapped();
                Some(Ok(MappedRead {
                    metadata,
                    data,
                    hits,
                }))
            }
            Err(source) => {
                self.done = true;
                Some(Err(MapstreamError::Engine(source)))
            }
        }
    }
}
