use crate::engine::SequentialEngine;
use crate::error::{MapstreamError, Result};
use crate::stats::MapStats;
use crate::stream::MappedRead;

/// Order-preserving adapter over the blocking engine variant.
///
/// One record is in flight at a time: each `next` call pulls a record,
/// derives its sequence, skips it if empty, and otherwise blocks on a single
/// engine call before yielding. The first engine failure is yielded once and
/// ends the stream.
pub struct SequentialReadMap<'e, E, I, F> {
    engine: &'e E,
    records: I,
    extract: F,
    stats: MapStats,
    done: bool,
}

impl<'e, E, I, F> SequentialReadMap<'e, E, I, F> {
    pub(crate) fn new(engine: &'e E, records: I, extract: F, stats: MapStats) -> Self {
        Self {
            engine,
            records,
            extract,
            stats,
            done: false,
        }
    }
}

impl<'e, E, I, F, M, D> Iterator for SequentialReadMap<'e, E, I, F>
where
    E: SequentialEngine,
    I: Iterator<Item = (M, D)>,
    F: Fn(&D) -> Vec<u8>,
{
    type Item = Result<MappedRead<M, D>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let (metadata, data) = self.records.next()?;
            self.stats.add_seen();
            let sequence = (self.extract)(&data);
            if sequence.is_empty() {
                self.stats.add_skipped();
                continue;
            }
            return match self.engine.map(&sequence) {
                Ok(hits) => {
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
            };
        }
    }
}
