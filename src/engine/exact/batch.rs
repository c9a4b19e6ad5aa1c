use std::sync::mpsc::sync_channel;
use std::sync::{Arc, Mutex};
use std::thread;

use tracing::debug;

use crate::engine::exact::{ExactError, ExactIndex};
use crate::engine::{BatchEngine, Completion, CompletionStream, Submission, SubmissionStream};
use crate::error::EngineResult;

/// Bounded queue depth between the submission side, the workers, and the
/// drain. Keeps memory proportional to pipeline depth, not input size.
const QUEUE_DEPTH: usize = 256;

/// Batch variant of the exact-match engine.
///
/// `map_batch` spawns a feeder thread that pulls lazily from the submission
/// stream plus a pool of scan workers. Completions arrive in whatever order
/// workers finish; the drain ends when the pool has emptied the queue.
/// Dropping the drain disconnects the channels and the whole pool unwinds.
#[derive(Debug)]
pub struct ExactBatchEngine {
    index: Arc<ExactIndex>,
    threads: usize,
}

impl ExactBatchEngine {
    pub fn new(index: ExactIndex) -> Self {
        Self {
            index: Arc::new(index),
            threads: 1,
        }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }
}

impl BatchEngine for ExactBatchEngine {
    fn initialised(&self) -> bool {
        self.index.num_targets() > 0
    }

    fn enable_threading(&mut self, threads: usize) -> EngineResult<()> {
        if threads == 0 {
            return Err(ExactError::InvalidThreads.into());
        }
        self.threads = threads.min(num_cpus::get());
        Ok(())
    }

    fn map_batch<T: Send + 'static>(
        &self,
        submissions: SubmissionStream<T>,
    ) -> EngineResult<CompletionStream<T>> {
        let (work_tx, work_rx) = sync_channel::<Submission<T>>(QUEUE_DEPTH);
        let work_rx = Arc::new(Mutex::new(work_rx));
        let (done_tx, done_rx) = sync_channel::<EngineResult<Completion<T>>>(QUEUE_DEPTH);

        debug!(threads = self.threads, "starting batch scan pool");
        for _ in 0..self.threads {
            let index = Arc::clone(&self.index);
            let work_rx = Arc::clone(&work_rx);
            let done_tx = done_tx.clone();
            thread::spawn(move || loop {
                let next = match work_rx.lock() {
                    Ok(rx) => rx.recv(),
                    Err(_) => break,
                };
                let Ok(submission) = next else { break };
                let hits = index.scan(&submission.sequence);
                let completion = Completion {
                    hits,
                    tag: submission.tag,
                };
                if done_tx.send(Ok(completion)).is_err() {
                    break;
                }
            });
        }
        drop(done_tx);

        thread::spawn(move || {
            for submission in submissions {
                if work_tx.send(submission).is_err() {
                    break;
                }
            }
        });

        Ok(Box::new(done_rx.into_iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::IndexOptions;
    use std::collections::HashSet;
    use std::io::Cursor;

    fn engine() -> ExactBatchEngine {
        let index = ExactIndex::from_reader(
            Cursor::new(b">chr1\nAAACGTAAA\nGGGG\n".to_vec()),
            &IndexOptions::new(),
        )
        .unwrap();
        ExactBatchEngine::new(index)
    }

    fn submissions(tags: &[u32]) -> SubmissionStream<u32> {
        let items: Vec<Submission<u32>> = tags
            .iter()
            .map(|tag| Submission {
                sequence: b"ACGT".to_vec(),
                tag: *tag,
            })
            .collect();
        Box::new(items.into_iter())
    }

    #[test]
    fn test_every_submission_completes_exactly_once() {
        let mut engine = engine();
        engine.enable_threading(4).unwrap();

        let tags: Vec<u32> = (0..100).collect();
        let drain = engine.map_batch(submissions(&tags)).unwrap();

        let mut seen = HashSet::new();
        for completion in drain {
            let completion = completion.unwrap();
            assert_eq!(completion.hits.len(), 1);
            assert!(seen.insert(completion.tag), "tag completed twice");
        }
        assert_eq!(seen.len(), 100);
    }

    #[test]
    fn test_empty_submission_stream_yields_empty_drain() {
        let engine = engine();
        let drain = engine.map_batch(submissions(&[])).unwrap();
        assert_eq!(drain.count(), 0);
    }

    #[test]
    fn test_tags_stay_with_their_sequences() {
        let engine = engine();
        let items: Vec<Submission<&'static str>> = vec![
            Submission {
                sequence: b"ACGT".to_vec(),
                tag: "hit",
            },
            Submission {
                sequence: b"CCCCCCCC".to_vec(),
                tag: "miss",
            },
        ];
        let drain = engine.map_batch(Box::new(items.into_iter())).unwrap();
        for completion in drain {
            let completion = completion.unwrap();
            match completion.tag {
                "hit" => assert!(!completion.hits.is_empty()),
                "miss" => assert!(completion.hits.is_empty()),
                other => panic!("unexpected tag {other}"),
            }
        }
    }

    #[test]
    fn test_abandoned_drain_does_not_hang() {
        let mut engine = engine();
        engine.enable_threading(2).unwrap();

        let tags: Vec<u32> = (0..10_000).collect();
        let mut drain = engine.map_batch(submissions(&tags)).unwrap();
        let first = drain.next().unwrap().unwrap();
        assert!(tags.contains(&first.tag));
        drop(drain);
        // Workers and feeder unwind on channel disconnect; nothing to join.
    }

    #[test]
    fn test_enable_threading_rejects_zero_and_caps() {
        let mut engine = engine();
        assert!(engine.enable_threading(0).is_err());
        engine.enable_threading(usize::MAX).unwrap();
        assert!(engine.threads() <= num_cpus::get());
        assert!(engine.threads() >= 1);
    }
}
