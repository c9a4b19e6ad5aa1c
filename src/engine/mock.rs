//! Deterministic stub engines for exercising the streaming layer without a
//! real reference.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::engine::{
    BatchEngine, Completion, CompletionStream, EngineLoader, Hit, IndexOptions, SequentialEngine,
    Strand, SubmissionStream,
};
use crate::error::EngineResult;

/// A hit whose target is named after the sequence that produced it, so tests
/// can check that metadata stayed attached to the right sequence.
pub(crate) fn hit_for(sequence: &[u8]) -> Hit {
    Hit {
        target_name: String::from_utf8_lossy(sequence).into_owned(),
        target_len: sequence.len() * 2,
        target_start: 0,
        target_end: sequence.len(),
        query_start: 0,
        query_end: sequence.len(),
        strand: Strand::Forward,
        mapq: 60,
    }
}

/// Blocking stub: echoes each sequence back as a single hit.
#[derive(Debug)]
pub(crate) struct EchoEngine {
    fail_on: Option<Vec<u8>>,
    calls: Arc<AtomicUsize>,
}

impl EchoEngine {
    pub(crate) fn new() -> Self {
        Self {
            fail_on: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fail the call that submits exactly this sequence.
    pub(crate) fn fail_on(mut self, sequence: &[u8]) -> Self {
        self.fail_on = Some(sequence.to_vec());
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl SequentialEngine for EchoEngine {
    fn initialised(&self) -> bool {
        true
    }

    fn map(&self, sequence: &[u8]) -> EngineResult<Vec<Hit>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_on.as_deref() == Some(sequence) {
            return Err("injected engine failure".into());
        }
        Ok(vec![hit_for(sequence)])
    }
}

/// Batch stub: completes lazily on the drain side, optionally swapping each
/// adjacent pair of completions to simulate an out-of-order pool.
#[derive(Debug)]
pub(crate) struct EchoBatchEngine {
    fail_on: Option<Vec<u8>>,
    shuffle: bool,
    submissions: Arc<AtomicUsize>,
}

impl EchoBatchEngine {
    pub(crate) fn new() -> Self {
        Self {
            fail_on: None,
            shuffle: false,
            submissions: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn fail_on(mut self, sequence: &[u8]) -> Self {
        self.fail_on = Some(sequence.to_vec());
        self
    }

    /// Yield completions pairwise swapped: 2nd, 1st, 4th, 3rd, ...
    pub(crate) fn shuffle_pairs(mut self) -> Self {
        self.shuffle = true;
        self
    }

    pub(crate) fn submissions(&self) -> usize {
        self.submissions.load(Ordering::Relaxed)
    }
}

impl BatchEngine for EchoBatchEngine {
    fn initialised(&self) -> bool {
        true
    }

    fn enable_threading(&mut self, threads: usize) -> EngineResult<()> {
        if threads == 0 {
            return Err("worker pool size must be at least 1".into());
        }
        Ok(())
    }

    fn map_batch<T: Send + 'static>(
        &self,
        submissions: SubmissionStream<T>,
    ) -> EngineResult<CompletionStream<T>> {
        Ok(Box::new(EchoDrain {
            inner: submissions,
            fail_on: self.fail_on.clone(),
            shuffle: self.shuffle,
            pending: None,
            submissions: Arc::clone(&self.submissions),
        }))
    }
}

struct EchoDrain<T> {
    inner: SubmissionStream<T>,
    fail_on: Option<Vec<u8>>,
    shuffle: bool,
    pending: Option<EngineResult<Completion<T>>>,
    submissions: Arc<AtomicUsize>,
}

impl<T> EchoDrain<T> {
    fn complete_next(&mut self) -> Option<EngineResult<Completion<T>>> {
        let submission = self.inner.next()?;
        self.submissions.fetch_add(1, Ordering::Relaxed);
        if self.fail_on.as_deref() == Some(submission.sequence.as_slice()) {
            return Some(Err("injected batch failure".into()));
        }
        Some(Ok(Completion {
            hits: vec![hit_for(&submission.sequence)],
            tag: submission.tag,
        }))
    }
}

impl<T> Iterator for EchoDrain<T> {
    type Item = EngineResult<Completion<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(held) = self.pending.take() {
            return Some(held);
        }
        let first = self.complete_next()?;
        if !self.shuffle {
            return Some(first);
        }
        match self.complete_next() {
            None => Some(first),
            Some(second) => {
                self.pending = Some(first);
                Some(second)
            }
        }
    }
}

/// Loader over the stub engines with configurable availability.
#[derive(Debug)]
pub(crate) struct MockLoader {
    sequential: bool,
    concurrent: bool,
    fail_open: bool,
    fail_on: Option<Vec<u8>>,
    shuffle: bool,
}

impl MockLoader {
    pub(crate) fn both() -> Self {
        Self {
            sequential: true,
            concurrent: true,
            fail_open: false,
            fail_on: None,
            shuffle: false,
        }
    }

    pub(crate) fn sequential_only() -> Self {
        Self {
            concurrent: false,
            ..Self::both()
        }
    }

    pub(crate) fn none() -> Self {
        Self {
            sequential: false,
            concurrent: false,
            ..Self::both()
        }
    }

    /// Reject every open attempt, as an engine refusing the index would.
    pub(crate) fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub(crate) fn fail_on(mut self, sequence: &[u8]) -> Self {
        self.fail_on = Some(sequence.to_vec());
        self
    }

    pub(crate) fn shuffled(mut self) -> Self {
        self.shuffle = true;
        self
    }
}

impl EngineLoader for MockLoader {
    type Sequential = EchoEngine;
    type Concurrent = EchoBatchEngine;

    fn has_concurrent(&self) -> bool {
        self.concurrent
    }

    fn has_sequential(&self) -> bool {
        self.sequential
    }

    fn open_concurrent(
        &self,
        _index: &Path,
        _options: &IndexOptions,
    ) -> EngineResult<Self::Concurrent> {
        if self.fail_open {
            return Err("index rejected".into());
        }
        let mut engine = EchoBatchEngine::new();
        engine.fail_on = self.fail_on.clone();
        engine.shuffle = self.shuffle;
        Ok(engine)
    }

    fn open_sequential(
        &self,
        _index: &Path,
        _options: &IndexOptions,
    ) -> EngineResult<Self::Sequential> {
        if self.fail_open {
            return Err("index rejected".into());
        }
        let mut engine = EchoEngine::new();
        engine.fail_on = self.fail_on.clone();
        Ok(engine)
    }
}
