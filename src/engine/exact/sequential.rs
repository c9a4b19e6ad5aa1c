use crate::engine::exact::ExactIndex;
use crate::engine::{Hit, SequentialEngine};
use crate::error::EngineResult;

/// Blocking variant of the exact-match engine: one scan per call.
#[derive(Debug)]
pub struct ExactEngine {
    index: ExactIndex,
}

impl ExactEngine {
    pub fn new(index: ExactIndex) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &ExactIndex {
        &self.index
    }
}

impl SequentialEngine for ExactEngine {
    fn initialised(&self) -> bool {
        self.index.num_targets() > 0
    }

    fn map(&self, sequence: &[u8]) -> EngineResult<Vec<Hit>> {
        Ok(self.index.scan(sequence))
    }
}
