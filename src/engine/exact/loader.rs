use std::path::Path;

use crate::engine::exact::{ExactBatchEngine, ExactEngine, ExactIndex};
use crate::engine::{EngineLoader, IndexOptions};
use crate::error::EngineResult;

/// Loader wiring the exact-match engine pair into the capability probe.
///
/// Both variants ship with the crate, so the default loader always reports
/// the concurrent one; [`sequential_only`](ExactLoader::sequential_only)
/// restricts availability to the blocking variant, which is how deployments
/// without the batch engine are modelled (and tested).
#[derive(Debug, Clone)]
pub struct ExactLoader {
    concurrent: bool,
}

impl ExactLoader {
    pub fn new() -> Self {
        Self { concurrent: true }
    }

    /// A loader that only offers the blocking variant.
    pub fn sequential_only() -> Self {
        Self { concurrent: false }
    }
}

impl Default for ExactLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineLoader for ExactLoader {
    type Sequential = ExactEngine;
    type Concurrent = ExactBatchEngine;

    fn has_concurrent(&self) -> bool {
        self.concurrent
    }

    fn has_sequential(&self) -> bool {
        true
    }

    fn open_concurrent(
        &self,
        index: &Path,
        options: &IndexOptions,
    ) -> EngineResult<Self::Concurrent> {
        let index = ExactIndex::from_path(index, options)?;
        Ok(ExactBatchEngine::new(index))
    }

    fn open_sequential(
        &self,
        index: &Path,
        options: &IndexOptions,
    ) -> EngineResult<Self::Sequential> {
        let index = ExactIndex::from_path(index, options)?;
        Ok(ExactEngine::new(index))
    }
}
