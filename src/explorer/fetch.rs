//! Dataset fetch coordination and the generation tokens used to discard
//! results that arrive after they were superseded.

use std::sync::Arc;
use tracing::debug;

use crate::error::ExplorerError;
use crate::graph::GraphDataset;

/// Token captured when an asynchronous operation starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Monotonic source of `Generation` tokens.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    current: u64,
}

impl GenerationCounter {
    /// Start a new cycle; every previously issued token becomes stale.
    pub fn advance(&mut self) -> Generation {
        self.current += 1;
        Generation(self.current)
    }

    pub fn current(&self) -> Generation {
        Generation(self.current)
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.current
    }
}

/// Observable dataset state. Exactly one variant holds at a time.
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready(Arc<GraphDataset>),
    Failed(ExplorerError),
}

impl LoadState {
    pub fn dataset(&self) -> Option<&Arc<GraphDataset>> {
        match self {
            LoadState::Ready(dataset) => Some(dataset),
            _ => None,
        }
    }
}

/// Owns the current fetch generation and the dataset tri-state.
#[derive(Debug, Default)]
pub struct FetchCoordinator {
    generation: GenerationCounter,
    state: LoadState,
}

impl FetchCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn dataset(&self) -> Option<&Arc<GraphDataset>> {
        self.state.dataset()
    }

    /// Begin a fetch cycle: new generation, `Loading`, prior error cleared.
    pub fn begin_load(&mut self) -> Generation {
        let generation = self.generation.advance();
        self.state = LoadState::Loading;
        debug!("Dataset load started (generation {})", generation.value());
        generation
    }

    /// Publish a fetched dataset if `generation` is still current.
    ///
    /// Returns the published dataset, or `None` when the result was stale.
    pub fn on_success(
        &mut self,
        generation: Generation,
        dataset: GraphDataset,
    ) -> Option<Arc<GraphDataset>> {
        if !self.generation.is_current(generation) {
            debug!(
                "Discarding dataset from superseded generation {} (current {})",
                generation.value(),
                self.generation.current().value()
            );
            return None;
        }
        let dataset = Arc::new(dataset);
        self.state = LoadState::Ready(Arc::clone(&dataset));
        Some(dataset)
    }

    /// Record a failure if `generation` is still current. Returns whether it was applied.
    pub fn on_failure(&mut self, generation: Generation, error: ExplorerError) -> bool {
        if !self.generation.is_current(generation) {
            debug!(
                "Discarding failure from superseded generation {}: {}",
                generation.value(),
                error
            );
            return false;
        }
        self.state = LoadState::Failed(error);
        true
    }

    /// Teardown: make every in-flight result stale and return to `Idle`.
    pub fn invalidate(&mut self) {
        self.generation.advance();
        self.state = LoadState::Idle;
    }
}
