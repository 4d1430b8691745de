//! The interactive graph exploration controller.
//!
//! [`GraphExplorer`] owns the fetched dataset, the live rendering engine, the
//! selection state and the search flow. It is driven from a single task:
//! state lives in a `RefCell` that is never borrowed across an `.await`, and
//! every asynchronous result is checked against a generation token before it
//! is applied, so late completions (after a newer reload or search, or after
//! teardown) are dropped instead of overwriting newer state.

pub mod engine;
pub mod fetch;
pub mod layout;
pub mod lifecycle;
pub mod results;
pub mod search;
pub mod selection;

#[cfg(test)]
pub(crate) mod testing;

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::GraphService;
use crate::config::{EdgeTapPolicy, ExplorerConfig, SearchMode};
use crate::error::{ExplorerError, Result};
use crate::graph::{DatasetSummary, GraphDataset};

pub use engine::{
    ContainerId, EngineFactory, Interaction, InteractionKind, InteractionSink, RenderEngine,
};
pub use fetch::{FetchCoordinator, Generation, GenerationCounter, LoadState};
pub use layout::{ForceLayoutEngine, ForceLayoutFactory};
pub use lifecycle::VisualizationManager;
pub use results::{ResultsPage, load_results};
pub use search::{RecommendationPanel, Route, SearchOutcome, parse_user_id};
pub use selection::{SelectionMachine, SelectionState};

/// How an asynchronous command ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<T> {
    /// The result was current and has been applied.
    Applied(T),
    /// A newer command (or teardown) superseded this one; nothing changed.
    Superseded,
}

impl<T> Completion<T> {
    pub fn is_superseded(&self) -> bool {
        matches!(self, Completion::Superseded)
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Completion::Applied(value) => Some(value),
            Completion::Superseded => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExplorerOptions {
    pub container: ContainerId,
    pub search_mode: SearchMode,
    pub edge_tap: EdgeTapPolicy,
    pub recommendation_count: Option<usize>,
}

impl Default for ExplorerOptions {
    fn default() -> Self {
        Self::from_config(&ExplorerConfig::default())
    }
}

impl ExplorerOptions {
    pub fn from_config(config: &ExplorerConfig) -> Self {
        Self {
            container: ContainerId::new(config.container.clone()),
            search_mode: config.search_mode,
            edge_tap: config.edge_tap,
            recommendation_count: Some(config.recommendation_count),
        }
    }
}

/// Dataset status as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Ready(DatasetSummary),
    Failed(ExplorerError),
}

/// Snapshot of everything the view renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerView {
    pub load: LoadStatus,
    pub mounted: bool,
    pub selection: SelectionState,
    /// Highlight marks as the engine currently shows them
    pub rendered_highlight: BTreeSet<String>,
    pub recommendations: RecommendationPanel,
    pub visualization_error: Option<ExplorerError>,
    pub route: Option<Route>,
}

struct ExplorerState<F> {
    fetch: FetchCoordinator,
    searches: GenerationCounter,
    /// Advanced by every user selection and by reloads; a search only takes
    /// over the selection if nothing newer happened while it was in flight
    selections: GenerationCounter,
    selection: SelectionMachine,
    viz: VisualizationManager<F>,
    panel: RecommendationPanel,
    visualization_error: Option<ExplorerError>,
    route: Option<Route>,
}

impl<F: EngineFactory> ExplorerState<F> {
    fn push_highlight(&mut self) {
        let highlighted = self.selection.state().highlighted.clone();
        self.viz.apply_highlight(&highlighted);
    }

    fn mount(&mut self, container: &ContainerId, dataset: &Arc<GraphDataset>) {
        self.viz.unmount();
        match self.viz.mount(container, dataset) {
            Ok(()) => {
                self.visualization_error = None;
                // A search confirmed while loading selects against the new data.
                if let Some(selected) = self.selection.state().selected.clone() {
                    self.selection.search_success(Some(dataset.as_ref()), &selected);
                }
                self.push_highlight();
            }
            Err(err) => {
                warn!("Failed to render graph: {}", err);
                self.visualization_error = Some(err);
            }
        }
    }

    fn apply_interaction(&mut self, interaction: Interaction) -> bool {
        let Some(dataset) = self.fetch.dataset().cloned() else {
            debug!("Ignoring {:?}: no dataset is ready", interaction);
            return false;
        };
        let applied = match interaction {
            Interaction::NodeTap { node_id } => self.selection.node_tap(&dataset, &node_id),
            Interaction::EdgeTap {
                edge_id,
                source,
                target,
            } => {
                self.selection.edge_tap(&edge_id, &source, &target);
                true
            }
        };
        if applied {
            self.selections.advance();
            self.push_highlight();
        }
        applied
    }
}

/// Controller binding a graph service, a rendering engine and the view state.
pub struct GraphExplorer<S, F> {
    service: S,
    options: ExplorerOptions,
    state: RefCell<ExplorerState<F>>,
}

impl<S, F> GraphExplorer<S, F>
where
    S: GraphService,
    F: EngineFactory,
{
    pub fn new(service: S, factory: F, options: ExplorerOptions) -> Self {
        let state = ExplorerState {
            fetch: FetchCoordinator::new(),
            searches: GenerationCounter::default(),
            selections: GenerationCounter::default(),
            selection: SelectionMachine::new(options.edge_tap),
            viz: VisualizationManager::new(factory),
            panel: RecommendationPanel::Idle,
            visualization_error: None,
            route: None,
        };
        Self {
            service,
            options,
            state: RefCell::new(state),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn options(&self) -> &ExplorerOptions {
        &self.options
    }

    /// The dataset currently published, if any.
    pub fn dataset(&self) -> Option<Arc<GraphDataset>> {
        self.state.borrow().fetch.dataset().cloned()
    }

    pub fn view(&self) -> ExplorerView {
        let state = self.state.borrow();
        let load = match state.fetch.state() {
            LoadState::Idle => LoadStatus::Idle,
            LoadState::Loading => LoadStatus::Loading,
            LoadState::Ready(dataset) => LoadStatus::Ready(dataset.summary()),
            LoadState::Failed(err) => LoadStatus::Failed(err.clone()),
        };
        ExplorerView {
            load,
            mounted: state.viz.is_mounted(),
            selection: state.selection.state().clone(),
            rendered_highlight: state.viz.rendered_highlight(),
            recommendations: state.panel.clone(),
            visualization_error: state.visualization_error.clone(),
            route: state.route,
        }
    }

    /// Fetch the dataset and render it, replacing whatever was shown.
    ///
    /// The current render and selection are dropped before the request is
    /// issued. A failure is recorded in the view and also returned; a result
    /// overtaken by a newer reload or by teardown yields `Superseded`.
    pub async fn reload(&self) -> Result<Completion<DatasetSummary>> {
        let generation = {
            let mut state = self.state.borrow_mut();
            state.viz.unmount();
            state.selection.reset();
            state.selections.advance();
            state.visualization_error = None;
            state.fetch.begin_load()
        };

        let fetched = self.service.fetch_dataset().await;

        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        match fetched {
            Ok(dataset) => {
                let Some(dataset) = state.fetch.on_success(generation, dataset) else {
                    return Ok(Completion::Superseded);
                };
                let summary = dataset.summary();
                info!(
                    "Loaded graph: {} nodes, {} edges",
                    summary.node_count, summary.edge_count
                );
                state.mount(&self.options.container, &dataset);
                Ok(Completion::Applied(summary))
            }
            Err(err) => {
                if state.fetch.on_failure(generation, err.clone()) {
                    warn!("Failed to load graph data: {}", err);
                    Err(err)
                } else {
                    Ok(Completion::Superseded)
                }
            }
        }
    }

    /// Validate `input`, confirm the user exists, then either show their
    /// recommendations in place or navigate to the results view.
    ///
    /// Starting a search supersedes any search still in flight.
    pub async fn search(&self, input: &str) -> Result<Completion<SearchOutcome>> {
        let (generation, selection_generation, parsed) = {
            let mut state = self.state.borrow_mut();
            let generation = state.searches.advance();
            let parsed = parse_user_id(input);
            state.panel = match &parsed {
                Ok(id) => RecommendationPanel::Loading(*id),
                Err(err) => RecommendationPanel::Failed(err.clone()),
            };
            (generation, state.selections.current(), parsed)
        };
        let user_id = parsed?;

        let exists = self.service.check_exists(user_id).await;
        {
            let mut state = self.state.borrow_mut();
            if !state.searches.is_current(generation) {
                debug!("Discarding existence check for superseded search of {}", user_id);
                return Ok(Completion::Superseded);
            }
            let failure = match exists {
                Ok(true) => None,
                Ok(false) => Some(ExplorerError::NotFound(user_id)),
                Err(err) => Some(err),
            };
            if let Some(err) = failure {
                state.panel = RecommendationPanel::Failed(err.clone());
                return Err(err);
            }
            if self.options.search_mode == SearchMode::Navigate {
                let route = Route::SearchResults(user_id);
                state.panel = RecommendationPanel::Idle;
                state.route = Some(route);
                info!("Navigating to {}", route);
                return Ok(Completion::Applied(SearchOutcome::Navigate(route)));
            }
        }

        let fetched = self
            .service
            .fetch_recommendations(user_id, self.options.recommendation_count)
            .await;

        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        if !state.searches.is_current(generation) {
            debug!("Discarding recommendations for superseded search of {}", user_id);
            return Ok(Completion::Superseded);
        }
        match fetched {
            Ok(result) => {
                info!(
                    "Received {} recommendations for user {}",
                    result.items.len(),
                    user_id
                );
                state.panel = RecommendationPanel::Ready(result.clone());
                if state.selections.is_current(selection_generation) {
                    let dataset = state.fetch.dataset().cloned();
                    state
                        .selection
                        .search_success(dataset.as_deref(), &user_id.to_string());
                    state.push_highlight();
                } else {
                    debug!("Selection changed during search of {}; keeping it", user_id);
                }
                Ok(Completion::Applied(SearchOutcome::Recommendations(result)))
            }
            Err(err) => {
                state.panel = RecommendationPanel::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Apply a tap on a rendered node or edge, addressed by id.
    ///
    /// Returns false when the id is not part of the current dataset.
    pub fn select_from_interaction(&self, kind: InteractionKind, id: &str) -> bool {
        let mut state = self.state.borrow_mut();
        let interaction = match kind {
            InteractionKind::Node => Interaction::NodeTap {
                node_id: id.to_string(),
            },
            InteractionKind::Edge => {
                let Some(edge) = state.fetch.dataset().and_then(|d| d.edge(id).cloned()) else {
                    warn!("Ignoring tap on unknown edge {}", id);
                    return false;
                };
                Interaction::EdgeTap {
                    edge_id: edge.id,
                    source: edge.source,
                    target: edge.target,
                }
            }
        };
        state.apply_interaction(interaction)
    }

    /// Consume interactions emitted by the engine. Returns how many applied.
    pub fn drain_interactions(&self) -> usize {
        let mut state = self.state.borrow_mut();
        let mut applied = 0;
        for event in state.viz.take_interactions() {
            if state.apply_interaction(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Forward a pointer press to the engine and apply what it reports.
    pub fn pointer_tap(&self, x: f64, y: f64) -> usize {
        self.state.borrow_mut().viz.pointer_tap(x, y);
        self.drain_interactions()
    }

    /// Return from the results view to the graph. A search still in flight
    /// is abandoned.
    pub fn leave_results(&self) {
        let mut state = self.state.borrow_mut();
        state.searches.advance();
        state.route = None;
        state.panel = RecommendationPanel::Idle;
    }

    /// Tear the view down: every in-flight result becomes stale and the
    /// engine is destroyed before this returns.
    pub fn teardown(&self) {
        let mut state = self.state.borrow_mut();
        state.fetch.invalidate();
        state.searches.advance();
        state.selections.advance();
        state.viz.unmount();
        state.selection.reset();
        state.panel = RecommendationPanel::Idle;
        state.visualization_error = None;
        state.route = None;
        debug!("Explorer torn down");
    }
}
