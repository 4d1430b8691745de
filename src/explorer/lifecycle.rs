use std::collections::BTreeSet;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::engine::{ContainerId, EngineFactory, Interaction, InteractionSink, RenderEngine};
use crate::error::{ExplorerError, Result};
use crate::graph::GraphDataset;

struct LiveEngine {
    container: ContainerId,
    engine: Box<dyn RenderEngine>,
    events: mpsc::UnboundedReceiver<Interaction>,
}

/// Owns the single live engine instance and its interaction channel.
pub struct VisualizationManager<F> {
    factory: F,
    live: Option<LiveEngine>,
}

impl<F: EngineFactory> VisualizationManager<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            live: None,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.live.is_some()
    }

    /// Create an engine on `container`, load and lay out `dataset`, fit the
    /// view and attach the interaction callbacks.
    ///
    /// Fails if an instance is already live; the existing one is untouched.
    pub fn mount(&mut self, container: &ContainerId, dataset: &GraphDataset) -> Result<()> {
        if let Some(live) = &self.live {
            return Err(ExplorerError::Visualization(format!(
                "an engine is already mounted on {}",
                live.container
            )));
        }

        let mut engine = self.factory.create(container).map_err(into_visualization)?;

        if let Err(err) = engine.load(dataset).and_then(|_| engine.run_layout()) {
            warn!("Engine setup on {} failed: {}", container, err);
            engine.destroy();
            return Err(into_visualization(err));
        }
        engine.fit();
        engine.center();

        let (sink, events) = InteractionSink::channel();
        engine.register(sink);

        debug!(
            "Mounted engine on {} with {} nodes",
            container,
            dataset.nodes().len()
        );
        self.live = Some(LiveEngine {
            container: container.clone(),
            engine,
            events,
        });
        Ok(())
    }

    /// Destroy the live engine, if any. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        if let Some(mut live) = self.live.take() {
            live.engine.detach();
            live.engine.destroy();
            live.events.close();
            debug!("Unmounted engine on {}", live.container);
        }
    }

    /// Replace every highlight mark with `ids`.
    pub fn apply_highlight(&mut self, ids: &BTreeSet<String>) {
        if let Some(live) = &mut self.live {
            live.engine.clear_highlight();
            live.engine.mark_highlight(ids);
        }
    }

    /// What the engine currently shows as highlighted.
    pub fn rendered_highlight(&self) -> BTreeSet<String> {
        self.live
            .as_ref()
            .map(|live| live.engine.highlighted())
            .unwrap_or_default()
    }

    pub fn pointer_tap(&mut self, x: f64, y: f64) {
        if let Some(live) = &mut self.live {
            live.engine.pointer_tap(x, y);
        }
    }

    /// Interactions emitted since the last call, oldest first.
    pub fn take_interactions(&mut self) -> Vec<Interaction> {
        let mut out = Vec::new();
        if let Some(live) = &mut self.live {
            while let Ok(event) = live.events.try_recv() {
                out.push(event);
            }
        }
        out
    }
}

impl<F> Drop for VisualizationManager<F> {
    fn drop(&mut self) {
        if let Some(mut live) = self.live.take() {
            live.engine.detach();
            live.engine.destroy();
        }
    }
}

fn into_visualization(err: ExplorerError) -> ExplorerError {
    match err {
        ExplorerError::Visualization(_) => err,
        other => ExplorerError::Visualization(other.to_string()),
    }
}
