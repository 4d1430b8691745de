//! Contract between the explorer and a force-directed rendering engine.
//!
//! The engine never calls into the explorer. It emits typed [`Interaction`]s
//! through an [`InteractionSink`], and the explorer is the only consumer.

use std::collections::BTreeSet;
use std::fmt;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::graph::GraphDataset;

/// Opaque handle naming where an engine instance renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user interaction reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    NodeTap {
        node_id: String,
    },
    EdgeTap {
        edge_id: String,
        source: String,
        target: String,
    },
}

/// Which kind of element a view-level interaction targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Node,
    Edge,
}

/// Sending half of the interaction channel, handed to an engine on mount.
#[derive(Debug, Clone)]
pub struct InteractionSink {
    tx: mpsc::UnboundedSender<Interaction>,
}

impl InteractionSink {
    /// Create a sink and the receiver the explorer drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Interaction>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Report a node tap. Returns false once the explorer has detached.
    pub fn node_tap(&self, node_id: impl Into<String>) -> bool {
        self.tx
            .send(Interaction::NodeTap {
                node_id: node_id.into(),
            })
            .is_ok()
    }

    /// Report an edge tap. Returns false once the explorer has detached.
    pub fn edge_tap(
        &self,
        edge_id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> bool {
        self.tx
            .send(Interaction::EdgeTap {
                edge_id: edge_id.into(),
                source: source.into(),
                target: target.into(),
            })
            .is_ok()
    }
}

/// A live engine instance bound to one container.
pub trait RenderEngine {
    /// Load the dataset's nodes and edges, replacing nothing (the instance is fresh).
    fn load(&mut self, dataset: &GraphDataset) -> Result<()>;

    /// Run the force-directed layout until it settles.
    fn run_layout(&mut self) -> Result<()>;

    /// Scale the viewport so the whole graph is visible.
    fn fit(&mut self);

    /// Center the viewport on the graph.
    fn center(&mut self);

    /// Attach the interaction callbacks.
    fn register(&mut self, sink: InteractionSink);

    /// Drop the interaction callbacks; no further events are emitted.
    fn detach(&mut self);

    /// Remove every highlight mark.
    fn clear_highlight(&mut self);

    /// Mark the given node/edge ids; unknown ids are ignored.
    fn mark_highlight(&mut self, ids: &BTreeSet<String>);

    /// Ids currently carrying a highlight mark.
    fn highlighted(&self) -> BTreeSet<String>;

    /// A pointer press at viewport coordinates. Engines that support hit
    /// testing emit the matching interaction.
    fn pointer_tap(&mut self, _x: f64, _y: f64) {}

    /// Release every resource held by the instance.
    fn destroy(&mut self);
}

/// Constructs engine instances for containers.
pub trait EngineFactory {
    fn create(&self, container: &ContainerId) -> Result<Box<dyn RenderEngine>>;
}
