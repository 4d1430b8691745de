use std::collections::{BTreeSet, HashMap};
use std::f32::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use tracing::debug;

use super::engine::{ContainerId, EngineFactory, InteractionSink, RenderEngine};
use crate::config::LayoutConfig;
use crate::error::{ExplorerError, Result};
use crate::graph::GraphDataset;

/// Hit radius for pointer taps, in graph space.
pub const HIT_RADIUS: f64 = 12.0;
const INITIAL_RADIUS: f32 = 100.0;
const MAX_ZOOM: f64 = 4.0;

#[derive(Clone, Debug)]
struct NodeInfo {
    id: String,
}

/// A rendered edge: endpoint ids and their simulation indices.
#[derive(Clone, Debug)]
struct EdgeInfo {
    source: String,
    target: String,
    source_idx: DefaultNodeIdx,
    target_idx: DefaultNodeIdx,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

/// Builds [`ForceLayoutEngine`]s sharing one layout configuration.
#[derive(Debug, Clone, Default)]
pub struct ForceLayoutFactory {
    config: LayoutConfig,
}

impl ForceLayoutFactory {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }
}

impl EngineFactory for ForceLayoutFactory {
    fn create(&self, container: &ContainerId) -> Result<Box<dyn RenderEngine>> {
        if self.config.width <= 0.0 || self.config.height <= 0.0 {
            return Err(ExplorerError::Visualization(format!(
                "container {} has no drawable area ({}x{})",
                container, self.config.width, self.config.height
            )));
        }
        Ok(Box::new(ForceLayoutEngine::new(
            container.clone(),
            self.config.clone(),
        )))
    }
}

/// Headless force-directed engine: simulates, fits, hit-tests and keeps
/// highlight marks, without drawing.
pub struct ForceLayoutEngine {
    container: ContainerId,
    config: LayoutConfig,
    /// `None` once destroyed
    graph: Option<ForceGraph<NodeInfo, ()>>,
    node_indices: HashMap<String, DefaultNodeIdx>,
    edges: HashMap<String, EdgeInfo>,
    highlighted: BTreeSet<String>,
    viewport: Viewport,
    sink: Option<InteractionSink>,
}

impl ForceLayoutEngine {
    pub fn new(container: ContainerId, config: LayoutConfig) -> Self {
        let graph = ForceGraph::new(SimulationParameters {
            force_charge: config.force_charge,
            force_spring: config.force_spring,
            force_max: config.force_max,
            node_speed: config.node_speed,
            damping_factor: config.damping_factor,
        });
        let viewport = Viewport {
            x: config.width / 2.0,
            y: config.height / 2.0,
            k: 1.0,
        };
        Self {
            container,
            config,
            graph: Some(graph),
            node_indices: HashMap::new(),
            edges: HashMap::new(),
            highlighted: BTreeSet::new(),
            viewport,
            sink: None,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_destroyed(&self) -> bool {
        self.graph.is_none()
    }

    fn graph(&self) -> Result<&ForceGraph<NodeInfo, ()>> {
        self.graph
            .as_ref()
            .ok_or_else(|| destroyed(&self.container))
    }

    fn graph_mut(&mut self) -> Result<&mut ForceGraph<NodeInfo, ()>> {
        let container = self.container.clone();
        self.graph
            .as_mut()
            .ok_or_else(|| destroyed(&container))
    }

    /// Graph-space positions keyed by node index.
    fn positions(&self) -> HashMap<DefaultNodeIdx, (f32, f32)> {
        let mut positions = HashMap::new();
        if let Some(graph) = &self.graph {
            graph.visit_nodes(|node| {
                positions.insert(node.index(), (node.x(), node.y()));
            });
        }
        positions
    }

    fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let positions = self.positions();
        if positions.is_empty() {
            return None;
        }
        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;
        for &(x, y) in positions.values() {
            min_x = min_x.min(x as f64);
            min_y = min_y.min(y as f64);
            max_x = max_x.max(x as f64);
            max_y = max_y.max(y as f64);
        }
        Some((min_x, min_y, max_x, max_y))
    }

    pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
        (
            (sx - self.viewport.x) / self.viewport.k,
            (sy - self.viewport.y) / self.viewport.k,
        )
    }

    /// Viewport position of a node, if it is rendered.
    pub fn screen_position(&self, id: &str) -> Option<(f64, f64)> {
        let index = self.node_indices.get(id)?;
        let (x, y) = *self.positions().get(index)?;
        Some((
            x as f64 * self.viewport.k + self.viewport.x,
            y as f64 * self.viewport.k + self.viewport.y,
        ))
    }

    /// Closest node within `HIT_RADIUS` of a viewport point.
    pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<String> {
        let (gx, gy) = self.screen_to_graph(sx, sy);
        let graph = self.graph.as_ref()?;
        let mut best: Option<(f64, String)> = None;
        graph.visit_nodes(|node| {
            let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
            let distance = (dx * dx + dy * dy).sqrt();
            if distance < HIT_RADIUS && best.as_ref().is_none_or(|(d, _)| distance < *d) {
                best = Some((distance, node.data.user_data.id.clone()));
            }
        });
        best.map(|(_, id)| id)
    }

    /// Closest edge within `HIT_RADIUS` of a viewport point.
    pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<String> {
        let (gx, gy) = self.screen_to_graph(sx, sy);
        let positions = self.positions();
        let mut best: Option<(f64, &str)> = None;
        for (id, edge) in &self.edges {
            let (Some(&(ax, ay)), Some(&(bx, by))) =
                (positions.get(&edge.source_idx), positions.get(&edge.target_idx))
            else {
                continue;
            };
            let distance =
                segment_distance((gx, gy), (ax as f64, ay as f64), (bx as f64, by as f64));
            if distance < HIT_RADIUS && best.is_none_or(|(d, _)| distance < d) {
                best = Some((distance, id));
            }
        }
        best.map(|(_, id)| id.to_string())
    }
}

fn destroyed(container: &ContainerId) -> ExplorerError {
    ExplorerError::Visualization(format!("engine on {} was destroyed", container))
}

/// Distance from `p` to the segment `a`-`b`.
fn segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let length_sq = dx * dx + dy * dy;
    let t = if length_sq == 0.0 {
        0.0
    } else {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / length_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

impl RenderEngine for ForceLayoutEngine {
    fn load(&mut self, dataset: &GraphDataset) -> Result<()> {
        let count = dataset.nodes().len().max(1) as f32;
        let graph = self.graph_mut()?;
        let mut indices = HashMap::with_capacity(dataset.nodes().len());

        for (i, node) in dataset.nodes().iter().enumerate() {
            let angle = (i as f32) * 2.0 * PI / count;
            let idx = graph.add_node(NodeData {
                x: INITIAL_RADIUS * angle.cos(),
                y: INITIAL_RADIUS * angle.sin(),
                mass: 10.0,
                is_anchor: false,
                user_data: NodeInfo {
                    id: node.id.clone(),
                },
            });
            indices.insert(node.id.clone(), idx);
        }

        let mut edges = HashMap::with_capacity(dataset.edges().len());
        for edge in dataset.edges() {
            if let (Some(&src), Some(&tgt)) = (indices.get(&edge.source), indices.get(&edge.target))
            {
                graph.add_edge(src, tgt, EdgeData::default());
                edges.insert(
                    edge.id.clone(),
                    EdgeInfo {
                        source: edge.source.clone(),
                        target: edge.target.clone(),
                        source_idx: src,
                        target_idx: tgt,
                    },
                );
            }
        }

        self.node_indices = indices;
        self.edges = edges;
        Ok(())
    }

    fn run_layout(&mut self) -> Result<()> {
        let max_ticks = self.config.max_ticks;
        let dt = self.config.tick_seconds;
        let threshold = self.config.settle_threshold;

        for tick in 0..max_ticks {
            let before = self.positions();
            self.graph_mut()?.update(dt);
            let after = self.positions();

            let mut max_step = 0.0f32;
            for (idx, &(x, y)) in &after {
                if !x.is_finite() || !y.is_finite() {
                    return Err(ExplorerError::Visualization(format!(
                        "layout diverged on {} after {} ticks",
                        self.container, tick
                    )));
                }
                if let Some(&(bx, by)) = before.get(idx) {
                    max_step = max_step.max(((x - bx).powi(2) + (y - by).powi(2)).sqrt());
                }
            }

            if max_step < threshold {
                debug!("Layout on {} settled after {} ticks", self.container, tick + 1);
                return Ok(());
            }
        }

        debug!(
            "Layout on {} stopped at the {} tick limit",
            self.container, max_ticks
        );
        Ok(())
    }

    fn fit(&mut self) {
        let Some((min_x, min_y, max_x, max_y)) = self.bounds() else {
            return;
        };
        let available_w = (self.config.width - 2.0 * self.config.padding).max(1.0);
        let available_h = (self.config.height - 2.0 * self.config.padding).max(1.0);
        let graph_w = (max_x - min_x).max(1.0);
        let graph_h = (max_y - min_y).max(1.0);

        self.viewport.k = (available_w / graph_w).min(available_h / graph_h).min(MAX_ZOOM);
        self.center();
    }

    fn center(&mut self) {
        let Some((min_x, min_y, max_x, max_y)) = self.bounds() else {
            return;
        };
        let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
        self.viewport.x = self.config.width / 2.0 - cx * self.viewport.k;
        self.viewport.y = self.config.height / 2.0 - cy * self.viewport.k;
    }

    fn register(&mut self, sink: InteractionSink) {
        self.sink = Some(sink);
    }

    fn detach(&mut self) {
        self.sink = None;
    }

    fn clear_highlight(&mut self) {
        self.highlighted.clear();
    }

    fn mark_highlight(&mut self, ids: &BTreeSet<String>) {
        for id in ids {
            if self.node_indices.contains_key(id) || self.edges.contains_key(id) {
                self.highlighted.insert(id.clone());
            }
        }
    }

    fn highlighted(&self) -> BTreeSet<String> {
        self.highlighted.clone()
    }

    /// Nodes win over edges; a press on empty space emits nothing.
    fn pointer_tap(&mut self, x: f64, y: f64) {
        let Some(sink) = &self.sink else {
            return;
        };
        if let Some(id) = self.node_at_position(x, y) {
            sink.node_tap(id);
        } else if let Some(id) = self.edge_at_position(x, y) {
            if let Some(edge) = self.edges.get(&id) {
                sink.edge_tap(id.clone(), edge.source.clone(), edge.target.clone());
            }
        }
    }

    fn destroy(&mut self) {
        if self.graph().is_ok() {
            debug!("Destroying layout engine on {}", self.container);
        }
        self.graph = None;
        self.sink = None;
        self.node_indices.clear();
        self.edges.clear();
        self.highlighted.clear();
    }
}
