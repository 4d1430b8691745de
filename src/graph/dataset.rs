use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::warn;

use crate::error::{ExplorerError, Result};

/// Integer user identifier as used by the graph service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node in the displayed dataset. The id is the string form of a user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
}

/// An undirected friendship edge between two displayed nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl EdgeRecord {
    /// Composite id used when the service does not name its edges.
    pub fn composite_id(source: &str, target: &str) -> String {
        format!("{}-{}", source, target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DatasetSummary {
    pub node_count: usize,
    pub edge_count: usize,
}

/// Immutable snapshot of the graph as fetched from the service.
///
/// Construction validates the node/edge invariants and builds an undirected
/// adjacency index used for highlight expansion. A dataset is never mutated
/// after construction; a reload replaces it wholesale.
#[derive(Debug, Clone)]
pub struct GraphDataset {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
    /// Node id -> index into `adjacency`
    node_indices: HashMap<String, NodeIndex>,
    /// Edge id -> position in `edges`
    edge_positions: HashMap<String, usize>,
    /// Node weights are node ids, edge weights are positions in `edges`
    adjacency: UnGraph<String, usize>,
}

impl GraphDataset {
    /// Build a dataset, rejecting duplicate node ids.
    ///
    /// Edges whose endpoints are not in the node set, or whose id repeats an
    /// earlier edge, are dropped with a warning.
    pub fn new(nodes: Vec<NodeRecord>, edges: Vec<EdgeRecord>) -> Result<Self> {
        let mut adjacency = UnGraph::new_undirected();
        let mut node_indices = HashMap::with_capacity(nodes.len());

        for node in &nodes {
            if node_indices.contains_key(&node.id) {
                return Err(ExplorerError::MalformedResponse(format!(
                    "duplicate node id '{}'",
                    node.id
                )));
            }
            let index = adjacency.add_node(node.id.clone());
            node_indices.insert(node.id.clone(), index);
        }

        let mut kept = Vec::with_capacity(edges.len());
        let mut edge_positions = HashMap::with_capacity(edges.len());

        for edge in edges {
            let (Some(&src), Some(&tgt)) =
                (node_indices.get(&edge.source), node_indices.get(&edge.target))
            else {
                warn!(
                    "Dropping edge {} ({} -> {}): endpoint not in dataset",
                    edge.id, edge.source, edge.target
                );
                continue;
            };
            if edge_positions.contains_key(&edge.id) {
                warn!("Dropping edge with duplicate id {}", edge.id);
                continue;
            }
            let position = kept.len();
            adjacency.add_edge(src, tgt, position);
            edge_positions.insert(edge.id.clone(), position);
            kept.push(edge);
        }

        Ok(Self {
            nodes,
            edges: kept,
            node_indices,
            edge_positions,
            adjacency,
        })
    }

    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            node_indices: HashMap::new(),
            edge_positions: HashMap::new(),
            adjacency: UnGraph::new_undirected(),
        }
    }

    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
        }
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_indices.contains_key(id)
    }

    pub fn edge(&self, id: &str) -> Option<&EdgeRecord> {
        self.edge_positions.get(id).map(|&pos| &self.edges[pos])
    }

    /// Distinct neighbors of a node, excluding the node itself.
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        let Some(&index) = self.node_indices.get(id) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        self.adjacency
            .neighbors(index)
            .filter(|&n| n != index && seen.insert(n))
            .map(|n| self.adjacency[n].as_str())
            .collect()
    }

    /// Ids of every edge touching the node.
    pub fn incident_edges(&self, id: &str) -> Vec<&str> {
        let Some(&index) = self.node_indices.get(id) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        self.adjacency
            .edges(index)
            .map(|e| *e.weight())
            .filter(|pos| seen.insert(*pos))
            .map(|pos| self.edges[pos].id.as_str())
            .collect()
    }
}
