use std::collections::BTreeSet;
use tracing::debug;

use crate::config::EdgeTapPolicy;
use crate::graph::GraphDataset;

/// The selected user and the node/edge ids emphasized around it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub selected: Option<String>,
    pub highlighted: BTreeSet<String>,
}

impl SelectionState {
    pub fn is_selected(&self) -> bool {
        self.selected.is_some()
    }
}

/// Single writer of selection and highlight state.
///
/// Every transition replaces both fields together.
#[derive(Debug, Default)]
pub struct SelectionMachine {
    state: SelectionState,
    edge_tap: EdgeTapPolicy,
}

impl SelectionMachine {
    pub fn new(edge_tap: EdgeTapPolicy) -> Self {
        Self {
            state: SelectionState::default(),
            edge_tap,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// A node was tapped in the rendered graph. Unknown ids are ignored.
    pub fn node_tap(&mut self, dataset: &GraphDataset, node_id: &str) -> bool {
        if !dataset.contains_node(node_id) {
            debug!("Ignoring tap on node {} outside the dataset", node_id);
            return false;
        }
        self.state = SelectionState {
            selected: Some(node_id.to_string()),
            highlighted: neighborhood(dataset, node_id),
        };
        true
    }

    /// An edge was tapped: highlight it with its endpoints.
    pub fn edge_tap(&mut self, edge_id: &str, source: &str, target: &str) {
        let highlighted = [edge_id, source, target]
            .into_iter()
            .map(str::to_string)
            .collect();
        let selected = match self.edge_tap {
            EdgeTapPolicy::HighlightOnly => self.state.selected.take(),
            EdgeTapPolicy::SelectSource => Some(source.to_string()),
            EdgeTapPolicy::SelectTarget => Some(target.to_string()),
        };
        self.state = SelectionState {
            selected,
            highlighted,
        };
    }

    /// A search confirmed the user. The neighborhood is highlighted only when
    /// the node is part of the rendered dataset.
    pub fn search_success(&mut self, dataset: Option<&GraphDataset>, node_id: &str) {
        let highlighted = match dataset {
            Some(dataset) if dataset.contains_node(node_id) => neighborhood(dataset, node_id),
            _ => {
                debug!("Searched node {} is not rendered; nothing to highlight", node_id);
                BTreeSet::new()
            }
        };
        self.state = SelectionState {
            selected: Some(node_id.to_string()),
            highlighted,
        };
    }

    /// The dataset was replaced or the explorer torn down.
    pub fn reset(&mut self) {
        self.state = SelectionState::default();
    }
}

/// The node, its direct neighbors and every incident edge.
pub fn neighborhood(dataset: &GraphDataset, node_id: &str) -> BTreeSet<String> {
    let mut ids = BTreeSet::new();
    ids.insert(node_id.to_string());
    ids.extend(dataset.neighbors(node_id).into_iter().map(str::to_string));
    ids.extend(dataset.incident_edges(node_id).into_iter().map(str::to_string));
    ids
}
