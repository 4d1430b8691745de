//! Response bodies of the graph service and their conversion into domain types.

use serde::Deserialize;

use super::{Recommendation, RecommendationResult};
use crate::error::{ExplorerError, Result};
use crate::graph::{EdgeRecord, GraphDataset, NodeRecord, UserId};

/// Ids arrive as strings from the dataset endpoint but as integers elsewhere.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Number(u64),
}

impl WireId {
    fn into_string(self, what: &str) -> Result<String> {
        match self {
            WireId::Text(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            WireId::Text(_) => Err(ExplorerError::MalformedResponse(format!(
                "empty {} id",
                what
            ))),
            WireId::Number(n) => Ok(n.to_string()),
        }
    }
}

/// Elements may be flat or wrapped in a `data` object.
#[derive(Deserialize)]
#[serde(untagged)]
enum Element<T> {
    Wrapped { data: T },
    Flat(T),
}

impl<T> Element<T> {
    fn into_inner(self) -> T {
        match self {
            Element::Wrapped { data } => data,
            Element::Flat(inner) => inner,
        }
    }
}

#[derive(Deserialize)]
struct WireNode {
    id: WireId,
}

#[derive(Deserialize)]
struct WireEdge {
    #[serde(default)]
    id: Option<WireId>,
    source: WireId,
    target: WireId,
}

#[derive(Deserialize)]
struct DatasetBody {
    nodes: Option<Vec<Element<WireNode>>>,
    edges: Option<Vec<Element<WireEdge>>>,
}

#[derive(Deserialize)]
struct ExistsBody {
    exists: bool,
}

#[derive(Deserialize)]
struct RecommendationsBody {
    #[serde(default)]
    user_id: Option<UserId>,
    recommendations: Vec<Recommendation>,
}

#[derive(Deserialize)]
struct NeighborsBody {
    neighbors: Vec<UserId>,
}

#[derive(Deserialize)]
struct PathBody {
    path: Vec<UserId>,
}

#[derive(Deserialize)]
struct CommunitiesBody {
    communities: Vec<Vec<UserId>>,
}

pub(crate) fn parse_dataset(body: &str) -> Result<GraphDataset> {
    let body: DatasetBody = serde_json::from_str(body)?;

    // One list may be omitted when it is empty; a body with neither is not graph data.
    let (nodes, edges) = match (body.nodes, body.edges) {
        (None, None) => {
            return Err(ExplorerError::MalformedResponse(
                "graph data must contain 'nodes' or 'edges'".to_string(),
            ));
        }
        (nodes, edges) => (nodes.unwrap_or_default(), edges.unwrap_or_default()),
    };

    let nodes = nodes
        .into_iter()
        .map(|n| {
            Ok(NodeRecord {
                id: n.into_inner().id.into_string("node")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let edges = edges
        .into_iter()
        .map(|e| {
            let e = e.into_inner();
            let source = e.source.into_string("source")?;
            let target = e.target.into_string("target")?;
            let id = match e.id {
                Some(id) => id.into_string("edge")?,
                None => EdgeRecord::composite_id(&source, &target),
            };
            Ok(EdgeRecord { id, source, target })
        })
        .collect::<Result<Vec<_>>>()?;

    GraphDataset::new(nodes, edges)
}

pub(crate) fn parse_exists(body: &str) -> Result<bool> {
    let body: ExistsBody = serde_json::from_str(body)?;
    Ok(body.exists)
}

pub(crate) fn parse_recommendations(requested: UserId, body: &str) -> Result<RecommendationResult> {
    let body: RecommendationsBody = serde_json::from_str(body)?;
    Ok(RecommendationResult {
        for_user_id: body.user_id.unwrap_or(requested),
        items: body.recommendations,
    })
}

pub(crate) fn parse_neighbors(body: &str) -> Result<Vec<UserId>> {
    Ok(serde_json::from_str::<NeighborsBody>(body)?.neighbors)
}

pub(crate) fn parse_path(body: &str) -> Result<Vec<UserId>> {
    Ok(serde_json::from_str::<PathBody>(body)?.path)
}

pub(crate) fn parse_communities(body: &str) -> Result<Vec<Vec<UserId>>> {
    Ok(serde_json::from_str::<CommunitiesBody>(body)?.communities)
}
