mod http;
mod wire;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graph::{GraphDataset, UserId};

pub use http::HttpGraphClient;

/// One recommended user and the friends they share with the searched user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub user_id: UserId,
    pub mutual_friends_count: u32,
    #[serde(default)]
    pub mutual_friends: Vec<UserId>,
}

/// Recommendations for one user, best first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub for_user_id: UserId,
    pub items: Vec<Recommendation>,
}

/// Whole-graph counters reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub num_vertices: u64,
    pub num_edges: u64,
}

/// Request/response surface of the remote graph service.
///
/// Implementations are stateless and perform a single attempt per call.
#[async_trait]
pub trait GraphService: Send + Sync {
    /// Fetch the displayable dataset (full or summarized).
    async fn fetch_dataset(&self) -> Result<GraphDataset>;

    /// Whether the user exists; a "not found" answer is `Ok(false)`.
    async fn check_exists(&self, id: UserId) -> Result<bool>;

    /// Friend recommendations; `count` caps the number of items.
    async fn fetch_recommendations(
        &self,
        id: UserId,
        count: Option<usize>,
    ) -> Result<RecommendationResult>;

    async fn fetch_neighbors(&self, id: UserId) -> Result<Vec<UserId>>;

    async fn shortest_path(&self, start: UserId, end: UserId) -> Result<Vec<UserId>>;

    async fn communities(&self) -> Result<Vec<Vec<UserId>>>;

    async fn fetch_stats(&self) -> Result<GraphStats>;
}
