use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::wire;
use super::{GraphService, GraphStats, RecommendationResult};
use crate::config::ApiConfig;
use crate::error::{ExplorerError, Result};
use crate::graph::{GraphDataset, UserId};

/// `GraphService` over the service's JSON HTTP API.
pub struct HttpGraphClient {
    client: Client,
    base_url: String,
    dataset_path: String,
}

impl HttpGraphClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            dataset_path: normalize_path(&config.dataset_path),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a GET and return the status with the raw body.
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<(StatusCode, String)> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Content-Type", "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    /// GET that treats every non-success status as a transport failure.
    async fn get_ok(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        let (status, body) = self.get(path, query).await?;
        if !status.is_success() {
            return Err(ExplorerError::Network(format!(
                "graph API error ({}): {}",
                status, body
            )));
        }
        Ok(body)
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[async_trait]
impl GraphService for HttpGraphClient {
    async fn fetch_dataset(&self) -> Result<GraphDataset> {
        let body = self.get_ok(&self.dataset_path, &[]).await?;
        wire::parse_dataset(&body)
    }

    async fn check_exists(&self, id: UserId) -> Result<bool> {
        let (status, body) = self
            .get("/graph/search", &[("id", id.to_string())])
            .await?;

        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !status.is_success() {
            return Err(ExplorerError::Network(format!(
                "graph API error ({}): {}",
                status, body
            )));
        }
        wire::parse_exists(&body)
    }

    async fn fetch_recommendations(
        &self,
        id: UserId,
        count: Option<usize>,
    ) -> Result<RecommendationResult> {
        let query: Vec<(&str, String)> = count
            .map(|n| ("num", n.to_string()))
            .into_iter()
            .collect();
        let body = self
            .get_ok(&format!("/graph/recommendations/{}", id), &query)
            .await?;
        wire::parse_recommendations(id, &body)
    }

    async fn fetch_neighbors(&self, id: UserId) -> Result<Vec<UserId>> {
        let body = self.get_ok(&format!("/graph/neighbors/{}", id), &[]).await?;
        wire::parse_neighbors(&body)
    }

    async fn shortest_path(&self, start: UserId, end: UserId) -> Result<Vec<UserId>> {
        let body = self
            .get_ok(
                "/graph/shortest-path",
                &[("start", start.to_string()), ("end", end.to_string())],
            )
            .await?;
        wire::parse_path(&body)
    }

    async fn communities(&self) -> Result<Vec<Vec<UserId>>> {
        let body = self.get_ok("/graph/communities", &[]).await?;
        wire::parse_communities(&body)
    }

    async fn fetch_stats(&self) -> Result<GraphStats> {
        let body = self.get_ok("/graph/stats", &[]).await?;
        Ok(serde_json::from_str(&body)?)
    }
}
