//! RemoteGraphService: HTTP client for a running graph service
//!
//! Endpoints, relative to the base URL:
//! - `GET /api/v1/graph/search?q=..&limit=..`
//! - `GET /api/v1/graph/neighbors/{node_id}?depth=..&direction=..&limit=..`
//! - `GET /api/v1/graph/path?start=..&end=..&max_depth=..`
//! - `GET /health`

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::error::{ServiceError, ServiceResult};
use super::models::{NeighborhoodRequest, NodeSummary, PathRequest, Subgraph};
use super::GraphService;

const GRAPH_API: [&str; 3] = ["api", "v1", "graph"];

/// Network client for the graph service
pub struct RemoteGraphService {
    base_url: Url,
    http_client: Client,
}

impl RemoteGraphService {
    /// Create a client for the given base URL with a request timeout
    ///
    /// # Example
    /// ```no_run
    /// # use graph_explorer::client::RemoteGraphService;
    /// # use std::time::Duration;
    /// let service = RemoteGraphService::new("http://localhost:8000", Duration::from_secs(30)).unwrap();
    /// ```
    pub fn new(base_url: &str, timeout: Duration) -> ServiceResult<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ServiceError::InvalidRequest(format!("bad base URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::InvalidRequest(format!(
                "base URL {} cannot carry a path",
                base_url
            )));
        }

        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            http_client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL; path segments are percent-encoded individually
    fn endpoint(&self, segments: &[&str], params: &[(&str, String)]) -> ServiceResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::InvalidRequest(format!("base URL {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    fn graph_endpoint(&self, tail: &[&str], params: &[(&str, String)]) -> ServiceResult<Url> {
        let segments: Vec<&str> = GRAPH_API.iter().copied().chain(tail.iter().copied()).collect();
        self.endpoint(&segments, params)
    }

    async fn get(&self, url: Url) -> ServiceResult<Response> {
        debug!("GET {}", url);
        let response = self.http_client.get(url).send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::api_error(response).await)
        }
    }

    /// Decode a success body. Malformed payloads surface as
    /// `ServiceError::Serialization`, transport failures as `Http`.
    async fn decode<T: DeserializeOwned>(response: Response) -> ServiceResult<T> {
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Pull a message out of `{"error": ..}` or `{"detail": ..}` bodies
    async fn api_error(response: Response) -> ServiceError {
        let status = response.status();
        let error_body: serde_json::Value = response
            .json()
            .await
            .unwrap_or_else(|_| serde_json::json!({"error": "Unknown error"}));
        let message = ["error", "detail"]
            .iter()
            .find_map(|key| error_body.get(*key).and_then(|v| v.as_str()))
            .unwrap_or("Unknown error")
            .to_string();
        ServiceError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl GraphService for RemoteGraphService {
    async fn search(&self, query: &str, limit: usize) -> ServiceResult<Vec<NodeSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.graph_endpoint(
            &["search"],
            &[("q", query.to_string()), ("limit", limit.to_string())],
        )?;
        let mut results: Vec<NodeSummary> = Self::decode(self.get(url).await?).await?;
        results.truncate(limit);
        Ok(results)
    }

    async fn fetch_neighborhood(&self, request: &NeighborhoodRequest) -> ServiceResult<Subgraph> {
        let url = self.graph_endpoint(
            &["neighbors", request.node_id.as_str()],
            &[
                ("depth", request.depth.to_string()),
                ("direction", request.direction.to_string()),
                ("limit", request.limit.to_string()),
            ],
        )?;

        match self.get(url).await {
            Err(ServiceError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(ServiceError::NodeNotFound(request.node_id.clone()))
            }
            other => Self::decode(other?).await,
        }
    }

    async fn fetch_path(&self, request: &PathRequest) -> ServiceResult<Subgraph> {
        let url = self.graph_endpoint(
            &["path"],
            &[
                ("start", request.start.to_string()),
                ("end", request.end.to_string()),
                ("max_depth", request.max_depth.to_string()),
            ],
        )?;
        Self::decode(self.get(url).await?).await
    }

    async fn ping(&self) -> ServiceResult<()> {
        let url = self.endpoint(&["health"], &[])?;
        self.get(url).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::models::{Depth, Direction};
    use crate::graph::NodeId;

    fn service(base: &str) -> RemoteGraphService {
        RemoteGraphService::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_encodes_node_ids() {
        let service = service("http://localhost:8000/");
        let request = NeighborhoodRequest {
            node_id: NodeId::new("team/core alpha"),
            depth: Depth::MIN,
            direction: Direction::Both,
            limit: 50,
        };
        let url = service
            .graph_endpoint(
                &["neighbors", request.node_id.as_str()],
                &[("depth", request.depth.to_string())],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/v1/graph/neighbors/team%2Fcore%20alpha?depth=1"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let service = service("https://example.com/explorer");
        let url = service.endpoint(&["health"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/explorer/health");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            RemoteGraphService::new("not a url", Duration::from_secs(1)),
            Err(ServiceError::InvalidRequest(_))
        ));
        assert!(matches!(
            RemoteGraphService::new("mailto:someone@example.com", Duration::from_secs(1)),
            Err(ServiceError::InvalidRequest(_))
        ));
    }
}
