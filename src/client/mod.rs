//! Graph service boundary
//!
//! The explorer consumes two idempotent reads from an external graph service:
//! a bounded text search and a neighborhood fetch. Two implementations:
//!
//! - **`RemoteGraphService`**: talks to the service over HTTP.
//! - **`InMemoryGraphService`**: in-process, no network. Used by tests, the
//!   CLI's demo mode, and embedding applications that already hold a graph.

pub mod error;
pub mod memory;
pub mod models;
pub mod remote;

use async_trait::async_trait;

pub use error::{ServiceError, ServiceResult};
pub use memory::InMemoryGraphService;
pub use models::{Depth, Direction, NeighborhoodRequest, NodeSummary, PathRequest, Subgraph};
pub use remote::RemoteGraphService;

/// Read-only interface to the graph service
#[async_trait]
pub trait GraphService: Send + Sync {
    /// Up to `limit` candidates matching free text, best first. Never touches
    /// the explorer's graph.
    async fn search(&self, query: &str, limit: usize) -> ServiceResult<Vec<NodeSummary>>;

    /// Nodes and edges within `request.depth` hops of `request.node_id`
    async fn fetch_neighborhood(&self, request: &NeighborhoodRequest) -> ServiceResult<Subgraph>;

    /// Nodes and edges along a shortest path; empty when none exists within
    /// `request.max_depth` hops
    async fn fetch_path(&self, request: &PathRequest) -> ServiceResult<Subgraph>;

    /// Health check
    async fn ping(&self) -> ServiceResult<()>;
}
