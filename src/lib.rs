//! Graph Explorer
//!
//! Incremental exploration of an entity-relationship graph served by a remote
//! graph service: fetch a node's neighborhood, merge it into one canonical
//! deduplicated graph, lay it out without disturbing settled nodes, and pan,
//! zoom, select and expand from there.
//!
//! # Architecture
//!
//! - `client`: the graph service boundary (search, neighborhood, path) with
//!   an HTTP and an in-memory implementation
//! - `graph`: node/edge model and `GraphStateStore`, the canonical graph
//! - `layout`: `LayoutEngine`, circular first pass then incremental placement
//! - `viewport`: `ViewportController` (zoom, pan, transforms, hit testing) and
//!   the click/double-click detector
//! - `explorer`: the session that turns user actions into fetches and fetch
//!   results into graph growth, discarding stale responses
//!
//! ## Example Usage
//!
//! ```rust
//! use graph_explorer::graph::{Edge, GraphStateStore, Node, NodeId};
//! use graph_explorer::layout::LayoutEngine;
//!
//! let mut store = GraphStateStore::new();
//! let mut layout = LayoutEngine::default();
//!
//! let report = store.merge(
//!     vec![Node::new("n1", "Person", "Ada"), Node::new("n2", "Team", "Core")],
//!     vec![Edge::new("e1", "n1", "n2", "MEMBER_OF")],
//! );
//! layout.apply(&store, &report);
//!
//! assert_eq!(store.connected_node_ids(&NodeId::new("n1")), vec![NodeId::new("n2")]);
//! assert!(layout.position(&NodeId::new("n2")).is_some());
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod explorer;
pub mod geometry;
pub mod graph;
pub mod layout;
pub mod viewport;

// Re-export main types for convenience
pub use graph::{
    Edge, EdgeId, EdgeType, GraphStateStore, GraphStatistics, MergeReport, Node, NodeId, NodeType,
    PropertyMap, PropertyValue,
};

pub use client::{
    Depth, Direction, GraphService, InMemoryGraphService, NodeSummary, RemoteGraphService,
    ServiceError, ServiceResult, Subgraph,
};

pub use config::{ConfigError, ConfigResult, ExplorerConfig};

pub use explorer::{
    Explorer, ExplorerError, ExplorerResult, FetchKind, FetchOutcome, FetchTicket, Notice,
    NoticeLevel, PointerOutcome,
};

pub use geometry::{CanvasSize, GraphPoint, ScreenPoint};
pub use layout::{LayoutConfig, LayoutEngine};
pub use viewport::{ClickDetector, ClickKind, PanState, ViewportConfig, ViewportController};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}
