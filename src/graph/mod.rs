//! Graph data model and canonical graph state
//!
//! This module implements the explorer's node-link model:
//! - Nodes identified by service-assigned ids, with a type tag, label and scalar properties
//! - Directed, typed edges identified by their own ids
//! - `GraphStateStore`, the deduplicated canonical graph with selection tracking

pub mod edge;
pub mod node;
pub mod property;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::Edge;
pub use node::Node;
pub use property::{PropertyMap, PropertyValue};
pub use store::{GraphStateStore, GraphStatistics, MergeReport};
pub use types::{EdgeId, EdgeType, NodeId, NodeType};
