//! Edge implementation for the explorer's graph model

use super::property::PropertyMap;
use super::types::{EdgeId, EdgeType, NodeId};
use serde::{Deserialize, Serialize};

/// A directed edge in the explored graph
///
/// Identity is the edge's own `id`. A later fetch carrying the same id with
/// different endpoints is treated as a correction and replaces this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for this edge
    pub id: EdgeId,

    /// Source node (edge goes FROM this node)
    pub source: NodeId,

    /// Target node (edge goes TO this node)
    pub target: NodeId,

    /// Relationship label
    #[serde(rename = "type", default)]
    pub edge_type: EdgeType,

    /// Properties associated with this edge
    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    pub properties: PropertyMap,
}

impl Edge {
    /// Create a new directed edge
    pub fn new(
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        edge_type: impl Into<EdgeType>,
    ) -> Self {
        Edge {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            edge_type: edge_type.into(),
            properties: PropertyMap::new(),
        }
    }

    /// The endpoint opposite to `node`, if the edge touches it
    ///
    /// A self-loop yields the node itself.
    pub fn other_end(&self, node: &NodeId) -> Option<&NodeId> {
        if &self.source == node {
            Some(&self.target)
        } else if &self.target == node {
            Some(&self.source)
        } else {
            None
        }
    }

    /// Whether source and target match another edge's endpoints exactly
    pub fn same_endpoints(&self, other: &Edge) -> bool {
        self.source == other.source && self.target == other.target
    }
}
