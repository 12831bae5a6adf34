//! Wire models for the graph service
//!
//! Shapes only; the transport lives in `remote` and `memory`.

use crate::graph::{Edge, Node, NodeId, NodeType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A type-ahead search candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub id: NodeId,
    #[serde(rename = "type", default)]
    pub node_type: NodeType,
    #[serde(default)]
    pub label: String,
}

impl From<&Node> for NodeSummary {
    fn from(node: &Node) -> Self {
        NodeSummary {
            id: node.id.clone(),
            node_type: node.node_type.clone(),
            label: node.display_label().to_string(),
        }
    }
}

/// Which relationships a neighborhood traversal follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outgoing,
    Incoming,
    #[default]
    Both,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Outgoing => "outgoing",
            Direction::Incoming => "incoming",
            Direction::Both => "both",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hop count for a neighborhood fetch, 1 to 3 inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Depth(u8);

impl Depth {
    pub const MIN: Depth = Depth(1);
    pub const MAX: Depth = Depth(3);

    /// `None` outside 1..=3
    pub fn new(hops: u8) -> Option<Depth> {
        (Self::MIN.0..=Self::MAX.0).contains(&hops).then_some(Depth(hops))
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for Depth {
    fn default() -> Self {
        Depth::MIN
    }
}

impl TryFrom<u8> for Depth {
    type Error = String;

    fn try_from(hops: u8) -> Result<Self, Self::Error> {
        Depth::new(hops).ok_or_else(|| format!("depth must be between 1 and 3, got {}", hops))
    }
}

impl From<Depth> for u8 {
    fn from(depth: Depth) -> Self {
        depth.0
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything within `depth` hops of `node_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborhoodRequest {
    pub node_id: NodeId,
    pub depth: Depth,
    #[serde(default)]
    pub direction: Direction,
    /// Cap on nodes returned besides the start node
    pub limit: usize,
}

/// Shortest undirected path between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRequest {
    pub start: NodeId,
    pub end: NodeId,
    pub max_depth: u8,
}

/// A raw fetch result. May overlap with what the explorer already holds and
/// may even reference nodes it does not include.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subgraph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Subgraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}
