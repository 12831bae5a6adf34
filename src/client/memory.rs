//! InMemoryGraphService: in-process graph service, no network
//!
//! Answers searches and neighborhood/path fetches from a graph held in
//! memory. Results deliberately overlap between calls, the way a real
//! service's do, so it exercises the explorer's merge path faithfully.

use async_trait::async_trait;
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

use super::error::{ServiceError, ServiceResult};
use super::models::{Direction, NeighborhoodRequest, NodeSummary, PathRequest, Subgraph};
use super::GraphService;
use crate::graph::{Edge, EdgeId, Node, NodeId};

/// Graph service backed by an in-memory node/edge set
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraphService {
    nodes: IndexMap<NodeId, Node>,
    edges: IndexMap<EdgeId, Edge>,
}

impl InMemoryGraphService {
    /// Create an empty service
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service holding the given graph
    pub fn with_graph(nodes: impl IntoIterator<Item = Node>, edges: impl IntoIterator<Item = Edge>) -> Self {
        let mut service = Self::new();
        for node in nodes {
            service.insert_node(node);
        }
        for edge in edges {
            service.insert_edge(edge);
        }
        service
    }

    /// Insert or replace a node
    pub fn insert_node(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    /// Insert or replace an edge. Endpoints are not checked: a service is
    /// free to hand out edges its node set cannot back up.
    pub fn insert_edge(&mut self, edge: Edge) {
        self.edges.insert(edge.id.clone(), edge);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// A small organisation graph for demos and tests
    pub fn sample() -> Self {
        let nodes = vec![
            Node::new("p-ada", "Person", "Ada Lovelace").with_property("role", "Engineer"),
            Node::new("p-grace", "Person", "Grace Hopper").with_property("role", "Lead"),
            Node::new("p-alan", "Person", "Alan Turing").with_property("role", "Researcher"),
            Node::new("p-edsger", "Person", "Edsger Dijkstra").with_property("role", "Architect"),
            Node::new("t-core", "Team", "Core Platform").with_property("size", 3i64),
            Node::new("t-research", "Team", "Research"),
            Node::new("pr-atlas", "Project", "Atlas").with_property("status", "active"),
            Node::new("pr-beacon", "Project", "Beacon").with_property("status", "planning"),
            Node::new("d-roadmap", "Document", "").with_property("title", "2025 Roadmap"),
        ];
        let edges = vec![
            Edge::new("e-1", "p-ada", "t-core", "MEMBER_OF"),
            Edge::new("e-2", "p-grace", "t-core", "LEADS"),
            Edge::new("e-3", "p-alan", "t-research", "MEMBER_OF"),
            Edge::new("e-4", "p-edsger", "t-core", "MEMBER_OF"),
            Edge::new("e-5", "t-core", "pr-atlas", "OWNS"),
            Edge::new("e-6", "t-research", "pr-beacon", "OWNS"),
            Edge::new("e-7", "p-ada", "pr-beacon", "CONTRIBUTES_TO"),
            Edge::new("e-8", "pr-atlas", "d-roadmap", "DOCUMENTED_IN"),
            Edge::new("e-9", "p-grace", "p-ada", "MENTORS"),
            Edge::new("e-10", "p-alan", "p-edsger", "COLLABORATES_WITH"),
        ];
        Self::with_graph(nodes, edges)
    }

    /// Adjacent (edge, neighbor) pairs of `node_id` following `direction`
    fn adjacent<'a>(
        &'a self,
        node_id: &'a NodeId,
        direction: Direction,
    ) -> impl Iterator<Item = (&'a Edge, &'a NodeId)> + 'a {
        self.edges.values().filter_map(move |edge| {
            let outgoing = matches!(direction, Direction::Outgoing | Direction::Both);
            let incoming = matches!(direction, Direction::Incoming | Direction::Both);
            if outgoing && &edge.source == node_id {
                Some((edge, &edge.target))
            } else if incoming && &edge.target == node_id {
                Some((edge, &edge.source))
            } else {
                None
            }
        })
    }

    fn require(&self, node_id: &NodeId) -> ServiceResult<()> {
        if self.nodes.contains_key(node_id) {
            Ok(())
        } else {
            Err(ServiceError::NodeNotFound(node_id.clone()))
        }
    }

    /// Every stored edge whose endpoints both lie in `members`
    fn induced(&self, members: &IndexSet<NodeId>) -> Subgraph {
        Subgraph {
            nodes: members.iter().filter_map(|id| self.nodes.get(id).cloned()).collect(),
            edges: self
                .edges
                .values()
                .filter(|e| members.contains(&e.source) && members.contains(&e.target))
                .cloned()
                .collect(),
        }
    }
}

#[async_trait]
impl GraphService for InMemoryGraphService {
    async fn search(&self, query: &str, limit: usize) -> ServiceResult<Vec<NodeSummary>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        // Prefix matches rank ahead of substring matches
        let mut prefix = Vec::new();
        let mut contains = Vec::new();
        for node in self.nodes.values() {
            let label = node.display_label().to_lowercase();
            if label.starts_with(&needle) {
                prefix.push(NodeSummary::from(node));
            } else if label.contains(&needle) || node.id.as_str().to_lowercase().contains(&needle) {
                contains.push(NodeSummary::from(node));
            }
        }
        prefix.extend(contains);
        prefix.truncate(limit);
        Ok(prefix)
    }

    async fn fetch_neighborhood(&self, request: &NeighborhoodRequest) -> ServiceResult<Subgraph> {
        self.require(&request.node_id)?;

        let mut members = IndexSet::new();
        members.insert(request.node_id.clone());
        let mut queue = VecDeque::from([(request.node_id.clone(), 0u8)]);

        'bfs: while let Some((current, hops)) = queue.pop_front() {
            if hops >= request.depth.get() {
                continue;
            }
            for (_, neighbor) in self.adjacent(&current, request.direction) {
                if members.len() > request.limit {
                    break 'bfs;
                }
                if self.nodes.contains_key(neighbor) && members.insert(neighbor.clone()) {
                    queue.push_back((neighbor.clone(), hops + 1));
                }
            }
        }
        // `limit` counts neighbors, not the start node
        members.truncate(request.limit + 1);

        Ok(self.induced(&members))
    }

    async fn fetch_path(&self, request: &PathRequest) -> ServiceResult<Subgraph> {
        self.require(&request.start)?;
        self.require(&request.end)?;

        let mut parents: FxHashMap<NodeId, Option<(NodeId, EdgeId)>> = FxHashMap::default();
        parents.insert(request.start.clone(), None);
        let mut queue = VecDeque::from([(request.start.clone(), 0u8)]);

        while let Some((current, hops)) = queue.pop_front() {
            if current == request.end {
                break;
            }
            if hops >= request.max_depth {
                continue;
            }
            for (edge, neighbor) in self.adjacent(&current, Direction::Both) {
                if self.nodes.contains_key(neighbor) && !parents.contains_key(neighbor) {
                    parents.insert(neighbor.clone(), Some((current.clone(), edge.id.clone())));
                    queue.push_back((neighbor.clone(), hops + 1));
                }
            }
        }

        if !parents.contains_key(&request.end) {
            return Ok(Subgraph::default());
        }

        let mut node_ids = vec![request.end.clone()];
        let mut edge_ids = Vec::new();
        let mut cursor = request.end.clone();
        while let Some(Some((parent, edge_id))) = parents.get(&cursor) {
            edge_ids.push(edge_id.clone());
            node_ids.push(parent.clone());
            cursor = parent.clone();
        }
        node_ids.reverse();
        edge_ids.reverse();

        Ok(Subgraph {
            nodes: node_ids.iter().filter_map(|id| self.nodes.get(id).cloned()).collect(),
            edges: edge_ids.iter().filter_map(|id| self.edges.get(id).cloned()).collect(),
        })
    }

    async fn ping(&self) -> ServiceResult<()> {
        Ok(())
    }
}
