//! Canonical graph state
//!
//! `GraphStateStore` owns the single deduplicated node/edge set the explorer
//! renders. Fetch results of any shape are folded into it with [`GraphStateStore::merge`],
//! which keeps one invariant above all others: every stored edge has both of
//! its endpoints stored as nodes.
//!
//! Nodes and edges are kept in arrival order. Layout placement and neighbor
//! listings rely on that order being stable, so nothing is ever evicted except
//! by an explicit [`GraphStateStore::reset`].

use super::edge::Edge;
use super::node::Node;
use super::types::{EdgeId, NodeId, NodeType};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Outcome of a single [`GraphStateStore::merge`] call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Nodes that were not present before the call, in arrival order.
    /// Empty is the normal result of re-fetching known territory.
    pub new_nodes: Vec<NodeId>,

    /// Known nodes whose label, type or properties were overwritten
    pub updated_nodes: usize,

    /// Edges inserted for the first time
    pub new_edges: usize,

    /// Known edges replaced by a differing version (endpoint or type correction)
    pub corrected_edges: usize,

    /// Edges rejected because an endpoint was missing after the node phase
    pub dropped_edges: Vec<EdgeId>,
}

impl MergeReport {
    /// Whether the merge introduced nodes the layout has never seen
    pub fn has_new_nodes(&self) -> bool {
        !self.new_nodes.is_empty()
    }

    /// Number of edges rejected for dangling endpoints
    pub fn dropped_count(&self) -> usize {
        self.dropped_edges.len()
    }

    /// Whether the merge left the canonical graph untouched
    pub fn is_noop(&self) -> bool {
        self.new_nodes.is_empty()
            && self.updated_nodes == 0
            && self.new_edges == 0
            && self.corrected_edges == 0
    }
}

/// Summary counters for diagnostics and status lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphStatistics {
    pub node_count: usize,
    pub edge_count: usize,
    /// Dangling edges rejected since the last reset
    pub dropped_edges_total: usize,
    pub nodes_per_type: BTreeMap<NodeType, usize>,
}

/// The canonical, deduplicated graph plus the current selection
#[derive(Debug, Clone, Default)]
pub struct GraphStateStore {
    /// NodeId -> Node, in arrival order
    nodes: IndexMap<NodeId, Node>,

    /// EdgeId -> Edge, in arrival order
    edges: IndexMap<EdgeId, Edge>,

    /// NodeId -> indices into `edges` of the edges touching it, ascending.
    /// Edges are never removed outside a reset, so indices stay valid.
    incidence: FxHashMap<NodeId, Vec<usize>>,

    /// Currently selected node, always a key of `nodes` when set
    selected: Option<NodeId>,

    /// Dangling edges rejected since the last reset
    dropped_edges_total: usize,
}

impl GraphStateStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear nodes, edges and selection. Used for a fresh top-level search,
    /// never for an expansion.
    pub fn reset(&mut self) {
        debug!(
            "Resetting canonical graph ({} nodes, {} edges)",
            self.nodes.len(),
            self.edges.len()
        );
        self.nodes.clear();
        self.edges.clear();
        self.incidence.clear();
        self.selected = None;
        self.dropped_edges_total = 0;
    }

    /// Fold a fetch result into the canonical graph.
    ///
    /// Two phases within one call: every incoming node is inserted or
    /// overwritten by id first, then every incoming edge is inserted or
    /// overwritten by id if both endpoints are present at that point. Edges
    /// whose endpoints are still missing are dropped and reported, never
    /// stored. This never fails.
    pub fn merge(
        &mut self,
        incoming_nodes: impl IntoIterator<Item = Node>,
        incoming_edges: impl IntoIterator<Item = Edge>,
    ) -> MergeReport {
        let mut report = MergeReport::default();

        for node in incoming_nodes {
            match self.nodes.get_mut(&node.id) {
                Some(existing) => {
                    if *existing != node {
                        *existing = node;
                        report.updated_nodes += 1;
                    }
                }
                None => {
                    report.new_nodes.push(node.id.clone());
                    self.nodes.insert(node.id.clone(), node);
                }
            }
        }

        for edge in incoming_edges {
            if !self.nodes.contains_key(&edge.source) || !self.nodes.contains_key(&edge.target) {
                warn!(
                    "Dropping edge {} ({} -> {}): endpoint not in graph",
                    edge.id, edge.source, edge.target
                );
                report.dropped_edges.push(edge.id);
                continue;
            }

            if let Some((index, _, existing)) = self.edges.get_full_mut(&edge.id) {
                if *existing == edge {
                    continue;
                }
                let previous = std::mem::replace(existing, edge);
                report.corrected_edges += 1;

                let current = &self.edges[index];
                if !previous.same_endpoints(current) {
                    debug!(
                        "Correcting edge {}: {} -> {} becomes {} -> {}",
                        current.id, previous.source, previous.target, current.source, current.target
                    );
                    let (source, target) = (current.source.clone(), current.target.clone());
                    self.unlink(index, &previous.source, &previous.target);
                    self.link(index, &source, &target);
                }
                continue;
            }

            let (source, target) = (edge.source.clone(), edge.target.clone());
            let (index, _) = self.edges.insert_full(edge.id.clone(), edge);
            self.link(index, &source, &target);
            report.new_edges += 1;
        }

        self.dropped_edges_total += report.dropped_edges.len();
        debug!(
            "Merged: {} new nodes, {} updated, {} new edges, {} corrected, {} dropped",
            report.new_nodes.len(),
            report.updated_nodes,
            report.new_edges,
            report.corrected_edges,
            report.dropped_edges.len()
        );
        report
    }

    fn link(&mut self, index: usize, source: &NodeId, target: &NodeId) {
        for endpoint in [source, target] {
            let slots = self.incidence.entry(endpoint.clone()).or_default();
            if let Err(at) = slots.binary_search(&index) {
                slots.insert(at, index);
            }
        }
    }

    fn unlink(&mut self, index: usize, source: &NodeId, target: &NodeId) {
        for endpoint in [source, target] {
            if let Some(slots) = self.incidence.get_mut(endpoint) {
                if let Ok(at) = slots.binary_search(&index) {
                    slots.remove(at);
                }
            }
        }
    }

    /// Edges touching a node, in arrival order, from the incidence index
    fn incident_edges<'a>(&'a self, node_id: &NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.incidence
            .get(node_id)
            .into_iter()
            .flatten()
            .filter_map(move |&index| self.edges.get_index(index).map(|(_, edge)| edge))
    }

    /// Select a node. Unknown ids are ignored (a selection can race with a
    /// reset); returns whether the selection changed hands.
    pub fn select(&mut self, node_id: &NodeId) -> bool {
        if !self.nodes.contains_key(node_id) {
            debug!("Ignoring selection of unknown node {}", node_id);
            return false;
        }
        self.selected = Some(node_id.clone());
        true
    }

    /// Clear the selection
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Currently selected node id
    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    /// Currently selected node
    pub fn selected_node(&self) -> Option<&Node> {
        self.selected.as_ref().and_then(|id| self.nodes.get(id))
    }

    /// Neighbor ids in discovery (edge arrival) order.
    ///
    /// An edge leaving `node_id` yields its target, an edge entering it yields
    /// its source. Parallel edges collapse to one neighbor and self-loops are
    /// not reported.
    pub fn connected_node_ids(&self, node_id: &NodeId) -> Vec<NodeId> {
        let mut seen = FxHashSet::default();
        let mut neighbors = Vec::new();

        for edge in self.incident_edges(node_id) {
            if let Some(other) = edge.other_end(node_id) {
                if other != node_id && seen.insert(other) {
                    neighbors.push(other.clone());
                }
            }
        }
        neighbors
    }

    /// Neighbor nodes in discovery order
    pub fn connected_nodes(&self, node_id: &NodeId) -> Vec<&Node> {
        self.connected_node_ids(node_id)
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .collect()
    }

    /// Edges touching a node, in arrival order
    pub fn edges_of(&self, node_id: &NodeId) -> Vec<&Edge> {
        self.incident_edges(node_id).collect()
    }

    /// Get a node by id
    pub fn node(&self, node_id: &NodeId) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    /// Get an edge by id
    pub fn edge(&self, edge_id: &EdgeId) -> Option<&Edge> {
        self.edges.get(edge_id)
    }

    /// Check if a node is present
    pub fn contains_node(&self, node_id: &NodeId) -> bool {
        self.nodes.contains_key(node_id)
    }

    /// All nodes in arrival order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All edges in arrival order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Get total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get total number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Dangling edges rejected since the last reset
    pub fn dropped_edges_total(&self) -> usize {
        self.dropped_edges_total
    }

    /// Whether every stored edge has both endpoints stored
    pub fn is_consistent(&self) -> bool {
        self.edges
            .values()
            .all(|e| self.nodes.contains_key(&e.source) && self.nodes.contains_key(&e.target))
            && self.selected.as_ref().map_or(true, |id| self.nodes.contains_key(id))
    }

    /// Get graph statistics
    pub fn statistics(&self) -> GraphStatistics {
        let mut nodes_per_type = BTreeMap::new();
        for node in self.nodes.values() {
            *nodes_per_type.entry(node.node_type.clone()).or_insert(0) += 1;
        }

        GraphStatistics {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            dropped_edges_total: self.dropped_edges_total,
            nodes_per_type,
        }
    }
}
