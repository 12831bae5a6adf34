//! Incremental graph layout
//!
//! The first pass after a reset spreads every node evenly around a circle
//! centered on the canvas. After that, only nodes introduced by a merge are
//! placed: next to the centroid of their already-placed neighbors, or on an
//! outer ring when they arrive with no placed neighbor. Settled nodes are never
//! moved by a merge, so an exploring user keeps their bearings.
//!
//! New nodes are placed outward from the settled graph, breadth first, so
//! the order they are listed in a payload does not decide which of them
//! count as connected. Only nodes no placement can reach go to the rings.
//!
//! There is no physics here. Placement is deterministic and touches only the
//! new nodes and their incident edges.

use crate::geometry::{CanvasSize, GraphPoint, GraphVector};
use crate::graph::{GraphStateStore, MergeReport, NodeId};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::f64::consts::{PI, TAU};
use tracing::debug;

/// Siblings placed around one anchor before a wider ring is started
const SIBLINGS_PER_RING: usize = 8;

/// Outer-ring slots never drop below this, so a tiny first pass does not
/// crowd later isolated imports.
const MIN_RING_SLOTS: usize = 12;

/// Tunables for placement distances
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// First-pass radius as a fraction of `min(canvas width, canvas height)`
    pub radius_factor: f64,
    /// Distance between a new node and the centroid of its anchors
    pub sibling_spacing: f64,
    /// Gap between the first-pass circle and each outer ring
    pub ring_spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            radius_factor: 0.3,
            sibling_spacing: 60.0,
            ring_spacing: 80.0,
        }
    }
}

/// Slot allocator for nodes placed with no anchor
#[derive(Debug, Clone, Default)]
struct Perimeter {
    slots_per_ring: usize,
    next_slot: usize,
}

impl Perimeter {
    fn after_first_pass(node_count: usize) -> Self {
        Self {
            slots_per_ring: node_count.max(MIN_RING_SLOTS),
            next_slot: 0,
        }
    }

    /// Returns (ring, angle) of the next free slot. Ring 0 is the first-pass
    /// circle, which is full, so allocation starts on ring 1. Odd rings are
    /// rotated by half a step.
    fn allocate(&mut self) -> (usize, f64) {
        let slots = self.slots_per_ring.max(1);
        let slot = self.next_slot;
        self.next_slot += 1;

        let ring = 1 + slot / slots;
        let step = TAU / slots as f64;
        let stagger = if ring % 2 == 1 { step / 2.0 } else { 0.0 };
        (ring, step * (slot % slots) as f64 + stagger)
    }
}

/// Owns the 2-D position of every node in the canonical graph
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: LayoutConfig,
    canvas: CanvasSize,
    positions: IndexMap<NodeId, GraphPoint>,
    perimeter: Perimeter,
    /// Children already placed around each anchor, keyed by the anchor's id
    siblings: FxHashMap<NodeId, usize>,
    /// Whether the first pass has run since the last reset
    seeded: bool,
}

impl LayoutEngine {
    /// Create a layout engine for a canvas of the given pixel size
    pub fn new(config: LayoutConfig, canvas: CanvasSize) -> Self {
        Self {
            config,
            canvas,
            positions: IndexMap::new(),
            perimeter: Perimeter::default(),
            siblings: FxHashMap::default(),
            seeded: false,
        }
    }

    /// Forget every position; the next `apply` runs a full first pass
    pub fn reset(&mut self) {
        self.positions.clear();
        self.siblings.clear();
        self.perimeter = Perimeter::default();
        self.seeded = false;
    }

    /// Update the canvas size. Existing positions are kept; only later
    /// placements use the new center and radius.
    pub fn set_canvas_size(&mut self, canvas: CanvasSize) {
        self.canvas = canvas;
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas
    }

    /// Bring the layout up to date with a merge.
    ///
    /// Runs the circular first pass when nothing has been laid out since the
    /// last reset; otherwise places the merge's new nodes without touching
    /// existing positions. Returns the number of nodes that received a
    /// position.
    ///
    /// Every merge must be applied, in order, for the layout to cover the
    /// whole graph.
    pub fn apply(&mut self, store: &GraphStateStore, report: &MergeReport) -> usize {
        if !self.seeded {
            return self.first_pass(store);
        }

        let mut pending: IndexSet<NodeId> = report
            .new_nodes
            .iter()
            .filter(|id| store.contains_node(id) && !self.positions.contains_key(*id))
            .cloned()
            .collect();

        // Seeds: new nodes attached to the settled graph, in arrival order
        let mut queue: VecDeque<NodeId> = pending
            .iter()
            .filter(|id| {
                store
                    .connected_node_ids(id)
                    .iter()
                    .any(|n| self.positions.contains_key(n))
            })
            .cloned()
            .collect();

        let mut placed = 0;
        loop {
            while let Some(id) = queue.pop_front() {
                if !pending.shift_remove(&id) {
                    continue;
                }
                let neighbors = store.connected_node_ids(&id);
                let position = self.incremental_position(&neighbors);
                self.positions.insert(id, position);
                placed += 1;
                queue.extend(neighbors.into_iter().filter(|n| pending.contains(n)));
            }

            // Nothing placed reaches what is left; start the next one on a ring
            match pending.first() {
                Some(id) => queue.push_back(id.clone()),
                None => break,
            }
        }

        if placed > 0 {
            debug!("Incremental layout placed {} nodes ({} total)", placed, self.positions.len());
        }
        placed
    }

    /// Discard all positions and lay the whole graph out on the circle again.
    /// Only for an explicit user request; merges never call this.
    pub fn relayout(&mut self, store: &GraphStateStore) -> usize {
        self.reset();
        self.first_pass(store)
    }

    /// Position of a node, if placed
    pub fn position(&self, node_id: &NodeId) -> Option<GraphPoint> {
        self.positions.get(node_id).copied()
    }

    /// All positions in placement order
    pub fn positions(&self) -> &IndexMap<NodeId, GraphPoint> {
        &self.positions
    }

    /// Number of placed nodes
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn center(&self) -> GraphPoint {
        GraphPoint::new(self.canvas.width / 2.0, self.canvas.height / 2.0)
    }

    fn base_radius(&self) -> f64 {
        self.canvas.width.min(self.canvas.height) * self.config.radius_factor
    }

    fn first_pass(&mut self, store: &GraphStateStore) -> usize {
        let count = store.node_count();
        if count == 0 {
            return 0;
        }

        let center = self.center();
        let radius = self.base_radius();
        self.positions.clear();
        for (index, node) in store.nodes().enumerate() {
            let angle = TAU * index as f64 / count as f64;
            self.positions.insert(node.id.clone(), center + polar(radius, angle));
        }

        self.perimeter = Perimeter::after_first_pass(count);
        self.siblings.clear();
        self.seeded = true;
        debug!("Circular layout of {} nodes, radius {:.1}", count, radius);
        count
    }

    fn incremental_position(&mut self, neighbors: &[NodeId]) -> GraphPoint {
        let anchors: Vec<(&NodeId, GraphPoint)> = neighbors
            .iter()
            .filter_map(|id| self.positions.get(id).copied().map(|p| (id, p)))
            .collect();

        let Some((primary, _)) = anchors.first() else {
            let (ring, angle) = self.perimeter.allocate();
            let radius = self.base_radius() + ring as f64 * self.config.ring_spacing;
            return self.center() + polar(radius, angle);
        };

        let sum = anchors
            .iter()
            .fold(GraphVector::zero(), |acc, (_, p)| acc + p.to_vector());
        let centroid = (sum / anchors.len() as f64).to_point();

        let sibling = self.siblings.entry((*primary).clone()).or_insert(0);
        let index = *sibling;
        *sibling += 1;

        centroid + self.sibling_offset(index)
    }

    /// Fixed angular step per sibling; each full ring of siblings moves
    /// further out and is rotated so rings do not line up.
    fn sibling_offset(&self, index: usize) -> GraphVector {
        let ring = index / SIBLINGS_PER_RING;
        let step = TAU / SIBLINGS_PER_RING as f64;
        let angle = step * (index % SIBLINGS_PER_RING) as f64 + ring as f64 * (PI / SIBLINGS_PER_RING as f64);
        polar(self.config.sibling_spacing * (1 + ring) as f64, angle)
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default(), CanvasSize::new(800.0, 600.0))
    }
}

fn polar(length: f64, angle: f64) -> GraphVector {
    GraphVector::new(length * angle.cos(), length * angle.sin())
}
