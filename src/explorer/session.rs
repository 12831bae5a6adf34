//! Explorer: one user's exploration session
//!
//! Fetches run in two halves. `request_*` stamps a ticket and returns it; the
//! caller runs [`FetchTicket::fetch`] however it likes (awaited inline or on a
//! spawned task) and hands the result to [`Explorer::apply_fetch`]. Only the
//! latest ticket of each kind is applied. The `load`/`expand`/`find_path`
//! drivers do both halves in one await for callers that need no overlap.

use super::ticket::{FetchKind, FetchOutcome, FetchRequest, FetchTicket, Generation, SearchTicket};
use super::{ExplorerError, ExplorerResult, Notice};
use crate::client::{
    Depth, GraphService, NeighborhoodRequest, NodeSummary, PathRequest, ServiceResult, Subgraph,
};
use crate::config::ExplorerConfig;
use crate::geometry::{CanvasSize, GraphPoint, ScreenPoint};
use crate::graph::{Edge, GraphStateStore, Node, NodeId};
use crate::layout::LayoutEngine;
use crate::viewport::{ClickDetector, ClickKind, ViewportController};
use std::time::Instant;
use tracing::{debug, info, warn};

/// The selected node with everything the details panel lists
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDetails<'a> {
    pub node: &'a Node,
    /// Directly connected nodes in discovery order
    pub connected: Vec<&'a Node>,
    pub edges: Vec<&'a Edge>,
}

/// What a pointer press did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerOutcome {
    /// A node was clicked and is now selected
    Selected(NodeId),
    /// A node was double-clicked; run the ticket to expand it
    ExpandRequested(FetchTicket),
    /// Empty canvas was pressed; dragging now pans
    PanStarted,
}

/// Session state: the canonical graph, its layout, the viewport and the
/// bookkeeping that keeps stale fetch results out of the graph
#[derive(Debug)]
pub struct Explorer {
    config: ExplorerConfig,
    store: GraphStateStore,
    layout: LayoutEngine,
    viewport: ViewportController,
    clicks: ClickDetector,
    depth: Depth,
    /// Bumped each time a load replaces the graph
    epoch: u64,
    loads: Generation,
    expands: Generation,
    paths: Generation,
    searches: Generation,
    candidates: Vec<NodeSummary>,
    notice: Option<Notice>,
}

impl Explorer {
    pub fn new(config: ExplorerConfig) -> Self {
        Self {
            store: GraphStateStore::new(),
            layout: LayoutEngine::new(config.layout_config(), config.canvas_size()),
            viewport: ViewportController::new(config.viewport_config()),
            clicks: ClickDetector::new(config.double_click_window()),
            depth: config.depth(),
            epoch: 0,
            loads: Generation::default(),
            expands: Generation::default(),
            paths: Generation::default(),
            searches: Generation::default(),
            candidates: Vec::new(),
            notice: None,
            config,
        }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn store(&self) -> &GraphStateStore {
        &self.store
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn depth(&self) -> Depth {
        self.depth
    }

    /// Hop count used by every later load and expansion
    pub fn set_depth(&mut self, hops: u8) -> ExplorerResult<()> {
        self.depth = Depth::new(hops).ok_or(ExplorerError::InvalidDepth(hops))?;
        Ok(())
    }

    /// Latest applied search candidates
    pub fn candidates(&self) -> &[NodeSummary] {
        &self.candidates
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Whether any issued fetch or search has not been answered yet. Advisory
    /// only: every operation stays available while loading.
    pub fn is_loading(&self) -> bool {
        self.loads.is_pending()
            || self.expands.is_pending()
            || self.paths.is_pending()
            || self.searches.is_pending()
    }

    // ---- search ----

    pub fn request_search(&mut self, query: impl Into<String>) -> SearchTicket {
        SearchTicket {
            generation: self.searches.next(),
            query: query.into(),
            limit: self.config.search_limit,
        }
    }

    /// Store the candidates of the latest search. Returns whether they were
    /// applied; superseded results and failures leave the list as it was.
    pub fn apply_search(&mut self, ticket: &SearchTicket, result: ServiceResult<Vec<NodeSummary>>) -> bool {
        if !self.searches.is_latest(ticket.generation) {
            debug!("Discarding stale search results for {:?}", ticket.query);
            return false;
        }
        self.searches.settle();

        match result {
            Ok(mut candidates) => {
                candidates.truncate(ticket.limit);
                self.candidates = candidates;
                true
            }
            Err(e) => {
                warn!("Search for {:?} failed: {}", ticket.query, e);
                self.notice = Some(Notice::error(format!("Search failed: {}", e)));
                false
            }
        }
    }

    // ---- fetches ----

    /// Top-level load of `node_id`'s neighborhood. The graph is replaced only
    /// when the result arrives and is applied.
    pub fn request_load(&mut self, node_id: impl Into<NodeId>) -> FetchTicket {
        FetchTicket {
            kind: FetchKind::Load,
            generation: self.loads.next(),
            epoch: self.epoch,
            request: FetchRequest::Neighborhood(self.neighborhood_request(node_id.into())),
        }
    }

    /// Additive expansion of a node already in the graph
    pub fn request_expand(&mut self, node_id: &NodeId) -> ExplorerResult<FetchTicket> {
        if !self.store.contains_node(node_id) {
            return Err(ExplorerError::UnknownNode(node_id.clone()));
        }
        Ok(FetchTicket {
            kind: FetchKind::Expand,
            generation: self.expands.next(),
            epoch: self.epoch,
            request: FetchRequest::Neighborhood(self.neighborhood_request(node_id.clone())),
        })
    }

    /// Additive shortest-path lookup from a node in the graph to any node
    pub fn request_path(&mut self, start: &NodeId, end: impl Into<NodeId>) -> ExplorerResult<FetchTicket> {
        if !self.store.contains_node(start) {
            return Err(ExplorerError::UnknownNode(start.clone()));
        }
        Ok(FetchTicket {
            kind: FetchKind::Path,
            generation: self.paths.next(),
            epoch: self.epoch,
            request: FetchRequest::Path(PathRequest {
                start: start.clone(),
                end: end.into(),
                max_depth: self.config.path_max_depth,
            }),
        })
    }

    /// Apply a fetch result.
    ///
    /// Superseded tickets are discarded. Failures raise a notice and leave
    /// graph, layout and selection as they were. A successful load resets the
    /// graph and merges its result in the same step, then selects the loaded
    /// node; expansions and paths only merge.
    pub fn apply_fetch(&mut self, ticket: &FetchTicket, result: ServiceResult<Subgraph>) -> FetchOutcome {
        if !self.is_current(ticket) {
            debug!(
                "Discarding stale {} result for {} (generation {})",
                ticket.kind, ticket.target(), ticket.generation
            );
            return FetchOutcome::Discarded;
        }
        self.generation_mut(ticket.kind).settle();

        let subgraph = match result {
            Ok(subgraph) => subgraph,
            Err(e) => {
                warn!("{} of {} failed: {}", ticket.kind, ticket.target(), e);
                self.notice = Some(Notice::error(format!(
                    "Could not {} {}: {}",
                    ticket.kind,
                    ticket.target(),
                    e
                )));
                return FetchOutcome::Failed(e);
            }
        };

        if ticket.kind == FetchKind::Load {
            info!(
                "Loading neighborhood of {}: {} nodes, {} edges",
                ticket.target(),
                subgraph.nodes.len(),
                subgraph.edges.len()
            );
            self.store.reset();
            self.layout.reset();
            self.clicks.reset();
            self.epoch += 1;
            // Pending expansions and paths targeted the replaced graph
            self.expands.settle();
            self.paths.settle();
            self.notice = None;
        }

        let found_path = !subgraph.is_empty();
        let report = self.store.merge(subgraph.nodes, subgraph.edges);
        self.layout.apply(&self.store, &report);

        match (&ticket.kind, &ticket.request) {
            (FetchKind::Load, _) => {
                self.store.select(ticket.target());
            }
            (FetchKind::Path, FetchRequest::Path(request)) if !found_path => {
                self.notice = Some(Notice::info(format!(
                    "No path between {} and {} within {} hops",
                    request.start, request.end, request.max_depth
                )));
            }
            _ => {}
        }

        if report.dropped_count() > 0 {
            self.notice = Some(Notice::warning(format!(
                "{} relationship(s) pointed at nodes outside the graph and were skipped",
                report.dropped_count()
            )));
        }

        FetchOutcome::Applied(report)
    }

    fn is_current(&self, ticket: &FetchTicket) -> bool {
        match ticket.kind {
            FetchKind::Load => self.loads.is_latest(ticket.generation),
            FetchKind::Expand => ticket.epoch == self.epoch && self.expands.is_latest(ticket.generation),
            FetchKind::Path => ticket.epoch == self.epoch && self.paths.is_latest(ticket.generation),
        }
    }

    fn generation_mut(&mut self, kind: FetchKind) -> &mut Generation {
        match kind {
            FetchKind::Load => &mut self.loads,
            FetchKind::Expand => &mut self.expands,
            FetchKind::Path => &mut self.paths,
        }
    }

    fn neighborhood_request(&self, node_id: NodeId) -> NeighborhoodRequest {
        NeighborhoodRequest {
            node_id,
            depth: self.depth,
            direction: self.config.direction,
            limit: self.config.neighbor_limit,
        }
    }

    // ---- async drivers ----

    /// Search and store the candidates
    pub async fn search<S>(&mut self, service: &S, query: &str) -> &[NodeSummary]
    where
        S: GraphService + ?Sized,
    {
        let ticket = self.request_search(query);
        let result = ticket.fetch(service).await;
        self.apply_search(&ticket, result);
        &self.candidates
    }

    /// Replace the graph with the neighborhood of `node_id`
    pub async fn load<S>(&mut self, service: &S, node_id: impl Into<NodeId>) -> FetchOutcome
    where
        S: GraphService + ?Sized,
    {
        let ticket = self.request_load(node_id);
        let result = ticket.fetch(service).await;
        self.apply_fetch(&ticket, result)
    }

    /// Grow the graph with the neighborhood of `node_id`
    pub async fn expand<S>(&mut self, service: &S, node_id: &NodeId) -> ExplorerResult<FetchOutcome>
    where
        S: GraphService + ?Sized,
    {
        let ticket = self.request_expand(node_id)?;
        let result = ticket.fetch(service).await;
        Ok(self.apply_fetch(&ticket, result))
    }

    /// Grow the graph with a shortest path from `start` to `end`
    pub async fn find_path<S>(&mut self, service: &S, start: &NodeId, end: impl Into<NodeId>) -> ExplorerResult<FetchOutcome>
    where
        S: GraphService + ?Sized,
    {
        let ticket = self.request_path(start, end)?;
        let result = ticket.fetch(service).await;
        Ok(self.apply_fetch(&ticket, result))
    }

    // ---- selection ----

    /// Select a node; unknown ids are ignored
    pub fn select(&mut self, node_id: &NodeId) -> bool {
        self.store.select(node_id)
    }

    pub fn clear_selection(&mut self) {
        self.store.clear_selection();
    }

    /// Details panel content for the selected node
    pub fn details(&self) -> Option<NodeDetails<'_>> {
        let node = self.store.selected_node()?;
        Some(NodeDetails {
            node,
            connected: self.store.connected_nodes(&node.id),
            edges: self.store.edges_of(&node.id),
        })
    }

    // ---- layout ----

    pub fn position(&self, node_id: &NodeId) -> Option<GraphPoint> {
        self.layout.position(node_id)
    }

    /// Where a node is drawn on the canvas
    pub fn screen_position(&self, node_id: &NodeId) -> Option<ScreenPoint> {
        self.layout.position(node_id).map(|p| self.viewport.to_screen(p))
    }

    pub fn set_canvas_size(&mut self, canvas: CanvasSize) {
        self.layout.set_canvas_size(canvas);
    }

    /// Lay the whole graph out on the circle again (explicit user action)
    pub fn relayout(&mut self) -> usize {
        self.layout.relayout(&self.store)
    }

    // ---- viewport ----

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Wheel zoom around the cursor
    pub fn zoom_at(&mut self, screen_point: ScreenPoint, factor: f64) {
        self.viewport.zoom_at(screen_point, factor);
    }

    pub fn fit(&mut self) {
        self.viewport.fit();
    }

    // ---- pointer ----

    /// A press at `screen_point`. A node hit feeds the click detector; a miss
    /// starts a pan.
    pub fn pointer_down(&mut self, screen_point: ScreenPoint, at: Instant) -> PointerOutcome {
        let hit = self
            .viewport
            .hit_test(screen_point, self.layout.positions())
            .cloned();

        let Some(node_id) = hit else {
            self.clicks.press_background();
            self.viewport.begin_pan(screen_point);
            return PointerOutcome::PanStarted;
        };

        self.store.select(&node_id);
        match self.clicks.press_node(&node_id, at) {
            ClickKind::Single => PointerOutcome::Selected(node_id),
            ClickKind::Double => match self.request_expand(&node_id) {
                Ok(ticket) => PointerOutcome::ExpandRequested(ticket),
                Err(_) => PointerOutcome::Selected(node_id),
            },
        }
    }

    /// Pointer motion; pans while a drag is active. Returns whether the view moved.
    pub fn pointer_move(&mut self, screen_point: ScreenPoint) -> bool {
        self.viewport.update_pan(screen_point)
    }

    pub fn pointer_up(&mut self) {
        self.viewport.end_pan();
    }
}

impl Default for Explorer {
    fn default() -> Self {
        Self::new(ExplorerConfig::default())
    }
}
