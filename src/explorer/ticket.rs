//! Fetch tickets and generation counters
//!
//! Every fetch the explorer issues is described by a ticket stamped with a
//! generation number for its action kind. When the result arrives the ticket
//! is checked against the latest generation; a superseded ticket's result is
//! discarded instead of being merged. Nothing is cancelled preemptively.

use crate::client::{
    GraphService, NeighborhoodRequest, NodeSummary, PathRequest, ServiceError, ServiceResult,
    Subgraph,
};
use crate::graph::{MergeReport, NodeId};
use std::fmt;

/// The logical action a fetch belongs to. A newer request supersedes older
/// ones of the same kind only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    /// Top-level load: replaces the canonical graph
    Load,
    /// Expand in place: grows the canonical graph
    Expand,
    /// Shortest path between two nodes, merged additively
    Path,
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchKind::Load => write!(f, "load"),
            FetchKind::Expand => write!(f, "expand"),
            FetchKind::Path => write!(f, "path"),
        }
    }
}

/// What to ask the service for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Neighborhood(NeighborhoodRequest),
    Path(PathRequest),
}

/// An issued fetch awaiting its result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub(crate) kind: FetchKind,
    pub(crate) generation: u64,
    /// Graph epoch at issue time; loads bump the epoch when they apply
    pub(crate) epoch: u64,
    pub(crate) request: FetchRequest,
}

impl FetchTicket {
    pub fn kind(&self) -> FetchKind {
        self.kind
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request(&self) -> &FetchRequest {
        &self.request
    }

    /// The node the fetch is centered on (the start node for paths)
    pub fn target(&self) -> &NodeId {
        match &self.request {
            FetchRequest::Neighborhood(request) => &request.node_id,
            FetchRequest::Path(request) => &request.start,
        }
    }

    /// Run the fetch. Takes `&self` so the ticket can be handed back to
    /// [`Explorer::apply_fetch`](super::Explorer::apply_fetch) afterwards.
    pub async fn fetch<S>(&self, service: &S) -> ServiceResult<Subgraph>
    where
        S: GraphService + ?Sized,
    {
        match &self.request {
            FetchRequest::Neighborhood(request) => service.fetch_neighborhood(request).await,
            FetchRequest::Path(request) => service.fetch_path(request).await,
        }
    }
}

/// An issued type-ahead search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub(crate) generation: u64,
    pub(crate) query: String,
    pub(crate) limit: usize,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub async fn fetch<S>(&self, service: &S) -> ServiceResult<Vec<NodeSummary>>
    where
        S: GraphService + ?Sized,
    {
        service.search(&self.query, self.limit).await
    }
}

/// Result of handing a fetch result back to the explorer
#[derive(Debug)]
pub enum FetchOutcome {
    /// Merged into the canonical graph
    Applied(MergeReport),
    /// Superseded by a newer request; nothing changed
    Discarded,
    /// The service call failed; nothing changed, a notice was raised
    Failed(ServiceError),
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FetchOutcome::Applied(_))
    }

    pub fn is_discarded(&self) -> bool {
        matches!(self, FetchOutcome::Discarded)
    }

    pub fn report(&self) -> Option<&MergeReport> {
        match self {
            FetchOutcome::Applied(report) => Some(report),
            _ => None,
        }
    }
}

/// Issued/settled counter pair for one action kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Generation {
    issued: u64,
    settled: u64,
}

impl Generation {
    /// Issue a new generation, superseding all earlier ones
    pub(crate) fn next(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    pub(crate) fn is_latest(&self, generation: u64) -> bool {
        generation == self.issued
    }

    /// Mark everything issued so far as answered or abandoned
    pub(crate) fn settle(&mut self) {
        self.settled = self.issued;
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.settled != self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Depth, Direction};

    #[test]
    fn test_generation_supersedes() {
        let mut generation = Generation::default();
        assert!(!generation.is_pending());

        let first = generation.next();
        let second = generation.next();
        assert!(!generation.is_latest(first));
        assert!(generation.is_latest(second));
        assert!(generation.is_pending());

        generation.settle();
        assert!(!generation.is_pending());
        assert!(generation.is_latest(second));
    }

    #[test]
    fn test_ticket_target() {
        let neighborhood = FetchTicket {
            kind: FetchKind::Expand,
            generation: 1,
            epoch: 0,
            request: FetchRequest::Neighborhood(NeighborhoodRequest {
                node_id: NodeId::new("a"),
                depth: Depth::MIN,
                direction: Direction::Both,
                limit: 10,
            }),
        };
        assert_eq!(neighborhood.target().as_str(), "a");
        assert_eq!(neighborhood.kind().to_string(), "expand");

        let path = FetchTicket {
            kind: FetchKind::Path,
            generation: 1,
            epoch: 0,
            request: FetchRequest::Path(PathRequest {
                start: NodeId::new("s"),
                end: NodeId::new("t"),
                max_depth: 5,
            }),
        };
        assert_eq!(path.target().as_str(), "s");
    }
}
