//! Exploration session
//!
//! Turns user actions into fetches and fetch results into graph growth. A
//! top-level load replaces the canonical graph; an expansion or path lookup
//! adds to it. The three state owners (graph store, layout, viewport) stay
//! independent; the session only sequences calls between them.

pub mod session;
pub mod ticket;

use crate::graph::NodeId;
use thiserror::Error;

pub use session::{Explorer, NodeDetails, PointerOutcome};
pub use ticket::{FetchKind, FetchOutcome, FetchRequest, FetchTicket, SearchTicket};

/// Explorer errors. Fetch failures are not among them: those become a
/// [`Notice`] and leave the graph untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExplorerError {
    /// Expansion requested for a node the canonical graph does not hold
    #[error("Node {0} is not in the graph")]
    UnknownNode(NodeId),

    #[error("Depth must be between 1 and 3, got {0}")]
    InvalidDepth(u8),
}

pub type ExplorerResult<T> = Result<T, ExplorerError>;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A dismissible inline message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}
