//! Error types for the graph service boundary

use crate::graph::NodeId;
use thiserror::Error;

/// Errors that can occur when talking to the graph service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The service answered with a non-success status
    #[error("Service error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The requested start node does not exist on the service
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    /// The request could not be built (bad base URL, empty query, ...)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
