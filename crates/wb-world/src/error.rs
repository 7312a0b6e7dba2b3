//! World-subsystem error type.

use thiserror::Error;

use wb_core::NodeId;

/// Errors produced by `wb-world`.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in world graph")]
    NodeNotFound(NodeId),

    #[error("node {0} has been removed from the world")]
    NodeRemoved(NodeId),

    #[error("road {index} is invalid: {reason}")]
    BadRoad { index: usize, reason: String },

    #[error("world data parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type WorldResult<T> = Result<T, WorldError>;
