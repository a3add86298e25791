//! Network-subsystem error type.

use thiserror::Error;

use fb_core::LinkId;

/// Errors produced by `fb-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("no route from link {from} to link {to}")]
    NoRoute { from: LinkId, to: LinkId },

    #[error("link {0} not found in network")]
    LinkNotFound(LinkId),

    #[error("a path needs at least one link")]
    EmptyPath,

    #[error("invalid travel-time model: {0}")]
    InvalidTravelTime(String),

    #[error("network parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
