//! Protocol-layer error type.

use thiserror::Error;

/// Errors produced while encoding, decoding, or moving frames.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The payload is not a well-formed message.
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("frame of {len} bytes exceeds the {max}-byte limit")]
    FrameTooLarge { len: usize, max: usize },

    #[error("peer closed the connection")]
    ConnectionClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
