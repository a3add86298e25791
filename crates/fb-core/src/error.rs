//! Base error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where they need it.

use thiserror::Error;

use crate::{LinkId, RequestId, VehicleId};

/// The error type for `fb-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("vehicle {0} not found")]
    VehicleNotFound(VehicleId),

    #[error("request {0} not found")]
    RequestNotFound(RequestId),

    #[error("link {0} not found")]
    LinkNotFound(LinkId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `fb-core`.
pub type CoreResult<T> = Result<T, CoreError>;
