use thiserror::Error;

use fb_core::{LinkId, RequestId, VehicleId};

#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Task `task` breaks contiguity, linkage, or has a negative duration.
    #[error("schedule inconsistent at task {task}: {reason}")]
    Inconsistent { task: usize, reason: String },

    #[error("diversion must start on link {expected}, new path starts on {found}")]
    DiversionMismatch { expected: LinkId, found: LinkId },

    #[error("vehicle {0} is defined twice")]
    DuplicateVehicle(VehicleId),

    #[error("request {0} is defined twice")]
    DuplicateRequest(RequestId),

    #[error("schedule parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
