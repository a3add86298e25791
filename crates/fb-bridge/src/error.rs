//! Bridge error type.
//!
//! Every variant is fatal: the bridge has no retry tier.  Variants carry the
//! ids needed to name the offending request or vehicle in the final message.

use thiserror::Error;

use fb_core::{LinkId, RequestId, VehicleId};
use fb_network::NetworkError;
use fb_protocol::ProtocolError;
use fb_schedule::ScheduleError;

use crate::registry::Slot;

#[derive(Debug, Error)]
pub enum BridgeError {
    // ── Transport & protocol ──────────────────────────────────────────────
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("expected {expected} from the optimizer, received {found}")]
    UnexpectedMessage { expected: &'static str, found: &'static str },

    /// An operation would break strict send/receive alternation.
    #[error("cannot {0} now: the channel must alternate sends and receives")]
    OutOfTurn(&'static str),

    #[error("the exchange channel is closed")]
    ChannelClosed,

    // ── Unknown ids ───────────────────────────────────────────────────────
    #[error("unknown vehicle {0}")]
    UnknownVehicle(VehicleId),

    #[error("unknown request {0}")]
    UnknownRequest(RequestId),

    #[error("unknown link {0}")]
    UnknownLink(LinkId),

    #[error("request {0} was submitted twice")]
    DuplicateRequest(RequestId),

    // ── Assignment invariants ─────────────────────────────────────────────
    #[error("request {request} is assigned for {slot} to vehicle {claimed_by} but is already assigned to vehicle {held_by}")]
    SlotConflict { request: RequestId, slot: Slot, held_by: VehicleId, claimed_by: VehicleId },

    #[error("request {request} has {assigned} assigned to vehicle {vehicle} but no {missing}")]
    HalfAssigned { request: RequestId, vehicle: VehicleId, assigned: Slot, missing: Slot },

    #[error("request {request} is assigned for pickup to vehicle {pickup} and for dropoff to vehicle {dropoff}")]
    SplitAssignment { request: RequestId, pickup: VehicleId, dropoff: VehicleId },

    #[error("request {request} cannot be rejected: it is assigned to vehicle {vehicle}")]
    RejectedAssigned { request: RequestId, vehicle: VehicleId },

    #[error("vehicle {vehicle}: route to stop on link {stop_link} ends on {route_end:?}")]
    RouteMismatch { vehicle: VehicleId, stop_link: LinkId, route_end: Option<LinkId> },

    #[error("vehicle {vehicle}: route link {to} does not follow link {from}")]
    RouteDisconnected { vehicle: VehicleId, from: LinkId, to: LinkId },

    #[error("vehicle {0} has completed its schedule and cannot take new stops")]
    VehicleOutOfService(VehicleId),

    #[error("vehicle {vehicle}: {source}")]
    Routing { vehicle: VehicleId, source: NetworkError },

    #[error("vehicle {vehicle}: {source}")]
    Schedule { vehicle: VehicleId, source: ScheduleError },

    #[error("internal invariant violated: {0}")]
    Invariant(String),

    // ── Lifecycle ─────────────────────────────────────────────────────────
    #[error("the bridge stopped after an earlier fatal error")]
    Poisoned,
}

pub type BridgeResult<T> = Result<T, BridgeError>;
