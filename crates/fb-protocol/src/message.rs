//! Typed wire vocabulary.
//!
//! Every message is one JSON object whose `@message` field names the variant:
//!
//! ```json
//! { "@message": "travel_time_query", "links": ["3", "7"] }
//! ```
//!
//! Struct fields are camelCase on the wire.  Ids are decimal strings and
//! unbounded times are `null` (see [`crate::unbounded`]).  Fields the bridge
//! does not use (an assignment's `waitFor`, a stop's `id`) are accepted and
//! ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use fb_core::{LinkId, RequestId, VehicleId};

use crate::unbounded;

// ── Message ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@message", rename_all = "snake_case")]
pub enum Message {
    /// Peer → bridge, once: the optimizer is ready.
    Initialization,
    /// Bridge → peer, once at teardown.  Never answered.
    Finalization,
    /// Bridge → peer: fleet roster opening a run.
    Iteration(IterationMessage),
    /// Bridge → peer: per-step snapshot.
    State(StateMessage),
    /// Peer → bridge, any number of times inside one exchange.
    TravelTimeQuery(TravelTimeQuery),
    /// Bridge → peer: answer to the preceding query.
    TravelTimeResponse(TravelTimeResponse),
    /// Peer → bridge: ends an exchange.
    Assignment(AssignmentMessage),
}

impl Message {
    /// The `@message` tag of this variant.
    pub fn tag(&self) -> &'static str {
        match self {
            Message::Initialization        => "initialization",
            Message::Finalization          => "finalization",
            Message::Iteration(_)          => "iteration",
            Message::State(_)              => "state",
            Message::TravelTimeQuery(_)    => "travel_time_query",
            Message::TravelTimeResponse(_) => "travel_time_response",
            Message::Assignment(_)         => "assignment",
        }
    }
}

// ── Iteration ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationMessage {
    pub iteration: u32,
    pub vehicles:  Vec<IterationVehicle>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationVehicle {
    pub id:         VehicleId,
    pub start_link: LinkId,
    pub capacity:   u32,
}

// ── State ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMessage {
    pub time:        f64,
    /// Requests picked up since the last exchange → vehicle.
    #[serde(default)]
    pub picked_up:   BTreeMap<RequestId, VehicleId>,
    /// Requests dropped off since the last exchange → vehicle.
    #[serde(default)]
    pub dropped_off: BTreeMap<RequestId, VehicleId>,
    #[serde(default)]
    pub vehicles:    Vec<VehicleState>,
    /// Requests submitted since the last exchange.
    #[serde(default)]
    pub submitted:   Vec<SubmittedRequest>,
}

/// What a vehicle is doing right now.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Stay,
    Stop,
    Drive,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleState {
    pub id:                VehicleId,
    pub current_link:      LinkId,
    /// When the vehicle frees `current_link`.  `null` while unbounded.
    #[serde(default = "unbounded::upper_default", with = "unbounded::upper")]
    pub current_exit_time: f64,
    /// Earliest link at which the vehicle can change course.
    pub diverge_link:      LinkId,
    #[serde(default = "unbounded::upper_default", with = "unbounded::upper")]
    pub diverge_time:      f64,
    pub state:             VehicleStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedRequest {
    pub id:                   RequestId,
    pub origin_link:          LinkId,
    pub destination_link:     LinkId,
    #[serde(default = "unbounded::lower_default", with = "unbounded::lower")]
    pub earliest_pickup_time: f64,
    #[serde(default = "unbounded::upper_default", with = "unbounded::upper")]
    pub latest_pickup_time:   f64,
    #[serde(default = "unbounded::upper_default", with = "unbounded::upper")]
    pub latest_arrival_time:  f64,
    pub size:                 u32,
}

// ── Travel-time query ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelTimeQuery {
    /// Links to evaluate.  Empty means every link of the network.
    #[serde(default)]
    pub links: Vec<LinkId>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelTimeResponse {
    pub travel_times: BTreeMap<LinkId, f64>,
}

// ── Assignment ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentMessage {
    /// Ordered stops per vehicle.  Absent vehicles are left untouched; an
    /// empty list clears the vehicle's pending work.
    #[serde(default)]
    pub stops:      BTreeMap<VehicleId, Vec<AssignedStop>>,
    /// Requests the optimizer will not serve.
    #[serde(default)]
    pub rejections: Vec<RequestId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedStop {
    pub link:                LinkId,
    #[serde(default)]
    pub pickup:              Vec<RequestId>,
    #[serde(default)]
    pub dropoff:             Vec<RequestId>,
    /// Explicit link sequence to reach `link`.  Routed by the bridge when
    /// absent.
    #[serde(default)]
    pub route:               Option<Vec<LinkId>>,
    #[serde(default = "unbounded::lower_default", with = "unbounded::lower")]
    pub earliest_start_time: f64,
    #[serde(default)]
    pub stop_duration:       f64,
}

impl AssignedStop {
    /// A stop on `link` with no passengers, no route, and no time window.
    pub fn at(link: LinkId) -> Self {
        Self {
            link,
            pickup:              Vec::new(),
            dropoff:             Vec::new(),
            route:               None,
            earliest_start_time: f64::NEG_INFINITY,
            stop_duration:       0.0,
        }
    }

    pub fn has_passengers(&self) -> bool {
        !self.pickup.is_empty() || !self.dropoff.is_empty()
    }
}
