//! Request lifecycle events and the observer that receives them.

use fb_core::{RequestId, VehicleId};

// ── BridgeEvent ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum BridgeEvent {
    /// The optimizer has been told about a new request.
    RequestSubmitted { time: f64, request: RequestId },
    /// A request became fully assigned for the first time.
    RequestScheduled {
        time:         f64,
        request:      RequestId,
        vehicle:      VehicleId,
        /// End of the stop holding the pickup.
        pickup_time:  f64,
        /// Begin of the stop holding the dropoff.
        dropoff_time: f64,
    },
    /// The optimizer refused a request.
    RequestRejected { time: f64, request: RequestId },
    PassengerPickedUp { time: f64, request: RequestId, vehicle: VehicleId },
    PassengerDroppedOff { time: f64, request: RequestId, vehicle: VehicleId },
}

impl BridgeEvent {
    pub fn time(&self) -> f64 {
        match self {
            BridgeEvent::RequestSubmitted { time, .. }
            | BridgeEvent::RequestScheduled { time, .. }
            | BridgeEvent::RequestRejected { time, .. }
            | BridgeEvent::PassengerPickedUp { time, .. }
            | BridgeEvent::PassengerDroppedOff { time, .. } => *time,
        }
    }

    pub fn request(&self) -> RequestId {
        match self {
            BridgeEvent::RequestSubmitted { request, .. }
            | BridgeEvent::RequestScheduled { request, .. }
            | BridgeEvent::RequestRejected { request, .. }
            | BridgeEvent::PassengerPickedUp { request, .. }
            | BridgeEvent::PassengerDroppedOff { request, .. } => *request,
        }
    }

    pub fn vehicle(&self) -> Option<VehicleId> {
        match self {
            BridgeEvent::RequestScheduled { vehicle, .. }
            | BridgeEvent::PassengerPickedUp { vehicle, .. }
            | BridgeEvent::PassengerDroppedOff { vehicle, .. } => Some(*vehicle),
            BridgeEvent::RequestSubmitted { .. } | BridgeEvent::RequestRejected { .. } => None,
        }
    }

    /// Short snake_case label, e.g. for a CSV `kind` column.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeEvent::RequestSubmitted { .. }    => "submitted",
            BridgeEvent::RequestScheduled { .. }    => "scheduled",
            BridgeEvent::RequestRejected { .. }     => "rejected",
            BridgeEvent::PassengerPickedUp { .. }   => "picked_up",
            BridgeEvent::PassengerDroppedOff { .. } => "dropped_off",
        }
    }
}

// ── ExchangeStats ─────────────────────────────────────────────────────────────

/// Counters for one completed exchange.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ExchangeStats {
    /// Travel-time queries answered inside the exchange.
    pub queries_answered:     usize,
    /// Vehicles listed in the assignment.
    pub vehicles_rescheduled: usize,
    /// Requests reported to the optimizer as newly submitted.
    pub requests_submitted:   usize,
    pub requests_scheduled:   usize,
    pub requests_rejected:    usize,
}

// ── BridgeObserver ────────────────────────────────────────────────────────────

/// Callbacks invoked by [`FleetBridge::on_step`][crate::FleetBridge::on_step].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
pub trait BridgeObserver {
    /// Called for every lifecycle event, in the order the bridge observes
    /// them.
    fn on_event(&mut self, _event: &BridgeEvent) {}

    /// Called after each completed exchange.
    fn on_exchange(&mut self, _now: f64, _stats: &ExchangeStats) {}
}

/// A [`BridgeObserver`] that does nothing.
pub struct NoopObserver;

impl BridgeObserver for NoopObserver {}

/// Collects every event.  Handy in tests and for small runs.
#[derive(Debug, Default)]
pub struct EventLog {
    pub events:    Vec<BridgeEvent>,
    pub exchanges: Vec<(f64, ExchangeStats)>,
}

impl BridgeObserver for EventLog {
    fn on_event(&mut self, event: &BridgeEvent) {
        self.events.push(event.clone());
    }

    fn on_exchange(&mut self, now: f64, stats: &ExchangeStats) {
        self.exchanges.push((now, *stats));
    }
}
