//! Plain data row types written by output backends.

use fb_bridge::{BridgeEvent, ExchangeStats};

/// One request lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventRow {
    pub time:         f64,
    /// `submitted`, `scheduled`, `rejected`, `picked_up`, or `dropped_off`.
    pub kind:         &'static str,
    pub request:      u32,
    /// Empty for `submitted` and `rejected`.
    pub vehicle:      Option<u32>,
    /// Only set for `scheduled`.
    pub pickup_time:  Option<f64>,
    pub dropoff_time: Option<f64>,
}

impl From<&BridgeEvent> for EventRow {
    fn from(event: &BridgeEvent) -> Self {
        let (pickup_time, dropoff_time) = match *event {
            BridgeEvent::RequestScheduled { pickup_time, dropoff_time, .. } => {
                (Some(pickup_time), Some(dropoff_time))
            }
            _ => (None, None),
        };
        Self {
            time:    event.time(),
            kind:    event.kind(),
            request: event.request().0,
            vehicle: event.vehicle().map(|v| v.0),
            pickup_time,
            dropoff_time,
        }
    }
}

/// Counters for one exchange with the optimizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeRow {
    pub time:                 f64,
    pub queries_answered:     usize,
    pub vehicles_rescheduled: usize,
    pub requests_submitted:   usize,
    pub requests_scheduled:   usize,
    pub requests_rejected:    usize,
}

impl ExchangeRow {
    pub fn new(time: f64, stats: &ExchangeStats) -> Self {
        Self {
            time,
            queries_answered:     stats.queries_answered,
            vehicles_rescheduled: stats.vehicles_rescheduled,
            requests_submitted:   stats.requests_submitted,
            requests_scheduled:   stats.requests_scheduled,
            requests_rejected:    stats.requests_rejected,
        }
    }
}
