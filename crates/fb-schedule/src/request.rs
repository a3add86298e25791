//! Passenger requests.

use fb_core::{LinkId, RequestId};

/// Passengers per request.  The optimizer protocol only knows single riders.
pub const PASSENGERS_PER_REQUEST: u32 = 1;

/// A trip request as submitted to the fleet.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub id:               RequestId,
    pub origin:           LinkId,
    pub destination:      LinkId,
    pub submission_time:  f64,
    pub earliest_pickup:  f64,
    pub latest_pickup:    f64,
    pub latest_arrival:   f64,
    pub passengers:       u32,
}

impl Request {
    /// A request that may be served any time after `submission_time`.
    pub fn new(id: RequestId, origin: LinkId, destination: LinkId, submission_time: f64) -> Self {
        Self {
            id,
            origin,
            destination,
            submission_time,
            earliest_pickup: submission_time,
            latest_pickup:   f64::INFINITY,
            latest_arrival:  f64::INFINITY,
            passengers:      PASSENGERS_PER_REQUEST,
        }
    }

    pub fn with_window(mut self, earliest_pickup: f64, latest_pickup: f64, latest_arrival: f64) -> Self {
        self.earliest_pickup = earliest_pickup;
        self.latest_pickup = latest_pickup;
        self.latest_arrival = latest_arrival;
        self
    }
}
