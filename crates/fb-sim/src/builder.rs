//! Fluent builder for constructing a [`FleetSim`].

use std::sync::Arc;

use fb_bridge::FleetBridge;
use fb_core::BridgeConfig;
use fb_network::{FreeSpeedTravelTime, Network, Router, TravelTime};
use fb_protocol::Transport;
use fb_schedule::{Fleet, Request};

use crate::{FleetSim, SimError, SimResult};

/// Fluent builder for [`FleetSim<T, R>`].
///
/// # Required inputs
///
/// - [`BridgeConfig`]: time range and step length
/// - `T: Transport`: a connected optimizer (e.g. an accepted
///   [`fb_protocol::FramedStream`])
/// - the [`Network`] shared by routing and travel-time queries
/// - `R: Router`: the routing algorithm (e.g. [`fb_network::DijkstraRouter`])
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                 |
/// |---------------------|-------------------------|
/// | `.fleet(f)`         | empty fleet             |
/// | `.demand(v)`        | no requests             |
/// | `.travel_time(tt)`  | `FreeSpeedTravelTime`   |
/// | `.iteration(n)`     | `0`                     |
///
/// # Example
///
/// ```rust,ignore
/// let stream = FramedListener::bind(config.endpoint(), config.max_frame_bytes)?.accept()?;
/// let mut sim = SimBuilder::new(config, stream, network, DijkstraRouter)
///     .fleet(fleet)
///     .demand(requests)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<T: Transport, R: Router> {
    config:      BridgeConfig,
    transport:   T,
    network:     Arc<Network>,
    router:      R,
    fleet:       Option<Fleet>,
    demand:      Option<Vec<Request>>,
    travel_time: Option<Box<dyn TravelTime>>,
    iteration:   u32,
}

impl<T: Transport, R: Router> SimBuilder<T, R> {
    /// Create a builder with all required inputs.
    pub fn new(config: BridgeConfig, transport: T, network: Arc<Network>, router: R) -> Self {
        Self {
            config,
            transport,
            network,
            router,
            fleet:       None,
            demand:      None,
            travel_time: None,
            iteration:   0,
        }
    }

    pub fn fleet(mut self, fleet: Fleet) -> Self {
        self.fleet = Some(fleet);
        self
    }

    /// Supply the requests to submit.  They need not be sorted.
    pub fn demand(mut self, requests: Vec<Request>) -> Self {
        self.demand = Some(requests);
        self
    }

    /// Supply the travel-time model used for routing and queries.
    pub fn travel_time(mut self, travel_time: Box<dyn TravelTime>) -> Self {
        self.travel_time = Some(travel_time);
        self
    }

    pub fn iteration(mut self, iteration: u32) -> Self {
        self.iteration = iteration;
        self
    }

    /// Validate inputs, wire the bridge, and return a ready-to-run
    /// [`FleetSim`].
    pub fn build(self) -> SimResult<FleetSim<T, R>> {
        self.config.validate()?;

        let fleet = self.fleet.unwrap_or_default();
        for vehicle in fleet.iter() {
            if !self.network.contains(vehicle.start_link) {
                return Err(SimError::Config(format!(
                    "vehicle {} starts on unknown link {}",
                    vehicle.id, vehicle.start_link
                )));
            }
        }

        let mut requests = self.demand.unwrap_or_default();
        for request in &requests {
            for link in [request.origin, request.destination] {
                if !self.network.contains(link) {
                    return Err(SimError::Config(format!(
                        "request {} refers to unknown link {link}",
                        request.id
                    )));
                }
            }
        }
        requests.sort_by(|a, b| a.submission_time.total_cmp(&b.submission_time));

        let travel_time = self.travel_time.unwrap_or_else(|| Box::new(FreeSpeedTravelTime));
        let bridge = FleetBridge::new(self.transport, self.network, self.router, travel_time)
            .with_iteration(self.iteration);
        let events = bridge.sender();

        Ok(FleetSim {
            clock: self.config.make_clock(),
            fleet,
            bridge,
            requests,
            next_request: 0,
            events,
        })
    }
}
