//! The per-step entry point: one exchange with the optimizer per simulation step.

use std::sync::Arc;

use fb_network::{Network, Router, TravelTime};
use fb_protocol::{Message, Transport};
use fb_schedule::Fleet;

use crate::channel::{ChannelState, ExchangeChannel};
use crate::events::{BridgeEvent, BridgeObserver, ExchangeStats};
use crate::inbox::{EventSender, InboundEvent, Inbox};
use crate::oracle::TravelTimeOracle;
use crate::reconciler::Reconciler;
use crate::registry::RequestRegistry;
use crate::snapshot::{iteration_message, SnapshotBuilder};
use crate::{BridgeError, BridgeResult};

/// Couples a host simulation to the optimizer.
///
/// Call [`on_step`](Self::on_step) once per simulation step and
/// [`finalize`](Self::finalize) once at teardown.  Events from the host
/// (submissions, pickups, dropoffs) go through an [`EventSender`] from
/// [`sender`](Self::sender).
///
/// The first step sends the fleet roster (`iteration`); every later step
/// sends a `state` snapshot.  Events queued before the first `state` are
/// held back until then.
pub struct FleetBridge<T: Transport, R: Router> {
    channel:     ExchangeChannel<T>,
    network:     Arc<Network>,
    router:      R,
    travel_time: Box<dyn TravelTime>,
    registry:    RequestRegistry,
    inbox:       Inbox,
    snapshot:    SnapshotBuilder,
    iteration:   u32,
    poisoned:    bool,
}

impl<T: Transport, R: Router> FleetBridge<T, R> {
    pub fn new(transport: T, network: Arc<Network>, router: R, travel_time: Box<dyn TravelTime>) -> Self {
        Self {
            channel: ExchangeChannel::new(transport),
            network,
            router,
            travel_time,
            registry: RequestRegistry::new(),
            inbox: Inbox::new(),
            snapshot: SnapshotBuilder::new(),
            iteration: 0,
            poisoned: false,
        }
    }

    /// Iteration number announced in the roster.  Defaults to 0.
    pub fn with_iteration(mut self, iteration: u32) -> Self {
        self.iteration = iteration;
        self
    }

    /// A producer handle for host-side events.
    pub fn sender(&self) -> EventSender {
        self.inbox.sender()
    }

    pub fn registry(&self) -> &RequestRegistry {
        &self.registry
    }

    pub fn channel_state(&self) -> ChannelState {
        self.channel.state()
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    // ── Per step ──────────────────────────────────────────────────────────

    /// Run one full exchange at simulated time `now` and apply the returned
    /// assignment to `fleet`.
    ///
    /// Blocks until the optimizer answers.  Any error poisons the bridge.
    pub fn on_step<O: BridgeObserver>(&mut self, now: f64, fleet: &mut Fleet, observer: &mut O) -> BridgeResult<()> {
        if self.poisoned {
            return Err(BridgeError::Poisoned);
        }
        let result = self.step(now, fleet, observer);
        if let Err(err) = &result {
            log::error!("fatal bridge error at t={now}: {err}");
            self.poisoned = true;
        }
        result
    }

    fn step<O: BridgeObserver>(&mut self, now: f64, fleet: &mut Fleet, observer: &mut O) -> BridgeResult<()> {
        let mut stats = ExchangeStats::default();

        let (outbound, query_time) = if self.channel.exchanges() == 0 {
            log::info!("starting iteration {} with {} vehicles", self.iteration, fleet.len());
            (Message::Iteration(iteration_message(self.iteration, fleet)), 0.0)
        } else {
            stats.requests_submitted = self.ingest(observer)?;
            (Message::State(self.snapshot.build(now, fleet)), now)
        };

        let oracle = TravelTimeOracle::new(&self.network, self.travel_time.as_ref());
        let exchange = self.channel.exchange(&outbound, &oracle, query_time)?;
        stats.queries_answered = exchange.queries_answered;
        stats.vehicles_rescheduled = exchange.assignment.stops.len();

        let reconciler = Reconciler::new(&self.network, &self.router, self.travel_time.as_ref());
        let events = reconciler.apply(&exchange.assignment, now, fleet, &mut self.registry)?;
        for event in &events {
            match event {
                BridgeEvent::RequestScheduled { .. } => stats.requests_scheduled += 1,
                BridgeEvent::RequestRejected { .. } => stats.requests_rejected += 1,
                _ => {}
            }
            observer.on_event(event);
        }

        observer.on_exchange(now, &stats);
        Ok(())
    }

    /// Drain the inbox into the registry and the snapshot accumulators.
    /// Returns the number of newly submitted requests.
    fn ingest<O: BridgeObserver>(&mut self, observer: &mut O) -> BridgeResult<usize> {
        let mut submitted = 0;
        log::debug!("draining {} inbound events", self.inbox.pending());
        for event in self.inbox.drain() {
            let reported = match event {
                InboundEvent::Submitted(request) => {
                    self.registry.register(request.id)?;
                    self.snapshot.record_submitted(&request);
                    submitted += 1;
                    BridgeEvent::RequestSubmitted { time: request.submission_time, request: request.id }
                }
                InboundEvent::PickedUp { time, request, vehicle } => {
                    self.snapshot.record_pickup(request, vehicle);
                    BridgeEvent::PassengerPickedUp { time, request, vehicle }
                }
                InboundEvent::DroppedOff { time, request, vehicle } => {
                    self.snapshot.record_dropoff(request, vehicle);
                    self.registry.remove(request);
                    BridgeEvent::PassengerDroppedOff { time, request, vehicle }
                }
            };
            observer.on_event(&reported);
        }
        Ok(submitted)
    }

    // ── Teardown ──────────────────────────────────────────────────────────

    /// Send `finalization` once.  Safe to call after a fatal error and more
    /// than once.
    pub fn finalize(&mut self) -> BridgeResult<()> {
        self.channel.finalize()
    }
}
