//! The `FleetSim` struct and its step loop.

use fb_bridge::{BridgeObserver, EventSender, FleetBridge};
use fb_core::{format_hms, StepClock};
use fb_network::Router;
use fb_protocol::Transport;
use fb_schedule::{Fleet, Request};

use crate::advance::advance_fleet;
use crate::SimResult;

/// What a finished run did.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    /// Steps executed, each with one exchange.
    pub steps:              u64,
    /// Clock time after the last step.
    pub final_time:         f64,
    /// Requests handed to the bridge.
    pub requests_submitted: usize,
}

// ── FleetSim ──────────────────────────────────────────────────────────────────

/// Fixed-step host simulation driving a [`FleetBridge`].
///
/// Each step:
///
/// 1. **Submissions**: requests whose submission time has come are queued on
///    the bridge's inbox.
/// 2. **Vehicles**: every schedule is advanced to `now` (optionally in
///    parallel with the `parallel` feature); passenger events are queued in
///    vehicle-id order.
/// 3. **Exchange**: [`FleetBridge::on_step`] talks to the optimizer and
///    rewrites schedules.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct FleetSim<T: Transport, R: Router> {
    /// Simulation clock.
    pub clock: StepClock,

    /// Every vehicle and its schedule.
    pub fleet: Fleet,

    /// The optimizer bridge.  Finalized at the end of [`run`](Self::run).
    pub bridge: FleetBridge<T, R>,

    /// Demand, sorted by submission time.
    pub(crate) requests: Vec<Request>,

    /// Index of the next request to submit.
    pub(crate) next_request: usize,

    pub(crate) events: EventSender,
}

impl<T: Transport, R: Router> FleetSim<T, R> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current time to the clock's end, then finalize the
    /// bridge.  The bridge is finalized on error too.
    pub fn run<O: BridgeObserver>(&mut self, observer: &mut O) -> SimResult<RunSummary> {
        log::info!(
            "running {} vehicles from {} to {} in {} s steps",
            self.fleet.len(),
            format_hms(self.clock.now),
            format_hms(self.clock.end_time),
            self.clock.step_secs
        );

        let mut steps = 0;
        let result = loop {
            if self.clock.is_finished() {
                break Ok(());
            }
            if let Err(err) = self.process_step(observer) {
                break Err(err);
            }
            steps += 1;
            self.clock.advance();
        };

        let finalized = self.bridge.finalize();
        result?;
        finalized?;

        log::info!("run finished at {} after {steps} steps", format_hms(self.clock.now));
        Ok(self.summary(steps))
    }

    /// Run exactly `n` steps from the current time (ignores the clock's end
    /// and does not finalize).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_steps<O: BridgeObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.process_step(observer)?;
            self.clock.advance();
        }
        Ok(())
    }

    /// Requests not yet submitted.
    pub fn pending_requests(&self) -> &[Request] {
        &self.requests[self.next_request..]
    }

    // ── Core step processing ──────────────────────────────────────────────

    fn process_step<O: BridgeObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.now;
        log::debug!("step at {}", format_hms(now));

        // ── Phase 1: submissions ──────────────────────────────────────────
        while let Some(request) = self.requests.get(self.next_request) {
            if request.submission_time > now {
                break;
            }
            self.events.submitted(request.clone());
            self.next_request += 1;
        }

        // ── Phase 2: vehicles ─────────────────────────────────────────────
        for event in advance_fleet(&mut self.fleet, now) {
            self.events.send(event);
        }

        // ── Phase 3: exchange ─────────────────────────────────────────────
        self.bridge.on_step(now, &mut self.fleet, observer)?;
        Ok(())
    }

    fn summary(&self, steps: u64) -> RunSummary {
        RunSummary {
            steps,
            final_time:         self.clock.now,
            requests_submitted: self.next_request,
        }
    }
}
