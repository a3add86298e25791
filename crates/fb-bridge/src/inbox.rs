//! Inbound event queue fed by the host simulation.
//!
//! Producers on any thread hold an [`EventSender`]; the bridge drains the
//! queue exactly once per exchange.  The queue is unbounded, so producers
//! never block.

use crossbeam_channel::{unbounded, Receiver, Sender};

use fb_core::{RequestId, VehicleId};
use fb_schedule::Request;

#[derive(Clone, Debug, PartialEq)]
pub enum InboundEvent {
    Submitted(Request),
    PickedUp { time: f64, request: RequestId, vehicle: VehicleId },
    DroppedOff { time: f64, request: RequestId, vehicle: VehicleId },
}

// ── EventSender ───────────────────────────────────────────────────────────────

/// Cloneable producer handle.
#[derive(Clone)]
pub struct EventSender {
    tx: Sender<InboundEvent>,
}

impl EventSender {
    pub fn submitted(&self, request: Request) {
        self.send(InboundEvent::Submitted(request));
    }

    pub fn picked_up(&self, time: f64, request: RequestId, vehicle: VehicleId) {
        self.send(InboundEvent::PickedUp { time, request, vehicle });
    }

    pub fn dropped_off(&self, time: f64, request: RequestId, vehicle: VehicleId) {
        self.send(InboundEvent::DroppedOff { time, request, vehicle });
    }

    pub fn send(&self, event: InboundEvent) {
        if self.tx.send(event).is_err() {
            log::warn!("bridge inbox is gone; dropping event");
        }
    }
}

// ── Inbox ─────────────────────────────────────────────────────────────────────

/// Receiving end, owned by the bridge.
pub struct Inbox {
    tx: Sender<InboundEvent>,
    rx: Receiver<InboundEvent>,
}

impl Default for Inbox {
    fn default() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }
}

impl Inbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sender(&self) -> EventSender {
        EventSender { tx: self.tx.clone() }
    }

    /// Take every queued event, in arrival order.
    pub fn drain(&self) -> Vec<InboundEvent> {
        self.rx.try_iter().collect()
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}
