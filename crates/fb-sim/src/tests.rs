//! Integration tests for fb-sim.

use std::collections::{BTreeSet, VecDeque};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use fb_core::{BridgeConfig, LinkId, RequestId, VehicleId};
use fb_network::{DijkstraRouter, Network, NetworkBuilder};
use fb_protocol::{decode, Message, ProtocolError, ProtocolResult, Transport};
use fb_schedule::{Fleet, Request, Vehicle};

use crate::{FleetSim, SimBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// One-way line `n0 → n1 → n2 → n3`, links 0, 1, 2, each 10 s.
fn line_network() -> Network {
    let mut b = NetworkBuilder::new();
    let n: Vec<_> = (0..4).map(|_| b.add_node()).collect();
    for w in n.windows(2) {
        b.add_link(w[0], w[1], 100.0, 10.0);
    }
    b.build()
}

fn test_config(end_time: f64, step_secs: f64) -> BridgeConfig {
    BridgeConfig { start_time: 0.0, end_time, step_secs, ..BridgeConfig::default() }
}

fn one_vehicle() -> Fleet {
    [Vehicle::new(VehicleId(1), 4, LinkId(0), 0.0, 1000.0)].into_iter().collect()
}

/// Replays queued frames and records what the simulation sent.
struct ScriptedTransport {
    inbound: VecDeque<Vec<u8>>,
    sent:    Arc<Mutex<Vec<&'static str>>>,
}

impl Transport for ScriptedTransport {
    fn send(&mut self, frame: &[u8]) -> ProtocolResult<()> {
        let message = decode(frame)?;
        self.sent.lock().unwrap().push(message.tag());
        Ok(())
    }

    fn recv(&mut self) -> ProtocolResult<Vec<u8>> {
        self.inbound.pop_front().ok_or(ProtocolError::ConnectionClosed)
    }
}

fn scripted(frames: Vec<Value>) -> (ScriptedTransport, Arc<Mutex<Vec<&'static str>>>) {
    let sent = Arc::new(Mutex::new(Vec::new()));
    let inbound = frames.iter().map(|v| serde_json::to_vec(v).unwrap()).collect();
    (ScriptedTransport { inbound, sent: sent.clone() }, sent)
}

fn tag(name: &str) -> Value {
    json!({ "@message": name })
}

/// `initialization` followed by `n` empty assignments.
fn idle_peer(n: usize) -> Vec<Value> {
    std::iter::once(tag("initialization")).chain(std::iter::repeat_n(tag("assignment"), n)).collect()
}

fn sim(
    config: BridgeConfig,
    frames: Vec<Value>,
    fleet:  Fleet,
    demand: Vec<Request>,
) -> (FleetSim<ScriptedTransport, DijkstraRouter>, Arc<Mutex<Vec<&'static str>>>) {
    let (transport, sent) = scripted(frames);
    let sim = SimBuilder::new(config, transport, Arc::new(line_network()), DijkstraRouter)
        .fleet(fleet)
        .demand(demand)
        .build()
        .unwrap();
    (sim, sent)
}

// ── Vehicle advancement ───────────────────────────────────────────────────────

#[cfg(test)]
mod advance_tests {
    use fb_bridge::InboundEvent;
    use fb_network::{FreeSpeedTravelTime, LinkPath};
    use fb_schedule::{Schedule, ScheduleStatus, StopTask, Task};
    use crate::{advance_fleet, advance_vehicle};
    use super::*;

    const R1: RequestId = RequestId(1);
    const V1: VehicleId = VehicleId(1);

    /// Pickup of R1 on link 0 over [10, 20], drive to link 1, dropoff over
    /// [30, 40], then wait until 1000.
    fn trip_vehicle() -> Vehicle {
        let net = line_network();
        let mut v = Vehicle::new(V1, 4, LinkId(0), 0.0, 1000.0);
        let path = LinkPath::stamp(&net, &FreeSpeedTravelTime, &[LinkId(0), LinkId(1)], 20.0).unwrap();
        let mut s = Schedule::new(Task::stay(LinkId(0), 0.0, 10.0));
        s.add_task(Task::Stop(StopTask {
            link:     LinkId(0),
            begin:    10.0,
            end:      20.0,
            pickups:  BTreeSet::from([R1]),
            dropoffs: BTreeSet::new(),
        }));
        s.add_task(Task::drive(path));
        s.add_task(Task::Stop(StopTask {
            link:     LinkId(1),
            begin:    30.0,
            end:      40.0,
            pickups:  BTreeSet::new(),
            dropoffs: BTreeSet::from([R1]),
        }));
        s.add_task(Task::stay(LinkId(1), 40.0, 1000.0));
        s.validate().unwrap();
        v.schedule = s;
        v
    }

    #[test]
    fn planned_vehicle_waits_for_service_begin() {
        let mut v = Vehicle::new(V1, 4, LinkId(0), 100.0, 1000.0);
        assert!(advance_vehicle(&mut v, 50.0).is_empty());
        assert_eq!(v.schedule.status(), ScheduleStatus::Planned);
        advance_vehicle(&mut v, 100.0);
        assert_eq!(v.schedule.status(), ScheduleStatus::Started);
        assert_eq!(v.schedule.current_index(), Some(0));
    }

    #[test]
    fn pickup_reported_at_stop_end() {
        let mut v = trip_vehicle();
        assert!(advance_vehicle(&mut v, 15.0).is_empty());
        assert_eq!(v.schedule.current_index(), Some(1));

        let events = advance_vehicle(&mut v, 25.0);
        assert_eq!(events, vec![InboundEvent::PickedUp { time: 20.0, request: R1, vehicle: V1 }]);
        assert_eq!(v.schedule.current_index(), Some(2));
    }

    #[test]
    fn drive_tracks_current_link() {
        let mut v = trip_vehicle();
        advance_vehicle(&mut v, 25.0);
        let drive = v.schedule.current_task().and_then(Task::as_drive).unwrap();
        assert_eq!(drive.current_link(), LinkId(1));
        assert_eq!(drive.tracker.unwrap().enter_time, 20.0);
    }

    #[test]
    fn dropoff_reported_at_stop_begin() {
        let mut v = trip_vehicle();
        let events = advance_vehicle(&mut v, 35.0);
        assert_eq!(
            events,
            vec![
                InboundEvent::PickedUp { time: 20.0, request: R1, vehicle: V1 },
                InboundEvent::DroppedOff { time: 30.0, request: R1, vehicle: V1 },
            ]
        );
        assert_eq!(v.schedule.current_index(), Some(3));
    }

    #[test]
    fn schedule_completes_after_last_task() {
        let mut v = trip_vehicle();
        advance_vehicle(&mut v, 1000.0);
        assert_eq!(v.schedule.status(), ScheduleStatus::Completed);
        assert!(advance_vehicle(&mut v, 2000.0).is_empty());
    }

    #[test]
    fn fleet_events_in_vehicle_order() {
        let mut second = trip_vehicle();
        second.id = VehicleId(2);
        let mut fleet: Fleet = [second, trip_vehicle()].into_iter().collect();
        let vehicles: Vec<_> = advance_fleet(&mut fleet, 25.0)
            .into_iter()
            .map(|e| match e {
                InboundEvent::PickedUp { vehicle, .. } => vehicle,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(vehicles, vec![VehicleId(1), VehicleId(2)]);
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use crate::SimError;
    use super::*;

    #[test]
    fn builds_with_defaults() {
        let (transport, _) = scripted(vec![]);
        let sim = SimBuilder::new(test_config(10.0, 1.0), transport, Arc::new(line_network()), DijkstraRouter)
            .build()
            .unwrap();
        assert!(sim.fleet.is_empty());
        assert!(sim.pending_requests().is_empty());
        assert_eq!(sim.clock.now, 0.0);
    }

    #[test]
    fn bad_step_is_rejected() {
        let (transport, _) = scripted(vec![]);
        let result = SimBuilder::new(test_config(10.0, 0.0), transport, Arc::new(line_network()), DijkstraRouter)
            .build();
        assert!(matches!(result, Err(SimError::Core(_))));
    }

    #[test]
    fn unknown_start_link_is_rejected() {
        let (transport, _) = scripted(vec![]);
        let fleet: Fleet = [Vehicle::new(VehicleId(1), 4, LinkId(9), 0.0, 10.0)].into_iter().collect();
        let result = SimBuilder::new(test_config(10.0, 1.0), transport, Arc::new(line_network()), DijkstraRouter)
            .fleet(fleet)
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn demand_is_sorted_by_submission() {
        let demand = vec![
            Request::new(RequestId(1), LinkId(0), LinkId(2), 50.0),
            Request::new(RequestId(2), LinkId(0), LinkId(2), 5.0),
        ];
        let (sim, _) = sim(test_config(10.0, 1.0), vec![], one_vehicle(), demand);
        let ids: Vec<_> = sim.pending_requests().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![RequestId(2), RequestId(1)]);
    }
}

// ── Step loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use fb_bridge::{BridgeEvent, EventLog, NoopObserver};
    use crate::SimError;
    use super::*;

    #[test]
    fn one_exchange_per_step_then_finalization() {
        let (mut sim, sent) = sim(test_config(3.0, 1.0), idle_peer(3), one_vehicle(), vec![]);
        let summary = sim.run(&mut NoopObserver).unwrap();
        assert_eq!(summary.steps, 3);
        assert_eq!(summary.final_time, 3.0);
        assert_eq!(*sent.lock().unwrap(), vec!["iteration", "state", "state", "finalization"]);
    }

    #[test]
    fn run_steps_does_not_finalize() {
        let (mut sim, sent) = sim(test_config(100.0, 1.0), idle_peer(2), one_vehicle(), vec![]);
        sim.run_steps(2, &mut NoopObserver).unwrap();
        assert_eq!(sim.clock.now, 2.0);
        assert_eq!(*sent.lock().unwrap(), vec!["iteration", "state"]);
    }

    #[test]
    fn request_lifecycle_end_to_end() {
        let mut frames = idle_peer(1);
        frames.push(json!({
            "@message": "assignment",
            "stops": { "1": [
                { "link": "0", "pickup": ["1"], "stopDuration": 60.0 },
                { "link": "2", "dropoff": ["1"], "stopDuration": 60.0 },
            ] }
        }));
        frames.extend(std::iter::repeat_n(tag("assignment"), 8));

        let demand = vec![Request::new(RequestId(1), LinkId(0), LinkId(2), 0.0)];
        let (mut sim, sent) = sim(test_config(100.0, 10.0), frames, one_vehicle(), demand);
        let mut log = EventLog::default();
        let summary = sim.run(&mut log).unwrap();

        assert_eq!(summary.steps, 10);
        assert_eq!(summary.requests_submitted, 1);
        let kinds: Vec<_> = log.events.iter().map(BridgeEvent::kind).collect();
        assert_eq!(kinds, vec!["submitted", "scheduled", "picked_up", "dropped_off"]);
        assert_eq!(log.events[2].time(), 70.0);
        assert_eq!(log.events[3].time(), 90.0);
        assert!(sim.bridge.registry().is_empty());
        assert_eq!(sent.lock().unwrap().last(), Some(&"finalization"));
    }

    #[test]
    fn fatal_error_still_finalizes() {
        let frames = vec![tag("initialization"), tag("assignment"), tag("initialization")];
        let (mut sim, sent) = sim(test_config(10.0, 1.0), frames, one_vehicle(), vec![]);
        let err = sim.run(&mut NoopObserver).unwrap_err();
        assert!(matches!(err, SimError::Bridge(_)));
        assert!(sim.bridge.is_poisoned());
        assert_eq!(*sent.lock().unwrap(), vec!["iteration", "state", "finalization"]);
    }
}
