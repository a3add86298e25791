//! Conversion of live fleet state into outbound messages.
//!
//! [`SnapshotBuilder`] accumulates submissions, pickups, and dropoffs between
//! exchanges.  [`SnapshotBuilder::build`] is the single reset point: it moves
//! the accumulated data into the `state` message and starts empty again.

use std::collections::BTreeMap;

use fb_core::{RequestId, VehicleId};
use fb_protocol::{
    IterationMessage, IterationVehicle, StateMessage, SubmittedRequest, VehicleState, VehicleStatus,
};
use fb_schedule::{Fleet, Request, ScheduleStatus, Task, Vehicle};

// ── SnapshotBuilder ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    submitted:   Vec<SubmittedRequest>,
    picked_up:   BTreeMap<RequestId, VehicleId>,
    dropped_off: BTreeMap<RequestId, VehicleId>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_submitted(&mut self, request: &Request) {
        self.submitted.push(SubmittedRequest {
            id:                   request.id,
            origin_link:          request.origin,
            destination_link:     request.destination,
            earliest_pickup_time: request.earliest_pickup,
            latest_pickup_time:   request.latest_pickup,
            latest_arrival_time:  request.latest_arrival,
            size:                 request.passengers,
        });
    }

    pub fn record_pickup(&mut self, request: RequestId, vehicle: VehicleId) {
        self.picked_up.insert(request, vehicle);
    }

    pub fn record_dropoff(&mut self, request: RequestId, vehicle: VehicleId) {
        self.dropped_off.insert(request, vehicle);
    }

    pub fn pending_submissions(&self) -> usize {
        self.submitted.len()
    }

    /// Build the `state` payload for `now` and reset the accumulators.
    pub fn build(&mut self, now: f64, fleet: &Fleet) -> StateMessage {
        StateMessage {
            time:        now,
            picked_up:   std::mem::take(&mut self.picked_up),
            dropped_off: std::mem::take(&mut self.dropped_off),
            vehicles:    fleet.iter().map(|v| vehicle_state(v, now)).collect(),
            submitted:   std::mem::take(&mut self.submitted),
        }
    }
}

// ── Per-vehicle state ─────────────────────────────────────────────────────────

/// Where `vehicle` is at `now` and where it can next change course.
pub fn vehicle_state(vehicle: &Vehicle, now: f64) -> VehicleState {
    let schedule = &vehicle.schedule;
    let parked = |link| VehicleState {
        id:                vehicle.id,
        current_link:      link,
        current_exit_time: f64::INFINITY,
        diverge_link:      link,
        diverge_time:      now,
        state:             VehicleStatus::Stay,
    };

    let current = match schedule.status() {
        ScheduleStatus::Planned   => return parked(schedule.tasks()[0].start_link()),
        ScheduleStatus::Completed => return parked(schedule.last_task().end_link()),
        ScheduleStatus::Started   => match schedule.current_task() {
            Some(task) => task,
            None => return parked(schedule.last_task().end_link()),
        },
    };

    match current {
        Task::Stay(stay) => VehicleState {
            id:                vehicle.id,
            current_link:      stay.link,
            current_exit_time: stay.end,
            diverge_link:      stay.link,
            diverge_time:      now,
            state:             VehicleStatus::Stay,
        },
        Task::Stop(stop) => VehicleState {
            id:                vehicle.id,
            current_link:      stop.link,
            current_exit_time: stop.end,
            diverge_link:      stop.link,
            diverge_time:      stop.end,
            state:             VehicleStatus::Stop,
        },
        Task::Drive(drive) => {
            let div = drive.diversion_point(now);
            VehicleState {
                id:                vehicle.id,
                current_link:      drive.current_link(),
                current_exit_time: drive.current_link_exit_time(),
                diverge_link:      div.link,
                diverge_time:      div.time,
                state:             VehicleStatus::Drive,
            }
        }
    }
}

/// Roster sent at the start of a run.
pub fn iteration_message(iteration: u32, fleet: &Fleet) -> IterationMessage {
    IterationMessage {
        iteration,
        vehicles: fleet
            .iter()
            .map(|v| IterationVehicle { id: v.id, start_link: v.start_link, capacity: v.capacity })
            .collect(),
    }
}
