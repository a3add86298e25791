//! Schedule reconciliation: applying an optimizer assignment to live
//! schedules.
//!
//! # Algorithm
//!
//! ```text
//! check    every vehicle, link, and request id in the assignment exists
//! pass 1   for each listed vehicle:
//!            release the pickup and dropoff slots of every stop from the
//!            current task on, drop the tasks after it; cut a current Stay
//!            at now
//! pass 2   for each listed vehicle, for each stop in order:
//!            move  divert the current Drive (first stop only) or append a
//!                  Drive from the tail when the stop is on another link
//!            wait  append a Stay until the stop's earliest start
//!            serve append a Stop and claim its pickup and dropoff slots
//!          then pad the schedule with a Stay up to the service end when it
//!          ends earlier
//! confirm  every request has both slots free or both on one vehicle;
//!          report newly paired requests as scheduled
//! reject   drop rejected requests, which must be unassigned
//! ```
//!
//! Pass 1 runs for all vehicles before pass 2 so that a request moved from
//! one vehicle to another is released before it is claimed again.
//!
//! Any error leaves the fleet partially rewritten; the bridge treats every
//! error as fatal.

use fb_core::{LinkId, RequestId, VehicleId};
use fb_network::{Link, LinkPath, Network, Router, TravelTime};
use fb_protocol::{AssignedStop, AssignmentMessage};
use fb_schedule::{Fleet, ScheduleError, ScheduleStatus, StopTask, Task, Vehicle};

use crate::events::BridgeEvent;
use crate::registry::{RequestRegistry, Slot};
use crate::{BridgeError, BridgeResult};

pub struct Reconciler<'a, R: Router + ?Sized> {
    network:     &'a Network,
    router:      &'a R,
    travel_time: &'a dyn TravelTime,
}

impl<'a, R: Router + ?Sized> Reconciler<'a, R> {
    pub fn new(network: &'a Network, router: &'a R, travel_time: &'a dyn TravelTime) -> Self {
        Self { network, router, travel_time }
    }

    /// Apply `assignment` at time `now`.
    ///
    /// On success every rebuilt schedule is contiguous and every request
    /// satisfies the pairing invariant.  Returns the `RequestScheduled` and
    /// `RequestRejected` events produced, in request-id order.
    pub fn apply(
        &self,
        assignment: &AssignmentMessage,
        now:        f64,
        fleet:      &mut Fleet,
        registry:   &mut RequestRegistry,
    ) -> BridgeResult<Vec<BridgeEvent>> {
        self.check(assignment, fleet, registry)?;

        for &vid in assignment.stops.keys() {
            clear(vehicle_mut(fleet, vid)?, now, registry);
        }

        for (&vid, stops) in &assignment.stops {
            let vehicle = vehicle_mut(fleet, vid)?;
            self.rebuild(vehicle, stops, now, registry)?;
            vehicle
                .schedule
                .validate()
                .map_err(|source| BridgeError::Schedule { vehicle: vid, source })?;
            log::trace!(
                "vehicle {vid}: {} stops applied, schedule ends at {}",
                stops.len(),
                vehicle.schedule.end_time()
            );
        }

        let mut events = confirm(now, fleet, registry)?;
        events.extend(reject(&assignment.rejections, now, registry)?);
        Ok(events)
    }

    // ── Up-front checks ───────────────────────────────────────────────────

    fn check(&self, assignment: &AssignmentMessage, fleet: &Fleet, registry: &RequestRegistry) -> BridgeResult<()> {
        for (&vid, stops) in &assignment.stops {
            let vehicle = fleet.get(vid).ok_or(BridgeError::UnknownVehicle(vid))?;
            if vehicle.schedule.status() == ScheduleStatus::Completed {
                return Err(BridgeError::VehicleOutOfService(vid));
            }
            for stop in stops {
                self.check_link(stop.link)?;
                for &link in stop.route.iter().flatten() {
                    self.check_link(link)?;
                }
                for &request in stop.pickup.iter().chain(&stop.dropoff) {
                    if !registry.contains(request) {
                        return Err(BridgeError::UnknownRequest(request));
                    }
                }
            }
        }
        Ok(())
    }

    fn check_link(&self, link: LinkId) -> BridgeResult<()> {
        if self.network.contains(link) { Ok(()) } else { Err(BridgeError::UnknownLink(link)) }
    }

    // ── Pass 2 ────────────────────────────────────────────────────────────

    fn rebuild(
        &self,
        vehicle:  &mut Vehicle,
        stops:    &[AssignedStop],
        now:      f64,
        registry: &mut RequestRegistry,
    ) -> BridgeResult<()> {
        let vid = vehicle.id;
        let current = vehicle
            .schedule
            .mutable_from()
            .ok_or(BridgeError::VehicleOutOfService(vid))?;

        if stops.is_empty() {
            // Stop driving: end the drive at its diversion point.
            if let Some(drive) = vehicle.schedule.task_mut(current).and_then(Task::as_drive_mut) {
                let div = drive.diversion_point(now);
                drive
                    .divert(LinkPath::stationary(div.link, div.time))
                    .map_err(|source| schedule_error(vid, source))?;
                log::trace!("vehicle {vid}: drive halted on link {} at {}", div.link, div.time);
            }
        }

        for (i, stop) in stops.iter().enumerate() {
            let diverted = i == 0 && self.divert_current(vehicle, current, stop, now)?;
            if !diverted {
                let tail = vehicle.schedule.last_task();
                let (tail_link, tail_end) = (tail.end_link(), tail.end());
                if tail_link != stop.link {
                    let path = self.path_to(vid, stop, tail_link, tail_end)?;
                    push(vehicle, Task::drive(path));
                } else if stop.route.is_some() {
                    log::trace!("vehicle {vid}: already on link {}, route ignored", stop.link);
                }
            }

            let arrival = vehicle.schedule.end_time();
            if stop.earliest_start_time > arrival {
                push(vehicle, Task::stay(stop.link, arrival, stop.earliest_start_time));
            }

            if stop.has_passengers() {
                let begin = vehicle.schedule.end_time();
                let task = StopTask {
                    link:     stop.link,
                    begin,
                    end:      begin + stop.stop_duration,
                    pickups:  stop.pickup.iter().copied().collect(),
                    dropoffs: stop.dropoff.iter().copied().collect(),
                };
                for &request in &task.pickups {
                    registry.claim(request, Slot::Pickup, vid)?;
                }
                for &request in &task.dropoffs {
                    registry.claim(request, Slot::Dropoff, vid)?;
                }
                push(vehicle, Task::Stop(task));
            } else if stop.stop_duration > 0.0 {
                log::warn!(
                    "vehicle {vid}: stop on link {} has no passengers; duration {} ignored",
                    stop.link,
                    stop.stop_duration
                );
            }
        }

        pad_to_service_end(vehicle);
        Ok(())
    }

    /// Divert the current task toward `stop` if it is a drive.  Returns
    /// whether a diversion happened.
    fn divert_current(
        &self,
        vehicle: &mut Vehicle,
        current: usize,
        stop:    &AssignedStop,
        now:     f64,
    ) -> BridgeResult<bool> {
        let vid = vehicle.id;
        let Some(drive) = vehicle.schedule.task_mut(current).and_then(Task::as_drive_mut) else {
            return Ok(false);
        };
        let div = drive.diversion_point(now);
        let path = self.path_to(vid, stop, div.link, div.time)?;
        drive.divert(path).map_err(|source| schedule_error(vid, source))?;
        log::trace!(
            "vehicle {vid}: diverted at link {} ({}) toward link {}, arriving {}",
            div.link,
            div.time,
            stop.link,
            drive.end()
        );
        Ok(true)
    }

    // ── Paths ─────────────────────────────────────────────────────────────

    /// Path from `from` at `departure` to the stop's link, routed unless the
    /// stop carries an explicit route.
    fn path_to(&self, vehicle: VehicleId, stop: &AssignedStop, from: LinkId, departure: f64) -> BridgeResult<LinkPath> {
        match &stop.route {
            None => self
                .router
                .compute_path(self.network, from, stop.link, departure, self.travel_time)
                .map_err(|source| BridgeError::Routing { vehicle, source }),
            Some(route) => self.explicit_path(vehicle, route, from, stop.link, departure),
        }
    }

    /// Stamp an optimizer-supplied route.  The route must end on the stop
    /// link; `from` is prepended unless the route already starts there.
    fn explicit_path(
        &self,
        vehicle:   VehicleId,
        route:     &[LinkId],
        from:      LinkId,
        stop_link: LinkId,
        departure: f64,
    ) -> BridgeResult<LinkPath> {
        if route.last() != Some(&stop_link) {
            return Err(BridgeError::RouteMismatch { vehicle, stop_link, route_end: route.last().copied() });
        }

        let mut links = Vec::with_capacity(route.len() + 1);
        if route[0] != from {
            links.push(from);
        }
        links.extend_from_slice(route);

        for pair in links.windows(2) {
            let (a, b) = (self.link(pair[0])?, self.link(pair[1])?);
            if a.to != b.from {
                return Err(BridgeError::RouteDisconnected { vehicle, from: a.id, to: b.id });
            }
        }

        LinkPath::stamp(self.network, self.travel_time, &links, departure)
            .map_err(|source| BridgeError::Routing { vehicle, source })
    }

    fn link(&self, id: LinkId) -> BridgeResult<&Link> {
        self.network.link(id).ok_or(BridgeError::UnknownLink(id))
    }
}

// ── Pass 1 ────────────────────────────────────────────────────────────────────

/// Free the slots held by every stop from the current task on, then discard
/// the tasks after the current one.  The current task itself stays in place.
fn clear(vehicle: &mut Vehicle, now: f64, registry: &mut RequestRegistry) {
    let Some(current) = vehicle.schedule.mutable_from() else {
        return;
    };
    let vid = vehicle.id;

    if let Some(Task::Stop(stop)) = vehicle.schedule.task(current) {
        release_stop(stop, vid, registry);
    }
    for task in vehicle.schedule.truncate_after(current) {
        if let Task::Stop(stop) = &task {
            release_stop(stop, vid, registry);
        }
    }

    if let Some(Task::Stay(stay)) = vehicle.schedule.task_mut(current) {
        stay.end = stay.begin.max(now);
    }
    log::trace!("vehicle {vid}: cleared from task {current}");
}

fn release_stop(stop: &StopTask, vehicle: VehicleId, registry: &mut RequestRegistry) {
    for &request in &stop.pickups {
        registry.release(request, Slot::Pickup, vehicle);
    }
    for &request in &stop.dropoffs {
        registry.release(request, Slot::Dropoff, vehicle);
    }
}

// ── Tail ──────────────────────────────────────────────────────────────────────

/// Make the schedule last until the vehicle's service end, extending a
/// trailing Stay or appending a new one.
fn pad_to_service_end(vehicle: &mut Vehicle) {
    let service_end = vehicle.service_end;
    let extended = match vehicle.schedule.last_task_mut() {
        Task::Stay(stay) => {
            stay.end = stay.end.max(service_end);
            true
        }
        Task::Drive(_) | Task::Stop(_) => false,
    };
    if !extended {
        let last = vehicle.schedule.last_task();
        let (link, end) = (last.end_link(), last.end());
        if end < service_end {
            push(vehicle, Task::stay(link, end, service_end));
        }
    }
}

fn push(vehicle: &mut Vehicle, task: Task) {
    log::trace!(
        "vehicle {}: + {} [{}, {}] on link {}",
        vehicle.id,
        task.kind(),
        task.begin(),
        task.end(),
        task.end_link()
    );
    vehicle.schedule.add_task(task);
}

// ── Confirmation & rejection ──────────────────────────────────────────────────

fn confirm(now: f64, fleet: &Fleet, registry: &mut RequestRegistry) -> BridgeResult<Vec<BridgeEvent>> {
    let newly_paired = registry.validate()?;
    let mut events = Vec::with_capacity(newly_paired.len());

    for (request, vid) in newly_paired {
        let vehicle = fleet.get(vid).ok_or(BridgeError::UnknownVehicle(vid))?;
        let (pickup_time, dropoff_time) = service_times(vehicle, request).ok_or_else(|| {
            BridgeError::Invariant(format!(
                "request {request} is assigned to vehicle {vid} but its stops are not in the pending schedule"
            ))
        })?;
        registry.mark_scheduled(request);
        log::debug!("request {request} scheduled on vehicle {vid}: pickup {pickup_time}, dropoff {dropoff_time}");
        events.push(BridgeEvent::RequestScheduled { time: now, request, vehicle: vid, pickup_time, dropoff_time });
    }
    Ok(events)
}

/// Pickup time (end of the pickup stop) and dropoff time (begin of the
/// dropoff stop), scanning from the current task.
fn service_times(vehicle: &Vehicle, request: RequestId) -> Option<(f64, f64)> {
    let from = vehicle.schedule.mutable_from().unwrap_or(0);
    let mut pickup = None;
    let mut dropoff = None;
    for stop in vehicle.schedule.tasks()[from..].iter().filter_map(Task::as_stop) {
        if stop.pickups.contains(&request) {
            pickup = Some(stop.end);
        }
        if stop.dropoffs.contains(&request) {
            dropoff = Some(stop.begin);
        }
    }
    Some((pickup?, dropoff?))
}

fn reject(
    rejections: &[RequestId],
    now:        f64,
    registry:   &mut RequestRegistry,
) -> BridgeResult<Vec<BridgeEvent>> {
    let mut events = Vec::with_capacity(rejections.len());
    for &request in rejections {
        let entry = registry.get(request).ok_or(BridgeError::UnknownRequest(request))?;
        if let Some(vehicle) = entry.any_vehicle() {
            return Err(BridgeError::RejectedAssigned { request, vehicle });
        }
        registry.remove(request);
        log::debug!("request {request} rejected by the optimizer");
        events.push(BridgeEvent::RequestRejected { time: now, request });
    }
    Ok(events)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn vehicle_mut(fleet: &mut Fleet, vid: VehicleId) -> BridgeResult<&mut Vehicle> {
    fleet.get_mut(vid).ok_or(BridgeError::UnknownVehicle(vid))
}

fn schedule_error(vehicle: VehicleId, source: ScheduleError) -> BridgeError {
    BridgeError::Schedule { vehicle, source }
}
