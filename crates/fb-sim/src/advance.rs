//! Moving vehicles along their schedules.
//!
//! A vehicle is advanced to `now` by finishing every task whose end is at
//! or before `now`.  Passenger events follow the stop boundaries the
//! reconciler reports in `RequestScheduled`:
//!
//! ```text
//! Stop begins → DroppedOff for each dropoff   (time = stop.begin)
//! Stop ends   → PickedUp   for each pickup    (time = stop.end)
//! ```

use fb_bridge::InboundEvent;
use fb_core::{format_hms, VehicleId};
use fb_schedule::{Fleet, ScheduleStatus, StopTask, Task, Vehicle};

/// Advance one vehicle to `now` and return the passenger events it produced,
/// in time order.
pub fn advance_vehicle(vehicle: &mut Vehicle, now: f64) -> Vec<InboundEvent> {
    let vid = vehicle.id;
    let mut events = Vec::new();
    let schedule = &mut vehicle.schedule;

    if schedule.status() == ScheduleStatus::Planned {
        if now < vehicle.service_begin {
            return events;
        }
        schedule.start();
        log::trace!("vehicle {vid}: service begins at {}", format_hms(now));
        if let Some(Task::Stop(stop)) = schedule.current_task() {
            stop_began(vid, stop, &mut events);
        }
    }

    while let Some(task) = schedule.current_task() {
        if task.end() > now {
            break;
        }
        if let Task::Stop(stop) = task {
            stop_ended(vid, stop, &mut events);
        }
        match schedule.next_task() {
            Some(_) => {
                if let Some(Task::Stop(stop)) = schedule.current_task() {
                    stop_began(vid, stop, &mut events);
                }
            }
            None => log::debug!("vehicle {vid}: schedule completed at {}", format_hms(now)),
        }
    }

    if let Some(drive) = schedule.current_task_mut().and_then(Task::as_drive_mut) {
        drive.track(now);
    }
    events
}

/// Advance every vehicle to `now`.  Events come back grouped by vehicle in
/// ascending id order.
pub fn advance_fleet(fleet: &mut Fleet, now: f64) -> Vec<InboundEvent> {
    #[cfg(not(feature = "parallel"))]
    {
        fleet.iter_mut().flat_map(|v| advance_vehicle(v, now)).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        let vehicles: Vec<&mut Vehicle> = fleet.iter_mut().collect();
        let per_vehicle: Vec<Vec<InboundEvent>> =
            vehicles.into_par_iter().map(|v| advance_vehicle(v, now)).collect();
        per_vehicle.into_iter().flatten().collect()
    }
}

fn stop_began(vehicle: VehicleId, stop: &StopTask, events: &mut Vec<InboundEvent>) {
    events.extend(stop.dropoffs.iter().map(|&request| InboundEvent::DroppedOff {
        time: stop.begin,
        request,
        vehicle,
    }));
}

fn stop_ended(vehicle: VehicleId, stop: &StopTask, events: &mut Vec<InboundEvent>) {
    events.extend(stop.pickups.iter().map(|&request| InboundEvent::PickedUp {
        time: stop.end,
        request,
        vehicle,
    }));
}
