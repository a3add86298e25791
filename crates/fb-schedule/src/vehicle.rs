//! `Vehicle` and the `Fleet` that owns every vehicle of a run.

use std::collections::BTreeMap;
use std::collections::btree_map;

use fb_core::{LinkId, VehicleId};

use crate::schedule::Schedule;
use crate::task::Task;
use crate::{ScheduleError, ScheduleResult};

// ── Vehicle ───────────────────────────────────────────────────────────────────

/// A fleet vehicle with its service window `[service_begin, service_end)`.
#[derive(Clone, Debug)]
pub struct Vehicle {
    pub id:            VehicleId,
    /// Seats available to passengers.
    pub capacity:      u32,
    pub start_link:    LinkId,
    pub service_begin: f64,
    pub service_end:   f64,
    pub schedule:      Schedule,
}

impl Vehicle {
    /// A vehicle whose planned schedule is one `Stay` on `start_link` for the
    /// whole service window.
    pub fn new(id: VehicleId, capacity: u32, start_link: LinkId, service_begin: f64, service_end: f64) -> Self {
        Self {
            id,
            capacity,
            start_link,
            service_begin,
            service_end,
            schedule: Schedule::new(Task::stay(start_link, service_begin, service_end)),
        }
    }
}

// ── Fleet ─────────────────────────────────────────────────────────────────────

/// All vehicles of a run, ordered by id.
#[derive(Clone, Debug, Default)]
pub struct Fleet {
    vehicles: BTreeMap<VehicleId, Vehicle>,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vehicle.  Ids must be unique.
    pub fn insert(&mut self, vehicle: Vehicle) -> ScheduleResult<()> {
        match self.vehicles.entry(vehicle.id) {
            btree_map::Entry::Occupied(_) => Err(ScheduleError::DuplicateVehicle(vehicle.id)),
            btree_map::Entry::Vacant(slot) => {
                slot.insert(vehicle);
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn get(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(&id)
    }

    pub fn get_mut(&mut self, id: VehicleId) -> Option<&mut Vehicle> {
        self.vehicles.get_mut(&id)
    }

    pub fn contains(&self, id: VehicleId) -> bool {
        self.vehicles.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vehicle> + '_ {
        self.vehicles.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Vehicle> + '_ {
        self.vehicles.values_mut()
    }
}

impl FromIterator<Vehicle> for Fleet {
    /// Later duplicates replace earlier ones; use [`Fleet::insert`] to reject
    /// them instead.
    fn from_iter<I: IntoIterator<Item = Vehicle>>(iter: I) -> Self {
        Self { vehicles: iter.into_iter().map(|v| (v.id, v)).collect() }
    }
}
