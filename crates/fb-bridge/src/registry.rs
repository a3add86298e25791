//! Request assignment table.
//!
//! One [`AssignmentEntry`] per live request, created on submission and
//! removed once its dropoff is observed (or it is rejected).  After every
//! reconciliation each entry is either fully unassigned or has the same
//! vehicle in both slots.

use std::fmt;

use fb_core::{RequestId, VehicleId};

use crate::{BridgeError, BridgeResult};

#[cfg(feature = "fx-hash")]
type RequestMap<V> = rustc_hash::FxHashMap<RequestId, V>;
#[cfg(not(feature = "fx-hash"))]
type RequestMap<V> = std::collections::HashMap<RequestId, V>;

// ── Slot ──────────────────────────────────────────────────────────────────────

/// Which half of a request a stop serves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Pickup,
    Dropoff,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Slot::Pickup  => "pickup",
            Slot::Dropoff => "dropoff",
        })
    }
}

// ── AssignmentEntry ───────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AssignmentEntry {
    pub pickup_vehicle:  Option<VehicleId>,
    pub dropoff_vehicle: Option<VehicleId>,
    /// Set once the request's scheduling has been confirmed.  Never reset,
    /// so a request is confirmed at most once.
    pub scheduled:       bool,
}

impl AssignmentEntry {
    fn slot_mut(&mut self, slot: Slot) -> &mut Option<VehicleId> {
        match slot {
            Slot::Pickup  => &mut self.pickup_vehicle,
            Slot::Dropoff => &mut self.dropoff_vehicle,
        }
    }

    /// The vehicle holding either slot, pickup first.
    pub fn any_vehicle(&self) -> Option<VehicleId> {
        self.pickup_vehicle.or(self.dropoff_vehicle)
    }
}

// ── RequestRegistry ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RequestRegistry {
    entries: RequestMap<AssignmentEntry>,
}

impl RequestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, request: RequestId) -> bool {
        self.entries.contains_key(&request)
    }

    pub fn get(&self, request: RequestId) -> Option<&AssignmentEntry> {
        self.entries.get(&request)
    }

    /// Track a newly submitted request.
    pub fn register(&mut self, request: RequestId) -> BridgeResult<()> {
        if self.entries.insert(request, AssignmentEntry::default()).is_some() {
            return Err(BridgeError::DuplicateRequest(request));
        }
        Ok(())
    }

    pub fn remove(&mut self, request: RequestId) -> Option<AssignmentEntry> {
        self.entries.remove(&request)
    }

    /// Assign `slot` of `request` to `vehicle`.  Claiming a slot the same
    /// vehicle already holds is a no-op.
    pub fn claim(&mut self, request: RequestId, slot: Slot, vehicle: VehicleId) -> BridgeResult<()> {
        let entry = self.entries.get_mut(&request).ok_or(BridgeError::UnknownRequest(request))?;
        let held = entry.slot_mut(slot);
        match *held {
            Some(held_by) if held_by != vehicle => {
                Err(BridgeError::SlotConflict { request, slot, held_by, claimed_by: vehicle })
            }
            _ => {
                *held = Some(vehicle);
                Ok(())
            }
        }
    }

    /// Free `slot` of `request` if `vehicle` holds it.  Requests that are no
    /// longer tracked are ignored.
    pub fn release(&mut self, request: RequestId, slot: Slot, vehicle: VehicleId) {
        if let Some(entry) = self.entries.get_mut(&request) {
            let held = entry.slot_mut(slot);
            if *held == Some(vehicle) {
                *held = None;
            }
        }
    }

    /// Check the pairing invariant over every entry.
    ///
    /// Returns the requests that are fully assigned but not yet confirmed,
    /// sorted by id, with their vehicle.
    pub fn validate(&self) -> BridgeResult<Vec<(RequestId, VehicleId)>> {
        // Sorted so that the first violation reported is deterministic.
        let mut ids: Vec<RequestId> = self.entries.keys().copied().collect();
        ids.sort_unstable();

        let mut newly_paired = Vec::new();
        for request in ids {
            let entry = &self.entries[&request];
            match (entry.pickup_vehicle, entry.dropoff_vehicle) {
                (None, None) => {}
                (Some(vehicle), None) => {
                    return Err(BridgeError::HalfAssigned {
                        request,
                        vehicle,
                        assigned: Slot::Pickup,
                        missing:  Slot::Dropoff,
                    });
                }
                (None, Some(vehicle)) => {
                    return Err(BridgeError::HalfAssigned {
                        request,
                        vehicle,
                        assigned: Slot::Dropoff,
                        missing:  Slot::Pickup,
                    });
                }
                (Some(pickup), Some(dropoff)) if pickup != dropoff => {
                    return Err(BridgeError::SplitAssignment { request, pickup, dropoff });
                }
                (Some(vehicle), Some(_)) => {
                    if !entry.scheduled {
                        newly_paired.push((request, vehicle));
                    }
                }
            }
        }
        Ok(newly_paired)
    }

    pub fn mark_scheduled(&mut self, request: RequestId) {
        if let Some(entry) = self.entries.get_mut(&request) {
            entry.scheduled = true;
        }
    }
}
