//! CSV fleet and demand loaders.
//!
//! # Fleet CSV
//!
//! ```csv
//! vehicle_id,start_link,capacity,service_begin,service_end
//! 0,12,4,0,86400
//! 1,40,4,21600,64800
//! ```
//!
//! # Demand CSV
//!
//! The three window columns may be left empty: an empty `earliest_pickup`
//! means the submission time, empty `latest_*` columns mean unbounded.
//!
//! ```csv
//! request_id,origin_link,destination_link,submission_time,earliest_pickup,latest_pickup,latest_arrival
//! 0,12,88,300,300,900,2400
//! 1,7,3,420,,,
//! ```
//!
//! Every link id is checked against the network so that a bad input file
//! fails at load time rather than mid-run.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use fb_core::{LinkId, RequestId, VehicleId};
use fb_network::Network;

use crate::request::Request;
use crate::vehicle::{Fleet, Vehicle};
use crate::ScheduleError;

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct VehicleRecord {
    vehicle_id:    u32,
    start_link:    u32,
    capacity:      u32,
    service_begin: f64,
    service_end:   f64,
}

#[derive(Deserialize)]
struct RequestRecord {
    request_id:       u32,
    origin_link:      u32,
    destination_link: u32,
    submission_time:  f64,
    earliest_pickup:  Option<f64>,
    latest_pickup:    Option<f64>,
    latest_arrival:   Option<f64>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`Fleet`] from a CSV file.
pub fn load_fleet_csv(path: &Path, network: &Network) -> Result<Fleet, ScheduleError> {
    let file = std::fs::File::open(path).map_err(ScheduleError::Io)?;
    let fleet = load_fleet_reader(file, network)?;
    log::info!("loaded {} vehicles from {}", fleet.len(), path.display());
    Ok(fleet)
}

/// Like [`load_fleet_csv`] but accepts any `Read` source.
pub fn load_fleet_reader<R: Read>(reader: R, network: &Network) -> Result<Fleet, ScheduleError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut fleet = Fleet::new();

    for result in csv_reader.deserialize::<VehicleRecord>() {
        let row = result.map_err(|e| ScheduleError::Parse(e.to_string()))?;
        let start_link = check_link(network, row.start_link, "vehicle", row.vehicle_id)?;
        if row.service_end < row.service_begin {
            return Err(ScheduleError::Parse(format!(
                "vehicle {}: service_end {} is before service_begin {}",
                row.vehicle_id, row.service_end, row.service_begin
            )));
        }
        fleet.insert(Vehicle::new(
            VehicleId(row.vehicle_id),
            row.capacity,
            start_link,
            row.service_begin,
            row.service_end,
        ))?;
    }

    Ok(fleet)
}

/// Load requests from a CSV file, sorted by submission time.
pub fn load_demand_csv(path: &Path, network: &Network) -> Result<Vec<Request>, ScheduleError> {
    let file = std::fs::File::open(path).map_err(ScheduleError::Io)?;
    let requests = load_demand_reader(file, network)?;
    log::info!("loaded {} requests from {}", requests.len(), path.display());
    Ok(requests)
}

/// Like [`load_demand_csv`] but accepts any `Read` source.
pub fn load_demand_reader<R: Read>(reader: R, network: &Network) -> Result<Vec<Request>, ScheduleError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut seen = HashSet::new();
    let mut requests = Vec::new();

    for result in csv_reader.deserialize::<RequestRecord>() {
        let row = result.map_err(|e| ScheduleError::Parse(e.to_string()))?;
        let id = RequestId(row.request_id);
        if !seen.insert(id) {
            return Err(ScheduleError::DuplicateRequest(id));
        }
        let origin = check_link(network, row.origin_link, "request", row.request_id)?;
        let destination = check_link(network, row.destination_link, "request", row.request_id)?;

        requests.push(Request::new(id, origin, destination, row.submission_time).with_window(
            row.earliest_pickup.unwrap_or(row.submission_time),
            row.latest_pickup.unwrap_or(f64::INFINITY),
            row.latest_arrival.unwrap_or(f64::INFINITY),
        ));
    }

    // Stable: equal submission times keep file order.
    requests.sort_by(|a, b| a.submission_time.total_cmp(&b.submission_time));
    Ok(requests)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn check_link(network: &Network, raw: u32, owner: &str, owner_id: u32) -> Result<LinkId, ScheduleError> {
    let link = LinkId(raw);
    if network.contains(link) {
        Ok(link)
    } else {
        Err(ScheduleError::Parse(format!("{owner} {owner_id}: link {link} is not in the network")))
    }
}
