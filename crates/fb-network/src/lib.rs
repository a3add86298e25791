//! `fb-network` — link network, travel-time models, and routing.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`network`]     | `Link`, `Network` (links + CSR out-link index), builder   |
//! | [`travel_time`] | `TravelTime` trait, `FreeSpeedTravelTime`, `BinnedTravelTime` |
//! | [`path`]        | `LinkPath`: link sequence with per-link travel times      |
//! | [`router`]      | `Router` trait, time-dependent `DijkstraRouter`           |
//! | [`loader`]      | `load_network_csv`, `load_network_reader`                 |
//! | [`error`]       | `NetworkError`, `NetworkResult<T>`                        |
//!
//! # Link-based paths
//!
//! Vehicles live on links, not nodes: a vehicle "at link L" is positioned at
//! the downstream end of L, ready to turn into any out-link of `L.to`.  A
//! [`LinkPath`] therefore starts with the link being left (travel time 0)
//! and ends with the destination link, fully traversed.

pub mod error;
pub mod loader;
pub mod network;
pub mod path;
pub mod router;
pub mod travel_time;

#[cfg(test)]
mod tests;

pub use error::{NetworkError, NetworkResult};
pub use loader::{load_network_csv, load_network_reader};
pub use network::{Link, Network, NetworkBuilder};
pub use path::LinkPath;
pub use router::{DijkstraRouter, Router};
pub use travel_time::{BinnedTravelTime, FreeSpeedTravelTime, TravelTime};
