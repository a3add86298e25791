//! `fb-core` — foundational types for the `fleetbridge` workspace.
//!
//! This crate is a dependency of every other `fb-*` crate.  It has no `fb-*`
//! dependencies and only `thiserror` plus optional `serde` externally.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `VehicleId`, `RequestId`, `LinkId`, `NodeId`          |
//! | [`time`]        | `StepClock`, `format_hms`                             |
//! | [`config`]      | `BridgeConfig`                                        |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | `Serialize`/`Deserialize` for ids and `BridgeConfig`;     |
//! |         | ids are written as decimal strings                         |

pub mod config;
pub mod error;
pub mod ids;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::BridgeConfig;
pub use error::{CoreError, CoreResult};
pub use ids::{LinkId, NodeId, RequestId, VehicleId};
pub use time::{StepClock, format_hms};
