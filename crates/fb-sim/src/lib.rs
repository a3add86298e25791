//! `fb-sim` — minimal host simulation driving the fleet bridge.
//!
//! # Step loop
//!
//! ```text
//! for now in (start_time..end_time).step_by(step_secs):
//!   ① Submit:   requests with submission_time <= now go to the inbox.
//!   ② Advance:  every schedule moves to now: planned schedules start at
//!                service begin, finished tasks are left behind, stops
//!                report dropoffs on entry and pickups on exit, drives
//!                update their current link (parallel with `parallel`).
//!   ③ Exchange: FleetBridge::on_step(now, fleet, observer).
//! finalize the bridge once, also after an error
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Advances vehicles on Rayon's thread pool.              |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fb_bridge::NoopObserver;
//! use fb_network::DijkstraRouter;
//! use fb_sim::SimBuilder;
//!
//! let mut sim = SimBuilder::new(config, stream, network, DijkstraRouter)
//!     .fleet(fleet)
//!     .demand(requests)
//!     .build()?;
//! let summary = sim.run(&mut NoopObserver)?;
//! ```

pub mod advance;
pub mod builder;
pub mod error;
pub mod sim;

#[cfg(test)]
mod tests;

pub use advance::{advance_fleet, advance_vehicle};
pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use sim::{FleetSim, RunSummary};
