//! `fb-protocol` — the optimizer wire protocol.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`message`]     | `Message` (tagged by `@message`) and its payload structs |
//! | [`unbounded`]   | serde helpers writing `±∞` as `null`                    |
//! | [`codec`]       | `encode` / `decode` via `serde_json`                    |
//! | [`framing`]     | `Transport` trait, `FramedStream`, `FramedListener`     |
//! | [`error`]       | `ProtocolError`, `ProtocolResult<T>`                    |
//!
//! # Conversation
//!
//! ```text
//! peer   → bridge   initialization
//! bridge → peer     iteration
//! peer   → bridge   travel_time_query      (zero or more, each answered)
//! bridge → peer     travel_time_response
//! peer   → bridge   assignment
//! bridge → peer     state                  (once per step, same query loop)
//! …
//! bridge → peer     finalization
//! ```
//!
//! This crate only moves and types messages; ordering is enforced by the
//! exchange channel in `fb-bridge`.

pub mod codec;
pub mod error;
pub mod framing;
pub mod message;
pub mod unbounded;

#[cfg(test)]
mod tests;

pub use codec::{decode, encode};
pub use error::{ProtocolError, ProtocolResult};
pub use framing::{connect, FramedListener, FramedStream, Transport};
pub use message::{
    AssignedStop, AssignmentMessage, IterationMessage, IterationVehicle, Message, StateMessage,
    SubmittedRequest, TravelTimeQuery, TravelTimeResponse, VehicleState, VehicleStatus,
};
