//! `fb-bridge` — synchronous bridge between a fleet simulation and an
//! external dispatch optimizer.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                      |
//! |-----------------|---------------------------------------------------------------|
//! | [`bridge`]      | `FleetBridge`: per-step driver, poisoning, finalization        |
//! | [`channel`]     | `ExchangeChannel` state machine with strict alternation        |
//! | [`oracle`]      | `TravelTimeOracle` answering mid-exchange queries              |
//! | [`snapshot`]    | `SnapshotBuilder`, per-vehicle `VehicleState`, roster message  |
//! | [`reconciler`]  | `Reconciler`: applies an assignment to live schedules          |
//! | [`registry`]    | `RequestRegistry` of pickup/dropoff slot holders               |
//! | [`inbox`]       | `Inbox`, cloneable `EventSender` for host-side events          |
//! | [`events`]      | `BridgeEvent`, `BridgeObserver`, `EventLog`, `ExchangeStats`   |
//! | [`error`]       | `BridgeError`, `BridgeResult<T>`                               |
//!
//! # One step
//!
//! ```text
//! host ── EventSender ──▶ Inbox
//!                           │ drain
//!                           ▼
//! FleetBridge::on_step ── state ──▶ optimizer
//!                      ◀── travel_time_query / ──▶ travel_time_response  (0..n)
//!                      ◀── assignment
//!          │
//!          ▼
//!     Reconciler ── rewrites Fleet schedules, emits BridgeEvents
//! ```
//!
//! # Feature flags
//!
//! - **`fx-hash`**: key the request registry with FxHash instead of SipHash.

pub mod bridge;
pub mod channel;
pub mod error;
pub mod events;
pub mod inbox;
pub mod oracle;
pub mod reconciler;
pub mod registry;
pub mod snapshot;


pub use bridge::FleetBridge;
pub use channel::{ChannelState, Exchange, ExchangeChannel, Turn};
pub use error::{BridgeError, BridgeResult};
pub use events::{BridgeEvent, BridgeObserver, EventLog, ExchangeStats, NoopObserver};
pub use inbox::{EventSender, InboundEvent, Inbox};
pub use oracle::TravelTimeOracle;
pub use reconciler::Reconciler;
pub use registry::{AssignmentEntry, RequestRegistry, Slot};
pub use snapshot::{iteration_message, vehicle_state, SnapshotBuilder};
