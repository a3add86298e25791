//! `fb-schedule` — vehicle task schedules, fleet, requests, and CSV loading.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`task`]      | `Task` (`Stay`/`Drive`/`Stop`), `DriveTracker`, `DiversionPoint` |
//! | [`schedule`]  | `Schedule`, `ScheduleStatus`, contiguity validation         |
//! | [`vehicle`]   | `Vehicle`, `Fleet` (`BTreeMap<VehicleId, Vehicle>`)          |
//! | [`request`]   | `Request`                                                   |
//! | [`loader`]    | `load_fleet_csv`, `load_demand_csv` and reader variants     |
//! | [`error`]     | `ScheduleError`, `ScheduleResult<T>`                        |
//!
//! # Schedule invariants (summary)
//!
//! ```text
//! task[i].end      == task[i+1].begin
//! task[i].end_link == task[i+1].start_link
//! task[i].begin    <= task[i].end
//! ```
//!
//! The host simulation moves the current index forward; the bridge's
//! reconciler rewrites everything from the current task on.

pub mod error;
pub mod loader;
pub mod request;
pub mod schedule;
pub mod task;
pub mod vehicle;


pub use error::{ScheduleError, ScheduleResult};
pub use loader::{load_demand_csv, load_demand_reader, load_fleet_csv, load_fleet_reader};
pub use request::{Request, PASSENGERS_PER_REQUEST};
pub use schedule::{Schedule, ScheduleStatus, TIME_EPSILON};
pub use task::{DiversionPoint, DriveTask, DriveTracker, StayTask, StopTask, Task, TaskKind};
pub use vehicle::{Fleet, Vehicle};
