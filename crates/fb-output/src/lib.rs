//! `fb-output` — bridge output writers for the fleetbridge workspace.
//!
//! | Backend | Files created                     |
//! |---------|-----------------------------------|
//! | CSV     | `events.csv`, `exchanges.csv`     |
//!
//! Backends implement [`OutputWriter`] and are driven by [`OutputObserver`],
//! which implements `fb_bridge::BridgeObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fb_output::{CsvWriter, EventCsvWriter};
//!
//! let mut obs = EventCsvWriter::new(CsvWriter::new(Path::new("./output"))?);
//! sim.run(&mut obs)?;
//! obs.finish();
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use crate::csv::{CsvWriter, EVENTS_FILE, EXCHANGES_FILE};
pub use error::{OutputError, OutputResult};
pub use observer::{EventCsvWriter, OutputObserver};
pub use row::{EventRow, ExchangeRow};
pub use writer::OutputWriter;
