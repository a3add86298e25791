//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `events.csv`: `time,kind,request,vehicle,pickup_time,dropoff_time`
//! - `exchanges.csv`: one row of counters per exchange
//!
//! Absent values are written as empty fields.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{EventRow, ExchangeRow, OutputResult};

pub const EVENTS_FILE: &str = "events.csv";
pub const EXCHANGES_FILE: &str = "exchanges.csv";

/// Writes bridge output to two CSV files.
pub struct CsvWriter {
    events:    Writer<File>,
    exchanges: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut events = Writer::from_path(dir.join(EVENTS_FILE))?;
        events.write_record(["time", "kind", "request", "vehicle", "pickup_time", "dropoff_time"])?;

        let mut exchanges = Writer::from_path(dir.join(EXCHANGES_FILE))?;
        exchanges.write_record([
            "time",
            "queries_answered",
            "vehicles_rescheduled",
            "requests_submitted",
            "requests_scheduled",
            "requests_rejected",
        ])?;

        Ok(Self { events, exchanges, finished: false })
    }
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_event(&mut self, row: &EventRow) -> OutputResult<()> {
        self.events.write_record(&[
            row.time.to_string(),
            row.kind.to_string(),
            row.request.to_string(),
            optional(row.vehicle),
            optional(row.pickup_time),
            optional(row.dropoff_time),
        ])?;
        Ok(())
    }

    fn write_exchange(&mut self, row: &ExchangeRow) -> OutputResult<()> {
        self.exchanges.write_record(&[
            row.time.to_string(),
            row.queries_answered.to_string(),
            row.vehicles_rescheduled.to_string(),
            row.requests_submitted.to_string(),
            row.requests_scheduled.to_string(),
            row.requests_rejected.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        self.exchanges.flush()?;
        Ok(())
    }
}
