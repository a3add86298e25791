//! `OutputObserver<W>` — bridges `BridgeObserver` to an `OutputWriter`.

use fb_bridge::{BridgeEvent, BridgeObserver, ExchangeStats};

use crate::row::{EventRow, ExchangeRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`BridgeObserver`] that writes every event and exchange to an
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After the run, call [`finish`][Self::finish] and
/// check [`take_error`][Self::take_error].
pub struct OutputObserver<W: OutputWriter> {
    writer:     W,
    rows:       usize,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> OutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, rows: 0, last_error: None }
    }

    /// Event rows written so far.
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Flush the writer.
    pub fn finish(&mut self) {
        let result = self.writer.finish();
        self.store_err(result);
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                log::warn!("output disabled after write error: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> BridgeObserver for OutputObserver<W> {
    fn on_event(&mut self, event: &BridgeEvent) {
        if self.last_error.is_some() {
            return;
        }
        let result = self.writer.write_event(&EventRow::from(event));
        if result.is_ok() {
            self.rows += 1;
        }
        self.store_err(result);
    }

    fn on_exchange(&mut self, now: f64, stats: &ExchangeStats) {
        if self.last_error.is_some() {
            return;
        }
        let result = self.writer.write_exchange(&ExchangeRow::new(now, stats));
        self.store_err(result);
    }
}

/// CSV-backed observer writing `events.csv` and `exchanges.csv`.
pub type EventCsvWriter = OutputObserver<crate::CsvWriter>;
