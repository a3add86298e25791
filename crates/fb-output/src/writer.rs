//! The `OutputWriter` trait implemented by backend writers.

use crate::{EventRow, ExchangeRow, OutputResult};

/// Trait implemented by output backends.
///
/// Errors never reach the bridge: [`OutputObserver`][crate::OutputObserver]
/// stores them for [`take_error`][crate::OutputObserver::take_error].
pub trait OutputWriter {
    fn write_event(&mut self, row: &EventRow) -> OutputResult<()>;

    fn write_exchange(&mut self, row: &ExchangeRow) -> OutputResult<()>;

    /// Flush all underlying file handles.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
