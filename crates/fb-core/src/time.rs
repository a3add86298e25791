//! Simulation time model.
//!
//! # Design
//!
//! Time is a plain `f64` number of simulated seconds since the start of the
//! simulated day.  This matches the optimizer's wire format, which carries
//! every time as a JSON number, and lets travel times accumulate without
//! rounding.
//!
//! Two values are special:
//!
//! - `f64::INFINITY`: "no upper bound", e.g. the exit time of a vehicle
//!   whose schedule has not started yet.
//! - `f64::NEG_INFINITY`: "no lower bound", e.g. a stop without an earliest
//!   start time.
//!
//! JSON cannot represent either, so the protocol writes them as `null`.

use std::fmt;

// ── StepClock ─────────────────────────────────────────────────────────────────

/// Fixed-step simulation clock.
///
/// `StepClock` holds no heap data; the host simulation advances it once per
/// step and hands `now` to the bridge.
#[derive(Clone, Debug, PartialEq)]
pub struct StepClock {
    /// Current simulated time in seconds.
    pub now: f64,
    /// Seconds advanced by each call to [`advance`](Self::advance).
    pub step_secs: f64,
    /// Exclusive end of the run.
    pub end_time: f64,
}

impl StepClock {
    pub fn new(start_time: f64, step_secs: f64, end_time: f64) -> Self {
        Self { now: start_time, step_secs, end_time }
    }

    /// Advance the clock by one step.
    #[inline]
    pub fn advance(&mut self) {
        self.now += self.step_secs;
    }

    /// `true` once `now` has reached the end of the run.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.now >= self.end_time
    }

    /// Number of steps left before the clock finishes (rounded up).
    pub fn steps_remaining(&self) -> u64 {
        if self.is_finished() || self.step_secs <= 0.0 {
            return 0;
        }
        ((self.end_time - self.now) / self.step_secs).ceil() as u64
    }
}

impl fmt::Display for StepClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_hms(self.now))
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Render seconds as `HH:MM:SS` for log lines.  Hours may exceed 24.
///
/// Non-finite values render as `+inf` / `-inf`.
pub fn format_hms(secs: f64) -> String {
    if secs == f64::INFINITY {
        return "+inf".to_string();
    }
    if secs == f64::NEG_INFINITY {
        return "-inf".to_string();
    }
    if secs.is_nan() {
        return "nan".to_string();
    }
    let sign = if secs < 0.0 { "-" } else { "" };
    let total = secs.abs().floor() as u64;
    let hours = total / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    format!("{sign}{hours:02}:{minutes:02}:{seconds:02}")
}
