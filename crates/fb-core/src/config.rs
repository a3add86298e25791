//! Bridge configuration.
//!
//! Loaded from a JSON file by the application crate (feature `serde`) and
//! then passed, piece by piece, to the transport and the host simulation.
//! Every field except the time range has a default, so a minimal file is:
//!
//! ```json
//! { "start_time": 0.0, "end_time": 86400.0 }
//! ```

use crate::{CoreError, CoreResult, StepClock};

/// Port the optimizer connects to unless configured otherwise.
pub const DEFAULT_PORT: u16 = 9001;

/// Upper bound on a single wire frame.  Larger frames are a protocol
/// violation.
pub const DEFAULT_MAX_FRAME_BYTES: usize = 64 * 1024 * 1024;

/// Top-level configuration for one bridge run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BridgeConfig {
    /// Interface the bridge binds to.
    #[cfg_attr(feature = "serde", serde(default = "default_host"))]
    pub host: String,

    /// TCP port the bridge binds to.
    #[cfg_attr(feature = "serde", serde(default = "default_port"))]
    pub port: u16,

    /// Simulated time of the first step, in seconds.
    pub start_time: f64,

    /// Exclusive end of the run, in seconds.
    pub end_time: f64,

    /// Seconds between two exchanges with the optimizer.
    #[cfg_attr(feature = "serde", serde(default = "default_step_secs"))]
    pub step_secs: f64,

    /// Largest accepted inbound frame in bytes.
    #[cfg_attr(feature = "serde", serde(default = "default_max_frame_bytes"))]
    pub max_frame_bytes: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host:            default_host(),
            port:            DEFAULT_PORT,
            start_time:      0.0,
            end_time:        86_400.0,
            step_secs:       default_step_secs(),
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }
}

impl BridgeConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject configurations the step loop cannot run.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.step_secs.is_finite() && self.step_secs > 0.0) {
            return Err(CoreError::Config(format!(
                "step_secs must be a positive number, got {}",
                self.step_secs
            )));
        }
        if !self.start_time.is_finite() || !self.end_time.is_finite() {
            return Err(CoreError::Config("start_time and end_time must be finite".to_string()));
        }
        if self.end_time < self.start_time {
            return Err(CoreError::Config(format!(
                "end_time {} is before start_time {}",
                self.end_time, self.start_time
            )));
        }
        if self.max_frame_bytes == 0 {
            return Err(CoreError::Config("max_frame_bytes must be > 0".to_string()));
        }
        Ok(())
    }

    /// Construct a `StepClock` pre-configured for this run.
    pub fn make_clock(&self) -> StepClock {
        StepClock::new(self.start_time, self.step_secs, self.end_time)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[cfg_attr(not(feature = "serde"), allow(dead_code))]
fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_step_secs() -> f64 {
    1.0
}

#[cfg_attr(not(feature = "serde"), allow(dead_code))]
fn default_max_frame_bytes() -> usize {
    DEFAULT_MAX_FRAME_BYTES
}
