//! Travel-time models.
//!
//! The bridge never caches travel times: every query goes through
//! [`TravelTime::link_travel_time`] with the time of interest, so a
//! time-dependent model answers differently at the start of the run and in
//! the middle of the rush hour.

use crate::network::Link;
use crate::{NetworkError, NetworkResult};

/// Pluggable link travel-time model.
///
/// Implementations must be `Send + Sync`; the host simulation may hold the
/// model while vehicles are advanced on Rayon workers.
pub trait TravelTime: Send + Sync {
    /// Seconds needed to traverse `link` when entering it at `time`.
    fn link_travel_time(&self, link: &Link, time: f64) -> f64;
}

/// Length divided by free-flow speed, independent of time.
pub struct FreeSpeedTravelTime;

impl TravelTime for FreeSpeedTravelTime {
    #[inline]
    fn link_travel_time(&self, link: &Link, _time: f64) -> f64 {
        link.freespeed_travel_time()
    }
}

/// Free-speed travel time scaled by a time-of-day congestion factor.
///
/// Factor `k` applies to `[k * bin_secs, (k + 1) * bin_secs)`; the last
/// factor extends indefinitely and times before zero use the first.
#[derive(Clone, Debug)]
pub struct BinnedTravelTime {
    bin_secs: f64,
    factors:  Vec<f64>,
}

impl BinnedTravelTime {
    pub fn new(bin_secs: f64, factors: Vec<f64>) -> NetworkResult<Self> {
        if !(bin_secs.is_finite() && bin_secs > 0.0) {
            return Err(NetworkError::InvalidTravelTime(format!("bin width {bin_secs} must be > 0")));
        }
        if factors.is_empty() {
            return Err(NetworkError::InvalidTravelTime("at least one factor is required".to_string()));
        }
        if let Some(bad) = factors.iter().find(|f| !(f.is_finite() && **f > 0.0)) {
            return Err(NetworkError::InvalidTravelTime(format!("factor {bad} must be > 0")));
        }
        Ok(Self { bin_secs, factors })
    }

    /// Congestion factor in effect at `time`.
    pub fn factor_at(&self, time: f64) -> f64 {
        let bin = (time / self.bin_secs).floor();
        let idx = if bin <= 0.0 { 0 } else { (bin as usize).min(self.factors.len() - 1) };
        self.factors[idx]
    }
}

impl TravelTime for BinnedTravelTime {
    fn link_travel_time(&self, link: &Link, time: f64) -> f64 {
        link.freespeed_travel_time() * self.factor_at(time)
    }
}
