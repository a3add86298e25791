//! `LinkPath` — a timed link sequence.
//!
//! # Timing model
//!
//! ```text
//! links:        [ L0,  L1,  L2 ]
//! travel_times: [ 0,   t1,  t2 ]
//! exit(i)  = departure + t0 + … + ti
//! enter(i) = exit(i - 1)           (enter(0) = departure)
//! ```
//!
//! `L0` is the link the vehicle is leaving, so its travel time is normally 0.
//! A diverted path may carry a positive `t0` for the part of the first link
//! that is still being driven.

use fb_core::LinkId;

use crate::network::Network;
use crate::travel_time::TravelTime;
use crate::{NetworkError, NetworkResult};

/// A link sequence with per-link travel times, departing at `departure`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkPath {
    pub departure:    f64,
    pub links:        Vec<LinkId>,
    pub travel_times: Vec<f64>,
}

impl LinkPath {
    /// A zero-length path that stays on `link`.
    pub fn stationary(link: LinkId, departure: f64) -> Self {
        Self { departure, links: vec![link], travel_times: vec![0.0] }
    }

    /// Build a path along an explicit link sequence, stamping every link
    /// after the first with its travel time at the moment it is entered.
    pub fn stamp(
        network:     &Network,
        travel_time: &dyn TravelTime,
        links:       &[LinkId],
        departure:   f64,
    ) -> NetworkResult<Self> {
        let Some((&first, rest)) = links.split_first() else {
            return Err(NetworkError::EmptyPath);
        };
        network.require_link(first)?;

        let mut travel_times = Vec::with_capacity(links.len());
        travel_times.push(0.0);
        let mut enter = departure;
        for &id in rest {
            let link = network.require_link(id)?;
            let tt = travel_time.link_travel_time(link, enter);
            travel_times.push(tt);
            enter += tt;
        }

        Ok(Self { departure, links: links.to_vec(), travel_times })
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// The link the path departs from.
    pub fn from_link(&self) -> LinkId {
        self.links[0]
    }

    /// The destination link.
    pub fn to_link(&self) -> LinkId {
        self.links[self.links.len() - 1]
    }

    pub fn total_travel_time(&self) -> f64 {
        self.travel_times.iter().sum()
    }

    pub fn arrival_time(&self) -> f64 {
        self.departure + self.total_travel_time()
    }

    /// Time at which link `idx` is entered.
    pub fn link_enter_time(&self, idx: usize) -> f64 {
        self.departure + self.travel_times[..idx].iter().sum::<f64>()
    }

    /// Time at which link `idx` is left.
    pub fn link_exit_time(&self, idx: usize) -> f64 {
        self.link_enter_time(idx) + self.travel_times[idx]
    }

    /// Index of the link occupied at `time`: the last link whose enter time
    /// is `<= time`, clamped to the path.
    pub fn link_index_at(&self, time: f64) -> usize {
        let mut enter = self.departure;
        let mut idx = 0;
        for (i, tt) in self.travel_times.iter().enumerate() {
            if enter > time {
                break;
            }
            idx = i;
            enter += tt;
        }
        idx
    }
}
