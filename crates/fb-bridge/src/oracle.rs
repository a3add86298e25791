//! Travel-time oracle answering the optimizer's mid-exchange queries.

use std::collections::BTreeMap;

use fb_core::LinkId;
use fb_network::{Network, TravelTime};

use crate::{BridgeError, BridgeResult};

/// Read-only view of the live travel-time model.
///
/// Every query evaluates the model afresh; nothing is cached between
/// queries or steps.
pub struct TravelTimeOracle<'a> {
    network:     &'a Network,
    travel_time: &'a dyn TravelTime,
}

impl<'a> TravelTimeOracle<'a> {
    pub fn new(network: &'a Network, travel_time: &'a dyn TravelTime) -> Self {
        Self { network, travel_time }
    }

    /// Travel time of each link in `links` when entered at `at_time`.
    /// An empty `links` slice means every link of the network.
    pub fn query(&self, links: &[LinkId], at_time: f64) -> BridgeResult<BTreeMap<LinkId, f64>> {
        if links.is_empty() {
            return Ok(self
                .network
                .links()
                .map(|l| (l.id, self.travel_time.link_travel_time(l, at_time)))
                .collect());
        }

        links
            .iter()
            .map(|&id| {
                let link = self.network.link(id).ok_or(BridgeError::UnknownLink(id))?;
                Ok((id, self.travel_time.link_travel_time(link, at_time)))
            })
            .collect()
    }
}
