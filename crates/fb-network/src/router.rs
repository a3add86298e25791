//! Routing trait and default time-dependent Dijkstra implementation.
//!
//! # Pluggability
//!
//! The bridge calls routing via the [`Router`] trait, so applications can
//! swap in custom implementations (A*, contraction hierarchies, precomputed
//! matrices) without touching the reconciler.
//!
//! # Cost model
//!
//! The cost of a path is its arrival time.  Each link's travel time is
//! evaluated at the moment the link is entered, so a congested time bin
//! slows only the links entered during it.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use fb_core::LinkId;

use crate::network::Network;
use crate::path::LinkPath;
use crate::travel_time::TravelTime;
use crate::{NetworkError, NetworkResult};

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable least-time routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so a router can be shared with
/// worker threads of the host simulation.
pub trait Router: Send + Sync {
    /// Compute a path leaving `from` at `departure` and ending on `to`.
    ///
    /// `from == to` yields a stationary single-link path.
    fn compute_path(
        &self,
        network:     &Network,
        from:        LinkId,
        to:          LinkId,
        departure:   f64,
        travel_time: &dyn TravelTime,
    ) -> NetworkResult<LinkPath>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Time-dependent Dijkstra over links.
///
/// Labels are link exit times.  The search is exact only for FIFO
/// travel-time models (entering later never means leaving earlier).
/// [`FreeSpeedTravelTime`](crate::FreeSpeedTravelTime) is FIFO;
/// [`BinnedTravelTime`](crate::BinnedTravelTime) is not when a factor is
/// smaller than the one before it, and the path returned is then valid but
/// may not arrive earliest.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn compute_path(
        &self,
        network:     &Network,
        from:        LinkId,
        to:          LinkId,
        departure:   f64,
        travel_time: &dyn TravelTime,
    ) -> NetworkResult<LinkPath> {
        dijkstra(network, from, to, departure, travel_time)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Heap entry ordered so that `BinaryHeap` (a max-heap) pops the earliest
/// time first.  Ties break on link id for deterministic paths.
#[derive(PartialEq)]
struct Label {
    time: f64,
    link: LinkId,
}

impl Eq for Label {}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.link.cmp(&self.link))
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn dijkstra(
    network:     &Network,
    from:        LinkId,
    to:          LinkId,
    departure:   f64,
    travel_time: &dyn TravelTime,
) -> NetworkResult<LinkPath> {
    network.require_link(from)?;
    network.require_link(to)?;

    if from == to {
        return Ok(LinkPath::stationary(from, departure));
    }

    let n = network.link_count();
    // exit[l] = best known time of leaving link l.
    let mut exit = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<LinkId>> = vec![None; n];

    exit[from.index()] = departure;
    let mut heap = BinaryHeap::new();
    heap.push(Label { time: departure, link: from });

    while let Some(Label { time, link }) = heap.pop() {
        if link == to {
            return Ok(reconstruct(&exit, &prev, from, to, departure));
        }
        // Skip stale heap entries.
        if time > exit[link.index()] {
            continue;
        }

        let node = network.require_link(link)?.to;
        for &next in network.out_links(node) {
            let next_link = network.require_link(next)?;
            let arrive = time + travel_time.link_travel_time(next_link, time);
            if arrive < exit[next.index()] {
                exit[next.index()] = arrive;
                prev[next.index()] = Some(link);
                heap.push(Label { time: arrive, link: next });
            }
        }
    }

    Err(NetworkError::NoRoute { from, to })
}

fn reconstruct(
    exit:      &[f64],
    prev:      &[Option<LinkId>],
    from:      LinkId,
    to:        LinkId,
    departure: f64,
) -> LinkPath {
    let mut links = vec![to];
    let mut cur = to;
    while cur != from {
        match prev[cur.index()] {
            Some(p) => {
                links.push(p);
                cur = p;
            }
            None => break,
        }
    }
    links.reverse();

    let travel_times = links
        .iter()
        .enumerate()
        .map(|(i, l)| if i == 0 { 0.0 } else { exit[l.index()] - exit[links[i - 1].index()] })
        .collect();

    LinkPath { departure, links, travel_times }
}
