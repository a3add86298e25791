//! Unit tests for fb-network.
//!
//! All tests use a hand-crafted network so travel times are easy to verify.

#[cfg(test)]
mod helpers {
    use fb_core::LinkId;
    use crate::{Network, NetworkBuilder};

    /// Five-node grid, every road bidirectional, every speed 10 m/s.
    ///
    /// ```text
    ///   n0 ──100m── n1 ──100m── n2
    ///   │                        │
    ///  500m                    100m
    ///   │                        │
    ///   n3 ──────────100m────── n4
    /// ```
    ///
    /// Link ids in insertion order:
    ///
    /// | Road   | forward | backward |
    /// |--------|---------|----------|
    /// | n0-n1  | 0       | 1        |
    /// | n1-n2  | 2       | 3        |
    /// | n2-n4  | 4       | 5        |
    /// | n0-n3  | 6       | 7        |
    /// | n3-n4  | 8       | 9        |
    pub fn grid_network() -> Network {
        let mut b = NetworkBuilder::new();
        let n: Vec<_> = (0..5).map(|_| b.add_node()).collect();
        b.add_road(n[0], n[1], 100.0, 10.0);
        b.add_road(n[1], n[2], 100.0, 10.0);
        b.add_road(n[2], n[4], 100.0, 10.0);
        b.add_road(n[0], n[3], 500.0, 10.0);
        b.add_road(n[3], n[4], 100.0, 10.0);
        b.build()
    }

    pub fn links(ids: &[u32]) -> Vec<LinkId> {
        ids.iter().map(|&i| LinkId(i)).collect()
    }
}

// ── Builder & network structure ───────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use fb_core::{LinkId, NodeId};
    use crate::NetworkBuilder;

    #[test]
    fn empty_build() {
        let net = NetworkBuilder::new().build();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.link_count(), 0);
        assert!(net.is_empty());
        assert!(net.out_links(NodeId(0)).is_empty());
    }

    #[test]
    fn csr_out_links() {
        let net = super::helpers::grid_network();
        assert_eq!(net.node_count(), 5);
        assert_eq!(net.link_count(), 10);
        // n0 → n1 and n0 → n3.
        assert_eq!(net.out_links(NodeId(0)), &[LinkId(0), LinkId(6)]);
        for node in 0..5 {
            for &l in net.out_links(NodeId(node)) {
                assert_eq!(net.link(l).unwrap().from, NodeId(node));
            }
        }
    }

    #[test]
    fn directed_only_link() {
        let mut b = NetworkBuilder::new();
        let a = b.add_node();
        let c = b.add_node();
        b.add_link(a, c, 100.0, 10.0);
        let net = b.build();
        assert_eq!(net.out_links(a).len(), 1);
        assert!(net.out_links(c).is_empty());
    }

    #[test]
    fn unknown_link_lookup() {
        let net = super::helpers::grid_network();
        assert!(net.link(LinkId(10)).is_none());
        assert!(!net.contains(LinkId(10)));
        assert!(net.require_link(LinkId(10)).is_err());
    }

    #[test]
    fn freespeed_travel_time() {
        let net = super::helpers::grid_network();
        assert_eq!(net.link(LinkId(6)).unwrap().freespeed_travel_time(), 50.0);
    }
}

// ── Travel-time models ────────────────────────────────────────────────────────

#[cfg(test)]
mod travel_time {
    use fb_core::LinkId;
    use crate::{BinnedTravelTime, FreeSpeedTravelTime, TravelTime};

    #[test]
    fn free_speed_ignores_time() {
        let net = super::helpers::grid_network();
        let link = net.link(LinkId(0)).unwrap();
        assert_eq!(FreeSpeedTravelTime.link_travel_time(link, 0.0), 10.0);
        assert_eq!(FreeSpeedTravelTime.link_travel_time(link, 50_000.0), 10.0);
    }

    #[test]
    fn binned_factor_lookup() {
        let tt = BinnedTravelTime::new(3_600.0, vec![1.0, 1.5, 2.0]).unwrap();
        assert_eq!(tt.factor_at(-10.0), 1.0);
        assert_eq!(tt.factor_at(0.0), 1.0);
        assert_eq!(tt.factor_at(3_600.0), 1.5);
        assert_eq!(tt.factor_at(7_199.0), 1.5);
        // Last bin extends indefinitely.
        assert_eq!(tt.factor_at(1.0e6), 2.0);
    }

    #[test]
    fn binned_scales_free_speed() {
        let net = super::helpers::grid_network();
        let tt = BinnedTravelTime::new(60.0, vec![1.0, 3.0]).unwrap();
        let link = net.link(LinkId(2)).unwrap();
        assert_eq!(tt.link_travel_time(link, 0.0), 10.0);
        assert_eq!(tt.link_travel_time(link, 60.0), 30.0);
    }

    #[test]
    fn binned_falling_factor_breaks_fifo() {
        let net = super::helpers::grid_network();
        let tt = BinnedTravelTime::new(100.0, vec![3.0, 1.0]).unwrap();
        let link = net.link(LinkId(2)).unwrap();
        let exit_early = 99.0 + tt.link_travel_time(link, 99.0);
        let exit_late = 100.0 + tt.link_travel_time(link, 100.0);
        assert_eq!((exit_early, exit_late), (129.0, 110.0));
    }

    #[test]
    fn binned_rejects_bad_input() {
        assert!(BinnedTravelTime::new(0.0, vec![1.0]).is_err());
        assert!(BinnedTravelTime::new(60.0, vec![]).is_err());
        assert!(BinnedTravelTime::new(60.0, vec![1.0, 0.0]).is_err());
    }
}

// ── LinkPath ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod path {
    use fb_core::LinkId;
    use crate::{FreeSpeedTravelTime, LinkPath, NetworkError};
    use super::helpers::{grid_network, links};

    #[test]
    fn stamp_uses_zero_for_first_link() {
        let net = grid_network();
        let path = LinkPath::stamp(&net, &FreeSpeedTravelTime, &links(&[1, 0, 2]), 100.0).unwrap();
        assert_eq!(path.travel_times, vec![0.0, 10.0, 10.0]);
        assert_eq!(path.from_link(), LinkId(1));
        assert_eq!(path.to_link(), LinkId(2));
        assert_eq!(path.arrival_time(), 120.0);
    }

    #[test]
    fn enter_and_exit_times() {
        let net = grid_network();
        let path = LinkPath::stamp(&net, &FreeSpeedTravelTime, &links(&[1, 0, 2]), 100.0).unwrap();
        assert_eq!(path.link_enter_time(0), 100.0);
        assert_eq!(path.link_exit_time(0), 100.0);
        assert_eq!(path.link_enter_time(2), 110.0);
        assert_eq!(path.link_exit_time(2), 120.0);
    }

    #[test]
    fn link_index_at() {
        let net = grid_network();
        let path = LinkPath::stamp(&net, &FreeSpeedTravelTime, &links(&[1, 0, 2]), 100.0).unwrap();
        assert_eq!(path.link_index_at(99.0), 0);
        assert_eq!(path.link_index_at(100.0), 1);
        assert_eq!(path.link_index_at(105.0), 1);
        assert_eq!(path.link_index_at(110.0), 2);
        assert_eq!(path.link_index_at(500.0), 2);
    }

    #[test]
    fn stamp_rejects_empty_and_unknown() {
        let net = grid_network();
        assert!(matches!(
            LinkPath::stamp(&net, &FreeSpeedTravelTime, &[], 0.0),
            Err(NetworkError::EmptyPath)
        ));
        assert!(matches!(
            LinkPath::stamp(&net, &FreeSpeedTravelTime, &links(&[0, 99]), 0.0),
            Err(NetworkError::LinkNotFound(LinkId(99)))
        ));
    }

    #[test]
    fn stationary_path() {
        let path = LinkPath::stationary(LinkId(3), 42.0);
        assert_eq!(path.len(), 1);
        assert_eq!(path.arrival_time(), 42.0);
    }
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use fb_core::LinkId;
    use crate::{
        BinnedTravelTime, DijkstraRouter, FreeSpeedTravelTime, NetworkBuilder, NetworkError, Router,
    };
    use super::helpers::{grid_network, links};

    #[test]
    fn shortest_path_prefers_fast_side() {
        let net = grid_network();
        // Leave n1→n0 (link 1), reach n2→n4 (link 4): 1 → 0 → 2 → 4.
        let path = DijkstraRouter
            .compute_path(&net, LinkId(1), LinkId(4), 0.0, &FreeSpeedTravelTime)
            .unwrap();
        assert_eq!(path.links, links(&[1, 0, 2, 4]));
        assert_eq!(path.travel_times, vec![0.0, 10.0, 10.0, 10.0]);
        assert_eq!(path.arrival_time(), 30.0);
    }

    #[test]
    fn same_link_is_stationary() {
        let net = grid_network();
        let path = DijkstraRouter
            .compute_path(&net, LinkId(3), LinkId(3), 7.0, &FreeSpeedTravelTime)
            .unwrap();
        assert_eq!(path.links, links(&[3]));
        assert_eq!(path.arrival_time(), 7.0);
    }

    #[test]
    fn time_dependent_costs() {
        let net = grid_network();
        // Factor doubles from t = 15 onwards; link 4 is entered at t = 20.
        let tt = BinnedTravelTime::new(15.0, vec![1.0, 2.0]).unwrap();
        let path = DijkstraRouter.compute_path(&net, LinkId(1), LinkId(4), 0.0, &tt).unwrap();
        assert_eq!(path.travel_times, vec![0.0, 10.0, 10.0, 20.0]);
        assert_eq!(path.arrival_time(), 40.0);
    }

    #[test]
    fn route_matches_stamp() {
        let net = grid_network();
        let path = DijkstraRouter
            .compute_path(&net, LinkId(7), LinkId(8), 12.0, &FreeSpeedTravelTime)
            .unwrap();
        let restamped = crate::LinkPath::stamp(&net, &FreeSpeedTravelTime, &path.links, 12.0).unwrap();
        assert_eq!(path, restamped);
    }

    #[test]
    fn no_route() {
        let mut b = NetworkBuilder::new();
        let a = b.add_node();
        let c = b.add_node();
        let d = b.add_node();
        let ac = b.add_link(a, c, 100.0, 10.0);
        let da = b.add_link(d, a, 100.0, 10.0);
        let net = b.build();
        let err = DijkstraRouter
            .compute_path(&net, ac, da, 0.0, &FreeSpeedTravelTime)
            .unwrap_err();
        assert!(matches!(err, NetworkError::NoRoute { .. }));
    }

    #[test]
    fn unknown_link() {
        let net = grid_network();
        let err = DijkstraRouter
            .compute_path(&net, LinkId(0), LinkId(77), 0.0, &FreeSpeedTravelTime)
            .unwrap_err();
        assert!(matches!(err, NetworkError::LinkNotFound(LinkId(77))));
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use fb_core::{LinkId, NodeId};
    use crate::load_network_reader;

    #[test]
    fn loads_links_in_order() {
        let csv = "link_id,from_node,to_node,length_m,freespeed_mps\n\
                   0,0,1,500.0,10.0\n\
                   1,1,0,500.0,10.0\n\
                   2,1,7,300.0,15.0\n";
        let net = load_network_reader(Cursor::new(csv)).unwrap();
        assert_eq!(net.link_count(), 3);
        assert_eq!(net.node_count(), 8);
        let l2 = net.link(LinkId(2)).unwrap();
        assert_eq!(l2.to, NodeId(7));
        assert_eq!(l2.freespeed_travel_time(), 20.0);
    }

    #[test]
    fn rejects_sparse_link_ids() {
        let csv = "link_id,from_node,to_node,length_m,freespeed_mps\n\
                   0,0,1,500.0,10.0\n\
                   2,1,0,500.0,10.0\n";
        assert!(load_network_reader(Cursor::new(csv)).is_err());
    }

    #[test]
    fn rejects_zero_speed() {
        let csv = "link_id,from_node,to_node,length_m,freespeed_mps\n\
                   0,0,1,500.0,0.0\n";
        assert!(load_network_reader(Cursor::new(csv)).is_err());
    }

    #[test]
    fn rejects_malformed_row() {
        let csv = "link_id,from_node,to_node,length_m,freespeed_mps\n\
                   0,zero,1,500.0,10.0\n";
        assert!(load_network_reader(Cursor::new(csv)).is_err());
    }
}
