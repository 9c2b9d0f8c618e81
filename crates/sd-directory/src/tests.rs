//! Unit tests for sd-directory.

#[cfg(test)]
mod helpers {
    use std::sync::Arc;

    use sd_core::{NodeId, Point, SegmentId};
    use sd_network::{LaneSpec, RoadNetwork, RoadNetworkBuilder, SegmentSpec};

    use crate::TrafficSignal;

    pub fn line(points: &[(i64, i64)]) -> Vec<Point> {
        points.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    /// A(0,0) → B(1000,0) → C(1000,1000), one-way, plus a two-way sidewalked
    /// street C → D(1000,5000).
    pub fn town() -> (Arc<RoadNetwork>, [NodeId; 4], [SegmentId; 3]) {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_multi_node(Point::new(0, 0));
        let m = b.add_multi_node(Point::new(1_000, 0));
        let c = b.add_multi_node(Point::new(1_000, 1_000));
        let d = b.add_multi_node(Point::new(1_000, 5_000));
        let l0 = b.add_link("A-B", a, m).unwrap();
        let l1 = b.add_link("B-C", m, c).unwrap();
        let l2 = b.add_link("C-D", c, d).unwrap();
        let ab = b
            .add_segment(l0, SegmentSpec::new(a, m, line(&[(0, 0), (1_000, 0)])).lane(LaneSpec::driving(300)))
            .unwrap();
        let bc = b
            .add_segment(
                l1,
                SegmentSpec::new(m, c, line(&[(1_000, 0), (1_000, 1_000)])).lane(LaneSpec::driving(300)),
            )
            .unwrap();
        let cd = b
            .add_segment(
                l2,
                SegmentSpec::new(c, d, line(&[(1_000, 1_000), (1_000, 5_000)]))
                    .lane(LaneSpec::sidewalk(300))
                    .lane(LaneSpec::driving(1_200))
                    .lane(LaneSpec::driving(1_200))
                    .lane(LaneSpec::sidewalk(300))
                    .bidirectional(),
            )
            .unwrap();
        (Arc::new(b.build().unwrap()), [a, m, c, d], [ab, bc, cd])
    }

    pub struct TestSignal {
        pub node: NodeId,
    }

    impl TrafficSignal for TestSignal {
        fn node(&self) -> NodeId {
            self.node
        }
    }

    pub fn signal(node: NodeId) -> Arc<dyn TrafficSignal> {
        Arc::new(TestSignal { node })
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use sd_core::{DirectoryConfig, NodeId, Point};

    use super::helpers::town;
    use crate::{DirectoryError, StreetDirectory};

    #[test]
    fn uninitialized_queries_are_empty() {
        let dir = StreetDirectory::new();
        assert!(!dir.is_ready());
        assert_eq!(dir.get_lane(Point::new(500, 0)), None);
        assert!(dir.closest_road_segments(Point::new(500, 0), 1_000, 1_000).is_empty());
        assert!(dir.shortest_driving_path(NodeId(0), NodeId(2)).unwrap().is_empty());
        assert!(dir.shortest_walking_path(Point::new(0, 0), Point::new(9, 9)).unwrap().is_empty());
        assert!(dir.signal_at(NodeId(0)).is_none());
        assert!(dir.stats().is_none());
        assert!(dir.network().is_none());
    }

    #[test]
    fn init_twice_fails() {
        let (net, ..) = town();
        let dir = StreetDirectory::new();
        dir.init(net.clone(), 1_000, 1_000).unwrap();
        assert!(dir.is_ready());
        assert!(matches!(dir.init(net, 1_000, 1_000), Err(DirectoryError::AlreadyInitialized)));
    }

    #[test]
    fn invalid_grid_is_a_config_error() {
        let (net, ..) = town();
        let dir = StreetDirectory::new();
        assert!(matches!(dir.init(net.clone(), 0, 1_000), Err(DirectoryError::Config(_))));
        assert!(!dir.is_ready());

        let config = DirectoryConfig { walking_merge_tolerance_cm: -1, ..DirectoryConfig::default() };
        assert!(matches!(dir.init_with_config(net, config), Err(DirectoryError::Config(_))));
    }

    #[test]
    fn config_is_kept() {
        let (net, ..) = town();
        let dir = StreetDirectory::new();
        dir.init(net, 2_000, 3_000).unwrap();
        let config = dir.config().unwrap();
        assert_eq!((config.grid_width_cm, config.grid_height_cm), (2_000, 3_000));
        assert_eq!(config.driving_merge_tolerance_cm, 50);
        assert_eq!(dir.grid().unwrap().cell_size(), (2_000, 3_000));
    }
}

// ── Queries ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod queries {
    use sd_core::{NodeId, Point};
    use sd_spatial::SpatialError;

    use super::helpers::town;
    use crate::{DirectoryError, StreetDirectory, WayPoint};

    fn ready() -> (StreetDirectory, [NodeId; 4], [sd_core::SegmentId; 3]) {
        let (net, nodes, segs) = town();
        let dir = StreetDirectory::new();
        dir.init(net, 1_000, 1_000).unwrap();
        (dir, nodes, segs)
    }

    #[test]
    fn driving_path_a_to_c() {
        let (dir, [a, b, c, _], [ab, bc, _]) = ready();
        let path = dir.shortest_driving_path(a, c).unwrap();
        assert_eq!(path, vec![WayPoint::RoadSegment(ab), WayPoint::RoadSegment(bc)]);
        assert!(dir.shortest_driving_path(c, a).unwrap().is_empty());
        assert!(dir.shortest_driving_path(b, b).unwrap().is_empty());
    }

    #[test]
    fn driving_path_over_two_way_street() {
        let (dir, [a, _, c, d], [ab, bc, cd]) = ready();
        let path = dir.shortest_driving_path(a, d).unwrap();
        assert_eq!(path, vec![WayPoint::RoadSegment(ab), WayPoint::RoadSegment(bc), WayPoint::RoadSegment(cd)]);
        assert_eq!(dir.shortest_driving_path(d, c).unwrap(), vec![WayPoint::RoadSegment(cd)]);
    }

    #[test]
    fn unknown_node_is_an_error() {
        let (dir, [a, ..], _) = ready();
        let err = dir.shortest_driving_path(a, NodeId(77)).unwrap_err();
        assert!(matches!(err, DirectoryError::Spatial(SpatialError::NodeNotFound(_))));
    }

    #[test]
    fn lane_lookup() {
        let (dir, _, [ab, _, cd]) = ready();
        let net = dir.network().unwrap().clone();

        let hit = dir.get_lane(Point::new(500, 100)).unwrap();
        assert_eq!(hit.lane, net.segment(ab).lanes[0]);
        assert_eq!((hit.start, hit.end), (0, 1));

        // West of the northbound street is its left edge: the first sidewalk.
        let hit = dir.get_lane(Point::new(-400, 3_000)).unwrap();
        assert_eq!(hit.lane, net.segment(cd).lanes[0]);

        assert_eq!(dir.get_lane(Point::new(40_000, 40_000)), None);
    }

    #[test]
    fn closest_segments_cover_the_neighbourhood() {
        let (dir, _, [ab, bc, _]) = ready();
        let found = dir.closest_road_segments(Point::new(900, 100), 200, 200);
        assert!(found.iter().any(|s| s.segment == ab));
        assert!(found.iter().any(|s| s.segment == bc));
        assert!(dir.closest_road_segments(Point::new(40_000, 40_000), 10, 10).is_empty());
    }

    #[test]
    fn walking_path_along_the_sidewalk() {
        let (dir, _, [.., cd]) = ready();
        let net = dir.network().unwrap().clone();
        let left = net.segment(cd).lanes[0];
        let start = net.lane(left).polyline[0];
        let end = net.lane(left).polyline[1];

        let path = dir.shortest_walking_path(start, end).unwrap();
        assert_eq!(path, vec![WayPoint::SideWalk { lane: left, reverse: false }]);

        let off = Point::new(end.x - 30, end.y + 20);
        let path = dir.shortest_walking_path(off, start).unwrap();
        assert_eq!(path, vec![WayPoint::Node(off), WayPoint::SideWalk { lane: left, reverse: true }]);
    }

    #[test]
    fn bulk_routing_keeps_input_order() {
        let (dir, [a, b, c, d], _) = ready();
        let pairs = [(a, c), (c, a), (a, NodeId(99)), (d, c), (b, b)];
        let results = dir.shortest_driving_paths(&pairs);
        assert_eq!(results.len(), pairs.len());
        for (result, &(from, to)) in results.iter().zip(&pairs) {
            match (result, dir.shortest_driving_path(from, to)) {
                (Ok(bulk), Ok(single)) => assert_eq!(bulk, &single),
                (Err(_), Err(_)) => {}
                other => panic!("bulk and single query disagree for {from} -> {to}: {other:?}"),
            }
        }
        assert!(results[2].is_err());
    }

    #[test]
    fn concurrent_readers_agree() {
        let (dir, [a, _, _, d], _) = ready();
        let expected = dir.shortest_driving_path(a, d).unwrap();
        let expected_lane = dir.get_lane(Point::new(500, 100));

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..50 {
                        assert_eq!(dir.shortest_driving_path(a, d).unwrap(), expected);
                        assert_eq!(dir.get_lane(Point::new(500, 100)), expected_lane);
                    }
                });
            }
        });
    }
}

// ── Signals ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod signals {
    use std::sync::Arc;

    use sd_core::NodeId;

    use super::helpers::{signal, town};
    use crate::{DirectoryError, SignalTable, StreetDirectory};

    #[test]
    fn first_registration_wins() {
        let table = SignalTable::new();
        let first = signal(NodeId(1));
        assert!(table.register(first.clone()).unwrap());
        assert!(!table.register(signal(NodeId(1))).unwrap());
        assert_eq!(table.len(), 1);

        assert!(table.seal());
        let found = table.signal_at(NodeId(1)).unwrap();
        assert!(Arc::ptr_eq(&found, &first));
    }

    #[test]
    fn reads_wait_for_seal() {
        let table = SignalTable::new();
        table.register(signal(NodeId(3))).unwrap();
        assert!(table.signal_at(NodeId(3)).is_none());
        assert!(table.seal());
        assert!(!table.seal());
        assert!(table.signal_at(NodeId(3)).is_some());
        assert!(table.signal_at(NodeId(4)).is_none());
    }

    #[test]
    fn register_after_seal_fails() {
        let table = SignalTable::new();
        table.seal();
        assert!(matches!(table.register(signal(NodeId(0))), Err(DirectoryError::SignalTableSealed)));
        assert!(table.is_empty());
    }

    #[test]
    fn concurrent_registration() {
        let table = SignalTable::new();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                let table = &table;
                scope.spawn(move || {
                    for n in 0..100u32 {
                        // Every node is offered by all four threads.
                        let _ = table.register(signal(NodeId(n)));
                    }
                });
            }
        });
        assert_eq!(table.len(), 100);
        table.seal();
        assert!((0..100).all(|n| table.signal_at(NodeId(n)).is_some()));
    }

    #[test]
    fn directory_signal_lookup_needs_init() {
        let (net, [a, ..], _) = town();
        let dir = StreetDirectory::new();
        let at_a = signal(a);
        dir.register_signal(at_a.clone()).unwrap();
        dir.seal_signals();
        assert!(dir.signal_at(a).is_none());

        dir.init(net, 1_000, 1_000).unwrap();
        let found = dir.signal_at(a).unwrap();
        assert!(Arc::ptr_eq(&found, &at_a));
    }
}

// ── Statistics ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod stats {
    use sd_core::DirectoryConfig;

    use super::helpers::town;
    use crate::StreetDirectory;

    #[test]
    fn collected_only_on_request() {
        let (net, ..) = town();
        let dir = StreetDirectory::new();
        dir.init(net.clone(), 1_000, 1_000).unwrap();
        assert!(dir.stats().is_none());

        let dir = StreetDirectory::new();
        let config = DirectoryConfig { keep_stats: true, ..DirectoryConfig::with_grid(1_000, 1_000) };
        dir.init_with_config(net, config).unwrap();
        let stats = dir.stats().unwrap();
        assert_eq!(stats.driving_vertices, 4);
        assert_eq!(stats.driving_edges, 4);
        assert_eq!(stats.walking_vertices, 4);
        assert_eq!(stats.walking_edges, 4);
        assert_eq!(stats.synthetic_vertices, 0);
        // A-B and B-C once each, C-D on both link paths.
        assert_eq!(stats.grid_stretches, 4);
        assert!(stats.grid_cells > 0);

        let text = stats.to_string();
        assert!(text.contains("driving: 4 vertices"));
        dir.print_statistics();
    }
}
