//! Driving and walking graph construction, and path queries over them.
//!
//! # Driving graph
//!
//! Each link path is walked segment by segment in travel direction.  A
//! multi-node is its own vertex.  A uni-node is replaced by one synthetic
//! vertex per link path, placed where the carriageway of that direction
//! meets the node: the end of lane-zero when a segment is driven along its
//! polyline, the end of its last lane when driven against it.  A new vertex
//! merges with an existing one within `driving_merge_tolerance_cm`, except
//! the vertex of the opposite direction at the same uni-node, so no U-turn
//! is possible there.  Bus stops split a segment's edge:
//! the piece ending at the stop carries [`WayPoint::BusStop`], the final
//! piece carries [`WayPoint::RoadSegment`].
//!
//! # Walking graph
//!
//! Every pedestrian lane becomes a pair of opposite edges between its end
//! points; every crossing met while walking the driving paths becomes a
//! pair of opposite edges along its near line.  Vertices within
//! `walking_merge_tolerance_cm` are merged.  Each lane and each crossing is
//! added once, however many link paths pass over it.

use log::{debug, trace};

use sd_core::{Cm, CrossingId, DirectoryConfig, LaneId, NodeId, Point, VertexId};
use sd_network::{Node, Obstacle, PathStep, RoadNetwork, RoadSegment};

use crate::{
    Graph, GraphBuilder, HashMap, HashSet, Router, SpatialError, SpatialResult, WayPoint,
};

// ── RoutingGraphs ─────────────────────────────────────────────────────────────

/// The driving and walking graphs of one road network.
pub struct RoutingGraphs {
    pub driving: Graph,
    pub walking: Graph,
    multi_vertices:     HashMap<NodeId, VertexId>,
    /// Synthetic vertices created for each uni-node, in creation order.
    uni_vertices:       HashMap<NodeId, Vec<VertexId>>,
    driving_tolerance:  Cm,
    synthetic_vertices: usize,
}

impl RoutingGraphs {
    /// Build both graphs from `network`.  Single pass, deterministic.
    pub fn build(network: &RoadNetwork, config: &DirectoryConfig) -> Self {
        let mut c = Construction {
            network,
            config,
            driving:         GraphBuilder::new(),
            walking:         GraphBuilder::new(),
            multi_vertices:  HashMap::default(),
            uni_vertices:    HashMap::default(),
            uni_sides:       HashMap::default(),
            seen_sidewalks:  HashSet::default(),
            seen_crossings:  HashSet::default(),
            synthetic:       0,
        };

        for link in network.links() {
            let [(_, forward), (_, reverse)] = link.paths();
            for (forward_path, path) in [(true, forward), (false, reverse)] {
                for step in path {
                    c.add_step(*step, forward_path);
                }
            }
        }

        debug!(
            "routing graphs: driving {} vertices / {} edges ({} synthetic), walking {} vertices / {} edges",
            c.driving.vertex_count(),
            c.driving.edge_count(),
            c.synthetic,
            c.walking.vertex_count(),
            c.walking.edge_count(),
        );

        Self {
            driving:            c.driving.build(),
            walking:            c.walking.build(),
            multi_vertices:     c.multi_vertices,
            uni_vertices:       c.uni_vertices,
            driving_tolerance:  config.driving_merge_tolerance_cm,
            synthetic_vertices: c.synthetic,
        }
    }

    /// Vertices created for uni-nodes and bus stops.
    pub fn synthetic_vertex_count(&self) -> usize {
        self.synthetic_vertices
    }

    /// Driving vertices standing for `node`.
    ///
    /// A multi-node has exactly one.  A uni-node has one per direction it
    /// was passed in; a uni-node never passed during construction resolves
    /// to an existing vertex within the merge tolerance of its location.
    pub fn driving_vertices(&self, network: &RoadNetwork, node: NodeId) -> SpatialResult<Vec<VertexId>> {
        match network.get_node(node) {
            None => Err(SpatialError::NodeNotFound(node)),
            Some(Node::Multi(_)) => self
                .multi_vertices
                .get(&node)
                .map(|&v| vec![v])
                .ok_or(SpatialError::NodeNotInGraph(node)),
            Some(Node::Uni(u)) => match self.uni_vertices.get(&node) {
                Some(vs) => Ok(vs.clone()),
                None => self
                    .driving
                    .find_within(u.location, self.driving_tolerance)
                    .map(|v| vec![v])
                    .ok_or(SpatialError::NodeNotInGraph(node)),
            },
        }
    }

    /// Cheapest driving path from `from` to `to`.
    ///
    /// Empty when `from == to` or when `to` is unreachable.  Fails when
    /// either node has no driving vertex.  When a uni-node has a vertex per
    /// direction, the cheapest combination wins; ties go to the earliest
    /// created vertices.
    pub fn shortest_driving_path<R: Router + ?Sized>(
        &self,
        router:  &R,
        network: &RoadNetwork,
        from:    NodeId,
        to:      NodeId,
    ) -> SpatialResult<Vec<WayPoint>> {
        if from == to {
            return Ok(Vec::new());
        }
        let sources = self.driving_vertices(network, from)?;
        let targets = self.driving_vertices(network, to)?;

        let mut best: Option<(u64, Vec<WayPoint>)> = None;
        for &s in &sources {
            let tree = router.shortest_path_tree(&self.driving, s);
            for &t in &targets {
                let Some(d) = tree.distance(t) else {
                    continue;
                };
                if best.as_ref().is_none_or(|(bd, _)| d < *bd) {
                    best = Some((d, tree.waypoints(&self.driving, t)));
                }
            }
        }
        trace!("driving path {from} -> {to}: {:?}", best.as_ref().map(|b| b.0));
        Ok(best.map(|(_, path)| path).unwrap_or_default())
    }

    /// Cheapest walking path between two arbitrary points.
    ///
    /// Each point snaps to the nearest walking vertex.  When the snapped
    /// vertex is not exactly at the query point, a [`WayPoint::Node`] for
    /// the query point is added at that end.  Empty when the points are
    /// equal, snap to the same vertex, or are not connected.
    pub fn shortest_walking_path<R: Router + ?Sized>(
        &self,
        router: &R,
        from:   Point,
        to:     Point,
    ) -> SpatialResult<Vec<WayPoint>> {
        if from == to {
            return Ok(Vec::new());
        }
        let source = self.walking.nearest_vertex(from).ok_or(SpatialError::EmptyGraph("walking"))?;
        let target = self.walking.nearest_vertex(to).ok_or(SpatialError::EmptyGraph("walking"))?;

        let tree = router.shortest_path_tree(&self.walking, source);
        let inner = tree.waypoints(&self.walking, target);
        if inner.is_empty() {
            return Ok(inner);
        }

        let mut path = Vec::with_capacity(inner.len() + 2);
        if self.walking.vertex(source).location != from {
            path.push(WayPoint::Node(from));
        }
        path.extend(inner);
        if self.walking.vertex(target).location != to {
            path.push(WayPoint::Node(to));
        }
        Ok(path)
    }
}

// ── Construction state ────────────────────────────────────────────────────────

struct Construction<'a> {
    network:        &'a RoadNetwork,
    config:         &'a DirectoryConfig,
    driving:        GraphBuilder,
    walking:        GraphBuilder,
    multi_vertices: HashMap<NodeId, VertexId>,
    uni_vertices:   HashMap<NodeId, Vec<VertexId>>,
    /// Uni-node vertex per `(node, forward_path)`.
    uni_sides:      HashMap<(NodeId, bool), VertexId>,
    seen_sidewalks: HashSet<LaneId>,
    seen_crossings: HashSet<CrossingId>,
    synthetic:      usize,
}

impl<'a> Construction<'a> {
    fn add_step(&mut self, step: PathStep, forward_path: bool) {
        let network: &'a RoadNetwork = self.network;
        let seg = network.segment(step.segment);
        self.add_sidewalks(seg);
        self.add_driving_segment(seg, !step.against_polyline, forward_path);
    }

    fn add_sidewalks(&mut self, seg: &RoadSegment) {
        let network: &'a RoadNetwork = self.network;
        let tolerance = self.config.walking_merge_tolerance_cm;
        for lane in network.segment_lanes(seg.id) {
            if !lane.pedestrian || !self.seen_sidewalks.insert(lane.id) {
                continue;
            }
            let (Some(&first), Some(&last)) = (lane.polyline.first(), lane.polyline.last()) else {
                continue;
            };
            let (a, _) = self.walking.vertex_near(first, tolerance, None);
            let (b, _) = self.walking.vertex_near(last, tolerance, None);
            self.walking.add_edge_pair(
                a,
                b,
                seg.length as u64,
                WayPoint::SideWalk { lane: lane.id, reverse: false },
                WayPoint::SideWalk { lane: lane.id, reverse: true },
            );
        }
    }

    fn add_crossing(&mut self, crossing: CrossingId) {
        if !self.seen_crossings.insert(crossing) {
            return;
        }
        let network: &'a RoadNetwork = self.network;
        let c = network.crossing(crossing);
        let tolerance = self.config.walking_merge_tolerance_cm;
        let (a, _) = self.walking.vertex_near(c.near_line[0], tolerance, None);
        let (b, _) = self.walking.vertex_near(c.near_line[1], tolerance, None);
        self.walking.add_edge_pair(
            a,
            b,
            c.near_length() as u64,
            WayPoint::Crossing { crossing, reverse: false },
            WayPoint::Crossing { crossing, reverse: true },
        );
    }

    /// Add the driving edge(s) of `seg`, travelled start → end when
    /// `forward`, end → start otherwise, as part of the link's forward or
    /// reverse path.
    fn add_driving_segment(&mut self, seg: &RoadSegment, forward: bool, forward_path: bool) {
        let network: &'a RoadNetwork = self.network;
        let carriageway = match (forward, seg.lanes.last()) {
            (false, Some(&last)) => last,
            _ => seg.lane_zero(),
        };
        let polyline = &network.lane(carriageway).polyline;
        let (entry_node, exit_node) = if forward { (seg.start, seg.end) } else { (seg.end, seg.start) };
        let (entry_at, exit_at) = match (polyline.first(), polyline.last()) {
            (Some(&f), Some(&l)) if forward => (f, l),
            (Some(&f), Some(&l)) => (l, f),
            _ => return,
        };

        let mut prev = self.driving_vertex(entry_node, entry_at, forward_path);
        let mut travelled: Cm = 0;

        for (at, obstacle) in seg.obstacles_along(forward) {
            match obstacle {
                Obstacle::Crossing(id) => self.add_crossing(id),
                Obstacle::BusStop(id) => {
                    let stop = network.bus_stop(id);
                    let v = self.driving.add_split_vertex(stop.position, None);
                    self.synthetic += 1;
                    self.driving.add_edge(
                        prev,
                        v,
                        (at - travelled).max(0) as u64,
                        WayPoint::BusStop { segment: seg.id, stop: id },
                    );
                    prev = v;
                    travelled = at;
                }
            }
        }

        let exit = self.driving_vertex(exit_node, exit_at, forward_path);
        self.driving.add_edge(prev, exit, (seg.length - travelled).max(0) as u64, WayPoint::RoadSegment(seg.id));
    }

    /// Vertex for `node` when a segment of the given link path enters or
    /// leaves it at `at`.
    fn driving_vertex(&mut self, node: NodeId, at: Point, forward_path: bool) -> VertexId {
        let network: &'a RoadNetwork = self.network;
        match network.node(node) {
            Node::Multi(m) => {
                if let Some(&v) = self.multi_vertices.get(&node) {
                    return v;
                }
                let v = self.driving.add_vertex(m.location, Some(node));
                self.multi_vertices.insert(node, v);
                v
            }
            Node::Uni(_) => {
                if let Some(&v) = self.uni_sides.get(&(node, forward_path)) {
                    return v;
                }
                let opposite = self.uni_sides.get(&(node, !forward_path)).copied();
                let tolerance = self.config.driving_merge_tolerance_cm;
                let v = match self.driving.find_within(at, tolerance) {
                    Some(v) if Some(v) != opposite => v,
                    _ => {
                        self.synthetic += 1;
                        self.driving.add_vertex(at, Some(node))
                    }
                };
                self.uni_sides.insert((node, forward_path), v);
                let known = self.uni_vertices.entry(node).or_default();
                if !known.contains(&v) {
                    known.push(v);
                }
                v
            }
        }
    }
}
