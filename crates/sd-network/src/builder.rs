//! Incremental construction of a [`RoadNetwork`].

use std::collections::{BTreeMap, HashSet};

use log::{debug, warn};

use sd_core::geo::{offset_along, point_along, polyline_length};
use sd_core::{BusStopId, Cm, CrossingId, LaneId, LinkId, NodeId, Point, SegmentId};

use crate::geometry::{lane_center_offsets, offset_polyline};
use crate::link::{SegmentEnds, resolve_path};
use crate::{
    BusStop, Crossing, Lane, LaneConnector, Link, MultiNode, NetworkError, NetworkResult, Node,
    Obstacle, RoadNetwork, RoadSegment, SegmentPair, UniNode,
};

// ── Specs ─────────────────────────────────────────────────────────────────────

/// Description of one lane passed to [`RoadNetworkBuilder::add_segment`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LaneSpec {
    /// Width in cm.  `0` means "segment width / lane count".
    pub width:      Cm,
    pub pedestrian: bool,
}

impl LaneSpec {
    pub fn driving(width: Cm) -> Self {
        Self { width, pedestrian: false }
    }

    pub fn sidewalk(width: Cm) -> Self {
        Self { width, pedestrian: true }
    }
}

/// Description of one segment passed to [`RoadNetworkBuilder::add_segment`].
#[derive(Clone, Debug)]
pub struct SegmentSpec {
    pub start:         NodeId,
    pub end:           NodeId,
    pub polyline:      Vec<Point>,
    /// Total width in cm.  `0` means "sum of lane widths".
    pub width:         Cm,
    /// Lanes, leftmost first.
    pub lanes:         Vec<LaneSpec>,
    pub bidirectional: bool,
    /// Reported length; the polyline length is used when `None`.
    pub length:        Option<Cm>,
}

impl SegmentSpec {
    /// A one-way segment with no lanes yet.
    pub fn new(start: NodeId, end: NodeId, polyline: Vec<Point>) -> Self {
        Self {
            start,
            end,
            polyline,
            width:         0,
            lanes:         Vec::new(),
            bidirectional: false,
            length:        None,
        }
    }

    pub fn lane(mut self, lane: LaneSpec) -> Self {
        self.lanes.push(lane);
        self
    }

    pub fn width(mut self, width: Cm) -> Self {
        self.width = width;
        self
    }

    pub fn bidirectional(mut self) -> Self {
        self.bidirectional = true;
        self
    }

    pub fn length(mut self, length: Cm) -> Self {
        self.length = Some(length);
        self
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// Handles are assigned sequentially from 0 in insertion order.  `build()`
/// resolves widths, derives lane centre lines, resolves link paths, places
/// bus stops and attaches crossings to the segments they span.
///
/// # Example
///
/// ```
/// use sd_core::Point;
/// use sd_network::{LaneSpec, RoadNetworkBuilder, SegmentSpec};
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_multi_node(Point::new(0, 0));
/// let c = b.add_multi_node(Point::new(1_000, 0));
/// let link = b.add_link("Main St", a, c).unwrap();
/// let spec = SegmentSpec::new(a, c, vec![Point::new(0, 0), Point::new(1_000, 0)])
///     .lane(LaneSpec::driving(350));
/// b.add_segment(link, spec).unwrap();
/// let net = b.build().unwrap();
/// assert_eq!(net.segment_count(), 1);
/// assert_eq!(net.link(link).forward.len(), 1);
/// ```
#[derive(Default)]
pub struct RoadNetworkBuilder {
    nodes:     Vec<Node>,
    links:     Vec<Link>,
    segments:  Vec<RoadSegment>,
    /// Reported length of each segment, parallel to `segments`.
    reported:  Vec<Option<Cm>>,
    lanes:     Vec<Lane>,
    crossings: Vec<Crossing>,
    bus_stops: Vec<BusStop>,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Nodes ─────────────────────────────────────────────────────────────

    pub fn add_multi_node(&mut self, location: Point) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::Multi(MultiNode { id, location, connectors: BTreeMap::new() }));
        id
    }

    pub fn add_uni_node(&mut self, location: Point) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::Uni(UniNode {
            id,
            location,
            pairs:      Vec::new(),
            connectors: BTreeMap::new(),
        }));
        id
    }

    // ── Links and segments ────────────────────────────────────────────────

    pub fn add_link(&mut self, name: impl Into<String>, start: NodeId, end: NodeId) -> NetworkResult<LinkId> {
        self.check_node(start)?;
        self.check_node(end)?;
        let id = LinkId(self.links.len() as u32);
        self.links.push(Link {
            id,
            name:     name.into(),
            start,
            end,
            segments: Vec::new(),
            forward:  Vec::new(),
            reverse:  Vec::new(),
        });
        Ok(id)
    }

    /// Add a segment to `link`.  Its lanes receive consecutive `LaneId`s.
    pub fn add_segment(&mut self, link: LinkId, spec: SegmentSpec) -> NetworkResult<SegmentId> {
        let id = SegmentId(self.segments.len() as u32);
        if link.index() >= self.links.len() {
            return Err(NetworkError::UnknownLink(link));
        }
        self.check_node(spec.start)?;
        self.check_node(spec.end)?;
        if spec.polyline.len() < 2 {
            return Err(NetworkError::ShortPolyline { segment: id, points: spec.polyline.len() });
        }
        if spec.lanes.is_empty() {
            return Err(NetworkError::NoLanes(id));
        }

        let mut lanes = Vec::with_capacity(spec.lanes.len());
        for (index, l) in spec.lanes.iter().enumerate() {
            let lane_id = LaneId(self.lanes.len() as u32);
            self.lanes.push(Lane {
                id:         lane_id,
                segment:    id,
                index,
                width:      l.width,
                pedestrian: l.pedestrian,
                polyline:   Vec::new(),
            });
            lanes.push(lane_id);
        }

        self.segments.push(RoadSegment {
            id,
            link,
            start:         spec.start,
            end:           spec.end,
            polyline:      spec.polyline,
            width:         spec.width,
            lanes,
            obstacles:     BTreeMap::new(),
            length:        0,
            bidirectional: spec.bidirectional,
        });
        self.reported.push(spec.length);
        self.links[link.index()].segments.push(id);
        Ok(id)
    }

    /// Lane handles of a segment added earlier, leftmost first.
    pub fn segment_lanes(&self, segment: SegmentId) -> NetworkResult<&[LaneId]> {
        self.segments
            .get(segment.index())
            .map(|s| s.lanes.as_slice())
            .ok_or(NetworkError::UnknownSegment(segment))
    }

    // ── Obstacles ─────────────────────────────────────────────────────────

    /// Place a bus stop `offset` cm along lane-zero of `segment`.
    pub fn add_bus_stop(
        &mut self,
        segment: SegmentId,
        offset:  Cm,
        name:    impl Into<String>,
    ) -> NetworkResult<BusStopId> {
        let id = BusStopId(self.bus_stops.len() as u32);
        let seg = self
            .segments
            .get_mut(segment.index())
            .ok_or(NetworkError::UnknownSegment(segment))?;
        if seg.obstacles.contains_key(&offset) {
            return Err(NetworkError::DuplicateObstacleOffset { segment, offset });
        }
        seg.obstacles.insert(offset, Obstacle::BusStop(id));
        self.bus_stops.push(BusStop {
            id,
            name: name.into(),
            segment,
            offset,
            position: Point::default(),
        });
        Ok(id)
    }

    /// Add a crossing between `nodes`; it is attached to matching segments
    /// during `build()`.
    pub fn add_crossing(
        &mut self,
        near_line: [Point; 2],
        far_line:  [Point; 2],
        nodes:     (NodeId, NodeId),
    ) -> NetworkResult<CrossingId> {
        self.check_node(nodes.0)?;
        self.check_node(nodes.1)?;
        let id = CrossingId(self.crossings.len() as u32);
        self.crossings.push(Crossing { id, near_line, far_line, nodes });
        Ok(id)
    }

    // ── Lane connectivity ─────────────────────────────────────────────────

    /// Allow traffic from lane `from` to lane `to` through a multi-node.
    pub fn connect_lanes(&mut self, node: NodeId, from: LaneId, to: LaneId) -> NetworkResult<()> {
        let incoming = self.lanes.get(from.index()).ok_or(NetworkError::UnknownLane(from))?.segment;
        if to.index() >= self.lanes.len() {
            return Err(NetworkError::UnknownLane(to));
        }
        match self.nodes.get_mut(node.index()) {
            Some(Node::Multi(m)) => {
                m.connectors.entry(incoming).or_default().insert(LaneConnector { from, to });
                Ok(())
            }
            Some(Node::Uni(_)) => Err(NetworkError::NotMultiNode(node)),
            None => Err(NetworkError::UnknownNode(node)),
        }
    }

    /// Record that `incoming` continues into `outgoing` through a uni-node,
    /// with lane `from_lane_index` of `incoming` feeding lane
    /// `to_lane_index` of `outgoing`.  The remaining lanes are aligned with
    /// the same index offset.
    pub fn set_uni_node_pair(
        &mut self,
        node:            NodeId,
        incoming:        SegmentId,
        outgoing:        SegmentId,
        from_lane_index: usize,
        to_lane_index:   usize,
    ) -> NetworkResult<()> {
        let from_lanes = self.segment_lanes(incoming)?.to_vec();
        let to_lanes   = self.segment_lanes(outgoing)?.to_vec();
        let shift      = to_lane_index as i64 - from_lane_index as i64;

        let aligned: Vec<(LaneId, LaneId)> = from_lanes
            .iter()
            .enumerate()
            .filter_map(|(i, &from)| {
                let j = usize::try_from(i as i64 + shift).ok()?;
                let to = *to_lanes.get(j)?;
                let walkable = self.lanes[from.index()].pedestrian || self.lanes[to.index()].pedestrian;
                (!walkable).then_some((from, to))
            })
            .collect();

        let uni = match self.nodes.get_mut(node.index()) {
            Some(Node::Uni(u)) => u,
            Some(Node::Multi(_)) => return Err(NetworkError::NotUniNode(node)),
            None => return Err(NetworkError::UnknownNode(node)),
        };
        if uni.pairs.len() >= UniNode::MAX_PAIRS {
            return Err(NetworkError::TooManySegmentPairs(node));
        }
        uni.pairs.push(SegmentPair { incoming, outgoing });
        uni.connectors.extend(aligned);
        Ok(())
    }

    fn check_node(&self, id: NodeId) -> NetworkResult<()> {
        if id.index() < self.nodes.len() { Ok(()) } else { Err(NetworkError::UnknownNode(id)) }
    }

    // ── Build ─────────────────────────────────────────────────────────────

    /// Consume the builder and produce an immutable [`RoadNetwork`].
    pub fn build(mut self) -> NetworkResult<RoadNetwork> {
        for i in 0..self.segments.len() {
            self.resolve_segment(i)?;
        }
        for i in 0..self.links.len() {
            self.resolve_link(i)?;
        }
        self.place_bus_stops();
        self.attach_crossings()?;

        debug!(
            "road network built: {} nodes, {} links, {} segments, {} lanes, {} crossings, {} bus stops",
            self.nodes.len(),
            self.links.len(),
            self.segments.len(),
            self.lanes.len(),
            self.crossings.len(),
            self.bus_stops.len(),
        );

        Ok(RoadNetwork {
            nodes:     self.nodes,
            links:     self.links,
            segments:  self.segments,
            lanes:     self.lanes,
            crossings: self.crossings,
            bus_stops: self.bus_stops,
        })
    }

    /// Widths, lane centre lines, and length of segment `i`.
    fn resolve_segment(&mut self, i: usize) -> NetworkResult<()> {
        let seg = &mut self.segments[i];
        let lane_count = seg.lanes.len() as Cm;

        if seg.width == 0 {
            seg.width = seg.lanes.iter().map(|l| self.lanes[l.index()].width).sum();
            if seg.width == 0 {
                return Err(NetworkError::ZeroWidthSegment(seg.id));
            }
        }

        let default_width = seg.width / lane_count;
        let widths: Vec<Cm> = seg
            .lanes
            .iter()
            .map(|l| match self.lanes[l.index()].width {
                0 => default_width,
                w => w,
            })
            .collect();

        let offsets = lane_center_offsets(seg.width, &widths);
        for ((lane, width), offset) in seg.lanes.iter().zip(&widths).zip(offsets) {
            let lane = &mut self.lanes[lane.index()];
            lane.width    = *width;
            lane.polyline = offset_polyline(&seg.polyline, offset)?;
        }

        seg.length = match self.reported[i] {
            Some(len) if len > 0 => len,
            _ => polyline_length(&seg.polyline),
        };
        Ok(())
    }

    fn resolve_link(&mut self, i: usize) -> NetworkResult<()> {
        let link = &self.links[i];
        let candidates: Vec<SegmentEnds> = link
            .segments
            .iter()
            .map(|&s| {
                let seg = &self.segments[s.index()];
                SegmentEnds {
                    id:            s,
                    start:         seg.start,
                    end:           seg.end,
                    bidirectional: seg.bidirectional,
                }
            })
            .collect();

        let forward = resolve_path(link.start, link.end, &candidates).unwrap_or_default();
        let reverse = resolve_path(link.end, link.start, &candidates).unwrap_or_default();
        if forward.is_empty() && reverse.is_empty() {
            return Err(NetworkError::IncompleteLink(link.id));
        }

        let covered: HashSet<SegmentId> =
            forward.iter().chain(&reverse).map(|step| step.segment).collect();
        let unused = link.segments.len() - covered.len();
        if unused > 0 {
            return Err(NetworkError::UnusedSegments { link: link.id, unused });
        }

        debug!(
            "link {} '{}': {} forward step(s), {} reverse step(s)",
            link.id,
            link.name,
            forward.len(),
            reverse.len()
        );
        let link = &mut self.links[i];
        link.forward = forward;
        link.reverse = reverse;
        Ok(())
    }

    fn place_bus_stops(&mut self) {
        for stop in &mut self.bus_stops {
            let seg = &self.segments[stop.segment.index()];
            let lane_zero = &self.lanes[seg.lane_zero().index()];
            stop.position = point_along(&lane_zero.polyline, stop.offset).unwrap_or(seg.polyline[0]);
        }
    }

    /// Key every crossing into the obstacle map of each segment it spans.
    fn attach_crossings(&mut self) -> NetworkResult<()> {
        for crossing in &self.crossings {
            let mid = crossing.near_line[0].midpoint(crossing.near_line[1]);
            let mut attached = 0;
            for seg in &mut self.segments {
                if !crossing.spans(seg.start, seg.end) {
                    continue;
                }
                let lane_zero = &self.lanes[seg.lane_zero().index()];
                let offset = offset_along(&lane_zero.polyline, mid).unwrap_or(0);
                if seg.obstacles.contains_key(&offset) {
                    return Err(NetworkError::DuplicateObstacleOffset { segment: seg.id, offset });
                }
                seg.obstacles.insert(offset, Obstacle::Crossing(crossing.id));
                attached += 1;
            }
            if attached == 0 {
                warn!(
                    "crossing {} spans no segment between {} and {}",
                    crossing.id, crossing.nodes.0, crossing.nodes.1
                );
            }
        }
        Ok(())
    }
}
