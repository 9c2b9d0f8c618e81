//! The immutable road-network arena.
//!
//! Every entity lives in a `Vec` indexed by its handle.  Cross references
//! (segment → link, link → nodes, lane → segment, …) are handles, never
//! references, so the network is a plain tree of owned data and can be
//! shared across threads behind an `Arc`.

use sd_core::{BusStopId, CrossingId, LaneId, LinkId, NodeId, SegmentId};

use crate::{BusStop, Crossing, Lane, Link, Node, RoadNetworkBuilder, RoadSegment};

/// A fully built road network.  Construct with [`RoadNetworkBuilder`].
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadNetwork {
    pub(crate) nodes:     Vec<Node>,
    pub(crate) links:     Vec<Link>,
    pub(crate) segments:  Vec<RoadSegment>,
    pub(crate) lanes:     Vec<Lane>,
    pub(crate) crossings: Vec<Crossing>,
    pub(crate) bus_stops: Vec<BusStop>,
}

impl RoadNetwork {
    /// A network with nothing in it.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> RoadNetworkBuilder {
        RoadNetworkBuilder::new()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ── Indexed access ────────────────────────────────────────────────────
    //
    // Handles come from this network, so plain indexing is used.  Use the
    // `get_*` variants for handles of unknown origin.

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn link(&self, id: LinkId) -> &Link {
        &self.links[id.index()]
    }

    #[inline]
    pub fn segment(&self, id: SegmentId) -> &RoadSegment {
        &self.segments[id.index()]
    }

    #[inline]
    pub fn lane(&self, id: LaneId) -> &Lane {
        &self.lanes[id.index()]
    }

    #[inline]
    pub fn crossing(&self, id: CrossingId) -> &Crossing {
        &self.crossings[id.index()]
    }

    #[inline]
    pub fn bus_stop(&self, id: BusStopId) -> &BusStop {
        &self.bus_stops[id.index()]
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_segment(&self, id: SegmentId) -> Option<&RoadSegment> {
        self.segments.get(id.index())
    }

    pub fn get_lane(&self, id: LaneId) -> Option<&Lane> {
        self.lanes.get(id.index())
    }

    // ── Iteration ─────────────────────────────────────────────────────────

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn segments(&self) -> &[RoadSegment] {
        &self.segments
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn crossings(&self) -> &[Crossing] {
        &self.crossings
    }

    pub fn bus_stops(&self) -> &[BusStop] {
        &self.bus_stops
    }

    /// Lanes of `segment` in left-to-right order.
    pub fn segment_lanes(&self, segment: SegmentId) -> impl Iterator<Item = &Lane> + '_ {
        self.segment(segment).lanes.iter().map(|&l| self.lane(l))
    }

    /// Link that `lane` belongs to.
    pub fn lane_link(&self, lane: LaneId) -> LinkId {
        self.segment(self.lane(lane).segment).link
    }
}
