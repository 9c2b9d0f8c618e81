//! Path elements returned by the shortest-path queries.

use sd_core::{BusStopId, CrossingId, LaneId, Point, SegmentId};

/// One element of a driving or walking path.
///
/// Every graph edge carries exactly one `WayPoint`; a path is the sequence
/// of waypoints of its edges, optionally bracketed by [`WayPoint::Node`]
/// entries for the stretch between a query point and the graph.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WayPoint {
    /// Drive (the rest of) a segment.
    RoadSegment(SegmentId),
    /// Drive a segment up to a bus stop and stop there.
    BusStop { segment: SegmentId, stop: BusStopId },
    /// Walk a sidewalk lane; `reverse` walks it against its polyline.
    SideWalk { lane: LaneId, reverse: bool },
    /// Walk a crossing's near line; `reverse` walks it from its second point.
    Crossing { crossing: CrossingId, reverse: bool },
    /// A bare location off the graph.
    Node(Point),
}

impl WayPoint {
    /// The segment driven by this waypoint, if any.
    pub fn segment(&self) -> Option<SegmentId> {
        match *self {
            WayPoint::RoadSegment(s) | WayPoint::BusStop { segment: s, .. } => Some(s),
            _ => None,
        }
    }

    pub fn is_bus_stop(&self) -> bool {
        matches!(self, WayPoint::BusStop { .. })
    }
}
