//! Things placed along a segment: pedestrian crossings and bus stops.

use sd_core::{BusStopId, Cm, CrossingId, NodeId, Point, SegmentId};

/// An obstacle in a segment's offset map.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Obstacle {
    Crossing(CrossingId),
    BusStop(BusStopId),
}

/// A pedestrian crossing spanning a road.
///
/// The near and far lines are the two kerb-side edges of the zebra; the
/// walking graph uses the near line.  A crossing attaches to every segment
/// whose two end nodes are `nodes` (in either order).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Crossing {
    pub id:        CrossingId,
    pub near_line: [Point; 2],
    pub far_line:  [Point; 2],
    pub nodes:     (NodeId, NodeId),
}

impl Crossing {
    /// Length of the near line.
    pub fn near_length(&self) -> Cm {
        self.near_line[0].distance_cm(self.near_line[1])
    }

    /// `true` if the crossing spans a segment between `a` and `b`.
    pub fn spans(&self, a: NodeId, b: NodeId) -> bool {
        self.nodes == (a, b) || self.nodes == (b, a)
    }
}

/// A bus stop at a fixed offset along one segment.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BusStop {
    pub id:       BusStopId,
    pub name:     String,
    pub segment:  SegmentId,
    /// Offset along lane-zero of `segment`.
    pub offset:   Cm,
    /// Position on lane-zero at `offset`.
    pub position: Point,
}
