//! Road segments and lanes.

use std::collections::BTreeMap;

use sd_core::{Cm, LaneId, LinkId, NodeId, Point, SegmentId};

use crate::Obstacle;

// ── Lane ──────────────────────────────────────────────────────────────────────

/// One lane of a segment.
///
/// Lane `0` is the leftmost lane relative to the segment's polyline
/// direction.  `polyline` is the lane's centre line, derived from the
/// segment median when the network is built.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lane {
    pub id:         LaneId,
    pub segment:    SegmentId,
    pub index:      usize,
    pub width:      Cm,
    pub pedestrian: bool,
    pub polyline:   Vec<Point>,
}

// ── RoadSegment ───────────────────────────────────────────────────────────────

/// A stretch of road between two nodes, part of exactly one link.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadSegment {
    pub id:            SegmentId,
    pub link:          LinkId,
    pub start:         NodeId,
    pub end:           NodeId,
    /// Median line, start to end inclusive.  At least two points.
    pub polyline:      Vec<Point>,
    /// Total width: explicit, or the sum of lane widths.
    pub width:         Cm,
    /// Lanes, leftmost first.  Never empty.
    pub lanes:         Vec<LaneId>,
    /// Obstacles keyed by their offset along lane-zero.
    pub obstacles:     BTreeMap<Cm, Obstacle>,
    pub length:        Cm,
    pub bidirectional: bool,
}

impl RoadSegment {
    #[inline]
    pub fn half_width(&self) -> Cm {
        self.width / 2
    }

    #[inline]
    pub fn lane_zero(&self) -> LaneId {
        self.lanes[0]
    }

    /// Number of stretches (consecutive point pairs) in the median.
    pub fn stretch_count(&self) -> usize {
        self.polyline.len().saturating_sub(1)
    }

    /// Node reached when leaving from `node`, if this segment touches it.
    pub fn other_end(&self, node: NodeId) -> Option<NodeId> {
        if node == self.start {
            Some(self.end)
        } else if node == self.end {
            Some(self.start)
        } else {
            None
        }
    }

    /// First obstacle at or beyond `offset` in the given direction.
    ///
    /// `offset` is measured from the start node when `forward`, and from the
    /// end node otherwise.  The returned offset is the obstacle's key in
    /// [`obstacles`](Self::obstacles).
    pub fn next_obstacle(&self, offset: Cm, forward: bool) -> Option<(Cm, Obstacle)> {
        let found = if forward {
            self.obstacles.range(offset..).next()
        } else {
            self.obstacles.range(..=self.length - offset).next_back()
        };
        found.map(|(&at, &o)| (at, o))
    }

    /// All obstacles in travel order, paired with the distance travelled
    /// from the entry node to reach them.
    pub fn obstacles_along(&self, forward: bool) -> Vec<(Cm, Obstacle)> {
        let clamp = |d: Cm| d.clamp(0, self.length);
        if forward {
            self.obstacles.iter().map(|(&at, &o)| (clamp(at), o)).collect()
        } else {
            self.obstacles.iter().rev().map(|(&at, &o)| (clamp(self.length - at), o)).collect()
        }
    }
}
