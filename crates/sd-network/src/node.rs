//! Intersections and in-link joints.
//!
//! A [`Node`] is either a [`MultiNode`] (an intersection where several links
//! meet) or a [`UniNode`] (the joint between consecutive segments of one
//! link).  Behaviour that differs between the two is written as an explicit
//! `match`.

use std::collections::{BTreeMap, BTreeSet};

use sd_core::{LaneId, NodeId, Point, SegmentId};

/// A permitted lane-to-lane movement through a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneConnector {
    pub from: LaneId,
    pub to:   LaneId,
}

// ── MultiNode ─────────────────────────────────────────────────────────────────

/// An intersection.  Used directly as a driving-graph vertex.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiNode {
    pub id:       NodeId,
    pub location: Point,
    /// Lane connectors reachable from each incoming segment.
    pub connectors: BTreeMap<SegmentId, BTreeSet<LaneConnector>>,
}

impl MultiNode {
    /// Connectors leaving `incoming`, or `None` if the segment has none here.
    pub fn connectors_from(&self, incoming: SegmentId) -> Option<&BTreeSet<LaneConnector>> {
        self.connectors.get(&incoming)
    }

    /// `true` if any lane of `incoming` may continue through this node.
    pub fn has_outgoing_lanes(&self, incoming: SegmentId) -> bool {
        self.connectors.get(&incoming).is_some_and(|c| !c.is_empty())
    }
}

// ── UniNode ───────────────────────────────────────────────────────────────────

/// An incoming/outgoing segment pair meeting at a [`UniNode`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentPair {
    pub incoming: SegmentId,
    pub outgoing: SegmentId,
}

/// The joint between two consecutive segments of the same link.
///
/// Holds at most one pair per direction of travel.  Never used directly as
/// a driving vertex: two opposing segments meeting here would otherwise share
/// a vertex and allow a U-turn.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UniNode {
    pub id:       NodeId,
    pub location: Point,
    pub pairs:    Vec<SegmentPair>,
    /// Incoming lane → outgoing lane, built by aligning lane indices.
    pub connectors: BTreeMap<LaneId, LaneId>,
}

impl UniNode {
    /// Maximum number of segment pairs (one per direction).
    pub const MAX_PAIRS: usize = 2;

    /// The segment that follows `incoming` through this node.
    pub fn next_segment(&self, incoming: SegmentId) -> Option<SegmentId> {
        self.pairs.iter().find(|p| p.incoming == incoming).map(|p| p.outgoing)
    }

    /// The lane that `from` continues into.
    pub fn outgoing_lane(&self, from: LaneId) -> Option<LaneId> {
        self.connectors.get(&from).copied()
    }
}

// ── Node ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    Uni(UniNode),
    Multi(MultiNode),
}

impl Node {
    pub fn id(&self) -> NodeId {
        match self {
            Node::Uni(n) => n.id,
            Node::Multi(n) => n.id,
        }
    }

    pub fn location(&self) -> Point {
        match self {
            Node::Uni(n) => n.location,
            Node::Multi(n) => n.location,
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, Node::Multi(_))
    }

    pub fn as_uni(&self) -> Option<&UniNode> {
        match self {
            Node::Uni(n) => Some(n),
            Node::Multi(_) => None,
        }
    }

    pub fn as_multi(&self) -> Option<&MultiNode> {
        match self {
            Node::Multi(n) => Some(n),
            Node::Uni(_) => None,
        }
    }
}
