//! Network construction error type.

use thiserror::Error;

use sd_core::{Cm, CoreError, LaneId, LinkId, NodeId, SegmentId};

/// Errors produced while building a `RoadNetwork`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("node {0} not found in network")]
    UnknownNode(NodeId),

    #[error("link {0} not found in network")]
    UnknownLink(LinkId),

    #[error("segment {0} not found in network")]
    UnknownSegment(SegmentId),

    #[error("lane {0} not found in network")]
    UnknownLane(LaneId),

    #[error("segment {segment} polyline has {points} point(s); at least 2 required")]
    ShortPolyline { segment: SegmentId, points: usize },

    #[error("segment {0} has no lanes")]
    NoLanes(SegmentId),

    #[error("segment {0} has zero width and all its lane widths are zero")]
    ZeroWidthSegment(SegmentId),

    #[error("link {0} has no path from start to end in either direction")]
    IncompleteLink(LinkId),

    #[error("link {link} has {unused} segment(s) on neither of its paths")]
    UnusedSegments { link: LinkId, unused: usize },

    #[error("segment {segment} already has an obstacle at offset {offset}")]
    DuplicateObstacleOffset { segment: SegmentId, offset: Cm },

    #[error("node {0} is not a multi-node")]
    NotMultiNode(NodeId),

    #[error("node {0} is not a uni-node")]
    NotUniNode(NodeId),

    #[error("uni-node {0} already has the maximum number of segment pairs")]
    TooManySegmentPairs(NodeId),

    #[error("geometry error: {0}")]
    Geometry(#[from] CoreError),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
