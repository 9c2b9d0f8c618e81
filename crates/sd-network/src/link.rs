//! Named roads and the resolution of their directional segment paths.

use sd_core::{LinkId, NodeId, SegmentId};

/// One segment of a link path, with the direction it is driven in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathStep {
    pub segment: SegmentId,
    /// `true` when the path drives the segment from its end node to its
    /// start node (only possible for bidirectional segments).
    pub against_polyline: bool,
}

/// A named road from `start` to `end`.
///
/// `forward` leads from `start` to `end`; `reverse` leads back.  Either may
/// be empty for a one-way road, but not both, and together they cover every
/// segment in `segments`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Link {
    pub id:       LinkId,
    pub name:     String,
    pub start:    NodeId,
    pub end:      NodeId,
    /// All segments of the link in insertion order.
    pub segments: Vec<SegmentId>,
    pub forward:  Vec<PathStep>,
    pub reverse:  Vec<PathStep>,
}

impl Link {
    /// The path for one direction (`true` = start → end).
    pub fn path(&self, forward: bool) -> &[PathStep] {
        if forward { &self.forward } else { &self.reverse }
    }

    /// Both paths, forward first, each paired with the node it leaves from.
    pub fn paths(&self) -> [(NodeId, &[PathStep]); 2] {
        [(self.start, &self.forward), (self.end, &self.reverse)]
    }

    pub fn is_one_way(&self) -> bool {
        self.forward.is_empty() || self.reverse.is_empty()
    }
}

// ── Path resolution ───────────────────────────────────────────────────────────

/// Endpoint view of a segment used while resolving link paths.
#[derive(Copy, Clone, Debug)]
pub(crate) struct SegmentEnds {
    pub id:            SegmentId,
    pub start:         NodeId,
    pub end:           NodeId,
    pub bidirectional: bool,
}

/// Walk from `from` to `to` through `candidates`.
///
/// At each node the first candidate (in insertion order) that leaves the
/// current node, is not yet on the path, and does not lead straight back to
/// the previous node is taken.  Returns `None` if the walk dead-ends.
pub(crate) fn resolve_path(
    from:       NodeId,
    to:         NodeId,
    candidates: &[SegmentEnds],
) -> Option<Vec<PathStep>> {
    let mut path     = Vec::new();
    let mut used     = vec![false; candidates.len()];
    let mut current  = from;
    let mut previous = None;

    while current != to {
        let (i, next, against) = candidates.iter().enumerate().find_map(|(i, s)| {
            if used[i] {
                return None;
            }
            let (next, against) = if s.start == current {
                (s.end, false)
            } else if s.bidirectional && s.end == current {
                (s.start, true)
            } else {
                return None;
            };
            (previous != Some(next)).then_some((i, next, against))
        })?;

        used[i] = true;
        path.push(PathStep { segment: candidates[i].id, against_polyline: against });
        previous = Some(current);
        current  = next;
    }

    if path.is_empty() { None } else { Some(path) }
}
