//! Uniform grid over road-segment stretches.
//!
//! # Layout
//!
//! Every stretch (consecutive pair of median points) of every segment on a
//! link path is stored once in `entries`.  Each grid cell holds the indices
//! of the entries whose widened stretch touches the cell, in insertion
//! order: link by link, forward path before reverse path, segment by
//! segment, stretch by stretch.
//!
//! # Cell keys
//!
//! A point's cell is `(x / cell_width, y / cell_height)` with truncating
//! integer division, so cell `0` on each axis spans `(-cell, cell)`, twice
//! the width of every other cell.  [`GridIndex::cell_bounds`] reports that
//! true extent, and insertion tests stretches against it.

use log::{debug, warn};

use sd_core::geo::{perpendicular_distance, side_of};
use sd_core::{Cm, LaneId, Point, SegmentId, Side};
use sd_network::RoadNetwork;

use crate::aabb::{Aabb, stretch_touches};
use crate::{HashMap, SpatialError, SpatialResult};

/// Grid cell coordinates.
pub type CellKey = (i64, i64);

/// A stretch of a segment as stored in the grid.
///
/// `start`/`end` are indices into the segment's median polyline, ordered in
/// the direction of the link path the segment was found on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StretchRef {
    pub segment:      SegmentId,
    pub start:        usize,
    pub end:          usize,
    /// Whether the segment came from its link's forward path.
    pub forward_path: bool,
}

/// Result of a point-to-lane lookup.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneHit {
    pub lane:  LaneId,
    pub start: usize,
    pub end:   usize,
}

#[derive(Clone, Debug)]
struct StretchEntry {
    stretch:    StretchRef,
    /// Median endpoints in polyline order.
    a:          Point,
    b:          Point,
    half_width: Cm,
    bounds:     Aabb,
}

// ── GridIndex ─────────────────────────────────────────────────────────────────

/// Point-location and range index over the stretches of a road network.
pub struct GridIndex {
    cell_width:  Cm,
    cell_height: Cm,
    entries:     Vec<StretchEntry>,
    cells:       HashMap<CellKey, Vec<u32>>,
}

impl GridIndex {
    /// Partition every stretch of `network` into cells of
    /// `cell_width × cell_height` cm.
    pub fn build(network: &RoadNetwork, cell_width: Cm, cell_height: Cm) -> SpatialResult<Self> {
        if cell_width <= 0 || cell_height <= 0 {
            return Err(SpatialError::InvalidGrid { width: cell_width, height: cell_height });
        }
        let mut grid = Self {
            cell_width,
            cell_height,
            entries: Vec::new(),
            cells:   HashMap::default(),
        };

        for link in network.links() {
            for (forward_path, path) in [(true, &link.forward), (false, &link.reverse)] {
                for step in path {
                    let seg = network.segment(step.segment);
                    for i in 0..seg.stretch_count() {
                        let (start, end) = if forward_path { (i, i + 1) } else { (i + 1, i) };
                        let stretch = StretchRef { segment: seg.id, start, end, forward_path };
                        grid.insert(stretch, seg.polyline[i], seg.polyline[i + 1], seg.half_width());
                    }
                }
            }
        }

        debug!(
            "grid index: {} stretches in {} cells ({} cell entries)",
            grid.stretch_count(),
            grid.cell_count(),
            grid.cell_entry_count()
        );
        Ok(grid)
    }

    fn insert(&mut self, stretch: StretchRef, a: Point, b: Point, half_width: Cm) {
        let bounds = Aabb::of_points(a, b).expand(half_width);
        let id = self.entries.len() as u32;
        self.entries.push(StretchEntry { stretch, a, b, half_width, bounds });

        let (left, bottom) = self.cell_of(bounds.min);
        let (right, top)   = self.cell_of(bounds.max);
        for m in left..=right {
            for n in bottom..=top {
                if stretch_touches(&self.cell_bounds((m, n)), a, b, half_width) {
                    self.cells.entry((m, n)).or_default().push(id);
                }
            }
        }
    }

    // ── Cells ─────────────────────────────────────────────────────────────

    /// Cell containing `p` (truncating division; see module docs).
    #[inline]
    pub fn cell_of(&self, p: Point) -> CellKey {
        (p.x / self.cell_width, p.y / self.cell_height)
    }

    /// Inclusive extent of the points that [`cell_of`](Self::cell_of) maps
    /// to `key`.
    pub fn cell_bounds(&self, (m, n): CellKey) -> Aabb {
        let (x0, x1) = axis_extent(m, self.cell_width);
        let (y0, y1) = axis_extent(n, self.cell_height);
        Aabb { min: Point::new(x0, y0), max: Point::new(x1, y1) }
    }

    /// Stretches registered in one cell, in insertion order.
    pub fn cell(&self, key: CellKey) -> Vec<StretchRef> {
        self.cells
            .get(&key)
            .map(|ids| ids.iter().map(|&i| self.entries[i as usize].stretch).collect())
            .unwrap_or_default()
    }

    pub fn cell_size(&self) -> (Cm, Cm) {
        (self.cell_width, self.cell_height)
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of distinct stretches indexed.
    pub fn stretch_count(&self) -> usize {
        self.entries.len()
    }

    /// Sum of all cell list lengths.
    pub fn cell_entry_count(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// The lane under `p`, if any.
    ///
    /// Only the cell containing `p` is consulted.  Candidates are tried in
    /// insertion order; the first whose midline is within half-width of `p`
    /// and whose lanes cover `p` gives the answer.  The lane is found by
    /// accumulating lane widths from the stretch's left edge.
    pub fn lane_at(&self, network: &RoadNetwork, p: Point) -> Option<LaneHit> {
        let ids = self.cells.get(&self.cell_of(p))?;

        for &i in ids {
            let e = &self.entries[i as usize];
            if !e.bounds.contains_point(p) {
                continue;
            }
            let Some(d) = perpendicular_distance(p, e.a, e.b) else {
                continue;
            };
            let hw = e.half_width as f64;
            if d > hw {
                continue;
            }

            let from_left = match side_of(p, e.a, e.b) {
                Side::Left => hw - d,
                Side::Right => hw + d,
            };
            let mut covered = 0.0;
            for lane in network.segment_lanes(e.stretch.segment) {
                covered += lane.width as f64;
                if from_left <= covered {
                    return Some(LaneHit { lane: lane.id, start: e.stretch.start, end: e.stretch.end });
                }
            }
            warn!(
                "point {p} is {from_left:.0} cm from the left edge of {} but its lanes cover only {covered:.0} cm",
                e.stretch.segment
            );
        }
        None
    }

    /// Stretches near the box centred on `p` with the given half extents.
    ///
    /// Cells wholly inside the box contribute their full lists unfiltered;
    /// cells cut by the box contribute the stretches that pass the precise
    /// overlap test.  A stretch registered in several cells may appear once
    /// per cell.
    pub fn stretches_near(&self, p: Point, half_width: Cm, half_height: Cm) -> Vec<StretchRef> {
        let query = Aabb::around(p, half_width, half_height);
        let (left, bottom) = self.cell_of(query.min);
        let (right, top)   = self.cell_of(query.max);

        let mut out = Vec::new();
        for m in left..=right {
            for n in bottom..=top {
                let Some(ids) = self.cells.get(&(m, n)) else {
                    continue;
                };
                let whole = query.contains(&self.cell_bounds((m, n)));
                out.extend(
                    ids.iter()
                        .map(|&i| &self.entries[i as usize])
                        .filter(|e| whole || stretch_touches(&query, e.a, e.b, e.half_width))
                        .map(|e| e.stretch),
                );
            }
        }
        out
    }
}

/// Closed range of coordinates whose truncated quotient by `size` is `k`.
fn axis_extent(k: i64, size: Cm) -> (Cm, Cm) {
    match k.signum() {
        1 => (k * size, (k + 1) * size - 1),
        -1 => ((k - 1) * size + 1, k * size),
        _ => (1 - size, size - 1),
    }
}
