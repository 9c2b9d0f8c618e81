//! Synthetic grid-town road network.
//!
//! `SIZE × SIZE` intersections `BLOCK` cm apart.  Every street is a
//! bidirectional link with sidewalks on both sides and a crossing near its
//! far end.  East–west streets are split mid-block by a uni-node and carry a
//! bus stop in the western half; north–south streets are a single segment
//! with a bus stop of their own.

use std::sync::Arc;

use anyhow::Result;

use sd_core::{Cm, NodeId, Point, SegmentId};
use sd_network::{LaneSpec, RoadNetwork, RoadNetworkBuilder, SegmentSpec};

pub const SIZE:  usize = 4;
pub const BLOCK: Cm    = 10_000;

const SIDEWALK:         Cm = 200;
/// Wide enough that opposite sidewalks stay beyond the walking merge
/// tolerance of each other.
const DRIVING:          Cm = 450;
/// Distance of the crossing from the far end of its segment.
const CROSSING_SETBACK: Cm = 600;

/// The built town plus the intersection handles, row-major (`y * SIZE + x`).
pub struct GridTown {
    pub network:       Arc<RoadNetwork>,
    pub intersections: Vec<NodeId>,
}

impl GridTown {
    pub fn intersection(&self, x: usize, y: usize) -> NodeId {
        self.intersections[y * SIZE + x]
    }
}

fn street(start: NodeId, end: NodeId, from: Point, to: Point) -> SegmentSpec {
    SegmentSpec::new(start, end, vec![from, to])
        .lane(LaneSpec::sidewalk(SIDEWALK))
        .lane(LaneSpec::driving(DRIVING))
        .lane(LaneSpec::driving(DRIVING))
        .lane(LaneSpec::sidewalk(SIDEWALK))
        .bidirectional()
}

/// Near and far crossing lines of a street running `from → to`, placed
/// `CROSSING_SETBACK` before `to` and spanning the sidewalk centres.
fn crossing_lines(from: Point, to: Point) -> ([Point; 2], [Point; 2]) {
    let half = (2 * SIDEWALK + 2 * DRIVING) / 2 - SIDEWALK / 2;
    let len = from.distance_cm(to);
    let (ux, uy) = ((to.x - from.x) / len, (to.y - from.y) / len);
    let at = |back: Cm| {
        let c = Point::new(to.x - ux * back, to.y - uy * back);
        [Point::new(c.x - uy * half, c.y + ux * half), Point::new(c.x + uy * half, c.y - ux * half)]
    };
    (at(CROSSING_SETBACK), at(CROSSING_SETBACK - 100))
}

fn add_crossing(b: &mut RoadNetworkBuilder, nodes: (NodeId, NodeId), from: Point, to: Point) -> Result<()> {
    let (near, far) = crossing_lines(from, to);
    b.add_crossing(near, far, nodes)?;
    Ok(())
}

/// Connect every driving lane entering `node` to every driving lane leaving it.
fn connect_intersection(b: &mut RoadNetworkBuilder, node: NodeId, segments: &[SegmentId]) -> Result<()> {
    let mut driving = Vec::new();
    for &seg in segments {
        let lanes = b.segment_lanes(seg)?;
        driving.extend(lanes[1..lanes.len() - 1].iter().map(|&lane| (seg, lane)));
    }
    for &(from_seg, from) in &driving {
        for &(to_seg, to) in &driving {
            if from_seg != to_seg {
                b.connect_lanes(node, from, to)?;
            }
        }
    }
    Ok(())
}

pub fn build_town() -> Result<GridTown> {
    let mut b = RoadNetworkBuilder::new();
    let at = |x: usize, y: usize| Point::new(x as Cm * BLOCK, y as Cm * BLOCK);

    let mut intersections = Vec::with_capacity(SIZE * SIZE);
    for y in 0..SIZE {
        for x in 0..SIZE {
            intersections.push(b.add_multi_node(at(x, y)));
        }
    }
    let node = |x: usize, y: usize| intersections[y * SIZE + x];
    let mut attached: Vec<Vec<SegmentId>> = vec![Vec::new(); SIZE * SIZE];

    // East–west streets, split by a uni-node.
    for y in 0..SIZE {
        for x in 0..SIZE - 1 {
            let (p, q) = (node(x, y), node(x + 1, y));
            let (pa, qa) = (at(x, y), at(x + 1, y));
            let mid_at = Point::new(pa.x + BLOCK / 2, pa.y);
            let mid = b.add_uni_node(mid_at);

            let link = b.add_link(format!("East {y} / {x}"), p, q)?;
            let west = b.add_segment(link, street(p, mid, pa, mid_at))?;
            let east = b.add_segment(link, street(mid, q, mid_at, qa))?;
            b.set_uni_node_pair(mid, west, east, 1, 1)?;
            b.set_uni_node_pair(mid, east, west, 1, 1)?;

            b.add_bus_stop(west, BLOCK / 4, format!("East {y} / {x} stop"))?;
            add_crossing(&mut b, (mid, q), mid_at, qa)?;

            attached[y * SIZE + x].push(west);
            attached[y * SIZE + x + 1].push(east);
        }
    }

    // North–south streets, one segment each.
    for x in 0..SIZE {
        for y in 0..SIZE - 1 {
            let (p, q) = (node(x, y), node(x, y + 1));
            let (pa, qa) = (at(x, y), at(x, y + 1));

            let link = b.add_link(format!("North {x} / {y}"), p, q)?;
            let seg = b.add_segment(link, street(p, q, pa, qa))?;
            b.add_bus_stop(seg, 3 * BLOCK / 10, format!("North {x} / {y} stop"))?;
            add_crossing(&mut b, (p, q), pa, qa)?;

            attached[y * SIZE + x].push(seg);
            attached[(y + 1) * SIZE + x].push(seg);
        }
    }

    for (i, segments) in attached.iter().enumerate() {
        connect_intersection(&mut b, intersections[i], segments)?;
    }

    Ok(GridTown { network: Arc::new(b.build()?), intersections })
}
