//! Weighted directed graph used for both driving and walking.
//!
//! # Data layout
//!
//! Outgoing edges are stored in **Compressed Sparse Row (CSR)** form.  Given
//! a `VertexId v`, its outgoing edges occupy the `EdgeId` range
//!
//! ```text
//! vertex_out_start[v] .. vertex_out_start[v + 1]
//! ```
//!
//! Edge arrays are sorted by source vertex with a **stable** sort, so edges
//! of the same vertex keep their insertion order and two builds from the
//! same input are identical.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over integer vertex locations answers "is there
//! already a vertex within tolerance of this point" during construction and
//! for node resolution at query time.  Split vertices (bus stops) are kept
//! out of it so nothing can merge into them.

use rstar::{AABB, RTree, RTreeObject};

use sd_core::{Cm, EdgeId, NodeId, Point, VertexId};

use crate::WayPoint;

// ── R-tree vertex entry ───────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct VertexEntry {
    point: [i64; 2],
    id:    VertexId,
}

impl RTreeObject for VertexEntry {
    type Envelope = AABB<[i64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

/// Smallest indexed vertex strictly closer than `tolerance` on both axes.
fn locate_within(idx: &RTree<VertexEntry>, p: Point, tolerance: Cm) -> Option<VertexId> {
    if tolerance <= 0 {
        return None;
    }
    let r = tolerance - 1;
    let envelope = AABB::from_corners([p.x - r, p.y - r], [p.x + r, p.y + r]);
    idx.locate_in_envelope_intersecting(&envelope).map(|e| e.id).min()
}

// ── Vertex ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    pub location: Point,
    /// Road-network node this vertex stands for, if any.
    pub node:     Option<NodeId>,
}

// ── Graph ─────────────────────────────────────────────────────────────────────

/// Immutable CSR graph.  Construct with [`GraphBuilder`].
pub struct Graph {
    pub vertices: Vec<Vertex>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// Length = `vertex_count + 1`.
    pub vertex_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    pub edge_from:     Vec<VertexId>,
    pub edge_to:       Vec<VertexId>,
    /// Edge weight in cm.
    pub edge_weight:   Vec<u64>,
    pub edge_waypoint: Vec<WayPoint>,

    spatial_idx: RTree<VertexEntry>,
}

impl Graph {
    pub fn empty() -> Self {
        GraphBuilder::new().build()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn vertex(&self, v: VertexId) -> &Vertex {
        &self.vertices[v.index()]
    }

    /// `EdgeId`s of all outgoing edges from `v`.  A contiguous range.
    #[inline]
    pub fn out_edges(&self, v: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.vertex_out_start[v.index()] as usize;
        let end   = self.vertex_out_start[v.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, v: VertexId) -> usize {
        (self.vertex_out_start[v.index() + 1] - self.vertex_out_start[v.index()]) as usize
    }

    /// Sum of the weights of `edges`.
    pub fn path_weight(&self, edges: &[EdgeId]) -> u64 {
        edges.iter().map(|e| self.edge_weight[e.index()]).sum()
    }

    /// Indexed vertex within `tolerance` of `p` (lowest id wins).
    pub fn find_within(&self, p: Point, tolerance: Cm) -> Option<VertexId> {
        locate_within(&self.spatial_idx, p, tolerance)
    }

    /// Vertex closest to `p` by exhaustive scan; the lowest id wins ties.
    pub fn nearest_vertex(&self, p: Point) -> Option<VertexId> {
        self.vertices
            .iter()
            .enumerate()
            .min_by_key(|(i, v)| (v.location.distance_sq(p), *i))
            .map(|(i, _)| VertexId(i as u32))
    }
}

// ── GraphBuilder ──────────────────────────────────────────────────────────────

struct RawEdge {
    from:     VertexId,
    to:       VertexId,
    weight:   u64,
    waypoint: WayPoint,
}

/// Accumulates vertices and edges, then produces a [`Graph`].
#[derive(Default)]
pub struct GraphBuilder {
    vertices:    Vec<Vertex>,
    raw_edges:   Vec<RawEdge>,
    spatial_idx: RTree<VertexEntry>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex that later vertices may merge into.
    pub fn add_vertex(&mut self, location: Point, node: Option<NodeId>) -> VertexId {
        let id = self.add_split_vertex(location, node);
        self.spatial_idx.insert(VertexEntry { point: [location.x, location.y], id });
        id
    }

    /// Add a vertex that is never merged with.
    pub fn add_split_vertex(&mut self, location: Point, node: Option<NodeId>) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(Vertex { location, node });
        id
    }

    pub fn find_within(&self, p: Point, tolerance: Cm) -> Option<VertexId> {
        locate_within(&self.spatial_idx, p, tolerance)
    }

    /// Existing vertex within `tolerance` of `p`, or a new one.  The flag is
    /// `true` when a vertex was created.
    pub fn vertex_near(&mut self, p: Point, tolerance: Cm, node: Option<NodeId>) -> (VertexId, bool) {
        match self.find_within(p, tolerance) {
            Some(v) => (v, false),
            None => (self.add_vertex(p, node), true),
        }
    }

    pub fn add_edge(&mut self, from: VertexId, to: VertexId, weight: u64, waypoint: WayPoint) {
        self.raw_edges.push(RawEdge { from, to, weight, waypoint });
    }

    /// Add `a → b` with `forward` and `b → a` with `backward`.
    pub fn add_edge_pair(&mut self, a: VertexId, b: VertexId, weight: u64, forward: WayPoint, backward: WayPoint) {
        self.add_edge(a, b, weight, forward);
        self.add_edge(b, a, weight, backward);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.raw_edges.len()
    }

    /// Consume the builder and produce a CSR [`Graph`].
    pub fn build(self) -> Graph {
        let vertex_count = self.vertices.len();
        let edge_count   = self.raw_edges.len();

        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:     Vec<VertexId> = raw.iter().map(|e| e.from).collect();
        let edge_to:       Vec<VertexId> = raw.iter().map(|e| e.to).collect();
        let edge_weight:   Vec<u64>      = raw.iter().map(|e| e.weight).collect();
        let edge_waypoint: Vec<WayPoint> = raw.iter().map(|e| e.waypoint).collect();

        let mut vertex_out_start = vec![0u32; vertex_count + 1];
        for e in &raw {
            vertex_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=vertex_count {
            vertex_out_start[i] += vertex_out_start[i - 1];
        }
        debug_assert_eq!(vertex_out_start[vertex_count] as usize, edge_count);

        Graph {
            vertices: self.vertices,
            vertex_out_start,
            edge_from,
            edge_to,
            edge_weight,
            edge_waypoint,
            spatial_idx: self.spatial_idx,
        }
    }
}
