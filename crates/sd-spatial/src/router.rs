//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The directory calls routing via the [`Router`] trait, so applications can
//! swap in A* or contraction hierarchies without touching graph
//! construction.  The default [`DijkstraRouter`] computes a full
//! [`ShortestPathTree`] per source.
//!
//! # Cost units
//!
//! Edge weights and distances are centimetres (`u64`).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use sd_core::{EdgeId, VertexId};

use crate::{Graph, WayPoint};

// ── ShortestPathTree ──────────────────────────────────────────────────────────

/// Single-source shortest paths over every vertex of a graph.
///
/// An unreached vertex has distance `u64::MAX` and is its own parent.
#[derive(Clone, Debug)]
pub struct ShortestPathTree {
    pub source:      VertexId,
    pub dist:        Vec<u64>,
    pub parent:      Vec<VertexId>,
    pub parent_edge: Vec<EdgeId>,
}

impl ShortestPathTree {
    /// Total weight to `target`, or `None` if unreachable.
    pub fn distance(&self, target: VertexId) -> Option<u64> {
        self.dist.get(target.index()).copied().filter(|&d| d != u64::MAX)
    }

    /// Edges from the source to `target`, in travel order.
    ///
    /// Empty when `target` is the source or is unreachable.
    pub fn path_edges(&self, target: VertexId) -> Vec<EdgeId> {
        if target == self.source || target.index() >= self.parent.len() {
            return Vec::new();
        }
        let mut edges = Vec::new();
        let mut cur = target;
        while cur != self.source {
            let p = self.parent[cur.index()];
            if p == cur {
                return Vec::new();
            }
            edges.push(self.parent_edge[cur.index()]);
            cur = p;
        }
        edges.reverse();
        edges
    }

    /// Waypoints from the source to `target`, in travel order.
    pub fn waypoints(&self, graph: &Graph, target: VertexId) -> Vec<WayPoint> {
        self.path_edges(target)
            .into_iter()
            .map(|e| graph.edge_waypoint[e.index()])
            .collect()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`: one router serves concurrent
/// read-only queries from every worker thread.
pub trait Router: Send + Sync {
    fn shortest_path_tree(&self, graph: &Graph, source: VertexId) -> ShortestPathTree;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR graph.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn shortest_path_tree(&self, graph: &Graph, source: VertexId) -> ShortestPathTree {
        dijkstra(graph, source)
    }
}

/// Full single-source Dijkstra from `source`.
///
/// Ties are broken by the heap's secondary key (`VertexId`) and by strict
/// `<` relaxation, so the first-found predecessor is kept.
pub fn dijkstra(graph: &Graph, source: VertexId) -> ShortestPathTree {
    let n = graph.vertex_count();
    let mut dist        = vec![u64::MAX; n];
    let mut parent: Vec<VertexId> = (0..n as u32).map(VertexId).collect();
    let mut parent_edge = vec![EdgeId::INVALID; n];

    if source.index() < n {
        dist[source.index()] = 0;

        // Min-heap via Reverse; VertexId as secondary key keeps pops deterministic.
        let mut heap: BinaryHeap<Reverse<(u64, VertexId)>> = BinaryHeap::new();
        heap.push(Reverse((0, source)));

        while let Some(Reverse((cost, v))) = heap.pop() {
            // Skip stale heap entries.
            if cost > dist[v.index()] {
                continue;
            }
            for edge in graph.out_edges(v) {
                let next = graph.edge_to[edge.index()];
                let new_cost = cost.saturating_add(graph.edge_weight[edge.index()]);
                if new_cost < dist[next.index()] {
                    dist[next.index()]        = new_cost;
                    parent[next.index()]      = v;
                    parent_edge[next.index()] = edge;
                    heap.push(Reverse((new_cost, next)));
                }
            }
        }
    }

    ShortestPathTree { source, dist, parent, parent_edge }
}
