use std::sync::{Arc, OnceLock};
use std::time::Instant;

use log::{debug, info};

use sd_core::{Cm, DirectoryConfig, NodeId, Point};
use sd_network::RoadNetwork;
use sd_spatial::{DijkstraRouter, GridIndex, LaneHit, Router, RoutingGraphs, StretchRef, WayPoint};

use crate::{DirectoryError, DirectoryResult, DirectoryStats, SignalTable, TrafficSignal};

/// Everything built by `init`.  Immutable once published.
struct Ready {
    network: Arc<RoadNetwork>,
    config:  DirectoryConfig,
    grid:    GridIndex,
    graphs:  RoutingGraphs,
    stats:   Option<DirectoryStats>,
}

// ── StreetDirectory ───────────────────────────────────────────────────────────

/// Spatial and routing queries over one road network.
///
/// Construct once at bootstrap, [`init`][Self::init] it, then share it by
/// reference with every worker.  Queries issued before `init` return empty
/// results rather than failing.
///
/// # Type parameters
/// - `R: Router`: shortest-path engine.  Defaults to [`DijkstraRouter`].
pub struct StreetDirectory<R: Router = DijkstraRouter> {
    router:  R,
    ready:   OnceLock<Ready>,
    signals: SignalTable,
}

impl StreetDirectory<DijkstraRouter> {
    pub fn new() -> Self {
        Self::with_router(DijkstraRouter)
    }
}

impl Default for StreetDirectory<DijkstraRouter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Router> StreetDirectory<R> {
    pub fn with_router(router: R) -> Self {
        Self { router, ready: OnceLock::new(), signals: SignalTable::new() }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Build the grid index and routing graphs with default tolerances and a
    /// `grid_width × grid_height` cm grid.
    pub fn init(&self, network: Arc<RoadNetwork>, grid_width: Cm, grid_height: Cm) -> DirectoryResult<()> {
        self.init_with_config(network, DirectoryConfig::with_grid(grid_width, grid_height))
    }

    /// Build everything from `network`.  May succeed at most once.
    pub fn init_with_config(&self, network: Arc<RoadNetwork>, config: DirectoryConfig) -> DirectoryResult<()> {
        if self.is_ready() {
            return Err(DirectoryError::AlreadyInitialized);
        }
        config.validate()?;

        let started = Instant::now();
        let grid = GridIndex::build(&network, config.grid_width_cm, config.grid_height_cm)?;
        let graphs = RoutingGraphs::build(&network, &config);
        let build_time = started.elapsed();

        let stats = config.keep_stats.then(|| DirectoryStats::collect(&grid, &graphs, build_time));
        match &stats {
            Some(s) => info!("street directory ready: {s}"),
            None => info!(
                "street directory ready: {} segments, driving {} / walking {} vertices in {:.1} ms",
                network.segment_count(),
                graphs.driving.vertex_count(),
                graphs.walking.vertex_count(),
                build_time.as_secs_f64() * 1e3,
            ),
        }

        self.ready
            .set(Ready { network, config, grid, graphs, stats })
            .map_err(|_| DirectoryError::AlreadyInitialized)
    }

    pub fn is_ready(&self) -> bool {
        self.ready.get().is_some()
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The lane under `p`, with the indices of the stretch it was found on.
    pub fn get_lane(&self, p: Point) -> Option<LaneHit> {
        let ready = self.ready.get()?;
        ready.grid.lane_at(&ready.network, p)
    }

    /// Stretches near the box centred on `p`.  May contain duplicates.
    pub fn closest_road_segments(&self, p: Point, half_width: Cm, half_height: Cm) -> Vec<StretchRef> {
        match self.ready.get() {
            Some(ready) => ready.grid.stretches_near(p, half_width, half_height),
            None => Vec::new(),
        }
    }

    // ── Routing ───────────────────────────────────────────────────────────

    /// Cheapest driving path between two nodes.
    ///
    /// Empty when uninitialized, when `from == to`, or when `to` cannot be
    /// reached.  Fails when either node has no driving vertex.
    pub fn shortest_driving_path(&self, from: NodeId, to: NodeId) -> DirectoryResult<Vec<WayPoint>> {
        let Some(ready) = self.ready.get() else {
            return Ok(Vec::new());
        };
        Ok(ready.graphs.shortest_driving_path(&self.router, &ready.network, from, to)?)
    }

    /// Cheapest walking path between two points.
    pub fn shortest_walking_path(&self, from: Point, to: Point) -> DirectoryResult<Vec<WayPoint>> {
        let Some(ready) = self.ready.get() else {
            return Ok(Vec::new());
        };
        Ok(ready.graphs.shortest_walking_path(&self.router, from, to)?)
    }

    /// Answer many driving queries at once, in input order.
    ///
    /// With the `parallel` Cargo feature the queries run on Rayon's thread
    /// pool.
    pub fn shortest_driving_paths(&self, pairs: &[(NodeId, NodeId)]) -> Vec<DirectoryResult<Vec<WayPoint>>> {
        debug!("bulk routing {} driving queries", pairs.len());

        #[cfg(not(feature = "parallel"))]
        {
            pairs
                .iter()
                .map(|&(from, to)| self.shortest_driving_path(from, to))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            pairs
                .par_iter()
                .map(|&(from, to)| self.shortest_driving_path(from, to))
                .collect()
        }
    }

    // ── Signals ───────────────────────────────────────────────────────────

    /// Register `signal` at its node.  A second signal for the same node is
    /// ignored (`Ok(false)`).
    pub fn register_signal(&self, signal: Arc<dyn TrafficSignal>) -> DirectoryResult<bool> {
        self.signals.register(signal)
    }

    /// Close signal registration; lookups work from here on.
    pub fn seal_signals(&self) -> bool {
        self.signals.seal()
    }

    /// Signal at `node`.  `None` before `init` or before the table is sealed.
    pub fn signal_at(&self, node: NodeId) -> Option<Arc<dyn TrafficSignal>> {
        if !self.is_ready() {
            return None;
        }
        self.signals.signal_at(node)
    }

    pub fn signals(&self) -> &SignalTable {
        &self.signals
    }

    // ── Introspection ─────────────────────────────────────────────────────

    /// Statistics collected during `init` when `keep_stats` was set.
    pub fn stats(&self) -> Option<&DirectoryStats> {
        self.ready.get()?.stats.as_ref()
    }

    /// Log the build statistics at `info` level.
    pub fn print_statistics(&self) {
        match self.stats() {
            Some(stats) => info!("street directory statistics: {stats}"),
            None => info!("street directory statistics: none collected"),
        }
    }

    pub fn network(&self) -> Option<&Arc<RoadNetwork>> {
        self.ready.get().map(|r| &r.network)
    }

    pub fn config(&self) -> Option<&DirectoryConfig> {
        self.ready.get().map(|r| &r.config)
    }

    pub fn grid(&self) -> Option<&GridIndex> {
        self.ready.get().map(|r| &r.grid)
    }

    pub fn graphs(&self) -> Option<&RoutingGraphs> {
        self.ready.get().map(|r| &r.graphs)
    }

    pub fn router(&self) -> &R {
        &self.router
    }
}
