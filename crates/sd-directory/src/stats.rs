//! Build statistics.

use std::fmt;
use std::time::Duration;

use sd_spatial::{GridIndex, RoutingGraphs};

/// Sizes of the structures built by `StreetDirectory::init`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectoryStats {
    /// Non-empty grid cells.
    pub grid_cells:         usize,
    pub grid_stretches:     usize,
    /// Sum of all cell list lengths.
    pub grid_cell_entries:  usize,
    pub driving_vertices:   usize,
    pub driving_edges:      usize,
    pub walking_vertices:   usize,
    pub walking_edges:      usize,
    /// Uni-node and bus-stop vertices of the driving graph.
    pub synthetic_vertices: usize,
    pub build_time:         Duration,
}

impl DirectoryStats {
    pub fn collect(grid: &GridIndex, graphs: &RoutingGraphs, build_time: Duration) -> Self {
        Self {
            grid_cells:         grid.cell_count(),
            grid_stretches:     grid.stretch_count(),
            grid_cell_entries:  grid.cell_entry_count(),
            driving_vertices:   graphs.driving.vertex_count(),
            driving_edges:      graphs.driving.edge_count(),
            walking_vertices:   graphs.walking.vertex_count(),
            walking_edges:      graphs.walking.edge_count(),
            synthetic_vertices: graphs.synthetic_vertex_count(),
            build_time,
        }
    }
}

impl fmt::Display for DirectoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "grid: {} cells, {} stretches, {} entries | driving: {} vertices ({} synthetic), {} edges | \
             walking: {} vertices, {} edges | built in {:.1} ms",
            self.grid_cells,
            self.grid_stretches,
            self.grid_cell_entries,
            self.driving_vertices,
            self.synthetic_vertices,
            self.driving_edges,
            self.walking_vertices,
            self.walking_edges,
            self.build_time.as_secs_f64() * 1e3,
        )
    }
}
