//! Spatial-subsystem error type.

use thiserror::Error;

use sd_core::{Cm, NodeId};

/// Errors produced by `sd-spatial`.
///
/// "Nothing found" outcomes (no lane at a point, no path between two
/// vertices) are `None` / empty results, not errors.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("grid cell size must be positive, got {width} x {height}")]
    InvalidGrid { width: Cm, height: Cm },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("node {0} has no vertex in the driving graph")]
    NodeNotInGraph(NodeId),

    #[error("the {0} graph has no vertices")]
    EmptyGraph(&'static str),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
