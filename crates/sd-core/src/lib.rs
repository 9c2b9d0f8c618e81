//! `sd-core`: foundational types for the street directory.
//!
//! This crate is a dependency of every other `sd-*` crate.  It has no
//! `sd-*` dependencies and only `thiserror` (plus optional `serde`) as
//! external ones.
//!
//! # What lives here
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`ids`]      | `NodeId`, `LinkId`, `SegmentId`, `LaneId`, `CrossingId`, …    |
//! | [`geo`]      | `Point`, `Cm`, side points, line intersection, projections    |
//! | [`config`]   | `DirectoryConfig`                                             |
//! | [`error`]    | `CoreError`, `CoreResult`                                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::DirectoryConfig;
pub use error::{CoreError, CoreResult};
pub use geo::{Cm, Point, Side};
pub use ids::{BusStopId, CrossingId, EdgeId, LaneId, LinkId, NodeId, SegmentId, VertexId};
