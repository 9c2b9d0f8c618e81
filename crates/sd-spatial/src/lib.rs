//! `sd-spatial`: spatial grid index, routing graphs, and shortest paths.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`aabb`]     | `Aabb`, precise stretch/rectangle overlap test              |
//! | [`grid`]     | `GridIndex`, `StretchRef`, `LaneHit`                        |
//! | [`waypoint`] | `WayPoint`                                                  |
//! | [`graph`]    | `Graph` (CSR + R-tree), `GraphBuilder`, `Vertex`            |
//! | [`routing`]  | `RoutingGraphs`: driving and walking graph construction     |
//! | [`router`]   | `Router` trait, `DijkstraRouter`, `ShortestPathTree`        |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                          |
//!
//! Everything here is built once from an immutable `RoadNetwork` and is
//! read-only afterwards, so all query methods take `&self` and the types
//! are `Send + Sync`.
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `fx-hash` | FxHash instead of SipHash for the cell and vertex maps.    |
//! | `serde`   | Derives `Serialize`/`Deserialize` on public value types.   |

pub mod aabb;
pub mod error;
pub mod graph;
pub mod grid;
pub mod router;
pub mod routing;
pub mod waypoint;


pub use aabb::Aabb;
pub use error::{SpatialError, SpatialResult};
pub use graph::{Graph, GraphBuilder, Vertex};
pub use grid::{CellKey, GridIndex, LaneHit, StretchRef};
pub use router::{DijkstraRouter, Router, ShortestPathTree, dijkstra};
pub use routing::RoutingGraphs;
pub use waypoint::WayPoint;

#[cfg(feature = "fx-hash")]
pub(crate) type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type HashMap<K, V> = std::collections::HashMap<K, V>;

#[cfg(feature = "fx-hash")]
pub(crate) type HashSet<K> = rustc_hash::FxHashSet<K>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type HashSet<K> = std::collections::HashSet<K>;
