//! `sd-network`: the road network the street directory indexes.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`node`]     | `Node` (`UniNode` / `MultiNode`), `LaneConnector`          |
//! | [`link`]     | `Link`, `PathStep`                                         |
//! | [`segment`]  | `RoadSegment`, `Lane`                                      |
//! | [`obstacle`] | `Obstacle`, `Crossing`, `BusStop`                          |
//! | [`geometry`] | lane centre-line offsets                                   |
//! | [`network`]  | `RoadNetwork` arena                                        |
//! | [`builder`]  | `RoadNetworkBuilder`, `SegmentSpec`, `LaneSpec`            |
//! | [`error`]    | `NetworkError`, `NetworkResult<T>`                         |
//!
//! The network is built once and is read-only afterwards; every derived
//! value (lane centre lines, lengths, link paths, obstacle offsets) is
//! computed in `RoadNetworkBuilder::build`.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod builder;
pub mod error;
pub mod geometry;
pub mod link;
pub mod network;
pub mod node;
pub mod obstacle;
pub mod segment;


pub use builder::{LaneSpec, RoadNetworkBuilder, SegmentSpec};
pub use error::{NetworkError, NetworkResult};
pub use link::{Link, PathStep};
pub use network::RoadNetwork;
pub use node::{LaneConnector, MultiNode, Node, SegmentPair, UniNode};
pub use obstacle::{BusStop, Crossing, Obstacle};
pub use segment::{Lane, RoadSegment};
