//! `sd-directory`: the street directory facade.
//!
//! # Lifecycle
//!
//! ```text
//! StreetDirectory::new()          Uninitialized: every query answers empty
//!   └─ init(network, w, h)        builds GridIndex + driving/walking graphs
//!        └─ Ready                 read-only; shared by all worker threads
//! ```
//!
//! The only mutable part after `init` is the [`SignalTable`]: signals are
//! registered while agents are constructed, then the table is sealed once
//! and becomes readable.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`directory`] | `StreetDirectory`                                       |
//! | [`signal`]    | `TrafficSignal` trait, `SignalTable`                    |
//! | [`stats`]     | `DirectoryStats`                                        |
//! | [`error`]     | `DirectoryError`, `DirectoryResult<T>`                  |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | `shortest_driving_paths` runs on Rayon's thread pool.  |
//! | `fx-hash`  | Forwards to `sd-spatial/fx-hash`.                      |
//! | `serde`    | Derives `Serialize`/`Deserialize` on public value types. |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sd_directory::StreetDirectory;
//!
//! let directory = StreetDirectory::new();
//! directory.init(Arc::new(network), 100_000, 80_000)?;
//! let path = directory.shortest_driving_path(from, to)?;
//! ```

pub mod directory;
pub mod error;
pub mod signal;
pub mod stats;

#[cfg(test)]
mod tests;

pub use directory::StreetDirectory;
pub use error::{DirectoryError, DirectoryResult};
pub use signal::{SignalTable, TrafficSignal};
pub use stats::DirectoryStats;

pub use sd_spatial::{DijkstraRouter, LaneHit, Router, StretchRef, WayPoint};
