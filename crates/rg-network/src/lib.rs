//! `rg-network` — drivable road graph construction and component extraction.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`entity`]     | `Entity`, `PointRecord`, `PathRecord` — decoded map input  |
//! | [`graph`]      | `RoadGraph`, `Node`, `Edge`, `PathTotals`                  |
//! | [`speed`]      | `SpeedResolver` — tags → max speed (mph)                   |
//! | [`builder`]    | `GraphBuilder`, `build_graph`, `SpeedPolicy`, `BuildStats` |
//! | [`components`] | `ComponentExtractor`, `components`, `DanglingEdgePolicy`   |
//! | [`locate`]     | `NodeLocator` (R-tree nearest-node snapping)               |
//! | [`parallel`]   | `build_graph_par` (feature = `"parallel"` only)            |
//! | [`osm`]        | `load_from_pbf` (feature = `"osm"` only)                   |
//! | [`error`]      | `NetworkError`, `SpeedError`, `NetworkResult<T>`           |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Parallel path processing via `rayon`.                     |
//! | `osm`      | Enables OSM PBF loading via the `osmpbf` crate.           |

pub mod builder;
pub mod components;
pub mod entity;
pub mod error;
pub mod graph;
pub mod locate;
pub mod speed;

#[cfg(feature = "parallel")]
pub mod parallel;

#[cfg(feature = "osm")]
pub mod osm;


pub use builder::{BuildStats, GraphBuilder, PathOutcome, SpeedPolicy, build_graph};
pub use components::{ComponentExtractor, Components, DanglingEdgePolicy, Extraction, components};
pub use entity::{Entity, PathRecord, PointRecord, Tags, split_known_runs};
pub use error::{NetworkError, NetworkResult, PathRef, SpeedError};
pub use graph::{Edge, Node, PathTotals, RoadGraph};
pub use locate::NodeLocator;
pub use speed::SpeedResolver;

#[cfg(feature = "parallel")]
pub use parallel::build_graph_par;
