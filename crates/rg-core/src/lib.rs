//! `rg-core` — foundational types for the `roadgraph` workspace.
//!
//! This crate is a dependency of every other `rg-*` crate.  It has no `rg-*`
//! dependencies and only small external ones (`serde`, `thiserror`, `toml`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`ids`]    | `NodeId` (dense index), `NodeKey` (external string key)   |
//! | [`geo`]    | `GeoPoint`, haversine distance in miles                   |
//! | [`config`] | `RoadConfig` — allow-list, default speeds, Earth radius   |
//! | [`error`]  | `CoreError`, `CoreResult`                                 |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::RoadConfig;
pub use error::{CoreError, CoreResult};
pub use geo::{EARTH_RADIUS_MILES, GeoPoint};
pub use ids::{NodeId, NodeKey};
