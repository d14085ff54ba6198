//! `rg-output` — writers and readers for extracted road graphs.
//!
//! | Backend | Type              | Shape                                             |
//! |---------|-------------------|---------------------------------------------------|
//! | JSON    | [`JsonWriter`]    | `{ id: { lat, lon, adj: [{nodeId, distance, time}] } }` |
//! | CSV     | [`CsvEdgeWriter`] | `from,to,distance_miles,time_hours`, one row per edge |
//!
//! Both implement [`GraphWriter`].  Only the JSON form can be read back
//! ([`read_json`]); the edge list drops node coordinates.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rg_output::{GraphWriter, JsonWriter};
//!
//! let mut w = JsonWriter::create(Path::new("annarbor.json"))?;
//! w.write_graph(&graph)?;
//! w.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod json;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvEdgeWriter;
pub use error::{OutputError, OutputResult};
pub use json::{JsonWriter, read_json, read_json_file, write_json_file};
pub use row::{EdgeRow, edge_rows};
pub use writer::GraphWriter;
