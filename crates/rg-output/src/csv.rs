//! CSV edge-list backend.
//!
//! One row per directed edge with the header
//! `from,to,distance_miles,time_hours`.  Nodes without edges do not appear.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;
use tracing::debug;

use rg_network::RoadGraph;

use crate::OutputResult;
use crate::row::edge_rows;
use crate::writer::GraphWriter;

/// Writes a graph as a flat edge list.
pub struct CsvEdgeWriter<W: Write> {
    edges:    Writer<W>,
    finished: bool,
}

impl CsvEdgeWriter<File> {
    /// Create (or truncate) the CSV file at `path`.
    pub fn create(path: &Path) -> OutputResult<Self> {
        Ok(Self::new(Writer::from_path(path)?))
    }
}

impl<W: Write> CsvEdgeWriter<W> {
    /// Wrap any writer.  The header row is written with the first edge.
    pub fn from_writer(inner: W) -> Self {
        Self::new(Writer::from_writer(inner))
    }

    fn new(edges: Writer<W>) -> Self {
        Self { edges, finished: false }
    }

    /// Flush and return the inner writer.
    pub fn into_inner(self) -> OutputResult<W> {
        self.edges.into_inner().map_err(|e| e.into_error().into())
    }
}

impl<W: Write> GraphWriter for CsvEdgeWriter<W> {
    fn write_graph(&mut self, graph: &RoadGraph) -> OutputResult<()> {
        let mut rows = 0usize;
        for row in edge_rows(graph) {
            self.edges.serialize(row)?;
            rows += 1;
        }
        debug!(rows, "edge list written");
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.edges.flush()?;
        Ok(())
    }
}
