//! JSON adjacency-map backend and reader.
//!
//! The document is a single object keyed by node id:
//!
//! ```json
//! { "A": { "lat": 0.0, "lon": 0.0, "adj": [ { "nodeId": "B", "distance": 69.09, "time": 2.76 } ] } }
//! ```
//!
//! Keys appear in the graph's iteration order, so writing the same graph
//! twice produces identical bytes.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use rg_network::RoadGraph;

use crate::OutputResult;
use crate::writer::GraphWriter;

/// Writes a graph as one JSON document.
pub struct JsonWriter<W: Write> {
    out:      BufWriter<W>,
    pretty:   bool,
    finished: bool,
}

impl JsonWriter<File> {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: &Path) -> OutputResult<Self> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> JsonWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { out: BufWriter::new(inner), pretty: false, finished: false }
    }

    /// Indent the output.  Off by default; extracted city graphs are large.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Flush and return the inner writer.
    pub fn into_inner(self) -> OutputResult<W> {
        self.out.into_inner().map_err(|e| e.into_error().into())
    }
}

impl<W: Write> GraphWriter for JsonWriter<W> {
    fn write_graph(&mut self, graph: &RoadGraph) -> OutputResult<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.out, graph)?;
        } else {
            serde_json::to_writer(&mut self.out, graph)?;
        }
        debug!(nodes = graph.node_count(), "graph JSON written");
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.out.flush()?;
        Ok(())
    }
}

/// Write `graph` to `path` as compact JSON.
pub fn write_json_file(graph: &RoadGraph, path: &Path) -> OutputResult<()> {
    let mut w = JsonWriter::create(path)?;
    w.write_graph(graph)?;
    w.finish()
}

/// Read a graph previously written by [`JsonWriter`].
///
/// Node order follows the document.
pub fn read_json<R: Read>(reader: R) -> OutputResult<RoadGraph> {
    Ok(serde_json::from_reader(BufReader::new(reader))?)
}

pub fn read_json_file(path: &Path) -> OutputResult<RoadGraph> {
    read_json(File::open(path)?)
}
