//! The `GraphWriter` trait implemented by all backend writers.

use rg_network::RoadGraph;

use crate::OutputResult;

/// Trait implemented by the JSON and CSV writers.
pub trait GraphWriter {
    /// Write the whole graph.  Nodes are emitted in the graph's iteration
    /// order.
    fn write_graph(&mut self, graph: &RoadGraph) -> OutputResult<()>;

    /// Flush the underlying sink.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
