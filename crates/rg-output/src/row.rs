//! Plain data row types written by the edge-list backend.

use serde::Serialize;

use rg_network::RoadGraph;

/// One directed edge, flattened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeRow<'g> {
    pub from:           &'g str,
    pub to:             &'g str,
    pub distance_miles: f64,
    pub time_hours:     f64,
}

/// Every edge of `graph`, source nodes in iteration order and each node's
/// edges in append order.
pub fn edge_rows(graph: &RoadGraph) -> impl Iterator<Item = EdgeRow<'_>> + '_ {
    graph.iter().flat_map(|(key, node)| {
        node.edges().iter().map(move |e| EdgeRow {
            from:           key.as_str(),
            to:             e.to().as_str(),
            distance_miles: e.distance_miles(),
            time_hours:     e.time_hours(),
        })
    })
}
