//! Nearest-node snapping.
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest graph node.  Used
//! to turn a clicked or geocoded coordinate into a route endpoint on the
//! extracted graph.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use rg_core::{GeoPoint, NodeId};

use crate::graph::RoadGraph;

/// Entry stored in the R-tree: a `[lat, lon]` point with its `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in degree space.  Good enough for picking
    /// the nearest node within a city.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

/// Spatial index over the nodes of one [`RoadGraph`].
///
/// The returned `NodeId`s are only valid for the graph the locator was
/// built from.
pub struct NodeLocator {
    tree: RTree<NodeEntry>,
}

impl NodeLocator {
    /// Bulk-load the index.  Nodes with a non-finite coordinate are skipped.
    pub fn new(graph: &RoadGraph) -> Self {
        let entries: Vec<NodeEntry> = graph
            .ids()
            .filter_map(|id| {
                let pos = graph.node(id).pos();
                (pos.lat.is_finite() && pos.lon.is_finite())
                    .then_some(NodeEntry { point: [pos.lat, pos.lon], id })
            })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// The node nearest to `pos`, or `None` for an empty index.
    pub fn nearest(&self, pos: GeoPoint) -> Option<NodeId> {
        self.tree.nearest_neighbor(&[pos.lat, pos.lon]).map(|e| e.id)
    }

    /// Up to `k` nearest nodes, sorted by ascending distance.
    pub fn k_nearest(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        self.tree
            .nearest_neighbor_iter(&[pos.lat, pos.lon])
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}
