//! Road graph representation.
//!
//! # Data layout
//!
//! Nodes are stored densely in insertion order and addressed by [`NodeId`]:
//!
//! ```text
//! keys[id]  → external NodeKey
//! nodes[id] → Node { lat, lon, adj }
//! index     → NodeKey → NodeId
//! ```
//!
//! Insertion order is the order in which keys were first created, so every
//! traversal over the graph (component discovery, serialization) is
//! reproducible for a given input stream.
//!
//! # Serialized form
//!
//! `RoadGraph` serializes as a map from node key to node, in insertion order:
//!
//! ```json
//! { "61234567": { "lat": 42.28, "lon": -83.74,
//!                 "adj": [ { "nodeId": "61234568", "distance": 0.1, "time": 0.004 } ] } }
//! ```

use std::fmt;

use rustc_hash::FxHashMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use rg_core::{GeoPoint, NodeId, NodeKey};

use crate::{NetworkError, NetworkResult};

// ── Edge ──────────────────────────────────────────────────────────────────────

/// A directed edge to `to`, weighted by distance (miles) and travel time
/// (hours).  Fields are fixed at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(rename = "nodeId")]
    to:       NodeKey,
    distance: f64,
    time:     f64,
}

impl Edge {
    pub(crate) fn new(to: NodeKey, distance: f64, time: f64) -> Self {
        Self { to, distance, time }
    }

    /// Key of the destination node.
    #[inline]
    pub fn to(&self) -> &NodeKey {
        &self.to
    }

    #[inline]
    pub fn distance_miles(&self) -> f64 {
        self.distance
    }

    #[inline]
    pub fn time_hours(&self) -> f64 {
        self.time
    }
}

// ── Node ──────────────────────────────────────────────────────────────────────

/// A graph node: its coordinate and outgoing edges in append order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    lat: f64,
    lon: f64,
    pub(crate) adj: Vec<Edge>,
}

impl Node {
    pub(crate) fn new(pos: GeoPoint) -> Self {
        Self { lat: pos.lat, lon: pos.lon, adj: Vec::new() }
    }

    #[inline]
    pub fn pos(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }

    /// Outgoing edges, in the order they were appended.
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.adj
    }

    #[inline]
    pub fn out_degree(&self) -> usize {
        self.adj.len()
    }
}

// ── PathTotals ────────────────────────────────────────────────────────────────

/// Summed distance and time along a node sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PathTotals {
    pub distance_miles: f64,
    pub time_hours:     f64,
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Directed road graph keyed by node key, iterated in insertion order.
#[derive(Clone, Debug, Default)]
pub struct RoadGraph {
    keys:  Vec<NodeKey>,
    nodes: Vec<Node>,
    index: FxHashMap<NodeKey, NodeId>,
}

impl RoadGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for the expected number of nodes.
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            keys:  Vec::with_capacity(nodes),
            nodes: Vec::with_capacity(nodes),
            index: FxHashMap::with_capacity_and_hasher(nodes, Default::default()),
        }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of directed edges.  O(N).
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(Node::out_degree).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    #[inline]
    pub fn id_of(&self, key: &str) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.id_of(key).map(|id| &self.nodes[id.index()])
    }

    /// Node by dense index.  Panics if `id` is out of range.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Key by dense index.  Panics if `id` is out of range.
    #[inline]
    pub fn key(&self, id: NodeId) -> &NodeKey {
        &self.keys[id.index()]
    }

    /// `(key, node)` pairs in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&NodeKey, &Node)> + '_ {
        self.keys.iter().zip(self.nodes.iter())
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &NodeKey> + '_ {
        self.keys.iter()
    }

    pub fn ids(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Insert or replace the node at `key` with `pos` and no edges.
    ///
    /// An existing node keeps its position in iteration order but loses its
    /// adjacency list.
    pub fn upsert(&mut self, key: NodeKey, pos: GeoPoint) -> NodeId {
        match self.index.get(&key) {
            Some(&id) => {
                self.nodes[id.index()] = Node::new(pos);
                id
            }
            None => self.push_node(key, Node::new(pos)),
        }
    }

    /// Return the node at `key`, creating it at `pos` if absent.
    ///
    /// Never touches an existing node's coordinate.
    pub fn ensure(&mut self, key: &NodeKey, pos: GeoPoint) -> NodeId {
        match self.index.get(key) {
            Some(&id) => id,
            None => self.push_node(key.clone(), Node::new(pos)),
        }
    }

    pub(crate) fn push_edge(&mut self, from: NodeId, edge: Edge) {
        self.nodes[from.index()].adj.push(edge);
    }

    /// Insert a fully formed node, replacing any node already at `key`.
    pub(crate) fn insert_node(&mut self, key: NodeKey, node: Node) -> NodeId {
        match self.index.get(&key) {
            Some(&id) => {
                self.nodes[id.index()] = node;
                id
            }
            None => self.push_node(key, node),
        }
    }

    fn push_node(&mut self, key: NodeKey, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.index.insert(key.clone(), id);
        self.keys.push(key);
        self.nodes.push(node);
        id
    }

    /// Decompose into keys, nodes (both in insertion order), and the key index.
    pub(crate) fn into_parts(self) -> (Vec<NodeKey>, Vec<Node>, FxHashMap<NodeKey, NodeId>) {
        (self.keys, self.nodes, self.index)
    }

    // ── Measurement ───────────────────────────────────────────────────────

    /// Sum distance and time along consecutive nodes of `path`.
    ///
    /// Between two consecutive nodes the fastest of any parallel edges is
    /// used.  An empty or single-node path totals zero.
    ///
    /// # Errors
    ///
    /// [`NetworkError::NodeNotFound`] for an unknown key,
    /// [`NetworkError::NoEdge`] if two consecutive nodes are not linked.
    pub fn path_totals<K: AsRef<str>>(&self, path: &[K]) -> NetworkResult<PathTotals> {
        if let [only] = path {
            if !self.contains(only.as_ref()) {
                return Err(NetworkError::NodeNotFound(NodeKey::from(only.as_ref())));
            }
        }
        let mut totals = PathTotals::default();
        for pair in path.windows(2) {
            let (from, to) = (pair[0].as_ref(), pair[1].as_ref());
            let node = self
                .get(from)
                .ok_or_else(|| NetworkError::NodeNotFound(NodeKey::from(from)))?;
            let best = node
                .adj
                .iter()
                .filter(|e| e.to.as_str() == to)
                .min_by(|a, b| a.time.total_cmp(&b.time))
                .ok_or_else(|| NetworkError::NoEdge {
                    from: NodeKey::from(from),
                    to:   NodeKey::from(to),
                })?;
            totals.distance_miles += best.distance;
            totals.time_hours += best.time;
        }
        Ok(totals)
    }
}

/// Two graphs are equal when they hold the same keys in the same order with
/// equal nodes.
impl PartialEq for RoadGraph {
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys && self.nodes == other.nodes
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────────

impl Serialize for RoadGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.nodes.len()))?;
        for (key, node) in self.iter() {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RoadGraph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RoadGraphVisitor)
    }
}

struct RoadGraphVisitor;

impl<'de> Visitor<'de> for RoadGraphVisitor {
    type Value = RoadGraph;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from node id to {lat, lon, adj}")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RoadGraph, A::Error> {
        let mut graph = RoadGraph::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, node)) = access.next_entry::<NodeKey, Node>()? {
            graph.insert_node(key, node);
        }
        Ok(graph)
    }
}
