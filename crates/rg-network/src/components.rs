//! Connected components and largest-component extraction.
//!
//! Components are taken over the undirected closure of the stored edges: a
//! one-way `A → B` puts `A` and `B` in the same component even though `B`
//! cannot reach `A` by driving.
//!
//! # Determinism
//!
//! Seeds are visited in node insertion order and neighbors in a fixed order,
//! so the sequence of components, and the winner of a size tie (the one
//! discovered first), is the same on every run.
//!
//! # Neighbor layout
//!
//! Before traversal the edge list is flattened into CSR form over both
//! directions.  Neighbors of node `n` occupy
//!
//! ```text
//! neighbors[ start[n] .. start[n+1] ]
//! ```
//!
//! Edges whose destination key is not in the graph are left out.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use rg_core::NodeId;

use crate::graph::{Edge, RoadGraph};
use crate::{NetworkError, NetworkResult};

// ── Undirected adjacency ──────────────────────────────────────────────────────

struct Undirected {
    start:     Vec<u32>,
    neighbors: Vec<NodeId>,
}

impl Undirected {
    fn new(graph: &RoadGraph) -> Self {
        let n = graph.node_count();

        // Resolve every edge destination once.
        let links: Vec<(NodeId, NodeId)> = graph
            .ids()
            .flat_map(|from| {
                graph
                    .node(from)
                    .edges()
                    .iter()
                    .filter_map(move |e| graph.id_of(e.to().as_str()).map(|to| (from, to)))
            })
            .collect();

        let mut start = vec![0u32; n + 1];
        for &(a, b) in &links {
            start[a.index() + 1] += 1;
            start[b.index() + 1] += 1;
        }
        for i in 1..=n {
            start[i] += start[i - 1];
        }

        let mut cursor: Vec<u32> = start[..n].to_vec();
        let mut neighbors = vec![NodeId::INVALID; start[n] as usize];
        for &(a, b) in &links {
            neighbors[cursor[a.index()] as usize] = b;
            cursor[a.index()] += 1;
            neighbors[cursor[b.index()] as usize] = a;
            cursor[b.index()] += 1;
        }

        Self { start, neighbors }
    }

    #[inline]
    fn of(&self, node: NodeId) -> &[NodeId] {
        let s = self.start[node.index()] as usize;
        let e = self.start[node.index() + 1] as usize;
        &self.neighbors[s..e]
    }
}

// ── Component iterator ────────────────────────────────────────────────────────

/// Iterator over the connected components of a graph, one breadth-first
/// traversal per item.
///
/// Each item lists the component's nodes in discovery order.  Every node of
/// the graph appears in exactly one item.
pub struct Components<'g> {
    graph:      &'g RoadGraph,
    adjacency:  Undirected,
    discovered: Vec<bool>,
    queue:      VecDeque<NodeId>,
    next_seed:  usize,
}

/// Enumerate the connected components of `graph`.
pub fn components(graph: &RoadGraph) -> Components<'_> {
    Components {
        graph,
        adjacency:  Undirected::new(graph),
        discovered: vec![false; graph.node_count()],
        queue:      VecDeque::new(),
        next_seed:  0,
    }
}

impl Iterator for Components<'_> {
    type Item = Vec<NodeId>;

    fn next(&mut self) -> Option<Vec<NodeId>> {
        let n = self.graph.node_count();
        while self.next_seed < n && self.discovered[self.next_seed] {
            self.next_seed += 1;
        }
        if self.next_seed == n {
            return None;
        }

        let seed = NodeId(self.next_seed as u32);
        let mut component = vec![seed];
        self.discovered[seed.index()] = true;
        self.queue.push_back(seed);

        while let Some(current) = self.queue.pop_front() {
            for &next in self.adjacency.of(current) {
                // Mark on enqueue so no node is queued twice.
                if !self.discovered[next.index()] {
                    self.discovered[next.index()] = true;
                    component.push(next);
                    self.queue.push_back(next);
                }
            }
        }
        Some(component)
    }
}

// ── Extraction ────────────────────────────────────────────────────────────────

/// How to treat a retained edge whose destination is not retained.
///
/// With undirected components this only happens for edges whose destination
/// key is missing from the input graph altogether.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DanglingEdgePolicy {
    /// Remove the edge from the output and count it.
    #[default]
    Drop,
    /// Fail with [`NetworkError::DanglingEdge`].
    Reject,
}

/// Result of [`ComponentExtractor::extract`].
#[derive(Clone, Debug)]
pub struct Extraction {
    /// The largest component, nodes in the input's insertion order.
    pub graph:           RoadGraph,
    /// Number of components found in the input.
    pub component_count: usize,
    /// Input nodes not in the largest component.
    pub discarded_nodes: usize,
    /// Edges removed under [`DanglingEdgePolicy::Drop`].
    pub dropped_edges:   usize,
}

/// Keeps only the largest connected component of a graph.
#[derive(Clone, Copy, Debug, Default)]
pub struct ComponentExtractor {
    dangling: DanglingEdgePolicy,
}

impl ComponentExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dangling_edges(mut self, policy: DanglingEdgePolicy) -> Self {
        self.dangling = policy;
        self
    }

    /// Nodes of the largest component (ascending `NodeId`) and the number of
    /// components.  The earliest-discovered component wins a tie.
    pub fn largest(&self, graph: &RoadGraph) -> (Vec<NodeId>, usize) {
        let mut best: Vec<NodeId> = Vec::new();
        let mut count = 0;
        for component in components(graph) {
            count += 1;
            if component.len() > 1 {
                debug!(seed = %graph.key(component[0]), size = component.len(), "component discovered");
            }
            if component.len() > best.len() {
                best = component;
            }
        }
        best.sort_unstable();
        (best, count)
    }

    /// Consume `graph` and return a new graph holding only its largest
    /// component.  Node values are moved, not copied.
    ///
    /// # Errors
    ///
    /// [`NetworkError::DanglingEdge`] under [`DanglingEdgePolicy::Reject`].
    pub fn extract(&self, graph: RoadGraph) -> NetworkResult<Extraction> {
        let (members, component_count) = self.largest(&graph);
        let total = graph.node_count();

        let mut keep = vec![false; total];
        for id in &members {
            keep[id.index()] = true;
        }

        let (keys, nodes, index) = graph.into_parts();
        let retained = |e: &Edge| index.get(e.to().as_str()).is_some_and(|id| keep[id.index()]);

        let mut out = RoadGraph::with_capacity(members.len());
        let mut dropped_edges = 0;
        for (i, (key, mut node)) in keys.into_iter().zip(nodes).enumerate() {
            if !keep[i] {
                continue;
            }
            match self.dangling {
                DanglingEdgePolicy::Reject => {
                    if let Some(e) = node.adj.iter().find(|e| !retained(e)) {
                        return Err(NetworkError::DanglingEdge { from: key, to: e.to().clone() });
                    }
                }
                DanglingEdgePolicy::Drop => {
                    let before = node.adj.len();
                    node.adj.retain(|e| retained(e));
                    let removed = before - node.adj.len();
                    if removed > 0 {
                        warn!(node = %key, removed, "dropped edges to unknown nodes");
                    }
                    dropped_edges += removed;
                }
            }
            out.insert_node(key, node);
        }

        info!(
            components = component_count,
            kept = out.node_count(),
            discarded = total - out.node_count(),
            "largest component extracted"
        );

        Ok(Extraction {
            discarded_nodes: total - out.node_count(),
            graph: out,
            component_count,
            dropped_edges,
        })
    }
}
