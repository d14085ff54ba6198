//! Graph construction from a decoded entity stream.
//!
//! # Rules
//!
//! - A point upserts its node (replacing coordinate and edges).
//! - A path is kept only if its classification is in the configured
//!   allow-list.  Its speed is resolved once, before any mutation, so a
//!   rejected path never leaves nodes behind.
//! - Each consecutive point pair `(i, i+1)` of a kept path ensures both
//!   endpoints exist, then appends `i → i+1` and, unless the path is
//!   one-way, `i+1 → i` with the same distance and time.
//!
//! # Usage
//!
//! ```ignore
//! use rg_core::RoadConfig;
//! use rg_network::{build_graph, SpeedPolicy};
//!
//! let config = RoadConfig::default();
//! let (graph, stats) = build_graph(&config, SpeedPolicy::Skip, decoder)?;
//! ```

use tracing::{info, warn};

use rg_core::{NodeId, RoadConfig};

use crate::graph::{Edge, RoadGraph};
use crate::speed::SpeedResolver;
use crate::{Entity, NetworkError, NetworkResult, PathRecord, PathRef, PointRecord, SpeedError};

// ── Options and reports ───────────────────────────────────────────────────────

/// What to do with a kept path whose speed cannot be resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SpeedPolicy {
    /// Fail the whole build with [`NetworkError::UnresolvedSpeed`].
    #[default]
    Abort,
    /// Drop the path; it contributes no nodes and no edges.
    Skip,
    /// Use this speed (mph) instead.  Must be positive and finite.
    Fallback(f64),
}

/// Counters collected while building.
///
/// Path counters count path entities as fed to the builder, not source
/// records.  The OSM loader feeds one path per run of known nodes, so a way
/// split by missing nodes counts once per run, and a drivable way with no
/// run of two known nodes is not counted at all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub points:         u64,
    /// Path entities seen, whatever their outcome.
    pub paths:          u64,
    /// Paths that contributed to the graph.
    pub paths_kept:     u64,
    /// Paths outside the allow-list.
    pub paths_filtered: u64,
    /// Paths dropped under [`SpeedPolicy::Skip`].
    pub paths_skipped:  u64,
    /// Paths that used the [`SpeedPolicy::Fallback`] speed.
    pub paths_fallback: u64,
    pub edges:          u64,
}

/// Result of feeding one path to the builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathOutcome {
    Added { edges: usize },
    Filtered,
    Skipped,
}

// ── GraphBuilder ──────────────────────────────────────────────────────────────

/// Builds a [`RoadGraph`] one entity at a time, then [`finish`](Self::finish).
pub struct GraphBuilder<'c> {
    pub(crate) config: &'c RoadConfig,
    pub(crate) policy: SpeedPolicy,
    pub(crate) graph:  RoadGraph,
    pub(crate) stats:  BuildStats,
    /// Entities consumed so far; the position of the next one.
    pub(crate) seen:   usize,
}

impl<'c> GraphBuilder<'c> {
    pub fn new(config: &'c RoadConfig) -> Self {
        Self {
            config,
            policy: SpeedPolicy::default(),
            graph:  RoadGraph::new(),
            stats:  BuildStats::default(),
            seen:   0,
        }
    }

    pub fn speed_policy(mut self, policy: SpeedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Feed one entity.
    pub fn push(&mut self, entity: Entity) -> NetworkResult<()> {
        match entity {
            Entity::Point(p) => self.add_point(p),
            Entity::Path(p) => {
                self.add_path(&p)?;
            }
        }
        Ok(())
    }

    pub fn add_point(&mut self, point: PointRecord) {
        self.seen += 1;
        self.stats.points += 1;
        self.graph.upsert(point.id, point.pos);
    }

    /// Feed one path.
    ///
    /// # Errors
    ///
    /// [`NetworkError::UnresolvedSpeed`] under [`SpeedPolicy::Abort`];
    /// [`NetworkError::InvalidFallback`] if the fallback speed is unusable.
    pub fn add_path(&mut self, path: &PathRecord) -> NetworkResult<PathOutcome> {
        let position = self.seen;
        self.seen += 1;

        let plan = plan_path(self.config, path);
        let filtered = plan == Plan::Filtered;
        let Some(plan) = self.admit(position, path, plan)? else {
            return Ok(if filtered { PathOutcome::Filtered } else { PathOutcome::Skipped });
        };

        let ids = ensure_endpoints(&mut self.graph, path);
        let segments = measure_segments(&self.graph, &ids, plan.speed_mph, self.config.earth_radius_miles);
        let edges = append_segments(&mut self.graph, &segments, plan.oneway);
        self.stats.edges += edges as u64;
        Ok(PathOutcome::Added { edges })
    }

    /// The graph built so far.
    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Consume the builder and return the graph with its build counters.
    pub fn finish(self) -> (RoadGraph, BuildStats) {
        info!(
            nodes = self.graph.node_count(),
            edges = self.stats.edges,
            paths_kept = self.stats.paths_kept,
            paths_filtered = self.stats.paths_filtered,
            paths_skipped = self.stats.paths_skipped,
            "road graph built"
        );
        (self.graph, self.stats)
    }

    /// Apply the speed policy to a planned path and update counters.
    ///
    /// Returns `None` for a path that must leave no trace in the graph.
    pub(crate) fn admit(
        &mut self,
        position: usize,
        path: &PathRecord,
        plan: Plan,
    ) -> NetworkResult<Option<PathPlan>> {
        self.stats.paths += 1;
        let plan = match plan {
            Plan::Filtered => {
                self.stats.paths_filtered += 1;
                return Ok(None);
            }
            Plan::Ready(plan) => plan,
            Plan::Unresolved { reason, oneway } => {
                let path_ref = PathRef { position, id: path.id.clone() };
                match self.policy {
                    SpeedPolicy::Abort => {
                        return Err(NetworkError::UnresolvedSpeed { path: path_ref, reason });
                    }
                    SpeedPolicy::Skip => {
                        warn!(path = %path_ref, %reason, "skipping path with unresolved speed");
                        self.stats.paths_skipped += 1;
                        return Ok(None);
                    }
                    SpeedPolicy::Fallback(mph) => {
                        if !(mph.is_finite() && mph > 0.0) {
                            return Err(NetworkError::InvalidFallback(mph));
                        }
                        self.stats.paths_fallback += 1;
                        PathPlan { speed_mph: mph, oneway }
                    }
                }
            }
        };
        self.stats.paths_kept += 1;
        Ok(Some(plan))
    }
}

/// Build a graph from a fallible entity stream.
///
/// The first stream error aborts the build with [`NetworkError::Decode`];
/// no partial graph is returned.
pub fn build_graph<I, E>(
    config: &RoadConfig,
    policy: SpeedPolicy,
    stream: I,
) -> NetworkResult<(RoadGraph, BuildStats)>
where
    I: IntoIterator<Item = Result<Entity, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut builder = GraphBuilder::new(config).speed_policy(policy);
    for item in stream {
        builder.push(item.map_err(NetworkError::decode)?)?;
    }
    Ok(builder.finish())
}

// ── Per-path steps (shared with the parallel builder) ────────────────────────

/// Classification of a path before it touches the graph.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Plan {
    Filtered,
    Unresolved { reason: SpeedError, oneway: bool },
    Ready(PathPlan),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PathPlan {
    pub speed_mph: f64,
    pub oneway:    bool,
}

/// One measured segment of a kept path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Segment {
    pub from:     NodeId,
    pub to:       NodeId,
    pub distance: f64,
    pub time:     f64,
}

/// Filter by allow-list, detect one-way, and resolve speed.  Pure.
pub(crate) fn plan_path(config: &RoadConfig, path: &PathRecord) -> Plan {
    let Some(class) = path.tag(&config.class_tag).filter(|c| config.is_drivable(c)) else {
        return Plan::Filtered;
    };
    let oneway = path
        .tag(&config.oneway_tag)
        .is_some_and(|v| config.is_oneway_value(v));
    match SpeedResolver::new(config).resolve(class, path.tag(&config.speed_tag)) {
        Ok(speed_mph) => Plan::Ready(PathPlan { speed_mph, oneway }),
        Err(reason) => Plan::Unresolved { reason, oneway },
    }
}

/// Ensure every referenced point exists; return their ids in path order.
///
/// A path with fewer than two points has no segments and creates nothing.
pub(crate) fn ensure_endpoints(graph: &mut RoadGraph, path: &PathRecord) -> Vec<NodeId> {
    if path.points.len() < 2 {
        return Vec::new();
    }
    path.points
        .iter()
        .map(|p| graph.ensure(&p.id, p.pos))
        .collect()
}

/// Distance between the stored coordinates of each consecutive pair, and
/// time at `speed_mph`.  Read-only on the graph.
pub(crate) fn measure_segments(
    graph: &RoadGraph,
    ids: &[NodeId],
    speed_mph: f64,
    radius_miles: f64,
) -> Vec<Segment> {
    ids.windows(2)
        .map(|pair| {
            let (from, to) = (pair[0], pair[1]);
            let distance = graph
                .node(from)
                .pos()
                .distance_on_sphere(graph.node(to).pos(), radius_miles);
            Segment { from, to, distance, time: distance / speed_mph }
        })
        .collect()
}

/// Append forward (and, if two-way, reverse) edges.  Returns edges added.
pub(crate) fn append_segments(graph: &mut RoadGraph, segments: &[Segment], oneway: bool) -> usize {
    let mut added = 0;
    for s in segments {
        let to_key = graph.key(s.to).clone();
        graph.push_edge(s.from, Edge::new(to_key, s.distance, s.time));
        added += 1;
        if !oneway {
            let from_key = graph.key(s.from).clone();
            graph.push_edge(s.to, Edge::new(from_key, s.distance, s.time));
            added += 1;
        }
    }
    added
}
