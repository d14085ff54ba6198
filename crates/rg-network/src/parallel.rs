//! Parallel graph construction, enabled with the `parallel` Cargo feature.
//!
//! Consecutive path entities are buffered into chunks.  Each chunk runs in
//! four phases:
//!
//! 1. classify and resolve speeds (parallel, pure);
//! 2. apply the speed policy and ensure endpoint nodes (sequential, stream
//!    order);
//! 3. measure segment distances and times against the now read-only graph
//!    (parallel);
//! 4. append edges (sequential, stream order).
//!
//! The graph is never written from more than one thread, so no locks are
//! taken, and the result is identical to [`build_graph`](crate::build_graph)
//! on the same stream: node order, adjacency order, and errors included.
//! A point entity flushes the pending chunk before it is applied, and so
//! does a stream error, so a bad path buffered ahead of it is still the
//! error reported.

use rayon::prelude::*;

use rg_core::{NodeId, RoadConfig};

use crate::builder::{PathPlan, append_segments, ensure_endpoints, measure_segments, plan_path};
use crate::graph::RoadGraph;
use crate::{BuildStats, Entity, GraphBuilder, NetworkError, NetworkResult, PathRecord, SpeedPolicy};

/// Paths per chunk when the caller passes `0`.
pub const DEFAULT_CHUNK: usize = 8_192;

impl GraphBuilder<'_> {
    /// Feed a run of consecutive paths, processing them in parallel.
    ///
    /// Equivalent to calling [`add_path`](Self::add_path) on each in order.
    pub fn add_paths_par(&mut self, paths: &[PathRecord]) -> NetworkResult<()> {
        let config = self.config;
        let plans: Vec<_> = paths.par_iter().map(|p| plan_path(config, p)).collect();

        let mut jobs: Vec<(Vec<NodeId>, PathPlan)> = Vec::with_capacity(paths.len());
        for (path, plan) in paths.iter().zip(plans) {
            let position = self.seen;
            self.seen += 1;
            if let Some(plan) = self.admit(position, path, plan)? {
                let ids = ensure_endpoints(&mut self.graph, path);
                jobs.push((ids, plan));
            }
        }

        let radius = config.earth_radius_miles;
        let graph: &RoadGraph = &self.graph;
        let measured: Vec<_> = jobs
            .par_iter()
            .map(|(ids, plan)| measure_segments(graph, ids, plan.speed_mph, radius))
            .collect();

        for ((_, plan), segments) in jobs.iter().zip(&measured) {
            let edges = append_segments(&mut self.graph, segments, plan.oneway);
            self.stats.edges += edges as u64;
        }
        Ok(())
    }
}

/// Build a graph from a fallible entity stream, processing paths in chunks
/// of `chunk_size` on the rayon thread pool.
///
/// Produces the same graph as [`build_graph`](crate::build_graph).
pub fn build_graph_par<I, E>(
    config: &RoadConfig,
    policy: SpeedPolicy,
    stream: I,
    chunk_size: usize,
) -> NetworkResult<(RoadGraph, BuildStats)>
where
    I: IntoIterator<Item = Result<Entity, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let chunk_size = if chunk_size == 0 { DEFAULT_CHUNK } else { chunk_size };
    let mut builder = GraphBuilder::new(config).speed_policy(policy);
    let mut pending: Vec<PathRecord> = Vec::with_capacity(chunk_size);

    for item in stream {
        let entity = match item {
            Ok(entity) => entity,
            Err(e) => {
                // Paths read before the failure are reported first, as the
                // sequential build would have seen them already.
                builder.add_paths_par(&pending)?;
                return Err(NetworkError::decode(e));
            }
        };
        match entity {
            Entity::Point(point) => {
                if !pending.is_empty() {
                    builder.add_paths_par(&pending)?;
                    pending.clear();
                }
                builder.add_point(point);
            }
            Entity::Path(path) => {
                pending.push(path);
                if pending.len() >= chunk_size {
                    builder.add_paths_par(&pending)?;
                    pending.clear();
                }
            }
        }
    }
    if !pending.is_empty() {
        builder.add_paths_par(&pending)?;
    }
    Ok(builder.finish())
}
