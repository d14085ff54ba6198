//! OSM PBF loader, enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use rg_core::RoadConfig;
//! use rg_network::{osm::load_from_pbf, SpeedPolicy};
//!
//! let (graph, stats) = load_from_pbf(Path::new("annarbor.osm.pbf"), &RoadConfig::default(), SpeedPolicy::Skip)?;
//! ```
//!
//! # What is loaded
//!
//! Every OSM node becomes a point entity and every way a path entity, fed to
//! [`GraphBuilder`] in file order in a single pass.  Nodes that no drivable
//! way touches stay isolated and fall away at component extraction.
//!
//! With the `parallel` feature, consecutive ways are buffered and handed to
//! [`GraphBuilder::add_paths_par`]; a node flushes the buffer first, so the
//! graph is the same either way.
//!
//! Ways reference nodes by id only, so a path point takes the coordinate of
//! the node already read.  A way that references a node missing from the
//! file (common at the edge of a clipped extract) is split into the runs of
//! consecutive known nodes on either side of the gap.

use std::path::Path;

use osmpbf::{Element, ElementReader, Way};
use tracing::debug;

use rg_core::{GeoPoint, NodeKey, RoadConfig};

use crate::entity::split_known_runs;
use crate::{BuildStats, GraphBuilder, NetworkError, NetworkResult, PathRecord, PointRecord, RoadGraph, SpeedPolicy, Tags};

/// Load a road graph from an OSM PBF file.
///
/// # Errors
///
/// [`NetworkError::Osm`] on file or parse errors; any builder error
/// (e.g. [`NetworkError::UnresolvedSpeed`] under [`SpeedPolicy::Abort`]).
pub fn load_from_pbf(
    path: &Path,
    config: &RoadConfig,
    policy: SpeedPolicy,
) -> NetworkResult<(RoadGraph, BuildStats)> {
    let reader = ElementReader::from_path(path).map_err(|e| NetworkError::Osm(e.to_string()))?;
    let mut sink = Sink::new(GraphBuilder::new(config).speed_policy(policy));

    // `for_each` cannot short-circuit; remember the first builder error and
    // ignore everything after it.
    let mut failure: Option<NetworkError> = None;

    let read = reader
        .for_each(|elem| {
            if failure.is_some() {
                return;
            }
            let result = match elem {
                Element::Node(n) => sink.point(PointRecord::new(n.id(), n.lat(), n.lon())),
                Element::DenseNode(n) => sink.point(PointRecord::new(n.id(), n.lat(), n.lon())),
                Element::Way(w) => add_way(&mut sink, config, &w),
                _ => Ok(()),
            };
            if let Err(e) = result {
                failure = Some(e);
            }
        });

    if let Some(e) = failure {
        return Err(e);
    }
    if let Err(e) = read {
        // Ways buffered before a corrupt block still report their own errors.
        sink.flush()?;
        return Err(NetworkError::Osm(e.to_string()));
    }
    sink.finish()
}

// ── Sink ──────────────────────────────────────────────────────────────────────

/// Routes decoded elements into the builder, batching ways when built with
/// the `parallel` feature.
struct Sink<'c> {
    builder: GraphBuilder<'c>,
    #[cfg(feature = "parallel")]
    pending: Vec<PathRecord>,
}

impl<'c> Sink<'c> {
    fn new(builder: GraphBuilder<'c>) -> Self {
        Self {
            builder,
            #[cfg(feature = "parallel")]
            pending: Vec::new(),
        }
    }

    fn point(&mut self, point: PointRecord) -> NetworkResult<()> {
        self.flush()?;
        self.builder.add_point(point);
        Ok(())
    }

    #[cfg(not(feature = "parallel"))]
    fn path(&mut self, path: PathRecord) -> NetworkResult<()> {
        self.builder.add_path(&path).map(|_| ())
    }

    #[cfg(feature = "parallel")]
    fn path(&mut self, path: PathRecord) -> NetworkResult<()> {
        self.pending.push(path);
        if self.pending.len() >= crate::parallel::DEFAULT_CHUNK {
            self.flush()?;
        }
        Ok(())
    }

    #[cfg(not(feature = "parallel"))]
    fn flush(&mut self) -> NetworkResult<()> {
        Ok(())
    }

    #[cfg(feature = "parallel")]
    fn flush(&mut self) -> NetworkResult<()> {
        if !self.pending.is_empty() {
            self.builder.add_paths_par(&self.pending)?;
            self.pending.clear();
        }
        Ok(())
    }

    /// Coordinate of a node already read.
    fn position(&self, key: &NodeKey) -> Option<GeoPoint> {
        self.builder.graph().get(key.as_str()).map(|n| n.pos())
    }

    fn finish(mut self) -> NetworkResult<(RoadGraph, BuildStats)> {
        self.flush()?;
        Ok(self.builder.finish())
    }
}

// ── Ways ──────────────────────────────────────────────────────────────────────

fn add_way(sink: &mut Sink<'_>, config: &RoadConfig, way: &Way<'_>) -> NetworkResult<()> {
    // Collect tags eagerly so &str lifetimes don't escape the element.
    let tags: Tags = way
        .tags()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();
    let id = way.id().to_string();

    let drivable = tags
        .get(&config.class_tag)
        .is_some_and(|class| config.is_drivable(class));
    if !drivable {
        // Counted as filtered; no coordinate lookups needed.
        return sink.path(PathRecord { id: Some(id), points: Vec::new(), tags });
    }

    let (runs, missing) = split_known_runs(way.refs().map(NodeKey::from), |key| sink.position(key));
    if missing > 0 {
        debug!(way = %id, missing, runs = runs.len(), "way references nodes outside the extract");
    }

    for points in runs {
        sink.path(PathRecord { id: Some(id.clone()), points, tags: tags.clone() })?;
    }
    Ok(())
}
