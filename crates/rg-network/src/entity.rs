//! Decoded map entities consumed by the graph builder.
//!
//! These are the only input types the core understands.  Producing them
//! from a file format (OSM PBF, XML, a test fixture) is the decoder's job.

use rustc_hash::FxHashMap;

use rg_core::{GeoPoint, NodeKey};

/// Descriptive key/value tags of a path (`highway`, `oneway`, `maxspeed`, …).
pub type Tags = FxHashMap<String, String>;

/// A point with an identifier and a coordinate.
#[derive(Clone, Debug, PartialEq)]
pub struct PointRecord {
    pub id:  NodeKey,
    pub pos: GeoPoint,
}

impl PointRecord {
    pub fn new(id: impl Into<NodeKey>, lat: f64, lon: f64) -> Self {
        Self { id: id.into(), pos: GeoPoint::new(lat, lon) }
    }
}

/// An ordered sequence of point references plus tags.
///
/// Each reference carries its own coordinate, used only when the builder has
/// not seen that point before.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathRecord {
    /// Source identifier (an OSM way id), reported in errors.
    pub id:     Option<String>,
    pub points: Vec<PointRecord>,
    pub tags:   Tags,
}

impl PathRecord {
    pub fn new<K, V>(points: Vec<PointRecord>, tags: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            id: None,
            points,
            tags: tags.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[inline]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

/// Resolve node references to points and split them at the unresolved ones.
///
/// `locate` returns the coordinate of a known node.  Each maximal run of
/// consecutive known references becomes one point list; runs shorter than
/// two points are dropped since they have no segment.  Also returns how many
/// references could not be resolved.
///
/// ```text
/// refs  1 2 ? 4 5 6 ? 8 ? 10 11
/// runs  [1 2]   [4 5 6]       [10 11]     ([8] dropped), missing = 3
/// ```
pub fn split_known_runs<I, F>(refs: I, mut locate: F) -> (Vec<Vec<PointRecord>>, usize)
where
    I: IntoIterator<Item = NodeKey>,
    F: FnMut(&NodeKey) -> Option<GeoPoint>,
{
    let mut runs: Vec<Vec<PointRecord>> = Vec::new();
    let mut run: Vec<PointRecord> = Vec::new();
    let mut missing = 0usize;
    for key in refs {
        match locate(&key) {
            Some(pos) => run.push(PointRecord { id: key, pos }),
            None => {
                missing += 1;
                if run.len() >= 2 {
                    runs.push(std::mem::take(&mut run));
                } else {
                    run.clear();
                }
            }
        }
    }
    if run.len() >= 2 {
        runs.push(run);
    }
    (runs, missing)
}

/// One item of the decoded stream.
#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
    Point(PointRecord),
    Path(PathRecord),
}

impl From<PointRecord> for Entity {
    fn from(p: PointRecord) -> Self {
        Entity::Point(p)
    }
}

impl From<PathRecord> for Entity {
    fn from(p: PathRecord) -> Self {
        Entity::Path(p)
    }
}
