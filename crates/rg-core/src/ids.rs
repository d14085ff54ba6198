//! Node identifiers.
//!
//! Two kinds of identity coexist:
//!
//! - [`NodeKey`] is the external, globally unique string key a node carries
//!   in the source data and in the serialized graph (an OSM node id such as
//!   `"61234567"`).
//! - [`NodeId`] is a dense `u32` index assigned in insertion order by the
//!   graph that owns the node.  It is only meaningful for that graph and is
//!   what the traversal code uses for `Vec` indexing.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

// ── NodeId ────────────────────────────────────────────────────────────────────

/// Dense index of a node inside one `RoadGraph`.  Max ~4.3 billion nodes.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel meaning "no valid ID" (`u32::MAX`).
    pub const INVALID: NodeId = NodeId(u32::MAX);

    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for NodeId {
    /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
    #[inline(always)]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<NodeId> for usize {
    #[inline(always)]
    fn from(id: NodeId) -> usize {
        id.0 as usize
    }
}

// ── NodeKey ───────────────────────────────────────────────────────────────────

/// External string key of a node.
///
/// Serializes as a bare string so it can be used directly as a JSON object
/// key and as the `nodeId` field of an edge.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(String);

impl NodeKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Borrow<str> for NodeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeKey {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for NodeKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// OSM node ids are signed 64-bit integers; their key is the decimal form.
impl From<i64> for NodeKey {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}
