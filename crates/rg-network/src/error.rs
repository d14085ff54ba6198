//! Network-subsystem error types.

use std::fmt;

use thiserror::Error;

use rg_core::{CoreError, NodeKey};

/// Why a path's maximum speed could not be determined.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpeedError {
    #[error("speed tag {0:?} has no leading integer")]
    Unparseable(String),

    #[error("speed tag {0:?} resolves to zero")]
    Zero(String),

    #[error("no default speed for road class {0:?}")]
    NoDefault(String),
}

/// Identifies a path record in the builder's input: its position among all
/// entities fed to the builder, plus the source id when the decoder has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRef {
    pub position: usize,
    pub id:       Option<String>,
}

impl fmt::Display for PathRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{id} (entity #{})", self.position),
            None => write!(f, "entity #{}", self.position),
        }
    }
}

/// Errors produced by `rg-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("decode error: {0}")]
    Decode(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("unresolved speed for path {path}: {reason}")]
    UnresolvedSpeed { path: PathRef, reason: SpeedError },

    #[error("edge {from} -> {to} points outside the retained node set")]
    DanglingEdge { from: NodeKey, to: NodeKey },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeKey),

    #[error("no edge from {from} to {to}")]
    NoEdge { from: NodeKey, to: NodeKey },

    #[error("invalid fallback speed {0} mph")]
    InvalidFallback(f64),

    #[error(transparent)]
    Config(#[from] CoreError),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}

impl NetworkError {
    /// Wrap a decoder error.
    pub fn decode<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        NetworkError::Decode(Box::new(err))
    }
}

pub type NetworkResult<T> = Result<T, NetworkError>;
