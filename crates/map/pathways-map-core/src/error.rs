//! Error types for the stylized map core.

use serde::{Deserialize, Serialize};

/// Errors raised while building a path, a transform, or a map configuration.
///
/// Every variant is a construction-time failure: once a [`crate::Path`] or
/// [`crate::MapScene`] exists, playback has no error paths.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MapError {
    /// A path needs at least two waypoints to form a segment.
    #[error("path needs at least 2 waypoints, got {count}")]
    TooFewWaypoints { count: usize },

    /// A waypoint's traversal duration must be strictly positive.
    #[error("waypoint {index} has non-positive duration {duration_ms} ms")]
    NonPositiveDuration { index: usize, duration_ms: u32 },

    /// A waypoint coordinate is NaN or infinite.
    #[error("waypoint {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    /// Scale factor must be finite and > 0.
    #[error("invalid scale factor: {value}")]
    InvalidScale { value: f64 },

    /// View box dimensions must be finite and > 0.
    #[error("invalid view box: {width} x {height}")]
    InvalidViewBox { width: f64, height: f64 },

    /// Grid cell size must be finite and > 0.
    #[error("invalid grid cell size: {value}")]
    InvalidCellSize { value: f64 },

    /// Grid extents must be finite with `min < max`.
    #[error("invalid grid extent: {min} .. {max}")]
    InvalidGridExtent { min: f64, max: f64 },

    /// Cell size and extents would produce more grid lines than `limit`.
    #[error("grid would need more than {limit} lines")]
    GridTooDense { limit: usize },

    /// JSON document could not be decoded.
    #[error("parse error: {reason}")]
    Parse { reason: String },
}

impl MapError {
    /// Coarse category, handy for log fields.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::TooFewWaypoints { .. }
            | Self::NonPositiveDuration { .. }
            | Self::NonFiniteCoordinate { .. } => "path",
            Self::InvalidScale { .. }
            | Self::InvalidViewBox { .. }
            | Self::InvalidCellSize { .. }
            | Self::InvalidGridExtent { .. }
            | Self::GridTooDense { .. } => "config",
            Self::Parse { .. } => "parse",
        }
    }
}

impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            reason: err.to_string(),
        }
    }
}
