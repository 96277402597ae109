//! Spatial-subsystem error type.

use thiserror::Error;

use jx_core::{BoundingBox, CoreError};

/// Errors produced by `jx-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("graph retrieval failed: {0}")]
    Fetch(String),

    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no road data for network type {network_type} in {bbox}")]
    EmptyRegion {
        bbox:         BoundingBox,
        network_type: jx_core::NetworkType,
    },

    #[error("malformed Overpass response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
