//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// Errors produced while constructing or validating core values.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown network type {0:?} (expected drive, drive_service, walk, bike or all)")]
    InvalidNetworkType(String),

    #[error("invalid bounding box (west {west}, south {south}, east {east}, north {north})")]
    InvalidBoundingBox {
        west:  f64,
        south: f64,
        east:  f64,
        north: f64,
    },
}

/// Shorthand result type for `jx-core`.
pub type CoreResult<T> = Result<T, CoreError>;
