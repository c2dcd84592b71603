use thiserror::Error;

/// Top-level error type for the gyre extrusion kernel.
#[derive(Debug, Error)]
pub enum GyreError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Extrusion(#[from] ExtrusionError),
}

/// Errors related to contour and placement inputs.
///
/// These cover malformed inputs only. Geometric degeneracies encountered
/// while sweeping (coincident joints, colinear runs, coplanar line/plane
/// pairs) are never errors; they are resolved locally and surfaced as
/// validity flags on the computed values.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("contour requires at least {min} points, got {got}")]
    ContourTooSmall { min: usize, got: usize },
}

/// Errors related to extrusion configuration and paths.
#[derive(Debug, Error)]
pub enum ExtrusionError {
    #[error("path requires at least {min} joints, got {got}")]
    PathTooShort { min: usize, got: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience type alias for results using [`GyreError`].
pub type Result<T> = std::result::Result<T, GyreError>;
