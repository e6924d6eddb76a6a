//! Error types for projection lookup and parsing.

use thiserror::Error;

/// Errors raised while building a projection from an identifier.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("Unsupported EPSG code: {0}")]
    UnsupportedEpsg(u32),

    #[error("Unsupported projection: {0}")]
    UnsupportedProjection(String),

    #[error("Missing projection parameter '{0}'")]
    MissingParameter(String),

    #[error("Invalid value for projection parameter '{param}': {value}")]
    InvalidParameter { param: String, value: String },

    #[error("Unknown ellipsoid: {0}")]
    UnknownEllipsoid(String),
}
