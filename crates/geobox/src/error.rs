//! Error types for grid algebra and geometry operations.

use projection::ProjectionError;
use thiserror::Error;

/// Result type alias using GeoError.
pub type GeoResult<T> = Result<T, GeoError>;

/// Primary error type for geobox operations.
///
/// Every variant is a deterministic input or logic error; none are transient.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    // === CRS Errors ===
    #[error("Invalid CRS: {0}")]
    InvalidCrs(String),

    #[error("CRS mismatch: {left} vs {right}")]
    CrsMismatch { left: String, right: String },

    // === Grid Errors ===
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Incompatible grids: {0}")]
    IncompatibleGrid(String),

    // === Input Errors ===
    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
}

impl GeoError {
    /// Stable machine-readable name for this error.
    pub fn code(&self) -> &'static str {
        match self {
            GeoError::InvalidCrs(_) => "InvalidCRS",
            GeoError::CrsMismatch { .. } => "CRSMismatch",
            GeoError::InvalidGrid(_) => "InvalidGrid",
            GeoError::IncompatibleGrid(_) => "IncompatibleGrid",
            GeoError::Input(_) => "InputError",
            GeoError::Unsupported(_) => "NotImplemented",
            GeoError::InvalidGeometry(_) => "InvalidGeometry",
        }
    }

    pub(crate) fn crs_mismatch(left: impl ToString, right: impl ToString) -> Self {
        GeoError::CrsMismatch {
            left: left.to_string(),
            right: right.to_string(),
        }
    }
}

/// An unknown code or unparseable definition is a bad CRS from the caller's side.
impl From<ProjectionError> for GeoError {
    fn from(err: ProjectionError) -> Self {
        GeoError::InvalidCrs(err.to_string())
    }
}

impl From<serde_json::Error> for GeoError {
    fn from(err: serde_json::Error) -> Self {
        GeoError::InvalidGeometry(format!("JSON error: {}", err))
    }
}
