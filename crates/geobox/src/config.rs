//! Serializable option and description types.

use serde::{Deserialize, Serialize};

use crate::affine::Affine;
use crate::crs::Crs;
use crate::error::GeoError;
use crate::geobox::GeoBox;

/// Segmentation length for geographic sources when none is given (degrees).
pub const DEFAULT_GEOGRAPHIC_RESOLUTION: f64 = 1.0;
/// Segmentation length for projected sources when none is given (CRS units).
pub const DEFAULT_PROJECTED_RESOLUTION: f64 = 100_000.0;

/// Options controlling [`crate::Geometry::to_crs`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReprojectOptions {
    /// Maximum edge length, in source CRS units, before transforming.
    pub resolution: Option<f64>,

    /// Split geometry at the antimeridian when reprojecting into a geographic CRS.
    pub wrap_dateline: bool,
}

impl ReprojectOptions {
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = Some(resolution);
        self
    }

    pub fn with_wrap_dateline(mut self) -> Self {
        self.wrap_dateline = true;
        self
    }

    /// Explicit resolution, or the default for the source CRS kind.
    pub fn resolution_for(&self, source: &Crs) -> f64 {
        self.resolution.unwrap_or(if source.is_geographic() {
            DEFAULT_GEOGRAPHIC_RESOLUTION
        } else {
            DEFAULT_PROJECTED_RESOLUTION
        })
    }
}

/// Plain description of a [`GeoBox`], as read from YAML or JSON.
///
/// Affine coefficients are in (a, b, c, d, e, f) order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoBoxSpec {
    pub width: usize,
    pub height: usize,
    pub affine: [f64; 6],
    pub crs: String,
}

impl TryFrom<GeoBoxSpec> for GeoBox {
    type Error = GeoError;

    fn try_from(spec: GeoBoxSpec) -> Result<Self, Self::Error> {
        let crs = Crs::new(&spec.crs)?;
        GeoBox::new(
            spec.width,
            spec.height,
            Affine::from_coefficients(spec.affine),
            crs,
        )
    }
}

impl From<&GeoBox> for GeoBoxSpec {
    fn from(geobox: &GeoBox) -> Self {
        GeoBoxSpec {
            width: geobox.width(),
            height: geobox.height(),
            affine: geobox.affine().coefficients(),
            crs: geobox.crs().crs_str().to_string(),
        }
    }
}
