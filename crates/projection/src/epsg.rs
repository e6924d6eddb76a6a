//! Built-in registry of the EPSG codes this crate can project.

use crate::ellipsoid::Ellipsoid;
use crate::error::ProjectionError;
use crate::mercator::Mercator;
use crate::polar::PolarStereographic;
use crate::transform::Projection;

/// A registered EPSG definition.
#[derive(Debug, Clone, PartialEq)]
pub struct EpsgDefinition {
    pub code: u32,
    pub name: &'static str,
    pub projection: Projection,
}

/// Codes known to [`lookup_epsg`].
pub const SUPPORTED_EPSG_CODES: &[u32] = &[4326, 4269, 3857, 3395, 3832, 3031, 3413];

/// Look up an EPSG code.
pub fn lookup_epsg(code: u32) -> Result<EpsgDefinition, ProjectionError> {
    let (name, projection) = match code {
        4326 => ("WGS 84", Projection::LongLat(Ellipsoid::WGS84)),
        4269 => ("NAD83", Projection::LongLat(Ellipsoid::GRS80)),
        3857 | 900913 => (
            "WGS 84 / Pseudo-Mercator",
            Projection::Mercator(Mercator::web()),
        ),
        3395 => ("WGS 84 / World Mercator", Projection::Mercator(Mercator::world())),
        3832 => ("WGS 84 / PDC Mercator", Projection::Mercator(Mercator::pdc())),
        3031 => (
            "WGS 84 / Antarctic Polar Stereographic",
            Projection::PolarStereographic(PolarStereographic::antarctic()),
        ),
        3413 => (
            "WGS 84 / NSIDC Sea Ice Polar Stereographic North",
            Projection::PolarStereographic(PolarStereographic::nsidc_north()),
        ),
        _ => return Err(ProjectionError::UnsupportedEpsg(code)),
    };

    // 900913 is the legacy alias of 3857
    let code = if code == 900913 { 3857 } else { code };

    Ok(EpsgDefinition {
        code,
        name,
        projection,
    })
}
