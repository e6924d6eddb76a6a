//! Mercator projection (spherical and ellipsoidal, variant A).
//!
//! Covers Web Mercator (EPSG:3857, spherical equations on the WGS 84 axis),
//! World Mercator (EPSG:3395) and PDC Mercator (EPSG:3832), whose central
//! meridian of 150°E makes it continuous across the antimeridian.

use crate::ellipsoid::{adjlon, phi2, tsfn, Ellipsoid};

/// Mercator projection parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Mercator {
    pub ellipsoid: Ellipsoid,
    /// Central meridian in radians
    pub lon0: f64,
    /// Scale factor on the equator
    pub k0: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

impl Mercator {
    /// Create a Mercator projection.
    ///
    /// # Arguments
    /// * `ellipsoid` - Reference ellipsoid (use a sphere for spherical Mercator)
    /// * `lon0_deg` - Central meridian (degrees)
    /// * `k0` - Scale factor at the equator
    /// * `false_easting`, `false_northing` - Offsets added to projected output (meters)
    pub fn new(
        ellipsoid: Ellipsoid,
        lon0_deg: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        Self {
            ellipsoid,
            lon0: lon0_deg.to_radians(),
            k0,
            false_easting,
            false_northing,
        }
    }

    /// Mercator with a latitude of true scale instead of an explicit `k0`.
    pub fn with_lat_ts(ellipsoid: Ellipsoid, lon0_deg: f64, lat_ts_deg: f64) -> Self {
        let k0 = crate::ellipsoid::msfn(lat_ts_deg.to_radians(), ellipsoid.e());
        Self::new(ellipsoid, lon0_deg, k0, 0.0, 0.0)
    }

    /// Web Mercator (EPSG:3857).
    pub fn web() -> Self {
        Self::new(Ellipsoid::WEB_SPHERE, 0.0, 1.0, 0.0, 0.0)
    }

    /// World Mercator (EPSG:3395).
    pub fn world() -> Self {
        Self::new(Ellipsoid::WGS84, 0.0, 1.0, 0.0, 0.0)
    }

    /// PDC Mercator (EPSG:3832), centred on 150°E.
    pub fn pdc() -> Self {
        Self::new(Ellipsoid::WGS84, 150.0, 1.0, 0.0, 0.0)
    }

    /// Project geographic coordinates (degrees) to meters.
    ///
    /// The poles map to infinite northings.
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let ak = self.ellipsoid.a * self.k0;
        let dlon = adjlon(lon_deg.to_radians() - self.lon0);
        let ts = tsfn(lat_deg.to_radians(), self.ellipsoid.e());

        let x = self.false_easting + ak * dlon;
        let y = self.false_northing - ak * ts.ln();
        (x, y)
    }

    /// Unproject meters to geographic coordinates (degrees), longitude wrapped
    /// into `[-180, 180]`.
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let ak = self.ellipsoid.a * self.k0;
        let lon = adjlon(self.lon0 + (x - self.false_easting) / ak);
        let ts = (-(y - self.false_northing) / ak).exp();
        let lat = phi2(ts, self.ellipsoid.e());
        (lon.to_degrees(), lat.to_degrees())
    }
}
