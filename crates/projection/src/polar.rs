//! Polar stereographic projection (ellipsoidal, variant B: latitude of true scale).
//!
//! Used for the polar sea-ice and ice-sheet grids, e.g. EPSG:3413 (NSIDC north)
//! and EPSG:3031 (Antarctic). Both are continuous across the antimeridian away
//! from the pole.
//!
//! The south-pole case is evaluated as the north-pole case with latitude and
//! longitude offset negated, then the plane coordinates negated (Snyder p. 161).

use crate::ellipsoid::{adjlon, msfn, phi2, tsfn, Ellipsoid};
use std::f64::consts::FRAC_PI_2;

/// Polar stereographic projection parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarStereographic {
    pub ellipsoid: Ellipsoid,
    /// True for a projection centred on the south pole
    pub south: bool,
    /// Latitude of true scale in radians (signed, as given)
    pub lat_ts: f64,
    /// Straight vertical longitude in radians
    pub lon0: f64,
    pub false_easting: f64,
    pub false_northing: f64,
    /// Denominator relating `t` to `rho`; precomputed from `lat_ts`
    akm1: f64,
}

impl PolarStereographic {
    /// Create a polar stereographic projection.
    ///
    /// # Arguments
    /// * `ellipsoid` - Reference ellipsoid
    /// * `south` - Centre on the south pole instead of the north pole
    /// * `lat_ts_deg` - Latitude of true scale (degrees)
    /// * `lon0_deg` - Straight vertical longitude (degrees)
    pub fn new(
        ellipsoid: Ellipsoid,
        south: bool,
        lat_ts_deg: f64,
        lon0_deg: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let e = ellipsoid.e();
        let phits = if south { -lat_ts_deg } else { lat_ts_deg }.to_radians();

        let akm1 = if (phits - FRAC_PI_2).abs() < 1e-12 {
            // True scale at the pole itself
            2.0 * ellipsoid.a / ((1.0 + e).powf(1.0 + e) * (1.0 - e).powf(1.0 - e)).sqrt()
        } else {
            ellipsoid.a * msfn(phits, e) / tsfn(phits, e)
        };

        Self {
            ellipsoid,
            south,
            lat_ts: lat_ts_deg.to_radians(),
            lon0: lon0_deg.to_radians(),
            false_easting,
            false_northing,
            akm1,
        }
    }

    /// NSIDC Sea Ice Polar Stereographic North (EPSG:3413).
    pub fn nsidc_north() -> Self {
        Self::new(Ellipsoid::WGS84, false, 70.0, -45.0, 0.0, 0.0)
    }

    /// Antarctic Polar Stereographic (EPSG:3031).
    pub fn antarctic() -> Self {
        Self::new(Ellipsoid::WGS84, true, -71.0, 0.0, 0.0, 0.0)
    }

    /// Project geographic coordinates (degrees) to meters.
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let mut phi = lat_deg.to_radians();
        let mut dlon = adjlon(lon_deg.to_radians() - self.lon0);
        if self.south {
            phi = -phi;
            dlon = -dlon;
        }

        let rho = self.akm1 * tsfn(phi, self.ellipsoid.e());
        let mut x = rho * dlon.sin();
        let mut y = -rho * dlon.cos();
        if self.south {
            x = -x;
            y = -y;
        }

        (x + self.false_easting, y + self.false_northing)
    }

    /// Unproject meters to geographic coordinates (degrees).
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let mut dx = x - self.false_easting;
        let mut dy = y - self.false_northing;
        if self.south {
            dx = -dx;
            dy = -dy;
        }

        let rho = dx.hypot(dy);
        let ts = rho / self.akm1;
        let mut phi = phi2(ts, self.ellipsoid.e());
        let mut dlon = if rho == 0.0 { 0.0 } else { dx.atan2(-dy) };
        if self.south {
            phi = -phi;
            dlon = -dlon;
        }

        let lon = adjlon(self.lon0 + dlon);
        (lon.to_degrees(), phi.to_degrees())
    }
}
