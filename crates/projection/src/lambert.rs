//! Lambert Conformal Conic projection (spherical form).
//!
//! It maps a cone tangent or secant to the Earth's surface onto a flat plane.
//!
//! The projection parameters include:
//! - Latitude of origin (lat0)
//! - Central meridian (lon0)
//! - Standard parallel(s): lat1 and lat2 (equal for a tangent cone)
//! - False easting / northing in meters

use crate::ellipsoid::adjlon;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Lambert Conformal Conic projection parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LambertConformal {
    /// Central meridian in radians
    pub lon0: f64,
    /// Latitude of origin in radians
    pub lat0: f64,
    /// First standard parallel in radians
    pub lat1: f64,
    /// Second standard parallel in radians
    pub lat2: f64,
    /// Sphere radius (meters)
    pub radius: f64,
    pub false_easting: f64,
    pub false_northing: f64,
    /// Cone constant (n)
    n: f64,
    /// F constant
    f: f64,
    /// Rho at the latitude of origin
    rho0: f64,
}

impl LambertConformal {
    /// Create a new Lambert Conformal projection.
    ///
    /// # Arguments
    /// * `lat0_deg` - Latitude of origin (degrees)
    /// * `lon0_deg` - Central meridian (degrees)
    /// * `lat1_deg` - First standard parallel (degrees)
    /// * `lat2_deg` - Second standard parallel (degrees)
    /// * `radius` - Sphere radius (meters)
    pub fn new(
        lat0_deg: f64,
        lon0_deg: f64,
        lat1_deg: f64,
        lat2_deg: f64,
        radius: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let lat0 = lat0_deg.to_radians();
        let lon0 = lon0_deg.to_radians();
        let lat1 = lat1_deg.to_radians();
        let lat2 = lat2_deg.to_radians();

        let n = if (lat1 - lat2).abs() < 1e-10 {
            // Tangent cone (single standard parallel)
            lat1.sin()
        } else {
            // Secant cone (two standard parallels)
            let ln_ratio = (lat1.cos() / lat2.cos()).ln();
            let tan_ratio =
                ((FRAC_PI_4 + lat2 / 2.0).tan() / (FRAC_PI_4 + lat1 / 2.0).tan()).ln();
            ln_ratio / tan_ratio
        };

        let f = (lat1.cos() * (FRAC_PI_4 + lat1 / 2.0).tan().powf(n)) / n;
        let rho0 = radius * f / (FRAC_PI_4 + lat0 / 2.0).tan().powf(n);

        Self {
            lon0,
            lat0,
            lat1,
            lat2,
            radius,
            false_easting,
            false_northing,
            n,
            f,
            rho0,
        }
    }

    /// Tangent cone at 38.5°N centred on 97.5°W, the HRRR CONUS layout.
    pub fn conus() -> Self {
        Self::new(38.5, -97.5, 38.5, 38.5, 6371229.0, 0.0, 0.0)
    }

    /// Cone constant.
    pub fn cone_constant(&self) -> f64 {
        self.n
    }

    /// Project geographic coordinates (degrees) to meters.
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let lat = lat_deg.to_radians();
        let dlon = adjlon(lon_deg.to_radians() - self.lon0);

        let rho = self.radius * self.f / (FRAC_PI_4 + lat / 2.0).tan().powf(self.n);
        let theta = self.n * dlon;

        let x = rho * theta.sin();
        let y = self.rho0 - rho * theta.cos();
        (x + self.false_easting, y + self.false_northing)
    }

    /// Unproject meters to geographic coordinates (degrees).
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let sign = self.n.signum();
        let dx = (x - self.false_easting) * sign;
        let dy = (self.rho0 - (y - self.false_northing)) * sign;

        let rho = dx.hypot(dy) * sign;
        let lat = if rho == 0.0 {
            sign * FRAC_PI_2
        } else {
            2.0 * (self.radius * self.f / rho).powf(1.0 / self.n).atan() - FRAC_PI_2
        };
        let theta = dx.atan2(dy);
        let lon = adjlon(self.lon0 + theta / self.n);

        (lon.to_degrees(), lat.to_degrees())
    }
}
