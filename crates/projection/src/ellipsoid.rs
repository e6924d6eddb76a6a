//! Reference ellipsoids and the conformal-latitude helpers shared by the
//! Mercator and stereographic projections.
//!
//! The helpers follow Snyder, "Map Projections: A Working Manual" (USGS PP 1395),
//! equations 7-7, 7-9 and 14-15.

use std::f64::consts::FRAC_PI_2;

/// Maximum iterations when solving for latitude from the isometric `t` value.
const PHI2_MAX_ITER: usize = 30;
const PHI2_TOLERANCE: f64 = 1e-15;

/// A reference ellipsoid described by its semi-major axis and flattening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis (meters)
    pub a: f64,
    /// Flattening; zero for a sphere
    pub f: f64,
}

impl Ellipsoid {
    /// WGS 84
    pub const WGS84: Ellipsoid = Ellipsoid {
        a: 6378137.0,
        f: 1.0 / 298.257223563,
    };

    /// GRS 1980 (NAD83, ETRS89)
    pub const GRS80: Ellipsoid = Ellipsoid {
        a: 6378137.0,
        f: 1.0 / 298.257222101,
    };

    /// Sphere with the WGS 84 semi-major axis, as used by Web Mercator.
    pub const WEB_SPHERE: Ellipsoid = Ellipsoid { a: 6378137.0, f: 0.0 };

    /// Sphere of the given radius.
    pub fn sphere(radius: f64) -> Self {
        Self { a: radius, f: 0.0 }
    }

    /// Look up a named ellipsoid as spelled in proj strings (`+ellps=`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "WGS84" => Some(Self::WGS84),
            "GRS80" => Some(Self::GRS80),
            "SPHERE" => Some(Self::sphere(6370997.0)),
            _ => None,
        }
    }

    /// Semi-minor axis (meters).
    pub fn b(&self) -> f64 {
        self.a * (1.0 - self.f)
    }

    /// Inverse flattening, or zero for a sphere.
    pub fn inverse_flattening(&self) -> f64 {
        if self.f == 0.0 {
            0.0
        } else {
            1.0 / self.f
        }
    }

    /// First eccentricity.
    pub fn e(&self) -> f64 {
        (self.f * (2.0 - self.f)).sqrt()
    }

    pub fn is_sphere(&self) -> bool {
        self.f == 0.0
    }
}

/// Isometric helper `t` (Snyder 7-10 / 15-9).
pub(crate) fn tsfn(phi: f64, e: f64) -> f64 {
    let con = e * phi.sin();
    (std::f64::consts::FRAC_PI_4 - 0.5 * phi).tan() / ((1.0 - con) / (1.0 + con)).powf(0.5 * e)
}

/// Inverse of [`tsfn`]: latitude from `t` by fixed-point iteration (Snyder 7-9).
pub(crate) fn phi2(ts: f64, e: f64) -> f64 {
    let half_e = 0.5 * e;
    let mut phi = FRAC_PI_2 - 2.0 * ts.atan();
    for _ in 0..PHI2_MAX_ITER {
        let con = e * phi.sin();
        let dphi = FRAC_PI_2 - 2.0 * (ts * ((1.0 - con) / (1.0 + con)).powf(half_e)).atan() - phi;
        phi += dphi;
        if dphi.abs() <= PHI2_TOLERANCE {
            break;
        }
    }
    phi
}

/// Scale helper `m` (Snyder 14-15).
pub(crate) fn msfn(phi: f64, e: f64) -> f64 {
    let s = phi.sin();
    phi.cos() / (1.0 - e * e * s * s).sqrt()
}

/// Wrap a longitude difference in radians into `[-π, π]`.
pub(crate) fn adjlon(mut lon: f64) -> f64 {
    use std::f64::consts::PI;
    while lon > PI {
        lon -= 2.0 * PI;
    }
    while lon < -PI {
        lon += 2.0 * PI;
    }
    lon
}
