//! Projection dispatch and point transformers between two projections.

use crate::ellipsoid::Ellipsoid;
use crate::lambert::LambertConformal;
use crate::mercator::Mercator;
use crate::polar::PolarStereographic;

/// A map projection, or plain longitude/latitude on an ellipsoid.
///
/// Every variant converts to and from geographic longitude/latitude in degrees.
/// Datum shifts are not modelled: all ellipsoids share the WGS 84 frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    LongLat(Ellipsoid),
    Mercator(Mercator),
    PolarStereographic(PolarStereographic),
    LambertConformal(LambertConformal),
}

impl Projection {
    /// Geographic (lon, lat) degrees to projected coordinates.
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        match self {
            Projection::LongLat(_) => (lon, lat),
            Projection::Mercator(p) => p.forward(lon, lat),
            Projection::PolarStereographic(p) => p.forward(lon, lat),
            Projection::LambertConformal(p) => p.forward(lon, lat),
        }
    }

    /// Projected coordinates to geographic (lon, lat) degrees.
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        match self {
            Projection::LongLat(_) => (x, y),
            Projection::Mercator(p) => p.inverse(x, y),
            Projection::PolarStereographic(p) => p.inverse(x, y),
            Projection::LambertConformal(p) => p.inverse(x, y),
        }
    }

    pub fn is_geographic(&self) -> bool {
        matches!(self, Projection::LongLat(_))
    }

    pub fn ellipsoid(&self) -> Ellipsoid {
        match self {
            Projection::LongLat(e) => *e,
            Projection::Mercator(p) => p.ellipsoid,
            Projection::PolarStereographic(p) => p.ellipsoid,
            Projection::LambertConformal(p) => Ellipsoid::sphere(p.radius),
        }
    }

    /// Short proj name of the projection method.
    pub fn method(&self) -> &'static str {
        match self {
            Projection::LongLat(_) => "longlat",
            Projection::Mercator(_) => "merc",
            Projection::PolarStereographic(_) => "stere",
            Projection::LambertConformal(_) => "lcc",
        }
    }

    /// Unit names of the (x, y) axes.
    pub fn axis_units(&self) -> (&'static str, &'static str) {
        if self.is_geographic() {
            ("degree", "degree")
        } else {
            ("metre", "metre")
        }
    }

    /// Render as a proj string that [`crate::parse_proj_string`] accepts.
    pub fn to_proj_string(&self) -> String {
        let ellps = ellipsoid_params(&self.ellipsoid());
        match self {
            Projection::LongLat(_) => format!("+proj=longlat {}", ellps),
            Projection::Mercator(p) => format!(
                "+proj=merc +lon_0={} +k={} +x_0={} +y_0={} {}",
                p.lon0.to_degrees(),
                p.k0,
                p.false_easting,
                p.false_northing,
                ellps
            ),
            Projection::PolarStereographic(p) => format!(
                "+proj=stere +lat_0={} +lat_ts={} +lon_0={} +x_0={} +y_0={} {}",
                if p.south { -90 } else { 90 },
                p.lat_ts.to_degrees(),
                p.lon0.to_degrees(),
                p.false_easting,
                p.false_northing,
                ellps
            ),
            Projection::LambertConformal(p) => format!(
                "+proj=lcc +lat_0={} +lon_0={} +lat_1={} +lat_2={} +x_0={} +y_0={} {}",
                p.lat0.to_degrees(),
                p.lon0.to_degrees(),
                p.lat1.to_degrees(),
                p.lat2.to_degrees(),
                p.false_easting,
                p.false_northing,
                ellps
            ),
        }
    }
}

fn ellipsoid_params(e: &Ellipsoid) -> String {
    if e.is_sphere() {
        format!("+R={}", e.a)
    } else {
        format!("+a={} +rf={}", e.a, e.inverse_flattening())
    }
}

/// Converts points from one projection to another through geographic coordinates.
#[derive(Debug, Clone)]
pub struct Transformer {
    src: Projection,
    dst: Projection,
}

impl Transformer {
    pub fn new(src: Projection, dst: Projection) -> Self {
        Self { src, dst }
    }

    /// Transform a single point. Points outside a projection's domain come back
    /// as non-finite values rather than an error.
    #[inline]
    pub fn transform(&self, x: f64, y: f64) -> (f64, f64) {
        let (lon, lat) = self.src.inverse(x, y);
        self.dst.forward(lon, lat)
    }

    /// Transformer going the opposite way.
    pub fn inverse(&self) -> Transformer {
        Transformer::new(self.dst.clone(), self.src.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longlat_is_identity() {
        let p = Projection::LongLat(Ellipsoid::WGS84);
        assert_eq!(p.forward(12.5, -3.0), (12.5, -3.0));
        assert_eq!(p.inverse(12.5, -3.0), (12.5, -3.0));
        assert!(p.is_geographic());
        assert_eq!(p.axis_units(), ("degree", "degree"));
    }

    #[test]
    fn test_transformer_between_mercators() {
        let t = Transformer::new(
            Projection::Mercator(Mercator::web()),
            Projection::LongLat(Ellipsoid::WGS84),
        );
        let (lon, lat) = t.transform(10018754.171394622, 0.0);
        assert!((lon - 90.0).abs() < 1e-9);
        assert!(lat.abs() < 1e-12);

        let back = t.inverse();
        let (x, _) = back.transform(lon, lat);
        assert!((x - 10018754.171394622).abs() < 1e-6);
    }

    #[test]
    fn test_proj_string_rendering() {
        let p = Projection::Mercator(Mercator::pdc());
        let s = p.to_proj_string();
        assert!(s.starts_with("+proj=merc +lon_0=150"), "got {}", s);
    }
}
