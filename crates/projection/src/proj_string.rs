//! Parsing of the proj `+key=value` projection syntax.
//!
//! Accepts the subset of methods this crate implements:
//! `longlat` (alias `latlong`), `merc`, `stere` (polar aspects only) and `lcc`.

use std::collections::HashMap;

use crate::ellipsoid::Ellipsoid;
use crate::error::ProjectionError;
use crate::lambert::LambertConformal;
use crate::mercator::Mercator;
use crate::polar::PolarStereographic;
use crate::transform::Projection;

/// True when `s` looks like a proj string rather than an authority code or WKT.
pub fn is_proj_string(s: &str) -> bool {
    s.trim_start().starts_with("+proj=") || s.trim_start().starts_with("proj=")
}

/// Parse a proj string into a projection.
pub fn parse_proj_string(s: &str) -> Result<Projection, ProjectionError> {
    let params = ProjParams::parse(s);
    let method = params
        .get("proj")
        .ok_or_else(|| ProjectionError::MissingParameter("proj".to_string()))?;
    let ellipsoid = params.ellipsoid()?;

    let projection = match method {
        "longlat" | "latlong" | "lonlat" | "latlon" => Projection::LongLat(ellipsoid),
        "merc" => {
            let lon0 = params.number_or("lon_0", 0.0)?;
            let fe = params.number_or("x_0", 0.0)?;
            let fn_ = params.number_or("y_0", 0.0)?;
            let merc = match params.number("lat_ts")? {
                Some(lat_ts) => {
                    let m = Mercator::with_lat_ts(ellipsoid, lon0, lat_ts);
                    Mercator::new(ellipsoid, lon0, m.k0, fe, fn_)
                }
                None => {
                    let k0 = params.number_or("k", params.number_or("k_0", 1.0)?)?;
                    Mercator::new(ellipsoid, lon0, k0, fe, fn_)
                }
            };
            Projection::Mercator(merc)
        }
        "stere" => {
            let lat0 = params.number_or("lat_0", 90.0)?;
            if (lat0.abs() - 90.0).abs() > 1e-10 {
                return Err(ProjectionError::UnsupportedProjection(
                    "oblique stereographic (only polar aspects are supported)".to_string(),
                ));
            }
            let south = lat0 < 0.0;
            let lat_ts = params.number_or("lat_ts", lat0)?;
            Projection::PolarStereographic(PolarStereographic::new(
                ellipsoid,
                south,
                lat_ts,
                params.number_or("lon_0", 0.0)?,
                params.number_or("x_0", 0.0)?,
                params.number_or("y_0", 0.0)?,
            ))
        }
        "lcc" => {
            let lat1 = params
                .number("lat_1")?
                .ok_or_else(|| ProjectionError::MissingParameter("lat_1".to_string()))?;
            let lat2 = params.number_or("lat_2", lat1)?;
            Projection::LambertConformal(LambertConformal::new(
                params.number_or("lat_0", lat1)?,
                params.number_or("lon_0", 0.0)?,
                lat1,
                lat2,
                ellipsoid.a,
                params.number_or("x_0", 0.0)?,
                params.number_or("y_0", 0.0)?,
            ))
        }
        other => return Err(ProjectionError::UnsupportedProjection(other.to_string())),
    };

    Ok(projection)
}

/// Key/value view over a proj string; flags without `=` map to an empty value.
struct ProjParams<'a> {
    values: HashMap<&'a str, &'a str>,
}

impl<'a> ProjParams<'a> {
    fn parse(s: &'a str) -> Self {
        let values = s
            .split_whitespace()
            .map(|token| token.trim_start_matches('+'))
            .filter(|token| !token.is_empty())
            .map(|token| token.split_once('=').unwrap_or((token, "")))
            .collect();
        Self { values }
    }

    fn get(&self, key: &str) -> Option<&'a str> {
        self.values.get(key).copied()
    }

    fn number(&self, key: &str) -> Result<Option<f64>, ProjectionError> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<f64>()
                .map(Some)
                .map_err(|_| ProjectionError::InvalidParameter {
                    param: key.to_string(),
                    value: raw.to_string(),
                }),
        }
    }

    fn number_or(&self, key: &str, default: f64) -> Result<f64, ProjectionError> {
        Ok(self.number(key)?.unwrap_or(default))
    }

    /// Ellipsoid from `+R`, `+a`/`+rf`/`+b`, `+ellps` or `+datum`; WGS 84 when absent.
    fn ellipsoid(&self) -> Result<Ellipsoid, ProjectionError> {
        if let Some(radius) = self.number("R")? {
            return Ok(Ellipsoid::sphere(radius));
        }
        if let Some(a) = self.number("a")? {
            if let Some(rf) = self.number("rf")? {
                let f = if rf == 0.0 { 0.0 } else { 1.0 / rf };
                return Ok(Ellipsoid { a, f });
            }
            if let Some(b) = self.number("b")? {
                return Ok(Ellipsoid { a, f: (a - b) / a });
            }
            return Ok(Ellipsoid::sphere(a));
        }
        if let Some(name) = self.get("ellps").or_else(|| self.get("datum")) {
            return Ellipsoid::from_name(name)
                .ok_or_else(|| ProjectionError::UnknownEllipsoid(name.to_string()));
        }
        Ok(Ellipsoid::WGS84)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_longlat() {
        let p = parse_proj_string("+proj=longlat +datum=WGS84 +no_defs").unwrap();
        assert_eq!(p, Projection::LongLat(Ellipsoid::WGS84));
    }

    #[test]
    fn test_parse_merc_with_central_meridian() {
        let p = parse_proj_string("+proj=merc +lon_0=150 +ellps=WGS84").unwrap();
        assert_eq!(p, Projection::Mercator(Mercator::pdc()));
    }

    #[test]
    fn test_parse_south_polar_stereographic() {
        let p = parse_proj_string("+proj=stere +lat_0=-90 +lat_ts=-71 +lon_0=0 +datum=WGS84")
            .unwrap();
        assert_eq!(
            p,
            Projection::PolarStereographic(PolarStereographic::antarctic())
        );
    }

    #[test]
    fn test_parse_lcc_sphere() {
        let p = parse_proj_string("+proj=lcc +lat_1=38.5 +lat_0=38.5 +lon_0=-97.5 +R=6371229")
            .unwrap();
        assert_eq!(p, Projection::LambertConformal(LambertConformal::conus()));
    }

    #[test]
    fn test_rejects_unknown_method() {
        assert_eq!(
            parse_proj_string("+proj=tmerc +lon_0=3"),
            Err(ProjectionError::UnsupportedProjection("tmerc".to_string()))
        );
    }

    #[test]
    fn test_rejects_bad_number() {
        assert!(matches!(
            parse_proj_string("+proj=merc +lon_0=east"),
            Err(ProjectionError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_rejects_oblique_stereographic() {
        assert!(parse_proj_string("+proj=stere +lat_0=52").is_err());
    }

    #[test]
    fn test_detects_proj_strings() {
        assert!(is_proj_string("+proj=merc"));
        assert!(!is_proj_string("EPSG:4326"));
    }

    #[test]
    fn test_rendered_string_parses_back() {
        let original = Projection::PolarStereographic(PolarStereographic::nsidc_north());
        let parsed = parse_proj_string(&original.to_proj_string()).unwrap();
        let (x, y) = parsed.forward(-30.0, 80.0);
        let (x0, y0) = original.forward(-30.0, 80.0);
        assert!((x - x0).abs() < 1e-6 && (y - y0).abs() < 1e-6);
    }
}
