//! Coordinate Reference System service.
//!
//! A [`Crs`] is resolved once per canonical identifier string and memoized in a
//! process-wide, append-only [`CrsCache`]. Identifiers may be authority codes
//! (`EPSG:3857`), proj strings (`+proj=merc +lon_0=150`) or WKT carrying an
//! EPSG root identifier.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;
use projection::{
    is_proj_string, lookup_epsg, parse_proj_string, Ellipsoid, Projection, Transformer,
};
use tracing::{debug, trace};

use crate::error::{GeoError, GeoResult};

// ============================================================================
// CRS sources
// ============================================================================

/// Anything that can identify a CRS.
///
/// Resolution prefers the identifier string, then an EPSG code, then WKT.
pub trait CrsSource {
    fn as_str(&self) -> Option<&str> {
        None
    }

    fn to_epsg(&self) -> Option<u32> {
        None
    }

    fn to_wkt(&self) -> Option<String> {
        None
    }
}

impl CrsSource for str {
    fn as_str(&self) -> Option<&str> {
        Some(self)
    }
}

impl CrsSource for String {
    fn as_str(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl CrsSource for Crs {
    fn as_str(&self) -> Option<&str> {
        Some(self.crs_str())
    }

    fn to_epsg(&self) -> Option<u32> {
        self.epsg()
    }

    fn to_wkt(&self) -> Option<String> {
        Crs::to_wkt(self)
    }
}

// ============================================================================
// Cache
// ============================================================================

/// Resolved definition shared by every [`Crs`] with the same identifier.
#[derive(Debug)]
struct CrsDef {
    crs_str: String,
    epsg: Option<u32>,
    name: String,
    projection: Projection,
}

/// Memoizes CRS resolution by canonical identifier string.
///
/// Entries are never evicted or replaced.
pub struct CrsCache {
    entries: RwLock<HashMap<String, Arc<CrsDef>>>,
}

static CRS_CACHE: Lazy<CrsCache> = Lazy::new(CrsCache::new);

impl CrsCache {
    fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide cache used by [`Crs::new`].
    pub fn global() -> &'static CrsCache {
        &CRS_CACHE
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    fn get_or_resolve(&self, key: &str) -> GeoResult<Arc<CrsDef>> {
        // A poisoned lock still holds complete entries: inserts are atomic
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(def) = entries.get(key) {
                trace!(crs = key, "CRS cache hit");
                return Ok(Arc::clone(def));
            }
        }

        let def = Arc::new(resolve(key)?);

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let def = entries.entry(key.to_string()).or_insert(def);
        debug!(crs = key, epsg = ?def.epsg, "Resolved CRS");
        Ok(Arc::clone(def))
    }
}

// ============================================================================
// Crs
// ============================================================================

/// A coordinate reference system.
///
/// Cheap to clone. Two values are equal when both carry EPSG codes and those
/// match, or otherwise when their projection definitions are identical.
#[derive(Clone)]
pub struct Crs {
    def: Arc<CrsDef>,
}

impl Crs {
    /// Resolve a CRS from a string, another `Crs`, or anything else that
    /// exposes an identifier.
    pub fn new<S: CrsSource + ?Sized>(source: &S) -> GeoResult<Crs> {
        let key = if let Some(s) = source.as_str() {
            s.to_string()
        } else if let Some(code) = source.to_epsg() {
            format!("EPSG:{}", code)
        } else if let Some(wkt) = source.to_wkt() {
            wkt
        } else {
            return Err(GeoError::InvalidCrs(
                "source exposes no identifier, EPSG code or WKT".to_string(),
            ));
        };

        let def = CrsCache::global().get_or_resolve(&key)?;
        Ok(Crs { def })
    }

    pub fn from_epsg(code: u32) -> GeoResult<Crs> {
        Crs::new(&format!("EPSG:{}", code))
    }

    pub fn from_wkt(wkt: &str) -> GeoResult<Crs> {
        if !looks_like_wkt(wkt) {
            return Err(GeoError::InvalidCrs(format!("not WKT: {}", wkt)));
        }
        Crs::new(wkt)
    }

    /// WGS 84 longitude/latitude.
    pub fn wgs84() -> GeoResult<Crs> {
        Crs::from_epsg(4326)
    }

    /// Canonical identifier this CRS was created from.
    pub fn crs_str(&self) -> &str {
        &self.def.crs_str
    }

    pub fn epsg(&self) -> Option<u32> {
        self.def.epsg
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn projection(&self) -> &Projection {
        &self.def.projection
    }

    /// WKT1 rendering, available for EPSG-registered systems only.
    pub fn to_wkt(&self) -> Option<String> {
        let code = self.def.epsg?;
        Some(render_wkt(code, &self.def.name, &self.def.projection))
    }

    pub fn to_proj_string(&self) -> String {
        self.def.projection.to_proj_string()
    }

    fn ellipsoid(&self) -> Ellipsoid {
        self.def.projection.ellipsoid()
    }

    pub fn semi_major_axis(&self) -> f64 {
        self.ellipsoid().a
    }

    pub fn semi_minor_axis(&self) -> f64 {
        self.ellipsoid().b()
    }

    pub fn inverse_flattening(&self) -> f64 {
        self.ellipsoid().inverse_flattening()
    }

    pub fn is_geographic(&self) -> bool {
        self.def.projection.is_geographic()
    }

    pub fn is_projected(&self) -> bool {
        !self.is_geographic()
    }

    /// Dimension names in (y, x) order.
    pub fn dimensions(&self) -> (&'static str, &'static str) {
        if self.is_geographic() {
            ("latitude", "longitude")
        } else {
            ("y", "x")
        }
    }

    /// Units of the dimensions in (y, x) order.
    pub fn units(&self) -> (&'static str, &'static str) {
        if self.is_geographic() {
            ("degrees_north", "degrees_east")
        } else {
            let (x_units, y_units) = self.def.projection.axis_units();
            (y_units, x_units)
        }
    }

    /// Point transformer from this CRS into `other`.
    pub fn transformer_to(&self, other: &Crs) -> Transformer {
        Transformer::new(self.def.projection.clone(), other.def.projection.clone())
    }
}

impl PartialEq for Crs {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.def, &other.def) {
            return true;
        }
        match (self.def.epsg, other.def.epsg) {
            (Some(a), Some(b)) => a == b,
            _ => self.def.projection == other.def.projection,
        }
    }
}

impl PartialEq<str> for Crs {
    fn eq(&self, other: &str) -> bool {
        Crs::new(other).map(|crs| *self == crs).unwrap_or(false)
    }
}

impl PartialEq<&str> for Crs {
    fn eq(&self, other: &&str) -> bool {
        *self == **other
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.def.crs_str)
    }
}

impl fmt::Debug for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Crs({:?})", self.def.crs_str)
    }
}

// ============================================================================
// Resolution
// ============================================================================

fn resolve(spec: &str) -> GeoResult<CrsDef> {
    let trimmed = spec.trim();

    if let Some(code) = parse_authority_code(trimmed) {
        let def = lookup_epsg(code)?;
        return Ok(CrsDef {
            crs_str: spec.to_string(),
            epsg: Some(def.code),
            name: def.name.to_string(),
            projection: def.projection,
        });
    }

    if is_proj_string(trimmed) {
        let projection = parse_proj_string(trimmed)?;
        return Ok(CrsDef {
            crs_str: spec.to_string(),
            epsg: None,
            name: format!("unknown ({})", projection.method()),
            projection,
        });
    }

    if looks_like_wkt(trimmed) {
        let code = wkt_epsg_code(trimmed).ok_or_else(|| {
            GeoError::InvalidCrs("WKT carries no EPSG root identifier".to_string())
        })?;
        let def = lookup_epsg(code)?;
        return Ok(CrsDef {
            crs_str: spec.to_string(),
            epsg: Some(def.code),
            name: def.name.to_string(),
            projection: def.projection,
        });
    }

    Err(GeoError::InvalidCrs(spec.to_string()))
}

/// `EPSG:n` (any case), `CRS:84` and `OGC:CRS84`.
fn parse_authority_code(s: &str) -> Option<u32> {
    let upper = s.to_ascii_uppercase();
    if upper == "CRS:84" || upper == "OGC:CRS84" {
        return Some(4326);
    }
    upper.strip_prefix("EPSG:")?.trim().parse().ok()
}

fn looks_like_wkt(s: &str) -> bool {
    const ROOTS: &[&str] = &[
        "GEOGCS[", "PROJCS[", "GEOCCS[", "GEOGCRS[", "PROJCRS[", "GEODCRS[", "BASEGEOGCRS[",
    ];
    let upper = s.trim_start().to_ascii_uppercase();
    ROOTS.iter().any(|root| upper.starts_with(root))
}

/// Code from the last `AUTHORITY["EPSG","n"]` or `ID["EPSG",n]` in the text,
/// which is the root object's identifier in both WKT dialects.
fn wkt_epsg_code(wkt: &str) -> Option<u32> {
    let upper = wkt.to_ascii_uppercase();
    let start = ["AUTHORITY[", "ID["]
        .iter()
        .filter_map(|tag| upper.rfind(tag).map(|pos| pos + tag.len()))
        .max()?;
    let body = &upper[start..];
    let body = &body[..body.find(']')?];

    let mut parts = body.split(',').map(|p| p.trim().trim_matches('"'));
    if parts.next()? != "EPSG" {
        return None;
    }
    parts.next()?.parse().ok()
}

fn render_wkt(code: u32, name: &str, projection: &Projection) -> String {
    let ellipsoid = projection.ellipsoid();
    let spheroid = format!(
        "SPHEROID[\"{}\",{},{}]",
        if ellipsoid == Ellipsoid::GRS80 { "GRS 1980" } else { "WGS 84" },
        ellipsoid.a,
        ellipsoid.inverse_flattening()
    );

    if projection.is_geographic() {
        return format!(
            "GEOGCS[\"{}\",DATUM[\"{}\",{}],PRIMEM[\"Greenwich\",0],\
             UNIT[\"degree\",0.0174532925199433],AUTHORITY[\"EPSG\",\"{}\"]]",
            name, name, spheroid, code
        );
    }

    format!(
        "PROJCS[\"{}\",GEOGCS[\"WGS 84\",DATUM[\"WGS_1984\",{}],PRIMEM[\"Greenwich\",0],\
         UNIT[\"degree\",0.0174532925199433],AUTHORITY[\"EPSG\",\"4326\"]],\
         PROJECTION[\"{}\"],UNIT[\"metre\",1],EXTENSION[\"PROJ4\",\"{}\"],\
         AUTHORITY[\"EPSG\",\"{}\"]]",
        name,
        spheroid,
        projection.method(),
        projection.to_proj_string(),
        code
    )
}
