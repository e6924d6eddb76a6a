//! Splitting geometry along the antimeridian before reprojecting it into
//! longitude/latitude.
//!
//! A polygon whose source-CRS footprint straddles ±180° would otherwise come out
//! of the transform as a shape spanning the whole globe. When the source CRS is
//! continuous across the dateline, the geometry is cut there in source space so
//! that each piece lands on one side.
//!
//! The approach only holds for CRSs that are locally smooth across the dateline
//! (e.g. Mercator centred away from 180°). The distance thresholds below are
//! empirical.

use geo::{
    BooleanOps, Coord, GeometryCollection, Intersects, LineString, MultiPoint, MultiPolygon,
    Polygon,
};
use tracing::{debug, trace};

use crate::geometry::{from_multipolygon, to_multilinestring, to_multipolygon, Geometry};

/// Distance from ±180° of the cut lines, in degrees.
pub const DATELINE_EPS: f64 = 1e-9;

/// Largest squared source-space gap between the two sides of the dateline
/// for the CRS to count as continuous there.
const MAX_SEAM_GAP_SQ: f64 = 1.0;

/// Latitude step of the densified cut lines, in degrees.
const CUT_LINE_STEP: f64 = 1.0;

/// True when the source CRS maps the two sides of the dateline at `mid_lat`
/// to nearly the same place, and both points round-trip.
///
/// `forward` maps source coordinates to lon/lat; `inverse` maps lon/lat back.
pub fn is_smooth_across_dateline<F, I>(mid_lat: f64, forward: F, inverse: I, eps: f64) -> bool
where
    F: Fn(f64, f64) -> (f64, f64),
    I: Fn(f64, f64) -> (f64, f64),
{
    let left_lon = 180.0 - eps;
    let right_lon = -180.0 + eps;

    let left = inverse(left_lon, mid_lat);
    let right = inverse(right_lon, mid_lat);

    // NaN fails the comparison as well
    if !(dist_sq(left, right) <= MAX_SEAM_GAP_SQ) {
        return false;
    }

    let tolerance = 2.0 * eps * eps;
    let round_trips =
        |src: (f64, f64), lon: f64| dist_sq(forward(src.0, src.1), (lon, mid_lat)) <= tolerance;

    round_trips(left, left_lon) && round_trips(right, right_lon)
}

/// Cut `geom` at the antimeridian in its own CRS.
///
/// Returns the geometry unchanged when it is empty, when the CRS is not smooth
/// across the dateline around the geometry's centre, or when the geometry does
/// not reach the dateline at all.
pub fn chop_along_antimeridian<F, I>(geom: &Geometry, forward: F, inverse: I) -> Geometry
where
    F: Fn(f64, f64) -> (f64, f64),
    I: Fn(f64, f64) -> (f64, f64),
{
    let Ok(bbox) = geom.envelope() else {
        return geom.clone();
    };

    let (mid_x, mid_y) = bbox.center();
    let (_, mid_lat) = forward(mid_x, mid_y);

    if !is_smooth_across_dateline(mid_lat, &forward, &inverse, DATELINE_EPS) {
        debug!(mid_lat, "CRS not smooth across dateline, skipping chop");
        return geom.clone();
    }

    let left_line = cut_line(180.0 - DATELINE_EPS, &inverse);
    if !geo::Geometry::LineString(left_line.clone()).intersects(geom.geo()) {
        trace!("Geometry does not reach the dateline");
        return geom.clone();
    }
    let right_line = cut_line(-180.0 + DATELINE_EPS, &inverse);

    let left_half = half_plane(bbox.left, bbox.bottom, bbox.top, &left_line);
    let right_half = half_plane(bbox.right, bbox.bottom, bbox.top, &right_line);
    let mask = BooleanOps::union(
        &MultiPolygon::new(vec![left_half]),
        &MultiPolygon::new(vec![right_half]),
    );

    debug!(parts = mask.0.len(), "Chopping geometry along the antimeridian");
    Geometry::new(clip(geom.geo(), &mask), geom.crs().cloned())
}

/// The meridian at `lon` from pole to pole, in source coordinates.
/// Points the source CRS cannot represent (e.g. Mercator poles) are dropped.
fn cut_line<I>(lon: f64, inverse: &I) -> LineString<f64>
where
    I: Fn(f64, f64) -> (f64, f64),
{
    let steps = (180.0 / CUT_LINE_STEP) as usize;
    (0..=steps)
        .map(|i| -90.0 + i as f64 * CUT_LINE_STEP)
        .map(|lat| inverse(lon, lat))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(x, y)| Coord { x, y })
        .collect()
}

/// Region between the vertical edge at `x` and the cut line.
///
/// The cut line stops short of the poles, so both of its ends are extended
/// vertically to the box edges; the ring never closes on a diagonal.
fn half_plane(x: f64, bottom: f64, top: f64, line: &LineString<f64>) -> Polygon<f64> {
    let (Some(first), Some(last)) = (line.0.first(), line.0.last()) else {
        return Polygon::new(LineString::new(Vec::new()), Vec::new());
    };
    let bottom = bottom.min(first.y);
    let top = top.max(last.y);

    let mut ring = vec![
        Coord { x, y: top },
        Coord { x, y: bottom },
        Coord { x: first.x, y: bottom },
    ];
    ring.extend(line.0.iter().copied());
    ring.push(Coord { x: last.x, y: top });
    ring.push(Coord { x, y: top });
    // flat inputs, or a line already reaching the box edges, would repeat a vertex
    ring.dedup();
    Polygon::new(LineString::new(ring), Vec::new())
}

fn clip(geom: &geo::Geometry<f64>, mask: &MultiPolygon<f64>) -> geo::Geometry<f64> {
    if let Some(areal) = to_multipolygon(geom) {
        return from_multipolygon(BooleanOps::intersection(&areal, mask));
    }
    if let Some(lines) = to_multilinestring(geom) {
        return geo::Geometry::MultiLineString(mask.clip(&lines, false));
    }
    match geom {
        geo::Geometry::Point(p) if mask.intersects(p) => geom.clone(),
        geo::Geometry::Point(_) => geo::Geometry::MultiPoint(MultiPoint::new(Vec::new())),
        geo::Geometry::MultiPoint(mp) => geo::Geometry::MultiPoint(MultiPoint::new(
            mp.0.iter().filter(|p| mask.intersects(*p)).copied().collect(),
        )),
        geo::Geometry::GeometryCollection(gc) => geo::Geometry::GeometryCollection(
            GeometryCollection::new_from(gc.0.iter().map(|g| clip(g, mask)).collect()),
        ),
        // areal and linear kinds are handled above
        _ => geom.clone(),
    }
}

fn dist_sq(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (a.0 - b.0, a.1 - b.1);
    dx * dx + dy * dy
}
