//! CRS-aware vector geometry backed by the `geo` crate.
//!
//! [`Geometry`] pairs a `geo::Geometry<f64>` with an optional [`Crs`]. Binary
//! predicates and boolean operations refuse operands in different CRSs.

use geo::coordinate_position::CoordPos;
use geo::dimensions::Dimensions;
use geo::{
    Area, BooleanOps, BoundingRect, Coord, GeometryCollection, HasDimensions, LineString,
    MapCoords, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon, Relate,
};
use serde_json::{json, Value};
use tracing::debug;

use crate::affine::Affine;
use crate::antimeridian::chop_along_antimeridian;
use crate::bbox::BoundingBox;
use crate::config::ReprojectOptions;
use crate::crs::Crs;
use crate::error::{GeoError, GeoResult};

/// A 2D geometry with an optional coordinate reference system.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    geom: geo::Geometry<f64>,
    crs: Option<Crs>,
}

impl Geometry {
    pub fn new(geom: impl Into<geo::Geometry<f64>>, crs: Option<Crs>) -> Self {
        Self {
            geom: geom.into(),
            crs,
        }
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    pub fn point(x: f64, y: f64, crs: Option<Crs>) -> Self {
        Self::new(Point::new(x, y), crs)
    }

    pub fn multipoint(points: &[(f64, f64)], crs: Option<Crs>) -> Self {
        let points: Vec<Point<f64>> = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
        Self::new(MultiPoint::new(points), crs)
    }

    pub fn line(coords: &[(f64, f64)], crs: Option<Crs>) -> Self {
        Self::new(line_string(coords), crs)
    }

    pub fn multiline(lines: &[Vec<(f64, f64)>], crs: Option<Crs>) -> Self {
        let lines = lines.iter().map(|l| line_string(l)).collect();
        Self::new(MultiLineString::new(lines), crs)
    }

    /// Polygon from an exterior ring and optional holes. Rings are closed if needed.
    pub fn polygon(exterior: &[(f64, f64)], interiors: &[Vec<(f64, f64)>], crs: Option<Crs>) -> Self {
        Self::new(polygon(exterior, interiors), crs)
    }

    /// Multipolygon from a list of polygons, each given as `[exterior, holes...]`.
    pub fn multipolygon(polygons: &[Vec<Vec<(f64, f64)>>], crs: Option<Crs>) -> Self {
        let polygons = polygons
            .iter()
            .filter_map(|rings| {
                let (exterior, interiors) = rings.split_first()?;
                Some(polygon(exterior, interiors))
            })
            .collect();
        Self::new(MultiPolygon::new(polygons), crs)
    }

    /// Rectangle covering `bbox`.
    pub fn bbox_polygon(bbox: &BoundingBox, crs: Option<Crs>) -> Self {
        Self::polygon(
            &[
                (bbox.left, bbox.top),
                (bbox.right, bbox.top),
                (bbox.right, bbox.bottom),
                (bbox.left, bbox.bottom),
                (bbox.left, bbox.top),
            ],
            &[],
            crs,
        )
    }

    /// Footprint of a `width` x `height` pixel grid placed by `transform`.
    pub fn polygon_from_transform(
        width: f64,
        height: f64,
        transform: &Affine,
        crs: Option<Crs>,
    ) -> Self {
        let corners: Vec<(f64, f64)> = [
            (0.0, 0.0),
            (0.0, height),
            (width, height),
            (width, 0.0),
            (0.0, 0.0),
        ]
        .iter()
        .map(|&(col, row)| transform.apply(col, row))
        .collect();
        Self::polygon(&corners, &[], crs)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn geo(&self) -> &geo::Geometry<f64> {
        &self.geom
    }

    pub fn into_geo(self) -> geo::Geometry<f64> {
        self.geom
    }

    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    pub fn with_crs(mut self, crs: Option<Crs>) -> Self {
        self.crs = crs;
        self
    }

    /// GeoJSON type name.
    pub fn geom_type(&self) -> &'static str {
        geom_type(&self.geom)
    }

    pub fn is_empty(&self) -> bool {
        self.geom.is_empty()
    }

    pub fn area(&self) -> f64 {
        self.geom.unsigned_area()
    }

    /// Axis-aligned bounding box.
    pub fn envelope(&self) -> GeoResult<BoundingBox> {
        let rect = self.geom.bounding_rect().ok_or_else(|| {
            GeoError::InvalidGeometry("empty geometry has no envelope".to_string())
        })?;
        Ok(BoundingBox::new(
            rect.min().x,
            rect.min().y,
            rect.max().x,
            rect.max().y,
        ))
    }

    // ========================================================================
    // Predicates
    // ========================================================================

    pub fn contains(&self, other: &Geometry) -> GeoResult<bool> {
        self.check_crs(other)?;
        Ok(self.geom.relate(&other.geom).is_contains())
    }

    pub fn within(&self, other: &Geometry) -> GeoResult<bool> {
        self.check_crs(other)?;
        Ok(self.geom.relate(&other.geom).is_within())
    }

    pub fn intersects(&self, other: &Geometry) -> GeoResult<bool> {
        self.check_crs(other)?;
        Ok(self.geom.relate(&other.geom).is_intersects())
    }

    pub fn disjoint(&self, other: &Geometry) -> GeoResult<bool> {
        self.check_crs(other)?;
        Ok(self.geom.relate(&other.geom).is_disjoint())
    }

    /// Boundaries meet but interiors do not.
    pub fn touches(&self, other: &Geometry) -> GeoResult<bool> {
        self.check_crs(other)?;
        let matrix = self.geom.relate(&other.geom);
        Ok(matrix.is_intersects()
            && matrix.get(CoordPos::Inside, CoordPos::Inside) == Dimensions::Empty)
    }

    // ========================================================================
    // Boolean operations (areal geometries only)
    // ========================================================================

    pub fn union(&self, other: &Geometry) -> GeoResult<Geometry> {
        let (a, b) = self.areal_operands(other, "union")?;
        Ok(self.derive(from_multipolygon(BooleanOps::union(&a, &b))))
    }

    pub fn intersection(&self, other: &Geometry) -> GeoResult<Geometry> {
        let (a, b) = self.areal_operands(other, "intersection")?;
        Ok(self.derive(from_multipolygon(BooleanOps::intersection(&a, &b))))
    }

    pub fn difference(&self, other: &Geometry) -> GeoResult<Geometry> {
        let (a, b) = self.areal_operands(other, "difference")?;
        Ok(self.derive(from_multipolygon(BooleanOps::difference(&a, &b))))
    }

    pub fn symmetric_difference(&self, other: &Geometry) -> GeoResult<Geometry> {
        let (a, b) = self.areal_operands(other, "symmetric difference")?;
        Ok(self.derive(from_multipolygon(BooleanOps::xor(&a, &b))))
    }

    fn areal_operands(
        &self,
        other: &Geometry,
        op: &str,
    ) -> GeoResult<(MultiPolygon<f64>, MultiPolygon<f64>)> {
        self.check_crs(other)?;
        match (to_multipolygon(&self.geom), to_multipolygon(&other.geom)) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(GeoError::Unsupported(format!(
                "{} of {} and {}",
                op,
                self.geom_type(),
                other.geom_type()
            ))),
        }
    }

    // ========================================================================
    // Coordinate operations
    // ========================================================================

    /// Insert vertices so that no edge is longer than `resolution`.
    ///
    /// Edges already shorter are left alone; a non-positive or non-finite
    /// resolution returns the geometry unchanged.
    pub fn segmented(&self, resolution: f64) -> Geometry {
        if !(resolution.is_finite() && resolution > 0.0) {
            return self.clone();
        }
        self.derive(segment_geometry(&self.geom, resolution))
    }

    /// Apply `f` to every vertex. The CRS is carried over unchanged.
    pub fn transform_points<F>(&self, f: F) -> Geometry
    where
        F: Fn(f64, f64) -> (f64, f64),
    {
        let f = &f;
        self.derive(self.geom.map_coords(|c| {
            let (x, y) = f(c.x, c.y);
            Coord { x, y }
        }))
    }

    /// Reproject into `crs`, segmenting edges first so that curved
    /// projections of straight source edges are followed.
    pub fn to_crs(&self, crs: &Crs, options: &ReprojectOptions) -> GeoResult<Geometry> {
        let source = self
            .crs
            .as_ref()
            .ok_or_else(|| GeoError::InvalidCrs("geometry has no CRS".to_string()))?;
        if source == crs {
            return Ok(self.clone());
        }

        let resolution = options.resolution_for(source);
        let transformer = source.transformer_to(crs);
        debug!(from = %source, to = %crs, resolution, "Reprojecting geometry");

        let chopped;
        let geom = if options.wrap_dateline && crs.is_geographic() {
            let inverse = transformer.inverse();
            chopped = chop_along_antimeridian(
                self,
                |x, y| transformer.transform(x, y),
                |x, y| inverse.transform(x, y),
            );
            &chopped
        } else {
            self
        };

        Ok(geom
            .segmented(resolution)
            .transform_points(|x, y| transformer.transform(x, y))
            .with_crs(Some(crs.clone())))
    }

    // ========================================================================
    // GeoJSON-like I/O
    // ========================================================================

    /// Read a `{type, coordinates}` object. A third coordinate is dropped;
    /// `Feature` objects are unwrapped to their geometry.
    pub fn from_geojson(value: &Value, crs: Option<Crs>) -> GeoResult<Geometry> {
        Ok(Self::new(parse_geojson(value)?, crs))
    }

    pub fn to_geojson(&self) -> Value {
        render_geojson(&self.geom)
    }

    fn derive(&self, geom: geo::Geometry<f64>) -> Geometry {
        Geometry {
            geom,
            crs: self.crs.clone(),
        }
    }

    fn check_crs(&self, other: &Geometry) -> GeoResult<()> {
        if self.crs != other.crs {
            return Err(GeoError::crs_mismatch(
                crs_label(self.crs.as_ref()),
                crs_label(other.crs.as_ref()),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Multi-geometry helpers
// ============================================================================

/// Union of all geometries, or `None` for an empty input.
pub fn unary_union<'a, I>(geoms: I) -> GeoResult<Option<Geometry>>
where
    I: IntoIterator<Item = &'a Geometry>,
{
    geoms.into_iter().try_fold(None, |acc: Option<Geometry>, g| match acc {
        None => Ok(Some(g.clone())),
        Some(acc) => acc.union(g).map(Some),
    })
}

/// Intersection of all geometries, or `None` for an empty input.
pub fn unary_intersection<'a, I>(geoms: I) -> GeoResult<Option<Geometry>>
where
    I: IntoIterator<Item = &'a Geometry>,
{
    geoms.into_iter().try_fold(None, |acc: Option<Geometry>, g| match acc {
        None => Ok(Some(g.clone())),
        Some(acc) => acc.intersection(g).map(Some),
    })
}

/// Overlap beyond a shared boundary: intersects and does not merely touch.
pub fn intersects(a: &Geometry, b: &Geometry) -> GeoResult<bool> {
    Ok(a.intersects(b)? && !a.touches(b)?)
}

fn crs_label(crs: Option<&Crs>) -> String {
    crs.map(|c| c.to_string()).unwrap_or_else(|| "None".to_string())
}

// ============================================================================
// geo conversions
// ============================================================================

fn line_string(coords: &[(f64, f64)]) -> LineString<f64> {
    LineString::from(coords.to_vec())
}

fn polygon(exterior: &[(f64, f64)], interiors: &[Vec<(f64, f64)>]) -> Polygon<f64> {
    Polygon::new(
        line_string(exterior),
        interiors.iter().map(|r| line_string(r)).collect(),
    )
}

pub(crate) fn geom_type(geom: &geo::Geometry<f64>) -> &'static str {
    match geom {
        geo::Geometry::Point(_) => "Point",
        geo::Geometry::MultiPoint(_) => "MultiPoint",
        geo::Geometry::Line(_) | geo::Geometry::LineString(_) => "LineString",
        geo::Geometry::MultiLineString(_) => "MultiLineString",
        geo::Geometry::Polygon(_) | geo::Geometry::Rect(_) | geo::Geometry::Triangle(_) => {
            "Polygon"
        }
        geo::Geometry::MultiPolygon(_) => "MultiPolygon",
        geo::Geometry::GeometryCollection(_) => "GeometryCollection",
    }
}

/// Areal geometries as a multipolygon; `None` for anything else.
pub(crate) fn to_multipolygon(geom: &geo::Geometry<f64>) -> Option<MultiPolygon<f64>> {
    match geom {
        geo::Geometry::Polygon(p) => Some(MultiPolygon::new(vec![p.clone()])),
        geo::Geometry::MultiPolygon(mp) => Some(mp.clone()),
        geo::Geometry::Rect(r) => Some(MultiPolygon::new(vec![r.to_polygon()])),
        geo::Geometry::Triangle(t) => Some(MultiPolygon::new(vec![t.to_polygon()])),
        _ => None,
    }
}

/// Linear geometries as a multilinestring; `None` for anything else.
pub(crate) fn to_multilinestring(geom: &geo::Geometry<f64>) -> Option<MultiLineString<f64>> {
    match geom {
        geo::Geometry::Line(l) => Some(MultiLineString::new(vec![LineString::from(vec![
            l.start, l.end,
        ])])),
        geo::Geometry::LineString(ls) => Some(MultiLineString::new(vec![ls.clone()])),
        geo::Geometry::MultiLineString(mls) => Some(mls.clone()),
        _ => None,
    }
}

/// A single polygon when there is exactly one part.
pub(crate) fn from_multipolygon(mut mp: MultiPolygon<f64>) -> geo::Geometry<f64> {
    if mp.0.len() == 1 {
        if let Some(p) = mp.0.pop() {
            return geo::Geometry::Polygon(p);
        }
    }
    geo::Geometry::MultiPolygon(mp)
}

// ============================================================================
// Segmentation
// ============================================================================

fn segment_geometry(geom: &geo::Geometry<f64>, resolution: f64) -> geo::Geometry<f64> {
    let seg = |ls: &LineString<f64>| LineString::new(densify(&ls.0, resolution));
    let seg_poly = |p: &Polygon<f64>| {
        Polygon::new(seg(p.exterior()), p.interiors().iter().map(seg).collect())
    };

    match geom {
        geo::Geometry::Point(_) | geo::Geometry::MultiPoint(_) => geom.clone(),
        geo::Geometry::Line(l) => {
            geo::Geometry::LineString(seg(&LineString::from(vec![l.start, l.end])))
        }
        geo::Geometry::LineString(ls) => geo::Geometry::LineString(seg(ls)),
        geo::Geometry::MultiLineString(mls) => {
            geo::Geometry::MultiLineString(MultiLineString::new(mls.0.iter().map(seg).collect()))
        }
        geo::Geometry::Polygon(p) => geo::Geometry::Polygon(seg_poly(p)),
        geo::Geometry::Rect(r) => geo::Geometry::Polygon(seg_poly(&r.to_polygon())),
        geo::Geometry::Triangle(t) => geo::Geometry::Polygon(seg_poly(&t.to_polygon())),
        geo::Geometry::MultiPolygon(mp) => {
            geo::Geometry::MultiPolygon(MultiPolygon::new(mp.0.iter().map(seg_poly).collect()))
        }
        geo::Geometry::GeometryCollection(gc) => {
            geo::Geometry::GeometryCollection(GeometryCollection::new_from(
                gc.0.iter()
                    .map(|g| segment_geometry(g, resolution))
                    .collect(),
            ))
        }
    }
}

/// Step `resolution` along each segment, keeping the original vertices.
fn densify(coords: &[Coord<f64>], resolution: f64) -> Vec<Coord<f64>> {
    let Some(last) = coords.last() else {
        return Vec::new();
    };

    let mut out = Vec::with_capacity(coords.len());
    for pair in coords.windows(2) {
        let (p1, p2) = (pair[0], pair[1]);
        out.push(p1);

        let (dx, dy) = (p2.x - p1.x, p2.y - p1.y);
        let length = dx.hypot(dy);
        if !length.is_finite() {
            continue;
        }

        let mut step = 1.0;
        while step * resolution < length {
            let t = step * resolution / length;
            out.push(Coord {
                x: p1.x + dx * t,
                y: p1.y + dy * t,
            });
            step += 1.0;
        }
    }
    out.push(*last);
    out
}

// ============================================================================
// GeoJSON
// ============================================================================

fn parse_geojson(value: &Value) -> GeoResult<geo::Geometry<f64>> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| GeoError::InvalidGeometry("missing \"type\"".to_string()))?;

    match kind {
        "Feature" => {
            let geometry = value
                .get("geometry")
                .ok_or_else(|| GeoError::InvalidGeometry("feature has no geometry".to_string()))?;
            return parse_geojson(geometry);
        }
        "GeometryCollection" => {
            let members = value
                .get("geometries")
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    GeoError::InvalidGeometry("collection has no \"geometries\"".to_string())
                })?;
            let geoms = members
                .iter()
                .map(parse_geojson)
                .collect::<GeoResult<Vec<_>>>()?;
            return Ok(geo::Geometry::GeometryCollection(
                GeometryCollection::new_from(geoms),
            ));
        }
        _ => {}
    }

    let coords = value
        .get("coordinates")
        .ok_or_else(|| GeoError::InvalidGeometry(format!("{} has no \"coordinates\"", kind)))?;

    let geom = match kind {
        "Point" => geo::Geometry::Point(Point::from(parse_position(coords)?)),
        "MultiPoint" => geo::Geometry::MultiPoint(MultiPoint::new(
            parse_positions(coords)?.into_iter().map(Point::from).collect(),
        )),
        "LineString" => geo::Geometry::LineString(LineString::new(parse_positions(coords)?)),
        "MultiLineString" => geo::Geometry::MultiLineString(MultiLineString::new(
            as_array(coords)?
                .iter()
                .map(|l| parse_positions(l).map(LineString::new))
                .collect::<GeoResult<_>>()?,
        )),
        "Polygon" => geo::Geometry::Polygon(parse_polygon(coords)?),
        "MultiPolygon" => geo::Geometry::MultiPolygon(MultiPolygon::new(
            as_array(coords)?
                .iter()
                .map(parse_polygon)
                .collect::<GeoResult<_>>()?,
        )),
        other => {
            return Err(GeoError::InvalidGeometry(format!(
                "unknown geometry type {}",
                other
            )))
        }
    };
    Ok(geom)
}

fn as_array(value: &Value) -> GeoResult<&Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| GeoError::InvalidGeometry(format!("expected an array, got {}", value)))
}

fn parse_position(value: &Value) -> GeoResult<Coord<f64>> {
    let items = as_array(value)?;
    let number = |i: usize| {
        items
            .get(i)
            .and_then(Value::as_f64)
            .ok_or_else(|| GeoError::InvalidGeometry(format!("bad position {}", value)))
    };
    Ok(Coord {
        x: number(0)?,
        y: number(1)?,
    })
}

fn parse_positions(value: &Value) -> GeoResult<Vec<Coord<f64>>> {
    as_array(value)?.iter().map(parse_position).collect()
}

fn parse_polygon(value: &Value) -> GeoResult<Polygon<f64>> {
    let mut rings = as_array(value)?
        .iter()
        .map(|r| parse_positions(r).map(LineString::new));
    let exterior = match rings.next() {
        Some(ring) => ring?,
        None => LineString::new(Vec::new()),
    };
    let interiors = rings.collect::<GeoResult<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn position(c: &Coord<f64>) -> Value {
    json!([c.x, c.y])
}

fn ring(ls: &LineString<f64>) -> Value {
    Value::Array(ls.0.iter().map(position).collect())
}

fn polygon_rings(p: &Polygon<f64>) -> Value {
    let mut rings = vec![ring(p.exterior())];
    rings.extend(p.interiors().iter().map(ring));
    Value::Array(rings)
}

fn render_geojson(geom: &geo::Geometry<f64>) -> Value {
    match geom {
        geo::Geometry::Point(p) => json!({"type": "Point", "coordinates": position(&p.0)}),
        geo::Geometry::MultiPoint(mp) => json!({
            "type": "MultiPoint",
            "coordinates": mp.0.iter().map(|p| position(&p.0)).collect::<Vec<_>>(),
        }),
        geo::Geometry::Line(l) => json!({
            "type": "LineString",
            "coordinates": [position(&l.start), position(&l.end)],
        }),
        geo::Geometry::LineString(ls) => json!({"type": "LineString", "coordinates": ring(ls)}),
        geo::Geometry::MultiLineString(mls) => json!({
            "type": "MultiLineString",
            "coordinates": mls.0.iter().map(ring).collect::<Vec<_>>(),
        }),
        geo::Geometry::Polygon(p) => json!({"type": "Polygon", "coordinates": polygon_rings(p)}),
        geo::Geometry::Rect(r) => {
            json!({"type": "Polygon", "coordinates": polygon_rings(&r.to_polygon())})
        }
        geo::Geometry::Triangle(t) => {
            json!({"type": "Polygon", "coordinates": polygon_rings(&t.to_polygon())})
        }
        geo::Geometry::MultiPolygon(mp) => json!({
            "type": "MultiPolygon",
            "coordinates": mp.0.iter().map(polygon_rings).collect::<Vec<_>>(),
        }),
        geo::Geometry::GeometryCollection(gc) => json!({
            "type": "GeometryCollection",
            "geometries": gc.0.iter().map(render_geojson).collect::<Vec<_>>(),
        }),
    }
}
