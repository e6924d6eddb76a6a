//! Tests for the geometry engine: predicates, boolean ops, I/O and reprojection.

use approx::assert_relative_eq;
use geobox::{
    intersects, unary_intersection, unary_union, Affine, BoundingBox, Crs, GeoError, Geometry,
    ReprojectOptions,
};
use serde_json::json;

fn wgs84() -> Option<Crs> {
    Some(Crs::new("EPSG:4326").unwrap())
}

fn square(x0: f64, y0: f64, size: f64) -> Geometry {
    Geometry::bbox_polygon(&BoundingBox::new(x0, y0, x0 + size, y0 + size), wgs84())
}

// ============================================================================
// GeoJSON tests
// ============================================================================

#[test]
fn test_geojson_polygon_roundtrip() {
    let value = json!({
        "type": "Polygon",
        "coordinates": [[[0.0, 0.0], [4.0, 0.0], [4.0, 3.0], [0.0, 3.0], [0.0, 0.0]]],
    });
    let geom = Geometry::from_geojson(&value, wgs84()).unwrap();
    assert_eq!(geom.geom_type(), "Polygon");
    assert_relative_eq!(geom.area(), 12.0);
    assert_eq!(geom.to_geojson(), value);
}

#[test]
fn test_geojson_drops_third_coordinate() {
    let value = json!({"type": "LineString", "coordinates": [[1.0, 2.0, 100.0], [3.0, 4.0, 200.0]]});
    let geom = Geometry::from_geojson(&value, None).unwrap();
    assert_eq!(
        geom.to_geojson(),
        json!({"type": "LineString", "coordinates": [[1.0, 2.0], [3.0, 4.0]]})
    );
}

#[test]
fn test_geojson_feature_and_collection() {
    let value = json!({
        "type": "Feature",
        "properties": {},
        "geometry": {
            "type": "GeometryCollection",
            "geometries": [
                {"type": "Point", "coordinates": [1.0, 1.0]},
                {"type": "MultiPoint", "coordinates": [[0.0, 0.0], [2.0, 2.0]]},
            ],
        },
    });
    let geom = Geometry::from_geojson(&value, None).unwrap();
    assert_eq!(geom.geom_type(), "GeometryCollection");
    assert_eq!(geom.envelope().unwrap(), BoundingBox::new(0.0, 0.0, 2.0, 2.0));
}

#[test]
fn test_geojson_errors() {
    for value in [
        json!({"coordinates": [0.0, 0.0]}),
        json!({"type": "Point"}),
        json!({"type": "Point", "coordinates": [0.0]}),
        json!({"type": "Circle", "coordinates": [0.0, 0.0]}),
    ] {
        let err = Geometry::from_geojson(&value, None).unwrap_err();
        assert!(matches!(err, GeoError::InvalidGeometry(_)), "{:?}", value);
    }
}

// ============================================================================
// Predicate tests
// ============================================================================

#[test]
fn test_contains_and_within() {
    let outer = square(0.0, 0.0, 10.0);
    let inner = square(2.0, 2.0, 1.0);
    let point = Geometry::point(5.0, 5.0, wgs84());

    assert!(outer.contains(&inner).unwrap());
    assert!(inner.within(&outer).unwrap());
    assert!(outer.contains(&point).unwrap());
    assert!(!inner.contains(&outer).unwrap());
}

#[test]
fn test_disjoint_and_touching() {
    let a = square(0.0, 0.0, 1.0);
    let b = square(1.0, 0.0, 1.0);
    let c = square(5.0, 5.0, 1.0);

    assert!(a.intersects(&b).unwrap());
    assert!(a.touches(&b).unwrap());
    assert!(!intersects(&a, &b).unwrap());
    assert!(a.disjoint(&c).unwrap());
}

#[test]
fn test_predicates_check_crs() {
    let a = square(0.0, 0.0, 1.0);
    let b = Geometry::bbox_polygon(
        &BoundingBox::new(0.0, 0.0, 1.0, 1.0),
        Some(Crs::new("EPSG:3857").unwrap()),
    );
    let unset = a.clone().with_crs(None);

    assert!(matches!(a.intersects(&b), Err(GeoError::CrsMismatch { .. })));
    assert!(matches!(a.union(&unset), Err(GeoError::CrsMismatch { .. })));
}

// ============================================================================
// Boolean operation tests
// ============================================================================

#[test]
fn test_boolean_ops_areas() {
    let a = square(0.0, 0.0, 2.0);
    let b = square(1.0, 1.0, 2.0);

    assert_relative_eq!(a.intersection(&b).unwrap().area(), 1.0, epsilon = 1e-12);
    assert_relative_eq!(a.union(&b).unwrap().area(), 7.0, epsilon = 1e-12);
    assert_relative_eq!(a.difference(&b).unwrap().area(), 3.0, epsilon = 1e-12);
    assert_relative_eq!(a.symmetric_difference(&b).unwrap().area(), 6.0, epsilon = 1e-12);
    assert_eq!(a.intersection(&b).unwrap().crs(), a.crs());
}

#[test]
fn test_disjoint_union_is_multipolygon() {
    let union = square(0.0, 0.0, 1.0).union(&square(5.0, 0.0, 1.0)).unwrap();
    assert_eq!(union.geom_type(), "MultiPolygon");
    assert_relative_eq!(union.area(), 2.0, epsilon = 1e-12);
}

#[test]
fn test_unary_union_and_intersection() {
    let squares = vec![square(0.0, 0.0, 2.0), square(1.0, 0.0, 2.0), square(1.5, 0.0, 2.0)];

    let union = unary_union(&squares).unwrap().unwrap();
    assert_eq!(union.envelope().unwrap(), BoundingBox::new(0.0, 0.0, 3.5, 2.0));

    let overlap = unary_intersection(&squares).unwrap().unwrap();
    assert_relative_eq!(overlap.area(), 1.0, epsilon = 1e-12);

    assert!(unary_union(&Vec::<Geometry>::new()).unwrap().is_none());
}

// ============================================================================
// Coordinate operation tests
// ============================================================================

#[test]
fn test_envelope_of_empty_geometry() {
    let empty = Geometry::multipoint(&[], None);
    assert!(empty.is_empty());
    assert!(matches!(empty.envelope(), Err(GeoError::InvalidGeometry(_))));
}

#[test]
fn test_polygon_from_transform() {
    let affine = Affine::new(10.0, 0.0, 100.0, 0.0, -10.0, 200.0);
    let extent = Geometry::polygon_from_transform(4.0, 3.0, &affine, None);
    assert_eq!(extent.envelope().unwrap(), BoundingBox::new(100.0, 170.0, 140.0, 200.0));
    assert_relative_eq!(extent.area(), 1200.0);
}

#[test]
fn test_segmented_limits_edge_length() {
    let line = Geometry::line(&[(0.0, 0.0), (10.0, 0.0), (10.0, 1.0)], None);
    let value = line.segmented(4.0).to_geojson();
    assert_eq!(
        value["coordinates"],
        json!([[0.0, 0.0], [4.0, 0.0], [8.0, 0.0], [10.0, 0.0], [10.0, 1.0]])
    );

    // non-positive resolution leaves geometry alone
    assert_eq!(line.segmented(0.0), line);
}

#[test]
fn test_transform_points() {
    let shifted = square(0.0, 0.0, 1.0).transform_points(|x, y| (x + 10.0, y * 2.0));
    assert_eq!(shifted.envelope().unwrap(), BoundingBox::new(10.0, 0.0, 11.0, 2.0));
    assert_eq!(shifted.crs(), wgs84().as_ref());
}

#[test]
fn test_to_crs_point() {
    let merc = Crs::new("EPSG:3857").unwrap();
    let point = Geometry::point(90.0, 0.0, wgs84());
    let projected = point.to_crs(&merc, &ReprojectOptions::default()).unwrap();
    let bbox = projected.envelope().unwrap();
    assert_relative_eq!(bbox.left, 10018754.171394622, epsilon = 1e-6);
    assert_eq!(projected.crs(), Some(&merc));

    // same CRS is a no-op
    let same = point.to_crs(&Crs::new("EPSG:4326").unwrap(), &ReprojectOptions::default());
    assert_eq!(same.unwrap(), point);
}

#[test]
fn test_to_crs_requires_source_crs() {
    let point = Geometry::point(0.0, 0.0, None);
    let merc = Crs::new("EPSG:3857").unwrap();
    assert!(matches!(
        point.to_crs(&merc, &ReprojectOptions::default()),
        Err(GeoError::InvalidCrs(_))
    ));
}

#[test]
fn test_to_crs_segments_long_edges() {
    let line = Geometry::line(&[(0.0, 0.0), (10.0, 0.0)], wgs84());
    let merc = Crs::new("EPSG:3857").unwrap();
    let projected = line.to_crs(&merc, &ReprojectOptions::default()).unwrap();
    // default geographic resolution is one degree
    assert_eq!(projected.to_geojson()["coordinates"].as_array().unwrap().len(), 11);

    let coarse = line
        .to_crs(&merc, &ReprojectOptions::default().with_resolution(5.0))
        .unwrap();
    assert_eq!(coarse.to_geojson()["coordinates"].as_array().unwrap().len(), 3);
}
