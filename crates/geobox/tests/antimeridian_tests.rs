//! Tests for dateline-aware reprojection.

use geobox::{
    chop_along_antimeridian, is_smooth_across_dateline, Crs, Geometry, ReprojectOptions,
    DATELINE_EPS,
};

/// PDC Mercator (central meridian 150°E) box from lon 170 to lon -170.
fn pacific_box(south: f64, north: f64) -> Geometry {
    let pdc = Crs::new("EPSG:3832").unwrap();
    let fwd = Crs::new("EPSG:4326").unwrap().transformer_to(&pdc);
    let (x0, y0) = fwd.transform(170.0, south);
    let (_, y1) = fwd.transform(170.0, north);
    // lon 190 expressed as the continuation past 180 in projected space
    let x1 = x0 + (x0 - fwd.transform(150.0, 0.0).0);
    Geometry::polygon(
        &[(x0, y1), (x1, y1), (x1, y0), (x0, y0), (x0, y1)],
        &[],
        Some(pdc),
    )
}

fn polygon_rings(value: &serde_json::Value) -> Vec<Vec<(f64, f64)>> {
    let coords = &value["coordinates"];
    let polygons: Vec<&serde_json::Value> = match value["type"].as_str() {
        Some("Polygon") => vec![coords],
        Some("MultiPolygon") => coords.as_array().unwrap().iter().collect(),
        other => panic!("unexpected geometry type {:?}", other),
    };
    polygons
        .into_iter()
        .flat_map(|p| p.as_array().unwrap().iter())
        .map(|ring| {
            ring.as_array()
                .unwrap()
                .iter()
                .map(|c| (c[0].as_f64().unwrap(), c[1].as_f64().unwrap()))
                .collect()
        })
        .collect()
}

fn widest_edge(geom: &Geometry) -> f64 {
    polygon_rings(&geom.to_geojson())
        .iter()
        .flat_map(|ring| ring.windows(2).map(|w| (w[1].0 - w[0].0).abs()))
        .fold(0.0, f64::max)
}

// ============================================================================
// Smoothness tests
// ============================================================================

#[test]
fn test_smoothness_depends_on_central_meridian() {
    let wgs84 = Crs::new("EPSG:4326").unwrap();
    for (code, smooth) in [("EPSG:3832", true), ("EPSG:3857", false), ("EPSG:3395", false)] {
        let src = Crs::new(code).unwrap();
        let fwd = src.transformer_to(&wgs84);
        let inv = fwd.inverse();
        for mid_lat in [-45.0, 0.0, 30.0] {
            assert_eq!(
                is_smooth_across_dateline(
                    mid_lat,
                    |x, y| fwd.transform(x, y),
                    |x, y| inv.transform(x, y),
                    DATELINE_EPS
                ),
                smooth,
                "{} at {}",
                code,
                mid_lat
            );
        }
    }
}

// ============================================================================
// Reprojection tests
// ============================================================================

#[test]
fn test_reproject_without_wrap_spans_the_globe() {
    let geom = pacific_box(-10.0, 10.0);
    let wgs84 = Crs::new("EPSG:4326").unwrap();
    let out = geom.to_crs(&wgs84, &ReprojectOptions::default()).unwrap();
    assert!(widest_edge(&out) > 180.0);
}

#[test]
fn test_reproject_with_wrap_is_split() {
    let geom = pacific_box(-10.0, 10.0);
    let wgs84 = Crs::new("EPSG:4326").unwrap();
    let out = geom
        .to_crs(&wgs84, &ReprojectOptions::default().with_wrap_dateline())
        .unwrap();

    assert_eq!(out.geom_type(), "MultiPolygon");
    assert_eq!(out.crs(), Some(&wgs84));
    assert!(widest_edge(&out) < 180.0);

    // one piece on each side, both hugging the dateline
    let bbox = out.envelope().unwrap();
    assert!(bbox.left > -180.0 && bbox.left < -179.99);
    assert!(bbox.right < 180.0 && bbox.right > 179.99);
    assert!(bbox.top > 9.9 && bbox.top < 10.1);
}

#[test]
fn test_chop_preserves_area() {
    let geom = pacific_box(-10.0, 10.0);
    let chopped = chop_pdc(&geom);
    let relative_loss = (geom.area() - chopped.area()) / geom.area();
    assert!(relative_loss >= 0.0 && relative_loss < 1e-9, "{}", relative_loss);
    assert_eq!(chopped.crs(), geom.crs());
}

#[test]
fn test_chop_preserves_area_near_pole() {
    // cut line samples stop at 89°N, below the top of the box
    let geom = pacific_box(80.0, 89.5);
    let chopped = chop_pdc(&geom);
    let relative_loss = (geom.area() - chopped.area()) / geom.area();
    assert!(relative_loss.abs() < 1e-9, "{}", relative_loss);
    let (top, chopped_top) = (geom.envelope().unwrap().top, chopped.envelope().unwrap().top);
    assert!((top - chopped_top).abs() < 1e-6, "{} vs {}", top, chopped_top);
}

fn chop_pdc(geom: &Geometry) -> Geometry {
    let pdc = geom.crs().unwrap().clone();
    let fwd = pdc.transformer_to(&Crs::new("EPSG:4326").unwrap());
    let inv = fwd.inverse();
    chop_along_antimeridian(geom, |x, y| fwd.transform(x, y), |x, y| inv.transform(x, y))
}

#[test]
fn test_chop_skips_geometry_away_from_dateline() {
    let pdc = Crs::new("EPSG:3832").unwrap();
    let fwd = pdc.transformer_to(&Crs::new("EPSG:4326").unwrap());
    let inv = fwd.inverse();
    let geom = Geometry::polygon(
        &[(0.0, 0.0), (100_000.0, 0.0), (100_000.0, 100_000.0), (0.0, 0.0)],
        &[],
        Some(pdc),
    );

    let chopped =
        chop_along_antimeridian(&geom, |x, y| fwd.transform(x, y), |x, y| inv.transform(x, y));
    assert_eq!(chopped, geom);
}

#[test]
fn test_chop_leaves_non_smooth_crs_unchanged() {
    let merc = Crs::new("EPSG:3857").unwrap();
    let fwd = merc.transformer_to(&Crs::new("EPSG:4326").unwrap());
    let inv = fwd.inverse();
    let geom = Geometry::polygon(
        &[
            (19_000_000.0, -1_000_000.0),
            (20_000_000.0, -1_000_000.0),
            (20_000_000.0, 1_000_000.0),
            (19_000_000.0, 1_000_000.0),
            (19_000_000.0, -1_000_000.0),
        ],
        &[],
        Some(merc),
    );

    let chopped =
        chop_along_antimeridian(&geom, |x, y| fwd.transform(x, y), |x, y| inv.transform(x, y));
    assert_eq!(chopped, geom);
}

#[test]
fn test_chop_clips_lines() {
    let pdc = Crs::new("EPSG:3832").unwrap();
    let fwd = pdc.transformer_to(&Crs::new("EPSG:4326").unwrap());
    let inv = fwd.inverse();
    let (x180, _) = inv.transform(180.0, 0.0);

    let line = Geometry::line(&[(x180 - 1000.0, 0.0), (x180 + 1000.0, 0.0)], Some(pdc));
    let chopped =
        chop_along_antimeridian(&line, |x, y| fwd.transform(x, y), |x, y| inv.transform(x, y));
    assert_eq!(chopped.geom_type(), "MultiLineString");

    let lines = chopped.to_geojson();
    let pieces = lines["coordinates"].as_array().unwrap();
    assert!(pieces.len() >= 2);
    for piece in pieces {
        let xs: Vec<f64> = piece
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c[0].as_f64().unwrap())
            .collect();
        let west = xs.iter().all(|&x| x < x180);
        let east = xs.iter().all(|&x| x > x180);
        assert!(west || east, "piece crosses the dateline: {:?}", xs);
    }
}
