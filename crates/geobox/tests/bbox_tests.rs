//! Tests for BoundingBox operations.

use approx::assert_relative_eq;
use geobox::affine::Affine;
use geobox::bbox::{bbox_intersection, bbox_union, BoundingBox};

// ============================================================================
// Constructor tests
// ============================================================================

#[test]
fn test_bbox_new() {
    let bbox = BoundingBox::new(-180.0, -90.0, 180.0, 90.0);
    assert_eq!(bbox.left, -180.0);
    assert_eq!(bbox.bottom, -90.0);
    assert_eq!(bbox.right, 180.0);
    assert_eq!(bbox.top, 90.0);
}

// ============================================================================
// Dimension tests
// ============================================================================

#[test]
fn test_bbox_width_height() {
    let bbox = BoundingBox::new(10.0, 5.0, 30.0, 25.0);
    assert_eq!(bbox.width(), 20.0);
    assert_eq!(bbox.height(), 20.0);
}

#[test]
fn test_bbox_zero_dimensions_is_empty() {
    assert!(BoundingBox::new(5.0, 0.0, 5.0, 10.0).is_empty());
    assert!(BoundingBox::new(0.0, 5.0, 10.0, 5.0).is_empty());
    assert!(!BoundingBox::new(0.0, 0.0, 1e-10, 1e-10).is_empty());
}

#[test]
fn test_bbox_inverted_does_not_panic() {
    // Constructor doesn't validate ordering
    let bbox = BoundingBox::new(10.0, 10.0, 0.0, 0.0);
    assert_eq!(bbox.width(), -10.0);
    assert_eq!(bbox.height(), -10.0);
}

// ============================================================================
// Buffer and corner tests
// ============================================================================

#[test]
fn test_bbox_buffered_per_axis() {
    let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    assert_eq!(bbox.buffered(1.0, 2.0), BoundingBox::new(-2.0, -1.0, 12.0, 11.0));
}

#[test]
fn test_bbox_buffered_negative_shrinks() {
    let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    assert_eq!(bbox.buffered(-1.0, -1.0), BoundingBox::new(1.0, 1.0, 9.0, 9.0));
}

#[test]
fn test_bbox_points_cartesian_order() {
    let bbox = BoundingBox::new(-1.0, -2.0, 3.0, 4.0);
    assert_eq!(
        bbox.points(),
        [(-1.0, -2.0), (-1.0, 4.0), (3.0, -2.0), (3.0, 4.0)]
    );
}

// ============================================================================
// Transform tests
// ============================================================================

#[test]
fn test_bbox_transform_pixel_to_world() {
    let pixels = BoundingBox::new(0.0, 0.0, 4.0, 3.0);
    let affine = Affine::new(10.0, 0.0, 100.0, 0.0, -10.0, 200.0);
    // Flipped y axis still yields an ordered box
    assert_eq!(
        pixels.transform(&affine),
        BoundingBox::new(100.0, 170.0, 140.0, 200.0)
    );
}

#[test]
fn test_bbox_transform_rotation_over_approximates() {
    let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
    let (s, c) = std::f64::consts::FRAC_PI_4.sin_cos();
    let rotated = bbox.transform(&Affine::new(c, -s, 0.0, s, c, 0.0));
    assert_relative_eq!(rotated.width(), 2f64.sqrt(), epsilon = 1e-12);
    assert_relative_eq!(rotated.height(), 2f64.sqrt(), epsilon = 1e-12);
}

// ============================================================================
// Collection tests
// ============================================================================

#[test]
fn test_bbox_union_of_many() {
    let boxes = vec![
        BoundingBox::new(0.0, 0.0, 1.0, 1.0),
        BoundingBox::new(5.0, -2.0, 6.0, 0.5),
        BoundingBox::new(-1.0, 0.0, 0.0, 3.0),
    ];
    assert_eq!(bbox_union(boxes), BoundingBox::new(-1.0, -2.0, 6.0, 3.0));
}

#[test]
fn test_bbox_intersection_of_disjoint_is_inverted() {
    let boxes = vec![
        BoundingBox::new(0.0, 0.0, 1.0, 1.0),
        BoundingBox::new(5.0, 0.0, 6.0, 1.0),
    ];
    let overlap = bbox_intersection(boxes);
    assert!(overlap.left > overlap.right);
}

#[test]
fn test_bbox_union_empty_input() {
    let bbox = bbox_union(Vec::new());
    assert_eq!(bbox.left, f64::INFINITY);
    assert_eq!(bbox.right, f64::NEG_INFINITY);
}
