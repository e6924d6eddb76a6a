//! Geospatial grid algebra.
//!
//! Defines pixel grids ([`GeoBox`]) anchored to a CRS by an axis-aligned affine
//! transform, and the operations to build them from geometry, crop, buffer,
//! union and intersect them. Also provides the CRS service, a small geometry
//! engine on top of `geo`, and antimeridian-aware reprojection.

pub mod affine;
pub mod align;
pub mod antimeridian;
pub mod bbox;
pub mod config;
pub mod crs;
pub mod error;
pub mod geobox;
pub mod geometry;
pub mod math;
pub mod reconcile;
pub mod roi;

pub use affine::Affine;
pub use align::align_pix;
pub use antimeridian::{chop_along_antimeridian, is_smooth_across_dateline, DATELINE_EPS};
pub use bbox::{bbox_intersection, bbox_union, BoundingBox};
pub use config::{GeoBoxSpec, ReprojectOptions};
pub use crs::{Crs, CrsCache, CrsSource};
pub use error::{GeoError, GeoResult};
pub use geobox::{scaled_down_geobox, Coordinate, GeoBox};
pub use geometry::{intersects, unary_intersection, unary_union, Geometry};
pub use reconcile::{
    bounding_box_in_pixel_domain, geobox_intersection_conservative, geobox_union_conservative,
};
pub use roi::{Roi, Span};
