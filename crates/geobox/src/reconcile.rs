//! Union and intersection of pixel grids that share a pixel lattice.
//!
//! Grids are compared in the pixel domain of a reference grid: a grid is
//! compatible when its pixels map onto the reference's pixels by a whole-pixel
//! translation. The results are conservative in that they never resample.

use tracing::debug;

use crate::affine::Affine;
use crate::bbox::{bbox_intersection, bbox_union, BoundingBox};
use crate::error::{GeoError, GeoResult};
use crate::geobox::GeoBox;
use crate::math::{is_almost_int, is_close};

/// Largest distance from an integer pixel offset still treated as whole.
const WHOLE_PIXEL_TOLERANCE: f64 = 1e-8;

/// Footprint of `geobox` in the pixel coordinates of `reference`.
///
/// Fails with `CrsMismatch` for different CRSs and `IncompatibleGrid` when the
/// two grids differ by anything other than a whole-pixel translation.
pub fn bounding_box_in_pixel_domain(geobox: &GeoBox, reference: &GeoBox) -> GeoResult<BoundingBox> {
    if reference.crs() != geobox.crs() {
        return Err(GeoError::crs_mismatch(reference.crs(), geobox.crs()));
    }

    let inverse = reference.affine().inverse().map_err(|_| {
        GeoError::IncompatibleGrid(format!(
            "reference transform {} has no inverse",
            reference.affine()
        ))
    })?;
    let rel = inverse * *geobox.affine();

    let pure_translation = is_close(rel.a, 1.0)
        && is_close(rel.b, 0.0)
        && is_close(rel.d, 0.0)
        && is_close(rel.e, 1.0)
        && is_almost_int(rel.c, WHOLE_PIXEL_TOLERANCE)
        && is_almost_int(rel.f, WHOLE_PIXEL_TOLERANCE);

    if !pure_translation {
        debug!(relative = %rel, "Grids do not share a pixel lattice");
        return Err(GeoError::IncompatibleGrid(format!(
            "{} is not a whole-pixel translation of {}",
            geobox.affine(),
            reference.affine()
        )));
    }

    let (tx, ty) = (rel.c.round(), rel.f.round());
    Ok(BoundingBox::new(
        tx,
        ty,
        tx + geobox.width() as f64,
        ty + geobox.height() as f64,
    ))
}

/// Smallest grid, on the first grid's lattice, covering every input grid.
pub fn geobox_union_conservative<'a, I>(geoboxes: I) -> GeoResult<GeoBox>
where
    I: IntoIterator<Item = &'a GeoBox>,
{
    reconcile(geoboxes, "union", |boxes| bbox_union(boxes))
}

/// Largest grid, on the first grid's lattice, inside every input grid.
///
/// Disjoint inputs give a grid with zero width or height.
pub fn geobox_intersection_conservative<'a, I>(geoboxes: I) -> GeoResult<GeoBox>
where
    I: IntoIterator<Item = &'a GeoBox>,
{
    reconcile(geoboxes, "intersection", |boxes| {
        let mut bbox = bbox_intersection(boxes);
        if bbox.left > bbox.right {
            bbox.right = bbox.left;
        }
        if bbox.bottom > bbox.top {
            bbox.top = bbox.bottom;
        }
        bbox
    })
}

fn reconcile<'a, I, F>(geoboxes: I, op: &str, combine: F) -> GeoResult<GeoBox>
where
    I: IntoIterator<Item = &'a GeoBox>,
    F: FnOnce(Vec<BoundingBox>) -> BoundingBox,
{
    let geoboxes: Vec<&GeoBox> = geoboxes.into_iter().collect();
    let reference = *geoboxes
        .first()
        .ok_or_else(|| GeoError::Input(format!("cannot compute {} of no grids", op)))?;

    let boxes = geoboxes
        .iter()
        .map(|gb| bounding_box_in_pixel_domain(gb, reference))
        .collect::<GeoResult<Vec<_>>>()?;

    let bbox = combine(boxes);
    let affine = *reference.affine() * Affine::translation(bbox.left, bbox.bottom);

    GeoBox::new(
        pixel_count(bbox.width()),
        pixel_count(bbox.height()),
        affine,
        reference.crs().clone(),
    )
}

fn pixel_count(extent: f64) -> usize {
    extent.round().max(0.0) as usize
}
