//! Rectangular pixel grids anchored to a CRS.

use std::fmt;

use crate::affine::Affine;
use crate::align::{align_pix, round_to_res};
use crate::config::ReprojectOptions;
use crate::crs::Crs;
use crate::error::{GeoError, GeoResult};
use crate::geometry::Geometry;
use crate::math::modulo;
use crate::reconcile::{geobox_intersection_conservative, geobox_union_conservative};
use crate::roi::Roi;

/// A `width` x `height` pixel grid placed in `crs` by an axis-aligned affine.
///
/// Immutable: cropping, buffering, union and intersection all return new grids.
/// Equality is exact on shape, affine coefficients and CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoBox {
    width: usize,
    height: usize,
    affine: Affine,
    crs: Crs,
}

/// Pixel-centre labels along one axis of a [`GeoBox`].
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    pub dimension: &'static str,
    pub values: Vec<f64>,
    pub units: &'static str,
    pub resolution: f64,
}

impl GeoBox {
    /// Create a grid. Fails with `InvalidGrid` if the affine has rotation or shear.
    pub fn new(width: usize, height: usize, affine: Affine, crs: Crs) -> GeoResult<Self> {
        if !affine.is_axis_aligned() {
            return Err(GeoError::InvalidGrid(format!(
                "only axis-aligned transforms are supported, got {}",
                affine
            )));
        }
        Ok(Self {
            width,
            height,
            affine,
            crs,
        })
    }

    /// Smallest grid at `resolution` covering the bounding box of `geometry`.
    ///
    /// # Arguments
    /// * `geometry` - Area to cover; reprojected first if `crs` differs from its own
    /// * `resolution` - Signed pixel size as (y, x); north-up grids use a negative y
    /// * `crs` - Output CRS, defaulting to the geometry's
    /// * `align` - Sub-pixel origin offset as (y, x), each within `[0, |res|]`
    pub fn from_geopolygon(
        geometry: &Geometry,
        resolution: (f64, f64),
        crs: Option<&Crs>,
        align: Option<(f64, f64)>,
    ) -> GeoResult<Self> {
        let (yres, xres) = resolution;
        let (yoff, xoff) = align.unwrap_or((0.0, 0.0));

        if yres == 0.0 || xres == 0.0 || !yres.is_finite() || !xres.is_finite() {
            return Err(GeoError::Input(format!(
                "resolution must be finite and nonzero, got ({}, {})",
                yres, xres
            )));
        }
        if !(0.0..=xres.abs()).contains(&xoff) || !(0.0..=yres.abs()).contains(&yoff) {
            return Err(GeoError::Input(format!(
                "alignment ({}, {}) must be between 0 and the resolution ({}, {})",
                yoff,
                xoff,
                yres.abs(),
                xres.abs()
            )));
        }

        let crs = match crs {
            Some(crs) => crs.clone(),
            None => geometry
                .crs()
                .cloned()
                .ok_or_else(|| GeoError::InvalidCrs("geometry has no CRS".to_string()))?,
        };

        let reprojected;
        let geometry = if geometry.crs() != Some(&crs) {
            reprojected = geometry.to_crs(&crs, &ReprojectOptions::default())?;
            &reprojected
        } else {
            geometry
        };

        let bbox = geometry.envelope()?;
        let (offx, width) = align_pix(bbox.left, bbox.right, xres, xoff);
        let (offy, height) = align_pix(bbox.bottom, bbox.top, yres, yoff);
        let affine = Affine::translation(offx, offy) * Affine::scale(xres, yres);

        GeoBox::new(width, height, affine, crs)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// (height, width)
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn affine(&self) -> &Affine {
        &self.affine
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Dimension names in (y, x) order.
    pub fn dimensions(&self) -> (&'static str, &'static str) {
        self.crs.dimensions()
    }

    /// Dimension units in (y, x) order.
    pub fn units(&self) -> (&'static str, &'static str) {
        self.crs.units()
    }

    /// Signed pixel size as (y, x).
    pub fn resolution(&self) -> (f64, f64) {
        (self.affine.e, self.affine.a)
    }

    /// Sub-pixel offset of the grid origin as (y, x).
    pub fn alignment(&self) -> (f64, f64) {
        (
            modulo(self.affine.yoff(), self.affine.e.abs()),
            modulo(self.affine.xoff(), self.affine.a.abs()),
        )
    }

    /// Footprint polygon of the grid.
    pub fn extent(&self) -> Geometry {
        Geometry::polygon_from_transform(
            self.width as f64,
            self.height as f64,
            &self.affine,
            Some(self.crs.clone()),
        )
    }

    /// Footprint in EPSG:4326.
    pub fn geographic_extent(&self) -> GeoResult<Geometry> {
        let extent = self.extent();
        if self.crs.is_geographic() {
            return Ok(extent);
        }
        extent.to_crs(&Crs::wgs84()?, &ReprojectOptions::default())
    }

    /// Pixel-centre coordinates along (y, x).
    pub fn coordinates(&self) -> [Coordinate; 2] {
        let (ydim, xdim) = self.dimensions();
        let (yunits, xunits) = self.units();
        let (yres, xres) = self.resolution();
        let centres = |n: usize, off: f64, res: f64| -> Vec<f64> {
            (0..n).map(|i| i as f64 * res + (off + res / 2.0)).collect()
        };

        [
            Coordinate {
                dimension: ydim,
                values: centres(self.height, self.affine.yoff(), yres),
                units: yunits,
                resolution: yres,
            },
            Coordinate {
                dimension: xdim,
                values: centres(self.width, self.affine.xoff(), xres),
                units: xunits,
                resolution: xres,
            },
        ]
    }

    /// Grow by whole pixels so that at least `ybuff`/`xbuff` world units are
    /// added on each side (a tenth of a pixel short is forgiven).
    ///
    /// Negative amounts shrink the grid, down to an empty one.
    pub fn buffered(&self, ybuff: f64, xbuff: f64) -> GeoResult<GeoBox> {
        let (yres, xres) = self.resolution();
        let by = round_to_res(ybuff, yres);
        let bx = round_to_res(xbuff, xres);

        let grow = |n: usize, b: i64| (n as i64 + 2 * b).max(0) as usize;
        let affine = self.affine * Affine::translation(-bx as f64, -by as f64);

        GeoBox::new(
            grow(self.width, bx),
            grow(self.height, by),
            affine,
            self.crs.clone(),
        )
    }

    /// Sub-grid selection by row/column ranges.
    ///
    /// ```
    /// # use geobox::{Affine, Crs, GeoBox, Roi};
    /// let gbox = GeoBox::new(10, 8, Affine::new(1.0, 0.0, 0.0, 0.0, -1.0, 8.0),
    ///     Crs::new("EPSG:4326").unwrap()).unwrap();
    /// let sub = gbox.crop(Roi::new(2isize..4, 1isize..)).unwrap();
    /// assert_eq!(sub.shape(), (2, 9));
    /// ```
    pub fn crop(&self, roi: impl Into<Roi>) -> GeoResult<GeoBox> {
        let roi = roi.into();
        let (row, height) = roi.rows.resolve(self.height)?;
        let (col, width) = roi.cols.resolve(self.width)?;

        GeoBox::new(
            width,
            height,
            self.affine * Affine::translation(col as f64, row as f64),
            self.crs.clone(),
        )
    }

    /// Smallest compatible grid covering both. See [`geobox_union_conservative`].
    pub fn union(&self, other: &GeoBox) -> GeoResult<GeoBox> {
        geobox_union_conservative([self, other])
    }

    /// Overlap of two compatible grids. See [`geobox_intersection_conservative`].
    pub fn intersection(&self, other: &GeoBox) -> GeoResult<GeoBox> {
        geobox_intersection_conservative([self, other])
    }
}

impl fmt::Display for GeoBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GeoBox({}, {}, {}, {})",
            self.width, self.height, self.affine, self.crs
        )
    }
}

/// Coarser grid over the same area: each new pixel spans `scaler` old ones.
///
/// Partial pixels at the far edges are kept, so the shape rounds up.
pub fn scaled_down_geobox(geobox: &GeoBox, scaler: f64) -> GeoResult<GeoBox> {
    if !(scaler > 1.0) || !scaler.is_finite() {
        return Err(GeoError::Input(format!(
            "scaler must be greater than 1, got {}",
            scaler
        )));
    }

    let scaled = |n: usize| (n as f64 / scaler).ceil() as usize;
    GeoBox::new(
        scaled(geobox.width),
        scaled(geobox.height),
        geobox.affine * Affine::scale(scaler, scaler),
        geobox.crs.clone(),
    )
}
