//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

use crate::affine::Affine;

/// An axis-aligned rectangle in world (or pixel) coordinates.
///
/// No ordering is enforced at construction; a box with `left == right` or
/// `bottom == top` is the canonical empty box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl BoundingBox {
    /// Create a new bounding box from its edges.
    pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    pub fn is_empty(&self) -> bool {
        self.left == self.right || self.bottom == self.top
    }

    /// Grow the box by `ybuff` vertically and `xbuff` horizontally on each side.
    ///
    /// Negative amounts shrink it.
    pub fn buffered(&self, ybuff: f64, xbuff: f64) -> BoundingBox {
        BoundingBox {
            left: self.left - xbuff,
            bottom: self.bottom - ybuff,
            right: self.right + xbuff,
            top: self.top + ybuff,
        }
    }

    /// The four corners: (left, bottom), (left, top), (right, bottom), (right, top).
    pub fn points(&self) -> [(f64, f64); 4] {
        [
            (self.left, self.bottom),
            (self.left, self.top),
            (self.right, self.bottom),
            (self.right, self.top),
        ]
    }

    /// Map the corners through `transform` and take their bounding box.
    ///
    /// Works for any affine; rotated transforms over-approximate the area.
    pub fn transform(&self, transform: &Affine) -> BoundingBox {
        let mut out = BoundingBox::new(
            f64::INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
        );
        for (x, y) in self.points() {
            let (x, y) = transform.apply(x, y);
            out.left = out.left.min(x);
            out.bottom = out.bottom.min(y);
            out.right = out.right.max(x);
            out.top = out.top.max(y);
        }
        out
    }

    /// Center point (x, y).
    pub fn center(&self) -> (f64, f64) {
        (
            (self.left + self.right) / 2.0,
            (self.bottom + self.top) / 2.0,
        )
    }
}

/// Smallest box enclosing every box in `boxes`.
///
/// An empty iterator yields the inverted infinite box (`+inf, +inf, -inf, -inf`).
pub fn bbox_union<I>(boxes: I) -> BoundingBox
where
    I: IntoIterator<Item = BoundingBox>,
{
    boxes.into_iter().fold(
        BoundingBox::new(
            f64::INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
        ),
        |acc, bb| BoundingBox {
            left: acc.left.min(bb.left),
            bottom: acc.bottom.min(bb.bottom),
            right: acc.right.max(bb.right),
            top: acc.top.max(bb.top),
        },
    )
}

/// Overlap of every box in `boxes`; may come out inverted when they are disjoint.
///
/// An empty iterator yields the infinite box.
pub fn bbox_intersection<I>(boxes: I) -> BoundingBox
where
    I: IntoIterator<Item = BoundingBox>,
{
    boxes.into_iter().fold(
        BoundingBox::new(
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::INFINITY,
        ),
        |acc, bb| BoundingBox {
            left: acc.left.max(bb.left),
            bottom: acc.bottom.max(bb.bottom),
            right: acc.right.min(bb.right),
            top: acc.top.min(bb.top),
        },
    )
}
