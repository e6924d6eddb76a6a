//! 2D affine transforms mapping pixel (col, row) to world (x, y).

use std::fmt;
use std::ops::Mul;

use serde::{Deserialize, Serialize};

use crate::error::{GeoError, GeoResult};

/// A 2D affine transform.
///
/// Maps pixel coordinates (col, row) to world coordinates (x, y):
///   x = a * col + b * row + c
///   y = d * col + e * row + f
///
/// Composition follows matrix order: `(lhs * rhs)` applies `rhs` first.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 0.0,
        e: 1.0,
        f: 0.0,
    };

    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, tx, 0.0, 1.0, ty)
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, 0.0, sy, 0.0)
    }

    /// Coefficients in (a, b, c, d, e, f) order.
    pub fn coefficients(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    pub fn from_coefficients(c: [f64; 6]) -> Self {
        Self::new(c[0], c[1], c[2], c[3], c[4], c[5])
    }

    /// X translation (world x of pixel corner (0, 0)).
    pub fn xoff(&self) -> f64 {
        self.c
    }

    /// Y translation (world y of pixel corner (0, 0)).
    pub fn yoff(&self) -> f64 {
        self.f
    }

    /// Scale and translate only: no rotation or shear terms.
    pub fn is_axis_aligned(&self) -> bool {
        self.b == 0.0 && self.d == 0.0
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.e - self.b * self.d
    }

    /// Apply the forward transform: (col, row) -> (x, y).
    #[inline]
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.a * col + self.b * row + self.c,
            self.d * col + self.e * row + self.f,
        )
    }

    /// Compute the inverse affine transform.
    pub fn inverse(&self) -> GeoResult<Affine> {
        let det = self.determinant();
        if det.abs() < f64::EPSILON * f64::EPSILON {
            return Err(GeoError::InvalidGrid(format!(
                "singular affine transform {}",
                self
            )));
        }
        let inv_det = 1.0 / det;
        let a = self.e * inv_det;
        let b = -self.b * inv_det;
        let d = -self.d * inv_det;
        let e = self.a * inv_det;
        Ok(Affine {
            a,
            b,
            c: -self.c * a - self.f * b,
            d,
            e,
            f: -self.c * d - self.f * e,
        })
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Affine {
    type Output = Affine;

    fn mul(self, rhs: Affine) -> Affine {
        Affine {
            a: self.a * rhs.a + self.b * rhs.d,
            b: self.a * rhs.b + self.b * rhs.e,
            c: self.a * rhs.c + self.b * rhs.f + self.c,
            d: self.d * rhs.a + self.e * rhs.d,
            e: self.d * rhs.b + self.e * rhs.e,
            f: self.d * rhs.c + self.e * rhs.f + self.f,
        }
    }
}

impl fmt::Display for Affine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Affine({}, {}, {}, {}, {}, {})",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}
