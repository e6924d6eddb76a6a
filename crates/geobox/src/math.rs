//! Floating-point comparison helpers used by the grid reconciliation code.

/// Relative tolerance of [`is_close`].
pub const CLOSE_RTOL: f64 = 1e-5;
/// Absolute tolerance of [`is_close`].
pub const CLOSE_ATOL: f64 = 1e-8;

/// `|a - b| <= atol + rtol * |b|`, the usual array-library closeness test.
pub fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= CLOSE_ATOL + CLOSE_RTOL * b.abs()
}

/// True when `x` is within `tol` of the nearest integer.
pub fn is_almost_int(x: f64, tol: f64) -> bool {
    (x - x.round()).abs() < tol
}

/// Floor-style modulo: result carries the sign of `m`.
pub fn modulo(x: f64, m: f64) -> f64 {
    let r = x % m;
    if r != 0.0 && (r < 0.0) != (m < 0.0) {
        r + m
    } else {
        r
    }
}
