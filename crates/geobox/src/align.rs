//! Pixel grid alignment along a single axis.

/// Fraction of a pixel by which a grid may fall short of the requested interval.
const COVER_TOLERANCE: f64 = 0.1;

/// Compute a pixel-aligned origin and pixel count covering `[left, right]`.
///
/// Grid lines fall at `origin + k * res` with `origin ≡ off (mod |res|)`.
/// A negative `res` describes a descending axis, in which case the origin is
/// placed at the `right` end. The grid covers the interval up to `0.1 * |res|`
/// and always has at least one pixel.
///
/// # Arguments
/// * `left`, `right` - Interval to cover, `left <= right`
/// * `res` - Signed pixel size, nonzero
/// * `off` - Sub-pixel alignment offset, `0 <= off <= |res|`
pub fn align_pix(left: f64, right: f64, res: f64, off: f64) -> (f64, usize) {
    if res < 0.0 {
        let res = -res;
        let origin = ((right - off) / res).ceil() * res + off;
        let count = ((origin - left - COVER_TOLERANCE * res) / res).ceil();
        (origin, pixel_count(count))
    } else {
        let origin = ((left - off) / res).floor() * res + off;
        let count = ((right - origin - COVER_TOLERANCE * res) / res).ceil();
        (origin, pixel_count(count))
    }
}

/// Number of whole pixels needed to cover `value` at resolution `res`,
/// forgiving up to a tenth of a pixel.
pub fn round_to_res(value: f64, res: f64) -> i64 {
    let res = res.abs();
    ((value - COVER_TOLERANCE * res) / res).ceil() as i64
}

fn pixel_count(count: f64) -> usize {
    if count.is_finite() && count > 1.0 {
        count as usize
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascending_axis() {
        assert_eq!(align_pix(20.0, 30.0, 10.0, 0.0), (20.0, 1));
        assert_eq!(align_pix(20.0, 31.5, 10.0, 0.0), (20.0, 2));
    }

    #[test]
    fn test_descending_axis() {
        assert_eq!(align_pix(20.0, 30.0, -10.0, 0.0), (30.0, 1));
        assert_eq!(align_pix(20.0, 31.5, -10.0, 0.0), (40.0, 2));
    }

    #[test]
    fn test_with_offset() {
        assert_eq!(align_pix(20.0, 30.0, 10.0, 3.0), (13.0, 2));
    }

    #[test]
    fn test_degenerate_interval_still_one_pixel() {
        assert_eq!(align_pix(5.0, 5.0, 1.0, 0.0), (5.0, 1));
    }

    #[test]
    fn test_round_to_res() {
        assert_eq!(round_to_res(0.0, 10.0), 0);
        assert_eq!(round_to_res(10.5, 10.0), 1);
        assert_eq!(round_to_res(12.0, -10.0), 2);
        assert_eq!(round_to_res(-10.0, 10.0), -1);
    }
}
