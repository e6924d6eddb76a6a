//! Row/column regions used to crop a [`crate::GeoBox`].

use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::error::{GeoError, GeoResult};

/// A half-open index range along one axis, Python-slice style.
///
/// Open ends default to the full axis and negative indices count from the end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

impl Span {
    pub fn new(start: Option<isize>, stop: Option<isize>) -> Self {
        Self {
            start,
            stop,
            step: None,
        }
    }

    pub fn full() -> Self {
        Self::default()
    }

    pub fn with_step(mut self, step: isize) -> Self {
        self.step = Some(step);
        self
    }

    /// Resolve against an axis of length `len` into `(start, size)`.
    ///
    /// Bounds are not clamped to the axis, so a crop may extend past the grid.
    pub fn resolve(&self, len: usize) -> GeoResult<(isize, usize)> {
        if let Some(step) = self.step {
            if step != 1 {
                return Err(GeoError::Unsupported(format!(
                    "grid slicing with step {}",
                    step
                )));
            }
        }

        let len = len as isize;
        let wrap = |i: isize| if i < 0 { i + len } else { i };
        let start = self.start.map(wrap).unwrap_or(0);
        let stop = self.stop.map(wrap).unwrap_or(len);
        Ok((start, (stop - start).max(0) as usize))
    }
}

impl From<Range<isize>> for Span {
    fn from(r: Range<isize>) -> Self {
        Span::new(Some(r.start), Some(r.end))
    }
}

impl From<RangeFrom<isize>> for Span {
    fn from(r: RangeFrom<isize>) -> Self {
        Span::new(Some(r.start), None)
    }
}

impl From<RangeTo<isize>> for Span {
    fn from(r: RangeTo<isize>) -> Self {
        Span::new(None, Some(r.end))
    }
}

impl From<RangeFull> for Span {
    fn from(_: RangeFull) -> Self {
        Span::full()
    }
}

/// A single index selects one row or column.
impl From<isize> for Span {
    fn from(i: isize) -> Self {
        // -1 selects the last element, whose exclusive end is the axis length
        let stop = if i == -1 { None } else { Some(i + 1) };
        Span::new(Some(i), stop)
    }
}

/// A 2D region in (rows, cols) order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Roi {
    pub rows: Span,
    pub cols: Span,
}

impl Roi {
    pub fn new(rows: impl Into<Span>, cols: impl Into<Span>) -> Self {
        Self {
            rows: rows.into(),
            cols: cols.into(),
        }
    }
}

/// Rows only; all columns are kept.
impl From<Span> for Roi {
    fn from(rows: Span) -> Self {
        Roi::new(rows, Span::full())
    }
}

impl From<Range<isize>> for Roi {
    fn from(rows: Range<isize>) -> Self {
        Span::from(rows).into()
    }
}

impl From<RangeFull> for Roi {
    fn from(_: RangeFull) -> Self {
        Roi::default()
    }
}

impl From<isize> for Roi {
    fn from(row: isize) -> Self {
        Span::from(row).into()
    }
}

impl<R: Into<Span>, C: Into<Span>> From<(R, C)> for Roi {
    fn from((rows, cols): (R, C)) -> Self {
        Roi::new(rows, cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_span_covers_axis() {
        assert_eq!(Span::full().resolve(7).unwrap(), (0, 7));
        assert_eq!(Span::from(2isize..).resolve(7).unwrap(), (2, 5));
        assert_eq!(Span::from(..3isize).resolve(7).unwrap(), (0, 3));
    }

    #[test]
    fn test_negative_indices_wrap() {
        assert_eq!(Span::from(-3isize..-1).resolve(10).unwrap(), (7, 2));
        assert_eq!(Span::from(-1isize).resolve(10).unwrap(), (9, 1));
    }

    #[test]
    fn test_inverted_span_is_empty() {
        assert_eq!(Span::from(5isize..2).resolve(10).unwrap(), (5, 0));
    }

    #[test]
    fn test_not_clamped() {
        assert_eq!(Span::from(8isize..15).resolve(10).unwrap(), (8, 7));
    }

    #[test]
    fn test_step_rejected() {
        let span = Span::from(0isize..4).with_step(2);
        assert!(matches!(span.resolve(10), Err(GeoError::Unsupported(_))));
        assert!(Span::from(0isize..4).with_step(1).resolve(10).is_ok());
    }

    #[test]
    fn test_scalar_row_roi() {
        let roi = Roi::from(3isize);
        assert_eq!(roi.rows, Span::new(Some(3), Some(4)));
        assert_eq!(roi.cols, Span::full());
    }
}
