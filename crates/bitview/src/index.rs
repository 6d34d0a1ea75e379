//! Index expressions and the arithmetic that resolves them against a view's shape and strides.
//!
//! An index expression is a slice of [Index] entries matched left to right against the
//! dimensions of a view. Missing trailing entries select the whole dimension.

use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::{
    errors::{Result, ViewError},
    shape::{Shape, Strides},
};

/// Stop value meaning "no upper bound"; resolves to the axis length.
pub const NO_UPPER_BOUND: isize = isize::MAX;

/// One entry of an index expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index {
    /// Selects a single position and drops the dimension. Negative values count from the end.
    Point(isize),
    /// Selects a strided run of positions and keeps the dimension.
    Range(SliceSpec),
}

/// Start, stop and step of a range index; unset fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SliceSpec {
    /// Defaults to 0. Negative values wrap modulo the axis length.
    pub start: Option<isize>,
    /// Defaults to the axis length. Negative values wrap modulo the axis length.
    pub stop: Option<isize>,
    /// Defaults to 1. Must be positive.
    pub step: Option<isize>,
}

impl SliceSpec {
    pub fn full() -> Self {
        Self::default()
    }

    pub fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        Self { start, stop, step }
    }

    pub fn with_step(mut self, step: isize) -> Self {
        self.step = Some(step);
        self
    }
}

impl From<isize> for Index {
    fn from(i: isize) -> Self {
        Index::Point(i)
    }
}

impl From<SliceSpec> for Index {
    fn from(spec: SliceSpec) -> Self {
        Index::Range(spec)
    }
}

impl From<Range<isize>> for Index {
    fn from(r: Range<isize>) -> Self {
        Index::Range(SliceSpec::new(Some(r.start), Some(r.end), None))
    }
}

impl From<RangeFrom<isize>> for Index {
    fn from(r: RangeFrom<isize>) -> Self {
        Index::Range(SliceSpec::new(Some(r.start), None, None))
    }
}

impl From<RangeTo<isize>> for Index {
    fn from(r: RangeTo<isize>) -> Self {
        Index::Range(SliceSpec::new(None, Some(r.end), None))
    }
}

impl From<RangeFull> for Index {
    fn from(_: RangeFull) -> Self {
        Index::Range(SliceSpec::full())
    }
}

/// Builds an index expression array from integers and ranges.
///
/// ```
/// use bitview::{ix, index::Index};
///
/// let expr = ix![1, .., 8..16];
/// assert_eq!(expr[0], Index::Point(1));
/// ```
#[macro_export]
macro_rules! ix {
    ($($index:expr),* $(,)?) => {
        [$($crate::index::Index::from($index)),*]
    };
}

/// Offset, shape and strides after applying an index expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Absolute bit offset of the result's logical index 0.
    pub bit_offset: usize,
    pub shape: Shape,
    pub strides: Strides,
}

/// Applies `indices` to a view described by `bit_offset`, `shape` and `strides`.
///
/// `len_bits` is the size of the backing storage; it is only reported when the resulting offset
/// or strides cannot be represented.
pub fn resolve(
    bit_offset: usize,
    shape: &Shape,
    strides: &Strides,
    indices: &[Index],
    len_bits: usize,
) -> Result<Resolved> {
    if indices.len() > shape.rank() {
        return Err(ViewError::InvalidIndex("more indices than dimensions"));
    }

    let overflow = ViewError::OutOfBounds {
        bit: usize::MAX,
        len_bits,
    };
    let full = Index::Range(SliceSpec::full());
    let mut offset = bit_offset;
    let mut new_shape = Shape::default();
    let mut new_strides = Strides::default();

    for (dim, (&length, &stride)) in shape.iter().zip(strides.iter()).enumerate() {
        match indices.get(dim).unwrap_or(&full) {
            Index::Point(i) => {
                offset = point(*i, length)?
                    .checked_mul(stride)
                    .and_then(|bits| offset.checked_add(bits))
                    .ok_or_else(|| overflow.clone())?;
            }
            Index::Range(spec) => {
                let (start, new_length, step) = range(spec, length)?;
                offset = start
                    .checked_mul(stride)
                    .and_then(|bits| offset.checked_add(bits))
                    .ok_or_else(|| overflow.clone())?;
                new_shape.push(new_length);
                new_strides.push(step.checked_mul(stride).ok_or_else(|| overflow.clone())?);
            }
        }
    }

    log::trace!(
        "resolved {:?} to offset {} shape {:?} strides {:?}",
        indices,
        offset,
        new_shape,
        new_strides
    );

    Ok(Resolved {
        bit_offset: offset,
        shape: new_shape,
        strides: new_strides,
    })
}

/// Number of bits between the first and last reachable bit, inclusive. Zero if any axis is empty.
///
/// `None` if the distance does not fit in `usize`.
pub fn reachable_bits(shape: &Shape, strides: &Strides) -> Option<usize> {
    if shape.iter().any(|&d| d == 0) {
        return Some(0);
    }

    let mut max_bits = 0usize;
    for (&d, &s) in shape.iter().zip(strides.iter()) {
        max_bits = max_bits.checked_add((d - 1).checked_mul(s)?)?;
    }

    max_bits.checked_add(1)
}

/// Number of bytes a view starting at `bit_offset` must cover to reach every addressable bit.
///
/// `None` if the span does not fit in `usize`.
pub fn byte_span(bit_offset: usize, shape: &Shape, strides: &Strides) -> Option<usize> {
    match reachable_bits(shape, strides)? {
        0 => Some(0),
        bits => Some((bit_offset % 8).checked_add(bits)?.div_ceil(8)),
    }
}

fn signed_length(length: usize) -> Result<isize> {
    isize::try_from(length).map_err(|_| ViewError::InvalidIndex("axis length exceeds isize"))
}

/// Validates a point index and wraps it into `0..length`.
fn point(index: isize, length: usize) -> Result<usize> {
    let len = signed_length(length)?;
    if index > len - 1 || index < -len {
        return Err(ViewError::IndexOutOfRange { index, length });
    }

    Ok(index.rem_euclid(len) as usize)
}

/// Normalizes a range index into `(start offset, new length, step)`.
fn range(spec: &SliceSpec, length: usize) -> Result<(usize, usize, usize)> {
    let len = signed_length(length)?;

    let step = match spec.step {
        None => 1,
        Some(step) if step > 0 => step,
        Some(_) => return Err(ViewError::InvalidIndex("slice step must be positive")),
    };

    if len == 0 {
        return Ok((0, 0, step as usize));
    }

    let start = match spec.start {
        None => 0,
        Some(start) if start < 0 => start.rem_euclid(len),
        Some(start) => start,
    };

    let stop = match spec.stop {
        None | Some(NO_UPPER_BOUND) => len,
        Some(stop) if stop < 0 => stop.rem_euclid(len),
        Some(stop) => stop,
    };

    let new_length = if stop > start { (stop - start) / step } else { 0 };

    Ok((
        start.rem_euclid(len) as usize,
        new_length as usize,
        step as usize,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_layout() -> (Shape, Strides) {
        (Shape::from([10, 8]), Strides::from([8, 1]))
    }

    #[test]
    fn test_point_drops_dimension() {
        let (shape, strides) = record_layout();
        let resolved = resolve(0, &shape, &strides, &ix![3], 80).unwrap();
        assert_eq!(resolved.bit_offset, 24);
        assert_eq!(resolved.shape, Shape::from([8]));
        assert_eq!(resolved.strides, Strides::from([1]));
    }

    #[test]
    fn test_negative_point_wraps() {
        let (shape, strides) = record_layout();
        let resolved = resolve(0, &shape, &strides, &ix![-1, -1], 80).unwrap();
        assert_eq!(resolved.bit_offset, 9 * 8 + 7);
        assert!(resolved.shape.is_empty());
    }

    #[test]
    fn test_point_out_of_range() {
        let (shape, strides) = record_layout();
        assert_eq!(
            resolve(0, &shape, &strides, &ix![10], 80).unwrap_err(),
            ViewError::IndexOutOfRange {
                index: 10,
                length: 10
            }
        );
        assert_eq!(
            resolve(0, &shape, &strides, &ix![0, -9], 80).unwrap_err(),
            ViewError::IndexOutOfRange {
                index: -9,
                length: 8
            }
        );
    }

    #[test]
    fn test_range_with_step() {
        let (shape, strides) = record_layout();
        let step = Index::from(SliceSpec::new(Some(1), None, Some(2)));
        let resolved = resolve(0, &shape, &strides, &[Index::from(..), step], 80).unwrap();
        assert_eq!(resolved.bit_offset, 1);
        assert_eq!(resolved.shape, Shape::from([10, 3]));
        assert_eq!(resolved.strides, Strides::from([8, 2]));
    }

    #[test]
    fn test_range_negative_bounds() {
        let (shape, strides) = record_layout();
        let resolved = resolve(0, &shape, &strides, &ix![-4..-1], 80).unwrap();
        assert_eq!(resolved.bit_offset, 48);
        assert_eq!(resolved.shape, Shape::from([3, 8]));
    }

    #[test]
    fn test_unbounded_stop_sentinel() {
        let (shape, strides) = record_layout();
        let resolved = resolve(0, &shape, &strides, &ix![2..NO_UPPER_BOUND], 80).unwrap();
        assert_eq!(resolved.shape, Shape::from([8, 8]));
    }

    #[test]
    fn test_empty_range() {
        let (shape, strides) = record_layout();
        let resolved = resolve(0, &shape, &strides, &ix![5..2], 80).unwrap();
        assert_eq!(resolved.shape, Shape::from([0, 8]));
        assert_eq!(reachable_bits(&resolved.shape, &resolved.strides), Some(0));
    }

    #[test]
    fn test_invalid_indices() {
        let (shape, strides) = record_layout();
        assert_eq!(
            resolve(0, &shape, &strides, &ix![0, 0, 0], 80).unwrap_err(),
            ViewError::InvalidIndex("more indices than dimensions")
        );
        let zero_step = Index::from(SliceSpec::full().with_step(0));
        assert!(matches!(
            resolve(0, &shape, &strides, &[zero_step], 80),
            Err(ViewError::InvalidIndex(_))
        ));
    }

    #[test]
    fn test_byte_span_accounts_for_bit_offset() {
        let shape = Shape::from([2]);
        let strides = Strides::from([1]);
        assert_eq!(byte_span(0, &shape, &strides), Some(1));
        assert_eq!(byte_span(7, &shape, &strides), Some(2));
    }

    #[test]
    fn test_offset_overflow_is_out_of_bounds() {
        let shape = Shape::from([3]);
        let strides = Strides::from([usize::MAX / 2 + 1]);
        assert_eq!(
            resolve(0, &shape, &strides, &ix![2], 8).unwrap_err(),
            ViewError::OutOfBounds {
                bit: usize::MAX,
                len_bits: 8
            }
        );
        assert!(matches!(
            resolve(0, &shape, &strides, &[SliceSpec::new(Some(0), None, Some(2)).into()], 8),
            Err(ViewError::OutOfBounds { .. })
        ));
        assert_eq!(reachable_bits(&shape, &strides), None);
        assert_eq!(byte_span(7, &Shape::from([2]), &Strides::from([usize::MAX])), None);
    }

    #[test]
    fn test_reachable_bits_broadcast() {
        let shape = Shape::from([4, 8]);
        let strides = Strides::from([0, 1]);
        assert_eq!(reachable_bits(&shape, &strides), Some(8));
    }
}
