//! Bit-addressable strided views over shared byte storage.

use crate::{
    bits,
    errors::{Result, ViewError},
    index::{self, Index},
    shape::{Shape, Strides},
    storage::Buffer,
};

/// A strided view of bits over a shared [Buffer].
///
/// Element `(i0, i1, ..)` of the view is the bit at
/// `bit_offset + i0 * strides[0] + i1 * strides[1] + ..` within the buffer, with bit 0 being
/// the least significant bit of the first byte.
///
/// Construction is lazy: a view may describe bits outside its buffer, and the error is only
/// reported when those bits are indexed or materialized.
#[derive(Clone)]
pub struct BitView {
    storage: Buffer,
    bit_offset: usize,
    shape: Shape,
    strides: Strides,
}

/// Result of indexing a view: a single bit when every dimension was point-indexed, a view
/// otherwise.
#[derive(Debug, Clone)]
pub enum Indexed {
    Bit(bool),
    View(BitView),
}

impl BitView {
    /// Creates a view. Only checks that `shape` and `strides` have the same length.
    pub fn new(
        storage: impl Into<Buffer>,
        bit_offset: usize,
        shape: impl Into<Shape>,
        strides: impl Into<Strides>,
    ) -> Result<Self> {
        let shape = shape.into();
        let strides = strides.into();

        if shape.rank() != strides.len() {
            return Err(ViewError::ShapeMismatch {
                shape: shape.rank(),
                strides: strides.len(),
            });
        }

        Ok(Self {
            storage: storage.into(),
            bit_offset,
            shape,
            strides,
        })
    }

    /// A one-dimensional view of every bit in `storage`.
    pub fn from_bytes(storage: impl Into<Buffer>) -> Self {
        let storage = storage.into();
        let len_bits = storage.len_bits();

        Self {
            storage,
            bit_offset: 0,
            shape: Shape::from([len_bits]),
            strides: Strides::from([1]),
        }
    }

    pub fn storage(&self) -> &Buffer {
        &self.storage
    }

    pub fn bit_offset(&self) -> usize {
        self.bit_offset
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn strides(&self) -> &Strides {
        &self.strides
    }

    pub fn ndim(&self) -> usize {
        self.shape.rank()
    }

    /// Total number of addressable bits. A zero-dimensional view denotes one bit, not a
    /// sequence, and has no length.
    pub fn len(&self) -> Result<usize> {
        if self.shape.is_empty() {
            return Err(ViewError::InvalidShape);
        }

        Ok(self.shape.numel())
    }

    pub fn is_empty(&self) -> bool {
        !self.shape.is_empty() && self.shape.numel() == 0
    }

    /// Applies an index expression.
    ///
    /// Point indices drop their dimension, range indices keep it; missing trailing entries select
    /// the whole dimension. The resulting view shares this view's storage, narrowed to the bytes
    /// it can reach.
    pub fn index(&self, indices: &[Index]) -> Result<Indexed> {
        let len_bits = self.storage.len_bits();
        let resolved = index::resolve(
            self.bit_offset,
            &self.shape,
            &self.strides,
            indices,
            len_bits,
        )?;

        if resolved.shape.is_empty() {
            let bit = bits::read_bit_at(self.storage.as_bytes(), resolved.bit_offset)?;
            return Ok(Indexed::Bit(bit));
        }

        let byte_offset = resolved.bit_offset / 8;
        let byte_span = index::byte_span(resolved.bit_offset, &resolved.shape, &resolved.strides)
            .ok_or(ViewError::OutOfBounds {
                bit: usize::MAX,
                len_bits,
            })?;

        // An empty result may start anywhere, including past the end of storage.
        let byte_offset = if byte_span == 0 {
            byte_offset.min(self.storage.len())
        } else {
            byte_offset
        };

        let storage = self
            .storage
            .window(byte_offset, byte_span)
            .ok_or(ViewError::OutOfBounds {
                bit: byte_offset
                    .saturating_add(byte_span)
                    .saturating_mul(8)
                    .saturating_sub(1),
                len_bits,
            })?;

        Ok(Indexed::View(BitView {
            storage,
            bit_offset: resolved.bit_offset % 8,
            shape: resolved.shape,
            strides: resolved.strides,
        }))
    }

    /// Indexes down to a single bit. Every dimension must be point-indexed.
    pub fn bit(&self, indices: &[isize]) -> Result<bool> {
        let indices: Vec<Index> = indices.iter().copied().map(Index::Point).collect();

        match self.index(&indices)? {
            Indexed::Bit(bit) => Ok(bit),
            Indexed::View(_) => Err(ViewError::InvalidIndex("expected a single bit")),
        }
    }

    /// Indexes to a sub-view. Fails if the expression selects a single bit.
    pub fn slice(&self, indices: &[Index]) -> Result<BitView> {
        match self.index(indices)? {
            Indexed::View(view) => Ok(view),
            Indexed::Bit(_) => Err(ViewError::InvalidIndex("expected a view, got a single bit")),
        }
    }
}

impl std::fmt::Debug for BitView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitView")
            .field("storage", &self.storage)
            .field("bit_offset", &self.bit_offset)
            .field("shape", &self.shape)
            .field("strides", &self.strides)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn arange_records() -> BitView {
        let bytes: Vec<u8> = (0..10).collect();
        BitView::new(bytes, 0, [10, 8], [8, 1]).unwrap()
    }

    #[test]
    fn test_single_byte_lsb_first() {
        let view = BitView::new(vec![0b0000_0001u8], 0, [8], [1]).unwrap();
        assert!(view.bit(&[0]).unwrap());
        for i in 1..8 {
            assert!(!view.bit(&[i]).unwrap());
        }
    }

    #[test]
    fn test_record_bit() {
        let view = arange_records();
        assert!(view.bit(&[1, 0]).unwrap());
        assert!(!view.bit(&[1, 1]).unwrap());
        assert!(view.bit(&[3, 1]).unwrap());
        assert!(view.bit(&[-1, 0]).unwrap());
        assert!(view.bit(&[-1, 3]).unwrap());
    }

    #[test]
    fn test_record_row_view() {
        let view = arange_records();
        let row = view.slice(&crate::ix![0, ..]).unwrap();
        assert_eq!(row.shape(), &Shape::from([8]));
        assert_eq!(row.strides(), &Strides::from([1]));
        assert_eq!(row.storage().as_bytes(), &[0]);
        assert_eq!(
            row.to_bits().unwrap().as_slice(),
            bits::unpack_bits(&[0]).as_slice()
        );

        let row = view.slice(&crate::ix![5]).unwrap();
        assert_eq!(row.storage().as_bytes(), &[5]);
        assert!(row.bit(&[0]).unwrap());
        assert!(!row.bit(&[1]).unwrap());
        assert!(row.bit(&[2]).unwrap());
        assert_eq!(
            row.to_bits().unwrap().as_slice(),
            &[true, false, true, false, false, false, false, false]
        );
    }

    #[test]
    fn test_derived_view_shares_storage() {
        let view = arange_records();
        let column = view.slice(&crate::ix![.., 3]).unwrap();
        assert!(column.storage().shares_allocation(view.storage()));
        assert_eq!(column.shape(), &Shape::from([10]));
        assert_eq!(column.strides(), &Strides::from([8]));
        assert_eq!(column.bit_offset(), 3);
        assert_eq!(column.storage().len(), 10);
    }

    #[test]
    fn test_unaligned_field_span() {
        let view = BitView::from_bytes(vec![0xffu8, 0x01]);
        let field = view.slice(&crate::ix![7..9]).unwrap();
        assert_eq!(field.bit_offset(), 7);
        assert_eq!(field.storage().len(), 2);
        assert!(field.bit(&[0]).unwrap());
        assert!(field.bit(&[1]).unwrap());
    }

    #[test]
    fn test_lazy_validation() {
        let view = BitView::new(vec![0u8; 2], 0, [4, 8], [8, 1]).unwrap();
        assert!(view.slice(&crate::ix![1]).is_ok());
        assert_eq!(
            view.bit(&[2, 0]).unwrap_err(),
            ViewError::OutOfBounds {
                bit: 16,
                len_bits: 16
            }
        );
        assert!(matches!(
            view.slice(&crate::ix![3]),
            Err(ViewError::OutOfBounds { .. })
        ));
        assert!(matches!(
            view.slice(&crate::ix![..]),
            Err(ViewError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_huge_stride_is_out_of_bounds() {
        let view = BitView::new(vec![1u8], 0, [3], [usize::MAX / 2 + 1]).unwrap();
        assert!(view.bit(&[0]).unwrap());
        assert!(matches!(
            view.bit(&[2]),
            Err(ViewError::OutOfBounds { len_bits: 8, .. })
        ));
        assert!(matches!(
            view.slice(&crate::ix![1..]),
            Err(ViewError::OutOfBounds { .. })
        ));
        assert!(matches!(
            view.slice(&crate::ix![..]),
            Err(ViewError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_shape_mismatch() {
        assert_eq!(
            BitView::new(vec![0u8], 0, [1, 8], [8]).unwrap_err(),
            ViewError::ShapeMismatch {
                shape: 2,
                strides: 1
            }
        );
    }

    #[test]
    fn test_len() {
        let view = arange_records();
        assert_eq!(view.len().unwrap(), 80);
        let scalar = BitView::new(vec![1u8], 0, Shape::default(), Strides::default()).unwrap();
        assert_eq!(scalar.len().unwrap_err(), ViewError::InvalidShape);
        assert!(scalar.bit(&[]).unwrap());
    }

    #[test]
    fn test_kind_mismatch() {
        let view = arange_records();
        assert!(matches!(view.bit(&[0]), Err(ViewError::InvalidIndex(_))));
        assert!(matches!(
            view.slice(&crate::ix![0, 0]),
            Err(ViewError::InvalidIndex(_))
        ));
    }

    #[test]
    fn test_empty_slice() {
        let view = arange_records();
        let empty = view.slice(&crate::ix![5..2]).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.storage().len(), 0);
    }

    proptest! {
        #[test]
        fn point_index_wraps(bytes in prop::collection::vec(any::<u8>(), 1..16), seed in any::<isize>()) {
            let view = BitView::from_bytes(bytes);
            let len = view.len().unwrap() as isize;
            let i = seed.rem_euclid(2 * len) - len;
            prop_assert_eq!(view.bit(&[i]).unwrap(), view.bit(&[i.rem_euclid(len)]).unwrap());
        }

        #[test]
        fn point_index_out_of_range(bytes in prop::collection::vec(any::<u8>(), 1..16), extra in 0isize..64) {
            let view = BitView::from_bytes(bytes);
            let len = view.len().unwrap() as isize;
            let is_out_of_range = |r: Result<bool>| matches!(r, Err(ViewError::IndexOutOfRange { .. }));
            prop_assert!(is_out_of_range(view.bit(&[len + extra])));
            prop_assert!(is_out_of_range(view.bit(&[-len - 1 - extra])));
        }

        #[test]
        fn full_slice_then_index(bytes in prop::collection::vec(any::<u8>(), 1..16)) {
            let view = BitView::from_bytes(bytes);
            let all = view.slice(&crate::ix![..]).unwrap();
            let len = view.len().unwrap() as isize;
            for i in -len..len {
                prop_assert_eq!(all.bit(&[i]).unwrap(), view.bit(&[i]).unwrap());
            }
        }
    }
}
