//! Conversion of views into concrete boolean and numeric values.
//!
//! Numeric conversions treat the innermost dimension of a view as a field: the bit at field
//! index 0 is the least significant bit of the value, so a byte-aligned field spanning several
//! bytes decodes as little-endian.

use crate::{
    array::Array,
    bits::{self, assemble_lsb, sign_extend},
    errors::{Result, ViewError},
    shape::{Shape, Strides},
    view::BitView,
};

/// A fixed-width numeric type a field can be reinterpreted as.
pub trait FieldType: Copy {
    /// Field width in bits.
    const BITS: usize;

    /// Reinterprets the low `BITS` bits of `raw`.
    fn from_field(raw: u64) -> Self;
}

macro_rules! impl_field_type {
    ($($ty:ty),*) => {
        $(
            impl FieldType for $ty {
                const BITS: usize = <$ty>::BITS as usize;

                fn from_field(raw: u64) -> Self {
                    raw as $ty
                }
            }
        )*
    };
}

impl_field_type!(u8, u16, u32, u64, i8, i16, i32, i64);

impl FieldType for f32 {
    const BITS: usize = 32;

    fn from_field(raw: u64) -> Self {
        f32::from_bits(raw as u32)
    }
}

impl FieldType for f64 {
    const BITS: usize = 64;

    fn from_field(raw: u64) -> Self {
        f64::from_bits(raw)
    }
}

impl BitView {
    /// Reads every addressed bit into an array shaped like the view.
    ///
    /// Zero strides replicate a bit along their axis. Fails with [ViewError::OutOfBounds] if the
    /// view reaches past its storage.
    pub fn to_bits(&self) -> Result<Array<bool>> {
        let unpacked = bits::unpack_bits(self.storage().as_bytes());
        let shape = self.shape().clone();
        let strides = self.strides();
        let rank = shape.rank();
        let count = shape.numel();

        let mut out = Vec::with_capacity(count);
        if count == 0 {
            return Ok(Array::from_parts(shape, out));
        }

        let mut index = vec![0usize; rank];
        'read: loop {
            let pos = index
                .iter()
                .zip(strides.iter())
                .try_fold(self.bit_offset(), |pos, (&i, &s)| {
                    i.checked_mul(s).and_then(|bits| pos.checked_add(bits))
                })
                .unwrap_or(usize::MAX);

            let bit = *unpacked.get(pos).ok_or(ViewError::OutOfBounds {
                bit: pos,
                len_bits: unpacked.len(),
            })?;
            out.push(bit);

            let mut dim = rank;
            loop {
                if dim == 0 {
                    break 'read;
                }
                dim -= 1;
                index[dim] += 1;
                if index[dim] < shape[dim] {
                    break;
                }
                index[dim] = 0;
            }
        }

        Ok(Array::from_parts(shape, out))
    }

    /// Packs each innermost field into a raw integer. `accepts` decides which widths are valid.
    fn fields(&self, accepts: impl Fn(usize) -> bool) -> Result<(Shape, usize, Vec<u64>)> {
        let width = self
            .shape()
            .last()
            .ok_or(ViewError::UnsupportedWidth { bits: 0 })?;

        if width == 0 || width > 64 || !accepts(width) {
            return Err(ViewError::UnsupportedWidth { bits: width });
        }

        let bits = self.to_bits()?;
        let raw = bits.as_slice().chunks(width).map(assemble_lsb).collect();

        Ok((self.shape().outer(), width, raw))
    }

    /// Decodes each innermost field as exactly one `T`. The field width must equal `T::BITS`.
    pub fn to_typed<T: FieldType>(&self) -> Result<Array<T>> {
        let (shape, _, raw) = self.fields(|width| width == T::BITS)?;
        Ok(Array::from_parts(
            shape,
            raw.into_iter().map(T::from_field).collect(),
        ))
    }

    /// Decodes each innermost field (1 to 64 bits wide) as an unsigned integer.
    pub fn to_unsigned(&self) -> Result<Array<u64>> {
        let (shape, _, raw) = self.fields(|_| true)?;
        Ok(Array::from_parts(shape, raw))
    }

    /// Decodes each innermost field (1 to 64 bits wide) as a two's-complement signed integer.
    pub fn to_signed(&self) -> Result<Array<i64>> {
        let (shape, width, raw) = self.fields(|_| true)?;
        Ok(Array::from_parts(
            shape,
            raw.into_iter().map(|v| sign_extend(v, width)).collect(),
        ))
    }

    /// Decodes each innermost field as an IEEE 754 float. Only 32- and 64-bit fields are
    /// supported; single precision values are widened.
    pub fn to_float(&self) -> Result<Array<f64>> {
        let (shape, width, raw) = self.fields(|width| width == 32 || width == 64)?;
        let values = raw
            .into_iter()
            .map(|v| match width {
                32 => f32::from_field(v) as f64,
                _ => f64::from_field(v),
            })
            .collect();

        Ok(Array::from_parts(shape, values))
    }

    /// Copies the addressed bits into new storage laid out row-major with `new_shape`.
    ///
    /// The element count of `new_shape` must equal [BitView::len].
    pub fn reshape(&self, new_shape: impl Into<Shape>) -> Result<BitView> {
        let new_shape = new_shape.into();
        let len = self.len()?;

        if new_shape.numel() != len {
            return Err(ViewError::InvalidArgument(
                "reshape must preserve the number of bits",
            ));
        }

        let bits = self.to_bits()?;
        let packed = bits::pack_bits(bits.as_slice());
        log::debug!(
            "reshape {:?} -> {:?}: repacked {} bits into {} bytes",
            self.shape(),
            new_shape,
            len,
            packed.len()
        );

        let strides = Strides::row_major(&new_shape);
        BitView::new(packed, 0, new_shape, strides)
    }
}
