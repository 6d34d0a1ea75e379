//! Buffers of fixed-size binary records.

use crate::{
    errors::{Result, ViewError},
    storage::Buffer,
    view::BitView,
};

/// A byte buffer split into records of `unit_size` bytes, with every bit of every record
/// individually addressable.
///
/// The root view has shape `(count, unit_size * 8)` and strides `(unit_size * 8, 1)`.
#[derive(Debug, Clone)]
pub struct Records {
    unit_size: usize,
    count: usize,
    bits: BitView,
}

impl Records {
    /// Wraps `bytes`. Fails if `unit_size` is zero or does not divide the buffer length.
    pub fn new(bytes: impl Into<Buffer>, unit_size: usize) -> Result<Self> {
        let storage = bytes.into();

        if unit_size == 0 {
            return Err(ViewError::InvalidArgument("unit size must be non-zero"));
        }
        if storage.len() % unit_size != 0 {
            return Err(ViewError::InvalidArgument(
                "buffer length is not a multiple of unit size",
            ));
        }

        let count = storage.len() / unit_size;
        let unit_bits = unit_size
            .checked_mul(8)
            .ok_or(ViewError::InvalidArgument("unit size too large"))?;
        log::debug!("wrapping {} records of {} bytes", count, unit_size);

        let bits = BitView::new(storage, 0, [count, unit_bits], [unit_bits, 1])?;
        Ok(Self {
            unit_size,
            count,
            bits,
        })
    }

    pub fn unit_size(&self) -> usize {
        self.unit_size
    }

    /// Number of records in the buffer.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Root view over all records.
    pub fn bits(&self) -> &BitView {
        &self.bits
    }

    pub fn bytes(&self) -> &[u8] {
        self.bits.storage().as_bytes()
    }
}
