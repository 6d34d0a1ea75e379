//! Shared, read-only backing storage for views.

use std::{ops::Range, sync::Arc};

/// A window into a reference-counted byte buffer.
///
/// Cloning a `Buffer` or narrowing it with [Buffer::window] never copies the bytes.
#[derive(Clone)]
pub struct Buffer {
    bytes: Arc<[u8]>,
    range: Range<usize>,
}

impl Buffer {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes = bytes.into();
        let range = 0..bytes.len();
        Self { bytes, range }
    }

    /// The bytes visible through this window.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[self.range.clone()]
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    pub fn len_bits(&self) -> usize {
        self.len() * 8
    }

    /// Narrows to `len` bytes starting at `start`, relative to this window.
    /// Returns `None` if the requested window does not fit.
    pub fn window(&self, start: usize, len: usize) -> Option<Buffer> {
        let end = start.checked_add(len)?;
        if end > self.len() {
            return None;
        }

        Some(Buffer {
            bytes: Arc::clone(&self.bytes),
            range: self.range.start + start..self.range.start + end,
        })
    }

    /// True if both windows share the same underlying allocation.
    pub fn shares_allocation(&self, other: &Buffer) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.len())
            .field("range", &self.range)
            .finish()
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(bytes: Vec<u8>) -> Self {
        Buffer::new(bytes)
    }
}

impl From<&[u8]> for Buffer {
    fn from(bytes: &[u8]) -> Self {
        Buffer::new(bytes)
    }
}
