//! Error type shared by view construction, index resolution and materialization.

/// Errors produced when resolving indices on, or materializing values from, a [crate::view::BitView].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// A point index lies outside `[-length, length - 1]`.
    #[error("index {index} out of range for axis of length {length}")]
    IndexOutOfRange { index: isize, length: usize },
    /// The index expression cannot be applied to the view.
    #[error("invalid index: {0}")]
    InvalidIndex(&'static str),
    /// An argument is inconsistent with the data it describes.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The field width has no matching fixed-width numeric type.
    #[error("unsupported field width of {bits} bits")]
    UnsupportedWidth { bits: usize },
    /// An element count was requested on a zero-dimensional view.
    #[error("zero-dimensional view has no element count")]
    InvalidShape,
    /// Shape and strides have different lengths.
    #[error("shape has {shape} dimensions but strides have {strides}")]
    ShapeMismatch { shape: usize, strides: usize },
    /// An access would reach past the end of the backing storage.
    #[error("bit {bit} is outside storage of {len_bits} bits")]
    OutOfBounds { bit: usize, len_bits: usize },
}

pub type Result<T> = std::result::Result<T, ViewError>;
