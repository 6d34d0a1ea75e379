//! # bitview
//!
//! Bit-addressable, multidimensional strided views over packed binary data.
//!
//! A [view::BitView] addresses individual bits of a shared byte buffer through an offset, a
//! shape and per-dimension strides measured in bits. Indexing and slicing produce new views over
//! the same storage without copying; materializing reads the addressed bits out as booleans or
//! as fixed-width unsigned, signed or floating-point fields. Bit 0 of a byte is its least
//! significant bit.
//!
//! [record::Records] wraps a buffer of fixed-size records and [channel::ChannelMap] decodes named
//! logic and analog channels out of it.
//!
//! ## Example
//!
//! ```
//! use bitview::{ix, view::BitView};
//!
//! // Ten one-byte records holding 0..10.
//! let bytes: Vec<u8> = (0..10).collect();
//! let view = BitView::new(bytes, 0, [10, 8], [8, 1]).unwrap();
//!
//! assert!(view.bit(&[1, 0]).unwrap());
//!
//! let low_nibbles = view.slice(&ix![.., 0..4]).unwrap();
//! let values = low_nibbles.to_unsigned().unwrap();
//! assert_eq!(values.as_slice(), &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
//! ```

pub mod array;
pub mod bits;
pub mod channel;
pub mod errors;
pub mod index;
pub mod materialize;
pub mod record;
#[cfg(feature = "serde")]
pub mod serde;
pub mod shape;
pub mod storage;
pub mod view;
