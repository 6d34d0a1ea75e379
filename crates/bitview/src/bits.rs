//! Low-level bit read and manipulation utilities for byte slices.
//!
//! Bits are addressed in LSB-first order: bit 0 is the low bit of the first byte.

use crate::errors::{Result, ViewError};

/// Reads a single bit at `bit_pos` (0 = LSB of first byte).
pub fn read_bit_at(data: &[u8], bit_pos: usize) -> Result<bool> {
    let byte = data.get(bit_pos / 8).ok_or(ViewError::OutOfBounds {
        bit: bit_pos,
        len_bits: data.len() * 8,
    })?;

    Ok(byte & (1 << (bit_pos % 8)) != 0)
}

/// Expands every byte of `data` into eight bits, LSB first.
pub fn unpack_bits(data: &[u8]) -> Vec<bool> {
    let mut out = Vec::with_capacity(data.len() * 8);

    for &byte in data {
        for bit in 0..8 {
            out.push(byte & (1 << bit) != 0);
        }
    }

    out
}

/// Packs bits into bytes, LSB first. The final byte is zero-padded.
pub fn pack_bits(bits: &[bool]) -> Vec<u8> {
    let mut out = vec![0u8; bits.len().div_ceil(8)];

    for (i, &bit) in bits.iter().enumerate() {
        if bit {
            out[i / 8] |= 1 << (i % 8);
        }
    }

    out
}

/// Assembles up to 64 bits into an integer; `bits[0]` becomes the least significant bit.
pub fn assemble_lsb(bits: &[bool]) -> u64 {
    debug_assert!(bits.len() <= 64);

    bits.iter()
        .enumerate()
        .fold(0u64, |acc, (i, &bit)| acc | ((bit as u64) << i))
}

/// Sign-extends the low `bits` of `value` to a full `i64`.
pub fn sign_extend(value: u64, bits: usize) -> i64 {
    let shift = 64 - bits;
    ((value << shift) as i64) >> shift
}

/// Reverses the order of the low `n_bytes` bytes of `value`.
pub fn swap_bytes_n(value: u64, n_bytes: usize) -> u64 {
    if n_bytes == 0 {
        return 0;
    }

    value.swap_bytes() >> (64 - n_bytes * 8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bit_at() {
        let data = [0b0000_0001];
        assert!(read_bit_at(&data, 0).unwrap());
        assert!(!read_bit_at(&data, 7).unwrap());
    }

    #[test]
    fn test_read_bit_out_of_bounds() {
        let data = [0xff];
        assert_eq!(
            read_bit_at(&data, 8).unwrap_err(),
            ViewError::OutOfBounds { bit: 8, len_bits: 8 }
        );
    }

    #[test]
    fn test_unpack_bits() {
        let bits = unpack_bits(&[0b1000_0101]);
        assert_eq!(
            bits,
            vec![true, false, true, false, false, false, false, true]
        );
    }

    #[test]
    fn test_pack_bits_pads_last_byte() {
        assert_eq!(pack_bits(&[true, true, false, true]), vec![0b0000_1011]);
        assert_eq!(pack_bits(&[false; 9]), vec![0, 0]);
    }

    #[test]
    fn test_assemble_lsb() {
        assert_eq!(assemble_lsb(&[true, false, true]), 5);
        assert_eq!(assemble_lsb(&[]), 0);
    }

    #[test]
    fn test_sign_extend() {
        assert_eq!(sign_extend(0b11111111, 8), -1);
        assert_eq!(sign_extend(0b011, 3), 3);
        assert_eq!(sign_extend(0b100, 3), -4);
        assert_eq!(sign_extend(u64::MAX, 64), -1);
    }

    #[test]
    fn test_swap_bytes_n() {
        assert_eq!(swap_bytes_n(0x1234, 2), 0x3412);
        assert_eq!(swap_bytes_n(0x12, 1), 0x12);
        assert_eq!(swap_bytes_n(0x0102_0304, 4), 0x0403_0201);
    }
}
