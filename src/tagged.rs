//! Tagged varint: a self-delimiting 1..=9 byte encoding of a `u64`.
//!
//! The count of leading zero bits in the first byte gives the total length
//! `n = lz + 1`. For `n <= 8` the first byte carries a single marker bit at
//! position `8 - n` and the low `8 - n` payload bits under it; the remaining
//! `n - 1` bytes carry the rest of the value little-endian. A first byte of
//! `0x00` introduces a full 8-byte little-endian payload.

use crate::error::{need, CodecError};

/// Longest encoding in bytes.
pub const MAX_LEN: usize = 9;

/// Encoded length of `v`.
#[inline]
pub fn len(v: u64) -> usize {
    let bits = 64 - v.leading_zeros() as usize;
    if bits > 56 {
        MAX_LEN
    } else {
        // n bytes carry 7n payload bits
        bits.max(1).div_ceil(7)
    }
}

/// Encoded length announced by a first byte.
#[inline]
pub fn len_from_first_byte(b0: u8) -> usize {
    b0.leading_zeros() as usize + 1
}

/// Writes `v`; returns bytes written (1..=9).
#[inline]
pub fn put(dst: &mut [u8], v: u64) -> Result<usize, CodecError> {
    let n = len(v);
    need(n, dst.len())?;
    if n == MAX_LEN {
        dst[0] = 0;
        dst[1..MAX_LEN].copy_from_slice(&v.to_le_bytes());
        return Ok(n);
    }
    let low_bits = 8 - n;
    let low_mask = (1u64 << low_bits) - 1;
    dst[0] = (0x80u8 >> (n - 1)) | (v & low_mask) as u8;
    let rest = (v >> low_bits).to_le_bytes();
    dst[1..n].copy_from_slice(&rest[..n - 1]);
    Ok(n)
}

/// Reads one value; returns `(value, bytes_read)`.
#[inline]
pub fn get(src: &[u8]) -> Result<(u64, usize), CodecError> {
    let b0 = *src.first().ok_or(CodecError::Truncated { offset: 0 })?;
    let n = len_from_first_byte(b0);
    if src.len() < n {
        return Err(CodecError::Truncated { offset: src.len() });
    }
    let mut rest = [0u8; 8];
    rest[..n - 1].copy_from_slice(&src[1..n]);
    let rest = u64::from_le_bytes(rest);
    if n == MAX_LEN {
        return Ok((rest, n));
    }
    let low_bits = 8 - n;
    let low = (b0 as u64) & ((1u64 << low_bits) - 1);
    Ok((low | (rest << low_bits), n))
}

/// Reads a value at `*pos` and advances it.
#[inline]
pub(crate) fn read_at(src: &[u8], pos: &mut usize) -> Result<u64, CodecError> {
    let tail = src.get(*pos..).ok_or(CodecError::Truncated { offset: *pos })?;
    let (v, n) = get(tail).map_err(|e| match e {
        CodecError::Truncated { offset } => CodecError::Truncated {
            offset: *pos + offset,
        },
        other => other,
    })?;
    *pos += n;
    Ok(v)
}

/// Writes a value at `*pos` and advances it.
#[inline]
pub(crate) fn write_at(dst: &mut [u8], pos: &mut usize, v: u64) -> Result<(), CodecError> {
    need(*pos + len(v), dst.len())?;
    *pos += put(&mut dst[*pos..], v)?;
    Ok(())
}
