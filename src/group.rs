//! Group varint: up to 64 values sharing a 2-bit-per-field width bitmap.
//!
//! Layout: `[count: u8][bitmap: ceil(count/4) bytes][fields...]`. Field `i`
//! has its code at bit `2i` of the bitmap (`00 -> 1B, 01 -> 2B, 10 -> 4B,
//! 11 -> 8B`) and is stored little-endian at that width.

use crate::error::{need, need_out, CodecError};
use crate::width::{self, Width};

/// Maximum number of fields in one group.
pub const MAX_FIELDS: usize = 64;

#[inline]
fn bitmap_len(count: usize) -> usize {
    (2 * count).div_ceil(8)
}

#[inline]
fn code_for(w: Width) -> u8 {
    match w.snap_group() {
        Width::W1 => 0,
        Width::W2 => 1,
        Width::W4 => 2,
        _ => 3,
    }
}

#[inline]
fn width_for(code: u8) -> usize {
    1usize << (code & 0b11)
}

#[inline]
fn field_code(bitmap: &[u8], i: usize) -> u8 {
    (bitmap[i / 4] >> ((i % 4) * 2)) & 0b11
}

fn check_count(count: usize) -> Result<(), CodecError> {
    if count == 0 || count > MAX_FIELDS {
        return Err(CodecError::InvalidCount {
            count,
            max: MAX_FIELDS,
        });
    }
    Ok(())
}

/// Predicted encoded size of `values`.
pub fn size(values: &[u64]) -> Result<usize, CodecError> {
    check_count(values.len())?;
    let fields: usize = values
        .iter()
        .map(|&v| width::width_of(v).snap_group().bytes())
        .sum();
    Ok(1 + bitmap_len(values.len()) + fields)
}

/// Encodes `values` (1..=64 of them) into `dst`; returns bytes written.
pub fn encode(dst: &mut [u8], values: &[u64]) -> Result<usize, CodecError> {
    let total = size(values)?;
    need(total, dst.len())?;

    let count = values.len();
    let blen = bitmap_len(count);
    dst[0] = count as u8;
    let (bitmap, fields) = dst[1..total].split_at_mut(blen);
    bitmap.fill(0);

    let mut off = 0;
    for (i, &v) in values.iter().enumerate() {
        let code = code_for(width::width_of(v));
        bitmap[i / 4] |= code << ((i % 4) * 2);
        let w = width_for(code);
        width::put_unchecked_len(&mut fields[off..], v, w);
        off += w;
    }
    Ok(total)
}

/// Stored field count, if the header is valid.
pub fn count(src: &[u8]) -> Option<usize> {
    let count = *src.first()? as usize;
    check_count(count).ok()?;
    Some(count)
}

/// Total encoded size, computed from the header and bitmap alone.
pub fn get_size(src: &[u8]) -> Result<usize, CodecError> {
    let count = src.first().copied().ok_or(CodecError::Truncated { offset: 0 })? as usize;
    check_count(count)?;
    let blen = bitmap_len(count);
    let bitmap = src
        .get(1..1 + blen)
        .ok_or(CodecError::Truncated { offset: src.len() })?;
    let fields: usize = (0..count).map(|i| width_for(field_code(bitmap, i))).sum();
    Ok(1 + blen + fields)
}

/// Decodes a group into `out`; returns the number of values.
pub fn decode(src: &[u8], out: &mut [u64]) -> Result<usize, CodecError> {
    let total = get_size(src)?;
    if src.len() < total {
        return Err(CodecError::Truncated { offset: src.len() });
    }
    let count = src[0] as usize;
    need_out(count, out.len())?;

    let blen = bitmap_len(count);
    let bitmap = &src[1..1 + blen];
    let mut off = 1 + blen;
    for (i, slot) in out.iter_mut().take(count).enumerate() {
        let w = width_for(field_code(bitmap, i));
        *slot = width::get_len(&src[off..], w);
        off += w;
    }
    Ok(count)
}

/// Width of field `i`, or `None` if `i` is out of range.
pub fn field_width(src: &[u8], i: usize) -> Option<Width> {
    let count = count(src)?;
    if i >= count {
        return None;
    }
    let bitmap = src.get(1..1 + bitmap_len(count))?;
    Width::from_bytes(width_for(field_code(bitmap, i)))
}

/// Random access to field `i`. Walks the widths of the preceding fields.
pub fn get_field(src: &[u8], i: usize) -> Option<u64> {
    let count = count(src)?;
    if i >= count {
        return None;
    }
    let blen = bitmap_len(count);
    let bitmap = src.get(1..1 + blen)?;
    let off: usize = 1 + blen + (0..i).map(|j| width_for(field_code(bitmap, j))).sum::<usize>();
    let w = width_for(field_code(bitmap, i));
    let field = src.get(off..off + w)?;
    Some(width::get_len(field, w))
}
