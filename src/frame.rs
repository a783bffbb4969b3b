//! Frame-of-Reference: values stored as fixed-width offsets from the minimum.
//!
//! Wire layout: `[min: tagged][offset width: u8][count: tagged][offsets]`,
//! each offset `count × width` bytes little-endian.

use crate::error::{need, need_out, CodecError};
use crate::tagged;
use crate::width::{self, Width};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForMeta {
    pub min: u64,
    pub max: u64,
    pub offset_width: Width,
    pub count: usize,
    pub encoded_size: usize,
}

pub fn analyze(values: &[u64]) -> ForMeta {
    let (min, max) = values
        .iter()
        .copied()
        .min()
        .zip(values.iter().copied().max())
        .unwrap_or((0, 0));
    let offset_width = width::width_of(max - min);
    let count = values.len();
    ForMeta {
        min,
        max,
        offset_width,
        count,
        encoded_size: tagged::len(min) + 1 + tagged::len(count as u64) + count * offset_width.bytes(),
    }
}

pub fn size(values: &[u64]) -> usize {
    analyze(values).encoded_size
}

pub fn encode(dst: &mut [u8], values: &[u64]) -> Result<usize, CodecError> {
    let meta = analyze(values);
    need(meta.encoded_size, dst.len())?;

    let mut pos = 0;
    tagged::write_at(dst, &mut pos, meta.min)?;
    dst[pos] = meta.offset_width as u8;
    pos += 1;
    tagged::write_at(dst, &mut pos, meta.count as u64)?;
    let w = meta.offset_width.bytes();
    for &v in values {
        width::put_unchecked_len(&mut dst[pos..], v - meta.min, w);
        pos += w;
    }
    Ok(pos)
}

struct Header {
    min: u64,
    width: Width,
    count: usize,
    body: usize,
}

fn header(src: &[u8]) -> Result<Header, CodecError> {
    let mut pos = 0;
    let min = tagged::read_at(src, &mut pos)?;
    let raw = *src.get(pos).ok_or(CodecError::Truncated { offset: pos })?;
    let width = Width::from_bytes(raw as usize)
        .ok_or_else(|| CodecError::Malformed(format!("FOR offset width {raw}")))?;
    pos += 1;
    let count = tagged::read_at(src, &mut pos)?;
    let count = usize::try_from(count)
        .map_err(|_| CodecError::Malformed(format!("FOR count {count}")))?;
    Ok(Header {
        min,
        width,
        count,
        body: pos,
    })
}

/// Decodes into `out`; returns the element count.
pub fn decode(src: &[u8], out: &mut [u64]) -> Result<usize, CodecError> {
    let h = header(src)?;
    need_out(h.count, out.len())?;
    let w = h.width.bytes();
    let end = h
        .count
        .checked_mul(w)
        .and_then(|n| n.checked_add(h.body))
        .ok_or_else(|| CodecError::Malformed("FOR body length overflows".into()))?;
    if src.len() < end {
        return Err(CodecError::Truncated { offset: src.len() });
    }
    for (slot, chunk) in out.iter_mut().zip(src[h.body..end].chunks_exact(w)) {
        *slot = h.min.wrapping_add(width::get_len(chunk, w));
    }
    Ok(h.count)
}

/// Random access; `None` past the end or on a malformed header.
pub fn get_at(src: &[u8], i: usize) -> Option<u64> {
    let h = header(src).ok()?;
    if i >= h.count {
        return None;
    }
    let w = h.width.bytes();
    let off = h.body + i * w;
    let chunk = src.get(off..off + w)?;
    Some(h.min.wrapping_add(width::get_len(chunk, w)))
}

/// Header fields of an encoded stream. `max` is not stored and is reported
/// as the largest value the width could hold.
pub fn read_meta(src: &[u8]) -> Result<ForMeta, CodecError> {
    let h = header(src)?;
    Ok(ForMeta {
        min: h.min,
        max: h.min.saturating_add(h.width.max_value()),
        offset_width: h.width,
        count: h.count,
        encoded_size: h.body + h.count * h.width.bytes(),
    })
}

pub fn min_value(src: &[u8]) -> Result<u64, CodecError> {
    header(src).map(|h| h.min)
}

pub fn count(src: &[u8]) -> Result<usize, CodecError> {
    header(src).map(|h| h.count)
}

pub fn offset_width(src: &[u8]) -> Result<Width, CodecError> {
    header(src).map(|h| h.width)
}
