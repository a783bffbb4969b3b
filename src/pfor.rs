//! Patched Frame-of-Reference.
//!
//! Values up to a percentile threshold are stored as narrow offsets from the
//! minimum; values above it are exceptions. Wire layout:
//!
//! ```text
//! [min: tagged][width: u8][count: tagged][count × width slots]
//! [exception count: tagged][(index: tagged, value: tagged) ...]
//! ```
//!
//! An exception's slot holds the all-ones marker for the width; decoding
//! restores it from the exception list by index, so the marker never has to
//! be distinguished from a legitimate offset.

use crate::error::{need, need_out, CodecError};
use crate::tagged;
use crate::width::{self, Width};

use serde::{Deserialize, Serialize};

/// Percentile used when none is given.
pub const DEFAULT_THRESHOLD_PERCENTILE: u32 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PforMeta {
    pub min: u64,
    pub threshold: u64,
    pub width: Width,
    pub count: usize,
    pub exception_count: usize,
    pub encoded_size: usize,
}

fn threshold_of(values: &[u64], percentile: u32) -> u64 {
    if values.is_empty() {
        return 0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let idx = (values.len() * percentile as usize / 100).min(values.len() - 1);
    sorted[idx]
}

/// Single pass over `values` at the given percentile (1..=100).
pub fn analyze(values: &[u64], percentile: u32) -> PforMeta {
    let count = values.len();
    let min = values.iter().copied().min().unwrap_or(0);
    let threshold = threshold_of(values, percentile);
    let width = width::width_of(threshold - min);

    let mut encoded_size =
        tagged::len(min) + 1 + tagged::len(count as u64) + count * width.bytes();
    let mut exception_count = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > threshold {
            exception_count += 1;
            encoded_size += tagged::len(i as u64) + tagged::len(v);
        }
    }
    encoded_size += tagged::len(exception_count as u64);

    PforMeta {
        min,
        threshold,
        width,
        count,
        exception_count,
        encoded_size,
    }
}

pub fn size(values: &[u64], percentile: u32) -> usize {
    analyze(values, percentile).encoded_size
}

pub fn encode(dst: &mut [u8], values: &[u64], percentile: u32) -> Result<usize, CodecError> {
    let meta = analyze(values, percentile);
    need(meta.encoded_size, dst.len())?;

    let marker = meta.width.max_value();
    let w = meta.width.bytes();
    let mut pos = 0;
    tagged::write_at(dst, &mut pos, meta.min)?;
    dst[pos] = meta.width as u8;
    pos += 1;
    tagged::write_at(dst, &mut pos, meta.count as u64)?;
    for &v in values {
        let slot = if v > meta.threshold { marker } else { v - meta.min };
        width::put_unchecked_len(&mut dst[pos..], slot, w);
        pos += w;
    }
    tagged::write_at(dst, &mut pos, meta.exception_count as u64)?;
    for (i, &v) in values.iter().enumerate() {
        if v > meta.threshold {
            tagged::write_at(dst, &mut pos, i as u64)?;
            tagged::write_at(dst, &mut pos, v)?;
        }
    }
    Ok(pos)
}

struct Layout {
    min: u64,
    width: Width,
    count: usize,
    slots: usize,
    exceptions: usize,
}

fn layout(src: &[u8]) -> Result<Layout, CodecError> {
    let mut pos = 0;
    let min = tagged::read_at(src, &mut pos)?;
    let raw = *src.get(pos).ok_or(CodecError::Truncated { offset: pos })?;
    let width = Width::from_bytes(raw as usize)
        .ok_or_else(|| CodecError::Malformed(format!("PFOR slot width {raw}")))?;
    pos += 1;
    let count = tagged::read_at(src, &mut pos)?;
    let count = usize::try_from(count)
        .map_err(|_| CodecError::Malformed(format!("PFOR count {count}")))?;
    let slots = pos;
    let exceptions = count
        .checked_mul(width.bytes())
        .and_then(|n| n.checked_add(slots))
        .ok_or_else(|| CodecError::Malformed("PFOR slot area overflows".into()))?;
    if src.len() < exceptions {
        return Err(CodecError::Truncated { offset: src.len() });
    }
    Ok(Layout {
        min,
        width,
        count,
        slots,
        exceptions,
    })
}

pub fn decode(src: &[u8], out: &mut [u64]) -> Result<usize, CodecError> {
    let l = layout(src)?;
    need_out(l.count, out.len())?;
    let w = l.width.bytes();
    for (slot, chunk) in out
        .iter_mut()
        .zip(src[l.slots..l.exceptions].chunks_exact(w))
    {
        *slot = l.min.wrapping_add(width::get_len(chunk, w));
    }

    let mut pos = l.exceptions;
    let n = tagged::read_at(src, &mut pos)?;
    for _ in 0..n {
        let index = tagged::read_at(src, &mut pos)?;
        let value = tagged::read_at(src, &mut pos)?;
        let index = usize::try_from(index)
            .ok()
            .filter(|&i| i < l.count)
            .ok_or_else(|| CodecError::Malformed(format!("PFOR exception index {index}")))?;
        out[index] = value;
    }
    Ok(l.count)
}

/// Random access. Only slots holding the marker consult the exception list.
pub fn get_at(src: &[u8], i: usize) -> Option<u64> {
    let l = layout(src).ok()?;
    if i >= l.count {
        return None;
    }
    let w = l.width.bytes();
    let off = l.slots + i * w;
    let slot = width::get_len(src.get(off..off + w)?, w);
    if slot != l.width.max_value() {
        return Some(l.min.wrapping_add(slot));
    }

    let mut pos = l.exceptions;
    let n = tagged::read_at(src, &mut pos).ok()?;
    for _ in 0..n {
        let index = tagged::read_at(src, &mut pos).ok()?;
        let value = tagged::read_at(src, &mut pos).ok()?;
        if index == i as u64 {
            return Some(value);
        }
    }
    Some(l.min.wrapping_add(slot))
}

/// Header fields plus the exception count. `threshold` is not stored and is
/// reported as the top of the slot range.
pub fn read_meta(src: &[u8]) -> Result<PforMeta, CodecError> {
    let l = layout(src)?;
    let mut pos = l.exceptions;
    let exception_count = tagged::read_at(src, &mut pos)?;
    let exception_count = usize::try_from(exception_count)
        .map_err(|_| CodecError::Malformed(format!("PFOR exception count {exception_count}")))?;
    for _ in 0..exception_count {
        tagged::read_at(src, &mut pos)?;
        tagged::read_at(src, &mut pos)?;
    }
    Ok(PforMeta {
        min: l.min,
        threshold: l.min.saturating_add(l.width.max_value()),
        width: l.width,
        count: l.count,
        exception_count,
        encoded_size: pos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_spikes() -> Vec<u64> {
        let mut v: Vec<u64> = (0..100).map(|i| 5_000 + i % 50).collect();
        v[17] = 9_000_000_000;
        v[63] = 123_456_789;
        v
    }

    #[test]
    fn outliers_become_exceptions() {
        let values = with_spikes();
        let meta = analyze(&values, DEFAULT_THRESHOLD_PERCENTILE);
        assert_eq!(meta.min, 5_000);
        assert_eq!(meta.width, Width::W1);
        assert_eq!(meta.exception_count, 2);

        let mut buf = vec![0u8; meta.encoded_size];
        let n = encode(&mut buf, &values, DEFAULT_THRESHOLD_PERCENTILE).unwrap();
        assert_eq!(n, meta.encoded_size);

        let mut out = vec![0u64; 100];
        assert_eq!(decode(&buf, &mut out).unwrap(), 100);
        assert_eq!(out, values);
        assert_eq!(get_at(&buf, 17), Some(9_000_000_000));
        assert_eq!(get_at(&buf, 63), Some(123_456_789));
        assert_eq!(get_at(&buf, 18), Some(values[18]));
        assert_eq!(get_at(&buf, 100), None);

        let read = read_meta(&buf).unwrap();
        assert_eq!(read.exception_count, 2);
        assert_eq!(read.encoded_size, n);
    }

    #[test]
    fn marker_valued_offset_is_not_an_exception() {
        // threshold 255 over min 0: in-range offset 255 equals the W1 marker
        let mut values = vec![255u64; 10];
        values.push(0);
        values.push(10_000);
        let meta = analyze(&values, 90);
        assert_eq!(meta.threshold, 255);
        assert_eq!(meta.width, Width::W1);
        assert_eq!(meta.exception_count, 1);

        let mut buf = vec![0u8; meta.encoded_size];
        encode(&mut buf, &values, 90).unwrap();
        let mut out = vec![0u64; values.len()];
        decode(&buf, &mut out).unwrap();
        assert_eq!(out, values);
        assert_eq!(get_at(&buf, 3), Some(255));
        assert_eq!(get_at(&buf, 11), Some(10_000));
    }

    #[test]
    fn constant_input_has_no_exceptions() {
        let values = [7u64; 20];
        let meta = analyze(&values, 90);
        assert_eq!(meta.threshold, 7);
        assert_eq!(meta.exception_count, 0);
        assert!(analyze(&[], 95).encoded_size > 0);
    }

    #[test]
    fn bad_exception_index_is_malformed() {
        let values = with_spikes();
        let mut buf = vec![0u8; size(&values, 95)];
        let n = encode(&mut buf, &values, 95).unwrap();
        // first exception index sits right after the exception count
        let count_pos = 4 + 100;
        assert_eq!(buf[count_pos], 0x80 | 2);
        buf[count_pos + 1] = 0x80 | 120;
        let mut out = vec![0u64; 100];
        assert!(matches!(decode(&buf[..n], &mut out), Err(CodecError::Malformed(_))));
    }
}
