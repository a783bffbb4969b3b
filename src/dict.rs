//! Dictionary codec for low-cardinality arrays.
//!
//! Wire layout: `[dict size: tagged][entries: tagged ...][count: tagged]
//! [count × index width LE indices]`. The index width is the byte width of
//! `size - 1`, or 8 for an empty dictionary.

use crate::error::{need, need_out, CodecError};
use crate::tagged;
use crate::width::{self, Width};

use serde::{Deserialize, Serialize};

/// Largest dictionary a decoder will allocate.
pub const MAX_DICT_SIZE: u64 = 1 << 20;

/// Sorted set of distinct values; position in the set is the index code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dictionary {
    values: Vec<u64>,
}

impl Dictionary {
    pub fn build(values: &[u64]) -> Self {
        let mut values = values.to_vec();
        values.sort_unstable();
        values.dedup();
        Self { values }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[u64] {
        &self.values
    }

    pub fn index_width(&self) -> Width {
        match self.values.len() {
            0 => Width::W8,
            n => width::width_of(n as u64 - 1),
        }
    }

    /// Index of `v`, if present.
    #[inline]
    pub fn find(&self, v: u64) -> Option<usize> {
        self.values.binary_search(&v).ok()
    }

    #[inline]
    pub fn lookup(&self, index: usize) -> Option<u64> {
        self.values.get(index).copied()
    }

    fn header_size(&self) -> usize {
        tagged::len(self.values.len() as u64)
            + self.values.iter().map(|&v| tagged::len(v)).sum::<usize>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DictStats {
    pub unique_count: usize,
    pub total_count: usize,
    pub dict_bytes: usize,
    pub index_bytes: usize,
    pub total_bytes: usize,
    pub original_bytes: usize,
    pub compression_ratio: f64,
    /// Fraction of the original size saved, `1 - total/original`.
    pub space_reduction: f64,
}

pub fn size_with_dict(dict: &Dictionary, count: usize) -> usize {
    dict.header_size() + tagged::len(count as u64) + count * dict.index_width().bytes()
}

pub fn size(values: &[u64]) -> usize {
    size_with_dict(&Dictionary::build(values), values.len())
}

/// Encodes `values` against a caller-built dictionary. Every value must be
/// present in `dict`.
pub fn encode_with_dict(
    dst: &mut [u8],
    values: &[u64],
    dict: &Dictionary,
) -> Result<usize, CodecError> {
    need(size_with_dict(dict, values.len()), dst.len())?;
    let mut pos = 0;
    tagged::write_at(dst, &mut pos, dict.len() as u64)?;
    for &v in &dict.values {
        tagged::write_at(dst, &mut pos, v)?;
    }
    tagged::write_at(dst, &mut pos, values.len() as u64)?;
    let w = dict.index_width().bytes();
    for &v in values {
        let index = dict
            .find(v)
            .ok_or_else(|| CodecError::Malformed(format!("value {v} missing from dictionary")))?;
        width::put_unchecked_len(&mut dst[pos..], index as u64, w);
        pos += w;
    }
    Ok(pos)
}

pub fn encode(dst: &mut [u8], values: &[u64]) -> Result<usize, CodecError> {
    encode_with_dict(dst, values, &Dictionary::build(values))
}

fn read_size(src: &[u8], pos: &mut usize) -> Result<usize, CodecError> {
    let size = tagged::read_at(src, pos)?;
    if size > MAX_DICT_SIZE {
        return Err(CodecError::DictionaryTooLarge {
            size,
            max: MAX_DICT_SIZE,
        });
    }
    Ok(size as usize)
}

/// Element count of an encoded stream, read past the dictionary entries.
pub fn count(src: &[u8]) -> Result<usize, CodecError> {
    let mut pos = 0;
    let size = read_size(src, &mut pos)?;
    for _ in 0..size {
        tagged::read_at(src, &mut pos)?;
    }
    let count = tagged::read_at(src, &mut pos)?;
    usize::try_from(count).map_err(|_| CodecError::Malformed(format!("dictionary count {count}")))
}

/// Decodes into `out`. The dictionary is materialized on the heap.
pub fn decode(src: &[u8], out: &mut [u64]) -> Result<usize, CodecError> {
    let mut pos = 0;
    let size = read_size(src, &mut pos)?;
    // every entry takes at least one byte
    let mut values = Vec::with_capacity(size.min(src.len() - pos));
    for _ in 0..size {
        values.push(tagged::read_at(src, &mut pos)?);
    }
    let dict = Dictionary { values };

    let count = tagged::read_at(src, &mut pos)?;
    let count = usize::try_from(count)
        .map_err(|_| CodecError::Malformed(format!("dictionary count {count}")))?;
    need_out(count, out.len())?;
    let w = dict.index_width().bytes();
    let end = count
        .checked_mul(w)
        .and_then(|n| n.checked_add(pos))
        .ok_or_else(|| CodecError::Malformed("dictionary index area overflows".into()))?;
    if src.len() < end {
        return Err(CodecError::Truncated { offset: src.len() });
    }
    for (slot, chunk) in out.iter_mut().zip(src[pos..end].chunks_exact(w)) {
        let index = width::get_len(chunk, w);
        *slot = usize::try_from(index)
            .ok()
            .and_then(|i| dict.lookup(i))
            .ok_or_else(|| CodecError::Malformed(format!("dictionary index {index}")))?;
    }
    Ok(count)
}

/// Original bytes over encoded bytes; 0 for an empty input.
pub fn compression_ratio(values: &[u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    (values.len() * 8) as f64 / size(values) as f64
}

pub fn stats(values: &[u64]) -> DictStats {
    let dict = Dictionary::build(values);
    let dict_bytes = dict.header_size();
    let total_bytes = size_with_dict(&dict, values.len());
    let index_bytes = total_bytes - dict_bytes;
    let original_bytes = values.len() * 8;
    let (compression_ratio, space_reduction) = if original_bytes == 0 {
        (0.0, 0.0)
    } else {
        (
            original_bytes as f64 / total_bytes as f64,
            1.0 - total_bytes as f64 / original_bytes as f64,
        )
    };
    DictStats {
        unique_count: dict.len(),
        total_count: values.len(),
        dict_bytes,
        index_bytes,
        total_bytes,
        original_bytes,
        compression_ratio,
        space_reduction,
    }
}
