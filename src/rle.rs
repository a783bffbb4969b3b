//! Run-length codec: consecutive equal values fold into `(length, value)`
//! pairs of tagged varints. The header framing prepends the total count.

use crate::error::{need, need_out, CodecError};
use crate::tagged;

use serde::{Deserialize, Serialize};

/// Result of a single analysis pass over an input array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RleMeta {
    pub count: usize,
    pub run_count: usize,
    /// Body size in bytes, without the optional header.
    pub encoded_size: usize,
    /// Number of value transitions seen in order (`[1,1,2,1]` has three).
    pub unique_values: usize,
}

impl RleMeta {
    /// Whether the encoding beats 8 bytes per element.
    pub fn is_beneficial(&self) -> bool {
        self.count > 0 && self.encoded_size < self.count * 8
    }
}

/// Iterates `(run_length, value)` over a slice.
fn runs(values: &[u64]) -> impl Iterator<Item = (u64, u64)> + '_ {
    let mut i = 0;
    std::iter::from_fn(move || {
        let v = *values.get(i)?;
        let start = i;
        while i < values.len() && values[i] == v {
            i += 1;
        }
        Some(((i - start) as u64, v))
    })
}

pub fn analyze(values: &[u64]) -> RleMeta {
    let mut meta = RleMeta {
        count: values.len(),
        ..RleMeta::default()
    };
    for (len, v) in runs(values) {
        meta.run_count += 1;
        meta.encoded_size += tagged::len(len) + tagged::len(v);
    }
    meta.unique_values = meta.run_count;
    meta
}

/// Body size in bytes.
pub fn size(values: &[u64]) -> usize {
    analyze(values).encoded_size
}

pub fn is_beneficial(values: &[u64]) -> bool {
    analyze(values).is_beneficial()
}

/// Worst-case body size for `count` elements.
pub fn max_size(count: usize) -> usize {
    count * 10
}

/// Worst-case size including the count header.
pub fn max_size_with_header(count: usize) -> usize {
    tagged::MAX_LEN + max_size(count)
}

/// Encodes `values` as runs; an empty input writes nothing.
pub fn encode(dst: &mut [u8], values: &[u64]) -> Result<usize, CodecError> {
    need(size(values), dst.len())?;
    let mut pos = 0;
    for (len, v) in runs(values) {
        tagged::write_at(dst, &mut pos, len)?;
        tagged::write_at(dst, &mut pos, v)?;
    }
    Ok(pos)
}

pub fn encode_with_header(dst: &mut [u8], values: &[u64]) -> Result<usize, CodecError> {
    let count = values.len() as u64;
    need(tagged::len(count) + size(values), dst.len())?;
    let mut pos = 0;
    tagged::write_at(dst, &mut pos, count)?;
    pos += encode(&mut dst[pos..], values)?;
    Ok(pos)
}

/// Reads one run at the start of `src`: `(length, value, bytes_read)`.
pub fn decode_run(src: &[u8]) -> Result<(u64, u64, usize), CodecError> {
    let mut pos = 0;
    let len = tagged::read_at(src, &mut pos)?;
    let v = tagged::read_at(src, &mut pos)?;
    Ok((len, v, pos))
}

/// Decodes runs until the input ends, a zero-length run is read, or `out`
/// is full. Returns the number of values written.
pub fn decode(src: &[u8], out: &mut [u64]) -> Result<usize, CodecError> {
    let mut pos = 0;
    let mut written = 0;
    while pos < src.len() && written < out.len() {
        let (len, v, n) = decode_run(&src[pos..])?;
        if len == 0 {
            break;
        }
        pos += n;
        let take = (len.min((out.len() - written) as u64)) as usize;
        out[written..written + take].fill(v);
        written += take;
    }
    Ok(written)
}

/// Decodes a stream with a count header. Fails with `OutputTooSmall` if the
/// declared total does not fit in `out`.
pub fn decode_with_header(src: &[u8], out: &mut [u64]) -> Result<usize, CodecError> {
    let mut pos = 0;
    let total = tagged::read_at(src, &mut pos)?;
    let total = usize::try_from(total).map_err(|_| CodecError::OutputTooSmall {
        needed: usize::MAX,
        available: out.len(),
    })?;
    need_out(total, out.len())?;
    let got = decode(&src[pos..], &mut out[..total])?;
    if got != total {
        return Err(CodecError::Malformed(format!(
            "RLE header declares {total} values, runs hold {got}"
        )));
    }
    Ok(got)
}

/// Element count stored in a header-framed stream.
pub fn get_count(src: &[u8]) -> Result<u64, CodecError> {
    tagged::get(src).map(|(v, _)| v)
}

/// Number of runs in a body of `src.len()` bytes.
pub fn run_count(src: &[u8]) -> Result<usize, CodecError> {
    let mut pos = 0;
    let mut count = 0;
    while pos < src.len() {
        let (len, _, n) = decode_run(&src[pos..])?;
        if len == 0 {
            break;
        }
        pos += n;
        count += 1;
    }
    Ok(count)
}

/// Value at logical index `i` of a body. Returns 0 for indices past the end
/// or an unreadable stream; callers rely on this sentinel.
pub fn get_at(src: &[u8], i: u64) -> u64 {
    let mut pos = 0;
    let mut seen: u64 = 0;
    while pos < src.len() {
        let Ok((len, v, n)) = decode_run(&src[pos..]) else {
            return 0;
        };
        if len == 0 {
            return 0;
        }
        seen = seen.saturating_add(len);
        if i < seen {
            return v;
        }
        pos += n;
    }
    0
}
