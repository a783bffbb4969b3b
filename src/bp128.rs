//! Bit-packed blocks of 128 values (BP128), plain and delta, 32- and 64-bit lanes.
//!
//! A stream is a run of blocks. A full block is `[b: u8][ceil(128·b/8) bytes]`;
//! the only partial block is the last one: `[0x80|b][n: u8][ceil(n·b/8) bytes]`
//! with `n` in `1..=127`. Values are packed LSB-first at `b` bits each.
//!
//! Framing per variant:
//! - plain 32-bit: blocks only
//! - delta 32/64-bit: `[first: tagged][blocks of deltas from the previous value]`
//! - plain 64-bit: `[count: tagged][blocks]`

use crate::error::{need, need_out, CodecError};
use crate::tagged;

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Values per full block.
pub const BLOCK: usize = 128;

const PARTIAL_FLAG: u8 = 0x80;
const WIDTH_MASK: u8 = 0x7F;

/// Encoding metadata produced as a side effect of every encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bp128Meta {
    pub count: usize,
    /// Bit-packed blocks written. Delta variants exclude the first value,
    /// so this is `ceil((count - 1) / 128)` for them.
    pub block_count: usize,
    pub encoded_bytes: usize,
    /// Element count of the last block (128 when it is full).
    pub last_block_size: usize,
    pub max_bit_width: u32,
}

/// Lane type of a BP128 stream.
pub trait Lane: Copy + Default + Ord + Debug {
    const BITS: u32;
    fn to_u64(self) -> u64;
    fn from_u64(v: u64) -> Self;
}

impl Lane for u32 {
    const BITS: u32 = 32;
    #[inline]
    fn to_u64(self) -> u64 {
        self as u64
    }
    #[inline]
    fn from_u64(v: u64) -> Self {
        v as u32
    }
}

impl Lane for u64 {
    const BITS: u32 = 64;
    #[inline]
    fn to_u64(self) -> u64 {
        self
    }
    #[inline]
    fn from_u64(v: u64) -> Self {
        v
    }
}

#[inline]
fn bit_width(v: u64) -> u32 {
    64 - v.leading_zeros()
}

#[inline]
fn payload_len(n: usize, b: u32) -> usize {
    (n * b as usize).div_ceil(8)
}

#[inline]
fn block_len(n: usize, b: u32) -> usize {
    let header = if n == BLOCK { 1 } else { 2 };
    header + payload_len(n, b)
}

fn pack(dst: &mut [u8], b: u32, n: usize, value_at: impl Fn(usize) -> u64) {
    if b == 0 {
        return;
    }
    let mask = if b == 64 { u64::MAX } else { (1u64 << b) - 1 };
    let mut acc: u128 = 0;
    let mut bits = 0u32;
    let mut pos = 0;
    for i in 0..n {
        acc |= ((value_at(i) & mask) as u128) << bits;
        bits += b;
        while bits >= 8 {
            dst[pos] = acc as u8;
            acc >>= 8;
            bits -= 8;
            pos += 1;
        }
    }
    if bits > 0 {
        dst[pos] = acc as u8;
    }
}

fn unpack(src: &[u8], b: u32, n: usize, mut sink: impl FnMut(usize, u64)) {
    if b == 0 {
        // zero-width block: every value is 0
        (0..n).for_each(|i| sink(i, 0));
        return;
    }
    let mask = if b == 64 { u64::MAX } else { (1u64 << b) - 1 };
    let mut acc: u128 = 0;
    let mut bits = 0u32;
    let mut pos = 0;
    for i in 0..n {
        while bits < b {
            acc |= (src[pos] as u128) << bits;
            pos += 1;
            bits += 8;
        }
        sink(i, (acc as u64) & mask);
        acc >>= b;
        bits -= b;
    }
}

#[derive(Debug, Default)]
struct BlockStats {
    blocks: usize,
    last_block_size: usize,
    max_bit_width: u32,
}

fn write_blocks(
    dst: &mut [u8],
    pos: &mut usize,
    n: usize,
    lane_bits: u32,
    value_at: impl Fn(usize) -> u64,
) -> Result<BlockStats, CodecError> {
    let mut stats = BlockStats::default();
    let mut start = 0;
    while start < n {
        let len = BLOCK.min(n - start);
        let folded = (start..start + len).fold(0u64, |acc, i| acc | value_at(i));
        let b = bit_width(folded);
        if b > lane_bits {
            return Err(CodecError::ValueTooWide {
                index: start,
                bits: b,
            });
        }
        need(*pos + block_len(len, b), dst.len())?;
        if len == BLOCK {
            dst[*pos] = b as u8;
            *pos += 1;
        } else {
            dst[*pos] = PARTIAL_FLAG | b as u8;
            dst[*pos + 1] = len as u8;
            *pos += 2;
        }
        pack(&mut dst[*pos..], b, len, |i| value_at(start + i));
        *pos += payload_len(len, b);

        stats.blocks += 1;
        stats.last_block_size = len;
        stats.max_bit_width = stats.max_bit_width.max(b);
        start += len;
    }
    Ok(stats)
}

/// Reads blocks from `src[*pos..]` until the input ends, a partial block has
/// been read, `capacity` is filled, or `limit` values were produced. A block
/// that does not fit the remaining capacity is unpacked only up to it.
/// `sink(i, v)` receives the `i`-th value of this call.
fn read_blocks(
    src: &[u8],
    pos: &mut usize,
    lane_bits: u32,
    capacity: usize,
    limit: Option<usize>,
    mut sink: impl FnMut(usize, u64),
) -> Result<usize, CodecError> {
    let mut written = 0;
    while *pos < src.len() && written < capacity {
        if limit.is_some_and(|l| written >= l) {
            break;
        }
        let header = src[*pos];
        let b = (header & WIDTH_MASK) as u32;
        if b > lane_bits {
            return Err(CodecError::Malformed(format!(
                "BP128 block width {b} exceeds {lane_bits}-bit lane"
            )));
        }
        let partial = header & PARTIAL_FLAG != 0;
        let (len, header_len) = if partial {
            let n = *src
                .get(*pos + 1)
                .ok_or(CodecError::Truncated { offset: *pos + 1 })?
                as usize;
            if n == 0 || n >= BLOCK {
                return Err(CodecError::Malformed(format!(
                    "BP128 partial block count {n} outside 1..=127"
                )));
            }
            (n, 2)
        } else {
            (BLOCK, 1)
        };
        if limit.is_some_and(|l| written + len > l) {
            return Err(CodecError::Malformed(
                "BP128 blocks hold more values than declared".to_string(),
            ));
        }
        let take = len.min(capacity - written);

        let start = *pos + header_len;
        let plen = payload_len(len, b);
        let body = src
            .get(start..start + plen)
            .ok_or(CodecError::Truncated { offset: src.len() })?;
        let base = written;
        unpack(body, b, take, |i, v| sink(base + i, v));
        *pos = start + plen;
        written += take;

        if partial || take < len {
            break;
        }
    }
    if let Some(l) = limit {
        if written < l {
            return Err(CodecError::Truncated { offset: *pos });
        }
    }
    Ok(written)
}

fn blocks_max_bytes(count: usize, lane_bytes: usize) -> usize {
    let full = count / BLOCK;
    let rem = count % BLOCK;
    full * (1 + BLOCK * lane_bytes) + if rem > 0 { 2 + rem * lane_bytes } else { 0 }
}

/// Worst-case size of a plain 32-bit stream.
pub fn max_bytes32(count: usize) -> usize {
    blocks_max_bytes(count, 4)
}

pub fn max_bytes_delta32(count: usize) -> usize {
    tagged::MAX_LEN + blocks_max_bytes(count, 4)
}

pub fn max_bytes64(count: usize) -> usize {
    tagged::MAX_LEN + blocks_max_bytes(count, 8)
}

pub fn max_bytes_delta64(count: usize) -> usize {
    tagged::MAX_LEN + blocks_max_bytes(count, 8)
}

fn estimate_blocks<T: Lane>(values: &[T]) -> usize {
    values
        .chunks(BLOCK)
        .map(|c| {
            let folded = c.iter().fold(0u64, |a, v| a | v.to_u64());
            block_len(c.len(), bit_width(folded))
        })
        .sum()
}

/// Whether bit packing beats raw 4-byte storage.
pub fn is_beneficial32(values: &[u32]) -> bool {
    !values.is_empty() && estimate_blocks(values) < values.len() * 4
}

/// Whether bit packing (plus its count prefix) beats raw 8-byte storage.
pub fn is_beneficial64(values: &[u64]) -> bool {
    !values.is_empty() && 10 + estimate_blocks(values) < values.len() * 8
}

pub fn is_sorted<T: Ord>(values: &[T]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}

pub fn is_sorted32(values: &[u32]) -> bool {
    is_sorted(values)
}

pub fn is_sorted64(values: &[u64]) -> bool {
    is_sorted(values)
}

fn check_sorted<T: Ord>(values: &[T]) -> Result<(), CodecError> {
    match values.windows(2).position(|w| w[0] > w[1]) {
        Some(i) => Err(CodecError::NotSorted { index: i + 1 }),
        None => Ok(()),
    }
}

fn encode_plain<T: Lane>(dst: &mut [u8], pos: &mut usize, values: &[T]) -> Result<Bp128Meta, CodecError> {
    let stats = write_blocks(dst, pos, values.len(), T::BITS, |i| values[i].to_u64())?;
    Ok(Bp128Meta {
        count: values.len(),
        block_count: stats.blocks,
        encoded_bytes: *pos,
        last_block_size: stats.last_block_size,
        max_bit_width: stats.max_bit_width,
    })
}

fn encode_delta<T: Lane>(dst: &mut [u8], values: &[T]) -> Result<Bp128Meta, CodecError> {
    let Some(first) = values.first() else {
        return Ok(Bp128Meta::default());
    };
    check_sorted(values)?;
    let mut pos = 0;
    tagged::write_at(dst, &mut pos, first.to_u64())?;
    let deltas = values.len() - 1;
    let stats = write_blocks(dst, &mut pos, deltas, T::BITS, |i| {
        values[i + 1].to_u64() - values[i].to_u64()
    })?;
    Ok(Bp128Meta {
        count: values.len(),
        block_count: stats.blocks,
        encoded_bytes: pos,
        last_block_size: stats.last_block_size,
        max_bit_width: stats.max_bit_width,
    })
}

/// With `count` known the read stops after `count - 1` deltas; otherwise it
/// runs until the stream ends or `out` is full.
fn decode_delta<T: Lane>(src: &[u8], out: &mut [T], count: Option<usize>) -> Result<usize, CodecError> {
    match count {
        Some(0) => return Ok(0),
        Some(c) => need_out(c, out.len())?,
        None if src.is_empty() || out.is_empty() => return Ok(0),
        None => {}
    }
    let mut pos = 0;
    let first = tagged::read_at(src, &mut pos)?;
    if T::BITS < 64 && first >> T::BITS != 0 {
        return Err(CodecError::Malformed(format!(
            "BP128 first value {first} exceeds {}-bit lane",
            T::BITS
        )));
    }
    out[0] = T::from_u64(first);
    let (head, rest) = out.split_at_mut(1);
    let mut prev = head[0].to_u64();
    let capacity = rest.len();
    let limit = count.map(|c| c - 1);
    let n = read_blocks(src, &mut pos, T::BITS, capacity, limit, |i, d| {
        prev = prev.wrapping_add(d);
        rest[i] = T::from_u64(prev);
    })?;
    Ok(n + 1)
}

/// Encodes 32-bit values as plain blocks.
pub fn encode32(dst: &mut [u8], values: &[u32]) -> Result<Bp128Meta, CodecError> {
    let mut pos = 0;
    encode_plain(dst, &mut pos, values)
}

/// Decodes a plain 32-bit stream into `out`; returns the number of values.
/// Stops early once `out` is full.
pub fn decode32(src: &[u8], out: &mut [u32]) -> Result<usize, CodecError> {
    let mut pos = 0;
    let capacity = out.len();
    read_blocks(src, &mut pos, 32, capacity, None, |i, v| out[i] = v as u32)
}

/// Encodes a non-decreasing 32-bit sequence as first value plus deltas.
pub fn encode_delta32(dst: &mut [u8], values: &[u32]) -> Result<Bp128Meta, CodecError> {
    encode_delta(dst, values)
}

/// Decodes a delta 32-bit stream into `out`, stopping once `out` is full.
pub fn decode_delta32(src: &[u8], out: &mut [u32]) -> Result<usize, CodecError> {
    decode_delta(src, out, None)
}

/// Encodes 64-bit values as `[count][blocks]`.
pub fn encode64(dst: &mut [u8], values: &[u64]) -> Result<Bp128Meta, CodecError> {
    let mut pos = 0;
    tagged::write_at(dst, &mut pos, values.len() as u64)?;
    encode_plain(dst, &mut pos, values)
}

pub fn decode64(src: &[u8], out: &mut [u64]) -> Result<usize, CodecError> {
    let mut pos = 0;
    let count = tagged::read_at(src, &mut pos)?;
    let count = usize::try_from(count).map_err(|_| CodecError::OutputTooSmall {
        needed: usize::MAX,
        available: out.len(),
    })?;
    need_out(count, out.len())?;
    let capacity = out.len();
    read_blocks(src, &mut pos, 64, capacity, Some(count), |i, v| out[i] = v)
}

/// Element count of a plain 64-bit stream.
pub fn get_count64(src: &[u8]) -> Result<u64, CodecError> {
    tagged::get(src).map(|(v, _)| v)
}

/// Encodes a non-decreasing 64-bit sequence as first value plus deltas.
pub fn encode_delta64(dst: &mut [u8], values: &[u64]) -> Result<Bp128Meta, CodecError> {
    encode_delta(dst, values)
}

pub fn decode_delta64(src: &[u8], out: &mut [u64]) -> Result<usize, CodecError> {
    decode_delta(src, out, None)
}

/// Decodes exactly `count` values of a delta 64-bit stream. Bytes after the
/// last block are never read.
pub fn decode_delta64_counted(src: &[u8], out: &mut [u64], count: usize) -> Result<usize, CodecError> {
    decode_delta(src, out, Some(count))
}
