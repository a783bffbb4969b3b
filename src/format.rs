//! Primitive to decimal text.
//!
//! Integers are written right to left from a two-digit table, nine digits
//! at a time for wide values. Floats use the shortest representation that
//! reparses to the same `f64`, with a canonical placement of the decimal
//! point that [`crate::scan`] inverts.

use std::fmt::Write as _;

use crate::databox::Databox;
use crate::error::{need, CodecError};

const fn digit_pairs() -> [u8; 200] {
    let mut t = [0u8; 200];
    let mut i = 0;
    while i < 100 {
        t[2 * i] = b'0' + (i / 10) as u8;
        t[2 * i + 1] = b'0' + (i % 10) as u8;
        i += 1;
    }
    t
}

/// `"00" "01" ... "99"` back to back.
pub static DIGIT_PAIRS: [u8; 200] = digit_pairs();

const fn pow10_u64() -> [u64; 20] {
    let mut t = [1u64; 20];
    let mut i = 1;
    while i < 20 {
        t[i] = t[i - 1] * 10;
        i += 1;
    }
    t
}

const fn pow10_u128() -> [u128; 39] {
    let mut t = [1u128; 39];
    let mut i = 1;
    while i < 39 {
        t[i] = t[i - 1] * 10;
        i += 1;
    }
    t
}

static POW10_U64: [u64; 20] = pow10_u64();
static POW10_U128: [u128; 39] = pow10_u128();

/// `10^exp` for `exp <= 19`.
#[inline]
pub fn ten_pow(exp: u32) -> Option<u64> {
    POW10_U64.get(exp as usize).copied()
}

/// `10^exp` for `exp <= 38`.
#[inline]
pub fn ten_pow_u128(exp: u32) -> Option<u128> {
    POW10_U128.get(exp as usize).copied()
}

#[inline]
pub fn digit_count_u32(v: u32) -> usize {
    v.checked_ilog10().map_or(1, |d| d as usize + 1)
}

#[inline]
pub fn digit_count_u64(v: u64) -> usize {
    v.checked_ilog10().map_or(1, |d| d as usize + 1)
}

#[inline]
pub fn digit_count_u128(v: u128) -> usize {
    v.checked_ilog10().map_or(1, |d| d as usize + 1)
}

/// Length of the decimal form of `v`, sign included.
#[inline]
pub fn digit_count_i64(v: i64) -> usize {
    digit_count_u64(v.unsigned_abs()) + usize::from(v < 0)
}

#[inline]
fn pair(v: u32) -> [u8; 2] {
    let i = 2 * v as usize;
    [DIGIT_PAIRS[i], DIGIT_PAIRS[i + 1]]
}

/// Four zero-padded digits of `v % 10^4`.
pub fn splat4(v: u32) -> [u8; 4] {
    let v = v % 10_000;
    let [a, b] = pair(v / 100);
    let [c, d] = pair(v % 100);
    [a, b, c, d]
}

/// Eight zero-padded digits of `v % 10^8`.
pub fn splat8(v: u32) -> [u8; 8] {
    let v = v % 100_000_000;
    let hi = splat4(v / 10_000);
    let lo = splat4(v % 10_000);
    let mut out = [0u8; 8];
    out[..4].copy_from_slice(&hi);
    out[4..].copy_from_slice(&lo);
    out
}

/// Nine zero-padded digits of `v % 10^9`.
pub fn splat9(v: u32) -> [u8; 9] {
    let v = v % 1_000_000_000;
    let mut out = [0u8; 9];
    out[0] = b'0' + (v / 100_000_000) as u8;
    out[1..].copy_from_slice(&splat8(v % 100_000_000));
    out
}

/// Writes `v` right-aligned so that it ends at `end`; returns the start.
fn write_backwards(scratch: &mut [u8], mut end: usize, mut v: u64) -> usize {
    while v >= 1_000_000_000 {
        let slab = (v % 1_000_000_000) as u32;
        v /= 1_000_000_000;
        end -= 9;
        scratch[end..end + 9].copy_from_slice(&splat9(slab));
    }
    let mut v = v as u32;
    while v >= 100 {
        end -= 2;
        scratch[end..end + 2].copy_from_slice(&pair(v % 100));
        v /= 100;
    }
    if v >= 10 {
        end -= 2;
        scratch[end..end + 2].copy_from_slice(&pair(v));
    } else {
        end -= 1;
        scratch[end] = b'0' + v as u8;
    }
    end
}

pub fn format_u64(v: u64, dst: &mut [u8]) -> Result<usize, CodecError> {
    let mut scratch = [0u8; 20];
    let start = write_backwards(&mut scratch, 20, v);
    let n = 20 - start;
    need(n, dst.len())?;
    dst[..n].copy_from_slice(&scratch[start..]);
    Ok(n)
}

pub fn format_i64(v: i64, dst: &mut [u8]) -> Result<usize, CodecError> {
    if v >= 0 {
        return format_u64(v as u64, dst);
    }
    need(digit_count_i64(v), dst.len())?;
    dst[0] = b'-';
    Ok(1 + format_u64(v.unsigned_abs(), &mut dst[1..])?)
}

/// Wide values are printed in nine-digit slabs.
pub fn format_u128(v: u128, dst: &mut [u8]) -> Result<usize, CodecError> {
    if let Ok(small) = u64::try_from(v) {
        return format_u64(small, dst);
    }
    const SLAB: u128 = 1_000_000_000;
    let mut scratch = [0u8; 39];
    let mut end = scratch.len();
    let mut v = v;
    while v >= SLAB {
        end -= 9;
        scratch[end..end + 9].copy_from_slice(&splat9((v % SLAB) as u32));
        v /= SLAB;
    }
    let start = write_backwards(&mut scratch, end, v as u64);
    let n = scratch.len() - start;
    need(n, dst.len())?;
    dst[..n].copy_from_slice(&scratch[start..]);
    Ok(n)
}

pub fn format_i128(v: i128, dst: &mut [u8]) -> Result<usize, CodecError> {
    if v >= 0 {
        return format_u128(v as u128, dst);
    }
    need(digit_count_u128(v.unsigned_abs()) + 1, dst.len())?;
    dst[0] = b'-';
    Ok(1 + format_u128(v.unsigned_abs(), &mut dst[1..])?)
}

/// `fmt::Write` over a fixed stack buffer.
struct Cursor<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl std::fmt::Write for Cursor<'_> {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        let end = self.len + s.len();
        let slot = self.buf.get_mut(self.len..end).ok_or(std::fmt::Error)?;
        slot.copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

/// Longest text [`format_f64`] produces.
pub const F64_MAX_LEN: usize = 32;

const TWO_53: f64 = 9_007_199_254_740_992.0;

/// Shortest round-trip text of `v`.
///
/// `±0` is `0.0`; specials are `inf`, `-inf` and `nan`. Integer values
/// below 2^53 print with a trailing `.0`. Otherwise the decimal point sits
/// inside the digits, after at most five padding zeros, or behind `0.` and
/// at most five leading zeros; beyond that the text is `d.ddde±N`.
pub fn format_f64(v: f64, dst: &mut [u8]) -> Result<usize, CodecError> {
    let mut out = [0u8; F64_MAX_LEN];
    let n = render_f64(v, &mut out);
    need(n, dst.len())?;
    dst[..n].copy_from_slice(&out[..n]);
    Ok(n)
}

fn render_f64(v: f64, out: &mut [u8; F64_MAX_LEN]) -> usize {
    fn put(out: &mut [u8], at: &mut usize, bytes: &[u8]) {
        out[*at..*at + bytes.len()].copy_from_slice(bytes);
        *at += bytes.len();
    }

    if v.is_nan() {
        out[..3].copy_from_slice(b"nan");
        return 3;
    }
    if v.is_infinite() {
        let s: &[u8] = if v > 0.0 { b"inf" } else { b"-inf" };
        out[..s.len()].copy_from_slice(s);
        return s.len();
    }
    if v == 0.0 {
        out[..3].copy_from_slice(b"0.0");
        return 3;
    }

    let mut at = 0;
    if v.fract() == 0.0 && v.abs() < TWO_53 {
        let mut digits = [0u8; 20];
        // below 2^53 the conversion is exact and fits the buffer
        let n = format_i64(v as i64, &mut digits).unwrap_or(0);
        put(out, &mut at, &digits[..n]);
        put(out, &mut at, b".0");
        return at;
    }

    // `{:e}` yields the shortest round-trip digits as `d[.ddd]e[-]N`
    let mut sci = [0u8; F64_MAX_LEN];
    let mut cursor = Cursor {
        buf: &mut sci,
        len: 0,
    };
    if write!(cursor, "{:e}", v.abs()).is_err() {
        return 0;
    }
    let len = cursor.len;
    let sci = &sci[..len];
    let e_pos = sci.iter().position(|&b| b == b'e').unwrap_or(len);
    let mut digits = [0u8; 20];
    let mut n = 0;
    for &b in &sci[..e_pos] {
        if b != b'.' {
            digits[n] = b;
            n += 1;
        }
    }
    let digits = &digits[..n];
    let exp: i32 = std::str::from_utf8(&sci[(e_pos + 1).min(len)..])
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    let places = exp + 1;
    let n = n as i32;

    if v < 0.0 {
        put(out, &mut at, b"-");
    }
    if places <= 0 && places > -6 {
        put(out, &mut at, b"0.");
        for _ in 0..-places {
            put(out, &mut at, b"0");
        }
        put(out, &mut at, digits);
    } else if places > 0 && places < n {
        let split = places as usize;
        put(out, &mut at, &digits[..split]);
        put(out, &mut at, b".");
        put(out, &mut at, &digits[split..]);
    } else if places >= n && places - n < 6 {
        put(out, &mut at, digits);
        for _ in 0..places - n {
            put(out, &mut at, b"0");
        }
        put(out, &mut at, b".0");
    } else {
        put(out, &mut at, &digits[..1]);
        if n > 1 {
            put(out, &mut at, b".");
            put(out, &mut at, &digits[1..]);
        }
        put(out, &mut at, b"e");
        let mut e = [0u8; 8];
        let k = format_i64(exp as i64, &mut e).unwrap_or(0);
        put(out, &mut at, &e[..k]);
    }
    at
}

/// Text form of a databox. `Void` writes nothing.
pub fn format_databox(b: &Databox, dst: &mut [u8]) -> Result<usize, CodecError> {
    fn word(w: &[u8], dst: &mut [u8]) -> Result<usize, CodecError> {
        need(w.len(), dst.len())?;
        dst[..w.len()].copy_from_slice(w);
        Ok(w.len())
    }

    match *b {
        Databox::Void => Ok(0),
        Databox::Signed64(v) => format_i64(v, dst),
        Databox::Unsigned64(v) => format_u64(v, dst),
        Databox::Signed128(v) => format_i128(v, dst),
        Databox::Unsigned128(v) => format_u128(v, dst),
        Databox::Float32(v) => format_f64(v as f64, dst),
        Databox::Double64(v) => format_f64(v, dst),
        Databox::True => word(b"true", dst),
        Databox::False => word(b"false", dst),
        Databox::Null => word(b"null", dst),
    }
}
