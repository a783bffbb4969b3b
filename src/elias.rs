//! Elias Gamma and Delta universal codes for positive integers.
//!
//! Gamma writes `floor(log2 n)` zero bits followed by `n` in binary. Delta
//! writes the Gamma code of `floor(log2 n) + 1` followed by the low
//! `floor(log2 n)` bits of `n`. The stream length in bits travels out of band
//! in [`EliasMeta`].

use crate::bitstream::{BitReader, BitWriter};
use crate::error::{need, CodecError};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EliasMeta {
    pub count: usize,
    pub total_bits: usize,
    pub encoded_bytes: usize,
}

/// 0 has no code and is measured as 1.
#[inline]
fn log2(n: u64) -> u32 {
    n.max(1).ilog2()
}

/// Gamma code length of `n >= 1` in bits. 0 is invalid and reports the
/// length of 1.
#[inline]
pub fn gamma_bits(n: u64) -> usize {
    2 * log2(n) as usize + 1
}

/// Delta code length of `n >= 1` in bits. 0 is invalid and reports the
/// length of 1.
#[inline]
pub fn delta_bits(n: u64) -> usize {
    let l = log2(n);
    gamma_bits(l as u64 + 1) + l as usize
}

pub fn max_bytes_gamma(count: usize) -> usize {
    (count * 127).div_ceil(8)
}

pub fn max_bytes_delta(count: usize) -> usize {
    (count * 76).div_ceil(8)
}

/// Writes one Gamma code. Fails with `ZeroValue` for 0.
pub fn encode_gamma(w: &mut BitWriter<'_>, n: u64) -> Result<(), CodecError> {
    if n == 0 {
        return Err(CodecError::ZeroValue { index: 0 });
    }
    let l = log2(n);
    w.write(0, l)?;
    w.write(n, l + 1)
}

/// Reads one Gamma code; 0 marks a malformed or exhausted stream.
pub fn decode_gamma(r: &mut BitReader<'_>) -> u64 {
    let mut zeros = 0u32;
    loop {
        match r.read_bit() {
            Some(false) => {
                zeros += 1;
                if zeros > 63 {
                    return 0;
                }
            }
            Some(true) => break,
            None => return 0,
        }
    }
    match r.read(zeros) {
        Some(low) => (1u64 << zeros) | low,
        None => 0,
    }
}

pub fn encode_delta(w: &mut BitWriter<'_>, n: u64) -> Result<(), CodecError> {
    if n == 0 {
        return Err(CodecError::ZeroValue { index: 0 });
    }
    let l = log2(n);
    encode_gamma(w, l as u64 + 1)?;
    w.write(n, l)
}

/// Reads one Delta code; 0 marks a malformed or exhausted stream.
pub fn decode_delta(r: &mut BitReader<'_>) -> u64 {
    let m = decode_gamma(r);
    if m == 0 || m > 64 {
        return 0;
    }
    let l = (m - 1) as u32;
    match r.read(l) {
        Some(low) => (1u64 << l) | low,
        None => 0,
    }
}

fn encode_array(
    dst: &mut [u8],
    values: &[u64],
    bits_of: fn(u64) -> usize,
    put: fn(&mut BitWriter<'_>, u64) -> Result<(), CodecError>,
) -> Result<EliasMeta, CodecError> {
    let mut total_bits = 0;
    for (index, &v) in values.iter().enumerate() {
        if v == 0 {
            return Err(CodecError::ZeroValue { index });
        }
        total_bits += bits_of(v);
    }
    let encoded_bytes = total_bits.div_ceil(8);
    need(encoded_bytes, dst.len())?;

    let mut w = BitWriter::new(&mut dst[..encoded_bytes]);
    for &v in values {
        put(&mut w, v)?;
    }
    Ok(EliasMeta {
        count: values.len(),
        total_bits,
        encoded_bytes,
    })
}

fn decode_array(
    src: &[u8],
    total_bits: usize,
    out: &mut [u64],
    get: fn(&mut BitReader<'_>) -> u64,
) -> usize {
    let mut r = BitReader::new(src, total_bits);
    let mut n = 0;
    while n < out.len() && r.has_more(1) {
        let v = get(&mut r);
        if v == 0 {
            break;
        }
        out[n] = v;
        n += 1;
    }
    n
}

/// Gamma-encodes `values` (all `>= 1`).
pub fn encode_gamma_array(dst: &mut [u8], values: &[u64]) -> Result<EliasMeta, CodecError> {
    encode_array(dst, values, gamma_bits, encode_gamma)
}

/// Decodes up to `out.len()` Gamma codes within `total_bits`. Stops early
/// on a malformed code.
pub fn decode_gamma_array(src: &[u8], total_bits: usize, out: &mut [u64]) -> usize {
    decode_array(src, total_bits, out, decode_gamma)
}

pub fn encode_delta_array(dst: &mut [u8], values: &[u64]) -> Result<EliasMeta, CodecError> {
    encode_array(dst, values, delta_bits, encode_delta)
}

pub fn decode_delta_array(src: &[u8], total_bits: usize, out: &mut [u64]) -> usize {
    decode_array(src, total_bits, out, decode_delta)
}

fn beneficial(values: &[u64], bits_of: fn(u64) -> usize) -> bool {
    if values.iter().any(|&v| v == 0) {
        return false;
    }
    let total: usize = values.iter().map(|&v| bits_of(v)).sum();
    total.div_ceil(8) < values.len() * 8
}

pub fn is_beneficial_gamma(values: &[u64]) -> bool {
    beneficial(values, gamma_bits)
}

pub fn is_beneficial_delta(values: &[u64]) -> bool {
    beneficial(values, delta_bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_lengths() {
        assert_eq!(gamma_bits(1), 1);
        assert_eq!(gamma_bits(2), 3);
        assert_eq!(gamma_bits(4), 5);
        assert_eq!(gamma_bits(u64::MAX), 127);
        assert_eq!(delta_bits(1), 1);
        assert_eq!(delta_bits(2), 4);
        assert_eq!(delta_bits(u64::MAX), 76);
    }

    #[test]
    fn gamma_bit_layout() {
        // 1 -> "1", 2 -> "010", 5 -> "00101"
        let mut buf = [0u8; 2];
        let meta = encode_gamma_array(&mut buf, &[1, 2, 5]).unwrap();
        assert_eq!(meta.total_bits, 9);
        assert_eq!(meta.encoded_bytes, 2);
        assert_eq!(buf, [0b1010_0010, 0b1000_0000]);

        let mut out = [0u64; 3];
        assert_eq!(decode_gamma_array(&buf, meta.total_bits, &mut out), 3);
        assert_eq!(out, [1, 2, 5]);
    }

    #[test]
    fn delta_handles_extremes() {
        let values = [1u64, 2, 17, 1 << 40, u64::MAX];
        let mut buf = vec![0u8; max_bytes_delta(values.len())];
        let meta = encode_delta_array(&mut buf, &values).unwrap();
        let expected: usize = values.iter().map(|&v| delta_bits(v)).sum();
        assert_eq!(meta.total_bits, expected);
        let mut out = [0u64; 5];
        assert_eq!(decode_delta_array(&buf, meta.total_bits, &mut out), 5);
        assert_eq!(out, values);
    }

    #[test]
    fn zeros_are_rejected() {
        let mut buf = [0u8; 8];
        assert!(matches!(
            encode_gamma_array(&mut buf, &[3, 0]),
            Err(CodecError::ZeroValue { index: 1 })
        ));
        assert!(!is_beneficial_gamma(&[1, 0]));
        assert!(!is_beneficial_delta(&[0]));

        assert_eq!(gamma_bits(0), 1);
        assert_eq!(delta_bits(0), 1);
        let mut w = BitWriter::new(&mut buf);
        assert!(matches!(encode_gamma(&mut w, 0), Err(CodecError::ZeroValue { index: 0 })));
        assert!(matches!(encode_delta(&mut w, 0), Err(CodecError::ZeroValue { index: 0 })));
        assert_eq!(w.bit_pos(), 0);
    }

    #[test]
    fn malformed_stream_stops_early() {
        // 64 zero bits: no terminating one within Gamma's 63-zero limit
        let buf = [0u8; 9];
        let mut out = [0u64; 4];
        assert_eq!(decode_gamma_array(&buf, 72, &mut out), 0);
    }

    #[test]
    fn beneficial_for_small_values_only() {
        let small: Vec<u64> = (1..=10).collect();
        assert!(is_beneficial_gamma(&small));
        assert!(is_beneficial_delta(&small));
        let large: Vec<u64> = (0..10).map(|i| u64::MAX - i).collect();
        assert!(!is_beneficial_gamma(&large));
    }
}
