//! Reliable text to number conversion.
//!
//! A scan succeeds only when the resulting [`Databox`] formats back to the
//! exact input bytes; anything ambiguous (leading or trailing zeros,
//! fractions that round, out-of-range integers) is refused with a
//! [`ScanError`].

use crate::databox::Databox;
use crate::error::ScanError;
use crate::format;

const TWO_53: u64 = 1 << 53;
const I64_MIN_MAGNITUDE: u64 = 1 << 63;
const I128_MIN_MAGNITUDE: u128 = 1 << 127;

const ONES: u64 = 0x0101_0101_0101_0101;

/// Whether every byte is an ASCII digit. Eight bytes are tested per step.
pub fn is_digits(bytes: &[u8]) -> bool {
    let mut chunks = bytes.chunks_exact(8);
    for chunk in &mut chunks {
        let mut w = [0u8; 8];
        w.copy_from_slice(chunk);
        let x = u64::from_le_bytes(w);
        let high = x & (0xF0 * ONES);
        let carried = (x.wrapping_add(0x06 * ONES) & (0xF0 * ONES)) >> 4;
        if high | carried != 0x33 * ONES {
            return false;
        }
    }
    chunks.remainder().iter().all(u8::is_ascii_digit)
}

/// Scans 64-bit integers and fractional floats.
pub fn scan(bytes: &[u8]) -> Result<Databox, ScanError> {
    if bytes.is_empty() {
        return Err(ScanError::Empty);
    }
    let negative = bytes[0] == b'-' && bytes.len() > 1;
    let skip = usize::from(negative);
    let body = &bytes[skip..];

    if body[0] == b'.' {
        return Err(ScanError::LeadingDot);
    }
    if body[0] == b'0' && body.len() > 1 && body[1] != b'.' {
        return Err(ScanError::LeadingZero);
    }
    if negative && body == b"0" {
        return Err(ScanError::NegativeZero);
    }

    let mut x: u64 = 0;
    for (i, &b) in body.iter().enumerate() {
        match b {
            b'0'..=b'9' => {
                x = x
                    .checked_mul(10)
                    .and_then(|x| x.checked_add((b - b'0') as u64))
                    .ok_or(ScanError::Overflow)?;
            }
            b'.' => return scan_fraction(bytes, skip + i, x),
            _ => return Err(ScanError::Malformed { offset: skip + i }),
        }
    }

    if negative {
        if x > I64_MIN_MAGNITUDE {
            return Err(ScanError::Overflow);
        }
        Ok(Databox::Signed64(0i64.wrapping_sub_unsigned(x)))
    } else if let Ok(v) = i64::try_from(x) {
        Ok(Databox::Signed64(v))
    } else {
        Ok(Databox::Unsigned64(x))
    }
}

fn scan_fraction(bytes: &[u8], dot: usize, int_part: u64) -> Result<Databox, ScanError> {
    if int_part >= TWO_53 {
        return Err(ScanError::PrecisionLoss);
    }
    let n = bytes.len();
    if bytes[n - 1] == b'0' && bytes[n - 2] != b'.' {
        return Err(ScanError::TrailingZero);
    }
    let fraction = &bytes[dot + 1..];
    if fraction.is_empty() {
        return Err(ScanError::Malformed { offset: n });
    }
    if let Some(p) = fraction.iter().position(|b| !b.is_ascii_digit()) {
        return Err(ScanError::Malformed { offset: dot + 1 + p });
    }

    let text = std::str::from_utf8(bytes).map_err(|_| ScanError::Malformed { offset: 0 })?;
    let v: f64 = text.parse().map_err(|_| ScanError::Malformed { offset: 0 })?;

    let mut back = [0u8; format::F64_MAX_LEN];
    let len = format::format_f64(v, &mut back).map_err(|_| ScanError::PrecisionLoss)?;
    if &back[..len] != bytes {
        return Err(ScanError::PrecisionLoss);
    }
    if (v as f32) as f64 == v {
        Ok(Databox::Float32(v as f32))
    } else {
        Ok(Databox::Double64(v))
    }
}

/// Parses unsigned decimal digits into a `u128`, eighteen digits per step.
pub fn parse_u128(digits: &[u8]) -> Result<u128, ScanError> {
    if digits.is_empty() {
        return Err(ScanError::Empty);
    }
    let mut acc: u128 = 0;
    let mut offset = 0;
    for chunk in digits.chunks(18) {
        let mut part: u64 = 0;
        for (i, &b) in chunk.iter().enumerate() {
            if !b.is_ascii_digit() {
                return Err(ScanError::Malformed { offset: offset + i });
            }
            part = part * 10 + (b - b'0') as u64;
        }
        let scale = format::ten_pow_u128(chunk.len() as u32).ok_or(ScanError::Overflow)?;
        acc = acc
            .checked_mul(scale)
            .and_then(|a| a.checked_add(part as u128))
            .ok_or(ScanError::Overflow)?;
        offset += chunk.len();
    }
    Ok(acc)
}

/// Parses an optionally negative decimal into an `i128`.
pub fn parse_i128(bytes: &[u8]) -> Result<i128, ScanError> {
    match bytes.split_first() {
        Some((b'-', digits)) => {
            let m = parse_u128(digits).map_err(|e| shift(e, 1))?;
            if m > I128_MIN_MAGNITUDE {
                return Err(ScanError::Overflow);
            }
            Ok(0i128.wrapping_sub_unsigned(m))
        }
        _ => {
            let m = parse_u128(bytes)?;
            i128::try_from(m).map_err(|_| ScanError::Overflow)
        }
    }
}

fn shift(e: ScanError, by: usize) -> ScanError {
    match e {
        ScanError::Malformed { offset } => ScanError::Malformed { offset: offset + by },
        other => other,
    }
}

/// [`scan`] extended with 128-bit integers for inputs of 20 to 40 bytes.
/// Inputs of that length that are not plain integers take the 64-bit path.
pub fn scan_convert_128(bytes: &[u8]) -> Result<Databox, ScanError> {
    if !(20..=40).contains(&bytes.len()) {
        return scan(bytes);
    }
    let digits = bytes.strip_prefix(b"-").unwrap_or(bytes);
    if !is_digits(digits) {
        return scan(bytes);
    }
    scan_convert_128_pre_verified(bytes)
}

/// 128-bit integer path for input already known to be `-?[0-9]+`.
pub fn scan_convert_128_pre_verified(bytes: &[u8]) -> Result<Databox, ScanError> {
    let (negative, digits) = match bytes.strip_prefix(b"-") {
        Some(rest) => (true, rest),
        None => (false, bytes),
    };
    let skip = usize::from(negative);
    match digits {
        [] => return Err(ScanError::Empty),
        [b'0', _, ..] => return Err(ScanError::LeadingZero),
        b"0" if negative => return Err(ScanError::NegativeZero),
        _ => {}
    }
    if digits.len() > 39 {
        return Err(ScanError::Overflow);
    }
    let m = parse_u128(digits).map_err(|e| shift(e, skip))?;

    if negative {
        if m > I128_MIN_MAGNITUDE {
            return Err(ScanError::Overflow);
        }
        let v = 0i128.wrapping_sub_unsigned(m);
        Ok(match i64::try_from(v) {
            Ok(small) => Databox::Signed64(small),
            Err(_) => Databox::Signed128(v),
        })
    } else if let Ok(small) = i64::try_from(m) {
        Ok(Databox::Signed64(small))
    } else if let Ok(small) = u64::try_from(m) {
        Ok(Databox::Unsigned64(small))
    } else {
        Ok(Databox::Unsigned128(m))
    }
}
