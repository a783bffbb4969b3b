//! Widest-available float scalar and exact integer/float comparison.
//!
//! Stable Rust offers no float wider than `f64`, so the extended scalar is
//! `f64` and every comparison takes the integer-based path.

use std::cmp::Ordering;

/// Whether a scalar with at least 64 mantissa bits backs [`FloatExt`].
pub const HAS_FLOAT_EXTENDED: bool = false;

/// Mantissa bits of [`FloatExt`], hidden bit included.
pub const MANTISSA_BITS: u32 = f64::MANTISSA_DIGITS;

pub type FloatExt = f64;

const TWO_53: u64 = 1 << 53;
const TWO_63: f64 = 9_223_372_036_854_775_808.0;
const TWO_64: f64 = 18_446_744_073_709_551_616.0;

pub fn type_name() -> &'static str {
    "double (no extended precision, integer comparison fallback)"
}

/// Whether `i` converts to `f64` without rounding.
#[inline]
pub fn i64_fits_in_f64(i: i64) -> bool {
    let m = i.unsigned_abs();
    m <= TWO_53 || m.trailing_zeros() >= 64 - m.leading_zeros() - 53
}

#[inline]
pub fn u64_fits_in_f64(u: u64) -> bool {
    u <= TWO_53 || u.trailing_zeros() >= 64 - u.leading_zeros() - 53
}

// `int_cmp` compares the integer against `d` truncated; the fractional part
// of `d` breaks a tie.
#[inline]
fn with_residue(int_cmp: Ordering, d: f64) -> Ordering {
    match int_cmp {
        Ordering::Equal => {
            let frac = d - d.trunc();
            if frac > 0.0 {
                Ordering::Less
            } else if frac < 0.0 {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        }
        other => other,
    }
}

/// Exact ordering of `i` against `d`. NaN compares greater than every integer.
pub fn compare_i64_f64(i: i64, d: f64) -> Ordering {
    if d.is_nan() {
        return Ordering::Less;
    }
    if i.unsigned_abs() <= TWO_53 {
        return (i as f64).partial_cmp(&d).unwrap_or(Ordering::Less);
    }
    if d < -TWO_63 {
        return Ordering::Greater;
    }
    if d >= TWO_63 {
        return Ordering::Less;
    }
    let t = d.trunc() as i64;
    with_residue(i.cmp(&t), d)
}

/// Exact ordering of `u` against `d`. NaN compares greater than every integer.
pub fn compare_u64_f64(u: u64, d: f64) -> Ordering {
    if d.is_nan() {
        return Ordering::Less;
    }
    if d < 0.0 {
        return Ordering::Greater;
    }
    if u <= TWO_53 {
        return (u as f64).partial_cmp(&d).unwrap_or(Ordering::Less);
    }
    if d >= TWO_64 {
        return Ordering::Less;
    }
    let t = d.trunc() as u64;
    with_residue(u.cmp(&t), d)
}

const TWO_127: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
const TWO_128: f64 = 340_282_366_920_938_463_463_374_607_431_768_211_456.0;

/// 128-bit counterpart of [`compare_i64_f64`].
pub fn compare_i128_f64(i: i128, d: f64) -> Ordering {
    if d.is_nan() || d >= TWO_127 {
        return Ordering::Less;
    }
    if d < -TWO_127 {
        return Ordering::Greater;
    }
    with_residue(i.cmp(&(d.trunc() as i128)), d)
}

pub fn compare_u128_f64(u: u128, d: f64) -> Ordering {
    if d.is_nan() || d >= TWO_128 {
        return Ordering::Less;
    }
    if d < 0.0 {
        return Ordering::Greater;
    }
    with_residue(u.cmp(&(d.trunc() as u128)), d)
}

/// `10^e` by exponentiation by squaring. Overflows to infinity past 308 and
/// reaches zero below -323.
pub fn pow10(e: i32) -> FloatExt {
    let mut base: FloatExt = 10.0;
    let mut n = e.unsigned_abs();
    let mut acc: FloatExt = 1.0;
    while n > 0 {
        if n & 1 == 1 {
            acc *= base;
        }
        base *= base;
        n >>= 1;
    }
    if e < 0 {
        1.0 / acc
    } else {
        acc
    }
}

/// `10^e` for `e` in the exactly representable range, falling back to
/// [`pow10`] elsewhere. Exact for `0 <= e <= 22`.
pub fn pow10_full(e: i32) -> FloatExt {
    const EXACT: [f64; 23] = [
        1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15,
        1e16, 1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
    ];
    match usize::try_from(e) {
        Ok(i) if i < EXACT.len() => EXACT[i],
        _ => pow10(e),
    }
}
