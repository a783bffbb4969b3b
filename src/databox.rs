//! `Databox`: the tagged value produced by the scanner.

use std::cmp::Ordering;
use std::fmt;

use crate::float_ext;
use crate::format;

use serde::{Deserialize, Serialize};

/// A scalar read from text. 128-bit integers are stored inline; they are
/// the "big" variants.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Databox {
    #[default]
    Void,
    Signed64(i64),
    Unsigned64(u64),
    Signed128(i128),
    Unsigned128(u128),
    Float32(f32),
    Double64(f64),
    True,
    False,
    Null,
}

/// Variant tag of a [`Databox`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataboxKind {
    Void,
    Signed64,
    Unsigned64,
    Signed128,
    Unsigned128,
    Float32,
    Double64,
    True,
    False,
    Null,
}

enum Num {
    Int(i128),
    // only values above i128::MAX
    Wide(u128),
    Float(f64),
}

impl Databox {
    pub fn kind(&self) -> DataboxKind {
        match self {
            Databox::Void => DataboxKind::Void,
            Databox::Signed64(_) => DataboxKind::Signed64,
            Databox::Unsigned64(_) => DataboxKind::Unsigned64,
            Databox::Signed128(_) => DataboxKind::Signed128,
            Databox::Unsigned128(_) => DataboxKind::Unsigned128,
            Databox::Float32(_) => DataboxKind::Float32,
            Databox::Double64(_) => DataboxKind::Double64,
            Databox::True => DataboxKind::True,
            Databox::False => DataboxKind::False,
            Databox::Null => DataboxKind::Null,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind() {
            DataboxKind::Void => "void",
            DataboxKind::Signed64 => "signed 64-bit integer",
            DataboxKind::Unsigned64 => "unsigned 64-bit integer",
            DataboxKind::Signed128 => "signed 128-bit integer",
            DataboxKind::Unsigned128 => "unsigned 128-bit integer",
            DataboxKind::Float32 => "float",
            DataboxKind::Double64 => "double",
            DataboxKind::True => "true",
            DataboxKind::False => "false",
            DataboxKind::Null => "null",
        }
    }

    /// Holds a 128-bit integer.
    #[inline]
    pub fn is_big(&self) -> bool {
        matches!(self, Databox::Signed128(_) | Databox::Unsigned128(_))
    }

    #[inline]
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Databox::Signed64(_)
                | Databox::Unsigned64(_)
                | Databox::Signed128(_)
                | Databox::Unsigned128(_)
        )
    }

    #[inline]
    pub fn is_float(&self) -> bool {
        matches!(self, Databox::Float32(_) | Databox::Double64(_))
    }

    /// NaN or an infinity.
    pub fn is_special_float(&self) -> bool {
        match *self {
            Databox::Float32(v) => !v.is_finite(),
            Databox::Double64(v) => !v.is_finite(),
            _ => false,
        }
    }

    fn num(&self) -> Option<Num> {
        Some(match *self {
            Databox::Signed64(v) => Num::Int(v as i128),
            Databox::Unsigned64(v) => Num::Int(v as i128),
            Databox::Signed128(v) => Num::Int(v),
            Databox::Unsigned128(v) => match i128::try_from(v) {
                Ok(i) => Num::Int(i),
                Err(_) => Num::Wide(v),
            },
            Databox::Float32(v) => Num::Float(v as f64),
            Databox::Double64(v) => Num::Float(v),
            _ => return None,
        })
    }

    /// Numeric ordering across variants; integer/float pairs compare
    /// exactly. Non-numeric boxes are only equal to the same variant. `None`
    /// for unordered pairs, including float NaN against float.
    pub fn compare(&self, other: &Databox) -> Option<Ordering> {
        fn int_vs_float(i: i128, d: f64) -> Ordering {
            match i64::try_from(i) {
                Ok(small) => float_ext::compare_i64_f64(small, d),
                Err(_) => float_ext::compare_i128_f64(i, d),
            }
        }

        match (self.num(), other.num()) {
            (Some(a), Some(b)) => match (a, b) {
                (Num::Int(a), Num::Int(b)) => Some(a.cmp(&b)),
                (Num::Wide(a), Num::Wide(b)) => Some(a.cmp(&b)),
                (Num::Int(_), Num::Wide(_)) => Some(Ordering::Less),
                (Num::Wide(_), Num::Int(_)) => Some(Ordering::Greater),
                (Num::Float(a), Num::Float(b)) => a.partial_cmp(&b),
                (Num::Int(i), Num::Float(d)) => Some(int_vs_float(i, d)),
                (Num::Float(d), Num::Int(i)) => Some(int_vs_float(i, d).reverse()),
                (Num::Wide(u), Num::Float(d)) => Some(float_ext::compare_u128_f64(u, d)),
                (Num::Float(d), Num::Wide(u)) => {
                    Some(float_ext::compare_u128_f64(u, d).reverse())
                }
            },
            (None, None) if self.kind() == other.kind() => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl fmt::Display for Databox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0u8; 48];
        let n = format::format_databox(self, &mut buf).map_err(|_| fmt::Error)?;
        let s = std::str::from_utf8(&buf[..n]).map_err(|_| fmt::Error)?;
        f.write_str(s)
    }
}

impl From<i64> for Databox {
    fn from(v: i64) -> Self {
        Databox::Signed64(v)
    }
}

impl From<u64> for Databox {
    fn from(v: u64) -> Self {
        Databox::Unsigned64(v)
    }
}

impl From<f64> for Databox {
    fn from(v: f64) -> Self {
        Databox::Double64(v)
    }
}

impl From<bool> for Databox {
    fn from(v: bool) -> Self {
        if v {
            Databox::True
        } else {
            Databox::False
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates() {
        assert!(Databox::Unsigned128(u128::MAX).is_big());
        assert!(!Databox::Signed64(1).is_big());
        assert!(Databox::Signed128(-1).is_integer());
        assert!(Databox::Float32(1.0).is_float());
        assert!(Databox::Double64(f64::NAN).is_special_float());
        assert!(!Databox::Double64(1.0).is_special_float());
        assert_eq!(Databox::default().kind(), DataboxKind::Void);
        assert_eq!(Databox::from(true), Databox::True);
    }

    #[test]
    fn numeric_compare_crosses_variants() {
        use Ordering::*;
        let big = Databox::Unsigned128(u128::MAX);
        assert_eq!(Databox::Signed64(-1).compare(&Databox::Unsigned64(0)), Some(Less));
        assert_eq!(big.compare(&Databox::Signed128(i128::MAX)), Some(Greater));
        assert_eq!(Databox::Signed64(3).compare(&Databox::Double64(2.5)), Some(Greater));
        assert_eq!(Databox::Double64(2.5).compare(&Databox::Signed64(3)), Some(Less));
        assert_eq!(Databox::Float32(0.5).compare(&Databox::Double64(0.5)), Some(Equal));
        assert_eq!(
            Databox::Unsigned64((1 << 53) + 1).compare(&Databox::Double64(9_007_199_254_740_992.0)),
            Some(Greater)
        );
        assert_eq!(big.compare(&Databox::Double64(f64::INFINITY)), Some(Less));
        assert_eq!(Databox::Double64(f64::NAN).compare(&Databox::Double64(1.0)), None);
        assert_eq!(Databox::Null.compare(&Databox::Null), Some(Equal));
        assert_eq!(Databox::Null.compare(&Databox::True), None);
        assert_eq!(Databox::Null.compare(&Databox::Signed64(0)), None);
    }

    #[test]
    fn display_uses_canonical_text() {
        assert_eq!(Databox::Signed128(i128::MIN).to_string(), i128::MIN.to_string());
        assert_eq!(Databox::Double64(299.5).to_string(), "299.5");
        assert_eq!(Databox::Float32(299.0).to_string(), "299.0");
        assert_eq!(Databox::True.to_string(), "true");
        assert_eq!(Databox::Void.to_string(), "");
    }
}
