//! Fixed-width little-endian integer primitives and byte-width selection.

use crate::error::{need, CodecError};

use serde::{Deserialize, Serialize};

/// Number of bytes used to store an unsigned value.
///
/// Invalid widths have no variant; lookups that can fail return `Option<Width>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Width {
    W1 = 1,
    W2 = 2,
    W3 = 3,
    W4 = 4,
    W5 = 5,
    W6 = 6,
    W7 = 7,
    W8 = 8,
}

const ALL: [Width; 8] = [
    Width::W1,
    Width::W2,
    Width::W3,
    Width::W4,
    Width::W5,
    Width::W6,
    Width::W7,
    Width::W8,
];

impl Width {
    /// Smallest `k` such that `v < 2^(8k)`.
    #[inline]
    pub fn of(v: u64) -> Width {
        let bits = 64 - (v | 1).leading_zeros();
        ALL[((bits + 7) / 8 - 1) as usize]
    }

    #[inline]
    pub fn from_bytes(n: usize) -> Option<Width> {
        if (1..=8).contains(&n) {
            Some(ALL[n - 1])
        } else {
            None
        }
    }

    #[inline]
    pub fn bytes(self) -> usize {
        self as usize
    }

    /// Largest value representable at this width.
    #[inline]
    pub fn max_value(self) -> u64 {
        match self {
            Width::W8 => u64::MAX,
            w => (1u64 << (8 * w.bytes())) - 1,
        }
    }

    /// Snap up to the group-varint width set `{1, 2, 4, 8}`.
    #[inline]
    pub fn snap_group(self) -> Width {
        match self {
            Width::W1 => Width::W1,
            Width::W2 => Width::W2,
            Width::W3 | Width::W4 => Width::W4,
            _ => Width::W8,
        }
    }
}

#[inline]
pub fn width_of(v: u64) -> Width {
    Width::of(v)
}

/// Writes the low `width` bytes of `v` little-endian into `dst`.
#[inline]
pub fn put(dst: &mut [u8], v: u64, width: Width) -> Result<usize, CodecError> {
    let n = width.bytes();
    need(n, dst.len())?;
    dst[..n].copy_from_slice(&v.to_le_bytes()[..n]);
    Ok(n)
}

#[inline]
pub fn get(src: &[u8], width: Width) -> Result<u64, CodecError> {
    let n = width.bytes();
    if src.len() < n {
        return Err(CodecError::Truncated { offset: src.len() });
    }
    let mut b = [0u8; 8];
    b[..n].copy_from_slice(&src[..n]);
    Ok(u64::from_le_bytes(b))
}

// Caller has already sized `dst`.
#[inline]
pub(crate) fn put_unchecked_len(dst: &mut [u8], v: u64, n: usize) {
    dst[..n].copy_from_slice(&v.to_le_bytes()[..n]);
}

#[inline]
pub(crate) fn get_len(src: &[u8], n: usize) -> u64 {
    let mut b = [0u8; 8];
    b[..n].copy_from_slice(&src[..n]);
    u64::from_le_bytes(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_boundaries_follow_byte_powers() {
        assert_eq!(width_of(0), Width::W1);
        assert_eq!(width_of(255), Width::W1);
        assert_eq!(width_of(256), Width::W2);
        assert_eq!(width_of(65_535), Width::W2);
        assert_eq!(width_of(65_536), Width::W3);
        assert_eq!(width_of((1 << 24) - 1), Width::W3);
        assert_eq!(width_of(1 << 24), Width::W4);
        assert_eq!(width_of(1 << 56), Width::W8);
        assert_eq!(width_of(u64::MAX), Width::W8);
        for w in ALL {
            assert_eq!(width_of(w.max_value()), w);
        }
    }

    #[test]
    fn group_snapping_collapses_odd_widths() {
        assert_eq!(Width::W3.snap_group(), Width::W4);
        assert_eq!(Width::W5.snap_group(), Width::W8);
        assert_eq!(Width::W7.snap_group(), Width::W8);
        assert_eq!(Width::W2.snap_group(), Width::W2);
    }

    #[test]
    fn put_get_three_byte_value() {
        let mut buf = [0xFFu8; 4];
        assert_eq!(put(&mut buf, 0x0A0B0C, Width::W3).unwrap(), 3);
        assert_eq!(buf, [0x0C, 0x0B, 0x0A, 0xFF]);
        assert_eq!(get(&buf, Width::W3).unwrap(), 0x0A0B0C);
    }

    #[test]
    fn short_buffers_are_rejected() {
        let mut buf = [0u8; 2];
        assert!(matches!(
            put(&mut buf, 1, Width::W4),
            Err(CodecError::BufferTooSmall { needed: 4, available: 2 })
        ));
        assert!(matches!(get(&buf, Width::W8), Err(CodecError::Truncated { .. })));
        assert_eq!(Width::from_bytes(0), None);
        assert_eq!(Width::from_bytes(9), None);
    }
}
