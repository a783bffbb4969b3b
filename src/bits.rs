//! Population count and bit position enumeration over byte arrays.
//!
//! Bit `k` of byte `j` is position `8j + k`.

/// Integer type receiving bit positions.
pub trait BitPosition: Copy {
    /// `None` when `position` does not fit the type.
    fn from_position(position: u64) -> Option<Self>;
}

macro_rules! impl_bit_position {
    ($($t:ty),*) => {
        $(
            impl BitPosition for $t {
                #[inline]
                fn from_position(position: u64) -> Option<Self> {
                    <$t>::try_from(position).ok()
                }
            }
        )*
    };
}

impl_bit_position!(u8, u16, u32, u64);

/// Number of set bits.
pub fn popcount(data: &[u8]) -> u64 {
    let mut chunks = data.chunks_exact(8);
    let mut total: u64 = 0;
    for chunk in &mut chunks {
        let mut w = [0u8; 8];
        w.copy_from_slice(chunk);
        total += u64::from_le_bytes(w).count_ones() as u64;
    }
    total
        + chunks
            .remainder()
            .iter()
            .map(|b| b.count_ones() as u64)
            .sum::<u64>()
}

// Walks words of `data` (optionally inverted) and emits positions of set
// bits. Stops when `out` is full or a position does not fit `P`.
fn positions<P: BitPosition>(data: &[u8], invert: bool, out: &mut [P]) -> usize {
    let mut written = 0;
    let mut base: u64 = 0;
    for chunk in data.chunks(8) {
        let mut w = [0u8; 8];
        w[..chunk.len()].copy_from_slice(chunk);
        let mut word = u64::from_le_bytes(w);
        if invert {
            word = !word;
            if chunk.len() < 8 {
                word &= (1u64 << (8 * chunk.len())) - 1;
            }
        }
        while word != 0 {
            if written == out.len() {
                return written;
            }
            let pos = base + word.trailing_zeros() as u64;
            let Some(p) = P::from_position(pos) else {
                return written;
            };
            out[written] = p;
            written += 1;
            word &= word - 1;
        }
        base += 64;
    }
    written
}

/// Writes the positions of set bits into `out`; returns how many.
pub fn set_positions<P: BitPosition>(data: &[u8], out: &mut [P]) -> usize {
    positions(data, false, out)
}

/// Writes the positions of clear bits into `out`; returns how many.
pub fn unset_positions<P: BitPosition>(data: &[u8], out: &mut [P]) -> usize {
    positions(data, true, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_every_byte() {
        assert_eq!(popcount(&[]), 0);
        assert_eq!(popcount(&[0xFF; 9]), 72);
        assert_eq!(popcount(&[0b1010_0001, 0, 0x80]), 4);
    }

    #[test]
    fn positions_are_little_endian() {
        let data = [0b0000_0101u8, 0, 0b1000_0000];
        let mut out = [0u16; 8];
        assert_eq!(set_positions(&data, &mut out), 3);
        assert_eq!(&out[..3], &[0, 2, 23]);

        let mut clear = [0u32; 32];
        assert_eq!(unset_positions(&data, &mut clear), 21);
        assert_eq!(clear[0], 1);
        assert_eq!(clear[20], 22);
    }

    #[test]
    fn enumeration_stops_early() {
        let data = [0xFFu8; 40];
        let mut out = [0u64; 5];
        assert_eq!(set_positions(&data, &mut out), 5);
        assert_eq!(out, [0, 1, 2, 3, 4]);

        // u8 positions end at 255
        let mut wide = vec![0u8; 320];
        assert_eq!(set_positions(&data, &mut wide), 256);
        assert_eq!(wide[255], 255);
    }
}
