//! MSB-first bit I/O over caller-provided byte buffers.

use crate::error::CodecError;

/// Appends bits MSB-first into a borrowed buffer.
#[derive(Debug)]
pub struct BitWriter<'a> {
    out: &'a mut [u8],
    bit_pos: usize,
}

impl<'a> BitWriter<'a> {
    /// Starts writing at bit 0 of `out`. Bytes are cleared as they are first touched.
    pub fn new(out: &'a mut [u8]) -> Self {
        Self { out, bit_pos: 0 }
    }

    #[inline]
    pub fn bit_pos(&self) -> usize {
        self.bit_pos
    }

    /// Bits still available in the buffer.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.out.len() * 8 - self.bit_pos
    }

    #[inline]
    pub fn push_bit(&mut self, bit: bool) -> Result<(), CodecError> {
        let byte = self.bit_pos / 8;
        let used = (self.bit_pos % 8) as u32;
        let available = self.out.len();
        let slot = self.out.get_mut(byte).ok_or(CodecError::BufferTooSmall {
            needed: byte + 1,
            available,
        })?;
        if used == 0 {
            *slot = 0;
        }
        if bit {
            *slot |= 0x80 >> used;
        }
        self.bit_pos += 1;
        Ok(())
    }

    /// Appends the low `n` bits of `v`, most significant first.
    pub fn write(&mut self, v: u64, n: u32) -> Result<(), CodecError> {
        debug_assert!(n <= 64);
        if n as usize > self.remaining() {
            return Err(CodecError::BufferTooSmall {
                needed: (self.bit_pos + n as usize).div_ceil(8),
                available: self.out.len(),
            });
        }
        for i in (0..n).rev() {
            self.push_bit((v >> i) & 1 == 1)?;
        }
        Ok(())
    }

    /// Bytes touched so far.
    #[inline]
    pub fn bytes_written(&self) -> usize {
        self.bit_pos.div_ceil(8)
    }
}

/// Reads bits MSB-first from a byte buffer bounded by a total bit count.
#[derive(Debug)]
pub struct BitReader<'a> {
    src: &'a [u8],
    bit_pos: usize,
    total_bits: usize,
}

impl<'a> BitReader<'a> {
    /// Reads at most `total_bits`, clamped to the buffer length.
    pub fn new(src: &'a [u8], total_bits: usize) -> Self {
        Self {
            src,
            bit_pos: 0,
            total_bits: total_bits.min(src.len() * 8),
        }
    }

    #[inline]
    pub fn bit_pos(&self) -> usize {
        self.bit_pos
    }

    #[inline]
    pub fn has_more(&self, n: usize) -> bool {
        self.bit_pos + n <= self.total_bits
    }

    #[inline]
    pub fn read_bit(&mut self) -> Option<bool> {
        if !self.has_more(1) {
            return None;
        }
        let byte = self.src[self.bit_pos / 8];
        let bit = byte & (0x80 >> (self.bit_pos % 8)) != 0;
        self.bit_pos += 1;
        Some(bit)
    }

    /// Reads `n <= 64` bits as an integer, or `None` if fewer remain.
    pub fn read(&mut self, n: u32) -> Option<u64> {
        debug_assert!(n <= 64);
        if !self.has_more(n as usize) {
            return None;
        }
        let mut out = 0u64;
        for _ in 0..n {
            out = (out << 1) | self.read_bit()? as u64;
        }
        Some(out)
    }
}
