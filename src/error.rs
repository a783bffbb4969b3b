use thiserror::Error;

/// Error type for codec operations (encode, decode, random access).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Invalid element count: {count} (allowed 1..={max})")]
    InvalidCount { count: usize, max: usize },

    #[error("Destination buffer too small: needed {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    #[error("Output slice too small: needed {needed} elements, have {available}")]
    OutputTooSmall { needed: usize, available: usize },

    #[error("Truncated input at byte offset {offset}")]
    Truncated { offset: usize },

    #[error("Malformed input: {0}")]
    Malformed(String),

    /// Universal codes cannot represent zero.
    #[error("Zero value at index {index} cannot be Elias-encoded")]
    ZeroValue { index: usize },

    #[error("Input not monotonically non-decreasing at index {index}")]
    NotSorted { index: usize },

    #[error("Value at index {index} needs {bits} bits, wider than the lane")]
    ValueTooWide { index: usize, bits: u32 },

    #[error("Unknown adaptive encoding tag: {0}")]
    UnknownKind(u8),

    #[error("Dictionary too large: {size} entries (max {max})")]
    DictionaryTooLarge { size: u64, max: u64 },

    #[error("Invalid threshold configuration: {0}")]
    InvalidThreshold(String),
}

/// Reason the reliable scanner refused a byte sequence.
///
/// A refusal means no primitive formats back to exactly the input bytes.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    #[error("Empty input")]
    Empty,

    #[error("Leading zero")]
    LeadingZero,

    #[error("Leading decimal point")]
    LeadingDot,

    #[error("Negative zero does not round-trip")]
    NegativeZero,

    #[error("Unexpected byte at offset {offset}")]
    Malformed { offset: usize },

    #[error("Integer overflow")]
    Overflow,

    #[error("Fractional value does not round-trip exactly")]
    PrecisionLoss,

    #[error("Trailing zero in fractional part")]
    TrailingZero,
}

pub(crate) fn need(needed: usize, available: usize) -> Result<(), CodecError> {
    if needed > available {
        return Err(CodecError::BufferTooSmall { needed, available });
    }
    Ok(())
}

pub(crate) fn need_out(needed: usize, available: usize) -> Result<(), CodecError> {
    if needed > available {
        return Err(CodecError::OutputTooSmall { needed, available });
    }
    Ok(())
}
