#![doc = include_str!("../README.md")]
// Declare modules
pub mod adaptive;
pub mod bitstream;
pub mod bits;
pub mod bp128;
pub mod databox;
pub mod dict;
pub mod elias;
pub mod error;
pub mod float_ext;
pub mod format;
pub mod frame;
pub mod group;
pub mod pfor;
pub mod rle;
pub mod scan;
pub mod tagged;
pub mod telemetry;
pub mod width;

/// Adaptive encoder with configurable thresholds and an event hook.
pub use crate::adaptive::{AdaptiveConfig, AdaptiveEncoder, AdaptiveKind, AdaptiveMeta, AdaptiveStats};
/// Per-stream metadata returned by the BP128 encoders.
pub use crate::bp128::Bp128Meta;
/// Tagged scalar produced by the reliable scanner.
pub use crate::databox::{Databox, DataboxKind};
/// Error types for codec and scan operations.
pub use crate::error::{CodecError, ScanError};
/// Reliable text to number conversion.
pub use crate::scan::{scan, scan_convert_128};
/// Structured event hook for observability.
pub use crate::telemetry::{CodecEvent, CodecEventListener, TracingEventListener};
/// Byte width of an unsigned value.
pub use crate::width::Width;
