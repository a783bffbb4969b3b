//! Adaptive encoding: analyze an array, pick the cheapest fitting codec, and
//! emit `[kind: u8][sub-codec bytes]`.

use std::sync::Arc;

use crate::bp128;
use crate::dict;
use crate::error::{need, need_out, CodecError};
use crate::frame;
use crate::pfor;
use crate::tagged;
use crate::telemetry::{codec_metrics, noop_event_listener, CodecEvent, CodecEventListener};

use serde::{Deserialize, Serialize};

/// Wire format chosen for one array. The discriminant is the tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum AdaptiveKind {
    Delta = 0,
    For = 1,
    Pfor = 2,
    Dict = 3,
    Varint = 5,
    Raw = 7,
}

impl AdaptiveKind {
    pub const ALL: [AdaptiveKind; 6] = [
        AdaptiveKind::Delta,
        AdaptiveKind::For,
        AdaptiveKind::Pfor,
        AdaptiveKind::Dict,
        AdaptiveKind::Varint,
        AdaptiveKind::Raw,
    ];

    #[inline]
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Result<Self, CodecError> {
        Self::ALL
            .into_iter()
            .find(|k| k.tag() == tag)
            .ok_or(CodecError::UnknownKind(tag))
    }

    pub fn name(self) -> &'static str {
        match self {
            AdaptiveKind::Delta => "delta",
            AdaptiveKind::For => "for",
            AdaptiveKind::Pfor => "pfor",
            AdaptiveKind::Dict => "dict",
            AdaptiveKind::Varint => "varint",
            AdaptiveKind::Raw => "raw",
        }
    }
}

impl std::fmt::Display for AdaptiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub const DEFAULT_DICT_MAX_UNIQUE_RATIO: f64 = 0.15;
pub const DEFAULT_DELTA_MAX_AVG_GAP: f64 = 1000.0;
pub const DEFAULT_DELTA_MIN_RATIO_DIVISOR: f64 = 10.0;
pub const DEFAULT_PFOR_MAX_OUTLIER_RATIO: f64 = 0.05;
pub const DEFAULT_OUTLIER_PERCENTILE: u32 = 95;
pub const DEFAULT_FOR_RANGE_FACTOR: u64 = 100;
pub const DEFAULT_PFOR_THRESHOLD_PERCENTILE: u32 = pfor::DEFAULT_THRESHOLD_PERCENTILE;

/// Selection thresholds for the adaptive encoder.
///
/// Every field has a default; a partial TOML or JSON document only needs to
/// name the thresholds it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveConfig {
    /// DICT is chosen below this distinct/total ratio.
    pub dict_max_unique_ratio: f64,
    /// Sorted input whose mean gap is below this goes to DELTA.
    pub delta_max_avg_gap: f64,
    /// Sorted input with `avg_delta < min / divisor` also goes to DELTA.
    pub delta_min_ratio_divisor: f64,
    /// PFOR is chosen below this outlier ratio.
    pub pfor_max_outlier_ratio: f64,
    /// A value above `min + range * p / 100` counts as an outlier.
    pub outlier_percentile: u32,
    /// FOR is chosen when `range < count * factor`.
    pub for_range_factor: u64,
    /// Percentile of the sorted input used as the PFOR exception threshold.
    pub pfor_threshold_percentile: u32,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            dict_max_unique_ratio: DEFAULT_DICT_MAX_UNIQUE_RATIO,
            delta_max_avg_gap: DEFAULT_DELTA_MAX_AVG_GAP,
            delta_min_ratio_divisor: DEFAULT_DELTA_MIN_RATIO_DIVISOR,
            pfor_max_outlier_ratio: DEFAULT_PFOR_MAX_OUTLIER_RATIO,
            outlier_percentile: DEFAULT_OUTLIER_PERCENTILE,
            for_range_factor: DEFAULT_FOR_RANGE_FACTOR,
            pfor_threshold_percentile: DEFAULT_PFOR_THRESHOLD_PERCENTILE,
        }
    }
}

impl AdaptiveConfig {
    pub fn validate(&self) -> Result<(), CodecError> {
        fn ratio(name: &str, v: f64) -> Result<(), CodecError> {
            if !(0.0..=1.0).contains(&v) {
                return Err(CodecError::InvalidThreshold(format!(
                    "{name} must be within 0..=1, got {v}"
                )));
            }
            Ok(())
        }
        fn percentile(name: &str, v: u32) -> Result<(), CodecError> {
            if !(1..=100).contains(&v) {
                return Err(CodecError::InvalidThreshold(format!(
                    "{name} must be within 1..=100, got {v}"
                )));
            }
            Ok(())
        }

        ratio("dict_max_unique_ratio", self.dict_max_unique_ratio)?;
        ratio("pfor_max_outlier_ratio", self.pfor_max_outlier_ratio)?;
        percentile("outlier_percentile", self.outlier_percentile)?;
        percentile("pfor_threshold_percentile", self.pfor_threshold_percentile)?;
        if self.delta_max_avg_gap.is_nan() || self.delta_max_avg_gap < 0.0 {
            return Err(CodecError::InvalidThreshold(format!(
                "delta_max_avg_gap must be non-negative, got {}",
                self.delta_max_avg_gap
            )));
        }
        if self.delta_min_ratio_divisor.is_nan() || self.delta_min_ratio_divisor <= 0.0 {
            return Err(CodecError::InvalidThreshold(format!(
                "delta_min_ratio_divisor must be positive, got {}",
                self.delta_min_ratio_divisor
            )));
        }
        if self.for_range_factor == 0 {
            return Err(CodecError::InvalidThreshold(
                "for_range_factor must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Statistics driving the codec choice.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AdaptiveStats {
    pub count: usize,
    pub min: u64,
    pub max: u64,
    pub range: u64,
    pub unique_count: usize,
    pub unique_ratio: f64,
    /// Mean absolute difference between neighbours.
    pub avg_delta: f64,
    pub max_delta: u64,
    pub outlier_count: usize,
    pub outlier_ratio: f64,
    /// Population variance.
    pub variance: f64,
    pub is_sorted: bool,
    pub is_reverse_sorted: bool,
}

/// Computes [`AdaptiveStats`]; `outlier_percentile` is as in [`AdaptiveConfig`].
pub fn analyze_with(values: &[u64], outlier_percentile: u32) -> AdaptiveStats {
    let count = values.len();
    if count == 0 {
        return AdaptiveStats {
            is_sorted: true,
            is_reverse_sorted: true,
            ..AdaptiveStats::default()
        };
    }

    let mut min = u64::MAX;
    let mut max = 0;
    let mut sum = 0f64;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
        sum += v as f64;
    }
    let range = max - min;
    let mean = sum / count as f64;
    let variance = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / count as f64;

    let mut is_sorted = true;
    let mut is_reverse_sorted = true;
    let mut delta_sum = 0f64;
    let mut max_delta = 0;
    for w in values.windows(2) {
        is_sorted &= w[0] <= w[1];
        is_reverse_sorted &= w[0] >= w[1];
        let d = w[0].abs_diff(w[1]);
        delta_sum += d as f64;
        max_delta = max_delta.max(d);
    }
    let avg_delta = if count > 1 {
        delta_sum / (count - 1) as f64
    } else {
        0.0
    };

    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    let unique_count = sorted.len();

    let cutoff = min + (range as u128 * outlier_percentile as u128 / 100) as u64;
    let outlier_count = values.iter().filter(|&&v| v > cutoff).count();

    AdaptiveStats {
        count,
        min,
        max,
        range,
        unique_count,
        unique_ratio: unique_count as f64 / count as f64,
        avg_delta,
        max_delta,
        outlier_count,
        outlier_ratio: outlier_count as f64 / count as f64,
        variance,
        is_sorted,
        is_reverse_sorted,
    }
}

pub fn analyze(values: &[u64]) -> AdaptiveStats {
    analyze_with(values, DEFAULT_OUTLIER_PERCENTILE)
}

fn payload_size(values: &[u64], kind: AdaptiveKind, config: &AdaptiveConfig) -> usize {
    let count_len = tagged::len(values.len() as u64);
    match kind {
        AdaptiveKind::Delta => {
            let mut deltas = 0usize;
            // same block layout as the delta64 encoder
            let gaps: Vec<u64> = values.windows(2).map(|w| w[1].wrapping_sub(w[0])).collect();
            for chunk in gaps.chunks(bp128::BLOCK) {
                let folded = chunk.iter().fold(0u64, |a, &d| a | d);
                let b = 64 - folded.leading_zeros() as usize;
                let header = if chunk.len() == bp128::BLOCK { 1 } else { 2 };
                deltas += header + (chunk.len() * b).div_ceil(8);
            }
            let first = values.first().map_or(0, |&v| tagged::len(v));
            count_len + first + deltas
        }
        AdaptiveKind::For => frame::size(values),
        AdaptiveKind::Pfor => pfor::size(values, config.pfor_threshold_percentile),
        AdaptiveKind::Dict => dict::size(values),
        AdaptiveKind::Varint => count_len + values.iter().map(|&v| tagged::len(v)).sum::<usize>(),
        AdaptiveKind::Raw => count_len + values.len() * 8,
    }
}

/// Worst-case encoded size over every kind, tag byte included.
pub fn max_size(count: usize) -> usize {
    29 + 26 * count
}

/// Configured adaptive encoder with an observability hook.
#[derive(Debug, Clone)]
pub struct AdaptiveEncoder {
    config: AdaptiveConfig,
    listener: Arc<dyn CodecEventListener>,
}

impl Default for AdaptiveEncoder {
    fn default() -> Self {
        Self {
            config: AdaptiveConfig::default(),
            listener: noop_event_listener(),
        }
    }
}

impl AdaptiveEncoder {
    pub fn new(config: AdaptiveConfig) -> Result<Self, CodecError> {
        config.validate()?;
        Ok(Self {
            config,
            listener: noop_event_listener(),
        })
    }

    pub fn with_listener(mut self, listener: Arc<dyn CodecEventListener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn config(&self) -> &AdaptiveConfig {
        &self.config
    }

    pub fn analyze(&self, values: &[u64]) -> AdaptiveStats {
        analyze_with(values, self.config.outlier_percentile)
    }

    /// Applies the selection rules to precomputed statistics. DELTA, PFOR
    /// and FOR are only picked on their structural conditions; the final
    /// VARINT-or-RAW fallback compares sizes against `values`.
    pub fn choose(&self, stats: &AdaptiveStats, values: &[u64]) -> AdaptiveKind {
        let c = &self.config;
        if stats.count <= 1 {
            return AdaptiveKind::Varint;
        }
        if stats.unique_ratio < c.dict_max_unique_ratio {
            return AdaptiveKind::Dict;
        }
        if stats.is_sorted {
            let small_vs_min =
                stats.min > 0 && stats.avg_delta < stats.min as f64 / c.delta_min_ratio_divisor;
            if small_vs_min || stats.avg_delta < c.delta_max_avg_gap {
                return AdaptiveKind::Delta;
            }
        }
        if stats.outlier_ratio < c.pfor_max_outlier_ratio && stats.range > 0 {
            return AdaptiveKind::Pfor;
        }
        if stats.range > 0 && (stats.range as u128) < stats.count as u128 * c.for_range_factor as u128 {
            return AdaptiveKind::For;
        }
        let varint = payload_size(values, AdaptiveKind::Varint, c);
        let raw = payload_size(values, AdaptiveKind::Raw, c);
        if varint < raw {
            AdaptiveKind::Varint
        } else {
            AdaptiveKind::Raw
        }
    }

    pub fn select(&self, values: &[u64]) -> AdaptiveKind {
        self.choose(&self.analyze(values), values)
    }

    /// Encoded size with the kind this encoder would pick.
    pub fn encoded_size(&self, values: &[u64]) -> usize {
        1 + payload_size(values, self.select(values), &self.config)
    }

    pub fn encoded_size_with(&self, values: &[u64], kind: AdaptiveKind) -> usize {
        1 + payload_size(values, kind, &self.config)
    }

    pub fn encode(&self, dst: &mut [u8], values: &[u64]) -> Result<usize, CodecError> {
        let stats = self.analyze(values);
        let kind = self.choose(&stats, values);
        self.listener.on_event(CodecEvent::EncodingSelected {
            kind,
            count: stats.count,
            unique_ratio: stats.unique_ratio,
            range: stats.range,
            is_sorted: stats.is_sorted,
        });
        self.encode_with(dst, values, kind)
    }

    /// Encodes with a caller-forced kind.
    pub fn encode_with(
        &self,
        dst: &mut [u8],
        values: &[u64],
        kind: AdaptiveKind,
    ) -> Result<usize, CodecError> {
        need(1, dst.len())?;
        dst[0] = kind.tag();
        let body = &mut dst[1..];
        let n = match kind {
            AdaptiveKind::Delta => {
                let mut pos = 0;
                tagged::write_at(body, &mut pos, values.len() as u64)?;
                let meta = bp128::encode_delta64(&mut body[pos..], values)?;
                pos + meta.encoded_bytes
            }
            AdaptiveKind::For => frame::encode(body, values)?,
            AdaptiveKind::Pfor => pfor::encode(body, values, self.config.pfor_threshold_percentile)?,
            AdaptiveKind::Dict => dict::encode(body, values)?,
            AdaptiveKind::Varint => {
                let mut pos = 0;
                tagged::write_at(body, &mut pos, values.len() as u64)?;
                for &v in values {
                    tagged::write_at(body, &mut pos, v)?;
                }
                pos
            }
            AdaptiveKind::Raw => {
                let mut pos = 0;
                tagged::write_at(body, &mut pos, values.len() as u64)?;
                need(pos + values.len() * 8, body.len())?;
                for &v in values {
                    body[pos..pos + 8].copy_from_slice(&v.to_le_bytes());
                    pos += 8;
                }
                pos
            }
        };
        let total = 1 + n;
        codec_metrics::record_encode(kind, values.len(), total);
        self.listener.on_event(CodecEvent::Encoded {
            kind,
            values: values.len(),
            bytes: total,
        });
        Ok(total)
    }

    pub fn decode(&self, src: &[u8], out: &mut [u64]) -> Result<usize, CodecError> {
        let kind = match read_kind(src) {
            Ok(kind) => kind,
            Err(error) => return Err(self.failed(None, error)),
        };
        match decode_body(kind, &src[1..], out) {
            Ok(n) => {
                codec_metrics::record_decode(kind, n);
                self.listener.on_event(CodecEvent::Decoded { kind, values: n });
                Ok(n)
            }
            Err(error) => Err(self.failed(Some(kind), error)),
        }
    }

    fn failed(&self, kind: Option<AdaptiveKind>, error: CodecError) -> CodecError {
        codec_metrics::record_decode_failure();
        self.listener.on_event(CodecEvent::DecodeFailed {
            kind,
            error: error.clone(),
        });
        error
    }
}

fn read_count(src: &[u8], pos: &mut usize, out: &[u64]) -> Result<usize, CodecError> {
    let count = tagged::read_at(src, pos)?;
    let count = usize::try_from(count)
        .map_err(|_| CodecError::Malformed(format!("adaptive count {count}")))?;
    need_out(count, out.len())?;
    Ok(count)
}

fn decode_body(kind: AdaptiveKind, src: &[u8], out: &mut [u64]) -> Result<usize, CodecError> {
    match kind {
        AdaptiveKind::Delta => {
            let mut pos = 0;
            let count = read_count(src, &mut pos, out)?;
            bp128::decode_delta64_counted(&src[pos..], out, count)
        }
        AdaptiveKind::For => frame::decode(src, out),
        AdaptiveKind::Pfor => pfor::decode(src, out),
        AdaptiveKind::Dict => dict::decode(src, out),
        AdaptiveKind::Varint => {
            let mut pos = 0;
            let count = read_count(src, &mut pos, out)?;
            for slot in &mut out[..count] {
                *slot = tagged::read_at(src, &mut pos)?;
            }
            Ok(count)
        }
        AdaptiveKind::Raw => {
            let mut pos = 0;
            let count = read_count(src, &mut pos, out)?;
            let end = count
                .checked_mul(8)
                .and_then(|n| n.checked_add(pos))
                .ok_or_else(|| CodecError::Malformed("raw body length overflows".into()))?;
            let body = src
                .get(pos..end)
                .ok_or(CodecError::Truncated { offset: src.len() })?;
            for (slot, chunk) in out.iter_mut().zip(body.chunks_exact(8)) {
                let mut b = [0u8; 8];
                b.copy_from_slice(chunk);
                *slot = u64::from_le_bytes(b);
            }
            Ok(count)
        }
    }
}

/// Header of an adaptive stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptiveMeta {
    pub kind: AdaptiveKind,
    pub count: usize,
}

fn read_kind(src: &[u8]) -> Result<AdaptiveKind, CodecError> {
    let tag = *src.first().ok_or(CodecError::Truncated { offset: 0 })?;
    AdaptiveKind::from_tag(tag)
}

/// Kind and element count of an encoded stream, without decoding values.
pub fn read_meta(src: &[u8]) -> Result<AdaptiveMeta, CodecError> {
    let kind = read_kind(src)?;
    let body = &src[1..];
    let count = match kind {
        AdaptiveKind::Delta | AdaptiveKind::Varint | AdaptiveKind::Raw => {
            let count = tagged::read_at(body, &mut 0)?;
            usize::try_from(count)
                .map_err(|_| CodecError::Malformed(format!("adaptive count {count}")))?
        }
        AdaptiveKind::For => frame::count(body)?,
        AdaptiveKind::Pfor => pfor::read_meta(body)?.count,
        AdaptiveKind::Dict => dict::count(body)?,
    };
    Ok(AdaptiveMeta { kind, count })
}

/// Kind the default encoder would pick.
pub fn choose(values: &[u64]) -> AdaptiveKind {
    AdaptiveEncoder::default().select(values)
}

pub fn encode(dst: &mut [u8], values: &[u64]) -> Result<usize, CodecError> {
    AdaptiveEncoder::default().encode(dst, values)
}

pub fn encode_with(dst: &mut [u8], values: &[u64], kind: AdaptiveKind) -> Result<usize, CodecError> {
    AdaptiveEncoder::default().encode_with(dst, values, kind)
}

pub fn decode(src: &[u8], out: &mut [u64]) -> Result<usize, CodecError> {
    AdaptiveEncoder::default().decode(src, out)
}

pub fn encoded_size(values: &[u64]) -> usize {
    AdaptiveEncoder::default().encoded_size(values)
}

/// Raw size (8 bytes per value) over the adaptive encoded size; 0 when empty.
pub fn compression_ratio(values: &[u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    (values.len() * 8) as f64 / encoded_size(values) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(values: &[u64], kind: AdaptiveKind) {
        let mut buf = vec![0u8; max_size(values.len())];
        let n = encode_with(&mut buf, values, kind).unwrap();
        assert_eq!(n, AdaptiveEncoder::default().encoded_size_with(values, kind), "{kind}");
        assert_eq!(read_meta(&buf[..n]).unwrap(), AdaptiveMeta { kind, count: values.len() });
        let mut out = vec![0u64; values.len()];
        assert_eq!(decode(&buf[..n], &mut out).unwrap(), values.len());
        assert_eq!(out, values, "{kind}");
    }

    #[test]
    fn every_kind_roundtrips_when_forced() {
        let values: Vec<u64> = (0..300u64).map(|i| i * i + 17).collect();
        for kind in AdaptiveKind::ALL {
            roundtrip(&values, kind);
            roundtrip(&[], kind);
            roundtrip(&[u64::MAX], kind);
        }
    }

    #[test]
    fn status_codes_choose_dict() {
        let values: Vec<u64> = [200u64, 404, 500, 304, 403]
            .iter()
            .copied()
            .cycle()
            .take(1000)
            .collect();
        assert_eq!(choose(&values), AdaptiveKind::Dict);
        assert!(compression_ratio(&values) >= 3.0);
    }

    #[test]
    fn sorted_timestamps_choose_delta() {
        let values: Vec<u64> = (0..500).map(|i| 1_700_000_000 + i * 15).collect();
        let stats = analyze(&values);
        assert!(stats.is_sorted);
        assert!(!stats.is_reverse_sorted);
        assert_eq!(stats.avg_delta, 15.0);
        assert_eq!(choose(&values), AdaptiveKind::Delta);
        roundtrip(&values, AdaptiveKind::Delta);
    }

    #[test]
    fn clustered_values_choose_for_and_pfor() {
        // 90 distinct values in a narrow band; too many sit near the top for PFOR
        let mut values: Vec<u64> = (0..400).map(|i| 10_000 + (i * 7919) % 90).collect();
        assert_eq!(choose(&values), AdaptiveKind::For);
        roundtrip(&values, AdaptiveKind::For);

        values[10] = 1_000_000;
        values[200] = 1_000_000;
        let stats = analyze(&values);
        assert_eq!(stats.outlier_count, 2);
        assert_eq!(choose(&values), AdaptiveKind::Pfor);
        roundtrip(&values, AdaptiveKind::Pfor);

        let strict = AdaptiveEncoder::new(AdaptiveConfig {
            pfor_max_outlier_ratio: 0.0,
            ..AdaptiveConfig::default()
        })
        .unwrap();
        assert_eq!(strict.select(&values), AdaptiveKind::Varint);
    }

    #[test]
    fn tiny_inputs_choose_varint() {
        assert_eq!(choose(&[]), AdaptiveKind::Varint);
        assert_eq!(choose(&[42]), AdaptiveKind::Varint);
    }

    #[test]
    fn statistics_cover_spread() {
        let s = analyze(&[10, 20, 30, 1000]);
        assert_eq!(s.min, 10);
        assert_eq!(s.max, 1000);
        assert_eq!(s.range, 990);
        assert_eq!(s.unique_count, 4);
        assert_eq!(s.max_delta, 970);
        assert_eq!(s.outlier_count, 1);
        assert_eq!(s.outlier_ratio, 0.25);
        assert!(s.variance > 0.0);
        let r = analyze(&[5, 4, 4, 1]);
        assert!(r.is_reverse_sorted && !r.is_sorted);
    }

    #[test]
    fn delta_stream_decodes_from_padded_buffer() {
        // 128 deltas end on a full block, so the zero padding looks like more blocks
        let values: Vec<u64> = (0..129).map(|i| 1_700_000_000 + i * 15).collect();
        assert_eq!(choose(&values), AdaptiveKind::Delta);
        let mut buf = vec![0u8; max_size(values.len())];
        let n = encode(&mut buf, &values).unwrap();
        assert!(n < buf.len());

        let mut out = vec![0u64; values.len()];
        assert_eq!(decode(&buf, &mut out).unwrap(), values.len());
        assert_eq!(out, values);

        let mut wide = vec![0u64; 1000];
        assert_eq!(decode(&buf, &mut wide).unwrap(), values.len());
        assert_eq!(&wide[..values.len()], &values[..]);
        assert_eq!(read_meta(&buf).unwrap().count, values.len());

        for kind in [AdaptiveKind::Varint, AdaptiveKind::Raw, AdaptiveKind::For] {
            encode_with(&mut buf, &values, kind).unwrap();
            assert_eq!(decode(&buf, &mut wide).unwrap(), values.len(), "{kind}");
        }
    }

    #[test]
    fn unknown_tags_and_bad_configs() {
        assert_eq!(read_meta(&[4]), Err(CodecError::UnknownKind(4)));
        assert!(matches!(decode(&[], &mut []), Err(CodecError::Truncated { .. })));
        for cfg in [
            AdaptiveConfig {
                dict_max_unique_ratio: 1.5,
                ..AdaptiveConfig::default()
            },
            AdaptiveConfig {
                pfor_threshold_percentile: 0,
                ..AdaptiveConfig::default()
            },
            AdaptiveConfig {
                delta_min_ratio_divisor: 0.0,
                ..AdaptiveConfig::default()
            },
        ] {
            assert!(matches!(
                AdaptiveEncoder::new(cfg),
                Err(CodecError::InvalidThreshold(_))
            ));
        }
    }
}
