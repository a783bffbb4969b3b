//! Microbench regression gates.
//!
//! These are `#[ignore]` because they are environment-sensitive. CI should
//! run them in `--release` with thresholds configured via env vars.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;
use varpack::{adaptive, bp128, scan};

const SEED: u64 = 0x_5641_5250_4143_4B4D; // fixed seed for microbench fixtures

fn sorted_timestamps(n: usize) -> Vec<u64> {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let mut ts = 1_700_000_000_000u64;
    (0..n)
        .map(|_| {
            ts += rng.random_range(1..=50);
            ts
        })
        .collect()
}

fn numeric_texts(n: usize) -> Vec<String> {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED ^ 0xA5A5);
    (0..n)
        .map(|i| {
            if i % 4 == 0 {
                format!("{}.5", rng.random_range(0..1_000_000u32))
            } else {
                rng.random::<i64>().to_string()
            }
        })
        .collect()
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.parse::<u64>().ok())
}

#[test]
#[ignore]
fn microbench_adaptive_encode_throughput_guard() {
    let min_values_per_sec = match env_u64("VARPACK_MIN_ENCODE_VALUES_PER_SEC") {
        Some(v) => v as f64,
        None => return, // not configured; CI must set this
    };

    let count = env_u64("VARPACK_MICROBENCH_VALUES").unwrap_or(1_000_000) as usize;
    let values = sorted_timestamps(count);
    let mut buf = vec![0u8; adaptive::max_size(values.len())];

    let started = Instant::now();
    let n = adaptive::encode(&mut buf, &values).unwrap();
    let elapsed = started.elapsed().as_secs_f64();
    assert!(n < values.len() * 8);

    let per_sec = count as f64 / elapsed.max(1e-9);
    assert!(
        per_sec >= min_values_per_sec,
        "adaptive encode regression: got {:.0} values/s, expected >= {} values/s",
        per_sec,
        min_values_per_sec as u64
    );
}

#[test]
#[ignore]
fn microbench_bp128_decode_throughput_guard() {
    let min_values_per_sec = match env_u64("VARPACK_MIN_DECODE_VALUES_PER_SEC") {
        Some(v) => v as f64,
        None => return, // not configured; CI must set this
    };

    let count = env_u64("VARPACK_MICROBENCH_VALUES").unwrap_or(1_000_000) as usize;
    let values = sorted_timestamps(count);
    let mut buf = vec![0u8; bp128::max_bytes_delta64(values.len())];
    let meta = bp128::encode_delta64(&mut buf, &values).unwrap();
    let mut out = vec![0u64; values.len()];

    let started = Instant::now();
    let n = bp128::decode_delta64(&buf[..meta.encoded_bytes], &mut out).unwrap();
    let elapsed = started.elapsed().as_secs_f64();
    assert_eq!(n, count);

    let per_sec = count as f64 / elapsed.max(1e-9);
    assert!(
        per_sec >= min_values_per_sec,
        "bp128 delta decode regression: got {:.0} values/s, expected >= {} values/s",
        per_sec,
        min_values_per_sec as u64
    );
}

#[test]
#[ignore]
fn microbench_scan_latency_guard() {
    let max_ns_per_scan = match env_u64("VARPACK_MAX_SCAN_NS") {
        Some(v) => v as f64,
        None => return, // not configured; CI must set this
    };

    let texts = numeric_texts(env_u64("VARPACK_MICROBENCH_TEXTS").unwrap_or(200_000) as usize);

    let started = Instant::now();
    let accepted = texts
        .iter()
        .filter(|t| scan(t.as_bytes()).is_ok())
        .count();
    let ns_per_scan = started.elapsed().as_nanos() as f64 / texts.len().max(1) as f64;
    assert_eq!(accepted, texts.len());

    assert!(
        ns_per_scan <= max_ns_per_scan,
        "scan latency regression: got {:.1}ns, expected <= {:.1}ns",
        ns_per_scan,
        max_ns_per_scan
    );
}
