use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub const DEFAULT_SEED: u64 = 0x_5641_5250_4143_4B42; // fixed seed for stable benchmarks

/// Millisecond timestamps with small random gaps.
pub fn sorted_timestamps(seed: u64, count: usize) -> Vec<u64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut ts = 1_700_000_000_000u64;
    (0..count)
        .map(|_| {
            ts += rng.random_range(1..=50);
            ts
        })
        .collect()
}

/// Values drawn from a small fixed pool (DICT territory).
pub fn low_cardinality(seed: u64, count: usize, distinct: u64) -> Vec<u64> {
    assert!(distinct > 0);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| 100 + rng.random_range(0..distinct) * 97)
        .collect()
}

/// Values in a narrow band above `base`, with one spike per `spike_every`.
pub fn clustered_with_outliers(seed: u64, count: usize, base: u64, spike_every: usize) -> Vec<u64> {
    assert!(spike_every > 0);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            if i % spike_every == spike_every - 1 {
                base + rng.random_range(1_000_000..10_000_000)
            } else {
                base + rng.random_range(0..200)
            }
        })
        .collect()
}

/// Uniform values of at most `bits` bits.
pub fn uniform(seed: u64, count: usize, bits: u32) -> Vec<u64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mask = if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 };
    (0..count).map(|_| rng.random::<u64>() & mask).collect()
}

/// Canonical decimal texts: integers and exactly representable fractions.
pub fn numeric_texts(seed: u64, count: usize) -> Vec<String> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|i| match i % 4 {
            0 => rng.random::<i64>().to_string(),
            1 => rng.random_range(0..100_000u32).to_string(),
            2 => format!("{}.25", rng.random_range(0..1_000_000u32)),
            _ => rng.random::<u128>().to_string(),
        })
        .collect()
}
