use iai_callgrind::{library_benchmark, library_benchmark_group, main, LibraryBenchmarkConfig};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;
use varpack::{adaptive, bp128, scan_convert_128};

const SEED: u64 = 0x_5641_5250_4143_4B42; // fixed seed for stable fixtures

#[derive(Debug)]
struct Fixture {
    values: Vec<u64>,
    buf: Vec<u8>,
}

fn timestamps(count: usize) -> Vec<u64> {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let mut ts = 1_700_000_000_000u64;
    (0..count)
        .map(|_| {
            ts += rng.random_range(1..=50);
            ts
        })
        .collect()
}

fn status_codes(count: usize) -> Vec<u64> {
    let codes = [200u64, 201, 204, 301, 304, 400, 404, 500];
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    (0..count)
        .map(|_| codes[rng.random_range(0..codes.len())])
        .collect()
}

fn setup_encode(values: Vec<u64>) -> Fixture {
    let buf = vec![0u8; adaptive::max_size(values.len())];
    Fixture { values, buf }
}

fn setup_decode(values: Vec<u64>) -> Fixture {
    let mut buf = vec![0u8; adaptive::max_size(values.len())];
    let n = adaptive::encode(&mut buf, &values).unwrap();
    buf.truncate(n);
    Fixture { values, buf }
}

fn setup_texts(count: usize) -> Vec<String> {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    (0..count)
        .map(|i| {
            if i % 2 == 0 {
                rng.random::<i64>().to_string()
            } else {
                rng.random::<u128>().to_string()
            }
        })
        .collect()
}

#[library_benchmark]
#[bench::timestamps_10k(setup_encode(timestamps(10_000)))]
#[bench::status_codes_10k(setup_encode(status_codes(10_000)))]
fn adaptive_encode(mut fx: Fixture) -> usize {
    black_box(adaptive::encode(&mut fx.buf, black_box(&fx.values)).unwrap())
}

#[library_benchmark]
#[bench::timestamps_10k(setup_decode(timestamps(10_000)))]
#[bench::status_codes_10k(setup_decode(status_codes(10_000)))]
fn adaptive_decode(mut fx: Fixture) -> usize {
    black_box(adaptive::decode(black_box(&fx.buf), &mut fx.values).unwrap())
}

#[library_benchmark]
#[bench::timestamps_10k(timestamps(10_000))]
fn bp128_delta_encode(values: Vec<u64>) -> usize {
    let mut buf = vec![0u8; bp128::max_bytes_delta64(values.len())];
    black_box(bp128::encode_delta64(&mut buf, black_box(&values)).unwrap().encoded_bytes)
}

#[library_benchmark]
#[bench::mixed_1k(setup_texts(1_000))]
fn scan_mixed(texts: Vec<String>) -> usize {
    black_box(
        texts
            .iter()
            .filter(|t| scan_convert_128(black_box(t.as_bytes())).is_ok())
            .count(),
    )
}

library_benchmark_group!(
    name = microbench_group;
    config = LibraryBenchmarkConfig::default();
    benchmarks = adaptive_encode, adaptive_decode, bp128_delta_encode, scan_mixed
);

main!(library_benchmark_groups = microbench_group);
