mod datasets;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use varpack::{adaptive, bp128, dict, elias, group, pfor, scan_convert_128, tagged};

const COUNT: usize = 100_000;

fn bench_adaptive_fixed_datasets(c: &mut Criterion) {
    let seed = datasets::DEFAULT_SEED;
    let sets: [(&str, Vec<u64>); 4] = [
        ("timestamps", datasets::sorted_timestamps(seed, COUNT)),
        ("low_cardinality", datasets::low_cardinality(seed, COUNT, 12)),
        ("clustered_outliers", datasets::clustered_with_outliers(seed, COUNT, 50_000, 100)),
        ("uniform_40bit", datasets::uniform(seed, COUNT, 40)),
    ];

    let mut g = c.benchmark_group("adaptive");
    g.throughput(Throughput::Elements(COUNT as u64));

    for (name, values) in &sets {
        let mut buf = vec![0u8; adaptive::max_size(values.len())];
        let n = adaptive::encode(&mut buf, values).unwrap();
        // printed once so runs record the size each dataset lands at
        eprintln!(
            "adaptive_size: {} kind={} bytes={} ratio={:.2}",
            name,
            adaptive::choose(values),
            n,
            (values.len() * 8) as f64 / n as f64
        );

        g.bench_function(format!("encode_{name}"), |b| {
            b.iter(|| adaptive::encode(black_box(&mut buf), black_box(values)).unwrap())
        });

        let encoded = buf[..n].to_vec();
        let mut out = vec![0u64; values.len()];
        g.bench_function(format!("decode_{name}"), |b| {
            b.iter(|| adaptive::decode(black_box(&encoded), black_box(&mut out)).unwrap())
        });
    }

    g.finish();
}

fn bench_codecs(c: &mut Criterion) {
    let seed = datasets::DEFAULT_SEED;
    let timestamps = datasets::sorted_timestamps(seed, COUNT);
    let small = datasets::uniform(seed, COUNT, 20);
    let clustered = datasets::clustered_with_outliers(seed, COUNT, 50_000, 100);
    let pool = datasets::low_cardinality(seed, COUNT, 12);

    let mut g = c.benchmark_group("codecs");
    g.throughput(Throughput::Elements(COUNT as u64));

    let mut buf = vec![0u8; COUNT * 16 + 64];
    let mut out = vec![0u64; COUNT];

    g.bench_function("tagged_put_get", |b| {
        b.iter(|| {
            let mut pos = 0;
            for &v in &small {
                pos += tagged::put(&mut buf[pos..], black_box(v)).unwrap();
            }
            let mut rd = 0;
            let mut sum = 0u64;
            while rd < pos {
                let (v, n) = tagged::get(&buf[rd..pos]).unwrap();
                sum = sum.wrapping_add(v);
                rd += n;
            }
            sum
        })
    });

    g.bench_function("group_encode_64", |b| {
        b.iter(|| {
            let mut pos = 0;
            for chunk in small.chunks(group::MAX_FIELDS) {
                pos += group::encode(&mut buf[pos..], black_box(chunk)).unwrap();
            }
            pos
        })
    });

    g.bench_function("bp128_delta64_encode", |b| {
        b.iter(|| bp128::encode_delta64(&mut buf, black_box(&timestamps)).unwrap())
    });
    let meta = bp128::encode_delta64(&mut buf, &timestamps).unwrap();
    let encoded = buf[..meta.encoded_bytes].to_vec();
    g.bench_function("bp128_delta64_decode", |b| {
        b.iter(|| bp128::decode_delta64(black_box(&encoded), &mut out).unwrap())
    });

    let gaps: Vec<u64> = timestamps.windows(2).map(|w| w[1] - w[0]).collect();
    g.bench_function("elias_delta_encode_gaps", |b| {
        b.iter(|| elias::encode_delta_array(&mut buf, black_box(&gaps)).unwrap())
    });

    g.bench_function("pfor_encode", |b| {
        b.iter(|| {
            pfor::encode(&mut buf, black_box(&clustered), pfor::DEFAULT_THRESHOLD_PERCENTILE).unwrap()
        })
    });

    g.bench_function("dict_encode", |b| {
        b.iter(|| dict::encode(&mut buf, black_box(&pool)).unwrap())
    });

    g.finish();
}

fn bench_scan(c: &mut Criterion) {
    let texts = datasets::numeric_texts(datasets::DEFAULT_SEED, 10_000);

    let mut g = c.benchmark_group("scan");
    g.throughput(Throughput::Elements(texts.len() as u64));
    g.bench_function("scan_convert_128_mixed", |b| {
        b.iter(|| {
            texts
                .iter()
                .filter(|t| scan_convert_128(black_box(t.as_bytes())).is_ok())
                .count()
        })
    });
    g.finish();
}

criterion_group!(benches, bench_adaptive_fixed_datasets, bench_codecs, bench_scan);
criterion_main!(benches);
