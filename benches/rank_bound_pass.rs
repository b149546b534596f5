/// Rank bound and sample extraction benchmarks
///
/// Measures the cost of one streaming pass over in-memory datasets of
/// increasing size, for the rank bound tracker and for sample extraction.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use seqbound::rank_bound::RankBoundTracker;
use seqbound::sampler::SamplePlan;
use std::io::Cursor;
use std::time::Duration;

/// Synthetic dataset: record `i` has `i % 40 + 1` items spread over itemsets of 3
fn synthetic_dataset(records: usize) -> String {
    let mut out = String::new();
    for i in 0..records {
        let length = i % 40 + 1;
        for j in 0..length {
            out.push_str(&(i * 7 + j).to_string());
            out.push(' ');
            if j % 3 == 2 {
                out.push_str("-1 ");
            }
        }
        if length % 3 != 0 {
            out.push_str("-1 ");
        }
        out.push_str("-2\n");
    }
    out
}

/// Benchmark: rank bound pass
fn bench_rank_bound_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_bound_scan");
    group.measurement_time(Duration::from_secs(5));

    for records in [1_000usize, 10_000, 100_000].iter() {
        let data = synthetic_dataset(*records);
        group.throughput(Throughput::Elements(*records as u64));
        group.bench_with_input(BenchmarkId::from_parameter(records), &data, |b, data| {
            b.iter(|| {
                let result = RankBoundTracker::scan(Cursor::new(data.as_bytes())).unwrap();
                black_box(result);
            });
        });
    }

    group.finish();
}

/// Benchmark: observing duplicates of tracked records
fn bench_duplicate_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("duplicate_records");
    group.measurement_time(Duration::from_secs(5));
    group.throughput(Throughput::Elements(10_000));

    let record = "1 2 3 -1 4 5 6 -1 7 8 9 -1 -2";
    group.bench_function("observe_10000_duplicates", |b| {
        b.iter(|| {
            let mut tracker = RankBoundTracker::new();
            for _ in 0..10_000 {
                tracker.observe(black_box(record)).unwrap();
            }
            black_box(tracker.finalize());
        });
    });

    group.finish();
}

/// Benchmark: drawing and extracting samples of increasing ratio
fn bench_sample_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_extraction");
    group.measurement_time(Duration::from_secs(5));

    let records = 50_000u64;
    let data = synthetic_dataset(records as usize);

    for sample_size in [500u64, 5_000, 25_000].iter() {
        group.throughput(Throughput::Elements(*sample_size));
        group.bench_with_input(
            BenchmarkId::from_parameter(sample_size),
            sample_size,
            |b, &sample_size| {
                b.iter(|| {
                    let plan = SamplePlan::draw(records, sample_size, 42).unwrap();
                    let mut out = Vec::with_capacity(sample_size as usize * 64);
                    let written = plan.extract(Cursor::new(data.as_bytes()), &mut out).unwrap();
                    black_box(written);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_rank_bound_scan,
    bench_duplicate_records,
    bench_sample_extraction
);
criterion_main!(benches);
