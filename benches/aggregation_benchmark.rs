use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use weather_aggregator::processors::{HistogramEngine, ReduceOp, ReductionEngine};
use weather_aggregator::readers::ObservationReader;

// Deterministic temperatures in tenths of a degree, roughly -30.0 to 30.0
fn create_test_temperatures(count: usize) -> Vec<i32> {
    (0..count).map(|i| ((i * 7919) % 601) as i32 - 300).collect()
}

fn create_test_lines(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            format!(
                "LINCOLN {} {} {} {:04} {:.1}",
                1980 + i % 40,
                1 + i % 12,
                1 + i % 28,
                (i % 24) * 100,
                ((i * 7919) % 601) as f64 / 10.0 - 30.0
            )
        })
        .collect()
}

fn bench_reduction(c: &mut Criterion) {
    let temperatures = create_test_temperatures(1_000_000);
    let mut group = c.benchmark_group("reduction");

    for group_size in [16, 64, 256, 4096] {
        let engine = ReductionEngine::new(group_size).unwrap();
        for op in ReduceOp::ALL {
            group.bench_with_input(
                BenchmarkId::new(op.kernel_name(), group_size),
                &temperatures,
                |b, temperatures| b.iter(|| engine.reduce(black_box(temperatures), op).unwrap()),
            );
        }
    }

    group.finish();
}

fn bench_histogram(c: &mut Criterion) {
    let temperatures = create_test_temperatures(1_000_000);
    let mut group = c.benchmark_group("histogram");

    for bins in [10, 100, 1000] {
        let engine = HistogramEngine::new(64).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(bins), &bins, |b, &bins| {
            b.iter(|| {
                engine
                    .compute(black_box(&temperatures), bins, -300, 300)
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_parsing(c: &mut Criterion) {
    let lines = create_test_lines(100_000);
    let reader = ObservationReader::default();

    c.bench_function("parse_100k_lines", |b| {
        b.iter(|| reader.read_lines(black_box(&lines)))
    });
}

criterion_group!(benches, bench_reduction, bench_histogram, bench_parsing);
criterion_main!(benches);
