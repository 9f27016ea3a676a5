//! Criterion benchmarks for `bia-math`.
//!
//! Focus on the kernels that dominate analysis latency.

use bia_math::{correlation_p_value, dft, linear_regression};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn synthetic(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            100.0 + 0.5 * t + 10.0 * (2.0 * std::f64::consts::PI * t / 24.0).sin()
        })
        .collect()
}

fn bench_dft(c: &mut Criterion) {
    let mut group = c.benchmark_group("dft");
    for n in [24usize, 168, 720] {
        let values = synthetic(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, v| {
            b.iter(|| black_box(dft(black_box(v))));
        });
    }
    group.finish();
}

fn bench_regression(c: &mut Criterion) {
    let mut group = c.benchmark_group("regression");
    for n in [100usize, 10_000] {
        let ys = synthetic(n);
        let xs: Vec<f64> = (0..n).map(|i| i as f64).collect();
        group.bench_with_input(BenchmarkId::new("ols", n), &(xs, ys), |b, (x, y)| {
            b.iter(|| black_box(linear_regression(black_box(x), black_box(y))));
        });
    }
    group.bench_function("correlation_p_value", |b| {
        b.iter(|| black_box(correlation_p_value(black_box(0.42), black_box(250))));
    });
    group.finish();
}

criterion_group!(benches, bench_dft, bench_regression);
criterion_main!(benches);
