//! Small-matrix kernel vs the naive loop, reported as element throughput
//! of `2 * m * n * k` flops.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

use small_gemm::{Backend, MatMut, MatRef, SmallGemm, SmallGemmConfig, gemm_naive};

const SGEMM_SIZES: &[(usize, usize, usize)] = &[
    (16, 16, 16),
    (35, 5, 10),
    (64, 64, 64),
    (100, 3, 100),
    (128, 128, 128),
    (200, 200, 64),
];

const DGEMM_SIZES: &[(usize, usize, usize)] = &[
    (8, 8, 8),
    (17, 5, 10),
    (32, 32, 32),
    (64, 64, 64),
    (100, 100, 32),
];

fn data<T: Copy>(len: usize, f: impl Fn(usize) -> T) -> Vec<T> {
    (0..len).map(f).collect()
}

fn bench_sgemm(c: &mut Criterion) {
    let mut group = c.benchmark_group("sgemm");
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(2));

    for &(m, n, k) in SGEMM_SIZES {
        let a = data(m * k, |i| (i % 17) as f32 * 0.125);
        let b = data(k * n, |i| (i % 13) as f32 * 0.25);
        let mut out = vec![0.0f32; m * n];
        let id = format!("{m}x{n}x{k}");
        group.throughput(Throughput::Elements((2 * m * n * k) as u64));

        for (name, backend) in [("auto", Backend::Auto), ("portable", Backend::Portable)] {
            let mut gemm = SmallGemm::new(SmallGemmConfig::default().with_backend(backend));
            group.bench_with_input(BenchmarkId::new(name, &id), &(m, n, k), |bench, &(m, n, k)| {
                bench.iter(|| {
                    gemm.sgemm(
                        1.0,
                        MatRef::col_major(black_box(&a), m, k, m),
                        MatRef::col_major(black_box(&b), k, n, k),
                        0.0,
                        MatMut::col_major(&mut out, m, n, m),
                    )
                })
            });
        }

        group.bench_with_input(BenchmarkId::new("naive", &id), &(m, n, k), |bench, &(m, n, k)| {
            bench.iter(|| {
                gemm_naive(
                    1.0,
                    MatRef::col_major(black_box(&a), m, k, m),
                    MatRef::col_major(black_box(&b), k, n, k),
                    0.0,
                    &mut MatMut::col_major(&mut out, m, n, m),
                )
            })
        });
    }
    group.finish();
}

fn bench_dgemm(c: &mut Criterion) {
    let mut group = c.benchmark_group("dgemm");
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(2));

    let mut gemm = SmallGemm::default();
    for &(m, n, k) in DGEMM_SIZES {
        let a = data(m * k, |i| (i % 17) as f64 * 0.125);
        let b = data(k * n, |i| (i % 13) as f64 * 0.25);
        let mut out = vec![0.0f64; m * n];
        let id = format!("{m}x{n}x{k}");
        group.throughput(Throughput::Elements((2 * m * n * k) as u64));

        group.bench_with_input(BenchmarkId::new("small", &id), &(m, n, k), |bench, &(m, n, k)| {
            bench.iter(|| {
                gemm.dgemm(
                    1.0,
                    MatRef::col_major(black_box(&a), m, k, m),
                    MatRef::col_major(black_box(&b), k, n, k),
                    0.0,
                    MatMut::col_major(&mut out, m, n, m),
                )
            })
        });
        group.bench_with_input(BenchmarkId::new("naive", &id), &(m, n, k), |bench, &(m, n, k)| {
            bench.iter(|| {
                gemm_naive(
                    1.0,
                    MatRef::col_major(black_box(&a), m, k, m),
                    MatRef::col_major(black_box(&b), k, n, k),
                    0.0,
                    &mut MatMut::col_major(&mut out, m, n, m),
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sgemm, bench_dgemm);
criterion_main!(benches);
