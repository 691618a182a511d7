//! Timing runner: small-matrix kernel against the naive triple loop.

use small_gemm::{Backend, Element, MatMut, MatRef, SmallGemm, SmallGemmConfig, gemm_naive};
use std::time::Instant;

/// Runs `f` once to warm up, then `iterations` timed times.
/// Returns (average ms, GFLOPS).
fn bench<F>(m: usize, n: usize, k: usize, iterations: usize, mut f: F) -> (f64, f64)
where
    F: FnMut(),
{
    f();

    let start = Instant::now();
    for _ in 0..iterations {
        f();
    }
    let avg = start.elapsed().as_secs_f64() / iterations as f64;
    let gflops = 2.0 * (m * n * k) as f64 / avg / 1e9;
    (avg * 1000.0, gflops)
}

fn inputs<T: Element>(m: usize, n: usize, k: usize) -> (Vec<T>, Vec<T>) {
    let hundred: T = num_traits::cast(100).unwrap_or_else(T::one);
    let val = |i: usize| num_traits::cast::<usize, T>(i % 100).unwrap_or_else(T::zero) / hundred;
    ((0..m * k).map(val).collect(), (0..k * n).map(val).collect())
}

fn run_sizes<T: Element>(
    gemm: &mut SmallGemm,
    sizes: &[(usize, usize, usize)],
    iterations: usize,
    call: fn(&mut SmallGemm, MatRef<'_, T>, MatRef<'_, T>, MatMut<'_, T>),
) {
    println!("{}", T::DTYPE);
    println!("{}", "-".repeat(70));

    for &(m, n, k) in sizes {
        let (a, b) = inputs::<T>(m, n, k);
        let mut c = vec![T::zero(); m * n];

        let (naive_ms, naive_gf) = bench(m, n, k, iterations, || {
            gemm_naive(
                T::one(),
                MatRef::col_major(&a, m, k, m),
                MatRef::col_major(&b, k, n, k),
                T::zero(),
                &mut MatMut::col_major(&mut c, m, n, m),
            )
        });
        let (small_ms, small_gf) = bench(m, n, k, iterations, || {
            call(
                gemm,
                MatRef::col_major(&a, m, k, m),
                MatRef::col_major(&b, k, n, k),
                MatMut::col_major(&mut c, m, n, m),
            )
        });

        println!(
            "{:>4}x{:<4}x{:<4}  naive {:8.3} ms {:6.2} GF   small {:8.3} ms {:6.2} GF  ({:.1}×)",
            m,
            n,
            k,
            naive_ms,
            naive_gf,
            small_ms,
            small_gf,
            naive_ms / small_ms
        );
    }
    println!();
}

fn main() {
    println!("=== Small Matrix GEMM Benchmark ===\n");

    let backend = if small_gemm::simd::avx2_available() {
        Backend::Auto
    } else {
        Backend::Portable
    };
    println!("CPU Features: AVX2+FMA={}\n", backend == Backend::Auto);

    let mut gemm = SmallGemm::new(SmallGemmConfig::default().with_backend(backend));
    let iterations = 200;

    run_sizes::<f32>(
        &mut gemm,
        &[(16, 16, 16), (32, 32, 32), (64, 64, 64), (100, 3, 100), (128, 128, 64), (200, 200, 200)],
        iterations,
        |g, a, b, c| {
            if let Err(err) = g.sgemm(1.0, a, b, 0.0, c) {
                eprintln!("sgemm: {err}");
            }
        },
    );
    run_sizes::<f64>(
        &mut gemm,
        &[(8, 8, 8), (16, 16, 16), (32, 32, 32), (50, 3, 50), (64, 64, 32), (100, 100, 100)],
        iterations,
        |g, a, b, c| {
            if let Err(err) = g.dgemm(1.0, a, b, 0.0, c) {
                eprintln!("dgemm: {err}");
            }
        },
    );

    println!("GF = GFLOPS (billion floating point operations per second)");
    println!("Speedup relative to the naive loop. Higher is better.");
}
