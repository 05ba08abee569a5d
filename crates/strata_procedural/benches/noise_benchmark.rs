//! Benchmark for noise sampling.
//!
//! Run with: cargo bench --package strata_procedural --bench noise_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use strata_procedural::noise::{SimplexNoise, WorldSeed};

fn benchmark_sample_2d(c: &mut Criterion) {
    let noise = SimplexNoise::new(WorldSeed::new(42));

    c.bench_function("simplex_2d_sample", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.1;
            black_box(noise.sample(black_box(x), black_box(x * 0.7)))
        });
    });
}

fn benchmark_sample_3d(c: &mut Criterion) {
    let noise = SimplexNoise::new(WorldSeed::new(42));

    c.bench_function("simplex_3d_sample", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.1;
            black_box(noise.sample3(black_box(x), black_box(x * 0.7), black_box(x * 0.3)))
        });
    });
}

fn benchmark_height_fractal(c: &mut Criterion) {
    let noise = SimplexNoise::new(WorldSeed::new(42));

    let mut group = c.benchmark_group("fractal");
    group.throughput(Throughput::Elements(1));
    group.bench_function("fractal_4_octaves", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 1.0;
            black_box(noise.fractal(black_box(x), black_box(x * 0.7), 0.001, 4))
        });
    });
    group.finish();
}

criterion_group!(benches, benchmark_sample_2d, benchmark_sample_3d, benchmark_height_fractal);
criterion_main!(benches);
