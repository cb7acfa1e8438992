//! Benchmarks for the one-pole smoother.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use modkit_dsp::dsp::one_pole::{tau_to_pole, OnePole};

use crate::BLOCK_SIZES;

pub fn bench_one_pole(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/one_pole");
    let pole = tau_to_pole(0.02, 48_000.0);

    for &size in BLOCK_SIZES {
        // Moving input: every sample is recomputed
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();
        let mut filter = OnePole::new(pole);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("moving", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer));
            })
        });

        // Settled input: the equality short-circuit kicks in
        let mut filter = OnePole::new(pole);
        filter.reset(0.5);
        let mut buffer = vec![0.5f32; size];
        group.bench_with_input(BenchmarkId::new("settled", size), &size, |b, _| {
            b.iter(|| {
                buffer.fill(0.5);
                filter.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
