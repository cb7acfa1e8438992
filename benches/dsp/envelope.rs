//! Benchmarks for the time-driven ADSR envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use modkit_dsp::dsp::envelope::AdsrProcessor;

use crate::BLOCK_SIZES;

const SAMPLE_PERIOD: f32 = 1.0 / 48_000.0;

fn read_block(env: &mut AdsrProcessor, buffer: &mut [f32], start: f32) {
    for (i, sample) in buffer.iter_mut().enumerate() {
        *sample = env.read(start + i as f32 * SAMPLE_PERIOD);
    }
}

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack: linear ramp, no falling through
        let mut env = AdsrProcessor::with_params(1.0, 1.0, 0.7, 1.0);
        env.trigger();
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| read_block(&mut env, black_box(&mut buffer), black_box(0.1)))
        });

        // Decay: shape curve on every read
        let mut env = AdsrProcessor::with_params(0.01, 1.0, 0.7, 1.0);
        env.trigger();
        group.bench_with_input(BenchmarkId::new("decay", size), &size, |b, _| {
            b.iter(|| read_block(&mut env, black_box(&mut buffer), black_box(0.2)))
        });

        // Release from sustain
        let mut env = AdsrProcessor::with_params(0.01, 0.01, 0.7, 1.0);
        env.trigger();
        env.read(1.0);
        env.release();
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| read_block(&mut env, black_box(&mut buffer), black_box(0.1)))
        });
    }

    group.finish();
}
