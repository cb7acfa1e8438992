//! Benchmarks for the phase generator in each sync mode.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use modkit_dsp::dsp::phase::{OneShotPhase, PhaseContext, SyncMode};

use crate::BLOCK_SIZES;

fn context(mode: SyncMode) -> PhaseContext {
    let mut cx = PhaseContext::tempo_synced(0.25, 128.0, 48_000.0).unwrap();
    cx.set_sync_mode(mode);
    cx.set_project_time(3.3);
    cx
}

pub fn bench_phase(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/phase");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, mode) in [
            ("free", SyncMode::Free),
            ("tempo_sync", SyncMode::TempoSync),
            ("project_sync", SyncMode::ProjectSync),
        ] {
            // Per-sample advance, as an LFO rendering a block would do
            let cx = context(mode);
            let mut phase = 0.0f32;
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for sample in buffer.iter_mut() {
                        cx.advance(black_box(&mut phase), 1);
                        *sample = phase;
                    }
                })
            });
        }

        // Block-rate advance for a whole bank of cursors
        let cx = context(SyncMode::TempoSync);
        let mut cursors = vec![0.0f32; 64];
        group.bench_with_input(BenchmarkId::new("cursor_bank", size), &size, |b, &size| {
            b.iter(|| {
                for phase in cursors.iter_mut() {
                    cx.advance(black_box(phase), size);
                }
            })
        });

        let cx = context(SyncMode::TempoSync);
        let mut one_shot = OneShotPhase::new();
        let mut phase = 0.0f32;
        group.bench_with_input(BenchmarkId::new("one_shot", size), &size, |b, _| {
            b.iter(|| {
                one_shot.reset(&mut phase, 0.0);
                for sample in buffer.iter_mut() {
                    one_shot.advance(&cx, black_box(&mut phase), 1);
                    *sample = phase;
                }
            })
        });
    }

    group.finish();
}
