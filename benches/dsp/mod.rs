//! Benchmarks for the low-level kernels.

mod envelope;
mod one_pole;
mod phase;

pub use envelope::bench_envelope;
pub use one_pole::bench_one_pole;
pub use phase::bench_phase;
