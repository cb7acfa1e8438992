//! Real-time kernels for parameter control.
//!
//! These components are allocation-free and branch-light, making them safe
//! to call from an audio callback. None of them depend on each other; the
//! host decides how to combine them.

/// Attack/decay/sustain/release envelope driven by elapsed time.
pub mod envelope;
/// One-pole smoothing filter.
pub mod one_pole;
/// Free-running, tempo-synced and project-synced phase generator.
pub mod phase;

pub use envelope::{Adsr, AdsrProcessor, AdsrStage, AdsrState};
pub use one_pole::OnePole;
pub use phase::{OneShotPhase, PhaseContext, PhaseError, SyncMode};
