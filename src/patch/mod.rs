#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::{
    envelope::AdsrProcessor,
    one_pole::{tau_to_pole, OnePole},
    phase::{note_length_to_rate, PhaseContext, SyncMode, DEFAULT_NOTE_LENGTH, DEFAULT_TEMPO},
};

/// A named modulation slot: one phase generator, one envelope and the
/// smoother applied to its output.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ModulatorPatch {
    pub name: String,
    pub phase: PhaseDescriptor,
    pub envelope: EnvelopeDescriptor,
    pub smoothing: SmoothingDescriptor,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseDescriptor {
    pub mode: SyncMode,
    /// Cycles per second, used in free mode
    pub rate_hz: f32,
    /// Whole notes per cycle, used in the synced modes
    pub note_length: f32,
    pub tempo_bpm: f32,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeDescriptor {
    pub attack_s: f32,
    pub decay_s: f32,
    pub sustain: f32,
    pub release_s: f32,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingDescriptor {
    /// Seconds to settle within 99.3% of a new value
    pub time_constant_s: f32,
}

/// Errors found while turning descriptors into runtime state.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchError {
    InvalidSampleRate(f32),
    InvalidNoteLength(f32),
    InvalidTempo(f32),
    InvalidRate(f32),
    NegativeDuration { stage: &'static str, seconds: f32 },
    SustainOutOfRange(f32),
    InvalidTimeConstant(f32),
}

impl std::fmt::Display for PatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatchError::InvalidSampleRate(rate) => {
                write!(f, "Invalid sample rate {} Hz: must be greater than 0", rate)
            }
            PatchError::InvalidNoteLength(length) => {
                write!(f, "Invalid note length {}: must be greater than 0", length)
            }
            PatchError::InvalidTempo(tempo) => {
                write!(f, "Invalid tempo {} BPM: must be greater than 0", tempo)
            }
            PatchError::InvalidRate(rate) => write!(f, "Invalid rate {} Hz: must be finite", rate),
            PatchError::NegativeDuration { stage, seconds } => {
                write!(f, "Envelope {} time {}s is negative or NaN", stage, seconds)
            }
            PatchError::SustainOutOfRange(level) => {
                write!(f, "Sustain level {} outside 0.0..=1.0", level)
            }
            PatchError::InvalidTimeConstant(tau) => {
                write!(f, "Smoothing time {}s must be greater than 0", tau)
            }
        }
    }
}

impl std::error::Error for PatchError {}

fn check_sample_rate(sample_rate: f32) -> Result<(), PatchError> {
    if sample_rate > 0.0 {
        Ok(())
    } else {
        Err(PatchError::InvalidSampleRate(sample_rate))
    }
}

impl PhaseDescriptor {
    pub fn build(&self, sample_rate: f32) -> Result<PhaseContext, PatchError> {
        check_sample_rate(sample_rate)?;
        self.check()?;

        let mut cx = PhaseContext::new();
        cx.set_sample_rate(sample_rate);
        cx.set_tempo(self.tempo_bpm);
        cx.set_sync_mode(self.mode);

        match self.mode {
            SyncMode::Free => cx.set_rate(self.rate_hz),
            SyncMode::TempoSync | SyncMode::ProjectSync => cx
                .set_note_length(self.note_length)
                .map_err(|_| PatchError::InvalidNoteLength(self.note_length))?,
        }

        log::debug!(
            "built phase context: {:?}, rate {}, tempo {}",
            self.mode,
            cx.rate(),
            cx.tempo()
        );
        Ok(cx)
    }

    /// Seconds per cycle at the descriptor's settings.
    pub fn cycle_seconds(&self) -> Result<f32, PatchError> {
        self.check()?;
        match self.mode {
            SyncMode::Free => Ok(1.0 / self.rate_hz),
            SyncMode::TempoSync | SyncMode::ProjectSync => {
                let rate = note_length_to_rate(self.note_length)
                    .map_err(|_| PatchError::InvalidNoteLength(self.note_length))?;
                Ok(60.0 / (rate * self.tempo_bpm))
            }
        }
    }

    /// Tempo is checked in every mode since the context keeps it across
    /// mode switches. A free rate of 0 is allowed and parks the phase.
    fn check(&self) -> Result<(), PatchError> {
        if !(self.tempo_bpm > 0.0) {
            return Err(PatchError::InvalidTempo(self.tempo_bpm));
        }
        if self.mode == SyncMode::Free && !self.rate_hz.is_finite() {
            return Err(PatchError::InvalidRate(self.rate_hz));
        }
        Ok(())
    }
}

impl Default for PhaseDescriptor {
    fn default() -> Self {
        Self {
            mode: SyncMode::TempoSync,
            rate_hz: 1.0,
            note_length: DEFAULT_NOTE_LENGTH,
            tempo_bpm: DEFAULT_TEMPO,
        }
    }
}

impl EnvelopeDescriptor {
    pub fn build(&self) -> Result<AdsrProcessor, PatchError> {
        for (stage, seconds) in [
            ("attack", self.attack_s),
            ("decay", self.decay_s),
            ("release", self.release_s),
        ] {
            if !(seconds >= 0.0) {
                return Err(PatchError::NegativeDuration { stage, seconds });
            }
        }

        if !(0.0..=1.0).contains(&self.sustain) {
            return Err(PatchError::SustainOutOfRange(self.sustain));
        }

        log::debug!(
            "built envelope: A {}s D {}s S {} R {}s",
            self.attack_s,
            self.decay_s,
            self.sustain,
            self.release_s
        );
        Ok(AdsrProcessor::with_params(
            self.attack_s,
            self.decay_s,
            self.sustain,
            self.release_s,
        ))
    }
}

impl Default for EnvelopeDescriptor {
    fn default() -> Self {
        Self {
            attack_s: 0.01,
            decay_s: 0.1,
            sustain: 0.7,
            release_s: 0.3,
        }
    }
}

impl SmoothingDescriptor {
    pub fn build(&self, sample_rate: f32) -> Result<OnePole, PatchError> {
        check_sample_rate(sample_rate)?;
        if !(self.time_constant_s > 0.0) {
            return Err(PatchError::InvalidTimeConstant(self.time_constant_s));
        }

        Ok(OnePole::new(tau_to_pole(self.time_constant_s, sample_rate)))
    }
}

impl Default for SmoothingDescriptor {
    fn default() -> Self {
        Self {
            time_constant_s: 0.02,
        }
    }
}

impl ModulatorPatch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phase: PhaseDescriptor::default(),
            envelope: EnvelopeDescriptor::default(),
            smoothing: SmoothingDescriptor::default(),
        }
    }
}

impl Default for ModulatorPatch {
    fn default() -> Self {
        Self::new("init")
    }
}
