//! Phase accumulator for LFOs and other periodic modulators.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Modulation Phase
================

A phase is a position inside one cycle of a periodic modulator, normalized
to [0, 1). An LFO turns it into a waveform; a one-shot ramp uses it as
"how far along am I". This module only moves the phase forward and tells
the caller when a cycle completed.

Vocabulary
----------

  phase         The running position. Owned by the caller, not by the
                context, so several cursors (voices, retriggered LFOs) can
                share one set of rate/tempo parameters.

  rate          Cycles per second (free mode) or cycles per quarter note
                (synced modes).

  note length   Musical length of one cycle as a fraction of a whole note:
                1.0 = whole, 0.25 = quarter, 0.03125 = 1/32.

  project time  Host timeline position in beats (quarter notes).

  overflow      The phase crossed 1.0 during this call and was wrapped.


Sync Modes
----------

FREE
    phase += num_samples * rate / sample_rate

TEMPO SYNC
    phase += num_samples * rate / sample_rate * tempo / 60

    with rate = (1 / note_length) / 4. A whole note at 120 BPM lasts
    4 beats = 2 seconds, so the rate is 0.25 cycles per beat:

        0.25 * 120 / 60 = 0.5 cycles per second → one cycle in 2 s ✓

PROJECT SYNC
    phase = fract(project_time * rate)

    Nothing is accumulated. The phase is a pure function of the host
    timeline, so looping or scrubbing the transport keeps the modulator
    locked to the bars.


Cached Factors
--------------

The per-sample increment is a product of three inputs. Both products

    free_running_factor = rate * (1 / sample_rate)
    tempo_synced_factor = free_running_factor * tempo / 60

are recomputed by every setter that touches an input, never inside
advance(). The advance step stays a multiply-add and a compare.


Overflow
--------

Accumulating modes wrap with `phase % 1.0` once phase >= 1.0 and report
overflow. Project sync cannot overshoot (it is normalized by
construction), so it reports overflow when the new phase is behind the
old one, or when the timeline lands exactly on a cycle boundary.

    0.9 ──→ 0.05     overflow (backward jump)
    0.0 ──→ 0.0      overflow only if project_time * rate >= 1

Caveat: a project-sync jump across several cycles between two calls
reports at most one overflow, and none if it lands ahead of the old phase.


One-Shot
--------

OneShotPhase latches after the first overflow: the phase is pinned at
exactly 1.0 and every later call reports overflow without advancing,
until the caller re-arms it with reset().
*/

pub const PHASE_MAX: f32 = 1.0;

pub const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;
pub const DEFAULT_TEMPO: f32 = 120.0;
pub const DEFAULT_NOTE_LENGTH: f32 = 1.0 / 32.0;

const RECIPROCAL_60_SECONDS: f32 = 1.0 / 60.0;
const RECIPROCAL_BEATS_IN_NOTE: f32 = 1.0 / 4.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    Free,
    #[default]
    TempoSync,
    ProjectSync,
}

/// Errors raised by phase parameter conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhaseError {
    /// Note length must be a positive number of whole notes
    InvalidNoteLength(f32),
}

impl std::fmt::Display for PhaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhaseError::InvalidNoteLength(length) => {
                write!(f, "Invalid note length {}: must be greater than 0", length)
            }
        }
    }
}

impl std::error::Error for PhaseError {}

/// Convert a note length (fraction of a whole note) into a rate in cycles
/// per quarter note. Lengths that are not greater than 0, NaN included,
/// are rejected.
///
/// # Example
/// ```
/// use modkit_dsp::dsp::phase::note_length_to_rate;
/// assert_eq!(note_length_to_rate(1.0).unwrap(), 0.25);
/// assert_eq!(note_length_to_rate(1.0 / 32.0).unwrap(), 8.0);
/// assert!(note_length_to_rate(0.0).is_err());
/// ```
#[inline]
pub fn note_length_to_rate(length: f32) -> Result<f32, PhaseError> {
    if !(length > 0.0) {
        return Err(PhaseError::InvalidNoteLength(length));
    }

    Ok((1.0 / length) * RECIPROCAL_BEATS_IN_NOTE)
}

/// Rate, tempo and timing parameters shared by any number of phase cursors.
///
/// Not serializable; store a [`PhaseDescriptor`](crate::patch::PhaseDescriptor)
/// and build the context from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseContext {
    rate: f32,
    tempo: f32,
    sample_rate_recip: f32,
    project_time: f32,
    mode: SyncMode,
    note_length: f32,

    // Derived, kept in sync by the setters
    free_running_factor: f32,
    tempo_synced_factor: f32,
}

impl PhaseContext {
    /// 44.1 kHz, tempo sync at 120 BPM, one cycle per 1/32 note.
    pub fn new() -> Self {
        let mut cx = Self {
            rate: (1.0 / DEFAULT_NOTE_LENGTH) * RECIPROCAL_BEATS_IN_NOTE,
            tempo: DEFAULT_TEMPO,
            sample_rate_recip: 1.0 / DEFAULT_SAMPLE_RATE,
            project_time: 0.0,
            mode: SyncMode::TempoSync,
            note_length: DEFAULT_NOTE_LENGTH,
            free_running_factor: 0.0,
            tempo_synced_factor: 0.0,
        };
        cx.update_factors();
        cx
    }

    /// Free-running context at `rate_hz` cycles per second.
    pub fn free_running(rate_hz: f32, sample_rate: f32) -> Self {
        let mut cx = Self::new();
        cx.set_sync_mode(SyncMode::Free);
        cx.set_sample_rate(sample_rate);
        cx.set_rate(rate_hz);
        cx
    }

    /// Tempo-synced context completing one cycle per `note_length`.
    pub fn tempo_synced(
        note_length: f32,
        tempo: f32,
        sample_rate: f32,
    ) -> Result<Self, PhaseError> {
        let mut cx = Self::new();
        cx.set_sample_rate(sample_rate);
        cx.set_tempo(tempo);
        cx.set_note_length(note_length)?;
        Ok(cx)
    }

    #[inline]
    fn update_factors(&mut self) {
        self.free_running_factor = self.rate * self.sample_rate_recip;
        self.tempo_synced_factor =
            self.free_running_factor * (self.tempo * RECIPROCAL_60_SECONDS);
    }

    pub fn set_sync_mode(&mut self, mode: SyncMode) {
        self.mode = mode;
    }

    /// Tempo in BPM.
    pub fn set_tempo(&mut self, tempo: f32) {
        self.tempo = tempo;
        self.update_factors();
    }

    /// Cycles per second (free) or per quarter note (synced).
    pub fn set_rate(&mut self, rate: f32) {
        self.rate = rate;
        self.update_factors();
    }

    /// Sample rate in Hz. Must be positive.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        debug_assert!(sample_rate > 0.0, "sample rate must be positive");
        self.sample_rate_recip = 1.0 / sample_rate;
        self.update_factors();
    }

    /// Host position in beats, read by project sync on the next advance.
    pub fn set_project_time(&mut self, beats: f32) {
        self.project_time = beats;
    }

    /// Cycle length in whole notes, e.g. 1/32 → 0.03125.
    ///
    /// A non-positive length is rejected and leaves the context unchanged.
    pub fn set_note_length(&mut self, length: f32) -> Result<(), PhaseError> {
        let rate = note_length_to_rate(length)?;
        self.note_length = length;
        self.set_rate(rate);
        Ok(())
    }

    /// Move `phase` forward by `num_samples` according to the sync mode.
    ///
    /// Returns true if a cycle boundary was crossed; `phase` is then already
    /// wrapped back into [0, 1).
    #[inline]
    pub fn advance(&self, phase: &mut f32, num_samples: usize) -> bool {
        match self.mode {
            SyncMode::Free => {
                accumulate(phase, num_samples as f32 * self.free_running_factor)
            }
            SyncMode::TempoSync => {
                accumulate(phase, num_samples as f32 * self.tempo_synced_factor)
            }
            SyncMode::ProjectSync => self.follow_project(phase),
        }
    }

    #[inline]
    fn follow_project(&self, phase: &mut f32) -> bool {
        // Negative project time is not supported: fract() truncates.
        let position = self.project_time * self.rate;
        let next = position.fract();
        let overflow = next < *phase || (next == 0.0 && position >= PHASE_MAX);
        *phase = next;
        overflow
    }

    pub fn sync_mode(&self) -> SyncMode {
        self.mode
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn tempo(&self) -> f32 {
        self.tempo
    }

    pub fn sample_rate(&self) -> f32 {
        1.0 / self.sample_rate_recip
    }

    pub fn project_time(&self) -> f32 {
        self.project_time
    }

    /// Last note length set through [`set_note_length`](Self::set_note_length).
    pub fn note_length(&self) -> f32 {
        self.note_length
    }

    /// Phase increment per sample in free mode.
    pub fn free_running_factor(&self) -> f32 {
        self.free_running_factor
    }

    /// Phase increment per sample in tempo sync mode.
    pub fn tempo_synced_factor(&self) -> f32 {
        self.tempo_synced_factor
    }
}

impl Default for PhaseContext {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn accumulate(phase: &mut f32, increment: f32) -> bool {
    *phase += increment;

    let overflow = *phase >= PHASE_MAX;
    if overflow {
        *phase %= PHASE_MAX;
    }
    overflow
}

/// Non-looping phase: stops at 1.0 after the first completed cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneShotPhase {
    latched: bool,
}

impl OneShotPhase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance like [`PhaseContext::advance`] until the first overflow, then
    /// hold `phase` at 1.0 and keep returning true.
    #[inline]
    pub fn advance(&mut self, cx: &PhaseContext, phase: &mut f32, num_samples: usize) -> bool {
        if !self.latched && *phase < PHASE_MAX {
            self.latched = cx.advance(phase, num_samples);
        } else {
            self.latched = true;
        }

        if self.latched {
            *phase = PHASE_MAX;
        }
        self.latched
    }

    /// Re-arm with a starting phase. Starting at or past 1.0 counts as done.
    pub fn reset(&mut self, phase: &mut f32, value: f32) {
        self.latched = value >= PHASE_MAX;
        *phase = value;
    }

    /// Phase to display or map: 1.0 once latched.
    pub fn value(&self, phase: f32) -> f32 {
        if self.latched {
            PHASE_MAX
        } else {
            phase
        }
    }

    pub fn is_overflow(&self) -> bool {
        self.latched
    }
}
