#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Time-Driven ADSR Envelope
=========================

Unlike a per-sample ramp generator, this envelope owns no clock. The host
tells it how many seconds have passed since the last gate change and the
envelope answers with the level at that instant.

Vocabulary
----------

  stage          Which segment the envelope believes it is in. The stage
                 is only a starting hint: a read walks forward through
                 attack → decay → sustain until it finds the segment the
                 elapsed time actually falls into, and stores that stage.

  time_seconds   Seconds since trigger() (attack/decay/sustain) or since
                 release() (release). Supplied by the host on every read.

  release_value  Level captured when the gate went low. Release fades from
                 here to zero, so releasing mid-attack does not jump.


The Shape
---------

  Level
    1.0 ┐     ╱╲
        │    ╱  ╲_
    S   │   ╱     ‾‾‾‾‾‾‾‾‾‾╲
        │  ╱                 ╲_
    0.0 └─╱                    ‾‾‾──→ Time
        Attack Decay  Sustain  Release

Attack is a straight line. Decay and release are bent by

    shape(x) = 1 - 0.5^(x * M),   M = log2(10^(96/20)) ≈ 15.95

which reaches -96 dB at x = 1. On a dB meter the curve looks like a
straight line, which is how a decay should sound.

  decay:    level = (S - 1) * shape(t / D) + 1
  release:  level = R - shape(t / Rel) * R      (R = release_value)

Stage boundaries use a strict `>`: a time exactly equal to a duration is
still inside that stage. Durations keep their reciprocal next to them so a
read never divides.
*/

pub const MIN_VALUE: f32 = 0.0;
pub const MAX_VALUE: f32 = 1.0;

const DB_RANGE: f32 = 96.0;
const SHAPE_EXPONENT: f32 = DB_RANGE / 20.0 * std::f32::consts::LOG2_10;

/// Exponential easing used by decay and release. Maps `[0, 1]` onto `[0, ~1]`.
#[inline]
pub fn shape(x: f32) -> f32 {
    1.0 - 0.5f32.powf(x * SHAPE_EXPONENT)
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdsrStage {
    #[default]
    BeforeTrigger, // Never triggered, level = 0
    Attack,
    Decay,
    Sustain,
    Release,
}

/// Per-voice runtime state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AdsrState {
    pub stage: AdsrStage,
    pub time_seconds: f32,
    pub release_value: f32,
}

/// A duration with its cached reciprocal (0 for non-positive durations).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct StageTime {
    seconds: f32,
    reciprocal: f32,
}

impl StageTime {
    fn set(&mut self, seconds: f32) {
        if self.seconds == seconds {
            return;
        }

        self.seconds = seconds;
        self.reciprocal = if seconds > 0.0 { 1.0 / seconds } else { 0.0 };
    }
}

/// ADSR parameters and the stage logic operating on an [`AdsrState`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Adsr {
    attack: StageTime,
    decay: StageTime,
    sustain: f32,
    release: StageTime,
}

impl Adsr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        let mut adsr = Self::default();
        adsr.set_attack(attack);
        adsr.set_decay(decay);
        adsr.set_sustain(sustain);
        adsr.set_release(release);
        adsr
    }

    pub fn set_attack(&mut self, seconds: f32) {
        self.attack.set(seconds);
    }

    pub fn set_decay(&mut self, seconds: f32) {
        self.decay.set(seconds);
    }

    /// Normalized sustain level.
    pub fn set_sustain(&mut self, level: f32) {
        self.sustain = level;
    }

    pub fn set_release(&mut self, seconds: f32) {
        self.release.set(seconds);
    }

    pub fn attack(&self) -> f32 {
        self.attack.seconds
    }

    pub fn decay(&self) -> f32 {
        self.decay.seconds
    }

    pub fn sustain(&self) -> f32 {
        self.sustain
    }

    pub fn release(&self) -> f32 {
        self.release.seconds
    }

    /// Envelope level for `state.time_seconds`.
    ///
    /// Updates `state.stage` to the stage the time falls into; the time
    /// itself is left untouched.
    pub fn value(&self, state: &mut AdsrState) -> f32 {
        let time = state.time_seconds;
        match state.stage {
            AdsrStage::BeforeTrigger => MIN_VALUE,
            AdsrStage::Attack => self.attack_stage(state, time),
            AdsrStage::Decay => self.decay_stage(state, time),
            AdsrStage::Sustain => self.sustain_stage(state),
            AdsrStage::Release => self.release_stage(state, time),
        }
    }

    fn attack_stage(&self, state: &mut AdsrState, time: f32) -> f32 {
        state.stage = AdsrStage::Attack;
        if time > self.attack.seconds {
            return self.decay_stage(state, time);
        }

        time * self.attack.reciprocal
    }

    // `time` counts from the trigger, decay starts after the attack.
    fn decay_stage(&self, state: &mut AdsrState, time: f32) -> f32 {
        state.stage = AdsrStage::Decay;
        let time = time - self.attack.seconds;
        if time > self.decay.seconds {
            return self.sustain_stage(state);
        }

        let x = time * self.decay.reciprocal;
        (self.sustain - MAX_VALUE) * shape(x) + MAX_VALUE
    }

    fn sustain_stage(&self, state: &mut AdsrState) -> f32 {
        state.stage = AdsrStage::Sustain;
        self.sustain
    }

    fn release_stage(&self, state: &mut AdsrState, time: f32) -> f32 {
        state.stage = AdsrStage::Release;
        if time > self.release.seconds {
            return MIN_VALUE;
        }

        let x = time * self.release.reciprocal;
        state.release_value - shape(x) * state.release_value
    }
}

/// Convenience wrapper: owns the state and remembers the last output.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdsrProcessor {
    adsr: Adsr,
    state: AdsrState,
    value: f32,
}

impl AdsrProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            adsr: Adsr::with_params(attack, decay, sustain, release),
            ..Self::default()
        }
    }

    /// Gate high: restart from the beginning of the attack.
    pub fn trigger(&mut self) {
        self.state = AdsrState {
            stage: AdsrStage::Attack,
            time_seconds: 0.0,
            release_value: MAX_VALUE,
        };
    }

    /// Gate low: fade out from whatever level was last read.
    pub fn release(&mut self) {
        self.state = AdsrState {
            stage: AdsrStage::Release,
            time_seconds: 0.0,
            release_value: self.value,
        };
    }

    /// Level `time_seconds` after the last trigger or release.
    pub fn read(&mut self, time_seconds: f32) -> f32 {
        self.state.time_seconds = time_seconds;
        self.value = self.adsr.value(&mut self.state);
        self.value
    }

    pub fn set_attack(&mut self, seconds: f32) {
        self.adsr.set_attack(seconds);
    }

    pub fn set_decay(&mut self, seconds: f32) {
        self.adsr.set_decay(seconds);
    }

    pub fn set_sustain(&mut self, level: f32) {
        self.adsr.set_sustain(level);
    }

    pub fn set_release(&mut self, seconds: f32) {
        self.adsr.set_release(seconds);
    }

    /// Last value returned by [`read`](Self::read).
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn stage(&self) -> AdsrStage {
        self.state.stage
    }

    pub fn params(&self) -> &Adsr {
        &self.adsr
    }
}
