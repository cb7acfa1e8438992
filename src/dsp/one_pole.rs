#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
| field | meaning                                  |
| ----- | ---------------------------------------- |
| a     | pole / feedback weight (0 = no smoothing) |
| b     | input weight, always 1 - a               |
| z     | last output sample                       |

    z[n] = x[n] * b + z[n-1] * a
*/

/// Default pole used by [`OnePole::default`].
pub const DEFAULT_POLE: f32 = 0.9;

const RECIPROCAL_5: f32 = 1.0 / 5.0;

/// Single-pole IIR smoother for parameter changes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnePole {
    a: f32,
    b: f32,
    z: f32,
}

impl OnePole {
    pub fn new(a: f32) -> Self {
        Self { a, b: 1.0 - a, z: 0.0 }
    }

    /// Change the pole, keeping `b == 1 - a`. The stored output is left alone.
    pub fn update_pole(&mut self, a: f32) {
        self.a = a;
        self.b = 1.0 - self.a;
    }

    /// Smooth one input sample.
    ///
    /// When `input` is bit-for-bit equal to the last output the filter has
    /// nothing to do and returns `z` without touching it, even if the pole
    /// changed since the previous call.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        if input == self.z {
            return self.z;
        }

        self.z = (input * self.b) + (self.z * self.a);
        self.z
    }

    /// Smooth a block of samples in place.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Jump straight to `value`, bypassing the smoothing.
    pub fn reset(&mut self, value: f32) {
        self.z = value;
    }

    pub fn a(&self) -> f32 {
        self.a
    }

    pub fn b(&self) -> f32 {
        self.b
    }

    pub fn z(&self) -> f32 {
        self.z
    }
}

impl Default for OnePole {
    fn default() -> Self {
        Self::new(DEFAULT_POLE)
    }
}

/// Convert a time constant in seconds into a pole coefficient.
///
/// `tau` is treated as the time to settle, which is taken as five time
/// constants (99.3%). An infinite `tau` yields a pole of 1 (the filter
/// freezes). `sample_rate` must be positive.
#[inline]
pub fn tau_to_pole(tau: f32, sample_rate: f32) -> f32 {
    (-1.0 / ((tau * RECIPROCAL_5) * sample_rate)).exp()
}
