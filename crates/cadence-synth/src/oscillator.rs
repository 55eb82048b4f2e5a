//! Audio-rate oscillator for beep rendering.

use core::f32::consts::TAU;
use libm::sinf;

/// Oscillator waveform types
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OscillatorWaveform {
    /// Sine waveform: pure fundamental tone.
    #[default]
    Sine,
}

impl From<cadence_core::Waveform> for OscillatorWaveform {
    fn from(w: cadence_core::Waveform) -> Self {
        match w {
            cadence_core::Waveform::Sine => OscillatorWaveform::Sine,
        }
    }
}

/// Phase-accumulator oscillator.
///
/// # Example
///
/// ```rust
/// use cadence_synth::Oscillator;
///
/// let mut osc = Oscillator::new(48000.0);
/// osc.set_frequency(440.0); // A4
/// let first = osc.advance();
/// assert_eq!(first, 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Oscillator {
    /// Current phase position [0.0, 1.0)
    phase: f32,
    /// Phase increment per sample
    phase_inc: f32,
    /// Sample rate in Hz
    sample_rate: f32,
    /// Frequency in Hz
    frequency: f32,
    /// Waveform type
    waveform: OscillatorWaveform,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new(44100.0)
    }
}

impl Oscillator {
    /// Create a new oscillator with the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            phase_inc: 440.0 / sample_rate,
            sample_rate,
            frequency: 440.0,
            waveform: OscillatorWaveform::Sine,
        }
    }

    /// Set frequency in Hz.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.frequency = freq_hz.max(0.0);
        self.phase_inc = self.frequency / self.sample_rate;
    }

    /// Get current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Set waveform type.
    pub fn set_waveform(&mut self, waveform: OscillatorWaveform) {
        self.waveform = waveform;
    }

    /// Get current waveform.
    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }

    /// Reset phase to 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Generate next sample.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let output = match self.waveform {
            OscillatorWaveform::Sine => sinf(self.phase * TAU),
        };
        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        output
    }
}
