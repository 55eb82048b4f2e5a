//! Synthesis collaborators for cadence.
//!
//! Implements the [`cadence_core::ToneSynthesizer`] and
//! [`cadence_core::SpeechSynthesizer`] capabilities:
//!
//! - [`SineToneSynth`] - renders beep patterns in-process with an [`Oscillator`]
//! - [`CommandSpeech`] - drives an external TTS program (`say` or `espeak`)
//! - [`SilentSpeech`] - fixed-length silence, for dry runs and tests
//!
//! [`SpeechEngine`] selects between the speech implementations by name.
//!
//! # Example
//!
//! ```rust
//! use cadence_synth::{Oscillator, OscillatorWaveform};
//!
//! let mut osc = Oscillator::new(44100.0);
//! osc.set_frequency(880.0);
//! osc.set_waveform(OscillatorWaveform::Sine);
//! let sample = osc.advance();
//! assert!(sample.abs() <= 1.0);
//! ```

pub mod oscillator;
pub mod speech;
pub mod tone;

pub use oscillator::{Oscillator, OscillatorWaveform};
pub use speech::{CommandSpeech, DEFAULT_VOICE, SilentSpeech, SpeechEngine};
pub use tone::SineToneSynth;
