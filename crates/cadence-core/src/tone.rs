//! Phase to tone-pattern mapping.
//!
//! Every segment gets a short beep pattern identifying its phase. The
//! mapping is a [`ToneTable`]: a set of per-phase [`TonePattern`]s plus a
//! default used for any label the table does not know. Unknown phases never
//! fail.
//!
//! | Phase | Frequency | Beeps |
//! |-----------|-----------|-------|
//! | Warm-up | 440 Hz | 1 |
//! | Interval | 880 Hz | 3 |
//! | Recovery | 587 Hz | 2 |
//! | Cool-down | 392 Hz | 1 |
//! | (default) | 440 Hz | 1 |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schedule::{Phase, normalize_label};

/// Pitch and repeat count identifying a phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TonePattern {
    /// Beep frequency in Hz.
    pub frequency_hz: f32,
    /// Number of beeps.
    pub beep_count: u32,
}

impl TonePattern {
    /// Create a pattern.
    pub const fn new(frequency_hz: f32, beep_count: u32) -> Self {
        Self {
            frequency_hz,
            beep_count,
        }
    }
}

/// Envelope shared by every beep: length, level and spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneShape {
    /// Length of a single beep in seconds.
    pub tone_secs: f32,
    /// Level of each beep relative to full scale, in dB.
    pub gain_db: f32,
    /// Silence between consecutive beeps in seconds.
    pub gap_secs: f32,
}

impl Default for ToneShape {
    fn default() -> Self {
        Self {
            tone_secs: 0.2,
            gain_db: -3.0,
            gap_secs: 0.1,
        }
    }
}

/// Oscillator shape requested from the tone synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    /// Pure sine.
    #[default]
    Sine,
}

/// A complete request for one tone asset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ToneRequest {
    /// Oscillator shape.
    pub waveform: Waveform,
    /// Beep frequency in Hz.
    pub frequency_hz: f32,
    /// Length of one beep in seconds.
    pub duration_secs: f32,
    /// Level of each beep in dB.
    pub gain_db: f32,
    /// Number of beeps.
    pub repeat_count: u32,
    /// Silence between beeps in seconds.
    pub gap_secs: f32,
}

/// Phase label to tone pattern mapping with a fallback entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneTable {
    phases: BTreeMap<String, TonePattern>,
    default: TonePattern,
    shape: ToneShape,
}

impl Default for ToneTable {
    fn default() -> Self {
        Self::empty(TonePattern::new(440.0, 1))
            .with_phase("Warm-up", TonePattern::new(440.0, 1))
            .with_phase("Interval", TonePattern::new(880.0, 3))
            .with_phase("Recovery", TonePattern::new(587.0, 2))
            .with_phase("Cool-down", TonePattern::new(392.0, 1))
    }
}

impl ToneTable {
    /// A table with no phase entries; every lookup yields `default`.
    pub fn empty(default: TonePattern) -> Self {
        Self {
            phases: BTreeMap::new(),
            default,
            shape: ToneShape::default(),
        }
    }

    /// Add or replace the pattern for a phase label.
    pub fn with_phase(mut self, label: &str, pattern: TonePattern) -> Self {
        self.set_phase(label, pattern);
        self
    }

    /// Add or replace the pattern for a phase label.
    pub fn set_phase(&mut self, label: &str, pattern: TonePattern) {
        self.phases.insert(normalize_label(label), pattern);
    }

    /// Replace the fallback pattern.
    pub fn set_default(&mut self, pattern: TonePattern) {
        self.default = pattern;
    }

    /// Replace the beep envelope.
    pub fn set_shape(&mut self, shape: ToneShape) {
        self.shape = shape;
    }

    /// Fallback pattern.
    pub fn default_pattern(&self) -> TonePattern {
        self.default
    }

    /// Beep envelope.
    pub fn shape(&self) -> ToneShape {
        self.shape
    }

    /// Pattern for a phase, or the default when unmapped.
    pub fn lookup(&self, phase: &Phase) -> TonePattern {
        self.map(phase.label())
    }

    /// Pattern for a raw label, or the default when unmapped.
    pub fn map(&self, label: &str) -> TonePattern {
        self.phases
            .get(&normalize_label(label))
            .copied()
            .unwrap_or(self.default)
    }

    /// Full synthesis request for a phase.
    pub fn request_for(&self, phase: &Phase) -> ToneRequest {
        self.request(self.lookup(phase))
    }

    /// Full synthesis request for the fallback pattern.
    pub fn default_request(&self) -> ToneRequest {
        self.request(self.default)
    }

    fn request(&self, pattern: TonePattern) -> ToneRequest {
        ToneRequest {
            waveform: Waveform::Sine,
            frequency_hz: pattern.frequency_hz,
            duration_secs: self.shape.tone_secs,
            gain_db: self.shape.gain_db,
            repeat_count: pattern.beep_count,
            gap_secs: self.shape.gap_secs,
        }
    }
}
