//! Run configuration loaded from TOML.

use std::collections::BTreeMap;
use std::path::Path;

use cadence_core::{DEFAULT_HALFWAY_TEXT, MUSIC_ATTENUATION_DB, TonePattern, ToneShape, ToneTable};
use cadence_synth::{DEFAULT_VOICE, SpeechEngine};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::paths::resolve_config_path;

/// Supported sample rates for the mix, in Hz.
const SAMPLE_RATE_RANGE: std::ops::RangeInclusive<u32> = 8_000..=192_000;

/// Complete configuration for a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Mixing settings.
    pub audio: AudioConfig,
    /// Speech engine settings.
    pub speech: SpeechConfig,
    /// Phase tone overrides.
    pub tones: TonesConfig,
    /// Encoder settings.
    pub export: ExportConfig,
}

/// `[audio]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioConfig {
    /// Sample rate of the whole mix in Hz.
    pub sample_rate: u32,
    /// Attenuation applied to background music in dB.
    pub music_gain_db: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            music_gain_db: MUSIC_ATTENUATION_DB,
        }
    }
}

/// `[speech]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpeechConfig {
    /// TTS backend.
    pub engine: SpeechEngine,
    /// Voice name passed to the backend.
    pub voice: String,
    /// Text of the halfway announcement.
    pub halfway_text: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            engine: SpeechEngine::default(),
            voice: DEFAULT_VOICE.to_string(),
            halfway_text: DEFAULT_HALFWAY_TEXT.to_string(),
        }
    }
}

/// `[tones]`: overrides layered on the built-in phase table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TonesConfig {
    /// Fallback pattern for unmapped phases.
    pub default: Option<TonePattern>,
    /// Per-phase patterns keyed by phase label.
    pub phases: BTreeMap<String, TonePattern>,
    /// Beep envelope.
    pub shape: ToneShape,
}

/// `[export]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// MP3 bitrate, e.g. `192k`.
    pub bitrate: String,
    /// WAV bit depth.
    pub bit_depth: u16,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            bitrate: "192k".to_string(),
            bit_depth: 16,
        }
    }
}

impl Config {
    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&text)
    }

    /// Load the explicit file, else the user config file if present, else
    /// defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match resolve_config_path(explicit) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Built-in phase table with this configuration's overrides applied.
    pub fn tone_table(&self) -> ToneTable {
        let mut table = ToneTable::default();
        if let Some(pattern) = self.tones.default {
            table.set_default(pattern);
        }
        for (label, pattern) in &self.tones.phases {
            table.set_phase(label, *pattern);
        }
        table.set_shape(self.tones.shape);
        table
    }

    /// Check ranges that TOML typing cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rate = self.audio.sample_rate;
        if !SAMPLE_RATE_RANGE.contains(&rate) {
            return Err(ConfigError::invalid(
                "audio.sample_rate",
                format!(
                    "{rate} Hz is outside {}..={} Hz",
                    SAMPLE_RATE_RANGE.start(),
                    SAMPLE_RATE_RANGE.end()
                ),
            ));
        }
        if !self.audio.music_gain_db.is_finite() || self.audio.music_gain_db > 0.0 {
            return Err(ConfigError::invalid(
                "audio.music_gain_db",
                "must be a finite attenuation (<= 0 dB)",
            ));
        }
        if self.speech.voice.trim().is_empty() {
            return Err(ConfigError::invalid("speech.voice", "must not be empty"));
        }
        if self.speech.halfway_text.trim().is_empty() {
            return Err(ConfigError::invalid("speech.halfway_text", "must not be empty"));
        }

        let nyquist = rate as f32 / 2.0;
        let patterns = self
            .tones
            .default
            .iter()
            .map(|p| ("tones.default".to_string(), p))
            .chain(
                self.tones
                    .phases
                    .iter()
                    .map(|(label, p)| (format!("tones.phases.{label}"), p)),
            );
        for (field, pattern) in patterns {
            if !(pattern.frequency_hz > 0.0 && pattern.frequency_hz < nyquist) {
                return Err(ConfigError::invalid(
                    field,
                    format!("frequency must be in (0, {nyquist}) Hz"),
                ));
            }
            if pattern.beep_count == 0 {
                return Err(ConfigError::invalid(field, "beep_count must be at least 1"));
            }
        }

        let shape = self.tones.shape;
        if !(shape.tone_secs > 0.0 && shape.tone_secs.is_finite()) {
            return Err(ConfigError::invalid("tones.shape.tone_secs", "must be positive"));
        }
        if !(shape.gap_secs >= 0.0 && shape.gap_secs.is_finite()) {
            return Err(ConfigError::invalid("tones.shape.gap_secs", "must not be negative"));
        }
        if !shape.gain_db.is_finite() || shape.gain_db > 0.0 {
            return Err(ConfigError::invalid("tones.shape.gain_db", "must be <= 0 dB"));
        }

        if !matches!(self.export.bit_depth, 16 | 24 | 32) {
            return Err(ConfigError::invalid("export.bit_depth", "must be 16, 24 or 32"));
        }
        if self.export.bitrate.trim().is_empty() {
            return Err(ConfigError::invalid("export.bitrate", "must not be empty"));
        }
        Ok(())
    }
}
