//! Text-to-speech engines.
//!
//! [`CommandSpeech`] shells out to a platform TTS program, writes the result
//! into the run's scratch directory and normalizes it through `ffmpeg` to a
//! mono WAV at the run's sample rate.

use std::path::{Path, PathBuf};
use std::process::Command;

use cadence_core::{AudioClip, SpeechSynthesizer, SynthContext, SynthesisError};
use cadence_io::{Transcoder, read_wav, stderr_tail};
use serde::{Deserialize, Serialize};

/// Voice used when none is configured.
pub const DEFAULT_VOICE: &str = "Samantha";

/// Selectable speech backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechEngine {
    /// macOS `say`, writing AIFF.
    #[default]
    Say,
    /// `espeak` / `espeak-ng`, writing WAV.
    Espeak,
    /// No audio; every utterance is fixed-length silence.
    Silent,
}

impl SpeechEngine {
    /// Every engine, in CLI order.
    pub const ALL: [SpeechEngine; 3] = [
        SpeechEngine::Say,
        SpeechEngine::Espeak,
        SpeechEngine::Silent,
    ];

    /// Name as accepted on the command line and in config files.
    pub fn name(self) -> &'static str {
        match self {
            SpeechEngine::Say => "say",
            SpeechEngine::Espeak => "espeak",
            SpeechEngine::Silent => "silent",
        }
    }

    /// Parse an engine name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Build the synthesizer for this engine.
    pub fn build(self, voice: &str, transcoder: &Transcoder) -> Box<dyn SpeechSynthesizer> {
        match self {
            SpeechEngine::Say => Box::new(CommandSpeech::say(voice, transcoder.clone())),
            SpeechEngine::Espeak => Box::new(CommandSpeech::espeak(voice, transcoder.clone())),
            SpeechEngine::Silent => Box::new(SilentSpeech::default()),
        }
    }
}

impl std::fmt::Display for SpeechEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How the TTS program is told where to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFlag {
    /// `say -o FILE`
    Say,
    /// `espeak -w FILE`
    Espeak,
}

impl OutputFlag {
    fn flag(self) -> &'static str {
        match self {
            OutputFlag::Say => "-o",
            OutputFlag::Espeak => "-w",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            OutputFlag::Say => "aiff",
            OutputFlag::Espeak => "wav",
        }
    }
}

/// Speech synthesized by an external program.
#[derive(Debug, Clone)]
pub struct CommandSpeech {
    program: PathBuf,
    voice: String,
    output: OutputFlag,
    transcoder: Transcoder,
}

impl CommandSpeech {
    /// macOS `say` with the given voice.
    pub fn say(voice: impl Into<String>, transcoder: Transcoder) -> Self {
        Self {
            program: PathBuf::from("say"),
            voice: voice.into(),
            output: OutputFlag::Say,
            transcoder,
        }
    }

    /// `espeak` with the given voice.
    pub fn espeak(voice: impl Into<String>, transcoder: Transcoder) -> Self {
        Self {
            program: PathBuf::from("espeak"),
            voice: voice.into(),
            output: OutputFlag::Espeak,
            transcoder,
        }
    }

    /// Override the TTS executable path.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    fn speak_to(&self, text: &str, raw: &Path) -> Result<(), SynthesisError> {
        let output = Command::new(&self.program)
            .arg("-v")
            .arg(&self.voice)
            .arg(self.output.flag())
            .arg(raw)
            .arg("--")
            .arg(text)
            .output()
            .map_err(|source| SynthesisError::Spawn {
                program: self.program_name(),
                source,
            })?;

        if !output.status.success() {
            return Err(SynthesisError::Status {
                program: self.program_name(),
                status: output.status.to_string(),
                stderr: stderr_tail(&output.stderr),
            });
        }
        Ok(())
    }
}

impl SpeechSynthesizer for CommandSpeech {
    fn synthesize(
        &self,
        text: &str,
        stem: &str,
        ctx: &SynthContext<'_>,
    ) -> Result<AudioClip, SynthesisError> {
        let raw = ctx
            .scratch_dir
            .join(format!("{stem}.{}", self.output.extension()));
        let normalized = ctx.scratch_dir.join(format!("{stem}.norm.wav"));

        tracing::debug!(
            program = %self.program.display(),
            voice = %self.voice,
            stem,
            "speak"
        );
        self.speak_to(text, &raw)?;

        self.transcoder
            .to_wav(&raw, &normalized, ctx.sample_rate)
            .map_err(from_io)?;
        let clip = read_wav(&normalized).map_err(from_io)?;
        if clip.is_empty() {
            return Err(SynthesisError::Decode(format!(
                "{} produced no audio",
                self.program_name()
            )));
        }
        Ok(clip)
    }
}

/// Fixed-length silence in place of speech.
///
/// Used by `--engine silent` and by tests that exercise the pipeline
/// without a TTS program installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SilentSpeech {
    /// Length of every utterance.
    pub duration_ms: u64,
}

impl Default for SilentSpeech {
    fn default() -> Self {
        Self { duration_ms: 1_000 }
    }
}

impl SpeechSynthesizer for SilentSpeech {
    fn synthesize(
        &self,
        _text: &str,
        _stem: &str,
        ctx: &SynthContext<'_>,
    ) -> Result<AudioClip, SynthesisError> {
        Ok(AudioClip::silence(self.duration_ms, ctx.sample_rate))
    }
}

fn from_io(err: cadence_io::Error) -> SynthesisError {
    match err {
        cadence_io::Error::Spawn { program, source } => SynthesisError::Spawn { program, source },
        cadence_io::Error::Transcode {
            program,
            status,
            stderr,
        } => SynthesisError::Status {
            program,
            status,
            stderr,
        },
        other => SynthesisError::Decode(other.to_string()),
    }
}
