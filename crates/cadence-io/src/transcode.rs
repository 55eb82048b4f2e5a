//! `ffmpeg` wrapper for format normalization and encoding.

use crate::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Program invoked when no explicit path is configured.
pub const DEFAULT_FFMPEG: &str = "ffmpeg";

/// Lines of `ffmpeg` stderr kept in error messages.
const STDERR_TAIL_LINES: usize = 5;

/// Converts audio between formats by running `ffmpeg`.
#[derive(Debug, Clone)]
pub struct Transcoder {
    program: PathBuf,
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::new(DEFAULT_FFMPEG)
    }
}

impl Transcoder {
    /// Use the given `ffmpeg` executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Decode `src` (any format `ffmpeg` reads) into a mono 32-bit float WAV
    /// at `sample_rate`.
    pub fn to_wav(&self, src: &Path, dst: &Path, sample_rate: u32) -> Result<()> {
        self.run(vec![
            "-i".into(),
            src.into(),
            "-ac".into(),
            "1".into(),
            "-ar".into(),
            sample_rate.to_string().into(),
            "-c:a".into(),
            "pcm_f32le".into(),
            "-f".into(),
            "wav".into(),
            dst.into(),
        ])
    }

    /// Encode `src` as MP3 at `bitrate` (e.g. `192k`).
    pub fn to_mp3(&self, src: &Path, dst: &Path, bitrate: &str) -> Result<()> {
        self.run(vec![
            "-i".into(),
            src.into(),
            "-codec:a".into(),
            "libmp3lame".into(),
            "-b:a".into(),
            bitrate.into(),
            "-f".into(),
            "mp3".into(),
            dst.into(),
        ])
    }

    fn run(&self, args: Vec<OsString>) -> Result<()> {
        let program = self.program.display().to_string();
        tracing::debug!(program = %program, ?args, "transcode");

        let output = Command::new(&self.program)
            .args(["-hide_banner", "-nostdin", "-loglevel", "error", "-y"])
            .args(&args)
            .output()
            .map_err(|source| Error::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::Transcode {
                program,
                status: output.status.to_string(),
                stderr: stderr_tail(&output.stderr),
            });
        }
        Ok(())
    }
}

/// Last few non-empty lines of a process's stderr, for error messages.
pub fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n")
}
