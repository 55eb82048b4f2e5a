//! Final mix export.
//!
//! The mix is written to a temporary file beside the destination and renamed
//! into place only once encoding succeeds, so a failed export never leaves a
//! truncated file at the output path.

use crate::transcode::Transcoder;
use crate::wav::{WavSpec, write_wav};
use crate::{Error, Result};
use cadence_core::AudioClip;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container/codec of the exported file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Uncompressed WAV, written directly.
    Wav,
    /// MP3, encoded by `ffmpeg`.
    Mp3,
}

impl ExportFormat {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "wav" => Ok(ExportFormat::Wav),
            "mp3" => Ok(ExportFormat::Mp3),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Encoder settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Forced format; `None` infers it from the output extension.
    pub format: Option<ExportFormat>,
    /// MP3 bitrate passed to the encoder.
    pub bitrate: String,
    /// WAV bit depth (16, 24 or 32).
    pub bit_depth: u16,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: None,
            bitrate: "192k".to_string(),
            bit_depth: 16,
        }
    }
}

/// Writes the final mix to disk.
#[derive(Debug, Clone)]
pub struct Exporter<'a> {
    transcoder: &'a Transcoder,
    options: ExportOptions,
}

impl<'a> Exporter<'a> {
    /// Create an exporter.
    pub fn new(transcoder: &'a Transcoder, options: ExportOptions) -> Self {
        Self {
            transcoder,
            options,
        }
    }

    /// Encode `clip` to `path`, reporting failures as
    /// [`cadence_core::Error::Export`].
    pub fn export(&self, clip: &AudioClip, path: impl AsRef<Path>) -> cadence_core::Result<()> {
        let path = path.as_ref();
        self.export_inner(clip, path)
            .map_err(|e| cadence_core::Error::export(path.display().to_string(), e))
    }

    fn export_inner(&self, clip: &AudioClip, path: &Path) -> Result<()> {
        let format = match self.options.format {
            Some(format) => format,
            None => ExportFormat::from_path(path)?,
        };
        if !matches!(self.options.bit_depth, 16 | 24 | 32) {
            return Err(Error::UnsupportedFormat(format!(
                "{}-bit WAV",
                self.options.bit_depth
            )));
        }

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let staged = tempfile::Builder::new()
            .prefix(".cadence-export-")
            .tempfile_in(dir)?;

        let spec = WavSpec {
            sample_rate: clip.sample_rate(),
            bits_per_sample: self.options.bit_depth,
        };

        match format {
            ExportFormat::Wav => write_wav(staged.path(), clip, spec)?,
            ExportFormat::Mp3 => {
                let scratch = tempfile::Builder::new()
                    .prefix("cadence-export-")
                    .tempdir()?;
                let wav = scratch.path().join("mix.wav");
                write_wav(&wav, clip, spec)?;
                self.transcoder
                    .to_mp3(&wav, staged.path(), &self.options.bitrate)?;
            }
        }

        staged.persist(path).map_err(|e| e.error)?;
        tracing::info!(
            path = %path.display(),
            ?format,
            duration_ms = clip.duration_ms(),
            "exported"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_wav;
    use tempfile::TempDir;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            ExportFormat::from_path(Path::new("a/b.WAV")).unwrap(),
            ExportFormat::Wav
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("out.mp3")).unwrap(),
            ExportFormat::Mp3
        );
        assert!(ExportFormat::from_path(Path::new("out.ogg")).is_err());
        assert!(ExportFormat::from_path(Path::new("out")).is_err());
    }

    #[test]
    fn wav_export_writes_whole_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("mix.wav");
        let clip = AudioClip::new(vec![0.5; 8000], 8000);

        let transcoder = Transcoder::default();
        Exporter::new(&transcoder, ExportOptions::default())
            .export(&clip, &out)
            .unwrap();

        let loaded = read_wav(&out).unwrap();
        assert_eq!(loaded.len(), 8000);
        assert_eq!(loaded.sample_rate(), 8000);
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers.len(), 1, "staging file left behind: {leftovers:?}");
    }

    #[test]
    fn failed_mp3_export_leaves_nothing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("mix.mp3");
        let clip = AudioClip::new(vec![0.5; 100], 8000);

        let transcoder = Transcoder::new("/nonexistent/ffmpeg");
        let err = Exporter::new(&transcoder, ExportOptions::default())
            .export(&clip, &out)
            .unwrap_err();

        assert!(matches!(err, cadence_core::Error::Export { .. }));
        assert!(!out.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn bad_bit_depth_rejected() {
        let dir = TempDir::new().unwrap();
        let transcoder = Transcoder::default();
        let options = ExportOptions {
            bit_depth: 12,
            ..ExportOptions::default()
        };
        let err = Exporter::new(&transcoder, options)
            .export(&AudioClip::new(vec![0.0; 4], 8000), dir.path().join("x.wav"))
            .unwrap_err();
        assert!(matches!(err, cadence_core::Error::Export { .. }));
    }
}
