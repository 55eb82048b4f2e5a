//! Loading external audio assets into the mixing format.

use crate::transcode::Transcoder;
use crate::wav::{read_wav, read_wav_info};
use cadence_core::AudioClip;
use std::path::Path;

/// Loads music and beep assets as mono clips at a fixed sample rate.
///
/// WAV files already at the target rate are read directly. Everything else
/// goes through the [`Transcoder`] into a temporary WAV first.
#[derive(Debug, Clone, Copy)]
pub struct MediaLoader<'a> {
    transcoder: &'a Transcoder,
    sample_rate: u32,
}

impl<'a> MediaLoader<'a> {
    /// Create a loader targeting `sample_rate`.
    pub fn new(transcoder: &'a Transcoder, sample_rate: u32) -> Self {
        Self {
            transcoder,
            sample_rate,
        }
    }

    /// Load `path`, reporting failures as [`cadence_core::Error::MediaLoad`].
    pub fn load(&self, path: impl AsRef<Path>) -> cadence_core::Result<AudioClip> {
        let path = path.as_ref();
        let asset = path.display().to_string();
        if !path.is_file() {
            return Err(cadence_core::Error::media_load(asset, "file not found"));
        }

        let clip = self
            .load_inner(path)
            .map_err(|e| cadence_core::Error::media_load(&asset, e))?;
        tracing::debug!(
            asset = %asset,
            duration_ms = clip.duration_ms(),
            sample_rate = clip.sample_rate(),
            "loaded media"
        );
        Ok(clip)
    }

    fn load_inner(&self, path: &Path) -> crate::Result<AudioClip> {
        if self.is_native(path) {
            return read_wav(path);
        }

        let scratch = tempfile::Builder::new().prefix("cadence-media-").tempdir()?;
        let wav = scratch.path().join("decoded.wav");
        self.transcoder.to_wav(path, &wav, self.sample_rate)?;
        read_wav(&wav)
    }

    /// Whether `path` is a WAV the mixer can use without resampling.
    fn is_native(&self, path: &Path) -> bool {
        let is_wav = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("wav"));
        is_wav
            && read_wav_info(path)
                .map(|info| info.sample_rate == self.sample_rate)
                .unwrap_or(false)
    }
}
