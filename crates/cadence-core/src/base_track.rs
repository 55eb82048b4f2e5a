//! Background track construction.

use crate::clip::AudioClip;
use crate::error::{Error, Result};

/// Attenuation applied to background music so cues stay intelligible.
pub const MUSIC_ATTENUATION_DB: f32 = -4.5;

/// What the cues are mixed over.
#[derive(Debug, Clone)]
pub enum Backing {
    /// Pure silence of exactly the workout length.
    Silence,
    /// Music, looped and attenuated.
    Music(AudioClip),
}

/// Builds the base track for a run.
#[derive(Debug, Clone, Copy)]
pub struct BaseTrackBuilder {
    sample_rate: u32,
    music_gain_db: f32,
}

impl BaseTrackBuilder {
    /// Create a builder with the standard music attenuation.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            music_gain_db: MUSIC_ATTENUATION_DB,
        }
    }

    /// Override the music attenuation.
    pub fn with_music_gain_db(mut self, gain_db: f32) -> Self {
        self.music_gain_db = gain_db;
        self
    }

    /// Build a base track of at least `total_duration_ms`.
    pub fn build(&self, backing: Backing, total_duration_ms: u64) -> Result<AudioClip> {
        match backing {
            Backing::Silence => Ok(self.silence(total_duration_ms)),
            Backing::Music(music) => self.music(music, total_duration_ms),
        }
    }

    /// Silence lasting exactly `total_duration_ms`.
    pub fn silence(&self, total_duration_ms: u64) -> AudioClip {
        tracing::debug!(total_duration_ms, "silent base track");
        AudioClip::silence(total_duration_ms, self.sample_rate)
    }

    /// Loop `music` by doubling until it covers `total_duration_ms`, then
    /// attenuate it. Music already longer than the workout is kept whole.
    pub fn music(&self, mut music: AudioClip, total_duration_ms: u64) -> Result<AudioClip> {
        if music.is_empty() {
            return Err(Error::media_load("background music", "track contains no audio"));
        }
        if music.sample_rate() != self.sample_rate {
            return Err(Error::media_load(
                "background music",
                format!(
                    "track is {} Hz, expected {} Hz",
                    music.sample_rate(),
                    self.sample_rate
                ),
            ));
        }

        let source_ms = music.duration_ms();
        music.extend_by_doubling(total_duration_ms);
        music.apply_gain_db(self.music_gain_db);

        tracing::debug!(
            source_ms,
            looped_ms = music.duration_ms(),
            total_duration_ms,
            gain_db = self.music_gain_db,
            "music base track"
        );
        Ok(music)
    }
}
