//! End-to-end compilation: schedule in, mixed track out.

use crate::base_track::{Backing, BaseTrackBuilder, MUSIC_ATTENUATION_DB};
use crate::clip::AudioClip;
use crate::cue::{DEFAULT_HALFWAY_TEXT, ToneSource, plan_cues};
use crate::error::Result;
use crate::math::linear_to_db;
use crate::schedule::Schedule;
use crate::synthesis::{CueSynthesizer, ProgressFn, SpeechSynthesizer, ToneSynthesizer};
use crate::timeline::Timeline;

/// Run-wide settings.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Sample rate of every clip in the run.
    pub sample_rate: u32,
    /// Attenuation applied to background music, in dB.
    pub music_gain_db: f32,
    /// Text of the halfway announcement.
    pub halfway_text: String,
    /// Synthesis worker count.
    pub jobs: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            music_gain_db: MUSIC_ATTENUATION_DB,
            halfway_text: DEFAULT_HALFWAY_TEXT.to_string(),
            jobs: 1,
        }
    }
}

/// Compiles a validated schedule into one mixed track.
pub struct Compiler<'a> {
    speech: &'a dyn SpeechSynthesizer,
    tones: &'a dyn ToneSynthesizer,
    options: CompileOptions,
    progress: Option<ProgressFn<'a>>,
}

impl<'a> Compiler<'a> {
    /// Create a compiler over the given collaborators.
    pub fn new(
        speech: &'a dyn SpeechSynthesizer,
        tones: &'a dyn ToneSynthesizer,
        options: CompileOptions,
    ) -> Self {
        Self {
            speech,
            tones,
            options,
            progress: None,
        }
    }

    /// Report each synthesized cue.
    pub fn with_progress(mut self, progress: ProgressFn<'a>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Settings in effect.
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Synthesize all cues, build the base track and mix.
    pub fn compile(
        &self,
        schedule: &Schedule,
        backing: Backing,
        tones: &ToneSource,
    ) -> Result<AudioClip> {
        let total_ms = schedule.total_duration_ms();
        tracing::info!(
            segments = schedule.len(),
            total_seconds = schedule.total_duration_seconds(),
            halfway_seconds = schedule.halfway_point_seconds(),
            "compiling schedule"
        );

        let plan = plan_cues(schedule, tones, &self.options.halfway_text);

        let mut synth = CueSynthesizer::new(self.speech, self.tones, self.options.sample_rate)
            .with_jobs(self.options.jobs);
        if let Some(progress) = self.progress {
            synth = synth.with_progress(progress);
        }
        let cues = synth.realize(&plan, tones)?;

        let base = BaseTrackBuilder::new(self.options.sample_rate)
            .with_music_gain_db(self.options.music_gain_db)
            .build(backing, total_ms)?;

        let timeline = Timeline::new(base, cues, total_ms)?;
        tracing::info!(
            cues = timeline.cues().len(),
            base_ms = timeline.base().duration_ms(),
            "compositing"
        );
        let mix = timeline.compose();
        tracing::info!(
            duration_ms = mix.duration_ms(),
            peak_dbfs = linear_to_db(mix.peak()),
            "mix complete"
        );
        Ok(mix)
    }
}
