//! Cue synthesis coordination.
//!
//! Speech and tone generation are external capabilities behind the
//! [`SpeechSynthesizer`] and [`ToneSynthesizer`] traits. [`CueSynthesizer`]
//! issues one request per planned cue on a bounded worker pool and collects
//! the results. The phase is all-or-nothing: the first failure aborts it and
//! no cue is handed to the compositor.
//!
//! Intermediate files live in a scratch directory owned by the run, removed
//! when the coordinator returns on every path.

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;

use crate::clip::AudioClip;
use crate::cue::{Cue, CueContent, PlannedCue, ToneSource};
use crate::error::{Error, Result, SynthesisError};
use crate::tone::ToneRequest;

/// Per-run context handed to every collaborator call.
#[derive(Debug, Clone, Copy)]
pub struct SynthContext<'a> {
    /// Directory for intermediate files. Removed after the run.
    pub scratch_dir: &'a Path,
    /// Sample rate the returned clip must use.
    pub sample_rate: u32,
}

/// Text-to-speech capability.
pub trait SpeechSynthesizer: Send + Sync {
    /// Speak `text`, returning a clip at `ctx.sample_rate`.
    ///
    /// `stem` is unique per request and may be used to name files under
    /// `ctx.scratch_dir`.
    fn synthesize(
        &self,
        text: &str,
        stem: &str,
        ctx: &SynthContext<'_>,
    ) -> std::result::Result<AudioClip, SynthesisError>;
}

/// Tone generation capability.
pub trait ToneSynthesizer: Send + Sync {
    /// Render `request`, returning a clip at `ctx.sample_rate`.
    fn synthesize(
        &self,
        request: &ToneRequest,
        ctx: &SynthContext<'_>,
    ) -> std::result::Result<AudioClip, SynthesisError>;
}

/// Callback invoked after each cue is synthesized.
pub type ProgressFn<'a> = &'a (dyn Fn(&PlannedCue) + Sync);

/// Turns a cue plan into synthesized cues.
pub struct CueSynthesizer<'a> {
    speech: &'a dyn SpeechSynthesizer,
    tones: &'a dyn ToneSynthesizer,
    sample_rate: u32,
    jobs: usize,
    progress: Option<ProgressFn<'a>>,
}

impl<'a> CueSynthesizer<'a> {
    /// Create a coordinator using a single worker.
    pub fn new(
        speech: &'a dyn SpeechSynthesizer,
        tones: &'a dyn ToneSynthesizer,
        sample_rate: u32,
    ) -> Self {
        Self {
            speech,
            tones,
            sample_rate,
            jobs: 1,
            progress: None,
        }
    }

    /// Set the worker count. Zero is treated as one.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Report each completed cue.
    pub fn with_progress(mut self, progress: ProgressFn<'a>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Synthesize every cue in `plan`.
    ///
    /// The result preserves plan order. Beep cues share the asset held by
    /// `tones`.
    pub fn realize(&self, plan: &[PlannedCue], tones: &ToneSource) -> Result<Vec<Cue>> {
        let scratch = tempfile::Builder::new()
            .prefix("cadence-")
            .tempdir()
            .map_err(|e| Error::synthesis("scratch directory", e.into()))?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .thread_name(|i| format!("cadence-synth-{i}"))
            .build()
            .map_err(|e| Error::synthesis("worker pool", SynthesisError::Pool(e.to_string())))?;

        let ctx = SynthContext {
            scratch_dir: scratch.path(),
            sample_rate: self.sample_rate,
        };

        tracing::info!(
            cues = plan.len(),
            jobs = self.jobs,
            scratch = %scratch.path().display(),
            "synthesizing cues"
        );

        let cues = pool.install(|| {
            plan.par_iter()
                .map(|planned| self.realize_one(planned, tones, &ctx))
                .collect::<Result<Vec<_>>>()
        });

        // Dropping `scratch` removes every intermediate file, success or not.
        drop(scratch);
        cues
    }

    fn realize_one(
        &self,
        planned: &PlannedCue,
        tones: &ToneSource,
        ctx: &SynthContext<'_>,
    ) -> Result<Cue> {
        let label = planned.label();
        let audio = match (&planned.content, tones) {
            (CueContent::Speech(text), _) => {
                tracing::debug!(cue = %label, text = %text, "speech request");
                Arc::new(
                    self.speech
                        .synthesize(text, &planned.asset_stem(), ctx)
                        .map_err(|e| Error::synthesis(&label, e))?,
                )
            }
            (CueContent::Tone(request), _) => {
                tracing::debug!(
                    cue = %label,
                    freq = request.frequency_hz,
                    beeps = request.repeat_count,
                    "tone request"
                );
                Arc::new(
                    self.tones
                        .synthesize(request, ctx)
                        .map_err(|e| Error::synthesis(&label, e))?,
                )
            }
            (CueContent::Beep, ToneSource::Asset(beep)) => Arc::clone(beep),
            (CueContent::Beep, ToneSource::Table(_)) => {
                return Err(Error::synthesis(
                    &label,
                    SynthesisError::Decode("no beep asset supplied".to_string()),
                ));
            }
        };

        if audio.sample_rate() != self.sample_rate {
            return Err(Error::synthesis(
                &label,
                SynthesisError::Decode(format!(
                    "clip is {} Hz, expected {} Hz",
                    audio.sample_rate(),
                    self.sample_rate
                )),
            ));
        }

        if let Some(progress) = self.progress {
            progress(planned);
        }
        Ok(Cue::from_plan(planned, audio))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::cue::{CueKind, CueSource, plan_cues};
    use crate::schedule::{Schedule, ScheduleVariant, Segment};
    use crate::tone::ToneTable;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Speech double: fixed-length silence, records each request.
    pub(crate) struct SilentSpeech {
        pub duration_ms: u64,
        pub calls: AtomicUsize,
        pub scratch: Mutex<Option<PathBuf>>,
        pub fail_on: Option<String>,
    }

    impl SilentSpeech {
        pub(crate) fn new(duration_ms: u64) -> Self {
            Self {
                duration_ms,
                calls: AtomicUsize::new(0),
                scratch: Mutex::new(None),
                fail_on: None,
            }
        }
    }

    impl SpeechSynthesizer for SilentSpeech {
        fn synthesize(
            &self,
            text: &str,
            stem: &str,
            ctx: &SynthContext<'_>,
        ) -> std::result::Result<AudioClip, SynthesisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let path = ctx.scratch_dir.join(format!("{stem}.txt"));
            std::fs::write(&path, text)?;
            *self.scratch.lock().unwrap() = Some(ctx.scratch_dir.to_path_buf());
            if self.fail_on.as_deref() == Some(text) {
                return Err(SynthesisError::Status {
                    program: "say".to_string(),
                    status: "exit status: 1".to_string(),
                    stderr: String::new(),
                });
            }
            Ok(AudioClip::silence(self.duration_ms, ctx.sample_rate))
        }
    }

    /// Tone double: `repeat_count` samples of 0.25.
    pub(crate) struct CountingTones {
        pub calls: AtomicUsize,
    }

    impl CountingTones {
        pub(crate) fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ToneSynthesizer for CountingTones {
        fn synthesize(
            &self,
            request: &ToneRequest,
            ctx: &SynthContext<'_>,
        ) -> std::result::Result<AudioClip, SynthesisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AudioClip::new(
                vec![0.25; request.repeat_count as usize],
                ctx.sample_rate,
            ))
        }
    }

    fn schedule() -> Schedule {
        Schedule::new(
            vec![
                Segment::new("Warm-up", "Easy", Some("Loose"), 5, 5),
                Segment::new("Interval", "Hard", Some("Arms"), 10, 15),
            ],
            ScheduleVariant::Extended,
        )
        .unwrap()
    }

    #[test]
    fn realizes_every_cue_in_plan_order() {
        let speech = SilentSpeech::new(100);
        let tones = CountingTones::new();
        let source = ToneSource::Table(ToneTable::default());
        let plan = plan_cues(&schedule(), &source, "Half");

        let cues = CueSynthesizer::new(&speech, &tones, 8_000)
            .with_jobs(4)
            .realize(&plan, &source)
            .unwrap();

        assert_eq!(cues.len(), plan.len());
        assert_eq!(speech.calls.load(Ordering::SeqCst), 3);
        assert_eq!(tones.calls.load(Ordering::SeqCst), 3);
        for (cue, planned) in cues.iter().zip(&plan) {
            assert_eq!(cue.source, planned.source);
            assert_eq!(cue.kind, planned.kind);
            assert_eq!(cue.start_offset_ms, planned.start_offset_ms);
        }
        let interval_tone = cues
            .iter()
            .find(|c| c.source == CueSource::Segment(1) && c.kind == CueKind::Tone)
            .unwrap();
        assert_eq!(interval_tone.audio.len(), 3);
    }

    #[test]
    fn beep_asset_is_shared() {
        let speech = SilentSpeech::new(100);
        let tones = CountingTones::new();
        let beep = Arc::new(AudioClip::new(vec![0.5; 10], 8_000));
        let source = ToneSource::Asset(Arc::clone(&beep));
        let plan = plan_cues(&schedule(), &source, "Half");

        let cues = CueSynthesizer::new(&speech, &tones, 8_000)
            .realize(&plan, &source)
            .unwrap();

        assert_eq!(tones.calls.load(Ordering::SeqCst), 0);
        assert!(
            cues.iter()
                .filter(|c| c.kind == CueKind::Tone)
                .all(|c| Arc::ptr_eq(&c.audio, &beep))
        );
    }

    #[test]
    fn failure_aborts_and_cleans_scratch() {
        let mut speech = SilentSpeech::new(100);
        speech.fail_on = Some("Hard. Arms".to_string());
        let tones = CountingTones::new();
        let source = ToneSource::Table(ToneTable::default());
        let plan = plan_cues(&schedule(), &source, "Half");

        let err = CueSynthesizer::new(&speech, &tones, 8_000)
            .realize(&plan, &source)
            .unwrap_err();
        assert!(matches!(err, Error::Synthesis { ref cue, .. } if cue == "segment 2 voice"));

        let scratch = speech.scratch.lock().unwrap().clone().unwrap();
        assert!(!scratch.exists(), "scratch dir must be removed on failure");
    }

    #[test]
    fn scratch_removed_on_success() {
        let speech = SilentSpeech::new(100);
        let tones = CountingTones::new();
        let source = ToneSource::Table(ToneTable::default());
        let plan = plan_cues(&schedule(), &source, "Half");

        CueSynthesizer::new(&speech, &tones, 8_000)
            .realize(&plan, &source)
            .unwrap();
        let scratch = speech.scratch.lock().unwrap().clone().unwrap();
        assert!(!scratch.exists());
    }

    #[test]
    fn wrong_sample_rate_rejected() {
        struct WrongRate;
        impl ToneSynthesizer for WrongRate {
            fn synthesize(
                &self,
                _request: &ToneRequest,
                _ctx: &SynthContext<'_>,
            ) -> std::result::Result<AudioClip, SynthesisError> {
                Ok(AudioClip::new(vec![0.0; 4], 22_050))
            }
        }

        let speech = SilentSpeech::new(100);
        let source = ToneSource::Table(ToneTable::default());
        let plan = plan_cues(&schedule(), &source, "Half");
        let err = CueSynthesizer::new(&speech, &WrongRate, 8_000)
            .realize(&plan, &source)
            .unwrap_err();
        assert!(matches!(err, Error::Synthesis { .. }));
    }

    #[test]
    fn progress_reports_each_cue() {
        let speech = SilentSpeech::new(10);
        let tones = CountingTones::new();
        let source = ToneSource::Table(ToneTable::default());
        let plan = plan_cues(&schedule(), &source, "Half");
        let seen = AtomicUsize::new(0);
        let progress = |_: &PlannedCue| {
            seen.fetch_add(1, Ordering::SeqCst);
        };

        CueSynthesizer::new(&speech, &tones, 8_000)
            .with_jobs(2)
            .with_progress(&progress)
            .realize(&plan, &source)
            .unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), plan.len());
    }
}
