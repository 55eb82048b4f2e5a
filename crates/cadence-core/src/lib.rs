//! Cadence Core - timeline compilation for interval-training audio.
//!
//! Turns a workout schedule into one mixed track: a spoken cue and a
//! phase-specific beep pattern at the start of every segment, a halfway
//! announcement, all overlaid on silence or looped background music.
//!
//! This crate decides *when* each cue plays and *what* it is. Producing the
//! waveforms is delegated to [`SpeechSynthesizer`] and [`ToneSynthesizer`]
//! implementations; reading and encoding files lives in `cadence-io`.
//!
//! # Pipeline
//!
//! 1. [`Schedule`] - parse and validate segments ([`ValidationError`])
//! 2. [`ToneTable`] - map each phase to a [`TonePattern`]
//! 3. [`plan_cues`] / [`CueSynthesizer`] - place and synthesize cues
//! 4. [`BaseTrackBuilder`] - silence or looped, attenuated music
//! 5. [`Timeline`] - overlay every cue in a fixed order
//!
//! [`Compiler`] runs steps 3-5.
//!
//! # Example
//!
//! ```rust,ignore
//! use cadence_core::{Backing, CompileOptions, Compiler, Schedule, ScheduleVariant, ToneSource, ToneTable};
//!
//! let schedule = Schedule::from_csv(std::fs::File::open("interval.csv")?, ScheduleVariant::Extended)?;
//! let compiler = Compiler::new(&speech, &tones, CompileOptions::default());
//! let mix = compiler.compile(&schedule, Backing::Silence, &ToneSource::Table(ToneTable::default()))?;
//! ```

pub mod base_track;
pub mod clip;
pub mod compile;
pub mod cue;
pub mod error;
pub mod math;
pub mod schedule;
pub mod synthesis;
pub mod timeline;
pub mod tone;

pub use base_track::{Backing, BaseTrackBuilder, MUSIC_ATTENUATION_DB};
pub use clip::AudioClip;
pub use compile::{CompileOptions, Compiler};
pub use cue::{
    Cue, CueContent, CueKind, CueSource, DEFAULT_HALFWAY_TEXT, PlannedCue, ToneSource, plan_cues,
};
pub use error::{Error, Result, SynthesisError};
pub use math::{db_to_linear, linear_to_db, ms_to_samples, samples_to_ms, secs_to_samples};
pub use schedule::{MAX_TOTAL_SECONDS, Phase, Schedule, ScheduleVariant, Segment, ValidationError};
pub use synthesis::{CueSynthesizer, SpeechSynthesizer, SynthContext, ToneSynthesizer};
pub use timeline::Timeline;
pub use tone::{TonePattern, ToneRequest, ToneShape, ToneTable, Waveform};
