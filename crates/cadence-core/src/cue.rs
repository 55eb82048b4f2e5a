//! Cue planning: what plays, and when.
//!
//! Offsets are pure functions of the schedule. Segment `i` starts at the sum
//! of the durations before it; its voice and tone cues both start there. The
//! halfway announcement is always placed at `halfway_point * 1000` ms, whether
//! or not a segment boundary falls on it.

use std::fmt;
use std::sync::Arc;

use crate::clip::AudioClip;
use crate::schedule::{Schedule, Segment};
use crate::tone::{ToneRequest, ToneTable};

/// Default text of the halfway announcement.
pub const DEFAULT_HALFWAY_TEXT: &str = "Halfway point, time to turn around";

/// What a cue sounds like.
///
/// Declaration order is the tie-break order: tones are mixed before voices
/// at the same offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CueKind {
    /// Beep pattern.
    Tone,
    /// Spoken announcement.
    Voice,
}

/// Where a cue comes from.
///
/// Declaration order is the tie-break order: segment cues (in schedule
/// order) are mixed before the halfway cue at the same offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CueSource {
    /// Zero-based segment index.
    Segment(usize),
    /// The halfway announcement.
    Halfway,
}

impl fmt::Display for CueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CueSource::Segment(i) => write!(f, "segment {}", i + 1),
            CueSource::Halfway => f.write_str("halfway"),
        }
    }
}

/// Where tone cues come from.
#[derive(Debug, Clone)]
pub enum ToneSource {
    /// Synthesize a per-phase pattern from the table.
    Table(ToneTable),
    /// Reuse one pre-recorded beep for every tone cue.
    Asset(Arc<AudioClip>),
}

/// Content to be synthesized for a planned cue.
#[derive(Debug, Clone, PartialEq)]
pub enum CueContent {
    /// Text for the speech synthesizer.
    Speech(String),
    /// Request for the tone synthesizer.
    Tone(ToneRequest),
    /// The shared beep asset.
    Beep,
}

/// A cue whose placement and content are known but whose audio is not yet
/// synthesized.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedCue {
    /// Tone or voice.
    pub kind: CueKind,
    /// Originating segment, or the halfway marker.
    pub source: CueSource,
    /// Absolute start in milliseconds.
    pub start_offset_ms: u64,
    /// What to synthesize.
    pub content: CueContent,
}

impl PlannedCue {
    /// Human-readable label, e.g. `segment 2 voice`.
    pub fn label(&self) -> String {
        let kind = match self.kind {
            CueKind::Tone => "tone",
            CueKind::Voice => "voice",
        };
        format!("{} {kind}", self.source)
    }

    /// File stem for intermediate assets, unique within a plan.
    pub fn asset_stem(&self) -> String {
        let kind = match self.kind {
            CueKind::Tone => "tone",
            CueKind::Voice => "voice",
        };
        match self.source {
            CueSource::Segment(i) => format!("{kind}_{}", i + 1),
            CueSource::Halfway => format!("halfway_{kind}"),
        }
    }

    /// Compositing order key.
    pub fn order_key(&self) -> (u64, CueSource, CueKind) {
        (self.start_offset_ms, self.source, self.kind)
    }
}

/// A synthesized cue ready for compositing.
#[derive(Debug, Clone)]
pub struct Cue {
    /// Tone or voice.
    pub kind: CueKind,
    /// Originating segment, or the halfway marker.
    pub source: CueSource,
    /// Absolute start in milliseconds.
    pub start_offset_ms: u64,
    /// Synthesized audio.
    pub audio: Arc<AudioClip>,
}

impl Cue {
    /// Attach audio to a planned cue.
    pub fn from_plan(plan: &PlannedCue, audio: Arc<AudioClip>) -> Self {
        Self {
            kind: plan.kind,
            source: plan.source,
            start_offset_ms: plan.start_offset_ms,
            audio,
        }
    }

    /// Compositing order key: offset, then source, then tone before voice.
    pub fn order_key(&self) -> (u64, CueSource, CueKind) {
        (self.start_offset_ms, self.source, self.kind)
    }
}

/// Lay out every cue for `schedule`.
///
/// Returns one voice and one tone cue per segment followed by the halfway
/// voice and tone, in schedule order (not yet sorted by offset).
pub fn plan_cues(schedule: &Schedule, tones: &ToneSource, halfway_text: &str) -> Vec<PlannedCue> {
    let mut plan = Vec::with_capacity(schedule.len() * 2 + 2);

    let starts = schedule.segment_starts_ms();
    for (i, (seg, start_ms)) in schedule.segments().iter().zip(starts).enumerate() {
        let source = CueSource::Segment(i);
        plan.push(PlannedCue {
            kind: CueKind::Voice,
            source,
            start_offset_ms: start_ms,
            content: CueContent::Speech(seg.spoken_text()),
        });
        plan.push(PlannedCue {
            kind: CueKind::Tone,
            source,
            start_offset_ms: start_ms,
            content: tone_content(tones, Some(seg)),
        });
    }

    let halfway_ms = schedule.halfway_point_seconds() * 1000;
    plan.push(PlannedCue {
        kind: CueKind::Voice,
        source: CueSource::Halfway,
        start_offset_ms: halfway_ms,
        content: CueContent::Speech(halfway_text.to_string()),
    });
    plan.push(PlannedCue {
        kind: CueKind::Tone,
        source: CueSource::Halfway,
        start_offset_ms: halfway_ms,
        content: tone_content(tones, None),
    });

    plan
}

fn tone_content(tones: &ToneSource, seg: Option<&Segment>) -> CueContent {
    match (tones, seg) {
        (ToneSource::Asset(_), _) => CueContent::Beep,
        (ToneSource::Table(table), Some(seg)) => CueContent::Tone(table.request_for(&seg.phase)),
        (ToneSource::Table(table), None) => CueContent::Tone(table.default_request()),
    }
}
