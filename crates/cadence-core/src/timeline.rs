//! Timeline compositing.
//!
//! Overlay is additive, but each overlay saturates at full scale, so the
//! order cues are applied in can change the result where they overlap. The
//! [`Timeline`] fixes that order: ascending offset, then schedule order,
//! then tone before voice.

use crate::clip::AudioClip;
use crate::cue::Cue;
use crate::error::{Error, Result};

/// A base track and the cues to mix over it.
#[derive(Debug, Clone)]
pub struct Timeline {
    base: AudioClip,
    cues: Vec<Cue>,
}

impl Timeline {
    /// Check and order the cues for compositing.
    ///
    /// Every cue must start within `[0, total_duration_ms]` and share the
    /// base track's sample rate.
    pub fn new(base: AudioClip, mut cues: Vec<Cue>, total_duration_ms: u64) -> Result<Self> {
        for cue in &cues {
            if cue.start_offset_ms > total_duration_ms {
                return Err(Error::Composite(format!(
                    "{} {:?} cue starts at {} ms, after the workout ends at {} ms",
                    cue.source, cue.kind, cue.start_offset_ms, total_duration_ms
                )));
            }
            if cue.audio.sample_rate() != base.sample_rate() {
                return Err(Error::Composite(format!(
                    "{} {:?} cue is {} Hz but the base track is {} Hz",
                    cue.source,
                    cue.kind,
                    cue.audio.sample_rate(),
                    base.sample_rate()
                )));
            }
        }
        // Stable, so equal keys keep plan order.
        cues.sort_by_key(Cue::order_key);
        Ok(Self { base, cues })
    }

    /// Cues in compositing order.
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    /// Base track the cues are mixed over.
    pub fn base(&self) -> &AudioClip {
        &self.base
    }

    /// Mix every cue into the base track. The result has the base track's
    /// length; cue tails running past the end are dropped.
    pub fn compose(self) -> AudioClip {
        let Self { mut base, cues } = self;
        for cue in &cues {
            let dropped = base.overlay(&cue.audio, cue.start_offset_ms);
            tracing::debug!(
                source = %cue.source,
                kind = ?cue.kind,
                offset_ms = cue.start_offset_ms,
                samples = cue.audio.len(),
                "overlay"
            );
            if dropped > 0 {
                tracing::warn!(
                    source = %cue.source,
                    kind = ?cue.kind,
                    dropped,
                    "cue runs past the end of the base track; tail dropped"
                );
            }
        }
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue::{CueKind, CueSource};
    use std::sync::Arc;

    fn cue(source: CueSource, kind: CueKind, offset_ms: u64, value: f32, len: usize) -> Cue {
        Cue {
            kind,
            source,
            start_offset_ms: offset_ms,
            audio: Arc::new(AudioClip::new(vec![value; len], 1_000)),
        }
    }

    #[test]
    fn orders_by_offset_then_source_then_kind() {
        let base = AudioClip::silence(20, 1_000);
        let cues = vec![
            cue(CueSource::Halfway, CueKind::Voice, 10, 0.1, 1),
            cue(CueSource::Segment(1), CueKind::Voice, 5, 0.1, 1),
            cue(CueSource::Segment(1), CueKind::Tone, 5, 0.1, 1),
            cue(CueSource::Segment(0), CueKind::Voice, 0, 0.1, 1),
            cue(CueSource::Halfway, CueKind::Tone, 10, 0.1, 1),
            cue(CueSource::Segment(0), CueKind::Tone, 0, 0.1, 1),
        ];
        let timeline = Timeline::new(base, cues, 20).unwrap();
        let order: Vec<_> = timeline
            .cues()
            .iter()
            .map(|c| (c.start_offset_ms, c.source, c.kind))
            .collect();
        assert_eq!(
            order,
            vec![
                (0, CueSource::Segment(0), CueKind::Tone),
                (0, CueSource::Segment(0), CueKind::Voice),
                (5, CueSource::Segment(1), CueKind::Tone),
                (5, CueSource::Segment(1), CueKind::Voice),
                (10, CueSource::Halfway, CueKind::Tone),
                (10, CueSource::Halfway, CueKind::Voice),
            ]
        );
    }

    #[test]
    fn compose_keeps_base_length() {
        let base = AudioClip::silence(20, 1_000);
        let cues = vec![
            cue(CueSource::Segment(0), CueKind::Voice, 0, 0.2, 4),
            cue(CueSource::Segment(1), CueKind::Voice, 18, 0.2, 10),
        ];
        let mixed = Timeline::new(base, cues, 20).unwrap().compose();
        assert_eq!(mixed.len(), 20);
        assert!((mixed.samples()[0] - 0.2).abs() < 1e-6);
        assert_eq!(mixed.samples()[4], 0.0);
        assert!((mixed.samples()[19] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn overlapping_cues_sum() {
        let base = AudioClip::silence(10, 1_000);
        let cues = vec![
            cue(CueSource::Segment(0), CueKind::Voice, 0, 0.2, 5),
            cue(CueSource::Segment(0), CueKind::Tone, 0, 0.3, 2),
        ];
        let mixed = Timeline::new(base, cues, 10).unwrap().compose();
        assert!((mixed.samples()[0] - 0.5).abs() < 1e-6);
        assert!((mixed.samples()[3] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn compose_is_reproducible_regardless_of_input_order() {
        let make = |reverse: bool| {
            let mut cues = vec![
                cue(CueSource::Segment(0), CueKind::Tone, 0, 0.9, 4),
                cue(CueSource::Segment(0), CueKind::Voice, 0, -0.6, 4),
                cue(CueSource::Halfway, CueKind::Voice, 0, 0.7, 4),
            ];
            if reverse {
                cues.reverse();
            }
            Timeline::new(AudioClip::silence(8, 1_000), cues, 8)
                .unwrap()
                .compose()
        };
        assert_eq!(make(false), make(true));
    }

    #[test]
    fn cue_after_end_rejected() {
        let base = AudioClip::silence(10, 1_000);
        let cues = vec![cue(CueSource::Segment(0), CueKind::Voice, 11, 0.1, 1)];
        assert!(matches!(
            Timeline::new(base, cues, 10),
            Err(Error::Composite(_))
        ));
    }

    #[test]
    fn sample_rate_mismatch_rejected() {
        let base = AudioClip::silence(10, 8_000);
        let cues = vec![cue(CueSource::Segment(0), CueKind::Voice, 0, 0.1, 1)];
        assert!(matches!(
            Timeline::new(base, cues, 10),
            Err(Error::Composite(_))
        ));
    }
}
