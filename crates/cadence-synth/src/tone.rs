//! In-process beep pattern rendering.

use cadence_core::{
    AudioClip, SynthContext, SynthesisError, ToneRequest, ToneSynthesizer, db_to_linear,
    secs_to_samples,
};

use crate::oscillator::Oscillator;

/// Fade applied to both ends of each beep to avoid clicks, in seconds.
const EDGE_FADE_SECS: f32 = 0.005;

/// Renders [`ToneRequest`]s with a sine [`Oscillator`].
///
/// Output: `repeat_count` beeps of `duration_secs` each at `gain_db`,
/// separated by `gap_secs` of silence. No trailing gap.
#[derive(Debug, Clone, Copy, Default)]
pub struct SineToneSynth;

impl SineToneSynth {
    /// Render a request at `sample_rate`.
    pub fn render(&self, request: &ToneRequest, sample_rate: u32) -> AudioClip {
        let beep_len = secs_to_samples(request.duration_secs, sample_rate);
        let gap_len = secs_to_samples(request.gap_secs, sample_rate);
        let fade_len = secs_to_samples(EDGE_FADE_SECS, sample_rate).min(beep_len / 2);
        let gain = db_to_linear(request.gain_db);
        let repeats = request.repeat_count as usize;

        let mut osc = Oscillator::new(sample_rate as f32);
        osc.set_frequency(request.frequency_hz);
        osc.set_waveform(request.waveform.into());

        let total = repeats * beep_len + repeats.saturating_sub(1) * gap_len;
        let mut samples = Vec::with_capacity(total);
        for i in 0..repeats {
            if i > 0 {
                samples.resize(samples.len() + gap_len, 0.0);
            }
            osc.reset();
            for n in 0..beep_len {
                let edge = n.min(beep_len - 1 - n);
                let env = if edge < fade_len {
                    edge as f32 / fade_len as f32
                } else {
                    1.0
                };
                samples.push(osc.advance() * gain * env);
            }
        }

        AudioClip::new(samples, sample_rate)
    }
}

impl ToneSynthesizer for SineToneSynth {
    fn synthesize(
        &self,
        request: &ToneRequest,
        ctx: &SynthContext<'_>,
    ) -> Result<AudioClip, SynthesisError> {
        Ok(self.render(request, ctx.sample_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::{Phase, ToneTable};

    #[test]
    fn interval_pattern_has_three_beeps_and_two_gaps() {
        let req = ToneTable::default().request_for(&Phase::Interval);
        let clip = SineToneSynth.render(&req, 10_000);
        // 3 * 0.2s + 2 * 0.1s = 0.8s
        assert_eq!(clip.len(), 8_000);
        assert_eq!(clip.duration_ms(), 800);

        // Gaps are silent.
        assert!(clip.samples()[2_000..3_000].iter().all(|&s| s == 0.0));
        assert!(clip.samples()[5_000..6_000].iter().all(|&s| s == 0.0));
        // Beeps are not.
        assert!(clip.samples()[0..2_000].iter().any(|&s| s != 0.0));
        assert!(clip.samples()[6_000..8_000].iter().any(|&s| s != 0.0));
    }

    #[test]
    fn single_beep_has_no_gap() {
        let req = ToneTable::default().request_for(&Phase::WarmUp);
        let clip = SineToneSynth.render(&req, 10_000);
        assert_eq!(clip.len(), 2_000);
    }

    #[test]
    fn level_respects_gain() {
        let req = ToneTable::default().request_for(&Phase::WarmUp);
        let clip = SineToneSynth.render(&req, 44_100);
        let limit = db_to_linear(-3.0);
        assert!(clip.peak() <= limit + 1e-6);
        assert!(clip.peak() > limit * 0.99);
    }

    #[test]
    fn edges_fade() {
        let req = ToneTable::default().request_for(&Phase::WarmUp);
        let clip = SineToneSynth.render(&req, 44_100);
        assert_eq!(clip.samples()[0], 0.0);
        assert_eq!(*clip.samples().last().unwrap(), 0.0);
    }

    #[test]
    fn zero_repeats_is_empty() {
        let mut req = ToneTable::default().default_request();
        req.repeat_count = 0;
        assert!(SineToneSynth.render(&req, 44_100).is_empty());
    }
}
