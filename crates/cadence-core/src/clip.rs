//! Mono audio buffer used for every asset in the mix.

use crate::math::{db_to_linear, ms_to_samples, samples_to_ms};

/// A mono buffer of `f32` samples at a fixed sample rate.
///
/// Cues, the base track and the final mix all share this representation.
/// Collaborators hand back `AudioClip`s already normalized to the run's
/// sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioClip {
    /// Wrap existing samples.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Silence lasting exactly `duration_ms` (rounded down to whole samples).
    pub fn silence(duration_ms: u64, sample_rate: u32) -> Self {
        Self::new(vec![0.0; ms_to_samples(duration_ms, sample_rate)], sample_rate)
    }

    /// Sample data.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the clip holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length in whole milliseconds.
    pub fn duration_ms(&self) -> u64 {
        samples_to_ms(self.samples.len(), self.sample_rate)
    }

    /// Scale every sample by `gain_db` decibels.
    pub fn apply_gain_db(&mut self, gain_db: f32) {
        let gain = db_to_linear(gain_db);
        for s in &mut self.samples {
            *s *= gain;
        }
    }

    /// Append a copy of the clip to itself until it covers at least
    /// `min_ms` milliseconds.
    ///
    /// Each pass doubles the length, so the result can overshoot the target
    /// by up to a factor of two. Joins are not crossfaded. An empty clip is
    /// left untouched.
    pub fn extend_by_doubling(&mut self, min_ms: u64) {
        if self.samples.is_empty() {
            return;
        }
        let target = ms_to_samples(min_ms, self.sample_rate);
        while self.samples.len() < target {
            self.samples.extend_from_within(..);
        }
    }

    /// Sum `other` into this clip starting at `offset_ms`, saturating at
    /// full scale.
    ///
    /// The clip's length never changes: any part of `other` that would land
    /// past the end is dropped. Returns the number of dropped samples.
    pub fn overlay(&mut self, other: &AudioClip, offset_ms: u64) -> usize {
        let start = ms_to_samples(offset_ms, self.sample_rate);
        if start >= self.samples.len() {
            return other.samples.len();
        }
        let room = self.samples.len() - start;
        let fits = other.samples.len().min(room);
        for (dst, src) in self.samples[start..start + fits]
            .iter_mut()
            .zip(&other.samples[..fits])
        {
            *dst = (*dst + *src).clamp(-1.0, 1.0);
        }
        other.samples.len() - fits
    }

    /// Peak absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples.iter().map(|s| s.abs()).fold(0.0, f32::max)
    }
}
