//! Level and time conversions.

use libm::{expf, logf};

/// Convert decibels to linear gain.
///
/// ```rust
/// use cadence_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels. Silence floors at -200 dB.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Number of samples covering `ms` milliseconds, rounded down. Saturates
/// instead of wrapping.
#[inline]
pub fn ms_to_samples(ms: u64, sample_rate: u32) -> usize {
    let samples = ms.saturating_mul(u64::from(sample_rate)) / 1000;
    usize::try_from(samples).unwrap_or(usize::MAX)
}

/// Duration in whole milliseconds of `samples` samples, rounded down.
#[inline]
pub fn samples_to_ms(samples: usize, sample_rate: u32) -> u64 {
    if sample_rate == 0 {
        return 0;
    }
    samples as u64 * 1000 / u64::from(sample_rate)
}

/// Number of samples covering `secs` seconds, rounded to nearest.
#[inline]
pub fn secs_to_samples(secs: f32, sample_rate: u32) -> usize {
    (secs.max(0.0) * sample_rate as f32).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_roundtrip() {
        for db in [-24.0, -4.5, -3.0, 0.0, 6.0] {
            assert!((linear_to_db(db_to_linear(db)) - db).abs() < 1e-3);
        }
    }

    #[test]
    fn whole_seconds_map_exactly() {
        assert_eq!(ms_to_samples(20_000, 44_100), 882_000);
        assert_eq!(samples_to_ms(882_000, 44_100), 20_000);
    }

    #[test]
    fn huge_durations_saturate() {
        assert_eq!(
            ms_to_samples(u64::MAX, 192_000),
            usize::try_from(u64::MAX / 1000).unwrap_or(usize::MAX)
        );
    }

    #[test]
    fn zero_rate_is_zero_length() {
        assert_eq!(samples_to_ms(100, 0), 0);
    }

    #[test]
    fn secs_round_to_nearest() {
        assert_eq!(secs_to_samples(0.2, 44_100), 8_820);
        assert_eq!(secs_to_samples(-1.0, 44_100), 0);
    }
}
