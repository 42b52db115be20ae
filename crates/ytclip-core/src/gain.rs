//! Decibel gain adjustment

use crate::audio::AudioBuffer;
use crate::error::GainError;
use tracing::info;

/// Convert decibels to a linear amplitude factor
#[inline]
pub fn db_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Return `buffer` shifted by `decibels` over its whole length.
///
/// Shifts accumulate additively, so the order of repeated calls does not
/// matter. No clamping or normalization happens here. A total gain too
/// large to express as an `f32` factor (around +770 dB) is rejected.
pub fn apply_gain(buffer: &AudioBuffer, decibels: f64) -> Result<AudioBuffer, GainError> {
    if !decibels.is_finite() {
        return Err(GainError::NotFinite(decibels));
    }

    let total = buffer.gain_db() + decibels;
    // Samples are scaled as f32; an infinite factor would turn silence into NaN.
    if !(db_to_linear(total) as f32).is_finite() {
        return Err(GainError::OutOfRange(total));
    }
    info!("Adjusting volume by {:+.1} dB (total {:+.1} dB)", decibels, total);
    Ok(buffer.with_gain_db(total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::tests::ramp;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_db_to_linear() {
        assert_abs_diff_eq!(db_to_linear(0.0), 1.0);
        assert_abs_diff_eq!(db_to_linear(20.0), 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(db_to_linear(-6.0206), 0.5, epsilon = 1e-4);
    }

    #[test]
    fn test_gain_scales_whole_buffer() {
        let buffer = ramp(2);
        let louder = apply_gain(&buffer, 6.0).unwrap();

        let factor = db_to_linear(6.0) as f32;
        for (orig, shifted) in buffer.rendered_samples().zip(louder.rendered_samples()) {
            assert_abs_diff_eq!(shifted, orig * factor, epsilon = 1e-6);
        }
        // The original buffer is untouched.
        assert_eq!(buffer.gain_db(), 0.0);
    }

    #[test]
    fn test_gain_is_order_independent() {
        let buffer = ramp(1);
        let a = apply_gain(&apply_gain(&buffer, 3.5).unwrap(), -10.0).unwrap();
        let b = apply_gain(&apply_gain(&buffer, -10.0).unwrap(), 3.5).unwrap();
        assert_eq!(a.gain_db(), b.gain_db());
        assert!(a.rendered_samples().eq(b.rendered_samples()));
    }

    #[test]
    fn test_rejects_non_finite_gain() {
        let buffer = ramp(1);
        assert_eq!(apply_gain(&buffer, f64::NAN).unwrap_err().to_string(), "Invalid gain value: NaN dB");
        assert!(apply_gain(&buffer, f64::INFINITY).is_err());
    }

    #[test]
    fn test_rejects_gain_beyond_f32_range() {
        let buffer = ramp(1);
        assert!(matches!(apply_gain(&buffer, 800.0), Err(GainError::OutOfRange(_))));

        // Steps that are fine alone still fail once the total overflows.
        let loud = apply_gain(&buffer, 500.0).unwrap();
        assert!(matches!(apply_gain(&loud, 300.0), Err(GainError::OutOfRange(_))));
        assert_eq!(loud.gain_db(), 500.0);

        let quiet = apply_gain(&buffer, -2000.0).unwrap();
        assert!(quiet.rendered_samples().all(|s| s == 0.0));
    }
}
