//! Input vector generation
//!
//! Generates the complex tone `x[n] = e^{-2πj·(f/fs)·n}`, `n = 1..=N`, used to
//! bring the core up, quantised with the session's codec. With the default
//! tone and the bring-up format this reproduces
//! [`BRINGUP_POINTS`](fftacc_chip::vectors::BRINGUP_POINTS) bit for bit.

use crate::codec::SampleCodec;
use crate::error::{FftError, Result};
use fftacc_chip::vectors::{BRINGUP_POINTS, SAMPLE_RATE_HZ, TONE_FREQ_HZ};
use fftacc_chip::WireWord;
use std::f64::consts::TAU;

/// Tone parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    /// Tone frequency (Hz)
    pub freq_hz: f64,
    /// Sample rate (Hz)
    pub sample_rate_hz: f64,
}

impl Default for ToneSpec {
    fn default() -> Self {
        Self {
            freq_hz: TONE_FREQ_HZ,
            sample_rate_hz: SAMPLE_RATE_HZ,
        }
    }
}

impl ToneSpec {
    /// Unquantised tone samples for `n = 1..=points`
    ///
    /// # Errors
    ///
    /// Returns [`FftError::InvalidConfig`] unless both frequencies are finite
    /// and the sample rate is positive.
    #[allow(clippy::cast_precision_loss)]
    pub fn samples(&self, points: usize) -> Result<Vec<(f64, f64)>> {
        if !(self.freq_hz.is_finite() && self.sample_rate_hz.is_finite())
            || self.sample_rate_hz <= 0.0
        {
            return Err(FftError::invalid_config(format!(
                "tone {} Hz at {} Hz sample rate",
                self.freq_hz, self.sample_rate_hz
            )));
        }
        let step = -TAU * self.freq_hz / self.sample_rate_hz;
        Ok((1..=points)
            .map(|n| {
                let (sin, cos) = (step * n as f64).sin_cos();
                (cos, sin)
            })
            .collect())
    }

    /// Tone samples quantised and packed by `codec`
    ///
    /// # Errors
    ///
    /// As [`samples`](Self::samples).
    pub fn words(&self, points: usize, codec: &SampleCodec) -> Result<Vec<WireWord>> {
        self.samples(points)?
            .into_iter()
            .map(|(re, im)| codec.encode(codec.quantize(re, im)))
            .collect()
    }
}

/// Bring-up input words as [`WireWord`]s
pub fn bringup_words() -> Vec<WireWord> {
    BRINGUP_POINTS.iter().copied().map(WireWord::from_bits).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::QFormat;

    #[test]
    fn default_tone_reproduces_bringup_table() {
        let words = ToneSpec::default().words(8, &SampleCodec::BRINGUP).unwrap();
        assert_eq!(words, bringup_words());
    }

    #[test]
    fn tone_has_unit_magnitude() {
        for (re, im) in ToneSpec::default().samples(32).unwrap() {
            assert!((re.hypot(im) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn finer_binary_point() {
        let codec = SampleCodec::new(QFormat::new(16, 14).unwrap());
        let words = ToneSpec::default().words(8, &codec).unwrap();
        // 1.0 at bp 14
        assert_eq!(words[7].bits(), 0x4000_0000);
        // 0.70710678 · 16384 = 11585.2
        assert_eq!(words[0].decode_raw().re, 11585);
    }

    #[test]
    fn rejects_degenerate_tone() {
        let bad = ToneSpec { freq_hz: 1.0, sample_rate_hz: 0.0 };
        assert!(bad.samples(8).is_err());
        let nan = ToneSpec { freq_hz: f64::NAN, sample_rate_hz: 1.0 };
        assert!(nan.samples(8).is_err());
    }
}
