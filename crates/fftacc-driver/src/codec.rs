//! Sample codec: complex samples ⇄ lane words, raw or fixed-point
//!
//! At the 16-bit bring-up width this is exactly [`fftacc_chip::encode`] and
//! [`fftacc_chip::decode_raw`]. Narrower builds carry their components in the
//! low `width` bits of each 16-bit field; those are sign-extended from bit
//! `width - 1` on the way out and range-checked on the way in.

use crate::error::{FftError, Result};
use crate::format::QFormat;
use fftacc_chip::regs::word::REAL_SHIFT;
use fftacc_chip::{ComplexSample, WireWord};
use std::fmt;

/// Codec bound to one fixed-point format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SampleCodec {
    format: QFormat,
}

impl SampleCodec {
    /// Codec for the bring-up build
    pub const BRINGUP: Self = Self {
        format: QFormat::BRINGUP,
    };

    /// Create a codec for `format`
    pub const fn new(format: QFormat) -> Self {
        Self { format }
    }

    /// Fixed-point format in use
    pub const fn format(&self) -> QFormat {
        self.format
    }

    /// Pack a sample into a lane word
    ///
    /// # Errors
    ///
    /// Returns [`FftError::SampleOutOfRange`] if a component does not fit the
    /// configured width. Never fails at 16 bits.
    pub fn encode(&self, sample: ComplexSample) -> Result<WireWord> {
        for value in [sample.re, sample.im] {
            if !self.format.fits(value) {
                return Err(FftError::SampleOutOfRange {
                    value,
                    width: self.format.width(),
                });
            }
        }
        let re = u32::from(self.format.field_bits(sample.re));
        let im = u32::from(self.format.field_bits(sample.im));
        Ok(WireWord::from_bits((re << REAL_SHIFT) | im))
    }

    /// Unpack a lane word into signed components
    pub const fn decode_raw(&self, word: WireWord) -> ComplexSample {
        ComplexSample {
            re: self.format.sign_extend(word.real_field()),
            im: self.format.sign_extend(word.imag_field()),
        }
    }

    /// Unpack a lane word into real values
    pub fn decode_scaled(&self, word: WireWord) -> (f64, f64) {
        let s = self.decode_raw(word);
        (self.format.to_real(s.re), self.format.to_real(s.im))
    }

    /// Nearest representable sample to `re + im·j`
    pub fn quantize(&self, re: f64, im: f64) -> ComplexSample {
        ComplexSample::new(self.format.quantize(re), self.format.quantize(im))
    }

    /// Decode the word read from lane `index`
    pub fn decode_point(&self, index: usize, word: WireWord) -> DecodedPoint {
        let sample = self.decode_raw(word);
        DecodedPoint {
            index,
            word,
            sample,
            re: self.format.to_real(sample.re),
            im: self.format.to_real(sample.im),
        }
    }
}

/// Decode a 16-bit-component lane word at binary point `bp`
///
/// Each signed component `c` becomes `c / 2^bp`: the low `bp` bits are
/// fraction. `0x0000_0100` at bp 8 is `(0.0, 1.0)`; at bp 0 it is
/// `(0.0, 256.0)`.
///
/// # Errors
///
/// Returns [`FftError::InvalidBinaryPoint`] if `bp` is negative or above 16;
/// nothing is decoded in that case.
pub fn decode_scaled(word: WireWord, bp: i32) -> Result<(f64, f64)> {
    let format = QFormat::new(fftacc_chip::regs::IO_WIDTH, bp)?;
    Ok(SampleCodec::new(format).decode_scaled(word))
}

/// One decoded result lane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedPoint {
    /// Read lane index
    pub index: usize,
    /// Word as read from the lane
    pub word: WireWord,
    /// Signed components
    pub sample: ComplexSample,
    /// Real part in fixed-point interpretation
    pub re: f64,
    /// Imaginary part in fixed-point interpretation
    pub im: f64,
}

impl fmt::Display for DecodedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Read {}: {}  R:{:>6} I:{:>6}  ({:+.6} {:+.6}j)",
            self.index, self.word, self.sample.re, self.sample.im, self.re, self.im
        )
    }
}
