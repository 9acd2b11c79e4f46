//! Signed fixed-point (Q-format) interpretation of lane components
//!
//! A component is a `width`-bit two's-complement integer `c` carried in a
//! 16-bit lane field. With binary point `bp`, its real value is `c / 2^bp`:
//! the low `bp` bits are fraction. On the bring-up build (`width = 16`,
//! `bp = 8`) the raw value `0x0100` is `1.0` and `0xFF4B` is `−0.707`.

// Widths are validated to 1..=16 before any cast below.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

use crate::error::{FftError, Result};
use fftacc_chip::regs::word::FIELD_BITS;
use fftacc_chip::regs::{BINARY_POINT, IO_WIDTH};
use std::fmt;

/// Validated component width and binary point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QFormat {
    width: u32,
    bp: u32,
}

impl QFormat {
    /// Format of the bring-up accelerator build (16-bit IO, binary point 8)
    pub const BRINGUP: Self = Self {
        width: IO_WIDTH,
        bp: BINARY_POINT,
    };

    /// Validate a width / binary point pair
    ///
    /// # Errors
    ///
    /// Returns [`FftError::InvalidWidth`] if `width` is not in `1..=16`, and
    /// [`FftError::InvalidBinaryPoint`] if `bp` is negative or exceeds `width`.
    pub fn new(width: u32, bp: i32) -> Result<Self> {
        if width == 0 || width > FIELD_BITS {
            return Err(FftError::InvalidWidth { width });
        }
        let bp = u32::try_from(bp)
            .ok()
            .filter(|b| *b <= width)
            .ok_or(FftError::InvalidBinaryPoint { bp, width })?;
        Ok(Self { width, bp })
    }

    /// Component width in bits
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Binary point position
    pub const fn bp(&self) -> u32 {
        self.bp
    }

    /// `2^bp`
    pub fn scale(&self) -> f64 {
        f64::from(1u32 << self.bp)
    }

    /// Smallest representable raw component
    pub const fn min_raw(&self) -> i16 {
        (-(1i32 << (self.width - 1))) as i16
    }

    /// Largest representable raw component
    pub const fn max_raw(&self) -> i16 {
        ((1i32 << (self.width - 1)) - 1) as i16
    }

    /// Whether `value` is representable in this width
    pub const fn fits(&self, value: i16) -> bool {
        value >= self.min_raw() && value <= self.max_raw()
    }

    /// Real value of a raw component
    pub fn to_real(&self, raw: i16) -> f64 {
        f64::from(raw) / self.scale()
    }

    /// Raw component nearest to `value`, saturating at the width limits
    ///
    /// Rounds half away from zero. NaN quantises to zero.
    pub fn quantize(&self, value: f64) -> i16 {
        if value.is_nan() {
            return 0;
        }
        let scaled = (value * self.scale()).round();
        scaled.clamp(f64::from(self.min_raw()), f64::from(self.max_raw())) as i16
    }

    /// Interpret the low `width` bits of a lane field as a signed component
    pub const fn sign_extend(&self, field: u16) -> i16 {
        let shift = FIELD_BITS - self.width;
        ((field << shift) as i16) >> shift
    }

    /// Lane field bits of a raw component (upper bits cleared below 16-bit widths)
    pub const fn field_bits(&self, raw: i16) -> u16 {
        let mask = (((1u32 << self.width) - 1) & 0xFFFF) as u16;
        (raw as u16) & mask
    }
}

impl Default for QFormat {
    fn default() -> Self {
        Self::BRINGUP
    }
}

impl fmt::Display for QFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}.{} ({}-bit)", self.width - self.bp, self.bp, self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bringup_format() {
        let q = QFormat::new(16, 8).unwrap();
        assert_eq!(q, QFormat::BRINGUP);
        assert_eq!(q.min_raw(), i16::MIN);
        assert_eq!(q.max_raw(), i16::MAX);
        assert_eq!(q.to_string(), "Q8.8 (16-bit)");
    }

    #[test]
    fn rejects_bad_binary_point() {
        assert!(matches!(
            QFormat::new(16, -1),
            Err(FftError::InvalidBinaryPoint { bp: -1, width: 16 })
        ));
        assert!(matches!(
            QFormat::new(16, 17),
            Err(FftError::InvalidBinaryPoint { bp: 17, .. })
        ));
        assert!(QFormat::new(16, 16).is_ok());
        assert!(QFormat::new(16, 0).is_ok());
    }

    #[test]
    fn rejects_bad_width() {
        assert!(matches!(QFormat::new(0, 0), Err(FftError::InvalidWidth { width: 0 })));
        assert!(matches!(QFormat::new(17, 8), Err(FftError::InvalidWidth { width: 17 })));
    }

    #[test]
    fn real_values() {
        let q = QFormat::BRINGUP;
        assert!((q.to_real(256) - 1.0).abs() < f64::EPSILON);
        assert!((q.to_real(-181) + 0.707_031_25).abs() < 1e-12);
        assert!((q.to_real(0)).abs() < f64::EPSILON);
    }

    #[test]
    fn quantize_rounds_and_saturates() {
        let q = QFormat::BRINGUP;
        assert_eq!(q.quantize(std::f64::consts::FRAC_1_SQRT_2), 181);
        assert_eq!(q.quantize(-std::f64::consts::FRAC_1_SQRT_2), -181);
        assert_eq!(q.quantize(1.0), 256);
        assert_eq!(q.quantize(-1.2e-16), 0);
        assert_eq!(q.quantize(1.0e6), i16::MAX);
        assert_eq!(q.quantize(-1.0e6), i16::MIN);
        assert_eq!(q.quantize(f64::NAN), 0);
    }

    #[test]
    fn narrow_width_sign_extension() {
        let q = QFormat::new(12, 8).unwrap();
        assert_eq!(q.min_raw(), -2048);
        assert_eq!(q.max_raw(), 2047);
        assert_eq!(q.sign_extend(0x0800), -2048);
        assert_eq!(q.sign_extend(0xF7FF), 2047);
        assert_eq!(q.field_bits(-1), 0x0FFF);
        assert!(!q.fits(2048));
    }
}
