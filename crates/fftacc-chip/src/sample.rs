//! Complex sample packing for the lane wire word.
//!
//! ```text
//!  31              16 15               0
//! ┌──────────────────┬──────────────────┐
//! │  real  (i16, 2C) │  imag  (i16, 2C) │
//! └──────────────────┴──────────────────┘
//! ```
//!
//! Both fields are raw two's-complement bit patterns. Unpacking is
//! arithmetic: `0xFF4B` is −181, never 65355.

// Field extraction is a deliberate bit reinterpretation.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

use crate::regs::word::{FIELD_MASK, REAL_SHIFT};
use std::fmt;

/// One point of an input or output sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ComplexSample {
    /// Real component.
    pub re: i16,
    /// Imaginary component.
    pub im: i16,
}

impl ComplexSample {
    /// The origin.
    pub const ZERO: Self = Self { re: 0, im: 0 };

    /// Build a sample from its components.
    #[must_use]
    pub const fn new(re: i16, im: i16) -> Self {
        Self { re, im }
    }

    /// Pack into a lane word.
    #[must_use]
    pub const fn encode(self) -> WireWord {
        encode(self)
    }
}

impl fmt::Display for ComplexSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im < 0 {
            write!(f, "{} - {}j", self.re, -i32::from(self.im))
        } else {
            write!(f, "{} + {}j", self.re, self.im)
        }
    }
}

/// Packed 32-bit lane word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WireWord(u32);

impl WireWord {
    /// Wrap raw register bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw register bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Bits [31:16], uninterpreted.
    #[must_use]
    pub const fn real_field(self) -> u16 {
        (self.0 >> REAL_SHIFT) as u16
    }

    /// Bits [15:0], uninterpreted.
    #[must_use]
    pub const fn imag_field(self) -> u16 {
        (self.0 & FIELD_MASK) as u16
    }

    /// Unpack into signed components.
    #[must_use]
    pub const fn decode_raw(self) -> ComplexSample {
        decode_raw(self)
    }
}

impl fmt::Display for WireWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl fmt::LowerHex for WireWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for WireWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

impl From<u32> for WireWord {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl From<WireWord> for u32 {
    fn from(word: WireWord) -> Self {
        word.0
    }
}

impl From<ComplexSample> for WireWord {
    fn from(sample: ComplexSample) -> Self {
        encode(sample)
    }
}

impl From<WireWord> for ComplexSample {
    fn from(word: WireWord) -> Self {
        decode_raw(word)
    }
}

/// Pack `sample.re` into bits [31:16] and `sample.im` into bits [15:0].
#[must_use]
pub const fn encode(sample: ComplexSample) -> WireWord {
    let re = sample.re as u16 as u32;
    let im = sample.im as u16 as u32;
    WireWord((re << REAL_SHIFT) | im)
}

/// Inverse of [`encode`]. Total and exact for every 32-bit pattern.
#[must_use]
pub const fn decode_raw(word: WireWord) -> ComplexSample {
    ComplexSample {
        re: word.real_field() as i16,
        im: word.imag_field() as i16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_fields_are_signed() {
        let s = decode_raw(WireWord::from_bits(0xFF4B_FF4B));
        assert_eq!(s, ComplexSample::new(-181, -181));
    }

    #[test]
    fn zero_word_is_origin() {
        assert_eq!(decode_raw(WireWord::from_bits(0)), ComplexSample::ZERO);
    }

    #[test]
    fn real_lands_in_upper_half() {
        assert_eq!(encode(ComplexSample::new(256, 0)).bits(), 0x0100_0000);
        assert_eq!(encode(ComplexSample::new(0, 256)).bits(), 0x0000_0100);
        assert_eq!(encode(ComplexSample::new(181, -181)).bits(), 0x00B5_FF4B);
    }

    #[test]
    fn extremes_round_trip() {
        for s in [
            ComplexSample::new(i16::MIN, i16::MAX),
            ComplexSample::new(i16::MAX, i16::MIN),
            ComplexSample::new(-1, -1),
        ] {
            assert_eq!(decode_raw(encode(s)), s);
        }
        assert_eq!(encode(ComplexSample::new(-1, -1)).bits(), u32::MAX);
    }

    #[test]
    fn fields_are_uninterpreted_bits() {
        let w = WireWord::from_bits(0xFF00_00B5);
        assert_eq!(w.real_field(), 0xFF00);
        assert_eq!(w.imag_field(), 0x00B5);
    }

    #[test]
    fn display_forms() {
        assert_eq!(WireWord::from_bits(0x100).to_string(), "0x00000100");
        assert_eq!(ComplexSample::new(181, -181).to_string(), "181 - 181j");
        assert_eq!(ComplexSample::new(0, 256).to_string(), "0 + 256j");
        assert_eq!(ComplexSample::new(0, i16::MIN).to_string(), "0 - 32768j");
    }
}
