//! Bring-up test vectors.
//!
//! The core was first validated with an 8-point complex tone
//! `x[n] = e^{-2πj·(f/fs)·n}` for `n = 1..=8`, `f = 16 MHz`, `fs = 128 MHz`,
//! quantised to signed 16-bit with binary point 8 (round to nearest).
//!
//! ```text
//! n  value              word
//! 1  0.707 − 0.707j     0x00B5FF4B
//! 2  0     − 1j         0x0000FF00
//! 3 −0.707 − 0.707j     0xFF4BFF4B
//! 4 −1     + 0j         0xFF000000
//! 5 −0.707 + 0.707j     0xFF4B00B5
//! 6  0     + 1j         0x00000100
//! 7  0.707 + 0.707j     0x00B500B5
//! 8  1     + 0j         0x01000000
//! ```

/// Packed input words of the bring-up run, in write order.
pub const BRINGUP_POINTS: [u32; 8] = [
    0x00B5_FF4B,
    0x0000_FF00,
    0xFF4B_FF4B,
    0xFF00_0000,
    0xFF4B_00B5,
    0x0000_0100,
    0x00B5_00B5,
    0x0100_0000,
];

/// Tone frequency of the bring-up vectors (Hz).
pub const TONE_FREQ_HZ: f64 = 16.0e6;

/// Sample rate of the bring-up vectors (Hz).
pub const SAMPLE_RATE_HZ: f64 = 128.0e6;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{decode_raw, WireWord};

    #[test]
    fn points_have_unit_magnitude_in_q8() {
        for bits in BRINGUP_POINTS {
            let s = decode_raw(WireWord::from_bits(bits));
            let mag2 = i32::from(s.re).pow(2) + i32::from(s.im).pow(2);
            // 181² + 181² = 65522, 256² = 65536
            assert!((65_000..=65_536).contains(&mag2), "{bits:#010x}");
        }
    }
}
