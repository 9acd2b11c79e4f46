//! Lane register map for the FFT accelerator.
//!
//! The core exposes one write lane and a bank of read lanes. Every write to
//! the write lane is taken as the next input sample; the core keeps the input
//! index internally. Result `i` is read back from its own lane.
//!
//! ```text
//! 0x2000           write lane   one u32 per input sample
//! 0x2008 + 8·i     read lane i  one u32 result per output index
//! ```
//!
//! These values match the accelerator build the harness was brought up on
//! (8 points, 16-bit IO, binary point 8). Other builds pass their own values
//! through the driver's configuration; nothing in the driver reads these
//! constants implicitly.

use std::fmt;

/// A register location in the accelerator's address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(usize);

impl Address {
    /// Wrap a raw address.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Raw address value.
    #[must_use]
    pub const fn value(self) -> usize {
        self.0
    }

    /// Address `bytes` past this one, or `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, bytes: usize) -> Option<Self> {
        match self.0.checked_add(bytes) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl From<usize> for Address {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

// ── Lanes ────────────────────────────────────────────────────────────────────

/// Write lane. Shared by all input samples.
pub const WRITE_LANE: Address = Address::new(0x2000);

/// Read lane for index 0.
pub const READ_LANE_BASE: Address = Address::new(0x2008);

/// Address distance between consecutive read lanes.
pub const READ_LANE_STRIDE: usize = 8;

/// Bytes moved per lane access.
pub const WORD_BYTES: usize = 4;

// ── Build configuration ──────────────────────────────────────────────────────

/// Transform size of the bring-up build.
pub const TRANSFORM_SIZE: usize = 8;

/// Component width in bits (`IOWidth` of the core).
pub const IO_WIDTH: u32 = 16;

/// Binary point position (`BP` of the core).
pub const BINARY_POINT: u32 = 8;

// ── Wire word layout ─────────────────────────────────────────────────────────

/// Field layout of the 32-bit lane word.
pub mod word {
    /// Bits per component field.
    pub const FIELD_BITS: u32 = 16;
    /// Shift of the real field (bits [31:16]).
    pub const REAL_SHIFT: u32 = 16;
    /// Mask of a single field once shifted down.
    pub const FIELD_MASK: u32 = 0xFFFF;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lanes_do_not_overlap() {
        assert!(WRITE_LANE.value() + WORD_BYTES <= READ_LANE_BASE.value());
        assert!(READ_LANE_STRIDE >= WORD_BYTES);
    }

    #[test]
    fn bring_up_addresses() {
        assert_eq!(WRITE_LANE.value(), 0x2000);
        assert_eq!(READ_LANE_BASE.value(), 0x2008);
        let last = READ_LANE_BASE
            .checked_add((TRANSFORM_SIZE - 1) * READ_LANE_STRIDE)
            .unwrap();
        assert_eq!(last.value(), 0x2040);
    }

    #[test]
    fn address_display_is_hex() {
        assert_eq!(Address::new(0x2020).to_string(), "0x2020");
        assert_eq!(format!("{:x}", Address::new(0x2008)), "2008");
    }

    #[test]
    fn checked_add_overflow() {
        assert_eq!(Address::new(usize::MAX).checked_add(1), None);
    }
}
