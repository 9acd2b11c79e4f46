//! Lane address map
//!
//! The write lane is a single address; read lane `i` lives at
//! `read_base + i * stride`. Indices are checked against the transform size
//! before an address is formed, so an out-of-range lane is never accessed.

use crate::error::{FftError, Result};
use fftacc_chip::regs::{self, Address, WORD_BYTES};

/// Lane addresses of one accelerator instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneMap {
    write_lane: Address,
    read_base: Address,
    stride: usize,
    size: usize,
}

impl LaneMap {
    /// Lane map of the bring-up build (`0x2000`, `0x2008`, stride 8, 8 points)
    pub const BRINGUP: Self = Self {
        write_lane: regs::WRITE_LANE,
        read_base: regs::READ_LANE_BASE,
        stride: regs::READ_LANE_STRIDE,
        size: regs::TRANSFORM_SIZE,
    };

    /// Build and validate a lane map
    ///
    /// # Errors
    ///
    /// Returns [`FftError::InvalidConfig`] if the transform size is zero, an
    /// address or the stride is not word-aligned, the stride is narrower than
    /// one word, or the write lane falls inside the read lane window. Returns
    /// [`FftError::AddressOverflow`] if the last read lane does not fit in the
    /// address space.
    pub fn new(write_lane: Address, read_base: Address, stride: usize, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(FftError::invalid_config("transform size must be non-zero"));
        }
        for (what, address) in [("write lane", write_lane), ("read lane base", read_base)] {
            check_aligned(what, address)?;
        }
        if stride % WORD_BYTES != 0 {
            return Err(FftError::invalid_config(format!(
                "read lane stride {stride} is not a multiple of {WORD_BYTES}"
            )));
        }
        if stride < WORD_BYTES {
            return Err(FftError::invalid_config(format!(
                "read lane stride {stride} is narrower than a {WORD_BYTES}-byte word"
            )));
        }
        let map = Self {
            write_lane,
            read_base,
            stride,
            size,
        };
        let last = map.lane_address(size - 1)?;
        if write_lane >= read_base && write_lane <= last {
            return Err(FftError::invalid_config(format!(
                "write lane {write_lane} overlaps read lanes {read_base}..={last}"
            )));
        }
        Ok(map)
    }

    /// Write lane address
    pub const fn write_lane(&self) -> Address {
        self.write_lane
    }

    /// Read lane base (index 0)
    pub const fn read_base(&self) -> Address {
        self.read_base
    }

    /// Distance between read lanes
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// Transform size N
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Address of read lane `index`
    ///
    /// # Errors
    ///
    /// Returns [`FftError::IndexOutOfRange`] if `index >= N`.
    pub fn read_lane(&self, index: usize) -> Result<Address> {
        if index >= self.size {
            return Err(FftError::IndexOutOfRange {
                index,
                size: self.size,
            });
        }
        self.lane_address(index)
    }

    /// Read lane index served at `address`, if any
    pub fn lane_index(&self, address: Address) -> Option<usize> {
        let offset = address.value().checked_sub(self.read_base.value())?;
        if offset % self.stride != 0 {
            return None;
        }
        let index = offset / self.stride;
        (index < self.size).then_some(index)
    }

    /// All read lane addresses in index order
    pub fn read_lanes(&self) -> impl Iterator<Item = Address> + '_ {
        (0..self.size).filter_map(move |i| self.lane_address(i).ok())
    }

    /// Lowest and one-past-highest byte touched by any lane
    pub fn span(&self) -> (Address, Address) {
        let last = self
            .lane_address(self.size - 1)
            .unwrap_or(self.read_base);
        let lo = self.write_lane.min(self.read_base);
        let hi = self.write_lane.max(last);
        (lo, hi.checked_add(WORD_BYTES).unwrap_or(hi))
    }

    fn lane_address(&self, index: usize) -> Result<Address> {
        index
            .checked_mul(self.stride)
            .and_then(|offset| self.read_base.checked_add(offset))
            .ok_or(FftError::AddressOverflow {
                base: self.read_base.value(),
                index,
                stride: self.stride,
            })
    }
}

/// Reject an address that is not on a word boundary
///
/// # Errors
///
/// Returns [`FftError::InvalidConfig`] naming `what` if `address` is misaligned.
pub fn check_aligned(what: &str, address: Address) -> Result<()> {
    if address.value() % WORD_BYTES == 0 {
        Ok(())
    } else {
        Err(FftError::invalid_config(format!(
            "{what} {address} is not {WORD_BYTES}-byte aligned"
        )))
    }
}

impl Default for LaneMap {
    fn default() -> Self {
        Self::BRINGUP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lane_three_is_0x2020() {
        let map = LaneMap::BRINGUP;
        assert_eq!(map.read_lane(3).unwrap(), Address::new(0x2020));
        assert_eq!(map.read_lane(0).unwrap(), Address::new(0x2008));
        assert_eq!(map.read_lane(7).unwrap(), Address::new(0x2040));
    }

    #[test]
    fn one_past_last_is_rejected() {
        let map = LaneMap::BRINGUP;
        assert!(matches!(
            map.read_lane(8),
            Err(FftError::IndexOutOfRange { index: 8, size: 8 })
        ));
    }

    #[test]
    fn lane_index_inverts_read_lane() {
        let map = LaneMap::BRINGUP;
        for i in 0..map.size() {
            assert_eq!(map.lane_index(map.read_lane(i).unwrap()), Some(i));
        }
        assert_eq!(map.lane_index(Address::new(0x2000)), None);
        assert_eq!(map.lane_index(Address::new(0x200C)), None);
        assert_eq!(map.lane_index(Address::new(0x2048)), None);
    }

    #[test]
    fn span_covers_every_lane() {
        let (lo, hi) = LaneMap::BRINGUP.span();
        assert_eq!(lo, Address::new(0x2000));
        assert_eq!(hi, Address::new(0x2044));
        assert_eq!(LaneMap::BRINGUP.read_lanes().count(), 8);
    }

    #[test]
    fn rejects_inconsistent_maps() {
        let w = Address::new(0x2000);
        assert!(LaneMap::new(w, Address::new(0x2008), 8, 0).is_err());
        assert!(LaneMap::new(w, Address::new(0x2008), 2, 8).is_err());
        assert!(LaneMap::new(Address::new(0x2010), Address::new(0x2008), 8, 8).is_err());
        assert!(matches!(
            LaneMap::new(w, Address::new(usize::MAX - 11), 8, 4),
            Err(FftError::AddressOverflow { .. })
        ));
    }

    #[test]
    fn misaligned_lanes_are_rejected() {
        let w = Address::new(0x2000);
        for (write, base, stride) in [
            (w, Address::new(0x2009), 8),
            (w, Address::new(0x2008), 6),
            (Address::new(0x2002), Address::new(0x2008), 8),
            (w, Address::new(0x2009), 6),
        ] {
            assert!(
                matches!(
                    LaneMap::new(write, base, stride, 8),
                    Err(FftError::InvalidConfig { .. })
                ),
                "{write} {base} {stride}"
            );
        }
        assert!(LaneMap::new(w, Address::new(0x200C), 12, 8).is_ok());
    }
}
