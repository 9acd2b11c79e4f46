//! Harness configuration
//!
//! Lane addresses, transform size and the fixed-point format are agreed with
//! the accelerator build out-of-band. They are passed in explicitly so that
//! several accelerator instances (or test doubles) can coexist.

use crate::codec::SampleCodec;
use crate::error::{FftError, Result};
use crate::format::QFormat;
use crate::lanes::{check_aligned, LaneMap};
use fftacc_chip::regs::{self, Address};
use std::path::PathBuf;
use tracing::debug;

/// Default physical memory device for the `/dev/mem` backend
pub const DEFAULT_DEVMEM_PATH: &str = "/dev/mem";

/// Furthest a status register may sit from the lane window
pub const STATUS_REACH: usize = 0x1000;

/// Completion signalling between the write and read phases
///
/// The bring-up build has no status register: results are read directly after
/// the last write. Builds that expose one can ask the session to poll it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Handshake {
    /// Read results immediately after the write phase
    #[default]
    None,

    /// Poll `status` until `value & ready_mask != 0`
    Poll {
        /// Status register address
        status: Address,
        /// Bits that signal results are ready
        ready_mask: u32,
        /// Reads issued before giving up
        max_polls: u32,
    },
}

impl Handshake {
    /// Status register address, if polling is configured
    pub const fn status_address(&self) -> Option<Address> {
        match self {
            Self::None => None,
            Self::Poll { status, .. } => Some(*status),
        }
    }
}

/// Full configuration of one harness run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Transform size N
    pub points: usize,
    /// Binary point position
    pub bp: i32,
    /// Component width in bits
    pub width: u32,
    /// Write lane address
    pub write_lane: Address,
    /// Read lane for index 0
    pub read_base: Address,
    /// Distance between read lanes
    pub stride: usize,
    /// Write/read phase handshake
    pub handshake: Handshake,
    /// Memory device used by the `/dev/mem` backend
    pub devmem_path: PathBuf,
}

impl Default for HarnessConfig {
    #[allow(clippy::cast_possible_wrap)]
    fn default() -> Self {
        Self {
            points: regs::TRANSFORM_SIZE,
            bp: regs::BINARY_POINT as i32,
            width: regs::IO_WIDTH,
            write_lane: regs::WRITE_LANE,
            read_base: regs::READ_LANE_BASE,
            stride: regs::READ_LANE_STRIDE,
            handshake: Handshake::None,
            devmem_path: PathBuf::from(DEFAULT_DEVMEM_PATH),
        }
    }
}

impl HarnessConfig {
    /// Set the transform size
    #[must_use]
    pub fn with_points(mut self, points: usize) -> Self {
        self.points = points;
        self
    }

    /// Set the binary point
    #[must_use]
    pub fn with_binary_point(mut self, bp: i32) -> Self {
        self.bp = bp;
        self
    }

    /// Set the component width
    #[must_use]
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Set the write lane address
    #[must_use]
    pub fn with_write_lane(mut self, write_lane: Address) -> Self {
        self.write_lane = write_lane;
        self
    }

    /// Set the read lane base and stride
    #[must_use]
    pub fn with_read_lanes(mut self, base: Address, stride: usize) -> Self {
        self.read_base = base;
        self.stride = stride;
        self
    }

    /// Set the completion handshake
    #[must_use]
    pub fn with_handshake(mut self, handshake: Handshake) -> Self {
        self.handshake = handshake;
        self
    }

    /// Set the memory device path
    #[must_use]
    pub fn with_devmem_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.devmem_path = path.into();
        self
    }

    /// Validated lane map
    ///
    /// # Errors
    ///
    /// Returns error if the lane layout is inconsistent (see [`LaneMap::new`]).
    pub fn lane_map(&self) -> Result<LaneMap> {
        LaneMap::new(self.write_lane, self.read_base, self.stride, self.points)
    }

    /// Validated fixed-point format
    ///
    /// # Errors
    ///
    /// Returns error if width or binary point are out of range.
    pub fn format(&self) -> Result<QFormat> {
        QFormat::new(self.width, self.bp)
    }

    /// Codec for the configured format
    ///
    /// # Errors
    ///
    /// Returns error if width or binary point are out of range.
    pub fn codec(&self) -> Result<SampleCodec> {
        self.format().map(SampleCodec::new)
    }

    /// Check the whole configuration
    ///
    /// # Errors
    ///
    /// Returns the first problem found: lane layout, fixed-point format, or a
    /// handshake that polls zero times or collides with a lane.
    pub fn validate(&self) -> Result<()> {
        let lanes = self.lane_map()?;
        let format = self.format()?;

        if let Handshake::Poll {
            status, max_polls, ready_mask,
        } = self.handshake
        {
            if max_polls == 0 || ready_mask == 0 {
                return Err(FftError::invalid_config(
                    "handshake needs a non-zero ready mask and poll budget",
                ));
            }
            check_aligned("status register", status)?;
            if status == lanes.write_lane() || lanes.lane_index(status).is_some() {
                return Err(FftError::invalid_config(format!(
                    "status register {status} collides with a lane"
                )));
            }
        }

        debug!(
            "Harness config: {} points, {format}, write {}, read {}+{}·i",
            lanes.size(),
            lanes.write_lane(),
            lanes.read_base(),
            lanes.stride()
        );
        Ok(())
    }

    /// Byte range a mapped backend must cover: every lane plus the status
    /// register, as `(lo, one past hi)`
    ///
    /// # Errors
    ///
    /// Returns [`FftError::InvalidConfig`] if the status register lies more
    /// than [`STATUS_REACH`] bytes outside the lane window, or any error from
    /// [`lane_map`](Self::lane_map).
    pub fn register_window(&self) -> Result<(Address, Address)> {
        let (lo, hi) = self.lane_map()?.span();
        let Some(status) = self.handshake.status_address() else {
            return Ok((lo, hi));
        };
        let end = status
            .checked_add(regs::WORD_BYTES)
            .filter(|end| {
                let gap = if status < lo {
                    lo.value() - status.value()
                } else {
                    end.value().saturating_sub(hi.value())
                };
                gap <= STATUS_REACH
            })
            .ok_or_else(|| {
                FftError::invalid_config(format!(
                    "status register {status} is more than {STATUS_REACH:#x} bytes from lanes {lo}..{hi}"
                ))
            })?;
        Ok((lo.min(status), hi.max(end)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_bringup_build() {
        let c = HarnessConfig::default();
        c.validate().unwrap();
        assert_eq!(c.lane_map().unwrap(), LaneMap::BRINGUP);
        assert_eq!(c.format().unwrap(), QFormat::BRINGUP);
        assert_eq!(c.devmem_path, PathBuf::from("/dev/mem"));
    }

    #[test]
    fn builder_overrides() {
        let c = HarnessConfig::default()
            .with_points(16)
            .with_binary_point(12)
            .with_read_lanes(Address::new(0x3000), 4);
        let lanes = c.lane_map().unwrap();
        assert_eq!(lanes.size(), 16);
        assert_eq!(lanes.read_lane(15).unwrap(), Address::new(0x303C));
        assert_eq!(c.format().unwrap().bp(), 12);
    }

    #[test]
    fn invalid_binary_point_fails_validation() {
        let c = HarnessConfig::default().with_binary_point(-1);
        assert!(matches!(c.validate(), Err(FftError::InvalidBinaryPoint { .. })));
    }

    #[test]
    fn handshake_must_not_alias_a_lane() {
        let c = HarnessConfig::default().with_handshake(Handshake::Poll {
            status: Address::new(0x2010),
            ready_mask: 1,
            max_polls: 100,
        });
        assert!(matches!(c.validate(), Err(FftError::InvalidConfig { .. })));

        let ok = c.with_handshake(Handshake::Poll {
            status: Address::new(0x1FF8),
            ready_mask: 1,
            max_polls: 100,
        });
        ok.validate().unwrap();
        assert_eq!(ok.handshake.status_address(), Some(Address::new(0x1FF8)));
    }

    #[test]
    fn handshake_needs_a_poll_budget() {
        let c = HarnessConfig::default().with_handshake(Handshake::Poll {
            status: Address::new(0x1FF8),
            ready_mask: 1,
            max_polls: 0,
        });
        assert!(c.validate().is_err());
    }

    #[test]
    fn misaligned_addresses_fail_validation() {
        let c = HarnessConfig::default().with_handshake(Handshake::Poll {
            status: Address::new(0x1FFA),
            ready_mask: 1,
            max_polls: 100,
        });
        assert!(matches!(c.validate(), Err(FftError::InvalidConfig { .. })));

        let c = HarnessConfig::default().with_read_lanes(Address::new(0x2009), 6);
        assert!(matches!(c.validate(), Err(FftError::InvalidConfig { .. })));
    }

    #[test]
    fn register_window_includes_a_nearby_status() {
        let c = HarnessConfig::default();
        assert_eq!(
            c.register_window().unwrap(),
            (Address::new(0x2000), Address::new(0x2044))
        );

        let below = c.clone().with_handshake(Handshake::Poll {
            status: Address::new(0x1FF8),
            ready_mask: 1,
            max_polls: 100,
        });
        assert_eq!(
            below.register_window().unwrap(),
            (Address::new(0x1FF8), Address::new(0x2044))
        );

        let above = c.with_handshake(Handshake::Poll {
            status: Address::new(0x2100),
            ready_mask: 1,
            max_polls: 100,
        });
        assert_eq!(
            above.register_window().unwrap(),
            (Address::new(0x2000), Address::new(0x2104))
        );
    }

    #[test]
    fn register_window_rejects_a_distant_status() {
        for status in [0x8000_0000, 0x0, 0x3048] {
            let c = HarnessConfig::default().with_handshake(Handshake::Poll {
                status: Address::new(status),
                ready_mask: 1,
                max_polls: 100,
            });
            c.validate().unwrap();
            assert!(
                matches!(c.register_window(), Err(FftError::InvalidConfig { .. })),
                "{status:#x}"
            );
        }
    }
}
