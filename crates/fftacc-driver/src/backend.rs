//! Register access abstraction
//!
//! Every backend performs exactly one access per call, in call order, with
//! no caching or batching. Reads are side-effecting and not idempotent.

use crate::config::HarnessConfig;
use crate::error::Result;
use fftacc_chip::Address;
use std::fmt::Debug;

/// Ordered, side-effecting access to the accelerator's register space
///
/// Accesses never fail: the register window is assumed mapped and live for
/// the lifetime of the backend. Addresses are expected to come from a
/// validated [`LaneMap`](crate::LaneMap).
pub trait RegisterAccess: Debug + Send {
    /// Store `value` at `address` (one access)
    fn write_word(&mut self, address: Address, value: u32);

    /// Load the value at `address` (one access)
    fn read_word(&mut self, address: Address) -> u32;

    /// Backend type for diagnostics
    fn backend_type(&self) -> BackendType;
}

impl<R: RegisterAccess + ?Sized> RegisterAccess for Box<R> {
    fn write_word(&mut self, address: Address, value: u32) {
        (**self).write_word(address, value);
    }

    fn read_word(&mut self, address: Address) -> u32 {
        (**self).read_word(address)
    }

    fn backend_type(&self) -> BackendType {
        (**self).backend_type()
    }
}

/// Backend type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// Physical window mapped through `/dev/mem`
    DevMem,

    /// Volatile access at identity-mapped physical addresses
    Direct,

    /// In-process software model of the core
    Software,

    /// In-memory recorder with scripted reads
    Recording,
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DevMem => write!(f, "/dev/mem"),
            Self::Direct => write!(f, "Direct"),
            Self::Software => write!(f, "Software (virtual core)"),
            Self::Recording => write!(f, "Recording"),
        }
    }
}

/// Backend selection strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendSelection {
    /// Map the lane window through `/dev/mem`
    DevMem,

    /// Software model of the core, no hardware required
    Software,
}

/// Open the selected backend for `config`
///
/// # Errors
///
/// Returns error if the configuration is invalid or the register window
/// cannot be mapped.
pub fn select_backend(
    selection: BackendSelection,
    config: &HarnessConfig,
) -> Result<Box<dyn RegisterAccess>> {
    use crate::backends::software::SoftwareCore;

    config.validate()?;
    let lanes = config.lane_map()?;
    match selection {
        BackendSelection::Software => {
            tracing::info!("Using software core ({} points)", lanes.size());
            let core = SoftwareCore::new(lanes, config.format()?)
                .with_status_register(config.handshake.status_address());
            Ok(Box::new(core))
        }

        #[cfg(unix)]
        BackendSelection::DevMem => {
            use crate::backends::devmem::DevMemRegisters;

            let (lo, hi) = config.register_window()?;
            let regs = DevMemRegisters::map(&config.devmem_path, lo, hi)?;
            tracing::info!(
                "Using /dev/mem backend for {lo}..{hi} ({:#x} bytes at {:#x})",
                regs.window_len(),
                regs.phys_base()
            );
            Ok(Box::new(regs))
        }

        #[cfg(not(unix))]
        BackendSelection::DevMem => Err(crate::FftError::hardware_error(
            "/dev/mem backend requires a unix host",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Handshake;
    use crate::FftError;

    #[test]
    fn software_selection_runs_without_hardware() {
        let regs = select_backend(BackendSelection::Software, &HarnessConfig::default()).unwrap();
        assert_eq!(regs.backend_type(), BackendType::Software);
    }

    #[test]
    fn misaligned_lanes_are_rejected_before_opening() {
        let config = HarnessConfig::default().with_read_lanes(Address::new(0x2009), 8);
        for selection in [BackendSelection::Software, BackendSelection::DevMem] {
            assert!(matches!(
                select_backend(selection, &config),
                Err(FftError::InvalidConfig { .. })
            ));
        }
    }

    #[cfg(unix)]
    #[test]
    fn distant_status_is_rejected_before_mapping() {
        let config = HarnessConfig::default()
            .with_devmem_path("/nonexistent/fftacc-mem")
            .with_handshake(Handshake::Poll {
                status: Address::new(0x8000_0000),
                ready_mask: 1,
                max_polls: 100,
            });
        assert!(matches!(
            select_backend(BackendSelection::DevMem, &config),
            Err(FftError::InvalidConfig { .. })
        ));

        let nearby = config.with_handshake(Handshake::Poll {
            status: Address::new(0x1FF8),
            ready_mask: 1,
            max_polls: 100,
        });
        assert!(matches!(
            select_backend(BackendSelection::DevMem, &nearby),
            Err(FftError::MapFailed { .. })
        ));
    }
}
