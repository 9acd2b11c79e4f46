//! Volatile access at identity-mapped physical addresses
//!
//! For bare-metal targets where the lanes sit directly in the address space
//! (the bring-up board maps them at `0x2000`). No mapping step, no bounds:
//! the constructor's safety contract carries the whole burden.

use crate::backend::{BackendType, RegisterAccess};
use fftacc_chip::Address;

/// Direct physical register access
#[derive(Debug)]
pub struct DirectRegisters {
    _private: (),
}

impl DirectRegisters {
    /// Create a direct accessor
    ///
    /// # Safety
    ///
    /// Every address later passed to this backend must be a 4-byte aligned
    /// device register that is mapped, uncached and valid for 32-bit volatile
    /// access for as long as the backend lives, and nothing else in the
    /// program may access those registers concurrently.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterAccess for DirectRegisters {
    fn write_word(&mut self, address: Address, value: u32) {
        tracing::trace!("Write {address} = {value:#010x}");
        // SAFETY: guaranteed by the contract of DirectRegisters::new.
        unsafe { (address.value() as *mut u32).write_volatile(value) }
    }

    fn read_word(&mut self, address: Address) -> u32 {
        // SAFETY: guaranteed by the contract of DirectRegisters::new.
        let value = unsafe { (address.value() as *const u32).read_volatile() };
        tracing::trace!("Read {address} = {value:#010x}");
        value
    }

    fn backend_type(&self) -> BackendType {
        BackendType::Direct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volatile_access_to_owned_word() {
        let mut cell: u32 = 0;
        let address = Address::new(std::ptr::addr_of_mut!(cell) as usize);
        // SAFETY: `cell` is a live, aligned u32 on this stack frame.
        let mut regs = unsafe { DirectRegisters::new() };
        regs.write_word(address, 0x00B5_FF4B);
        assert_eq!(regs.read_word(address), 0x00B5_FF4B);
        assert_eq!(regs.backend_type(), BackendType::Direct);
    }
}
