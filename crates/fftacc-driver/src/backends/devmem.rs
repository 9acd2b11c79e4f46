//! Physical lane window mapped through `/dev/mem`
//!
//! For a Linux host with the accelerator on its memory bus. The page-aligned
//! window covering the lanes is mapped shared and uncached (`O_SYNC`), and
//! every access is a single volatile 32-bit load or store.

// Register access requires exact pointer casts; lanes are 4-byte aligned.
#![allow(clippy::cast_ptr_alignment)]
#![allow(clippy::cast_possible_wrap)]

use crate::backend::{BackendType, RegisterAccess};
use crate::error::{FftError, Result};
use fftacc_chip::regs::WORD_BYTES;
use fftacc_chip::Address;
use rustix::fs::OFlags;
use rustix::mm::{mmap, munmap, MapFlags, ProtFlags};
use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsFd;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

/// Mapped physical register window
#[derive(Debug)]
pub struct DevMemRegisters {
    ptr: NonNull<u8>,
    len: usize,
    /// Physical address of the first mapped byte
    phys_base: usize,
    _file: File,
    path: PathBuf,
}

impl DevMemRegisters {
    /// Map the physical range `start..end` from `path`
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the range is empty
    /// - the memory device cannot be opened (usually needs root)
    /// - mmap fails
    pub fn map(path: &Path, start: Address, end: Address) -> Result<Self> {
        if end <= start {
            return Err(FftError::invalid_config(format!(
                "empty register window {start}..{end}"
            )));
        }

        let page = rustix::param::page_size();
        let phys_base = start.value() & !(page - 1);
        let len = (end.value() - phys_base).div_ceil(page) * page;

        tracing::debug!("Mapping {}: {phys_base:#x} + {len:#x}", path.display());

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(OFlags::SYNC.bits() as i32)
            .open(path)
            .map_err(|e| {
                FftError::map_failed(format!("Cannot open {}: {e}. Running as root?", path.display()))
            })?;

        // SAFETY: mmap of a device window.
        // Invariants: (1) fd valid, just opened read/write; (2) len non-zero and
        // page-multiple; (3) offset page-aligned; (4) file kept open in self
        // for the lifetime of the mapping; (5) unmapped exactly once in Drop.
        let addr = unsafe {
            mmap(
                std::ptr::null_mut(),
                len,
                ProtFlags::READ | ProtFlags::WRITE,
                MapFlags::SHARED,
                file.as_fd(),
                phys_base as u64,
            )
        }
        .map_err(|e| FftError::map_failed(format!("mmap {phys_base:#x}+{len:#x} failed: {e}")))?;

        let ptr = NonNull::new(addr.cast::<u8>())
            .ok_or_else(|| FftError::map_failed("mmap returned a null mapping"))?;

        tracing::info!(
            "Mapped {phys_base:#x}..{:#x} from {} at {ptr:p}",
            phys_base + len,
            path.display()
        );

        Ok(Self {
            ptr,
            len,
            phys_base,
            _file: file,
            path: path.to_path_buf(),
        })
    }

    /// Physical address of the first mapped byte
    pub const fn phys_base(&self) -> usize {
        self.phys_base
    }

    /// Mapped length in bytes
    pub const fn window_len(&self) -> usize {
        self.len
    }

    /// Whether `address` is an aligned word inside the window
    pub fn contains(&self, address: Address) -> bool {
        self.offset_of(address).is_some()
    }

    fn offset_of(&self, address: Address) -> Option<usize> {
        address
            .value()
            .checked_sub(self.phys_base)
            .filter(|off| off % WORD_BYTES == 0 && off + WORD_BYTES <= self.len)
    }

    /// # Panics
    ///
    /// Panics if `address` is misaligned or outside the mapped window.
    fn word_ptr(&self, address: Address) -> *mut u32 {
        let offset = self
            .offset_of(address)
            .unwrap_or_else(|| panic!("Register {address} outside mapped window"));
        // SAFETY: offset + 4 <= len and offset % 4 == 0, checked above; ptr is
        // page-aligned and valid for len bytes.
        unsafe { self.ptr.as_ptr().add(offset).cast::<u32>() }
    }
}

impl RegisterAccess for DevMemRegisters {
    fn write_word(&mut self, address: Address, value: u32) {
        tracing::trace!("Write {address} = {value:#010x}");
        let ptr = self.word_ptr(address);
        // SAFETY: write_volatile is required, every lane store has a hardware
        // side effect and must not be merged, elided or reordered.
        // Invariants: ptr in bounds and 4-byte aligned (word_ptr).
        unsafe { ptr.write_volatile(value) }
    }

    fn read_word(&mut self, address: Address) -> u32 {
        let ptr = self.word_ptr(address);
        // SAFETY: read_volatile is required, hardware changes lane contents.
        // Invariants: ptr in bounds and 4-byte aligned (word_ptr).
        let value = unsafe { ptr.read_volatile() };
        tracing::trace!("Read {address} = {value:#010x}");
        value
    }

    fn backend_type(&self) -> BackendType {
        BackendType::DevMem
    }
}

impl Drop for DevMemRegisters {
    fn drop(&mut self) {
        tracing::debug!("Unmapping {:#x} from {}", self.phys_base, self.path.display());
        // SAFETY: ptr/len are exactly what mmap returned in map(); Drop runs once.
        unsafe {
            if let Err(e) = munmap(self.ptr.as_ptr().cast(), self.len) {
                tracing::error!("munmap failed during drop: {e}");
            }
        }
    }
}

// SAFETY: DevMemRegisters owns its mapping exclusively. Moving it to another
// thread doesn't invalidate the mapping, and every access needs &mut self.
unsafe impl Send for DevMemRegisters {}
