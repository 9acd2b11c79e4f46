//! Recording backend
//!
//! Logs every access in issue order and answers reads from per-address
//! scripts. Writes never change what a later read returns, matching a lane
//! interface where input and output registers are distinct.

use crate::backend::{BackendType, RegisterAccess};
use fftacc_chip::Address;
use std::collections::{HashMap, VecDeque};

/// One observed register access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Store of `value` at `address`
    Write {
        /// Target address
        address: Address,
        /// Stored value
        value: u32,
    },
    /// Load from `address` that returned `value`
    Read {
        /// Source address
        address: Address,
        /// Returned value
        value: u32,
    },
}

impl Access {
    /// Address touched by this access
    pub const fn address(&self) -> Address {
        match self {
            Self::Write { address, .. } | Self::Read { address, .. } => *address,
        }
    }

    /// Value stored or returned
    pub const fn value(&self) -> u32 {
        match self {
            Self::Write { value, .. } | Self::Read { value, .. } => *value,
        }
    }

    /// Whether this access was a store
    pub const fn is_write(&self) -> bool {
        matches!(self, Self::Write { .. })
    }
}

/// In-memory register backend that records access order
#[derive(Debug, Default)]
pub struct RecordingRegisters {
    log: Vec<Access>,
    scripted: HashMap<Address, VecDeque<u32>>,
    steady: HashMap<Address, u32>,
}

impl RecordingRegisters {
    /// Empty recorder; unscripted reads return 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue values returned by successive reads of `address`
    #[must_use]
    pub fn with_script(mut self, address: Address, values: impl IntoIterator<Item = u32>) -> Self {
        self.script(address, values);
        self
    }

    /// Queue values returned by successive reads of `address`
    pub fn script(&mut self, address: Address, values: impl IntoIterator<Item = u32>) {
        self.scripted.entry(address).or_default().extend(values);
    }

    /// Value returned by reads of `address` once its script is exhausted
    pub fn set(&mut self, address: Address, value: u32) {
        self.steady.insert(address, value);
    }

    /// Accesses so far, in issue order
    pub fn log(&self) -> &[Access] {
        &self.log
    }

    /// Drain the access log
    pub fn take_log(&mut self) -> Vec<Access> {
        std::mem::take(&mut self.log)
    }

    /// Values written to `address`, in order
    pub fn writes_to(&self, address: Address) -> Vec<u32> {
        self.log
            .iter()
            .filter(|a| a.is_write() && a.address() == address)
            .map(Access::value)
            .collect()
    }

    /// Addresses read, in order
    pub fn reads(&self) -> Vec<Address> {
        self.log
            .iter()
            .filter(|a| !a.is_write())
            .map(Access::address)
            .collect()
    }
}

impl RegisterAccess for RecordingRegisters {
    fn write_word(&mut self, address: Address, value: u32) {
        tracing::trace!("record write {address} = {value:#010x}");
        self.log.push(Access::Write { address, value });
    }

    fn read_word(&mut self, address: Address) -> u32 {
        let value = self
            .scripted
            .get_mut(&address)
            .and_then(VecDeque::pop_front)
            .or_else(|| self.steady.get(&address).copied())
            .unwrap_or(0);
        tracing::trace!("record read {address} = {value:#010x}");
        self.log.push(Access::Read { address, value });
        value
    }

    fn backend_type(&self) -> BackendType {
        BackendType::Recording
    }
}
