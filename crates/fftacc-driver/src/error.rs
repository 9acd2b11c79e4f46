//! Error types for FFT accelerator operations

use thiserror::Error;

/// Result type alias for accelerator operations
pub type Result<T> = std::result::Result<T, FftError>;

/// Errors that can occur while configuring or driving the accelerator
///
/// Register accesses themselves never fail. Everything here is either a
/// caller-contract violation caught before an access is issued, or a failure
/// to set up the access path.
#[derive(Debug, Error)]
pub enum FftError {
    /// Lane index outside `[0, N)`
    #[error("Lane index {index} out of range (transform size {size})")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Configured transform size
        size: usize,
    },

    /// Binary point negative or wider than the component
    #[error("Invalid binary point {bp} for {width}-bit components")]
    InvalidBinaryPoint {
        /// Requested binary point
        bp: i32,
        /// Component width in bits
        width: u32,
    },

    /// Component width that cannot fit a 16-bit lane field
    #[error("Invalid component width {width} (expected 1..=16)")]
    InvalidWidth {
        /// Requested width
        width: u32,
    },

    /// Sample component that does not fit the configured width
    #[error("Sample component {value} does not fit in {width} signed bits")]
    SampleOutOfRange {
        /// Offending component
        value: i16,
        /// Component width in bits
        width: u32,
    },

    /// Read lane address computation overflowed
    #[error("Read lane address overflow: {base:#x} + {index} * {stride}")]
    AddressOverflow {
        /// Read lane base
        base: usize,
        /// Lane index
        index: usize,
        /// Lane stride
        stride: usize,
    },

    /// Input sequence length does not match the transform size
    #[error("Input sequence has {actual} samples, transform size is {expected}")]
    SequenceLength {
        /// Configured transform size
        expected: usize,
        /// Supplied sample count
        actual: usize,
    },

    /// Inconsistent harness configuration
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Reason for rejection
        reason: String,
    },

    /// Completion status never became ready
    #[error("Completion handshake timed out after {polls} polls")]
    HandshakeTimeout {
        /// Number of status reads issued
        polls: u32,
    },

    /// I/O error while opening the access path
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// Mapping the register window failed
    #[error("Register mapping failed: {reason}")]
    MapFailed {
        /// Reason for failure
        reason: String,
    },

    /// Backend not usable on this host
    #[error("Hardware error: {reason}")]
    HardwareError {
        /// Reason for failure
        reason: String,
    },
}

impl FftError {
    /// Create an invalid configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create a mapping failure error
    pub fn map_failed(reason: impl Into<String>) -> Self {
        Self::MapFailed {
            reason: reason.into(),
        }
    }

    /// Create a hardware error
    pub fn hardware_error(reason: impl Into<String>) -> Self {
        Self::HardwareError {
            reason: reason.into(),
        }
    }
}
