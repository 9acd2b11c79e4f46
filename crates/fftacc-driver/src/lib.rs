//! Register-level driver for the memory-mapped FFT accelerator core.
//!
//! Feeds complex samples into the core through its write lane, reads the
//! transformed results back from the per-index read lanes, and decodes the
//! packed fixed-point words.
//!
//! # Backend hierarchy
//!
//! ```text
//! Hardware:
//!   DevMemRegisters  — lane window mapped through /dev/mem (Linux host)
//!   DirectRegisters  — identity-mapped volatile access (bare metal)
//!
//! No hardware:
//!   SoftwareCore       — in-process model of the core (f64 DFT, Q-format IO)
//!   RecordingRegisters — access log + scripted reads (tests)
//! ```
//!
//! # Quick start
//!
//! ```no_run
//! use fftacc_driver::{select_backend, vectors, BackendSelection, FftSession, HarnessConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HarnessConfig::default();
//! let backend = select_backend(BackendSelection::Software, &config)?;
//! let session = FftSession::new(backend, &config)?;
//!
//! for point in session.run(&vectors::bringup_words())? {
//!     println!("{point}");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

mod backend;
pub mod backends;
pub mod codec;
mod config;
mod error;
pub mod format;
mod lanes;
mod session;
pub mod vectors;

pub use backend::{select_backend, BackendSelection, BackendType, RegisterAccess};
pub use backends::{Access, DirectRegisters, RecordingRegisters, SoftwareCore};
#[cfg(unix)]
pub use backends::DevMemRegisters;
pub use codec::{decode_scaled, DecodedPoint, SampleCodec};
pub use config::{Handshake, HarnessConfig, DEFAULT_DEVMEM_PATH, STATUS_REACH};
pub use error::{FftError, Result};
pub use format::QFormat;
pub use lanes::LaneMap;
pub use session::FftSession;

pub use fftacc_chip::{decode_raw, encode, Address, ComplexSample, WireWord};

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        Address, BackendSelection, ComplexSample, DecodedPoint, FftError, FftSession,
        HarnessConfig, LaneMap, QFormat, RegisterAccess, Result, SampleCodec, WireWord,
    };
}
