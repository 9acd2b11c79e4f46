//! Register access backends
//!
//! - **DevMem**: lane window mapped through `/dev/mem` (Linux host with the core on its bus)
//! - **Direct**: volatile access at identity-mapped addresses (bare metal)
//! - **Software**: in-process model of the core, no hardware required
//! - **Recording**: access log with scripted reads, for tests

#[cfg(unix)]
pub mod devmem;
pub mod direct;
pub mod recording;
pub mod software;

#[cfg(unix)]
pub use devmem::DevMemRegisters;
pub use direct::DirectRegisters;
pub use recording::{Access, RecordingRegisters};
pub use software::SoftwareCore;
