//! Silicon model for the memory-mapped FFT accelerator core.
//!
//! This crate has **no dependencies** and **no hardware access**. It is a
//! pure model of the core's register interface: lane addresses, the packed
//! 32-bit wire word, and the bring-up test vectors the core was validated
//! against.
//!
//! # Crate organisation
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`regs`] | Lane address map, build-time IO width and binary point |
//! | [`sample`] | `ComplexSample` ⇄ `WireWord` packing (bits [31:16] real, [15:0] imaginary) |
//! | [`vectors`] | Bring-up input words and tone parameters |

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod regs;
pub mod sample;
pub mod vectors;

pub use regs::Address;
pub use sample::{decode_raw, encode, ComplexSample, WireWord};
