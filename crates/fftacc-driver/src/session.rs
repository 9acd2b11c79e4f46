// SPDX-License-Identifier: AGPL-3.0-only

//! Transaction session: write phase, then read phase
//!
//! The core's pipeline state is shared: N writes to the write lane followed by
//! N reads of the read lanes form one transaction that the hardware does not
//! make atomic. The session owns its backend behind a mutex and holds it for
//! the whole transaction, so concurrent callers are serialised and the two
//! phases are never interleaved.

use crate::backend::RegisterAccess;
use crate::codec::{DecodedPoint, SampleCodec};
use crate::config::{Handshake, HarnessConfig};
use crate::error::{FftError, Result};
use crate::lanes::LaneMap;
use fftacc_chip::{Address, ComplexSample, WireWord};
use parking_lot::Mutex;
use tracing::{debug, info, trace};

/// One accelerator instance and its register backend
#[derive(Debug)]
pub struct FftSession<B: RegisterAccess> {
    backend: Mutex<B>,
    lanes: LaneMap,
    codec: SampleCodec,
    handshake: Handshake,
}

impl<B: RegisterAccess> FftSession<B> {
    /// Bind `backend` to the accelerator described by `config`
    ///
    /// # Errors
    ///
    /// Returns error if `config` does not validate. No register is touched.
    pub fn new(backend: B, config: &HarnessConfig) -> Result<Self> {
        config.validate()?;
        let lanes = config.lane_map()?;
        let codec = config.codec()?;
        info!(
            "FFT session: {} backend, {} points, {}",
            backend.backend_type(),
            lanes.size(),
            codec.format()
        );
        Ok(Self {
            backend: Mutex::new(backend),
            lanes,
            codec,
            handshake: config.handshake,
        })
    }

    /// Lane map in use
    pub const fn lanes(&self) -> &LaneMap {
        &self.lanes
    }

    /// Codec in use
    pub const fn codec(&self) -> &SampleCodec {
        &self.codec
    }

    /// Run one transform on pre-packed input words
    ///
    /// Writes every word to the write lane in order, waits for the handshake
    /// (if configured), then reads and decodes every read lane in index order.
    ///
    /// # Errors
    ///
    /// Returns [`FftError::SequenceLength`] if `inputs.len() != N` (nothing is
    /// written), or [`FftError::HandshakeTimeout`] if the status register
    /// never reports ready.
    pub fn run(&self, inputs: &[WireWord]) -> Result<Vec<DecodedPoint>> {
        if inputs.len() != self.lanes.size() {
            return Err(FftError::SequenceLength {
                expected: self.lanes.size(),
                actual: inputs.len(),
            });
        }
        let read_lanes: Vec<Address> = self.lanes.read_lanes().collect();

        let mut regs = self.backend.lock();
        self.write_phase(&mut *regs, inputs);
        self.await_completion(&mut *regs)?;
        Ok(self.read_phase(&mut *regs, &read_lanes))
    }

    /// Run one transform on unpacked samples
    ///
    /// # Errors
    ///
    /// Returns error if a sample does not fit the configured width, or as
    /// [`run`](Self::run). Encoding finishes before any register is touched.
    pub fn run_samples(&self, samples: &[ComplexSample]) -> Result<Vec<DecodedPoint>> {
        let words = samples
            .iter()
            .map(|&s| self.codec.encode(s))
            .collect::<Result<Vec<_>>>()?;
        self.run(&words)
    }

    /// Read and decode a single result lane
    ///
    /// # Errors
    ///
    /// Returns [`FftError::IndexOutOfRange`] if `index >= N`; no access is issued.
    pub fn read_lane(&self, index: usize) -> Result<DecodedPoint> {
        let address = self.lanes.read_lane(index)?;
        let word = WireWord::from_bits(self.backend.lock().read_word(address));
        Ok(self.codec.decode_point(index, word))
    }

    /// Run `f` with exclusive access to the backend
    pub fn with_backend<T>(&self, f: impl FnOnce(&mut B) -> T) -> T {
        let mut guard = self.backend.lock();
        f(&mut *guard)
    }

    /// Release the backend
    pub fn into_backend(self) -> B {
        self.backend.into_inner()
    }

    fn write_phase(&self, regs: &mut B, inputs: &[WireWord]) {
        let lane = self.lanes.write_lane();
        debug!("Write phase: {} words to {lane}", inputs.len());
        for (i, word) in inputs.iter().enumerate() {
            trace!("input {i}: {word}");
            regs.write_word(lane, word.bits());
        }
    }

    fn await_completion(&self, regs: &mut B) -> Result<()> {
        let Handshake::Poll {
            status,
            ready_mask,
            max_polls,
        } = self.handshake
        else {
            return Ok(());
        };
        for poll in 1..=max_polls {
            if regs.read_word(status) & ready_mask != 0 {
                debug!("Results ready after {poll} polls of {status}");
                return Ok(());
            }
        }
        Err(FftError::HandshakeTimeout { polls: max_polls })
    }

    fn read_phase(&self, regs: &mut B, read_lanes: &[Address]) -> Vec<DecodedPoint> {
        debug!("Read phase: {} lanes from {}", read_lanes.len(), self.lanes.read_base());
        read_lanes
            .iter()
            .enumerate()
            .map(|(i, &address)| {
                let word = WireWord::from_bits(regs.read_word(address));
                self.codec.decode_point(i, word)
            })
            .collect()
    }
}
