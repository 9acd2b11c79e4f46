// SPDX-License-Identifier: AGPL-3.0-only

//! Software (virtual core) backend
//!
//! Implements the accelerator's lane protocol in-process so the harness can
//! run end-to-end without hardware:
//!
//! 1. Each write to the write lane is decoded and appended as the next input.
//! 2. The N-th write triggers an N-point DFT in `f64` on the fixed-point
//!    inputs, re-quantised to the same format (round to nearest, saturate).
//! 3. Read lane `i` returns result `i` of the most recent transform.
//!
//! ## Precision model
//!
//! ```text
//! Q-format inputs  →  f64 DFT (unscaled, X[k] = Σ x[n]·e^{-2πjkn/N})  →  Q-format outputs
//! ```
//!
//! The only deviation from an exact transform is output quantisation, so the
//! software core is the reference the hardware readout is compared against.
//! Whether a given hardware build scales its output by `1/N` is a property of
//! that build; the software core does not.

use crate::backend::{BackendType, RegisterAccess};
use crate::codec::SampleCodec;
use crate::format::QFormat;
use crate::lanes::LaneMap;
use fftacc_chip::{Address, ComplexSample, WireWord};
use std::f64::consts::TAU;
use tracing::{debug, trace, warn};

/// Value read from the status register once results are available.
pub const STATUS_READY: u32 = 1;

/// Software model of the FFT accelerator core
#[derive(Debug)]
pub struct SoftwareCore {
    lanes: LaneMap,
    codec: SampleCodec,
    /// Inputs of the transform in progress
    pending: Vec<ComplexSample>,
    /// Packed results of the last completed transform
    results: Vec<WireWord>,
    status: Option<Address>,
    transforms: u64,
}

impl SoftwareCore {
    /// Core serving `lanes`, computing in `format`
    pub fn new(lanes: LaneMap, format: QFormat) -> Self {
        Self {
            lanes,
            codec: SampleCodec::new(format),
            pending: Vec::with_capacity(lanes.size()),
            results: Vec::new(),
            status: None,
            transforms: 0,
        }
    }

    /// Core matching the bring-up build
    pub fn bringup() -> Self {
        Self::new(LaneMap::BRINGUP, QFormat::BRINGUP)
    }

    /// Expose a status register that reads [`STATUS_READY`] once results exist
    #[must_use]
    pub fn with_status_register(mut self, status: Option<Address>) -> Self {
        self.status = status;
        self
    }

    /// Whether a complete transform is available and no new one is half-written
    pub fn results_ready(&self) -> bool {
        !self.results.is_empty() && self.pending.is_empty()
    }

    /// Inputs written since the last completed transform
    pub fn pending_inputs(&self) -> usize {
        self.pending.len()
    }

    /// Number of transforms computed
    pub const fn transforms_completed(&self) -> u64 {
        self.transforms
    }

    /// Drop partial inputs and previous results
    pub fn reset(&mut self) {
        self.pending.clear();
        self.results.clear();
    }

    fn transform(&mut self) {
        let format = self.codec.format();
        let input: Vec<(f64, f64)> = self
            .pending
            .iter()
            .map(|s| (format.to_real(s.re), format.to_real(s.im)))
            .collect();

        self.results = reference_dft(&input)
            .into_iter()
            .map(|(re, im)| {
                // quantize() saturates to the format range, so encode cannot fail
                self.codec
                    .encode(self.codec.quantize(re, im))
                    .unwrap_or_default()
            })
            .collect();
        self.pending.clear();
        self.transforms += 1;
        debug!(
            "SoftwareCore: transform {} complete ({} points)",
            self.transforms,
            self.results.len()
        );
    }
}

impl RegisterAccess for SoftwareCore {
    fn write_word(&mut self, address: Address, value: u32) {
        if address != self.lanes.write_lane() {
            warn!("SoftwareCore: write to unmapped {address} ignored");
            return;
        }
        let sample = self.codec.decode_raw(WireWord::from_bits(value));
        trace!("SoftwareCore: input {} = {sample}", self.pending.len());
        self.pending.push(sample);
        if self.pending.len() == self.lanes.size() {
            self.transform();
        }
    }

    fn read_word(&mut self, address: Address) -> u32 {
        if Some(address) == self.status {
            return if self.results_ready() { STATUS_READY } else { 0 };
        }
        match self.lanes.lane_index(address) {
            Some(i) => self.results.get(i).map_or(0, |w| w.bits()),
            None => {
                warn!("SoftwareCore: read of unmapped {address}");
                0
            }
        }
    }

    fn backend_type(&self) -> BackendType {
        BackendType::Software
    }
}

/// Unscaled discrete Fourier transform, `X[k] = Σ x[n]·e^{-2πjkn/N}`
#[allow(clippy::cast_precision_loss)]
pub fn reference_dft(input: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let n = input.len();
    (0..n)
        .map(|k| {
            input.iter().enumerate().fold((0.0, 0.0), |(acc_re, acc_im), (t, &(re, im))| {
                // k·t reduced mod n keeps the angle small for large transforms
                let angle = -TAU * ((k * t) % n) as f64 / n as f64;
                let (sin, cos) = angle.sin_cos();
                (acc_re + re * cos - im * sin, acc_im + re * sin + im * cos)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fftacc_chip::vectors::BRINGUP_POINTS;

    fn feed(core: &mut SoftwareCore, words: &[u32]) {
        let lane = core.lanes.write_lane();
        for &w in words {
            core.write_word(lane, w);
        }
    }

    #[test]
    fn bringup_tone_lands_in_last_bin() {
        let mut core = SoftwareCore::bringup();
        feed(&mut core, &BRINGUP_POINTS);
        assert!(core.results_ready());
        assert_eq!(core.transforms_completed(), 1);

        let lanes = LaneMap::BRINGUP;
        let out: Vec<u32> = (0..8)
            .map(|i| core.read_word(lanes.read_lane(i).unwrap()))
            .collect();
        assert_eq!(out, vec![0, 0, 0, 0, 0, 0, 0, 0x05A8_FA58]);
    }

    #[test]
    fn impulse_gives_flat_spectrum() {
        let mut core = SoftwareCore::bringup();
        feed(&mut core, &[0x0100_0000, 0, 0, 0, 0, 0, 0, 0]);
        let lanes = LaneMap::BRINGUP;
        for i in 0..8 {
            assert_eq!(core.read_word(lanes.read_lane(i).unwrap()), 0x0100_0000);
        }
    }

    #[test]
    fn partial_sequence_keeps_previous_results() {
        let mut core = SoftwareCore::bringup();
        feed(&mut core, &[0x0100_0000, 0, 0, 0, 0, 0, 0, 0]);
        feed(&mut core, &[0x0000_0100; 3]);
        assert_eq!(core.pending_inputs(), 3);
        assert!(!core.results_ready());
        assert_eq!(core.read_word(LaneMap::BRINGUP.read_lane(4).unwrap()), 0x0100_0000);
    }

    #[test]
    fn status_register_tracks_readiness() {
        let status = Address::new(0x1FF8);
        let mut core = SoftwareCore::bringup().with_status_register(Some(status));
        assert_eq!(core.read_word(status), 0);
        feed(&mut core, &BRINGUP_POINTS);
        assert_eq!(core.read_word(status), STATUS_READY);
        core.reset();
        assert_eq!(core.read_word(status), 0);
    }

    #[test]
    fn output_saturates() {
        // 8 × 127.99 overflows Q8.8 in bin 0
        let mut core = SoftwareCore::bringup();
        feed(&mut core, &[0x7FFF_7FFF; 8]);
        let w = core.read_word(LaneMap::BRINGUP.read_lane(0).unwrap());
        assert_eq!(w, 0x7FFF_7FFF);
    }

    #[test]
    fn unmapped_accesses_are_inert() {
        let mut core = SoftwareCore::bringup();
        core.write_word(Address::new(0x3000), 1);
        assert_eq!(core.pending_inputs(), 0);
        assert_eq!(core.read_word(Address::new(0x3000)), 0);
    }

    #[test]
    fn dft_of_constant() {
        let out = reference_dft(&[(1.0, 0.0); 4]);
        assert!((out[0].0 - 4.0).abs() < 1e-12);
        for (re, im) in &out[1..] {
            assert!(re.abs() < 1e-12 && im.abs() < 1e-12);
        }
    }
}
