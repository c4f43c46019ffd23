//! Per-worker FFT scratch arena.
//!
//! Mirrors the scratch-buffer-group pattern used for 3-D convolution
//! elsewhere in this codebase: every buffer a worker needs for one
//! channel's worth of work is allocated once, owned by a single struct, and
//! cleared (not reallocated) at the top of each channel's work.

use num_complex::Complex;

use crate::error::NccError;

use super::FftPlans;

/// One worker's FFT input/output buffers for a single template row at a
/// time, plus the image-wide buffers shared across all rows of a channel.
///
/// The data model conceptually batches `template_ext`/`spec_t`/`prod` across
/// all `N_t` templates of a channel; this arena instead processes one
/// template row fully (forward transform, spectral multiply, inverse
/// transform, normalize) before moving to the next, which keeps per-worker
/// memory at `O(fft_len)` instead of `O(fft_len * template_count)` without
/// changing the external contract.
pub struct FftScratch {
    pub template_ext: Vec<f32>,
    pub image_ext: Vec<f32>,
    pub spec_t: Vec<Complex<f32>>,
    pub spec_i: Vec<Complex<f32>>,
    pub prod: Vec<Complex<f32>>,
    pub ccc: Vec<f32>,
    forward_scratch: Vec<Complex<f32>>,
    inverse_scratch: Vec<Complex<f32>>,
}

impl FftScratch {
    pub fn try_new(plans: &FftPlans) -> Result<Self, NccError> {
        let fft_len = plans.fft_len;
        let spec_len = fft_len / 2 + 1;
        Ok(Self {
            template_ext: vec![0.0; fft_len],
            image_ext: vec![0.0; fft_len],
            spec_t: plans.r2c.make_output_vec(),
            spec_i: plans.r2c.make_output_vec(),
            prod: vec![Complex::new(0.0, 0.0); spec_len],
            ccc: plans.c2r.make_output_vec(),
            forward_scratch: plans.r2c.make_scratch_vec(),
            inverse_scratch: plans.c2r.make_scratch_vec(),
        })
    }

    /// Zero the extended time-domain buffers. Spectral buffers are fully
    /// overwritten by each transform, so they don't need clearing.
    pub fn clear(&mut self) {
        self.template_ext.fill(0.0);
        self.image_ext.fill(0.0);
    }

    pub fn forward_scratch_mut(&mut self) -> &mut [Complex<f32>] {
        &mut self.forward_scratch
    }

    pub fn inverse_scratch_mut(&mut self) -> &mut [Complex<f32>] {
        &mut self.inverse_scratch
    }
}
