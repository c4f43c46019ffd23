//! Frequency-domain correlation: plan management, per-worker scratch, and
//! the batched single-channel correlator.

mod scratch;
mod single;

pub use scratch::FftScratch;
pub use single::ncc_fft;

use std::sync::Arc;

use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};

use crate::error::NccError;

/// Cached real-to-complex / complex-to-real transform pair for one FFT
/// length, shared read-only across all workers.
///
/// Plan *creation* mutates process-wide planner state and must happen once,
/// in the calling thread, before the parallel region opens. Plan
/// *execution* against caller-supplied buffers is thread-safe, which is
/// what lets a single `FftPlans` serve every worker via cheap `Arc` clones.
pub struct FftPlans {
    pub(crate) r2c: Arc<dyn RealToComplex<f32>>,
    pub(crate) c2r: Arc<dyn ComplexToReal<f32>>,
    pub fft_len: usize,
}

impl FftPlans {
    pub fn new(fft_len: usize) -> Result<Self, NccError> {
        if fft_len < 2 {
            return Err(NccError::PlanCreation(format!(
                "fft length {fft_len} too small"
            )));
        }
        let mut planner = RealFftPlanner::<f32>::new();
        let r2c = planner.plan_fft_forward(fft_len);
        let c2r = planner.plan_fft_inverse(fft_len);
        Ok(Self { r2c, c2r, fft_len })
    }
}

impl Clone for FftPlans {
    fn clone(&self) -> Self {
        Self {
            r2c: Arc::clone(&self.r2c),
            c2r: Arc::clone(&self.c2r),
            fft_len: self.fft_len,
        }
    }
}
