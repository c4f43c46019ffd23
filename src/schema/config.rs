//! Runtime configuration for the correlation engine.

use serde::{Deserialize, Serialize};

use crate::error::NccError;

/// Variance below this value is treated as zero (output forced to 0).
pub const VARIANCE_EPSILON: f64 = 1e-7;

/// Output samples with |v| beyond this are flagged as a suspicious
/// normalization failure rather than merely clamped.
pub const CLIP_TOLERANCE: f32 = 1.01;

/// The streaming mean/variance accumulator is re-seeded from an exact
/// windowed sum every this-many lags, bounding floating-point drift on
/// very long images.
pub const RECOMPUTE_INTERVAL: usize = 10_000;

/// If a periodic exact recompute corrects the running variance by more
/// than this much, the streaming update had drifted further than expected
/// and the correction is logged.
pub const DRIFT_WARN_THRESHOLD: f64 = 1e-3;

fn default_workers() -> usize {
    std::env::var("NCC_WORKERS")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|&n| n > 0)
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
}

/// Runtime knobs for `ncc_fft_multi`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Worker count for the channel work partition. Defaults to the host's
    /// available parallelism, overridable via the `NCC_WORKERS` environment
    /// variable.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// FFT transform length. Must be >= template_len + image_len - 1.
    pub fft_len: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            fft_len: 0,
        }
    }
}

impl RuntimeConfig {
    /// Validate against a specific call shape, filling in `fft_len` with a
    /// safe default (next power of two covering linear convolution) if it
    /// was left at 0.
    pub fn resolved_fft_len(&self, template_len: usize, image_len: usize) -> Result<usize, NccError> {
        let required = template_len + image_len - 1;
        let len = if self.fft_len == 0 {
            required.next_power_of_two()
        } else {
            self.fft_len
        };
        if len < required {
            return Err(NccError::FftLengthTooShort {
                fft_len: len,
                required,
            });
        }
        Ok(len)
    }

    pub fn validate(&self) -> Result<(), NccError> {
        if self.workers == 0 {
            return Err(NccError::NonPositiveCount);
        }
        Ok(())
    }
}
