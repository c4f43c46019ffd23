//! Error types for the correlation engine.
//!
//! Only the "argument error" and "resource error" kinds ever surface as
//! `Err`. Numerical anomalies (NaN, near-zero variance, out-of-tolerance
//! samples) never throw: they are folded into the [`NccStatus`] returned
//! alongside the sanitized output.

use thiserror::Error;

/// Errors that abort a call before any output is produced.
#[derive(Debug, Error)]
pub enum NccError {
    #[error("image length {image_len} is shorter than template length {template_len}")]
    ImageShorterThanTemplate {
        image_len: usize,
        template_len: usize,
    },
    #[error(
        "fft length {fft_len} is too short for linear convolution (need >= {required})"
    )]
    FftLengthTooShort { fft_len: usize, required: usize },
    #[error("template count and channel count must be non-zero")]
    NonPositiveCount,
    #[error("used_chans/pad_array length does not match channels * template_count")]
    MismatchedMaskLength,
    #[error("failed to allocate scratch arena: {0}")]
    ScratchAllocation(String),
    #[error("failed to build FFT plan: {0}")]
    PlanCreation(String),
    #[error("failed to build worker thread pool: {0}")]
    WorkerPool(String),
}

/// Outcome of a call to `ncc_fft_multi` (or `ncc_fft`), carrying the
/// numerical-anomaly status alongside a success/failure code.
///
/// `0` means every sample was within tolerance and, for the multi-channel
/// entry point, the stacked result is valid. A negative value means at
/// least one sample exceeded the clip tolerance (|v| > 1.01): stacking was
/// suppressed and the raw per-channel rows are left in `out` for
/// inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NccStatus(i32);

impl NccStatus {
    pub const OK: NccStatus = NccStatus(0);

    pub fn suspicious() -> NccStatus {
        NccStatus(-1)
    }

    pub fn is_ok(self) -> bool {
        self.0 == 0
    }

    pub fn code(self) -> i32 {
        self.0
    }
}

pub type Result<T> = std::result::Result<T, NccError>;
