//! Compute module - the correlation engine's numerical core.

mod fft;
mod multi;
mod sanitize;
mod stats;
mod time_domain;

pub use fft::{ncc_fft, FftPlans, FftScratch};
pub use multi::{ncc_fft_multi, MultiChannelInputs};
pub use time_domain::ncc_time;
