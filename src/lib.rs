//! A multi-channel normalized cross-correlation (NCC) engine for 1-D
//! real-valued signals.
//!
//! Built for the seismology template-matching workload: scan a long
//! continuous "image" signal against many short "template" signals and
//! produce, at every valid lag, the Pearson correlation coefficient
//! between the template and the image window of equal length.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: runtime configuration (worker count, FFT length resolution)
//! - `compute`: the numerical core — time-domain reference correlator,
//!   batched frequency-domain correlator, and the multi-channel
//!   orchestrator
//!
//! Three entry points, layered bottom-up:
//!
//! - [`compute::ncc_time`] — direct time-domain correlation, the
//!   arithmetic reference.
//! - [`compute::ncc_fft`] — batched single-channel frequency-domain
//!   correlation.
//! - [`compute::ncc_fft_multi`] — parallel multi-channel orchestration
//!   with channel gating, lag padding, sanitization, and stacking.
//!
//! # Example
//!
//! ```rust,no_run
//! use ncc_engine::{
//!     compute::{ncc_fft_multi, MultiChannelInputs},
//!     schema::RuntimeConfig,
//! };
//!
//! let template = vec![-1.5f32, -0.5, 0.5, 1.5]; // already centered
//! let norm = template.iter().map(|v| v * v).sum::<f32>().sqrt();
//! let template: Vec<f32> = template.iter().map(|v| v / norm).collect();
//!
//! let image = vec![0.0f32, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 0.0, 0.0];
//! let steps = image.len() - template.len() + 1;
//!
//! let used_chans = vec![true];
//! let pad_array = vec![0usize];
//! let mut out = vec![0.0f32; steps];
//!
//! let inputs = MultiChannelInputs {
//!     templates: &template,
//!     template_len: template.len(),
//!     num_templates: 1,
//!     images: &image,
//!     image_len: image.len(),
//!     channels: 1,
//!     used_chans: &used_chans,
//!     pad_array: &pad_array,
//! };
//!
//! let config = RuntimeConfig::default();
//! let status = ncc_fft_multi(inputs, &config, &mut out).unwrap();
//! assert!(status.is_ok());
//! ```

pub mod compute;
pub mod error;
pub mod schema;

pub use compute::{ncc_fft, ncc_fft_multi, ncc_time, MultiChannelInputs};
pub use error::{NccError, NccStatus};
pub use schema::RuntimeConfig;
