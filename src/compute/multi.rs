//! Multi-channel orchestrator.
//!
//! Runs the single-channel frequency-domain correlator across every
//! channel in parallel, each channel getting its own FFT scratch arena
//! while sharing one set of FFT plans, then sanitizes, gates, pads, and
//! stacks the per-channel results.
//!
//! The parallel region follows the same shape as the rest of this
//! codebase's channel/kernel work partitions: one rayon task per unit of
//! work, each task's output confined to a disjoint slice of the shared
//! output buffer, with no synchronization needed inside the region itself.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::error::{NccError, NccStatus};
use crate::schema::RuntimeConfig;

use super::fft::{ncc_fft, FftPlans, FftScratch};
use super::sanitize::{rotate_left_zero_fill, sanitize_row, RowSanity};

/// Flat inputs to [`ncc_fft_multi`]. All slices use the packed layouts
/// described in the data model: templates row-major `[N_t, template_len]`
/// shared across channels, images row-major `[channels, image_len]`, masks
/// row-major `[channels, num_templates]`.
#[derive(Clone, Copy)]
pub struct MultiChannelInputs<'a> {
    pub templates: &'a [f32],
    pub template_len: usize,
    pub num_templates: usize,
    pub images: &'a [f32],
    pub image_len: usize,
    pub channels: usize,
    pub used_chans: &'a [bool],
    pub pad_array: &'a [usize],
}

/// Correlate every channel against the shared template batch and reduce
/// into a stacked correlogram.
///
/// `out` must be pre-sized to `channels * num_templates * steps` where
/// `steps = image_len - template_len + 1`. On success (`NccStatus::OK`),
/// the first `num_templates * steps` entries hold the channel-summed
/// correlogram and every remaining entry is explicitly zeroed. If any
/// sample anywhere exceeded the clip tolerance, stacking and padding are
/// both suppressed, the raw per-channel (but NaN-coerced) rows are left in
/// `out` for inspection, and a non-OK status is returned.
pub fn ncc_fft_multi(
    inputs: MultiChannelInputs<'_>,
    config: &RuntimeConfig,
    out: &mut [f32],
) -> Result<NccStatus, NccError> {
    let MultiChannelInputs {
        templates,
        template_len,
        num_templates,
        images,
        image_len,
        channels,
        used_chans,
        pad_array,
    } = inputs;

    if channels == 0 || num_templates == 0 || template_len == 0 {
        return Err(NccError::NonPositiveCount);
    }
    if image_len < template_len {
        return Err(NccError::ImageShorterThanTemplate {
            image_len,
            template_len,
        });
    }
    if used_chans.len() != channels * num_templates || pad_array.len() != channels * num_templates {
        return Err(NccError::MismatchedMaskLength);
    }

    let steps = image_len - template_len + 1;
    let chunk_size = num_templates * steps;
    if out.len() != channels * chunk_size {
        return Err(NccError::MismatchedMaskLength);
    }

    config.validate()?;

    let fft_len = config.resolved_fft_len(template_len, image_len)?;
    log::debug!("ncc_fft_multi: building fft plan set for fft_len={fft_len}");
    let plans = FftPlans::new(fft_len)?;

    // W = min(C, P): never spin up more workers than there are channels to
    // hand them, and never more than the configured/host parallelism.
    let worker_count = config.workers.min(channels);
    log::debug!(
        "ncc_fft_multi: worker count resolved to {worker_count} (config.workers={}, channels={channels})",
        config.workers
    );
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(worker_count)
        .build()
        .map_err(|e| NccError::WorkerPool(e.to_string()))?;

    log::info!(
        "ncc_fft_multi: channels={channels} templates={num_templates} template_len={template_len} image_len={image_len} fft_len={fft_len} workers={worker_count}"
    );

    let suspicious = AtomicBool::new(false);

    pool.install(|| {
        out.par_chunks_mut(chunk_size)
            .enumerate()
            .try_for_each(|(c, out_chunk)| -> Result<(), NccError> {
                let mut scratch = FftScratch::try_new(&plans)
                    .map_err(|e| NccError::ScratchAllocation(e.to_string()))?;
                log::debug!(
                    "ncc_fft_multi: channel {c} scratch ready (template_ext/image_ext/ccc len={fft_len})"
                );
                let image = &images[c * image_len..(c + 1) * image_len];

                ncc_fft(
                    &plans,
                    &mut scratch,
                    templates,
                    template_len,
                    num_templates,
                    image,
                    out_chunk,
                )?;

                for t in 0..num_templates {
                    let row = &mut out_chunk[t * steps..(t + 1) * steps];
                    if !used_chans[c * num_templates + t] {
                        row.fill(0.0);
                        continue;
                    }
                    if sanitize_row(row) == RowSanity::Suspicious {
                        suspicious.store(true, Ordering::Relaxed);
                        log::warn!(
                            "channel {c} template {t}: normalization exceeded clip tolerance"
                        );
                    }
                }
                Ok(())
            })
    })?;

    if suspicious.load(Ordering::Relaxed) {
        return Ok(NccStatus::suspicious());
    }

    for c in 0..channels {
        let chunk = &mut out[c * chunk_size..(c + 1) * chunk_size];
        for t in 0..num_templates {
            let shift = pad_array[c * num_templates + t];
            rotate_left_zero_fill(&mut chunk[t * steps..(t + 1) * steps], shift);
        }
    }

    let (first, rest) = out.split_at_mut(chunk_size);
    for c in 1..channels {
        let chunk = &rest[(c - 1) * chunk_size..c * chunk_size];
        for (dst, src) in first.iter_mut().zip(chunk.iter()) {
            *dst += *src;
        }
    }
    for v in &mut out[chunk_size..] {
        *v = 0.0;
    }

    Ok(NccStatus::OK)
}
