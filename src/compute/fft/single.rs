//! Batched single-channel frequency-domain correlator.
//!
//! Correlates one image against a batch of templates sharing a length, via
//! a real-to-complex FFT of the (time-reversed, zero-padded) template, a
//! pointwise spectral product against the image's transform, an inverse
//! transform, and a streaming normalization pass. Templates are processed
//! one row at a time against the shared image spectrum.

use crate::error::NccError;
use crate::schema::VARIANCE_EPSILON;

use super::{FftPlans, FftScratch};
use crate::compute::stats::WindowStats;

/// Correlate `image` against every row of `templates` (each of length
/// `template_len`), writing `num_templates * steps` values into `out`
/// where `steps = image.len() - template_len + 1`.
///
/// Precondition: every template row has unit L2 norm. The caller is
/// responsible for normalizing templates before calling; this function
/// only subtracts the per-window image mean, it does not rescale by the
/// template's own norm.
pub fn ncc_fft(
    plans: &FftPlans,
    scratch: &mut FftScratch,
    templates: &[f32],
    template_len: usize,
    num_templates: usize,
    image: &[f32],
    out: &mut [f32],
) -> Result<(), NccError> {
    let image_len = image.len();
    if image_len < template_len {
        return Err(NccError::ImageShorterThanTemplate {
            image_len,
            template_len,
        });
    }
    let steps = image_len - template_len + 1;
    debug_assert_eq!(out.len(), num_templates * steps);

    let fft_len = plans.fft_len;
    let required = template_len + image_len - 1;
    if fft_len < required {
        return Err(NccError::FftLengthTooShort { fft_len, required });
    }

    scratch.clear();

    scratch.image_ext[..image_len].copy_from_slice(image);
    plans
        .r2c
        .process_with_scratch(
            &mut scratch.image_ext,
            &mut scratch.spec_i,
            scratch.forward_scratch_mut(),
        )
        .map_err(|e| NccError::PlanCreation(e.to_string()))?;

    let start_ind = template_len - 1;

    for t in 0..num_templates {
        let row = &templates[t * template_len..(t + 1) * template_len];
        let norm_sum: f64 = row.iter().map(|&v| v as f64).sum();

        scratch.template_ext.fill(0.0);
        for (i, &u) in row.iter().enumerate() {
            scratch.template_ext[template_len - 1 - i] = u;
        }

        plans
            .r2c
            .process_with_scratch(
                &mut scratch.template_ext,
                &mut scratch.spec_t,
                scratch.forward_scratch_mut(),
            )
            .map_err(|e| NccError::PlanCreation(e.to_string()))?;

        for (p, (s_t, s_i)) in scratch
            .prod
            .iter_mut()
            .zip(scratch.spec_t.iter().zip(scratch.spec_i.iter()))
        {
            *p = s_t * s_i;
        }

        plans
            .c2r
            .process_with_scratch(&mut scratch.prod, &mut scratch.ccc, scratch.inverse_scratch_mut())
            .map_err(|e| NccError::PlanCreation(e.to_string()))?;

        let mut stats = WindowStats::new(image, template_len);
        let out_row = &mut out[t * steps..(t + 1) * steps];
        for k in 0..steps {
            if k > 0 {
                stats.advance(image, k + template_len - 1);
            }
            let mean_k = stats.mean();

            if stats.variance() < VARIANCE_EPSILON {
                out_row[k] = 0.0;
                continue;
            }

            let b_k = stats.sum_sq_dev();
            let raw = scratch.ccc[start_ind + k] as f64 / fft_len as f64;
            let numerator = raw - norm_sum * mean_k;
            out_row[k] = (numerator / b_k.sqrt()) as f32;
        }
    }

    Ok(())
}
