//! Direct time-domain normalized cross-correlation.
//!
//! This is the arithmetic reference used to validate the frequency-domain
//! path and is fast enough on its own for short templates. Precondition:
//! `template` is already zero-mean (`Σ template[p] == 0`); the caller
//! centers it before calling.

use crate::schema::VARIANCE_EPSILON;

use super::stats::WindowStats;

/// Compute `out[k] = Σ_p template[p] * (image[p+k] - mean_k) / sqrt(A * B_k)`
/// for every valid lag `k`, where `A = Σ template[p]^2` and `B_k` is the
/// sum of squared deviations of the image window at lag `k`.
///
/// `out` must be pre-sized to `image.len() - template.len() + 1`.
pub fn ncc_time(template: &[f32], image: &[f32], out: &mut [f32]) {
    let template_len = template.len();
    let image_len = image.len();
    debug_assert!(image_len >= template_len);
    let steps = image_len - template_len + 1;
    debug_assert_eq!(out.len(), steps);

    let a: f64 = template.iter().map(|&u| (u as f64) * (u as f64)).sum();

    let mut stats = WindowStats::new(image, template_len);

    for k in 0..steps {
        if k > 0 {
            stats.advance(image, k + template_len - 1);
        }
        let mean_k = stats.mean();
        let b_k = stats.sum_sq_dev();

        let numerator: f64 = template
            .iter()
            .enumerate()
            .map(|(p, &u)| (u as f64) * (image[p + k] as f64 - mean_k))
            .sum();

        let denom = a * b_k;
        out[k] = if denom < VARIANCE_EPSILON {
            0.0
        } else {
            (numerator / denom.sqrt()) as f32
        };
    }
}
