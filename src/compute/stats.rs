//! Streaming mean/variance tracking for sliding image windows.
//!
//! Maintains `O(1)`-per-lag running statistics over a window of fixed
//! length sliding across an image, re-seeding from an exact computation
//! every [`RECOMPUTE_INTERVAL`](crate::schema::RECOMPUTE_INTERVAL) lags to
//! bound floating-point drift on very long images.

use crate::schema::{DRIFT_WARN_THRESHOLD, RECOMPUTE_INTERVAL};

/// Running mean and population variance over a fixed-length window.
///
/// All accumulation is done in `f64` regardless of the `f32` sample type,
/// per the design notes on variance drift.
pub struct WindowStats {
    mean: f64,
    variance: f64,
    window_len: usize,
    lags_since_recompute: usize,
}

fn exact_stats(window: &[f32]) -> (f64, f64) {
    let n = window.len() as f64;
    let mean = window.iter().map(|&v| v as f64).sum::<f64>() / n;
    let variance = window
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    (mean, variance)
}

impl WindowStats {
    /// Seed from the first window `image[0..window_len]`.
    pub fn new(image: &[f32], window_len: usize) -> Self {
        let (mean, variance) = exact_stats(&image[0..window_len]);
        Self {
            mean,
            variance,
            window_len,
            lags_since_recompute: 0,
        }
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance of the current window.
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Sum of squared deviations of the current window (`variance * len`).
    pub fn sum_sq_dev(&self) -> f64 {
        self.variance * self.window_len as f64
    }

    /// Slide the window forward by one sample: `image[new_idx]` enters,
    /// `image[new_idx - window_len]` leaves. Periodically re-seeds from an
    /// exact recomputation to bound drift.
    pub fn advance(&mut self, image: &[f32], new_idx: usize) {
        let old_idx = new_idx - self.window_len;
        let x_old = image[old_idx] as f64;
        let x_new = image[new_idx] as f64;
        let l = self.window_len as f64;

        let new_mean = self.mean + (x_new - x_old) / l;
        self.variance += (x_new - x_old) * (x_new - new_mean + x_old - self.mean) / l;
        self.mean = new_mean;

        self.lags_since_recompute += 1;
        if self.lags_since_recompute >= RECOMPUTE_INTERVAL {
            let start = new_idx + 1 - self.window_len;
            let (mean, variance) = exact_stats(&image[start..start + self.window_len]);
            let drift = (variance - self.variance).abs();
            if drift > DRIFT_WARN_THRESHOLD {
                log::warn!(
                    "streaming variance drifted by {drift:.6} over {RECOMPUTE_INTERVAL} lags (running={:.6}, exact={variance:.6}); re-seeded from exact recompute",
                    self.variance,
                );
            }
            self.mean = mean;
            self.variance = variance;
            self.lags_since_recompute = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_exact_recompute_across_a_sweep() {
        let image: Vec<f32> = (0..500).map(|i| ((i as f32) * 0.37).sin()).collect();
        let window_len = 16;
        let mut stats = WindowStats::new(&image, window_len);

        for k in 1..=(image.len() - window_len) {
            stats.advance(&image, k + window_len - 1);
            let (exp_mean, exp_var) = exact_stats(&image[k..k + window_len]);
            assert!((stats.mean() - exp_mean).abs() < 1e-6);
            assert!((stats.variance() - exp_var).abs() < 1e-5);
        }
    }

    #[test]
    fn constant_window_has_zero_variance() {
        let image = vec![3.0_f32; 64];
        let stats = WindowStats::new(&image, 8);
        assert!(stats.variance() < 1e-7);
    }
}
