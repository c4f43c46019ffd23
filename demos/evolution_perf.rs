//! Quick throughput sweep across image sizes and channel counts.
//!
//! Not part of the public API; useful for a quick before/after check when
//! touching the FFT scratch layout or the worker partition.

use std::time::Instant;

use ncc_engine::compute::{ncc_fft_multi, MultiChannelInputs};
use ncc_engine::schema::RuntimeConfig;

fn unit_norm_centered(values: &[f32]) -> Vec<f32> {
    let mean = values.iter().sum::<f32>() / values.len() as f32;
    let centered: Vec<f32> = values.iter().map(|&v| v - mean).collect();
    let norm = centered.iter().map(|&v| v * v).sum::<f32>().sqrt();
    centered.iter().map(|&v| v / norm).collect()
}

fn main() {
    println!("=== NCC throughput sweep ===\n");

    let template_len = 64;
    let raw: Vec<f32> = (0..template_len).map(|i| ((i as f32) * 0.7).sin()).collect();
    let template = unit_norm_centered(&raw);

    for image_len in [4_096usize, 65_536, 1_048_576] {
        for channels in [1usize, 4, 16] {
            let steps = image_len - template_len + 1;
            let mut images = Vec::with_capacity(channels * image_len);
            for c in 0..channels {
                images.extend((0..image_len).map(|i| ((i as f32 + c as f32 * 5.0) * 0.03).cos()));
            }
            let used_chans = vec![true; channels];
            let pad_array = vec![0usize; channels];
            let config = RuntimeConfig::default();
            let mut out = vec![0.0f32; channels * steps];

            let inputs = MultiChannelInputs {
                templates: &template,
                template_len,
                num_templates: 1,
                images: &images,
                image_len,
                channels,
                used_chans: &used_chans,
                pad_array: &pad_array,
            };

            let start = Instant::now();
            let status = ncc_fft_multi(inputs, &config, &mut out).unwrap();
            let elapsed = start.elapsed();

            let samples = (channels * steps) as f64;
            let throughput = samples / elapsed.as_secs_f64() / 1e6;

            println!(
                "image_len={image_len:>9} channels={channels:>3}  status={:>2}  elapsed={:>8.2}ms  {throughput:>7.1}M samples/s",
                status.code(),
                elapsed.as_secs_f64() * 1000.0,
            );
        }
    }
}
