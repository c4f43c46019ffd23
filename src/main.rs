//! ncc-engine CLI - run the correlation engine over synthetic or
//! JSON-described signals for manual inspection.
//!
//! This binary is a same-language smoke-test harness, not the language
//! boundary the core's `ncc_fft_multi` contract is designed to be wrapped
//! behind.

use std::path::PathBuf;
use std::time::Instant;

use ncc_engine::compute::{ncc_fft_multi, MultiChannelInputs};
use ncc_engine::schema::RuntimeConfig;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "demo" => cmd_demo(&args[2..]),
        "--example" => print_example_scenario(),
        "--help" | "-h" => print_usage(&args[0]),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("ncc-engine - multi-channel normalized cross-correlation");
    eprintln!();
    eprintln!("Usage: {program} <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <scenario.json>            Run the engine over a described scenario");
    eprintln!("  demo [template_len] [image_len] [channels]");
    eprintln!("                                  Run a synthetic demo scenario");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --example                       Print an example scenario file");
    eprintln!("  --help, -h                      Show this help message");
}

/// Flat, serializable scenario description loaded from a JSON file by
/// `run`.
#[derive(serde::Serialize, serde::Deserialize)]
struct Scenario {
    template_len: usize,
    num_templates: usize,
    templates: Vec<f32>,
    image_len: usize,
    channels: usize,
    images: Vec<f32>,
    #[serde(default)]
    used_chans: Option<Vec<bool>>,
    #[serde(default)]
    pad_array: Option<Vec<usize>>,
}

fn cmd_run(args: &[String]) {
    if args.is_empty() {
        eprintln!("Usage: ncc-engine run <scenario.json>");
        std::process::exit(1);
    }

    let path = PathBuf::from(&args[0]);
    let text = std::fs::read_to_string(&path).unwrap_or_else(|e| {
        eprintln!("Error reading scenario file: {e}");
        std::process::exit(1);
    });
    let scenario: Scenario = serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("Error parsing scenario: {e}");
        std::process::exit(1);
    });

    let used_chans = scenario
        .used_chans
        .unwrap_or_else(|| vec![true; scenario.channels * scenario.num_templates]);
    let pad_array = scenario
        .pad_array
        .unwrap_or_else(|| vec![0usize; scenario.channels * scenario.num_templates]);

    run_and_report(
        &scenario.templates,
        scenario.template_len,
        scenario.num_templates,
        &scenario.images,
        scenario.image_len,
        scenario.channels,
        &used_chans,
        &pad_array,
    );
}

fn cmd_demo(args: &[String]) {
    let template_len: usize = args.first().and_then(|s| s.parse().ok()).unwrap_or(32);
    let image_len: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(4096);
    let channels: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(1);

    println!("ncc-engine synthetic demo");
    println!("=========================");
    println!("template_len={template_len} image_len={image_len} channels={channels}");
    println!();

    let mut raw_template = vec![0.0f32; template_len];
    for (i, v) in raw_template.iter_mut().enumerate() {
        *v = ((i as f32) * 0.9).sin();
    }
    let mean = raw_template.iter().sum::<f32>() / template_len as f32;
    let centered: Vec<f32> = raw_template.iter().map(|&v| v - mean).collect();
    let norm = centered.iter().map(|&v| v * v).sum::<f32>().sqrt();
    let template: Vec<f32> = centered.iter().map(|&v| v / norm).collect();

    let mut images = vec![0.0f32; channels * image_len];
    for (c, chunk) in images.chunks_mut(image_len).enumerate() {
        for (i, v) in chunk.iter_mut().enumerate() {
            *v = ((i as f32 + c as f32 * 7.0) * 0.05).cos() * 2.0;
        }
        // embed the raw (uncentered) template once, near the middle, so the
        // demo always has a visible peak to report.
        let start = image_len / 2;
        for (p, &u) in raw_template.iter().enumerate() {
            chunk[start + p] = u;
        }
    }

    let used_chans = vec![true; channels];
    let pad_array = vec![0usize; channels];

    run_and_report(
        &template,
        template_len,
        1,
        &images,
        image_len,
        channels,
        &used_chans,
        &pad_array,
    );
}

#[allow(clippy::too_many_arguments)]
fn run_and_report(
    templates: &[f32],
    template_len: usize,
    num_templates: usize,
    images: &[f32],
    image_len: usize,
    channels: usize,
    used_chans: &[bool],
    pad_array: &[usize],
) {
    let steps = image_len - template_len + 1;
    let mut out = vec![0.0f32; channels * num_templates * steps];

    let config = RuntimeConfig::default();
    let inputs = MultiChannelInputs {
        templates,
        template_len,
        num_templates,
        images,
        image_len,
        channels,
        used_chans,
        pad_array,
    };

    let start = Instant::now();
    let status = ncc_fft_multi(inputs, &config, &mut out).unwrap_or_else(|e| {
        eprintln!("Error running correlation: {e}");
        std::process::exit(1);
    });
    let elapsed = start.elapsed();

    println!("status: {}", status.code());
    println!("elapsed: {:.3}ms", elapsed.as_secs_f64() * 1000.0);
    println!();

    for t in 0..num_templates {
        let row = &out[t * steps..(t + 1) * steps];
        let (peak_idx, &peak_val) = row
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.abs().partial_cmp(&b.1.abs()).unwrap())
            .unwrap();
        println!("template {t}: peak lag={peak_idx} value={peak_val:.4}");
    }
}

fn print_example_scenario() {
    let scenario = Scenario {
        template_len: 4,
        num_templates: 1,
        templates: vec![-0.67, -0.22, 0.22, 0.67],
        image_len: 9,
        channels: 1,
        images: vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 0.0, 0.0],
        used_chans: Some(vec![true]),
        pad_array: Some(vec![0]),
    };
    println!("{}", serde_json::to_string_pretty(&scenario).unwrap());
}
