//! Command-line interface for ecg_scan
//!
//! Basic CLI tool for testing lead amplitude analysis on a scanned ECG

use ecg_scan::{
    classify_anomalies, AnalysisError, EcgAnalysis, EcgAnalyzer, ImageSource, PipelineConfig,
    UniformJitter,
};
use std::{env, path::Path, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut seed: Option<u64> = None;
    let mut config_path = None;
    let mut image_path_arg = None;

    // Parse arguments
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                match args.get(i).and_then(|value| value.parse().ok()) {
                    Some(value) => seed = Some(value),
                    None => {
                        eprintln!("Error: --seed expects an unsigned integer");
                        process::exit(1);
                    }
                }
            }
            "--config" => {
                i += 1;
                match args.get(i) {
                    Some(value) => config_path = Some(value.clone()),
                    None => {
                        eprintln!("Error: --config expects a file path");
                        process::exit(1);
                    }
                }
            }
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with("--") => {
                if image_path_arg.is_none() {
                    image_path_arg = Some(arg.to_string());
                } else {
                    eprintln!("Error: Multiple image paths provided");
                    process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                eprintln!("Use --help for usage information");
                process::exit(1);
            }
        }
        i += 1;
    }

    let image_path_str = match image_path_arg {
        Some(path) => path,
        None => {
            print_help(&args[0]);
            process::exit(1);
        }
    };

    let image_path = Path::new(&image_path_str);

    if !image_path.exists() {
        eprintln!("Error: File '{}' does not exist", image_path.display());
        process::exit(1);
    }

    let config = match config_path {
        Some(path) => PipelineConfig::from_json_file(Path::new(&path)).unwrap_or_else(|error| fail(error)),
        None => PipelineConfig::default(),
    };

    let analyzer = EcgAnalyzer::with_config(config).unwrap_or_else(|error| fail(error));

    let mut jitter = match seed {
        Some(seed) => UniformJitter::seeded(seed),
        None => UniformJitter::from_entropy(),
    };

    match analyzer.analyze_detailed(ImageSource::from(image_path), &mut jitter) {
        Ok(analysis) => print_result(&analysis),
        Err(error) => fail(error),
    }
}

fn fail(error: AnalysisError) -> ! {
    eprintln!("Analysis failed: {}", error);
    eprintln!("{}", error.user_message());
    process::exit(1);
}

fn print_help(program_name: &str) {
    eprintln!("Usage: {} [OPTIONS] <image_path>", program_name);
    eprintln!();
    eprintln!("Estimate P/QRS/T/U amplitudes for all 12 leads of a scanned ECG.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --seed N         Seed the amplitude jitter for reproducible output");
    eprintln!("  --config FILE    Load pipeline parameters from a JSON file");
    eprintln!("  --help, -h       Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} ecg.jpg", program_name);
    eprintln!("  {} --seed 42 ecg.png", program_name);
    eprintln!("  {} --config pipeline.json scan.jpg", program_name);
}

fn print_result(analysis: &EcgAnalysis) {
    // Print JSON to stdout for programmatic use
    match serde_json::to_string_pretty(&analysis.amplitudes) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing result: {}", e),
    }

    // Print summary to stderr for human reading
    eprintln!();
    eprintln!("Lead Amplitude Summary:");
    for lead in &analysis.leads {
        let record = &lead.record;
        eprintln!(
            "  {:<4} P={:.3} QRS={:.3} T={:.3} U={:.3}{}",
            lead.lead.name(),
            record.p,
            record.qrs,
            record.t,
            record.u,
            if lead.defaulted.is_empty() { "" } else { "  (defaults used)" }
        );
    }

    if let Some(mean) = analysis.amplitudes.mean_record() {
        eprintln!(
            "  Mean P={:.3} QRS={:.3} T={:.3} U={:.3}",
            mean.p, mean.qrs, mean.t, mean.u
        );
    }

    let fallback = analysis.fallback_leads();
    if !fallback.is_empty() {
        eprintln!(
            "  Warning: {} of 12 leads could not be read. Consider a sharper scan.",
            fallback.len()
        );
    }

    eprintln!();
    eprintln!("{}", classify_anomalies(&analysis.amplitudes));
}
