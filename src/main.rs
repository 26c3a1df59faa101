use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

use kline_dataset::{
    Cli, Command, FillPolicy, IndicatorSettings, PipelineConfig,
    data::{load_bars_from_json, write_combined_file, write_segment_files},
    run_pipeline,
    utils::TimeUtils,
    validate_sequence,
};

/// How many missing timestamps the CLI prints before eliding. The report
/// itself always carries the complete list.
const MISSING_DISPLAY_LIMIT: usize = 10;

fn main() -> Result<()> {
    let default_level = if cfg!(debug_assertions) { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let args = Cli::parse();
    match args.command {
        Command::Generate {
            input,
            output_dir,
            combined,
            interval,
            min_segment_len,
            keltner_multiplier,
            fill,
        } => generate(
            input,
            output_dir,
            combined,
            &interval,
            min_segment_len,
            keltner_multiplier,
            fill,
        ),
        Command::Validate { input, interval } => validate(input, &interval),
    }
}

fn parse_interval(interval: &str) -> Result<i64> {
    match TimeUtils::interval_from_string(interval) {
        Some(ms) => Ok(ms),
        None => bail!("unsupported interval '{}'", interval),
    }
}

fn generate(
    input: PathBuf,
    output_dir: PathBuf,
    combined: Option<PathBuf>,
    interval: &str,
    min_segment_len: Option<usize>,
    keltner_multiplier: f64,
    fill: FillPolicy,
) -> Result<()> {
    let config = PipelineConfig {
        interval_ms: parse_interval(interval)?,
        min_segment_len,
        fill_policy: fill,
        indicators: IndicatorSettings {
            keltner_multiplier,
            ..Default::default()
        },
    };

    let bars = load_bars_from_json(&input)?;
    let (artifacts, manifest) = run_pipeline(&bars, &config)?;

    write_segment_files(&artifacts, &output_dir)?;

    let combined_path = combined.unwrap_or_else(|| {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "klines".to_string());
        PathBuf::from(format!("{}_output.json", stem))
    });
    write_combined_file(&artifacts, &combined_path)?;

    println!("{}", manifest.render_table(&artifacts));
    Ok(())
}

fn validate(input: PathBuf, interval: &str) -> Result<()> {
    let interval_ms = parse_interval(interval)?;
    let bars = load_bars_from_json(&input)?;
    let report = validate_sequence(&bars, interval_ms)?;

    if report.is_valid {
        println!(
            "OK: {} bars, strictly contiguous at {} with no duplicates.",
            bars.len(),
            TimeUtils::interval_to_string(interval_ms)
        );
        return Ok(());
    }

    if !report.duplicates.is_empty() {
        println!("Duplicate timestamps ({}):", report.duplicates.len());
        for ts in report.duplicate_strings() {
            println!("  {}", ts);
        }
    }
    if !report.missing.is_empty() {
        println!("Missing timestamps ({}):", report.missing.len());
        for ts in report.missing_strings().iter().take(MISSING_DISPLAY_LIMIT) {
            println!("  {}", ts);
        }
        if report.missing.len() > MISSING_DISPLAY_LIMIT {
            println!("  ... {} more", report.missing.len() - MISSING_DISPLAY_LIMIT);
        }
    }
    Ok(())
}
