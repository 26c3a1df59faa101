// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod utils;

// Re-export commonly used types
pub use analysis::{GapReport, split_contiguous, validate_sequence};
pub use config::{FillPolicy, IndicatorSettings, PipelineConfig};
pub use data::{IndicatorRow, RunManifest, SegmentArtifact};
pub use domain::{Bar, PipelineError, Segment, SegmentSeries};
pub use engine::run_pipeline;

// CLI argument parsing
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Segment a kline file and emit the indicator-annotated dataset
    Generate {
        /// Input JSON file: an array of raw kline records
        input: PathBuf,

        /// Directory for the per-segment JSON files
        #[arg(long, default_value = "segments")]
        output_dir: PathBuf,

        /// Combined output file (defaults to `<input stem>_output.json`)
        #[arg(long)]
        combined: Option<PathBuf>,

        /// Sampling interval (1m, 5m, 15m, 30m, 1h, 4h, 1d)
        #[arg(long, default_value = "1h")]
        interval: String,

        /// Minimum bars a segment needs (default: warm-up + 1)
        #[arg(long)]
        min_segment_len: Option<usize>,

        /// Keltner channel multiplier
        #[arg(long, default_value_t = config::DEFAULT_KELTNER_MULTIPLIER)]
        keltner_multiplier: f64,

        /// Missing-value policy inside a segment
        #[arg(long, value_enum, default_value_t = FillPolicy::ForwardThenBackward)]
        fill: FillPolicy,
    },

    /// Check a kline file for duplicate or missing timestamps
    Validate {
        /// Input JSON file: an array of raw kline records
        input: PathBuf,

        /// Sampling interval (1m, 5m, 15m, 30m, 1h, 4h, 1d)
        #[arg(long, default_value = "1h")]
        interval: String,
    },
}
