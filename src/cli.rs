//! CLI argument parsing for seqbound

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable `key: value` lines (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "seqbound")]
#[command(version)]
#[command(
    about = "Statistically sound frequency thresholds for sequential pattern mining",
    long_about = None
)]
pub struct Cli {
    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    /// TOML file with defaults for delta, epsilon and the miner command
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rank bound, dataset size and maximum deviation of a dataset
    Bound {
        dataset: PathBuf,

        /// Confidence parameter in (0, 1)
        #[arg(short = 'd', long = "delta", value_name = "DELTA")]
        delta: Option<f64>,
    },

    /// Sample size needed for an epsilon/2 maximum deviation
    SampleSize {
        dataset: PathBuf,

        /// Error bound in (0, 1)
        #[arg(short = 'e', long = "epsilon", value_name = "EPSILON")]
        epsilon: Option<f64>,

        /// Confidence parameter in (0, 1)
        #[arg(short = 'd', long = "delta", value_name = "DELTA")]
        delta: Option<f64>,
    },

    /// Extract a random sample of records (with replacement)
    ///
    /// The sample must be smaller than the dataset.
    Sample {
        dataset: PathBuf,

        /// Number of records to draw
        #[arg(short = 'n', long = "size", value_name = "N")]
        size: u64,

        /// Seed for the random generator
        #[arg(short = 's', long = "seed", value_name = "SEED")]
        seed: u64,

        /// Sample file (default: <dataset>_sample.txt)
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Pseudo-artificial dataset: a with-replacement sample as large as the dataset
    ///
    /// Exempt from the smaller-than-dataset rule of `sample`; the output has
    /// exactly as many records as the input.
    Resample {
        dataset: PathBuf,

        /// Seed for the random generator
        #[arg(short = 's', long = "seed", value_name = "SEED")]
        seed: u64,

        /// Output file (default: <dataset>_S<seed>.txt)
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Average and maximum item-length of the records
    Lengths { dataset: PathBuf },

    /// Correct the threshold with the full-dataset deviation and mine the dataset
    Tfsp {
        dataset: PathBuf,

        /// Nominal frequency threshold in (0, 1]
        #[arg(short = 't', long = "theta", value_name = "THETA")]
        theta: f64,

        /// Confidence parameter in (0, 1)
        #[arg(short = 'd', long = "delta", value_name = "DELTA")]
        delta: Option<f64>,

        /// Raise the threshold (no false positives) instead of lowering it
        #[arg(long = "fpf")]
        fpf: bool,

        /// Miner command template with {input}, {output} and {threshold}
        #[arg(long = "miner", value_name = "CMD")]
        miner: Option<String>,

        /// Pattern file (default derived from the dataset name)
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Mine a random sample with a threshold corrected by epsilon/2
    Approx {
        dataset: PathBuf,

        /// Nominal frequency threshold in (0, 1]
        #[arg(short = 't', long = "theta", value_name = "THETA")]
        theta: f64,

        /// Error bound in (0, 1)
        #[arg(short = 'e', long = "epsilon", value_name = "EPSILON")]
        epsilon: Option<f64>,

        /// Confidence parameter in (0, 1)
        #[arg(short = 'd', long = "delta", value_name = "DELTA")]
        delta: Option<f64>,

        /// Raise the threshold (no false positives) instead of lowering it
        #[arg(long = "fpf")]
        fpf: bool,

        /// Seed for the random generator
        #[arg(short = 's', long = "seed", value_name = "SEED")]
        seed: u64,

        /// Miner command template with {input}, {output} and {threshold}
        #[arg(long = "miner", value_name = "CMD")]
        miner: Option<String>,

        /// Sample file (default: <dataset>_sample.txt)
        #[arg(long = "sample-output", value_name = "FILE")]
        sample_output: Option<PathBuf>,

        /// Pattern file (default derived from the dataset name)
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,
    },
}
