use anyhow::{Context, Result};
use clap::Parser;
use seqbound::cli::{Cli, Command, OutputFormat};
use seqbound::config::Config;
use seqbound::lengths::LengthStats;
use seqbound::miner::CommandMiner;
use seqbound::pipeline::{
    default_output_path, run_sampling, run_tfsp, CorrectionMode, SamplingParams, TfspParams,
};
use seqbound::record::{count_records, open_dataset};
use seqbound::report::{render_json, render_text, BoundReport, SampleSizeReport};
use seqbound::sampler::{create_sample, ensure_smaller_than_dataset};
use serde::Serialize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Print a report in the requested format
fn emit<T: Serialize>(report: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(report)?),
        OutputFormat::Json => println!("{}", render_json(report)?),
    }
    Ok(())
}

/// Resolve the miner from the flag or the configuration file
fn resolve_miner(flag: Option<String>, config: &Config) -> Result<CommandMiner> {
    let template = flag.or_else(|| config.miner.clone()).context(
        "No pattern miner configured. Pass --miner CMD or set `miner` in the --config file",
    )?;
    Ok(CommandMiner::from_template(&template)?)
}

fn dataset_size(dataset: &Path) -> Result<u64> {
    Ok(count_records(open_dataset(dataset)?)?)
}

fn run(command: Command, config: &Config, format: OutputFormat) -> Result<()> {
    match command {
        Command::Bound { dataset, delta } => {
            let report = BoundReport::compute(&dataset, delta.unwrap_or(config.delta))?;
            emit(&report, format)
        }
        Command::SampleSize {
            dataset,
            epsilon,
            delta,
        } => {
            let report = SampleSizeReport::compute(
                &dataset,
                epsilon.unwrap_or(config.epsilon),
                delta.unwrap_or(config.delta),
            )?;
            emit(&report, format)
        }
        Command::Sample {
            dataset,
            size,
            seed,
            output,
        } => {
            let output = output.unwrap_or_else(|| default_output_path(&dataset, "_sample.txt"));
            let records = dataset_size(&dataset)?;
            ensure_smaller_than_dataset(size, records)?;
            let summary = create_sample(&dataset, records, &output, size, seed)?;
            emit(&summary, format)
        }
        Command::Resample {
            dataset,
            seed,
            output,
        } => {
            let output = output
                .unwrap_or_else(|| default_output_path(&dataset, &format!("_S{}.txt", seed)));
            let size = dataset_size(&dataset)?;
            let summary = create_sample(&dataset, size, &output, size, seed)?;
            emit(&summary, format)
        }
        Command::Lengths { dataset } => emit(&LengthStats::from_path(&dataset)?, format),
        Command::Tfsp {
            dataset,
            theta,
            delta,
            fpf,
            miner,
            output,
        } => {
            let params = TfspParams {
                theta,
                delta: delta.unwrap_or(config.delta),
                mode: CorrectionMode::from_fpf_flag(fpf),
            };
            params.validate()?;
            let miner = resolve_miner(miner, config)?;
            let output =
                output.unwrap_or_else(|| default_output_path(&dataset, params.output_suffix()));
            let report = run_tfsp(&dataset, &params, &miner, &output)?;
            emit(&report, format)
        }
        Command::Approx {
            dataset,
            theta,
            epsilon,
            delta,
            fpf,
            seed,
            miner,
            sample_output,
            output,
        } => {
            let params = SamplingParams {
                theta,
                epsilon: epsilon.unwrap_or(config.epsilon),
                delta: delta.unwrap_or(config.delta),
                mode: CorrectionMode::from_fpf_flag(fpf),
                seed,
            };
            params.validate()?;
            let miner = resolve_miner(miner, config)?;
            let sample_output =
                sample_output.unwrap_or_else(|| default_output_path(&dataset, "_sample.txt"));
            let output =
                output.unwrap_or_else(|| default_output_path(&dataset, params.output_suffix()));
            let report = run_sampling(&dataset, &params, &miner, &sample_output, &output)?;
            emit(&report, format)
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    run(args.command, &config, args.format)
}
