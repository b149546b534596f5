//! Threshold correction and miner orchestration
//!
//! Two ways to obtain a deviation estimate `d`:
//!
//! - full dataset: `d = max_deviation(s, |D|, δ)` from a rank bound pass over `D`
//! - sampling: a sample of `required_sample_size(s, ε, δ)` records guarantees
//!   `d = ε/2` and is mined instead of `D`
//!
//! and two ways to apply it to the nominal threshold `θ`:
//!
//! - false-positive-free: `θ + d`, every reported pattern is frequent in the population
//! - ε-approximate: `θ - d`, every pattern frequent at `θ` is reported
//!
//! A raised threshold above 1 cannot be met by any pattern; the miner is then
//! skipped and an empty pattern file is written.

use crate::bounds::{
    max_deviation, required_sample_size, validate_delta, validate_epsilon, validate_theta,
};
use crate::error::{Result, SeqBoundError};
use crate::miner::{MiningOutcome, PatternMiner};
use crate::rank_bound::{compute_rank_bound, BoundResult};
use crate::record::ensure_distinct_output;
use crate::sampler::{create_sample, ensure_smaller_than_dataset, SampleSummary};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Direction of the threshold correction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionMode {
    /// `θ + d`: no false positives with probability `1 - δ`
    FalsePositiveFree,
    /// `θ - d`: no false negatives with probability `1 - δ`
    EpsilonApproximate,
}

impl CorrectionMode {
    pub fn from_fpf_flag(fpf: bool) -> Self {
        if fpf {
            CorrectionMode::FalsePositiveFree
        } else {
            CorrectionMode::EpsilonApproximate
        }
    }

    pub fn is_fpf(&self) -> bool {
        matches!(self, CorrectionMode::FalsePositiveFree)
    }
}

/// Apply a deviation to the nominal threshold
///
/// # Example
/// ```
/// use seqbound::pipeline::{correct_threshold, CorrectionMode};
///
/// let raised = correct_threshold(0.2, 0.05, CorrectionMode::FalsePositiveFree).unwrap();
/// assert!((raised - 0.25).abs() < 1e-12);
/// assert!(correct_threshold(0.04, 0.05, CorrectionMode::EpsilonApproximate).is_err());
/// ```
pub fn correct_threshold(theta: f64, deviation: f64, mode: CorrectionMode) -> Result<f64> {
    match mode {
        CorrectionMode::FalsePositiveFree => Ok(theta + deviation),
        CorrectionMode::EpsilonApproximate => {
            let corrected = theta - deviation;
            if corrected <= 0.0 {
                return Err(SeqBoundError::ThresholdUnderflow { theta, deviation });
            }
            Ok(corrected)
        }
    }
}

/// `<dir>/<stem><suffix>` next to the dataset
pub fn default_output_path(dataset: &Path, suffix: &str) -> PathBuf {
    let stem = dataset
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string());
    dataset.with_file_name(format!("{}{}", stem, suffix))
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Mine `input` at `threshold`, or write an empty pattern file when the
/// threshold exceeds 1
fn mine_or_empty(
    miner: &dyn PatternMiner,
    input: &Path,
    threshold: f64,
    output: &Path,
) -> Result<MiningOutcome> {
    if threshold <= 1.0 {
        return miner.mine(input, threshold, output);
    }

    ensure_distinct_output(input, output)?;
    tracing::info!(threshold, "corrected threshold above 1, skipping miner");
    std::fs::write(output, "")?;
    Ok(MiningOutcome {
        output_path: output.to_path_buf(),
        pattern_count: 0,
        miner_run: false,
    })
}

/// Parameters of a full-dataset correction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TfspParams {
    pub theta: f64,
    pub delta: f64,
    pub mode: CorrectionMode,
}

impl TfspParams {
    pub fn validate(&self) -> Result<()> {
        validate_theta(self.theta)?;
        validate_delta(self.delta)
    }

    pub fn output_suffix(&self) -> &'static str {
        if self.mode.is_fpf() {
            "_TFSP_FPF_Approx.txt"
        } else {
            "_TFSP_Approx.txt"
        }
    }
}

/// Corrected threshold for mining the full dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TfspPlan {
    pub bound: BoundResult,
    pub max_deviation: f64,
    pub theta: f64,
    pub corrected_theta: f64,
    pub mode: CorrectionMode,
    pub bound_time_ms: u64,
}

/// Rank bound pass over the dataset followed by threshold correction
pub fn plan_tfsp(dataset: &Path, params: &TfspParams) -> Result<TfspPlan> {
    params.validate()?;

    let start = Instant::now();
    let bound = compute_rank_bound(dataset)?;
    let deviation = max_deviation(bound.rank_bound, bound.dataset_size, params.delta)?;
    let bound_time_ms = elapsed_ms(start);

    let corrected_theta = correct_threshold(params.theta, deviation, params.mode)?;
    tracing::info!(
        rank_bound = bound.rank_bound,
        max_deviation = deviation,
        corrected_theta,
        "full-dataset threshold corrected"
    );

    Ok(TfspPlan {
        bound,
        max_deviation: deviation,
        theta: params.theta,
        corrected_theta,
        mode: params.mode,
        bound_time_ms,
    })
}

/// Full-dataset run: plan plus miner outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TfspReport {
    pub dataset: PathBuf,
    #[serde(flatten)]
    pub plan: TfspPlan,
    pub mining: MiningOutcome,
    pub mining_time_ms: u64,
}

/// Correct the threshold on the full dataset and mine it
pub fn run_tfsp(
    dataset: &Path,
    params: &TfspParams,
    miner: &dyn PatternMiner,
    output: &Path,
) -> Result<TfspReport> {
    let plan = plan_tfsp(dataset, params)?;

    let start = Instant::now();
    let mining = mine_or_empty(miner, dataset, plan.corrected_theta, output)?;
    let mining_time_ms = elapsed_ms(start);

    Ok(TfspReport {
        dataset: dataset.to_path_buf(),
        plan,
        mining,
        mining_time_ms,
    })
}

/// Parameters of a sampling run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub theta: f64,
    pub epsilon: f64,
    pub delta: f64,
    pub mode: CorrectionMode,
    pub seed: u64,
}

impl SamplingParams {
    pub fn validate(&self) -> Result<()> {
        validate_theta(self.theta)?;
        validate_epsilon(self.epsilon)?;
        validate_delta(self.delta)
    }

    pub fn output_suffix(&self) -> &'static str {
        if self.mode.is_fpf() {
            "_FPF_Approx.txt"
        } else {
            "_Approx.txt"
        }
    }
}

/// Sample size and corrected threshold for mining a sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplingPlan {
    pub bound: BoundResult,
    pub sample_size: u64,
    pub sample_ratio: f64,
    /// `ε/2`, the deviation the sample size guarantees
    pub deviation: f64,
    /// `max_deviation` recomputed at the rounded-up sample size
    pub sample_max_deviation: f64,
    pub theta: f64,
    pub corrected_theta: f64,
    pub mode: CorrectionMode,
    pub seed: u64,
    pub sample_size_time_ms: u64,
}

/// Rank bound pass, sample sizing and threshold correction
///
/// Fails with `SampleSizeTooLarge` when the sample would not be smaller than
/// the dataset.
pub fn plan_sampling(dataset: &Path, params: &SamplingParams) -> Result<SamplingPlan> {
    params.validate()?;

    let start = Instant::now();
    let bound = compute_rank_bound(dataset)?;
    let sample_size = required_sample_size(bound.rank_bound, params.epsilon, params.delta)?;
    let sample_size_time_ms = elapsed_ms(start);

    ensure_smaller_than_dataset(sample_size, bound.dataset_size)?;

    let deviation = params.epsilon / 2.0;
    let corrected_theta = correct_threshold(params.theta, deviation, params.mode)?;
    let sample_max_deviation = max_deviation(bound.rank_bound, sample_size, params.delta)?;

    tracing::info!(
        rank_bound = bound.rank_bound,
        dataset_size = bound.dataset_size,
        sample_size,
        corrected_theta,
        "sampling plan ready"
    );

    Ok(SamplingPlan {
        bound,
        sample_size,
        sample_ratio: sample_size as f64 / bound.dataset_size as f64,
        deviation,
        sample_max_deviation,
        theta: params.theta,
        corrected_theta,
        mode: params.mode,
        seed: params.seed,
        sample_size_time_ms,
    })
}

/// Sampling run: plan, extracted sample and miner outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplingReport {
    pub dataset: PathBuf,
    pub sample_path: PathBuf,
    #[serde(flatten)]
    pub plan: SamplingPlan,
    pub sample: SampleSummary,
    pub sample_creation_time_ms: u64,
    pub mining: MiningOutcome,
    pub mining_time_ms: u64,
}

/// Plan a sample, extract it to `sample_path` and mine it
pub fn run_sampling(
    dataset: &Path,
    params: &SamplingParams,
    miner: &dyn PatternMiner,
    sample_path: &Path,
    output: &Path,
) -> Result<SamplingReport> {
    let plan = plan_sampling(dataset, params)?;

    let start = Instant::now();
    let sample = create_sample(
        dataset,
        plan.bound.dataset_size,
        sample_path,
        plan.sample_size,
        params.seed,
    )?;
    let sample_creation_time_ms = elapsed_ms(start);

    let start = Instant::now();
    let mining = mine_or_empty(miner, sample_path, plan.corrected_theta, output)?;
    let mining_time_ms = elapsed_ms(start);

    Ok(SamplingReport {
        dataset: dataset.to_path_buf(),
        sample_path: sample_path.to_path_buf(),
        plan,
        sample,
        sample_creation_time_ms,
        mining,
        mining_time_ms,
    })
}
