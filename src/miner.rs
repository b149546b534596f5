//! Pattern miner boundary
//!
//! The frequent-sequence miner is an external collaborator. It is driven
//! through files: the dataset (or sample) goes in as a path, and the miner
//! writes one line per pattern,
//!
//! ```text
//! <pattern-encoding> #SUP: <absolute-support>
//! ```
//!
//! Pattern encodings are never interpreted here; only supports and the
//! pattern count are read back.

use crate::bounds::validate_theta;
use crate::error::{Result, SeqBoundError};
use crate::record::ensure_distinct_output;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Separator between pattern encoding and support in miner output
pub const SUPPORT_SEPARATOR: &str = " #SUP: ";

/// Result of a miner run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MiningOutcome {
    pub output_path: PathBuf,
    pub pattern_count: u64,
    /// False when no pattern could reach the threshold and the miner was skipped
    pub miner_run: bool,
}

/// Anything that turns a dataset file and a relative threshold into a pattern file
pub trait PatternMiner {
    fn mine(&self, dataset: &Path, relative_threshold: f64, output: &Path)
        -> Result<MiningOutcome>;
}

/// One line of miner output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternLine<'a> {
    /// Opaque pattern encoding
    pub pattern: &'a str,
    /// Absolute support count
    pub support: u64,
}

impl<'a> PatternLine<'a> {
    /// Split a `<pattern> #SUP: <n>` line
    ///
    /// # Example
    /// ```
    /// use seqbound::miner::PatternLine;
    ///
    /// let line = PatternLine::parse("1 -1 2 -1 #SUP: 42").unwrap();
    /// assert_eq!(line.pattern, "1 -1 2 -1");
    /// assert_eq!(line.support, 42);
    /// ```
    pub fn parse(line: &'a str) -> Option<Self> {
        let (pattern, support) = line.rsplit_once(SUPPORT_SEPARATOR)?;
        let support = support.trim().parse().ok()?;
        Some(Self { pattern, support })
    }

    /// Support divided by the size of the mined dataset
    pub fn relative_support(&self, dataset_size: u64) -> f64 {
        if dataset_size == 0 {
            return 0.0;
        }
        self.support as f64 / dataset_size as f64
    }
}

/// Count the patterns of a miner output file, checking every line's format
pub fn count_patterns(output: &Path) -> Result<u64> {
    let reader = BufReader::new(File::open(output)?);
    let mut count = 0u64;
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if PatternLine::parse(&line).is_none() {
            return Err(SeqBoundError::MinerFailure(format!(
                "unparsable pattern at {}:{}: {}",
                output.display(),
                i + 1,
                line
            )));
        }
        count += 1;
    }
    Ok(count)
}

/// Miner run as an external process
///
/// The command is a whitespace-separated template; the placeholders
/// `{input}`, `{output}` and `{threshold}` are substituted in every argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMiner {
    program: String,
    args: Vec<String>,
}

impl CommandMiner {
    /// Parse a command template such as
    /// `java -jar spmf.jar run PrefixSpan {input} {output} {threshold}`
    pub fn from_template(template: &str) -> Result<Self> {
        let mut parts = template.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| SeqBoundError::Config("miner command is empty".to_string()))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments with placeholders filled in
    pub fn render_args(&self, dataset: &Path, threshold: f64, output: &Path) -> Vec<String> {
        let input = dataset.display().to_string();
        let output = output.display().to_string();
        let threshold = threshold.to_string();
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{input}", &input)
                    .replace("{output}", &output)
                    .replace("{threshold}", &threshold)
            })
            .collect()
    }
}

impl PatternMiner for CommandMiner {
    fn mine(
        &self,
        dataset: &Path,
        relative_threshold: f64,
        output: &Path,
    ) -> Result<MiningOutcome> {
        validate_theta(relative_threshold)?;
        ensure_distinct_output(dataset, output)?;

        // A stale pattern file must not be mistaken for this run's output
        if output.exists() {
            std::fs::remove_file(output)?;
        }

        let args = self.render_args(dataset, relative_threshold, output);
        tracing::debug!(program = %self.program, ?args, "running pattern miner");

        let result = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| {
                SeqBoundError::MinerFailure(format!("cannot start {}: {}", self.program, e))
            })?;

        if !result.status.success() {
            return Err(SeqBoundError::MinerFailure(format!(
                "{} exited with {}: {}",
                self.program,
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }

        if !output.exists() {
            return Err(SeqBoundError::MinerFailure(format!(
                "{} produced no output at {}",
                self.program,
                output.display()
            )));
        }

        let pattern_count = count_patterns(output)?;
        Ok(MiningOutcome {
            output_path: output.to_path_buf(),
            pattern_count,
            miner_run: true,
        })
    }
}
