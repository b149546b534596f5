//! Command reports and their text/JSON rendering
//!
//! Every command produces a `Serialize` report. Rendering is a pure function
//! of the report; nothing is cached between calls.

use crate::bounds::{max_deviation, required_sample_size};
use crate::error::Result;
use crate::rank_bound::compute_rank_bound;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Rank bound and maximum deviation of a dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundReport {
    pub dataset: PathBuf,
    pub rank_bound: u64,
    pub dataset_size: u64,
    pub delta: f64,
    pub max_deviation: f64,
}

impl BoundReport {
    pub fn compute(dataset: &Path, delta: f64) -> Result<Self> {
        crate::bounds::validate_delta(delta)?;
        let bound = compute_rank_bound(dataset)?;
        Ok(Self {
            dataset: dataset.to_path_buf(),
            rank_bound: bound.rank_bound,
            dataset_size: bound.dataset_size,
            delta,
            max_deviation: max_deviation(bound.rank_bound, bound.dataset_size, delta)?,
        })
    }
}

/// Rank bound and required sample size of a dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSizeReport {
    pub dataset: PathBuf,
    pub rank_bound: u64,
    pub dataset_size: u64,
    pub epsilon: f64,
    pub delta: f64,
    pub sample_size: u64,
    /// `sample_size / dataset_size`; above 1 means sampling cannot help
    pub sample_ratio: f64,
}

impl SampleSizeReport {
    /// Informational: does not fail when the sample would exceed the dataset
    pub fn compute(dataset: &Path, epsilon: f64, delta: f64) -> Result<Self> {
        crate::bounds::validate_epsilon(epsilon)?;
        crate::bounds::validate_delta(delta)?;
        let bound = compute_rank_bound(dataset)?;
        let sample_size = required_sample_size(bound.rank_bound, epsilon, delta)?;
        let sample_ratio = if bound.dataset_size == 0 {
            f64::INFINITY
        } else {
            sample_size as f64 / bound.dataset_size as f64
        };
        Ok(Self {
            dataset: dataset.to_path_buf(),
            rank_bound: bound.rank_bound,
            dataset_size: bound.dataset_size,
            epsilon,
            delta,
            sample_size,
            sample_ratio,
        })
    }
}

/// Pretty JSON rendering
pub fn render_json<T: Serialize>(report: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// `key: value` lines; nested objects use dotted keys
///
/// # Example
/// ```
/// use seqbound::report::render_text;
///
/// #[derive(serde::Serialize)]
/// struct Inner { count: u64 }
/// #[derive(serde::Serialize)]
/// struct Outer { name: &'static str, inner: Inner }
///
/// let text = render_text(&Outer { name: "x", inner: Inner { count: 3 } }).unwrap();
/// assert_eq!(text, "name: x\ninner.count: 3\n");
/// ```
pub fn render_text<T: Serialize>(report: &T) -> Result<String> {
    let value = serde_json::to_value(report)?;
    let mut out = String::new();
    write_value(&mut out, "", &value);
    Ok(out)
}

fn write_value(out: &mut String, prefix: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let name = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                write_value(out, &name, child);
            }
        }
        Value::String(s) => out.push_str(&format!("{}: {}\n", prefix, s)),
        Value::Null => out.push_str(&format!("{}: -\n", prefix)),
        other => out.push_str(&format!("{}: {}\n", prefix, other)),
    }
}
