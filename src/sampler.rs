//! One-pass extraction of a fixed-size random sample of records
//!
//! Indices are drawn independently and uniformly from `[0, dataset_size)`
//! with a seeded generator, so the sample is drawn with replacement: a
//! repeated index yields a repeated output record. The indices are sorted and
//! the dataset is read forward exactly once, emitting the record under the
//! cursor for each target index.
//!
//! Memory use is the index buffer plus one record; nothing else from the
//! dataset is held.

use crate::error::{Result, SeqBoundError};
use crate::record::{ensure_distinct_output, open_dataset};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

/// Sorted record indices to extract from a dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePlan {
    dataset_size: u64,
    indices: Vec<u64>,
}

impl SamplePlan {
    /// Draw `sample_size` indices uniformly with replacement
    ///
    /// The same `(dataset_size, sample_size, seed)` always yields the same plan.
    pub fn draw(dataset_size: u64, sample_size: u64, seed: u64) -> Result<Self> {
        if dataset_size == 0 && sample_size > 0 {
            return Err(SeqBoundError::InvalidParameter {
                name: "dataset_size",
                value: 0.0,
                reason: "cannot sample from an empty dataset",
            });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let indices = (0..sample_size)
            .map(|_| rng.gen_range(0..dataset_size))
            .collect();
        Self::from_indices(dataset_size, indices)
    }

    /// Build a plan from caller-chosen indices
    ///
    /// Callers wanting sampling without replacement de-duplicate before
    /// calling this.
    pub fn from_indices(dataset_size: u64, mut indices: Vec<u64>) -> Result<Self> {
        if let Some(&index) = indices.iter().find(|&&i| i >= dataset_size) {
            return Err(SeqBoundError::IndexOutOfRange {
                index,
                dataset_size,
            });
        }
        indices.sort_unstable();
        Ok(Self {
            dataset_size,
            indices,
        })
    }

    /// Indices in ascending order
    pub fn indices(&self) -> &[u64] {
        &self.indices
    }

    /// Number of records the plan will emit
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// True when the plan emits nothing
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Declared size of the source dataset
    pub fn dataset_size(&self) -> u64 {
        self.dataset_size
    }

    /// True when at least one index was drawn more than once
    pub fn has_repeats(&self) -> bool {
        self.indices.windows(2).any(|w| w[0] == w[1])
    }

    /// Stream the planned records from `reader` into `writer`
    ///
    /// Records are copied byte for byte, line terminator included; a final
    /// record without one gets `\n`. Returns the number of records written,
    /// always `self.len()`. Fails with `DatasetTruncated` if the reader holds
    /// fewer than `dataset_size` records.
    pub fn extract<R: BufRead, W: Write>(&self, mut reader: R, writer: &mut W) -> Result<u64> {
        let truncated = |found: u64| SeqBoundError::DatasetTruncated {
            expected: self.dataset_size,
            found,
        };
        let mut current = String::new();
        // Index of the next line `reader` will yield
        let mut next = 0u64;
        let mut written = 0u64;

        for &idx in &self.indices {
            while next <= idx {
                current.clear();
                if reader.read_line(&mut current)? == 0 {
                    return Err(truncated(next));
                }
                if !current.ends_with('\n') {
                    current.push('\n');
                }
                next += 1;
            }
            writer.write_all(current.as_bytes())?;
            written += 1;
        }

        // Finish the pass to confirm the declared size
        while next < self.dataset_size {
            current.clear();
            if reader.read_line(&mut current)? == 0 {
                return Err(truncated(next));
            }
            next += 1;
        }
        current.clear();
        if reader.read_line(&mut current)? > 0 {
            tracing::warn!(
                dataset_size = self.dataset_size,
                "dataset holds more records than declared; trailing records were never sampled"
            );
        }

        Ok(written)
    }
}

/// Fail with `SampleSizeTooLarge` unless the sample is smaller than the dataset
pub fn ensure_smaller_than_dataset(sample_size: u64, dataset_size: u64) -> Result<()> {
    if sample_size >= dataset_size {
        return Err(SeqBoundError::SampleSizeTooLarge {
            sample_size,
            dataset_size,
        });
    }
    Ok(())
}

/// Summary of a completed sample extraction
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SampleSummary {
    pub dataset_size: u64,
    pub sample_size: u64,
    pub seed: u64,
    pub repeated_indices: bool,
}

/// Write a with-replacement sample of `dataset` to `sample_path`
///
/// The sample is written to a temporary file beside `sample_path` and only
/// moved into place once the whole pass succeeded. `sample_path` may not be
/// the dataset itself.
pub fn create_sample(
    dataset: &Path,
    dataset_size: u64,
    sample_path: &Path,
    sample_size: u64,
    seed: u64,
) -> Result<SampleSummary> {
    ensure_distinct_output(dataset, sample_path)?;
    let plan = SamplePlan::draw(dataset_size, sample_size, seed)?;
    let reader = open_dataset(dataset)?;

    let dir = match sample_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staging = tempfile::NamedTempFile::new_in(dir)?;
    let mut writer = BufWriter::new(staging);

    tracing::debug!(
        dataset = %dataset.display(),
        dataset_size,
        sample_size,
        seed,
        "extracting sample"
    );
    let written = plan.extract(reader, &mut writer)?;

    let staging = writer
        .into_inner()
        .map_err(|e| SeqBoundError::Io(e.into_error()))?;
    staging
        .persist(sample_path)
        .map_err(|e| SeqBoundError::Io(e.error))?;

    Ok(SampleSummary {
        dataset_size,
        sample_size: written,
        seed,
        repeated_indices: plan.has_repeats(),
    })
}
