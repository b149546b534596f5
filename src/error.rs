//! Typed failures for dataset passes, bound computations and miner runs
//!
//! Every pass returns `Result<T>`; nothing is recovered locally with a default
//! value, and a failed pass publishes no artifact.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the core passes and the threshold-correction pipeline
#[derive(Error, Debug)]
pub enum SeqBoundError {
    #[error("Dataset not found: {}", path.display())]
    DatasetNotFound { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("Sample size {sample_size} is not smaller than dataset size {dataset_size}; sampling cannot help")]
    SampleSizeTooLarge { sample_size: u64, dataset_size: u64 },

    #[error("Corrected threshold {theta} - {deviation} is not positive")]
    ThresholdUnderflow { theta: f64, deviation: f64 },

    #[error("Invalid value for {name}: {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Pattern miner failed: {0}")]
    MinerFailure(String),

    #[error("Dataset truncated: expected {expected} records, found {found}")]
    DatasetTruncated { expected: u64, found: u64 },

    #[error("Sample index {index} outside dataset of {dataset_size} records")]
    IndexOutOfRange { index: u64, dataset_size: u64 },

    #[error("Output {} would overwrite its own input", path.display())]
    OutputOverwritesInput { path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Report serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for all library operations
pub type Result<T> = std::result::Result<T, SeqBoundError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SeqBoundError = io.into();
        assert!(matches!(err, SeqBoundError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_display_mentions_values() {
        let err = SeqBoundError::SampleSizeTooLarge {
            sample_size: 11443,
            dataset_size: 1000,
        };
        let msg = err.to_string();
        assert!(msg.contains("11443"));
        assert!(msg.contains("1000"));
    }

    #[test]
    fn test_invalid_parameter_display() {
        let err = SeqBoundError::InvalidParameter {
            name: "delta",
            value: 0.0,
            reason: "must be in (0, 1)",
        };
        assert_eq!(err.to_string(), "Invalid value for delta: 0 (must be in (0, 1))");
    }
}
