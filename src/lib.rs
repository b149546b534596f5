//! seqbound - statistically sound thresholds for sequential pattern mining
//!
//! This library provides the streaming passes that let a frequent sequential
//! pattern miner report patterns with probabilistic guarantees instead of
//! plain empirical frequencies: the rank bound (an upper bound on the
//! empirical VC-dimension) of a dataset, the deviation and sample-size bounds
//! derived from it, one-pass sample extraction, and the threshold correction
//! that ties them to an external miner.

pub mod bounds;
pub mod cli;
pub mod config;
pub mod error;
pub mod lengths;
pub mod miner;
pub mod pipeline;
pub mod rank_bound;
pub mod record;
pub mod report;
pub mod sampler;

pub use error::{Result, SeqBoundError};
