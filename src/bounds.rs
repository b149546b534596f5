//! Closed-form deviation and sample-size bounds
//!
//! Both bounds come from the VC-dimension uniform convergence inequality with
//! the rank bound `s` standing in for the empirical VC-dimension:
//!
//! - maximum deviation: `sqrt((s + ln(1/δ)) / (2n))`
//! - required sample size: `ceil((2/ε²) · (s + ln(1/δ)))`
//!
//! Parameters are validated on every call; nothing here holds state.

use crate::error::{Result, SeqBoundError};

/// Reject a confidence parameter outside `(0, 1)`
pub fn validate_delta(delta: f64) -> Result<()> {
    if delta.is_nan() || delta <= 0.0 || delta >= 1.0 {
        return Err(SeqBoundError::InvalidParameter {
            name: "delta",
            value: delta,
            reason: "must be in (0, 1)",
        });
    }
    Ok(())
}

/// Reject an error bound outside `(0, 1)`
pub fn validate_epsilon(epsilon: f64) -> Result<()> {
    if epsilon.is_nan() || epsilon <= 0.0 || epsilon >= 1.0 {
        return Err(SeqBoundError::InvalidParameter {
            name: "epsilon",
            value: epsilon,
            reason: "must be in (0, 1)",
        });
    }
    Ok(())
}

/// Reject a relative frequency threshold outside `(0, 1]`
pub fn validate_theta(theta: f64) -> Result<()> {
    if theta.is_nan() || theta <= 0.0 || theta > 1.0 {
        return Err(SeqBoundError::InvalidParameter {
            name: "theta",
            value: theta,
            reason: "must be in (0, 1]",
        });
    }
    Ok(())
}

/// Upper bound on the deviation between empirical and true frequency of any pattern
///
/// # Example
/// ```
/// use seqbound::bounds::max_deviation;
///
/// let d = max_deviation(3, 5, 0.1).unwrap();
/// assert!((d - 0.7282).abs() < 1e-4);
/// ```
pub fn max_deviation(rank_bound: u64, dataset_size: u64, delta: f64) -> Result<f64> {
    validate_delta(delta)?;
    if dataset_size == 0 {
        return Err(SeqBoundError::InvalidParameter {
            name: "dataset_size",
            value: 0.0,
            reason: "dataset must contain at least one record",
        });
    }

    let numerator = rank_bound as f64 + (1.0 / delta).ln();
    Ok((numerator / (2.0 * dataset_size as f64)).sqrt())
}

/// Sample size guaranteeing an `ε/2` maximum deviation with probability `1 - δ`
///
/// Rounds up so the sample is never under-provisioned.
///
/// # Example
/// ```
/// use seqbound::bounds::required_sample_size;
///
/// assert_eq!(required_sample_size(3, 0.1, 0.1).unwrap(), 1061);
/// ```
pub fn required_sample_size(rank_bound: u64, epsilon: f64, delta: f64) -> Result<u64> {
    validate_epsilon(epsilon)?;
    validate_delta(delta)?;

    let size = (2.0 / epsilon.powi(2)) * (rank_bound as f64 + (1.0 / delta).ln());
    Ok(size.ceil() as u64)
}
