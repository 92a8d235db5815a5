//! Acquisition functions turning a surrogate posterior into a utility.

use nalgebra::{DMatrix, DVector};

use crate::error::Result;
use crate::surrogate::Surrogate;

/// Scores candidate rows given a fitted surrogate. Higher is better.
pub trait AcquisitionFunction: Send + Sync {
    /// One utility value per row of `candidates`.
    ///
    /// # Errors
    ///
    /// Returns the surrogate's error if its posterior cannot be computed.
    fn evaluate(&self, surrogate: &dyn Surrogate, candidates: &DMatrix<f64>) -> Result<DVector<f64>>;
}

/// Uses the posterior mean as utility.
#[derive(Clone, Copy, Debug, Default)]
pub struct PosteriorMean;

impl AcquisitionFunction for PosteriorMean {
    fn evaluate(&self, surrogate: &dyn Surrogate, candidates: &DMatrix<f64>) -> Result<DVector<f64>> {
        let (mean, _variance) = surrogate.posterior(candidates)?;
        Ok(mean)
    }
}
