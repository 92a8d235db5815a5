//! Surrogate models consumed by the recommendation loop.
//!
//! Only the contract lives here: a surrogate is fitted on the computational
//! representation of measured points and returns a posterior mean and
//! variance per candidate row.

use nalgebra::{DMatrix, DVector};

use crate::error::{Error, Result};
use crate::searchspace::SearchSpace;

/// A regression model over the computational representation.
pub trait Surrogate: Send + Sync {
    /// Fits the model on `train_x` (`n x k`, columns as in
    /// [`SearchSpace::comp_columns`]) and `train_y` (`n x m`).
    ///
    /// # Errors
    ///
    /// Returns an error if the data does not fit the search space.
    fn fit(
        &mut self,
        searchspace: &SearchSpace,
        train_x: &DMatrix<f64>,
        train_y: &DMatrix<f64>,
    ) -> Result<()>;

    /// Posterior mean and variance for each row of `candidates`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFitted`] before [`fit`](Self::fit) succeeded.
    fn posterior(&self, candidates: &DMatrix<f64>) -> Result<(DVector<f64>, DVector<f64>)>;
}

/// Predicts the mean of the training targets everywhere, with unit variance.
#[derive(Clone, Debug, Default)]
pub struct MeanPredictionSurrogate {
    fitted: Option<Fitted>,
}

#[derive(Clone, Copy, Debug)]
struct Fitted {
    mean: f64,
    n_features: usize,
}

impl MeanPredictionSurrogate {
    /// Creates an unfitted surrogate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The fitted target mean, if any.
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        self.fitted.map(|f| f.mean)
    }
}

impl Surrogate for MeanPredictionSurrogate {
    fn fit(
        &mut self,
        searchspace: &SearchSpace,
        train_x: &DMatrix<f64>,
        train_y: &DMatrix<f64>,
    ) -> Result<()> {
        let columns = searchspace.comp_columns();
        if train_x.ncols() != columns.len() {
            return Err(Error::ColumnMismatch {
                expected: columns,
                got: (0..train_x.ncols()).map(|j| j.to_string()).collect(),
            });
        }
        if train_x.nrows() != train_y.nrows() {
            return Err(Error::RowCountMismatch {
                expected: train_x.nrows(),
                got: train_y.nrows(),
            });
        }
        if train_y.is_empty() {
            return Err(Error::EmptyTrainingData);
        }
        self.fitted = Some(Fitted {
            mean: train_y.mean(),
            n_features: train_x.ncols(),
        });
        Ok(())
    }

    fn posterior(&self, candidates: &DMatrix<f64>) -> Result<(DVector<f64>, DVector<f64>)> {
        let fitted = self.fitted.ok_or(Error::NotFitted)?;
        if candidates.ncols() != fitted.n_features {
            return Err(Error::ColumnMismatch {
                expected: (0..fitted.n_features).map(|j| j.to_string()).collect(),
                got: (0..candidates.ncols()).map(|j| j.to_string()).collect(),
            });
        }
        let n = candidates.nrows();
        Ok((
            DVector::from_element(n, fitted.mean),
            DVector::from_element(n, 1.0),
        ))
    }
}
