use crate::constraint::Constraint;
use crate::error::{Error, Result};
use crate::parameter::Parameter;

use super::SearchSpace;

/// A builder for constructing [`SearchSpace`] instances with a fluent API.
///
/// Created via [`SearchSpace::builder()`].
///
/// # Defaults
///
/// - No parameters and no constraints
/// - Computational representation enabled
/// - No limit on the size of the discrete product space
///
/// # Examples
///
/// ```
/// use searchspace::parameter::{CategoricalParameter, NumericalDiscreteParameter};
/// use searchspace::{Error, SearchSpace};
///
/// let space = SearchSpace::builder()
///     .parameter(CategoricalParameter::new("solvent", ["water", "thf"]))
///     .parameter(NumericalDiscreteParameter::new("temp", [20.0, 40.0, 60.0]))
///     .max_product_rows(1_000)
///     .build()
///     .unwrap();
/// assert_eq!(space.discrete().n_rows(), 6);
///
/// let too_large = SearchSpace::builder()
///     .parameter(NumericalDiscreteParameter::new("n", (0..100).map(f64::from)))
///     .parameter(NumericalDiscreteParameter::new("m", (0..100).map(f64::from)))
///     .max_product_rows(1_000)
///     .build();
/// assert!(matches!(too_large, Err(Error::ProductSpaceTooLarge { .. })));
/// ```
#[derive(Clone, Debug, Default)]
pub struct SearchSpaceBuilder {
    parameters: Vec<Parameter>,
    constraints: Vec<Constraint>,
    empty_encoding: bool,
    max_product_rows: Option<usize>,
}

impl SearchSpaceBuilder {
    /// Create a new builder with default settings.
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Add a parameter.
    #[must_use]
    pub fn parameter(mut self, parameter: impl Into<Parameter>) -> Self {
        self.parameters.push(parameter.into());
        self
    }

    /// Add several parameters.
    #[must_use]
    pub fn parameters(mut self, parameters: impl IntoIterator<Item = Parameter>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// Add a constraint.
    #[must_use]
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Add several constraints.
    #[must_use]
    pub fn constraints(mut self, constraints: impl IntoIterator<Item = Constraint>) -> Self {
        self.constraints.extend(constraints);
        self
    }

    /// Skip the computational representation of the discrete subspace.
    #[must_use]
    pub fn empty_encoding(mut self, empty_encoding: bool) -> Self {
        self.empty_encoding = empty_encoding;
        self
    }

    /// Refuse to enumerate discrete product spaces with more rows than `limit`.
    ///
    /// The check uses the unconstrained product size and runs before anything
    /// is materialized.
    #[must_use]
    pub fn max_product_rows(mut self, limit: usize) -> Self {
        self.max_product_rows = Some(limit);
        self
    }

    /// Build the [`SearchSpace`] with the configured options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProductSpaceTooLarge`] if the row limit is exceeded and
    /// any error of [`SearchSpace::create`].
    pub fn build(self) -> Result<SearchSpace> {
        if let Some(limit) = self.max_product_rows {
            let size = SearchSpace::estimate_product_space_size(&self.parameters)?;
            let rows = size.exp_rep_shape.0;
            if rows > limit as u128 {
                return Err(Error::ProductSpaceTooLarge { rows, limit });
            }
        }
        SearchSpace::create(self.parameters, self.constraints, self.empty_encoding)
    }
}
