//! Constraints restricting the valid parameter combinations.
//!
//! Discrete constraints are evaluated while the discrete subspace is
//! enumerated and remove invalid rows. Continuous constraints are never
//! materialized; they are stored with the continuous subspace and evaluated
//! on candidate points by whoever generates them.
//!
//! # Example
//!
//! ```
//! use searchspace::constraint::{Condition, Constraint, ThresholdOperator};
//!
//! // The two fractions must not add up to more than 100.
//! let sum = Constraint::discrete_sum(
//!     ["frac_a", "frac_b"],
//!     Condition::threshold(100.0, ThresholdOperator::Le),
//! );
//! assert!(sum.eval_during_creation());
//! ```

mod condition;
mod validation;

use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use self::condition::{Condition, DEFAULT_EQUALITY_TOLERANCE, ThresholdOperator};
pub use self::validation::validate_constraints;
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::param::{ParamValue, ValueKey};

/// Absolute tolerance used when checking continuous linear constraints.
pub const LINEAR_TOLERANCE: f64 = 1e-8;

/// How the per-parameter results of an exclusion constraint are combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Combiner {
    /// A row is excluded if all conditions hold.
    #[default]
    And,
    /// A row is excluded if any condition holds.
    Or,
}

/// A restriction on the valid parameter combinations.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum Constraint {
    /// Excludes rows where the combined conditions hold.
    DiscreteExclude {
        /// Parameters the conditions apply to, one per condition.
        parameters: Vec<String>,
        /// One condition per parameter.
        conditions: Vec<Condition>,
        /// How the condition results are combined.
        combiner: Combiner,
    },
    /// Keeps rows whose parameter sum satisfies the condition.
    DiscreteSum {
        /// Numerical parameters that are summed.
        parameters: Vec<String>,
        /// Condition on the sum.
        condition: Condition,
    },
    /// Keeps rows whose parameter product satisfies the condition.
    DiscreteProduct {
        /// Numerical parameters that are multiplied.
        parameters: Vec<String>,
        /// Condition on the product.
        condition: Condition,
    },
    /// Excludes rows in which two of the parameters carry the same value.
    DiscreteNoLabelDuplicates {
        /// Parameters whose values must be pairwise different.
        parameters: Vec<String>,
    },
    /// Excludes rows in which the parameters do not all carry the same value.
    DiscreteLinkedParameters {
        /// Parameters whose values must be identical.
        parameters: Vec<String>,
    },
    /// Declares parameters that are irrelevant unless a condition holds.
    ///
    /// Whenever the condition of `parameters[k]` is not fulfilled, the values
    /// of `affected_parameters[k]` are ignored, and of all rows that then
    /// coincide only the first is kept.
    DiscreteDependencies {
        /// Parameters the others depend on.
        parameters: Vec<String>,
        /// One condition per parameter.
        conditions: Vec<Condition>,
        /// The dependent parameters, one list per parameter.
        affected_parameters: Vec<Vec<String>>,
    },
    /// `sum(coefficients[i] * x[i]) == rhs`
    ContinuousLinearEquality {
        /// Continuous parameters.
        parameters: Vec<String>,
        /// One coefficient per parameter.
        coefficients: Vec<f64>,
        /// Right-hand side.
        rhs: f64,
    },
    /// `sum(coefficients[i] * x[i]) >= rhs`
    ContinuousLinearInequality {
        /// Continuous parameters.
        parameters: Vec<String>,
        /// One coefficient per parameter.
        coefficients: Vec<f64>,
        /// Right-hand side.
        rhs: f64,
    },
    /// Limits how many of the parameters may be nonzero.
    ContinuousCardinality {
        /// Continuous parameters.
        parameters: Vec<String>,
        /// Minimum number of nonzero parameters.
        min_cardinality: usize,
        /// Maximum number of nonzero parameters.
        max_cardinality: usize,
    },
}

fn names<S: Into<String>>(parameters: impl IntoIterator<Item = S>) -> Vec<String> {
    parameters.into_iter().map(Into::into).collect()
}

impl Constraint {
    /// Creates an exclusion constraint combining its conditions with `And`.
    #[must_use]
    pub fn discrete_exclude<S: Into<String>>(
        parameters: impl IntoIterator<Item = S>,
        conditions: Vec<Condition>,
    ) -> Self {
        Self::DiscreteExclude {
            parameters: names(parameters),
            conditions,
            combiner: Combiner::And,
        }
    }

    /// Sets the combiner of an exclusion constraint. Has no effect on other kinds.
    #[must_use]
    pub fn combiner(mut self, value: Combiner) -> Self {
        if let Self::DiscreteExclude { combiner, .. } = &mut self {
            *combiner = value;
        }
        self
    }

    /// Creates a sum constraint.
    #[must_use]
    pub fn discrete_sum<S: Into<String>>(
        parameters: impl IntoIterator<Item = S>,
        condition: Condition,
    ) -> Self {
        Self::DiscreteSum {
            parameters: names(parameters),
            condition,
        }
    }

    /// Creates a product constraint.
    #[must_use]
    pub fn discrete_product<S: Into<String>>(
        parameters: impl IntoIterator<Item = S>,
        condition: Condition,
    ) -> Self {
        Self::DiscreteProduct {
            parameters: names(parameters),
            condition,
        }
    }

    /// Creates a no-label-duplicates constraint.
    #[must_use]
    pub fn no_label_duplicates<S: Into<String>>(parameters: impl IntoIterator<Item = S>) -> Self {
        Self::DiscreteNoLabelDuplicates {
            parameters: names(parameters),
        }
    }

    /// Creates a linked-parameters constraint.
    #[must_use]
    pub fn linked_parameters<S: Into<String>>(parameters: impl IntoIterator<Item = S>) -> Self {
        Self::DiscreteLinkedParameters {
            parameters: names(parameters),
        }
    }

    /// Creates a dependencies constraint.
    #[must_use]
    pub fn dependencies<S: Into<String>>(
        parameters: impl IntoIterator<Item = S>,
        conditions: Vec<Condition>,
        affected_parameters: Vec<Vec<String>>,
    ) -> Self {
        Self::DiscreteDependencies {
            parameters: names(parameters),
            conditions,
            affected_parameters,
        }
    }

    /// Creates a linear equality constraint. Without coefficients all are one.
    #[must_use]
    pub fn linear_equality<S: Into<String>>(
        parameters: impl IntoIterator<Item = S>,
        coefficients: Option<Vec<f64>>,
        rhs: f64,
    ) -> Self {
        let parameters = names(parameters);
        let coefficients = coefficients.unwrap_or_else(|| vec![1.0; parameters.len()]);
        Self::ContinuousLinearEquality {
            parameters,
            coefficients,
            rhs,
        }
    }

    /// Creates a linear inequality constraint. Without coefficients all are one.
    #[must_use]
    pub fn linear_inequality<S: Into<String>>(
        parameters: impl IntoIterator<Item = S>,
        coefficients: Option<Vec<f64>>,
        rhs: f64,
    ) -> Self {
        let parameters = names(parameters);
        let coefficients = coefficients.unwrap_or_else(|| vec![1.0; parameters.len()]);
        Self::ContinuousLinearInequality {
            parameters,
            coefficients,
            rhs,
        }
    }

    /// Creates a cardinality constraint.
    #[must_use]
    pub fn cardinality<S: Into<String>>(
        parameters: impl IntoIterator<Item = S>,
        min_cardinality: usize,
        max_cardinality: usize,
    ) -> Self {
        Self::ContinuousCardinality {
            parameters: names(parameters),
            min_cardinality,
            max_cardinality,
        }
    }

    /// A stable name of the constraint kind, used in errors and logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DiscreteExclude { .. } => "DiscreteExcludeConstraint",
            Self::DiscreteSum { .. } => "DiscreteSumConstraint",
            Self::DiscreteProduct { .. } => "DiscreteProductConstraint",
            Self::DiscreteNoLabelDuplicates { .. } => "DiscreteNoLabelDuplicatesConstraint",
            Self::DiscreteLinkedParameters { .. } => "DiscreteLinkedParametersConstraint",
            Self::DiscreteDependencies { .. } => "DiscreteDependenciesConstraint",
            Self::ContinuousLinearEquality { .. } => "ContinuousLinearEqualityConstraint",
            Self::ContinuousLinearInequality { .. } => "ContinuousLinearInequalityConstraint",
            Self::ContinuousCardinality { .. } => "ContinuousCardinalityConstraint",
        }
    }

    /// The parameters the constraint is declared over.
    #[must_use]
    pub fn parameters(&self) -> &[String] {
        match self {
            Self::DiscreteExclude { parameters, .. }
            | Self::DiscreteSum { parameters, .. }
            | Self::DiscreteProduct { parameters, .. }
            | Self::DiscreteNoLabelDuplicates { parameters }
            | Self::DiscreteLinkedParameters { parameters }
            | Self::DiscreteDependencies { parameters, .. }
            | Self::ContinuousLinearEquality { parameters, .. }
            | Self::ContinuousLinearInequality { parameters, .. }
            | Self::ContinuousCardinality { parameters, .. } => parameters,
        }
    }

    /// Every parameter name the constraint touches, including dependents.
    #[must_use]
    pub fn referenced_parameters(&self) -> Vec<&str> {
        let mut all: Vec<&str> = self.parameters().iter().map(String::as_str).collect();
        if let Self::DiscreteDependencies {
            affected_parameters,
            ..
        } = self
        {
            all.extend(affected_parameters.iter().flatten().map(String::as_str));
        }
        all
    }

    /// Whether the constraint applies to discrete parameters.
    #[must_use]
    pub fn is_discrete(&self) -> bool {
        !self.is_continuous()
    }

    /// Whether the constraint applies to continuous parameters.
    #[must_use]
    pub fn is_continuous(&self) -> bool {
        matches!(
            self,
            Self::ContinuousLinearEquality { .. }
                | Self::ContinuousLinearInequality { .. }
                | Self::ContinuousCardinality { .. }
        )
    }

    /// Whether the constraint filters rows while the discrete space is built.
    #[must_use]
    pub fn eval_during_creation(&self) -> bool {
        self.is_discrete()
    }

    /// Position in the fixed evaluation order. Later kinds may rely on rows
    /// already removed by earlier ones.
    #[must_use]
    pub fn evaluation_rank(&self) -> usize {
        match self {
            Self::DiscreteExclude { .. } => 0,
            Self::DiscreteSum { .. } => 1,
            Self::DiscreteProduct { .. } => 2,
            Self::DiscreteNoLabelDuplicates { .. } => 3,
            Self::DiscreteLinkedParameters { .. } => 4,
            Self::DiscreteDependencies { .. } => 5,
            Self::ContinuousLinearEquality { .. } => 6,
            Self::ContinuousLinearInequality { .. } => 7,
            Self::ContinuousCardinality { .. } => 8,
        }
    }

    fn invalid(&self, reason: impl Into<String>) -> Error {
        Error::InvalidConstraint {
            constraint: self.kind(),
            reason: reason.into(),
        }
    }

    /// Checks the constraint on its own, without looking at parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConstraint`] if it has no parameters, repeats a
    /// parameter, or has mismatching condition/coefficient counts or
    /// cardinality limits.
    pub fn validate(&self) -> Result<()> {
        let parameters = self.parameters();
        if parameters.is_empty() {
            return Err(self.invalid("at least one parameter is required"));
        }
        if parameters.iter().collect::<HashSet<_>>().len() != parameters.len() {
            return Err(self.invalid("parameters must be unique"));
        }
        match self {
            Self::DiscreteExclude { conditions, .. } => {
                if conditions.len() != parameters.len() {
                    return Err(self.invalid("one condition per parameter is required"));
                }
                conditions.iter().try_for_each(|c| c.validate(self.kind()))
            }
            Self::DiscreteSum { condition, .. } | Self::DiscreteProduct { condition, .. } => {
                if matches!(condition, Condition::SubSelection { .. }) {
                    return Err(self.invalid("the condition must be a threshold"));
                }
                condition.validate(self.kind())
            }
            Self::DiscreteDependencies {
                conditions,
                affected_parameters,
                ..
            } => {
                if conditions.len() != parameters.len()
                    || affected_parameters.len() != parameters.len()
                {
                    return Err(self.invalid(
                        "one condition and one list of affected parameters per parameter is required",
                    ));
                }
                if affected_parameters.iter().any(Vec::is_empty) {
                    return Err(self.invalid("affected parameter lists must not be empty"));
                }
                conditions.iter().try_for_each(|c| c.validate(self.kind()))
            }
            Self::ContinuousLinearEquality {
                coefficients, rhs, ..
            }
            | Self::ContinuousLinearInequality {
                coefficients, rhs, ..
            } => {
                if coefficients.len() != parameters.len() {
                    return Err(self.invalid(format!(
                        "expected {} coefficients, got {}",
                        parameters.len(),
                        coefficients.len()
                    )));
                }
                if coefficients.iter().any(|c| !c.is_finite()) || !rhs.is_finite() {
                    return Err(self.invalid("coefficients and rhs must be finite"));
                }
                Ok(())
            }
            Self::ContinuousCardinality {
                min_cardinality,
                max_cardinality,
                ..
            } => {
                if min_cardinality > max_cardinality || *max_cardinality > parameters.len() {
                    return Err(self.invalid(format!(
                        "cardinality limits must satisfy {min_cardinality} <= {max_cardinality} <= {}",
                        parameters.len()
                    )));
                }
                Ok(())
            }
            Self::DiscreteNoLabelDuplicates { .. } | Self::DiscreteLinkedParameters { .. } => {
                Ok(())
            }
        }
    }

    /// Positions of the rows of `data` that violate the constraint.
    ///
    /// `data` must hold a column for every referenced parameter; other
    /// columns are ignored. The returned indices are ascending.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingColumn`] for a missing column and
    /// [`Error::NonNumericValue`] if an arithmetic constraint meets a label.
    pub fn get_invalid(&self, data: &Frame) -> Result<Vec<usize>> {
        let columns = self
            .parameters()
            .iter()
            .map(|p| data.column(p))
            .collect::<Result<Vec<Vec<ParamValue>>>>()?;
        let n_rows = data.n_rows();

        let invalid = match self {
            Self::DiscreteExclude {
                conditions,
                combiner,
                ..
            } => (0..n_rows)
                .filter(|&row| {
                    let mut hits = columns
                        .iter()
                        .zip(conditions)
                        .map(|(col, cond)| cond.evaluate(&col[row]));
                    match combiner {
                        Combiner::And => hits.all(|h| h),
                        Combiner::Or => hits.any(|h| h),
                    }
                })
                .collect(),
            Self::DiscreteSum { condition, .. } => {
                let numeric = self.numeric_columns(data)?;
                (0..n_rows)
                    .filter(|&row| !condition.evaluate_f64(numeric.iter().map(|c| c[row]).sum()))
                    .collect()
            }
            Self::DiscreteProduct { condition, .. } => {
                let numeric = self.numeric_columns(data)?;
                (0..n_rows)
                    .filter(|&row| {
                        !condition.evaluate_f64(numeric.iter().map(|c| c[row]).product())
                    })
                    .collect()
            }
            Self::DiscreteNoLabelDuplicates { .. } => (0..n_rows)
                .filter(|&row| {
                    let keys: HashSet<ValueKey> =
                        columns.iter().map(|c| c[row].group_key()).collect();
                    keys.len() < columns.len()
                })
                .collect(),
            Self::DiscreteLinkedParameters { .. } => (0..n_rows)
                .filter(|&row| {
                    let keys: HashSet<ValueKey> =
                        columns.iter().map(|c| c[row].group_key()).collect();
                    keys.len() > 1
                })
                .collect(),
            Self::DiscreteDependencies {
                conditions,
                affected_parameters,
                ..
            } => dependencies_invalid(data, &columns, conditions, affected_parameters)?,
            Self::ContinuousLinearEquality {
                coefficients, rhs, ..
            } => {
                let numeric = self.numeric_columns(data)?;
                (0..n_rows)
                    .filter(|&row| (dot(&numeric, coefficients, row) - rhs).abs() > LINEAR_TOLERANCE)
                    .collect()
            }
            Self::ContinuousLinearInequality {
                coefficients, rhs, ..
            } => {
                let numeric = self.numeric_columns(data)?;
                (0..n_rows)
                    .filter(|&row| dot(&numeric, coefficients, row) < rhs - LINEAR_TOLERANCE)
                    .collect()
            }
            Self::ContinuousCardinality {
                min_cardinality,
                max_cardinality,
                ..
            } => {
                let numeric = self.numeric_columns(data)?;
                (0..n_rows)
                    .filter(|&row| {
                        let nonzero = numeric.iter().filter(|c| c[row] != 0.0).count();
                        nonzero < *min_cardinality || nonzero > *max_cardinality
                    })
                    .collect()
            }
        };
        Ok(invalid)
    }

    fn numeric_columns(&self, data: &Frame) -> Result<Vec<Vec<f64>>> {
        self.parameters()
            .iter()
            .map(|p| data.numeric_column(p))
            .collect()
    }
}

fn dot(columns: &[Vec<f64>], coefficients: &[f64], row: usize) -> f64 {
    columns
        .iter()
        .zip(coefficients)
        .map(|(c, k)| c[row] * k)
        .sum()
}

/// Rows that coincide with an earlier row once the values of irrelevant
/// dependent parameters are masked out.
fn dependencies_invalid(
    data: &Frame,
    columns: &[Vec<ParamValue>],
    conditions: &[Condition],
    affected_parameters: &[Vec<String>],
) -> Result<Vec<usize>> {
    let names = data.column_names();
    let mut masked: Vec<HashSet<usize>> = vec![HashSet::new(); data.n_rows()];
    for ((column, condition), affected) in columns.iter().zip(conditions).zip(affected_parameters) {
        let positions = affected
            .iter()
            .map(|a| {
                names
                    .iter()
                    .position(|n| *n == a.as_str())
                    .ok_or_else(|| Error::MissingColumn { name: a.clone() })
            })
            .collect::<Result<Vec<_>>>()?;
        for (row, value) in column.iter().enumerate() {
            if !condition.evaluate(value) {
                masked[row].extend(positions.iter().copied());
            }
        }
    }

    let all_columns = names
        .iter()
        .map(|n| data.column(n))
        .collect::<Result<Vec<_>>>()?;
    let mut seen: HashSet<Vec<Option<ValueKey>>> = HashSet::new();
    let mut invalid = Vec::new();
    for (row, mask) in masked.iter().enumerate() {
        let key: Vec<Option<ValueKey>> = all_columns
            .iter()
            .enumerate()
            .map(|(j, c)| (!mask.contains(&j)).then(|| c[row].group_key()))
            .collect();
        if !seen.insert(key) {
            invalid.push(row);
        }
    }
    Ok(invalid)
}
