//! The continuous part of a search space.

use std::collections::{BTreeSet, HashSet};

use nalgebra::DMatrix;

use super::sampler::ContinuousSampler;
use crate::constraint::{Constraint, validate_constraints};
use crate::error::{Error, Result};
use crate::frame::{CompFrame, Frame};
use crate::parameter::{NumericalContinuousParameter, Parameter};

/// Magnitude that replaces infinite bounds when sampling.
pub const INF_BOUNDS_REPLACEMENT: f64 = 1000.0;

/// The continuous subspace: a box of continuous parameters.
///
/// Nothing is enumerated. Constraints are stored and evaluated on candidate
/// points via [`get_invalid`](Self::get_invalid), never used to shrink the box.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubspaceContinuous {
    parameters: Vec<NumericalContinuousParameter>,
    constraints: Vec<Constraint>,
}

impl SubspaceContinuous {
    /// Creates an unconstrained subspace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedParameterKind`] for a discrete parameter,
    /// [`Error::DuplicateParameterName`] for a repeated name and
    /// [`Error::InvalidBounds`] for inverted bounds.
    pub fn new(parameters: impl IntoIterator<Item = Parameter>) -> Result<Self> {
        let mut names = HashSet::new();
        let parameters = parameters
            .into_iter()
            .map(|p| match p {
                Parameter::NumericalContinuous(c) => {
                    c.validate()?;
                    if !names.insert(c.name().to_owned()) {
                        return Err(Error::DuplicateParameterName {
                            name: c.name().to_owned(),
                        });
                    }
                    Ok(c)
                }
                other => Err(Error::UnexpectedParameterKind {
                    name: other.name().to_owned(),
                    expected: "continuous",
                }),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            parameters,
            constraints: Vec::new(),
        })
    }

    /// Attaches continuous constraints.
    ///
    /// # Errors
    ///
    /// Returns a constraint validation error, e.g. for a discrete constraint,
    /// an unknown parameter or overlapping cardinality constraints.
    pub fn with_constraints(mut self, constraints: Vec<Constraint>) -> Result<Self> {
        let parameters: Vec<Parameter> = self.parameters.iter().cloned().map(Into::into).collect();
        validate_constraints(&constraints, &parameters)?;
        self.constraints = constraints;
        Ok(self)
    }

    /// Creates a subspace from a frame with two rows, lower bounds first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowCountMismatch`] unless the frame has two rows,
    /// [`Error::NonNumericValue`] for a label and [`Error::InvalidBounds`] for
    /// inverted bounds.
    pub fn from_bounds(bounds: &Frame) -> Result<Self> {
        if bounds.n_rows() != 2 {
            return Err(Error::RowCountMismatch {
                expected: 2,
                got: bounds.n_rows(),
            });
        }
        let parameters = bounds
            .column_names()
            .into_iter()
            .map(|name| {
                let column = bounds.numeric_column(name)?;
                Ok(NumericalContinuousParameter::new(name, column[0], column[1]).into())
            })
            .collect::<Result<Vec<Parameter>>>()?;
        Self::new(parameters)
    }

    /// Creates the smallest subspace containing all given points.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyValues`] for a frame without rows and
    /// [`Error::NonNumericValue`] for a label.
    pub fn from_dataframe(points: &Frame) -> Result<Self> {
        let parameters = points
            .column_names()
            .into_iter()
            .map(|name| {
                if points.is_empty() {
                    return Err(Error::EmptyValues {
                        name: name.to_owned(),
                    });
                }
                let (lower, upper) = points
                    .numeric_column(name)?
                    .into_iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                        (lo.min(v), hi.max(v))
                    });
                Ok(NumericalContinuousParameter::new(name, lower, upper).into())
            })
            .collect::<Result<Vec<Parameter>>>()?;
        Self::new(parameters)
    }

    /// The continuous parameters, in order.
    #[must_use]
    pub fn parameters(&self) -> &[NumericalContinuousParameter] {
        &self.parameters
    }

    /// Parameter names, in order.
    #[must_use]
    pub fn param_names(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .map(NumericalContinuousParameter::name)
            .collect()
    }

    /// Returns `true` if the subspace has no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// All constraints.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// The linear equality constraints.
    #[must_use]
    pub fn constraints_lin_eq(&self) -> Vec<&Constraint> {
        self.constraints
            .iter()
            .filter(|c| matches!(c, Constraint::ContinuousLinearEquality { .. }))
            .collect()
    }

    /// The linear inequality constraints.
    #[must_use]
    pub fn constraints_lin_ineq(&self) -> Vec<&Constraint> {
        self.constraints
            .iter()
            .filter(|c| matches!(c, Constraint::ContinuousLinearInequality { .. }))
            .collect()
    }

    /// The cardinality constraints.
    #[must_use]
    pub fn constraints_cardinality(&self) -> Vec<&Constraint> {
        self.constraints
            .iter()
            .filter(|c| matches!(c, Constraint::ContinuousCardinality { .. }))
            .collect()
    }

    /// Whether every bound is finite.
    #[must_use]
    pub fn is_fully_bounded(&self) -> bool {
        self.parameters.iter().all(NumericalContinuousParameter::is_bounded)
    }

    /// Bounds as a `2 x k` matrix: lower bounds in the first row, upper bounds
    /// in the second.
    #[must_use]
    pub fn param_bounds_comp(&self) -> DMatrix<f64> {
        DMatrix::from_fn(2, self.parameters.len(), |i, j| {
            let p = &self.parameters[j];
            if i == 0 { p.lower() } else { p.upper() }
        })
    }

    /// Like [`param_bounds_comp`](Self::param_bounds_comp) with infinite bounds
    /// replaced by `±INF_BOUNDS_REPLACEMENT`. The declared bounds are unchanged.
    #[must_use]
    pub fn bounds_forced_finite(&self) -> DMatrix<f64> {
        self.param_bounds_comp().map(|v| {
            if v.is_infinite() {
                INF_BOUNDS_REPLACEMENT.copysign(v)
            } else {
                v
            }
        })
    }

    fn finite_bounds(&self) -> Vec<(f64, f64)> {
        let bounds = self.bounds_forced_finite();
        (0..bounds.ncols())
            .map(|j| (bounds[(0, j)], bounds[(1, j)]))
            .collect()
    }

    /// Draws `n` points uniformly from the finite-clamped box.
    ///
    /// Constraints are not taken into account. Returns a frame without rows
    /// if there are no parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Frame`] if the sample frame cannot be built.
    pub fn samples_random(&self, n: usize, sampler: &ContinuousSampler) -> Result<Frame> {
        if self.parameters.is_empty() {
            return Ok(Frame::with_rows(0));
        }
        let columns = sampler.uniform(&self.finite_bounds(), n);
        self.frame_from_columns(columns)
    }

    /// Number of corners of the box, saturating at `u128::MAX`. A box without
    /// parameters has no corners.
    #[must_use]
    pub fn n_corners(&self) -> u128 {
        if self.parameters.is_empty() {
            return 0;
        }
        u32::try_from(self.parameters.len())
            .ok()
            .and_then(|k| 1_u128.checked_shl(k))
            .unwrap_or(u128::MAX)
    }

    /// Draws `n` distinct corners of the finite-clamped box.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooManyFactorialSamples`] if `n` exceeds the number of
    /// corners, `2^k` for `k` parameters.
    pub fn samples_full_factorial(&self, n: usize, sampler: &ContinuousSampler) -> Result<Frame> {
        let available = self.n_corners();
        if n as u128 > available {
            return Err(Error::TooManyFactorialSamples {
                requested: n,
                available,
            });
        }
        if !self.is_fully_bounded() {
            trace_warn!(
                replacement = INF_BOUNDS_REPLACEMENT,
                "sampling full-factorial corners of an unbounded space"
            );
        }
        let corners = sampler.distinct_indices(available, n);
        self.corners(&corners)
    }

    /// All corners of the finite-clamped box, the first parameter varying
    /// slowest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProductSpaceTooLarge`] if the corners do not fit in memory.
    pub fn full_factorial(&self) -> Result<Frame> {
        let available = self.n_corners();
        if usize::try_from(available).is_err() {
            return Err(Error::ProductSpaceTooLarge {
                rows: available,
                limit: usize::MAX,
            });
        }
        let all: Vec<u128> = (0..available).collect();
        self.corners(&all)
    }

    /// Decodes corner indices: bit `k - 1 - j` selects the upper bound of
    /// parameter `j`.
    fn corners(&self, indices: &[u128]) -> Result<Frame> {
        let bounds = self.finite_bounds();
        let k = bounds.len();
        let columns = bounds
            .iter()
            .enumerate()
            .map(|(j, &(lower, upper))| {
                let bit = k - 1 - j;
                indices
                    .iter()
                    .map(|&c| {
                        let high = u32::try_from(bit)
                            .ok()
                            .and_then(|b| c.checked_shr(b))
                            .is_some_and(|v| v & 1 == 1);
                        if high { upper } else { lower }
                    })
                    .collect()
            })
            .collect();
        self.frame_from_columns(columns)
    }

    fn frame_from_columns(&self, columns: Vec<Vec<f64>>) -> Result<Frame> {
        Frame::from_numeric_columns(&self.param_names(), columns)
    }

    /// Selects the parameter columns of `data` as computational columns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingColumn`] for a missing parameter column and
    /// [`Error::NonNumericValue`] for a label.
    pub fn transform(&self, data: &Frame) -> Result<CompFrame> {
        if self.parameters.is_empty() {
            return Ok(CompFrame::empty(data.n_rows()));
        }
        let columns = self
            .parameters
            .iter()
            .map(|p| data.numeric_column(p.name()))
            .collect::<Result<Vec<_>>>()?;
        let values = DMatrix::from_fn(data.n_rows(), columns.len(), |i, j| columns[j][i]);
        CompFrame::new(
            self.param_names().into_iter().map(str::to_owned).collect(),
            values,
        )
    }

    /// Positions of the rows of `points` that violate any constraint, ascending.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingColumn`] for a missing parameter column and
    /// [`Error::NonNumericValue`] for a label.
    pub fn get_invalid(&self, points: &Frame) -> Result<Vec<usize>> {
        let mut invalid = BTreeSet::new();
        for constraint in &self.constraints {
            invalid.extend(constraint.get_invalid(points)?);
        }
        Ok(invalid.into_iter().collect())
    }
}
