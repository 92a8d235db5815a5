//! The enumerated discrete part of a search space.

use std::collections::{HashMap, HashSet};

use nalgebra::DMatrix;

use super::metadata::Metadata;
use crate::constraint::{Constraint, validate_constraints};
use crate::error::{Error, Result};
use crate::frame::{CompFrame, Frame};
use crate::param::ParamValue;
use crate::parameter::{
    CategoricalParameter, NumericalDiscreteParameter, Parameter, check_comp_columns,
};

/// Product sizes above this row count are logged as a warning before enumeration.
const LARGE_PRODUCT_ROWS: u128 = 10_000_000;

/// Rows eligible for recommendation, in both representations.
///
/// `indices[i]` is the subspace row that `exp_rep` and `comp_rep` row `i`
/// were taken from.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidates {
    /// Positions of the candidate rows in the subspace.
    pub indices: Vec<usize>,
    /// Experimental representation of the candidates.
    pub exp_rep: Frame,
    /// Computational representation of the candidates.
    pub comp_rep: CompFrame,
}

impl Candidates {
    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if there is no candidate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Splits into the experimental and computational representations.
    #[must_use]
    pub fn into_parts(self) -> (Frame, CompFrame) {
        (self.exp_rep, self.comp_rep)
    }
}

/// The discrete subspace: every valid combination of discrete parameter values.
///
/// The experimental representation, the computational representation and the
/// metadata always have the same rows in the same order. The computational
/// columns are frozen at construction; columns that were constant over all
/// rows are dropped at that point and never come back.
#[derive(Clone, Debug, PartialEq)]
pub struct SubspaceDiscrete {
    parameters: Vec<Parameter>,
    constraints: Vec<Constraint>,
    exp_rep: Frame,
    comp_rep: CompFrame,
    comp_columns: Vec<String>,
    comp_bounds: Vec<(f64, f64)>,
    metadata: Metadata,
    empty_encoding: bool,
}

impl Default for SubspaceDiscrete {
    fn default() -> Self {
        Self::empty()
    }
}

impl SubspaceDiscrete {
    /// A subspace without parameters and rows.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            parameters: Vec::new(),
            constraints: Vec::new(),
            exp_rep: Frame::with_rows(0),
            comp_rep: CompFrame::empty(0),
            comp_columns: Vec::new(),
            comp_bounds: Vec::new(),
            metadata: Metadata::new(0),
            empty_encoding: false,
        }
    }

    /// Enumerates the Cartesian product of the parameter values and removes the
    /// rows violating the constraints.
    ///
    /// Constraints are applied in their fixed evaluation order, independent of
    /// the order given. With `empty_encoding` no computational representation is
    /// built and every transform yields zero columns.
    ///
    /// # Errors
    ///
    /// Returns a parameter or constraint validation error,
    /// [`Error::UnexpectedParameterKind`] for a continuous parameter,
    /// [`Error::DuplicateCompColumn`] if two parameters encode to the same
    /// computational column and [`Error::ProductSpaceTooLarge`] if the product
    /// does not fit in memory.
    pub fn create(
        parameters: Vec<Parameter>,
        constraints: Vec<Constraint>,
        empty_encoding: bool,
    ) -> Result<Self> {
        check_parameters(&parameters)?;
        validate_constraints(&constraints, &parameters)?;

        let mut constraints: Vec<Constraint> = constraints
            .into_iter()
            .filter(Constraint::eval_during_creation)
            .collect();
        constraints.sort_by_key(Constraint::evaluation_rank);

        let rows = product_size(&parameters);
        if rows > LARGE_PRODUCT_ROWS {
            trace_warn!(rows = %rows, "enumerating a very large discrete product space");
        }
        let mut exp_rep = cartesian_product(&parameters)?;
        for constraint in &constraints {
            let invalid = constraint.get_invalid(&exp_rep)?;
            trace_debug!(
                constraint = constraint.kind(),
                dropped = invalid.len(),
                "applied discrete constraint"
            );
            exp_rep.drop_rows(&invalid)?;
        }

        let space = Self::assemble(parameters, constraints, exp_rep, empty_encoding, None)?;
        trace_info!(
            rows = space.exp_rep.n_rows(),
            comp_columns = space.comp_columns.len(),
            "created discrete subspace"
        );
        Ok(space)
    }

    /// Builds a subspace from explicit rows.
    ///
    /// Every column of `data` becomes a parameter. Columns without a matching
    /// entry in `parameters` get an inferred one: numerical columns become
    /// numerical discrete parameters, all others categorical parameters, each
    /// over the distinct values in order of first appearance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingColumn`] for a supplied parameter without a
    /// column and [`Error::InvalidMeasurement`] for a row whose value lies
    /// outside its supplied parameter.
    pub fn from_dataframe(data: &Frame, parameters: Vec<Parameter>) -> Result<Self> {
        if let Some(p) = parameters.iter().find(|p| !data.contains_column(p.name())) {
            return Err(Error::MissingColumn {
                name: p.name().to_owned(),
            });
        }
        let mut supplied: HashMap<String, Parameter> = parameters
            .into_iter()
            .map(|p| (p.name().to_owned(), p))
            .collect();

        let mut resolved = Vec::with_capacity(data.n_cols());
        let mut exp_rep = Frame::with_rows(data.n_rows());
        for name in data.column_names() {
            let column = data.column(name)?;
            let (parameter, values) = match supplied.remove(name) {
                Some(p) => {
                    if let Some(row) = column.iter().position(|v| !p.is_in_range(v)) {
                        return Err(Error::InvalidMeasurement {
                            row,
                            parameter: name.to_owned(),
                        });
                    }
                    (p, column)
                }
                None => infer_parameter(name, column),
            };
            exp_rep.push_column(name, values)?;
            resolved.push(parameter);
        }
        check_parameters(&resolved)?;
        Self::assemble(resolved, Vec::new(), exp_rep, false, None)
    }

    /// Rebuilds a subspace from stored rows and a stored frozen column set.
    #[cfg(feature = "serde")]
    pub(crate) fn restore(
        parameters: Vec<Parameter>,
        constraints: Vec<Constraint>,
        exp_rep: Frame,
        comp_columns: Vec<String>,
        empty_encoding: bool,
    ) -> Result<Self> {
        check_parameters(&parameters)?;
        let names: Vec<&str> = parameters.iter().map(Parameter::name).collect();
        let exp_rep = exp_rep.select_columns(&names)?;
        Self::assemble(parameters, constraints, exp_rep, empty_encoding, Some(comp_columns))
    }

    /// Derives the computational representation and metadata for `exp_rep`.
    ///
    /// Without `frozen` columns, constant columns are dropped and the survivors
    /// become the frozen set.
    fn assemble(
        parameters: Vec<Parameter>,
        constraints: Vec<Constraint>,
        exp_rep: Frame,
        empty_encoding: bool,
        frozen: Option<Vec<String>>,
    ) -> Result<Self> {
        let n_rows = exp_rep.n_rows();
        let comp_rep = if empty_encoding || parameters.is_empty() {
            CompFrame::empty(n_rows)
        } else {
            check_comp_columns(&parameters)?;
            let full = encode(&parameters, &exp_rep)?;
            match frozen {
                Some(columns) => full.select_columns(&columns)?,
                None => {
                    let (pruned, dropped) = full.drop_constant_columns();
                    if !dropped.is_empty() {
                        trace_debug!(?dropped, "dropped constant computational columns");
                    }
                    pruned
                }
            }
        };
        let comp_columns = comp_rep.columns().to_vec();

        let mut bounds_by_column: HashMap<String, (f64, f64)> = HashMap::new();
        for p in &parameters {
            for (column, bounds) in p.comp_columns()?.into_iter().zip(p.comp_bounds()?) {
                bounds_by_column.entry(column).or_insert(bounds);
            }
        }
        let comp_bounds = comp_columns
            .iter()
            .map(|c| {
                bounds_by_column
                    .get(c)
                    .copied()
                    .ok_or_else(|| Error::ColumnMismatch {
                        expected: comp_columns.clone(),
                        got: bounds_by_column.keys().cloned().collect(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            parameters,
            constraints,
            exp_rep,
            comp_rep,
            comp_columns,
            comp_bounds,
            metadata: Metadata::new(n_rows),
            empty_encoding,
        })
    }

    /// The discrete parameters, in the order given at construction.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// The creation-time constraints, in evaluation order.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Parameter names, in order.
    #[must_use]
    pub fn param_names(&self) -> Vec<&str> {
        self.parameters.iter().map(Parameter::name).collect()
    }

    /// Returns `true` if the subspace has no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.exp_rep.n_rows()
    }

    /// Whether the subspace was built without a computational representation.
    #[must_use]
    pub fn empty_encoding(&self) -> bool {
        self.empty_encoding
    }

    /// The experimental representation.
    #[must_use]
    pub fn exp_rep(&self) -> &Frame {
        &self.exp_rep
    }

    /// The computational representation.
    #[must_use]
    pub fn comp_rep(&self) -> &CompFrame {
        &self.comp_rep
    }

    /// The frozen computational column set.
    #[must_use]
    pub fn comp_columns(&self) -> &[String] {
        &self.comp_columns
    }

    /// The per-row bookkeeping flags.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Bounds of the frozen computational columns as a `2 x k` matrix: lower
    /// bounds in the first row, upper bounds in the second.
    #[must_use]
    pub fn param_bounds_comp(&self) -> DMatrix<f64> {
        DMatrix::from_fn(2, self.comp_bounds.len(), |i, j| {
            let (lower, upper) = self.comp_bounds[j];
            if i == 0 { lower } else { upper }
        })
    }

    /// The rows that may be recommended.
    ///
    /// Rows excluded via [`exclude`](Self::exclude) are never returned.
    /// Recommended and measured rows are returned only if the respective flag
    /// allows it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Frame`] if the experimental rows cannot be taken.
    pub fn get_candidates(
        &self,
        allow_repeated_recommendations: bool,
        allow_recommending_already_measured: bool,
    ) -> Result<Candidates> {
        let indices: Vec<usize> = (0..self.n_rows())
            .filter(|&i| {
                !self.metadata.dont_recommend(i)
                    && (allow_repeated_recommendations || !self.metadata.was_recommended(i))
                    && (allow_recommending_already_measured || !self.metadata.was_measured(i))
            })
            .collect();
        Ok(Candidates {
            exp_rep: self.exp_rep.select_rows(&indices)?,
            comp_rep: self.comp_rep.select_rows(&indices),
            indices,
        })
    }

    /// Transforms rows given in the experimental representation into the
    /// frozen computational columns.
    ///
    /// `data` needs one column per parameter; other columns are ignored.
    /// Encoded columns outside the frozen set are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingColumn`] for a missing parameter column,
    /// [`Error::InvalidMeasurement`] for an undeclared label and
    /// [`Error::ColumnMismatch`] if a frozen column cannot be reproduced.
    pub fn transform(&self, data: &Frame) -> Result<CompFrame> {
        if self.empty_encoding || data.is_empty() || self.parameters.is_empty() {
            return Ok(CompFrame::empty(data.n_rows()));
        }
        encode(&self.parameters, data)?.select_columns(&self.comp_columns)
    }

    /// Finds the subspace row each measurement corresponds to.
    ///
    /// Labels must match exactly. Among those rows, each numerical parameter
    /// in turn keeps only the rows closest to the measured value. A measurement
    /// without a match, or with several, is logged; in the latter case the first
    /// row is used. The returned positions follow the measurement order.
    ///
    /// When `numerical_measurements_must_be_within_tolerance` is set, numerical
    /// values must also lie within their parameter's tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingColumn`] for a missing parameter column and
    /// [`Error::InvalidMeasurement`] for a value outside its parameter's domain.
    #[allow(clippy::float_cmp)]
    pub fn match_measurements(
        &self,
        measurements: &Frame,
        numerical_measurements_must_be_within_tolerance: bool,
    ) -> Result<Vec<usize>> {
        let columns = self.validate_measurements(
            measurements,
            numerical_measurements_must_be_within_tolerance,
        )?;

        let (numeric, labels): (Vec<_>, Vec<_>) = self
            .parameters
            .iter()
            .zip(&columns)
            .partition(|(p, _)| p.is_numeric());
        let numeric_space = numeric
            .iter()
            .map(|(p, _)| self.exp_rep.numeric_column(p.name()))
            .collect::<Result<Vec<_>>>()?;
        let label_space = labels
            .iter()
            .map(|(p, _)| self.exp_rep.column(p.name()))
            .collect::<Result<Vec<_>>>()?;

        let mut matched = Vec::new();
        for row in 0..measurements.n_rows() {
            let mut hits: Vec<usize> = (0..self.n_rows())
                .filter(|&i| {
                    labels
                        .iter()
                        .zip(&label_space)
                        .all(|((_, measured), space)| space[i] == measured[row])
                })
                .collect();

            for ((p, measured), space) in numeric.iter().zip(&numeric_space) {
                if hits.is_empty() {
                    break;
                }
                let target = measured[row].as_f64().ok_or_else(|| Error::NonNumericValue {
                    column: p.name().to_owned(),
                    row,
                })?;
                let best = hits
                    .iter()
                    .map(|&i| (space[i] - target).abs())
                    .fold(f64::INFINITY, f64::min);
                hits.retain(|&i| (space[i] - target).abs() == best);
            }

            match hits.as_slice() {
                [] => {
                    trace_warn!(row, "measurement matches no search space row");
                }
                [single] => matched.push(*single),
                [first, ..] => {
                    trace_warn!(
                        row,
                        matches = hits.len(),
                        "measurement matches several search space rows, using the first"
                    );
                    matched.push(*first);
                }
            }
        }
        Ok(matched)
    }

    /// Checks measurement columns and values, returning one column per parameter.
    fn validate_measurements(
        &self,
        measurements: &Frame,
        numerical_measurements_must_be_within_tolerance: bool,
    ) -> Result<Vec<Vec<ParamValue>>> {
        let columns = self
            .parameters
            .iter()
            .map(|p| measurements.column(p.name()))
            .collect::<Result<Vec<_>>>()?;

        for row in 0..measurements.n_rows() {
            for (p, column) in self.parameters.iter().zip(&columns) {
                let value = &column[row];
                let valid = if p.is_numeric() && !numerical_measurements_must_be_within_tolerance {
                    value.is_numeric()
                } else {
                    p.is_in_range(value)
                };
                if !valid {
                    return Err(Error::InvalidMeasurement {
                        row,
                        parameter: p.name().to_owned(),
                    });
                }
            }
        }
        Ok(columns)
    }

    /// Matches the measurements and flags the matched rows as measured.
    ///
    /// Returns the matched row positions.
    ///
    /// # Errors
    ///
    /// See [`match_measurements`](Self::match_measurements).
    pub fn mark_as_measured(
        &mut self,
        measurements: &Frame,
        numerical_measurements_must_be_within_tolerance: bool,
    ) -> Result<Vec<usize>> {
        let matched =
            self.match_measurements(measurements, numerical_measurements_must_be_within_tolerance)?;
        self.metadata.set_measured(&matched)?;
        trace_debug!(matched = matched.len(), "marked rows as measured");
        Ok(matched)
    }

    /// Flags rows as recommended.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowOutOfRange`] if a position does not exist; no flag
    /// is set in that case.
    pub fn mark_as_recommended(&mut self, rows: &[usize]) -> Result<()> {
        self.metadata.set_recommended(rows)
    }

    /// Excludes rows from all future recommendations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowOutOfRange`] if a position does not exist; no flag
    /// is set in that case.
    pub fn exclude(&mut self, rows: &[usize]) -> Result<()> {
        self.metadata.set_dont_recommend(rows)
    }
}

/// Validates the parameters of a discrete subspace.
fn check_parameters(parameters: &[Parameter]) -> Result<()> {
    let mut names = HashSet::new();
    for p in parameters {
        if !p.is_discrete() {
            return Err(Error::UnexpectedParameterKind {
                name: p.name().to_owned(),
                expected: "discrete",
            });
        }
        if !names.insert(p.name()) {
            return Err(Error::DuplicateParameterName {
                name: p.name().to_owned(),
            });
        }
        p.validate()?;
    }
    Ok(())
}

/// Number of rows of the Cartesian product, saturating at `u128::MAX`.
/// Zero parameters give zero rows.
pub(crate) fn product_size(parameters: &[Parameter]) -> u128 {
    if parameters.is_empty() {
        return 0;
    }
    parameters.iter().fold(1_u128, |acc, p| {
        acc.checked_mul(p.n_values() as u128).unwrap_or(u128::MAX)
    })
}

/// Enumerates all value combinations; the first parameter varies slowest.
fn cartesian_product(parameters: &[Parameter]) -> Result<Frame> {
    let rows = product_size(parameters);
    let n_rows = usize::try_from(rows).map_err(|_| Error::ProductSpaceTooLarge {
        rows,
        limit: usize::MAX,
    })?;
    let mut frame = Frame::with_rows(n_rows);
    let mut repeat = n_rows;
    for p in parameters {
        let values = p.values();
        repeat /= values.len().max(1);
        let column = (0..n_rows)
            .map(|row| values[(row / repeat) % values.len()].clone())
            .collect();
        frame.push_column(p.name(), column)?;
    }
    Ok(frame)
}

/// Encodes every parameter column of `data` and concatenates the results in
/// parameter order.
fn encode(parameters: &[Parameter], data: &Frame) -> Result<CompFrame> {
    let mut comp = CompFrame::empty(data.n_rows());
    for p in parameters {
        let column = data.column(p.name())?;
        comp = comp.hstack(&p.transform_rep_exp2comp(&column)?)?;
    }
    Ok(comp)
}

/// Infers a parameter from a column, returning it with the column values it
/// describes. Numerical columns become numerical discrete parameters, label
/// columns (a frame stores mixed columns as labels) categorical ones.
fn infer_parameter(name: &str, column: Vec<ParamValue>) -> (Parameter, Vec<ParamValue>) {
    let mut seen = HashSet::new();
    let distinct: Vec<&ParamValue> = column
        .iter()
        .filter(|v| seen.insert(v.group_key()))
        .collect();
    let parameter = if distinct.iter().copied().all(ParamValue::is_numeric) {
        NumericalDiscreteParameter::new(name, distinct.iter().copied().filter_map(ParamValue::as_f64))
            .into()
    } else {
        CategoricalParameter::new(name, distinct.iter().map(ToString::to_string)).into()
    };
    (parameter, column)
}
