//! Parameter definitions and their encodings.
//!
//! A [`Parameter`] describes one experiment dimension. Discrete parameters
//! declare a finite list of values and an encoding that maps every value to a
//! numeric vector (the computational representation). Continuous parameters
//! declare a `[lower, upper]` interval and are passed through unchanged.
//!
//! # Example
//!
//! ```
//! use searchspace::parameter::{
//!     CategoricalEncoding, CategoricalParameter, NumericalDiscreteParameter, Parameter,
//! };
//!
//! let solvent: Parameter = CategoricalParameter::new("solvent", ["water", "thf", "dmf"])
//!     .encoding(CategoricalEncoding::OneHot)
//!     .into();
//! let temperature: Parameter = NumericalDiscreteParameter::new("temp", [20.0, 40.0, 60.0])
//!     .tolerance(2.0)
//!     .into();
//!
//! assert_eq!(solvent.comp_columns().unwrap().len(), 3);
//! assert!(temperature.is_in_range(&41.5.into()));
//! ```

mod categorical;
mod custom;
mod numerical;
mod substance;

use std::collections::{HashMap, HashSet};

use nalgebra::DMatrix;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use self::categorical::{CategoricalEncoding, CategoricalParameter};
pub use self::custom::CustomDiscreteParameter;
pub use self::numerical::{NumericalContinuousParameter, NumericalDiscreteParameter};
pub use self::substance::{SubstanceEncoding, SubstanceParameter};
use crate::error::{Error, Result};
use crate::frame::CompFrame;
use crate::param::ParamValue;

/// Identifies how a parameter's values are encoded numerically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Encoding {
    /// One 0/1 column per declared value.
    OneHot,
    /// A single column holding the declared position of the value.
    Integer,
    /// A single column holding the declared rank scaled to `[0, 1]`.
    Ordinal,
    /// Element counts derived from a SMILES string.
    Composition,
    /// A user-provided descriptor table.
    Descriptors,
}

/// One experiment dimension.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum Parameter {
    /// Discrete numerical values.
    NumericalDiscrete(NumericalDiscreteParameter),
    /// Discrete labels with a built-in encoding.
    Categorical(CategoricalParameter),
    /// Chemical substances encoded from their SMILES strings.
    Substance(SubstanceParameter),
    /// Discrete labels encoded through a descriptor table.
    CustomDiscrete(CustomDiscreteParameter),
    /// A continuous interval.
    NumericalContinuous(NumericalContinuousParameter),
}

/// Lookup from a discrete parameter's declared values to their encodings.
///
/// `rows[i]` holds the encoding of the `i`-th declared value.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct CompTable {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Vec<f64>>,
}

impl CompTable {
    /// Per-column `(min, max)` over all declared values.
    fn bounds(&self) -> Vec<(f64, f64)> {
        (0..self.columns.len())
            .map(|j| {
                self.rows.iter().map(|r| r[j]).fold(
                    (f64::INFINITY, f64::NEG_INFINITY),
                    |(lo, hi), v| (lo.min(v), hi.max(v)),
                )
            })
            .collect()
    }
}

impl Parameter {
    /// The parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::NumericalDiscrete(p) => p.name(),
            Self::Categorical(p) => p.name(),
            Self::Substance(p) => p.name(),
            Self::CustomDiscrete(p) => p.name(),
            Self::NumericalContinuous(p) => p.name(),
        }
    }

    /// Whether the parameter has a finite set of values.
    #[must_use]
    pub fn is_discrete(&self) -> bool {
        !matches!(self, Self::NumericalContinuous(_))
    }

    /// Whether the experimental values are numbers.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::NumericalDiscrete(_) | Self::NumericalContinuous(_))
    }

    /// The encoding applied to label-like parameters. Numerical parameters
    /// are passed through and have no encoding.
    #[must_use]
    pub fn encoding(&self) -> Option<Encoding> {
        match self {
            Self::Categorical(p) => Some(p.encoding_kind().into()),
            Self::Substance(p) => Some(p.encoding_kind().into()),
            Self::CustomDiscrete(_) => Some(Encoding::Descriptors),
            Self::NumericalDiscrete(_) | Self::NumericalContinuous(_) => None,
        }
    }

    /// The declared values of a discrete parameter. Empty for continuous ones.
    #[must_use]
    pub fn values(&self) -> Vec<ParamValue> {
        match self {
            Self::NumericalDiscrete(p) => p.values().iter().map(|&v| v.into()).collect(),
            Self::Categorical(p) => p.values().iter().map(|v| v.as_str().into()).collect(),
            Self::Substance(p) => p.labels().map(Into::into).collect(),
            Self::CustomDiscrete(p) => p.labels().iter().map(|v| v.as_str().into()).collect(),
            Self::NumericalContinuous(_) => Vec::new(),
        }
    }

    /// Number of declared values of a discrete parameter, zero for continuous ones.
    #[must_use]
    pub fn n_values(&self) -> usize {
        match self {
            Self::NumericalDiscrete(p) => p.values().len(),
            Self::Categorical(p) => p.values().len(),
            Self::Substance(p) => p.len(),
            Self::CustomDiscrete(p) => p.labels().len(),
            Self::NumericalContinuous(_) => 0,
        }
    }

    /// Whether `value` lies in the parameter's domain.
    ///
    /// Labels must match a declared value exactly. Discrete numbers must lie
    /// within the tolerance of a declared value, continuous numbers within the
    /// bounds.
    #[must_use]
    pub fn is_in_range(&self, value: &ParamValue) -> bool {
        match (self, value) {
            (Self::NumericalDiscrete(p), ParamValue::Float(v)) => p.is_in_range(*v),
            (Self::NumericalContinuous(p), ParamValue::Float(v)) => p.is_in_range(*v),
            (Self::Categorical(p), ParamValue::Label(l)) => p.values().iter().any(|v| v == l),
            (Self::Substance(p), ParamValue::Label(l)) => p.labels().any(|v| v == l),
            (Self::CustomDiscrete(p), ParamValue::Label(l)) => p.labels().iter().any(|v| v == l),
            _ => false,
        }
    }

    /// Checks the parameter definition.
    ///
    /// # Errors
    ///
    /// Returns the first definition error found, e.g. [`Error::EmptyValues`],
    /// [`Error::DuplicateValues`], [`Error::InvalidTolerance`],
    /// [`Error::InvalidBounds`] or [`Error::InvalidDescriptors`].
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::NumericalDiscrete(p) => p.validate(),
            Self::Categorical(p) => p.validate(),
            Self::Substance(p) => p.validate(),
            Self::CustomDiscrete(p) => p.validate(),
            Self::NumericalContinuous(p) => p.validate(),
        }
    }

    /// The value-to-encoding lookup of a discrete parameter.
    pub(crate) fn comp_table(&self) -> Result<CompTable> {
        match self {
            Self::NumericalDiscrete(p) => Ok(CompTable {
                columns: vec![p.name().to_owned()],
                rows: p.values().iter().map(|&v| vec![v]).collect(),
            }),
            Self::Categorical(p) => Ok(p.comp_table()),
            Self::Substance(p) => p.comp_table(),
            Self::CustomDiscrete(p) => Ok(p.comp_table()),
            Self::NumericalContinuous(p) => Ok(CompTable {
                columns: vec![p.name().to_owned()],
                rows: vec![vec![p.lower()], vec![p.upper()]],
            }),
        }
    }

    /// Names of the computational columns this parameter produces.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDescriptors`] if a substance cannot be encoded.
    pub fn comp_columns(&self) -> Result<Vec<String>> {
        Ok(self.comp_table()?.columns)
    }

    /// Per computational column `(lower, upper)` bounds.
    ///
    /// For discrete parameters these are the extremes over the encodings of
    /// all declared values; for continuous parameters the declared interval.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDescriptors`] if a substance cannot be encoded.
    pub fn comp_bounds(&self) -> Result<Vec<(f64, f64)>> {
        if let Self::NumericalContinuous(p) = self {
            return Ok(vec![(p.lower(), p.upper())]);
        }
        Ok(self.comp_table()?.bounds())
    }

    /// Transforms a column of experimental values into computational columns.
    ///
    /// Numerical values are passed through unchanged, so off-grid measurements
    /// keep their exact value. Labels are looked up in the encoding table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonNumericValue`] for a label in a numerical column and
    /// [`Error::InvalidMeasurement`] for a label that is not declared.
    pub fn transform_rep_exp2comp(&self, values: &[ParamValue]) -> Result<CompFrame> {
        if self.is_numeric() {
            let column: Vec<f64> = values
                .iter()
                .enumerate()
                .map(|(row, v)| {
                    v.as_f64().ok_or_else(|| Error::NonNumericValue {
                        column: self.name().to_owned(),
                        row,
                    })
                })
                .collect::<Result<_>>()?;
            return CompFrame::new(
                vec![self.name().to_owned()],
                DMatrix::from_column_slice(column.len(), 1, &column),
            );
        }

        let table = self.comp_table()?;
        let labels = self.values();
        let lookup: HashMap<&str, usize> = labels
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_label().map(|l| (l, i)))
            .collect();
        let positions: Vec<usize> = values
            .iter()
            .enumerate()
            .map(|(row, v)| {
                v.as_label()
                    .and_then(|l| lookup.get(l).copied())
                    .ok_or_else(|| Error::InvalidMeasurement {
                        row,
                        parameter: self.name().to_owned(),
                    })
            })
            .collect::<Result<_>>()?;
        let matrix = DMatrix::from_fn(positions.len(), table.columns.len(), |i, j| {
            table.rows[positions[i]][j]
        });
        CompFrame::new(table.columns, matrix)
    }

    /// Mean number of bytes one experimental cell of this parameter occupies.
    ///
    /// Every declared value appears equally often in a Cartesian product, so
    /// the mean over declared values is exact for unconstrained spaces.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value_byte_width(&self) -> f64 {
        let values = self.values();
        if values.is_empty() {
            return core::mem::size_of::<f64>() as f64;
        }
        values.iter().map(ParamValue::byte_size).sum::<usize>() as f64 / values.len() as f64
    }
}

/// Rejects parameter sets in which two parameters encode to the same
/// computational column.
///
/// # Errors
///
/// Returns [`Error::DuplicateCompColumn`] for the first repeated column and
/// [`Error::InvalidDescriptors`] if a substance cannot be encoded.
pub(crate) fn check_comp_columns<'a>(
    parameters: impl IntoIterator<Item = &'a Parameter>,
) -> Result<()> {
    let mut seen = HashSet::new();
    for p in parameters {
        for column in p.comp_columns()? {
            if !seen.insert(column.clone()) {
                return Err(Error::DuplicateCompColumn { column });
            }
        }
    }
    Ok(())
}

impl From<NumericalDiscreteParameter> for Parameter {
    fn from(p: NumericalDiscreteParameter) -> Self {
        Self::NumericalDiscrete(p)
    }
}

impl From<CategoricalParameter> for Parameter {
    fn from(p: CategoricalParameter) -> Self {
        Self::Categorical(p)
    }
}

impl From<SubstanceParameter> for Parameter {
    fn from(p: SubstanceParameter) -> Self {
        Self::Substance(p)
    }
}

impl From<CustomDiscreteParameter> for Parameter {
    fn from(p: CustomDiscreteParameter) -> Self {
        Self::CustomDiscrete(p)
    }
}

impl From<NumericalContinuousParameter> for Parameter {
    fn from(p: NumericalContinuousParameter) -> Self {
        Self::NumericalContinuous(p)
    }
}

/// Returns `true` if every name in `values` is distinct.
pub(crate) fn all_unique<'a>(values: impl IntoIterator<Item = &'a str>) -> bool {
    let mut seen = HashSet::new();
    values.into_iter().all(|v| seen.insert(v))
}
