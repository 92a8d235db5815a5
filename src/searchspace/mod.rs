//! Search spaces composed of a discrete and a continuous subspace.

use std::collections::HashSet;

use nalgebra::DMatrix;

use crate::constraint::{Constraint, validate_constraints};
use crate::error::{Error, Result};
use crate::frame::{CompFrame, Frame};
use crate::parameter::Parameter;
use crate::types::{MemorySize, SearchSpaceType};

mod builder;
mod continuous;
mod discrete;
mod metadata;
mod persistence;
mod sampler;

pub use builder::SearchSpaceBuilder;
pub use continuous::{INF_BOUNDS_REPLACEMENT, SubspaceContinuous};
pub use discrete::{Candidates, SubspaceDiscrete};
pub use metadata::Metadata;
#[cfg(feature = "serde")]
pub use persistence::{SNAPSHOT_VERSION, SearchSpaceSnapshot};
pub use sampler::ContinuousSampler;

/// A search space: the discrete and the continuous subspace plus the
/// parameters in the order the caller supplied them.
///
/// Wherever computational columns of both subspaces are combined, discrete
/// columns come first.
///
/// # Examples
///
/// ```
/// use searchspace::parameter::{NumericalContinuousParameter, NumericalDiscreteParameter, Parameter};
/// use searchspace::{SearchSpace, SearchSpaceType};
///
/// let parameters: Vec<Parameter> = vec![
///     NumericalContinuousParameter::new("x", 4.0, 6.0).into(),
///     NumericalDiscreteParameter::new("n", [1.0, 2.0, 3.0]).into(),
/// ];
/// let space = SearchSpace::create(parameters, vec![], false).unwrap();
///
/// assert_eq!(space.search_space_type(), SearchSpaceType::Hybrid);
/// // discrete column first, regardless of input order
/// let bounds = space.param_bounds_comp();
/// assert_eq!(bounds[(0, 0)], 1.0);
/// assert_eq!(bounds[(0, 1)], 4.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SearchSpace {
    parameters: Vec<Parameter>,
    discrete: SubspaceDiscrete,
    continuous: SubspaceContinuous,
}

impl SearchSpace {
    /// Returns a builder for configuring a search space.
    #[must_use]
    pub fn builder() -> SearchSpaceBuilder {
        SearchSpaceBuilder::new()
    }

    /// Creates a search space from parameters and constraints.
    ///
    /// Discrete constraints are applied while the discrete subspace is
    /// enumerated; continuous constraints are stored with the continuous
    /// subspace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySearchSpace`] without parameters,
    /// [`Error::DuplicateParameterName`] for a repeated name,
    /// [`Error::DuplicateCompColumn`] if two parameters encode to the same
    /// computational column, and any parameter or constraint validation error.
    pub fn create(
        parameters: Vec<Parameter>,
        constraints: Vec<Constraint>,
        empty_encoding: bool,
    ) -> Result<Self> {
        check_names(&parameters)?;
        validate_constraints(&constraints, &parameters)?;

        let (discrete_params, continuous_params): (Vec<Parameter>, Vec<Parameter>) =
            parameters.iter().cloned().partition(Parameter::is_discrete);
        let (discrete_constraints, continuous_constraints): (Vec<Constraint>, Vec<Constraint>) =
            constraints.into_iter().partition(Constraint::is_discrete);

        let discrete =
            SubspaceDiscrete::create(discrete_params, discrete_constraints, empty_encoding)?;
        let continuous =
            SubspaceContinuous::new(continuous_params)?.with_constraints(continuous_constraints)?;
        let space = Self {
            parameters,
            discrete,
            continuous,
        };
        space.check_comp_columns()?;
        Ok(space)
    }

    /// Combines two existing subspaces.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySearchSpace`] if both are empty,
    /// [`Error::DuplicateParameterName`] if they share a parameter name and
    /// [`Error::DuplicateCompColumn`] if they share a computational column.
    pub fn from_parts(discrete: SubspaceDiscrete, continuous: SubspaceContinuous) -> Result<Self> {
        let parameters: Vec<Parameter> = discrete
            .parameters()
            .iter()
            .cloned()
            .chain(continuous.parameters().iter().cloned().map(Parameter::from))
            .collect();
        check_names(&parameters)?;
        let space = Self {
            parameters,
            discrete,
            continuous,
        };
        space.check_comp_columns()?;
        Ok(space)
    }

    /// Rejects a continuous parameter whose column collides with a frozen
    /// discrete computational column.
    fn check_comp_columns(&self) -> Result<()> {
        let mut seen = HashSet::new();
        match self.comp_columns().into_iter().find(|c| !seen.insert(c.clone())) {
            Some(column) => Err(Error::DuplicateCompColumn { column }),
            None => Ok(()),
        }
    }

    /// All parameters, in the order supplied.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Parameter names, in the order supplied.
    #[must_use]
    pub fn param_names(&self) -> Vec<&str> {
        self.parameters.iter().map(Parameter::name).collect()
    }

    /// The discrete subspace.
    #[must_use]
    pub fn discrete(&self) -> &SubspaceDiscrete {
        &self.discrete
    }

    /// The discrete subspace, for updating its bookkeeping flags.
    pub fn discrete_mut(&mut self) -> &mut SubspaceDiscrete {
        &mut self.discrete
    }

    /// The continuous subspace.
    #[must_use]
    pub fn continuous(&self) -> &SubspaceContinuous {
        &self.continuous
    }

    /// Classifies the space by the kinds of parameters it holds.
    #[must_use]
    pub fn search_space_type(&self) -> SearchSpaceType {
        match (self.discrete.is_empty(), self.continuous.is_empty()) {
            (false, false) => SearchSpaceType::Hybrid,
            (true, false) => SearchSpaceType::Continuous,
            _ => SearchSpaceType::Discrete,
        }
    }

    /// Names of the combined computational columns, discrete ones first.
    #[must_use]
    pub fn comp_columns(&self) -> Vec<String> {
        self.discrete
            .comp_columns()
            .iter()
            .cloned()
            .chain(self.continuous.param_names().into_iter().map(str::to_owned))
            .collect()
    }

    /// Bounds of the combined computational columns as a `2 x k` matrix.
    ///
    /// Discrete columns that were dropped as constant have no bounds.
    #[must_use]
    pub fn param_bounds_comp(&self) -> DMatrix<f64> {
        let discrete = self.discrete.param_bounds_comp();
        let continuous = self.continuous.param_bounds_comp();
        let left = discrete.ncols();
        DMatrix::from_fn(2, left + continuous.ncols(), |i, j| {
            if j < left {
                discrete[(i, j)]
            } else {
                continuous[(i, j - left)]
            }
        })
    }

    /// Transforms rows in the experimental representation into the combined
    /// computational representation, discrete columns first.
    ///
    /// # Errors
    ///
    /// Returns the error of the failing subspace transform.
    pub fn transform(&self, data: &Frame) -> Result<CompFrame> {
        let discrete = self.discrete.transform(data)?;
        let continuous = self.continuous.transform(data)?;
        discrete.hstack(&continuous)
    }

    /// Predicts the size of the discrete product space of `parameters` without
    /// building it. Continuous parameters are ignored; constraints are not
    /// taken into account, so the prediction is an upper bound for constrained
    /// spaces.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDescriptors`] if a substance cannot be encoded.
    #[allow(clippy::cast_precision_loss)]
    pub fn estimate_product_space_size(parameters: &[Parameter]) -> Result<MemorySize> {
        let discrete: Vec<Parameter> = parameters
            .iter()
            .filter(|p| p.is_discrete())
            .cloned()
            .collect();
        let rows = discrete::product_size(&discrete);

        let row_bytes: f64 = discrete.iter().map(Parameter::value_byte_width).sum();
        let mut comp_cols = 0;
        for p in &discrete {
            comp_cols += p.comp_columns()?.len();
        }
        let comp_cell = core::mem::size_of::<f64>() as f64;
        Ok(MemorySize {
            exp_rep_bytes: rows as f64 * row_bytes,
            exp_rep_shape: (rows, discrete.len()),
            comp_rep_bytes: rows as f64 * comp_cols as f64 * comp_cell,
            comp_rep_shape: (rows, comp_cols),
        })
    }
}

/// Rejects empty parameter sets and repeated names.
fn check_names(parameters: &[Parameter]) -> Result<()> {
    if parameters.is_empty() {
        return Err(Error::EmptySearchSpace);
    }
    let mut seen = HashSet::new();
    if let Some(p) = parameters.iter().find(|p| !seen.insert(p.name())) {
        return Err(Error::DuplicateParameterName {
            name: p.name().to_owned(),
        });
    }
    Ok(())
}
