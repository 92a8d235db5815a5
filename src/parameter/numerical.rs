//! Numerical parameters.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A parameter taking one of a finite set of numbers.
///
/// Measured values are accepted if they lie within `tolerance` of a declared
/// value. The tolerance must stay below half the smallest gap between two
/// values so that every measurement maps to at most one of them.
///
/// # Example
///
/// ```
/// use searchspace::parameter::NumericalDiscreteParameter;
///
/// let p = NumericalDiscreteParameter::new("pressure", [1.0, 2.0, 7.0]).tolerance(0.3);
/// assert!(p.validate().is_ok());
/// assert!(p.is_in_range(2.25));
/// assert!(!p.is_in_range(2.5));
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NumericalDiscreteParameter {
    name: String,
    values: Vec<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    tolerance: f64,
}

impl NumericalDiscreteParameter {
    /// Creates a parameter with zero tolerance.
    #[must_use]
    pub fn new(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().collect(),
            tolerance: 0.0,
        }
    }

    /// Sets the absolute tolerance used when checking measured values.
    #[must_use]
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// The parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared values, in declaration order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The configured tolerance.
    #[must_use]
    pub fn tolerance_value(&self) -> f64 {
        self.tolerance
    }

    /// Whether `value` lies within the tolerance of any declared value.
    #[must_use]
    pub fn is_in_range(&self, value: f64) -> bool {
        self.values
            .iter()
            .any(|v| (v - value).abs() <= self.tolerance)
    }

    /// Half of the smallest gap between two declared values, or infinity
    /// for a single value.
    fn max_tolerance(&self) -> f64 {
        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);
        sorted
            .windows(2)
            .map(|w| (w[1] - w[0]) / 2.0)
            .fold(f64::INFINITY, f64::min)
    }

    /// Checks the definition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyValues`] without values, [`Error::DuplicateValues`]
    /// for repeated or non-finite values and [`Error::InvalidTolerance`] for a
    /// negative tolerance or one that makes neighbouring values overlap.
    pub fn validate(&self) -> Result<()> {
        if self.values.is_empty() {
            return Err(Error::EmptyValues {
                name: self.name.clone(),
            });
        }
        let mut bits: Vec<u64> = self.values.iter().map(|v| v.to_bits()).collect();
        bits.sort_unstable();
        bits.dedup();
        if bits.len() != self.values.len() || self.values.iter().any(|v| !v.is_finite()) {
            return Err(Error::DuplicateValues {
                name: self.name.clone(),
            });
        }
        let max = self.max_tolerance();
        if self.tolerance < 0.0 || self.tolerance >= max || self.tolerance.is_nan() {
            return Err(Error::InvalidTolerance {
                name: self.name.clone(),
                tolerance: self.tolerance,
                max,
            });
        }
        Ok(())
    }
}

/// A parameter taking any number within `[lower, upper]`.
///
/// Either bound may be infinite.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NumericalContinuousParameter {
    name: String,
    lower: f64,
    upper: f64,
}

impl NumericalContinuousParameter {
    /// Creates a continuous parameter over `[lower, upper]`.
    #[must_use]
    pub fn new(name: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            lower,
            upper,
        }
    }

    /// The parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The lower bound.
    #[must_use]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// The upper bound.
    #[must_use]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// The `(lower, upper)` pair.
    #[must_use]
    pub fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }

    /// Whether both bounds are finite.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }

    /// Whether `value` lies within the bounds.
    #[must_use]
    pub fn is_in_range(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Checks the definition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`] if a bound is NaN or `lower > upper`.
    pub fn validate(&self) -> Result<()> {
        if self.lower.is_nan() || self.upper.is_nan() || self.lower > self.upper {
            return Err(Error::InvalidBounds {
                name: self.name.clone(),
                low: self.lower,
                high: self.upper,
            });
        }
        Ok(())
    }
}
